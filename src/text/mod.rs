/// Canonical join key for entity names and sentences.
///
/// Lowercases the input, then drops every character that is neither
/// alphanumeric nor whitespace. Underscores are dropped too. Lowercasing
/// happens first so that multi-char lowercase expansions cannot leave
/// punctuation behind, which keeps the function idempotent.
pub fn normalize(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

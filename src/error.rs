use thiserror::Error;

use crate::entity::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
    /// An entity row without one of its required fields (`id`, `name`).
    #[error("malformed {table} record at row {row}: missing required field `{field}`")]
    MalformedRecord { table: EntityKind, row: usize, field: &'static str },

    #[error("{table} table has no column named `{column}`")]
    MissingColumn { table: String, column: String },

    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

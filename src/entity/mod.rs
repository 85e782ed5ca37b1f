use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{text::normalize, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Chemical,
    Gene,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Chemical => f.write_str("chemical"),
            EntityKind::Gene => f.write_str("gene"),
        }
    }
}

/// A row as handed over by the table reader; any cell may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub length: Option<String>,
    pub citation_id: Option<String>,
}

/// A validated chemical or gene record. `name` is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    pub name: String,
    pub length: String,
    pub citation_id: String,
}

impl EntityRecord {
    /// Validates a raw row. `row` is the 1-based data row number used in errors.
    pub fn from_row(kind: EntityKind, row: usize, raw: EntityRow) -> Result<Self> {
        let id = required(raw.id).ok_or(Error::MalformedRecord { table: kind, row, field: "id" })?;
        let name = required(raw.name).ok_or(Error::MalformedRecord { table: kind, row, field: "name" })?;
        Ok(Self {
            id,
            name: normalize(&name),
            length: raw.length.unwrap_or_default(),
            citation_id: raw.citation_id.unwrap_or_default(),
        })
    }
}

fn required(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.trim().is_empty())
}

/// Metadata kept per normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    pub id: String,
    pub length: String,
    pub citation_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityIndex {
    pub chemicals: HashMap<String, EntityMeta>,
    pub genes: HashMap<String, EntityMeta>,
}

impl EntityIndex {
    /// Folds both tables into name-keyed lookups. Records are taken in order
    /// and a later record with the same normalized name replaces the earlier one.
    pub fn build<C, G>(chemicals: C, genes: G) -> Self
    where
        C: IntoIterator<Item = EntityRecord>,
        G: IntoIterator<Item = EntityRecord>,
    {
        let index = Self {
            chemicals: fold(EntityKind::Chemical, chemicals),
            genes: fold(EntityKind::Gene, genes),
        };
        info!(chemicals = index.chemicals.len(), genes = index.genes.len(), "entity index built");
        index
    }

    pub fn is_chemical(&self, name: &str) -> bool { self.chemicals.contains_key(name) }

    pub fn is_gene(&self, name: &str) -> bool { self.genes.contains_key(name) }

    pub fn chemical(&self, name: &str) -> Option<&EntityMeta> { self.chemicals.get(name) }
}

fn fold<I: IntoIterator<Item = EntityRecord>>(kind: EntityKind, records: I) -> HashMap<String, EntityMeta> {
    records.into_iter().fold(HashMap::new(), |mut map, record| {
        let key = normalize(&record.name);
        let meta = EntityMeta { id: record.id, length: record.length, citation_id: record.citation_id };
        if let Some(prev) = map.insert(key, meta) {
            debug!(%kind, previous_id = %prev.id, name = %record.name, "index entry overwritten");
        }
        map
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str) -> EntityRow {
        EntityRow {
            id: Some(id.into()),
            name: Some(name.into()),
            length: Some("9".into()),
            citation_id: Some("12345".into()),
        }
    }

    fn record(id: &str, name: &str) -> EntityRecord {
        EntityRecord::from_row(EntityKind::Chemical, 1, row(id, name)).unwrap()
    }

    #[test]
    fn from_row_normalizes_name() {
        let rec = record("C1", "Cis-Platin");
        assert_eq!(rec.name, "cisplatin");
        assert_eq!(rec.length, "9");
        assert_eq!(rec.citation_id, "12345");
    }

    #[test]
    fn from_row_coerces_missing_metadata() {
        let raw = EntityRow { id: Some("G1".into()), name: Some("TP53".into()), ..Default::default() };
        let rec = EntityRecord::from_row(EntityKind::Gene, 1, raw).unwrap();
        assert_eq!(rec.length, "");
        assert_eq!(rec.citation_id, "");
    }

    #[test]
    fn from_row_rejects_missing_id_and_name() {
        let err = EntityRecord::from_row(EntityKind::Gene, 4, EntityRow { name: Some("tp53".into()), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { table: EntityKind::Gene, row: 4, field: "id" }));

        let err = EntityRecord::from_row(EntityKind::Chemical, 2, EntityRow { id: Some("C9".into()), name: Some("  ".into()), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { field: "name", .. }));
    }

    #[test]
    fn last_record_with_same_name_wins() {
        let index = EntityIndex::build(vec![record("C1", "Cisplatin"), record("C2", "CISPLATIN")], Vec::<EntityRecord>::new());
        assert_eq!(index.chemicals.len(), 1);
        assert_eq!(index.chemical("cisplatin").unwrap().id, "C2");
    }

    #[test]
    fn tables_are_indexed_separately() {
        let gene = EntityRecord::from_row(EntityKind::Gene, 1, row("G1", "TP53")).unwrap();
        let index = EntityIndex::build(vec![record("C1", "Cisplatin")], vec![gene]);
        assert!(index.is_chemical("cisplatin"));
        assert!(!index.is_chemical("tp53"));
        assert!(index.is_gene("tp53"));
        assert_eq!(index.genes["tp53"].citation_id, "12345");
    }

    #[test]
    fn empty_tables_build_empty_index() {
        let index = EntityIndex::build(Vec::<EntityRecord>::new(), Vec::<EntityRecord>::new());
        assert!(index.chemicals.is_empty());
        assert!(index.genes.is_empty());
    }

}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::{EntityKind, EntityRecord, EntityRow};
use crate::graph::InteractionRecord;
use crate::{Error, Result};

/// Entity table headers. Given in full when overridden, since the chemical
/// and gene tables have different defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityColumns {
    pub id: String,
    pub name: String,
    pub length: String,
    pub citation_id: String,
}

impl EntityColumns {
    pub fn chemical() -> Self {
        Self { id: "Chemicals_ID".into(), name: "Name".into(), length: "length".into(), citation_id: "PMID".into() }
    }

    pub fn gene() -> Self {
        Self { id: "Gene_ID".into(), name: "Gene_Name".into(), length: "length".into(), citation_id: "PMID".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionColumns {
    pub chemical: String,
    pub gene: String,
    pub interaction_type: String,
    pub sentence: String,
}

impl Default for InteractionColumns {
    fn default() -> Self {
        Self {
            chemical: "Chemicals".into(),
            gene: "Gene".into(),
            interaction_type: "interaction_type".into(),
            sentence: "Sentences".into(),
        }
    }
}

/// Header names for the three input tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "EntityColumns::chemical")]
    pub chemical: EntityColumns,
    #[serde(default = "EntityColumns::gene")]
    pub gene: EntityColumns,
    #[serde(default)]
    pub interaction: InteractionColumns,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self { chemical: EntityColumns::chemical(), gene: EntityColumns::gene(), interaction: InteractionColumns::default() }
    }
}

#[derive(Debug, Clone)]
pub struct TablePaths {
    pub chemicals: PathBuf,
    pub genes: PathBuf,
    pub interactions: PathBuf,
}

/// All three tables, read into memory in file order.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    pub chemicals: Vec<EntityRecord>,
    pub genes: Vec<EntityRecord>,
    pub interactions: Vec<InteractionRecord>,
}

impl TableSet {
    pub fn load(paths: &TablePaths, columns: &ColumnMapping) -> Result<Self> {
        let chemicals = read_entities(&paths.chemicals, EntityKind::Chemical, &columns.chemical)?;
        let genes = read_entities(&paths.genes, EntityKind::Gene, &columns.gene)?;
        let interactions = read_interactions(&paths.interactions, &columns.interaction)?;
        info!(
            chemicals = chemicals.len(),
            genes = genes.len(),
            interactions = interactions.len(),
            "tables loaded"
        );
        Ok(Self { chemicals, genes, interactions })
    }
}

struct Header {
    table: String,
    names: csv::StringRecord,
}

impl Header {
    fn position(&self, column: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| Error::MissingColumn { table: self.table.clone(), column: column.to_string() })
    }
}

/// Cell text as written in the file. Blank entity cells are judged by `EntityRecord::from_row`.
fn cell(row: &csv::StringRecord, idx: usize) -> Option<String> {
    row.get(idx).map(str::to_string)
}

pub fn read_entities(path: &Path, kind: EntityKind, columns: &EntityColumns) -> Result<Vec<EntityRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let header = Header { table: kind.to_string(), names: reader.headers()?.clone() };
    let id = header.position(&columns.id)?;
    let name = header.position(&columns.name)?;
    let length = header.position(&columns.length)?;
    let citation_id = header.position(&columns.citation_id)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let raw = EntityRow {
            id: cell(&row, id),
            name: cell(&row, name),
            length: cell(&row, length),
            citation_id: cell(&row, citation_id),
        };
        records.push(EntityRecord::from_row(kind, i + 1, raw)?);
    }
    Ok(records)
}

pub fn read_interactions(path: &Path, columns: &InteractionColumns) -> Result<Vec<InteractionRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let header = Header { table: "interaction".into(), names: reader.headers()?.clone() };
    let chemical = header.position(&columns.chemical)?;
    let gene = header.position(&columns.gene)?;
    let interaction_type = header.position(&columns.interaction_type)?;
    let sentence = header.position(&columns.sentence)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        records.push(InteractionRecord {
            chemical_name: cell(&row, chemical).unwrap_or_default(),
            gene_name: cell(&row, gene).unwrap_or_default(),
            interaction_type: cell(&row, interaction_type).unwrap_or_default(),
            sentence: cell(&row, sentence).unwrap_or_default(),
        });
    }
    Ok(records)
}

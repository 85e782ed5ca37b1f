use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::entity::EntityIndex;
use crate::graph::{InteractionGraph, InteractionGraphBuilder};
use crate::table::TableSet;
use crate::visual::{ColorClass, Palette, ViewerConfig, VisualEdge, VisualModel, VisualNode, VisualStyleMapper};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    GraphMl,
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "graphml" => Ok(ExportFormat::GraphMl),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub limit: usize,
    pub palette: Palette,
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub records_available: usize,
    pub records_used: usize,
    pub nodes: usize,
    pub edges: usize,
    pub chemical_nodes: usize,
    pub gene_nodes: usize,
    /// Nodes found in neither entity table.
    pub unmatched_nodes: usize,
}

/// Everything a renderer needs: the styled model plus viewer hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionView {
    pub viewer: ViewerConfig,
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

/// Output of one pass over the tables. Each stage's product is kept for inspection.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub index: EntityIndex,
    pub graph: InteractionGraph,
    pub view: InteractionView,
    pub stats: GraphStats,
}

pub fn run(tables: TableSet, options: &PipelineOptions) -> PipelineOutput {
    let TableSet { chemicals, genes, interactions } = tables;
    let index = EntityIndex::build(chemicals, genes);
    let builder = InteractionGraphBuilder::new(options.limit);
    let graph = builder.build(&interactions);
    let model = VisualStyleMapper::new(options.palette.clone()).map_to_visual(&graph, &index);

    let stats = GraphStats {
        records_available: interactions.len(),
        records_used: interactions.len().min(builder.limit()),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        chemical_nodes: model.count_class(ColorClass::Chemical),
        gene_nodes: model.count_class(ColorClass::Gene),
        unmatched_nodes: graph.nodes().filter(|n| !index.is_chemical(n) && !index.is_gene(n)).count(),
    };
    let view = InteractionView::new(model, options.viewer.clone());
    PipelineOutput { index, graph, view, stats }
}

impl InteractionView {
    pub fn new(model: VisualModel, viewer: ViewerConfig) -> Self {
        Self { viewer, nodes: model.nodes, edges: model.edges }
    }

    pub fn model(&self) -> VisualModel {
        VisualModel { nodes: self.nodes.clone(), edges: self.edges.clone() }
    }

    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ExportFormat::GraphMl => Ok(self.model().to_graphml()),
        }
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let view: InteractionView = serde_json::from_str(&data)?;
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("graphml".parse::<ExportFormat>().unwrap(), ExportFormat::GraphMl);
        assert!(matches!("dot".parse::<ExportFormat>(), Err(Error::UnsupportedFormat(f)) if f == "dot"));
    }

    #[test]
    fn empty_tables_give_empty_view() {
        let options = PipelineOptions { limit: 300, ..Default::default() };
        let out = run(TableSet::default(), &options);
        assert!(out.view.nodes.is_empty());
        assert!(out.view.edges.is_empty());
        assert_eq!(out.stats, GraphStats::default());
    }

    #[test]
    fn json_layout_has_viewer_nodes_edges() {
        let view = InteractionView::new(VisualModel::default(), ViewerConfig::default());
        let json: serde_json::Value = serde_json::from_str(&view.render(ExportFormat::Json).unwrap()).unwrap();
        assert_eq!(json["viewer"]["width"], 1200);
        assert!(json["nodes"].as_array().unwrap().is_empty());
        assert!(json["edges"].as_array().unwrap().is_empty());
    }
}

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::EntityIndex;
use crate::graph::InteractionGraph;

/// Style class attached to every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorClass {
    /// Node name is a chemical-index key.
    #[serde(rename = "entity-A")]
    Chemical,
    /// Everything else: genes and names found in neither table.
    #[serde(rename = "entity-B")]
    Gene,
}

impl ColorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorClass::Chemical => "entity-A",
            ColorClass::Gene => "entity-B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub chemical: String,
    pub gene: String,
}

impl Default for Palette {
    fn default() -> Self { Self { chemical: "green".into(), gene: "blue".into() } }
}

impl Palette {
    pub fn color(&self, class: ColorClass) -> &str {
        match class {
            ColorClass::Chemical => &self.chemical,
            ColorClass::Gene => &self.gene,
        }
    }
}

/// Hints for whatever renderer consumes the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub directed: bool,
    pub node_highlight_behavior: bool,
    pub highlight_color: String,
    pub collapsible: bool,
    pub hierarchical: bool,
    pub animation: bool,
    pub improved_layout: bool,
    pub zoom: f32,
    pub render_edge_labels: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1000,
            directed: true,
            node_highlight_behavior: true,
            highlight_color: "#F7A7A6".into(),
            collapsible: false,
            hierarchical: false,
            animation: true,
            improved_layout: true,
            zoom: 2.0,
            render_edge_labels: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    pub color_class: ColorClass,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualModel {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

impl VisualModel {
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() && self.edges.is_empty() }

    pub fn count_class(&self, class: ColorClass) -> usize {
        self.nodes.iter().filter(|n| n.color_class == class).count()
    }

    pub fn to_graphml(&self) -> String {
        let mut s = String::new();
        s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        s.push_str("<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">\n");
        s.push_str("  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>\n");
        s.push_str("  <key id=\"colorClass\" for=\"node\" attr.name=\"colorClass\" attr.type=\"string\"/>\n");
        s.push_str("  <key id=\"color\" for=\"node\" attr.name=\"color\" attr.type=\"string\"/>\n");
        s.push_str("  <key id=\"interaction\" for=\"edge\" attr.name=\"label\" attr.type=\"string\"/>\n");
        s.push_str("  <graph id=\"G\" edgedefault=\"directed\">\n");
        for n in &self.nodes {
            s.push_str(&format!(
                "    <node id=\"{}\"><data key=\"label\">{}</data><data key=\"colorClass\">{}</data><data key=\"color\">{}</data></node>\n",
                xml_escape(&n.id), xml_escape(&n.label), n.color_class.as_str(), xml_escape(&n.color)
            ));
        }
        for (i, e) in self.edges.iter().enumerate() {
            s.push_str(&format!(
                "    <edge id=\"e{}\" source=\"{}\" target=\"{}\"><data key=\"interaction\">{}</data></edge>\n",
                i, xml_escape(&e.source), xml_escape(&e.target), xml_escape(&e.label)
            ));
        }
        s.push_str("  </graph>\n</graphml>\n");
        s
    }
}

#[derive(Debug, Clone, Default)]
pub struct VisualStyleMapper {
    pub palette: Palette,
}

impl VisualStyleMapper {
    pub fn new(palette: Palette) -> Self { Self { palette } }

    /// Chemical membership decides; the gene index is never consulted, so
    /// names found in neither table fall through to the gene class.
    pub fn classify(index: &EntityIndex, name: &str) -> ColorClass {
        if index.is_chemical(name) { ColorClass::Chemical } else { ColorClass::Gene }
    }

    pub fn map_to_visual(&self, graph: &InteractionGraph, index: &EntityIndex) -> VisualModel {
        let nodes: Vec<VisualNode> = graph
            .nodes()
            .map(|name| {
                let class = Self::classify(index, name);
                VisualNode {
                    id: name.to_string(),
                    label: name.to_string(),
                    color_class: class,
                    color: self.palette.color(class).to_string(),
                }
            })
            .collect();
        let edges: Vec<VisualEdge> = graph
            .edges()
            .map(|(source, target, interaction)| VisualEdge {
                source: source.to_string(),
                target: target.to_string(),
                label: interaction.interaction_type.clone(),
            })
            .collect();
        info!(nodes = nodes.len(), edges = edges.len(), "visual model mapped");
        VisualModel { nodes, edges }
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, EntityRecord, EntityRow};
    use crate::graph::Interaction;

    fn entity(kind: EntityKind, id: &str, name: &str) -> EntityRecord {
        EntityRecord::from_row(kind, 1, EntityRow { id: Some(id.into()), name: Some(name.into()), ..Default::default() })
            .unwrap()
    }

    fn link(graph: &mut InteractionGraph, s: &str, t: &str, kind: &str) {
        graph.upsert_edge(s, t, Interaction { interaction_type: kind.into(), sentence: String::new() });
    }

    #[test]
    fn chemical_membership_wins_over_gene_membership() {
        let index = EntityIndex::build(
            vec![entity(EntityKind::Chemical, "C1", "Heme")],
            vec![entity(EntityKind::Gene, "G1", "HEME")],
        );
        assert_eq!(VisualStyleMapper::classify(&index, "heme"), ColorClass::Chemical);
    }

    #[test]
    fn unknown_names_fall_back_to_gene_class() {
        let index = EntityIndex::build(Vec::<EntityRecord>::new(), Vec::<EntityRecord>::new());
        assert_eq!(VisualStyleMapper::classify(&index, "mystery"), ColorClass::Gene);
    }

    #[test]
    fn maps_nodes_and_edges_in_graph_order() {
        let index = EntityIndex::build(
            vec![entity(EntityKind::Chemical, "C1", "Cisplatin")],
            vec![entity(EntityKind::Gene, "G1", "TP53")],
        );
        let mut graph = InteractionGraph::new();
        link(&mut graph, "cisplatin", "tp53", "decreases");
        link(&mut graph, "cisplatin", "bax", "increases");

        let model = VisualStyleMapper::default().map_to_visual(&graph, &index);
        let ids: Vec<_> = model.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["cisplatin", "tp53", "bax"]);
        assert_eq!(model.nodes[0].color_class, ColorClass::Chemical);
        assert_eq!(model.nodes[0].color, "green");
        assert_eq!(model.nodes[2].color_class, ColorClass::Gene);
        assert_eq!(model.nodes[2].label, "bax");
        assert_eq!(model.edges[1], VisualEdge { source: "cisplatin".into(), target: "bax".into(), label: "increases".into() });
        assert_eq!(model.count_class(ColorClass::Gene), 2);
    }

    #[test]
    fn empty_graph_maps_to_empty_model() {
        let model = VisualStyleMapper::default()
            .map_to_visual(&InteractionGraph::new(), &EntityIndex::default());
        assert!(model.is_empty());
    }

    #[test]
    fn serializes_class_names_and_camel_case() {
        let node = VisualNode { id: "tp53".into(), label: "tp53".into(), color_class: ColorClass::Gene, color: "blue".into() };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["colorClass"], "entity-B");
        let viewer = serde_json::to_value(ViewerConfig::default()).unwrap();
        assert_eq!(viewer["highlightColor"], "#F7A7A6");
        assert_eq!(viewer["nodeHighlightBehavior"], true);
    }

    #[test]
    fn graphml_escapes_and_is_directed() {
        let model = VisualModel {
            nodes: vec![VisualNode { id: "a".into(), label: "a".into(), color_class: ColorClass::Chemical, color: "green".into() }],
            edges: vec![VisualEdge { source: "a".into(), target: "a".into(), label: "binds <strongly> & \"fast\"".into() }],
        };
        let xml = model.to_graphml();
        assert!(xml.contains("edgedefault=\"directed\""));
        assert!(xml.contains("<data key=\"colorClass\">entity-A</data>"));
        assert!(xml.contains("binds &lt;strongly&gt; &amp; &quot;fast&quot;"));
    }
}

use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::text::normalize;

pub const DEFAULT_LIMIT: usize = 300;

/// One literature-mined row linking a chemical to a gene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub chemical_name: String,
    pub gene_name: String,
    pub interaction_type: String,
    pub sentence: String,
}

/// Edge payload. Only the last record seen for a (chemical, gene) pair is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub interaction_type: String,
    pub sentence: String,
}

/// Directed chemical→gene graph with nodes keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    graph: DiGraph<String, Interaction>,
    name_to_node: HashMap<String, NodeIndex>,
}

impl InteractionGraph {
    pub fn new() -> Self { Self::default() }

    /// Inserts or replaces the edge `source -> target`. Endpoints are created on demand.
    pub fn upsert_edge(&mut self, source: &str, target: &str, interaction: Interaction) -> EdgeIndex {
        let from = self.get_or_create_node(source);
        let to = self.get_or_create_node(target);
        self.graph.update_edge(from, to, interaction)
    }

    fn get_or_create_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.name_to_node.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.name_to_node.insert(name.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize { self.graph.node_count() }

    pub fn edge_count(&self) -> usize { self.graph.edge_count() }

    pub fn contains_node(&self, name: &str) -> bool { self.name_to_node.contains_key(name) }

    /// Node names in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_indices().map(move |i| self.graph[i].as_str())
    }

    /// `(source, target, interaction)` triples in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &Interaction)> + '_ {
        self.graph.edge_references().map(move |e| {
            (self.graph[e.source()].as_str(), self.graph[e.target()].as_str(), e.weight())
        })
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&Interaction> {
        let from = *self.name_to_node.get(source)?;
        let to = *self.name_to_node.get(target)?;
        self.graph.find_edge(from, to).map(|e| &self.graph[e])
    }

    pub fn is_empty(&self) -> bool { self.graph.node_count() == 0 }
}

#[derive(Debug, Clone, Copy)]
pub struct InteractionGraphBuilder {
    limit: usize,
}

impl Default for InteractionGraphBuilder {
    fn default() -> Self { Self { limit: DEFAULT_LIMIT } }
}

impl InteractionGraphBuilder {
    pub fn new(limit: usize) -> Self { Self { limit } }

    pub fn limit(&self) -> usize { self.limit }

    /// Builds the graph from the first `limit` records, in order.
    pub fn build<'a, I>(&self, records: I) -> InteractionGraph
    where
        I: IntoIterator<Item = &'a InteractionRecord>,
    {
        let mut graph = InteractionGraph::new();
        let mut used = 0usize;
        let mut records = records.into_iter();
        for record in records.by_ref().take(self.limit) {
            graph.upsert_edge(
                &normalize(&record.chemical_name),
                &normalize(&record.gene_name),
                Interaction {
                    interaction_type: record.interaction_type.clone(),
                    sentence: normalize(&record.sentence),
                },
            );
            used += 1;
        }
        let dropped = records.count();
        if dropped > 0 {
            debug!(limit = self.limit, dropped, "interaction records past the limit ignored");
        }
        info!(records = used, nodes = graph.node_count(), edges = graph.edge_count(), "interaction graph built");
        graph
    }
}

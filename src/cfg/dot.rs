//! Graphviz rendering of a CFG.

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

use super::{ControlFlowGraph, Edge};

impl ControlFlowGraph<'_> {
    /// Copy of the graph as a petgraph `DiGraph`. Node indices equal node ids.
    pub fn to_petgraph(&self) -> DiGraph<String, Edge> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        for node in &self.nodes {
            graph.add_node(node.label());
        }
        for (from, to, edge) in &self.edges {
            graph.add_edge(NodeIndex::new(from.0), NodeIndex::new(to.0), *edge);
        }
        graph
    }

    /// Graphviz `digraph` source for the graph.
    pub fn to_dot(&self) -> String {
        let graph = self.to_petgraph();
        let body = format!("{}", Dot::with_config(&graph, &[Config::GraphContentOnly]));

        let mut out = String::from("digraph cfg {\n");
        for line in body.lines() {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("}\n");
        out
    }
}

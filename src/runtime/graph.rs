use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Layout hint for the runtime's editor. Not semantically load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// One vertex of a workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// Unique within the enclosing graph.
    pub id: String,
    pub display_name: String,
    /// Runtime node type, e.g. `n8n-nodes-base.slack`.
    pub kind: String,
    #[serde(default = "default_type_version")]
    pub type_version: u32,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    #[serde(default)]
    pub credential_ref: Option<String>,
    pub position: Position,
}

fn default_type_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub node: String,
    #[serde(default)]
    pub port: usize,
}

/// Highest output count a node may declare. Ports are `0..MAX_OUTPUT_PORTS`.
pub const MAX_OUTPUT_PORTS: usize = 64;

/// Outgoing edges per source node id, in port order.
pub type ConnectionMap = BTreeMap<String, Vec<ConnectionTarget>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub nodes: Vec<NodeDescriptor>,
    #[serde(default)]
    pub connections: ConnectionMap,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl WorkflowGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.values().map(Vec::len).sum()
    }

    pub fn node(&self, id: &str) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_kind(&self, kinds: &[String]) -> bool {
        self.nodes.iter().any(|n| kinds.iter().any(|k| *k == n.kind))
    }

    /// Checks that node ids and display names are unique, every connection
    /// endpoint exists, ports are in range, there are no self-loops and the
    /// connections form a DAG.
    ///
    /// Display names are compared case-insensitively since the import
    /// document keys connections by name.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(self.nodes.len());
        let mut names = HashSet::with_capacity(self.nodes.len());
        for (idx, node) in self.nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), idx).is_some() {
                return Err(GraphError::DuplicateNodeId(node.id.clone()));
            }
            if !names.insert(node.display_name.to_lowercase()) {
                return Err(GraphError::DuplicateDisplayName(node.display_name.clone()));
            }
        }

        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        let mut in_degree: Vec<usize> = vec![0; self.nodes.len()];

        for (source, targets) in &self.connections {
            let u = *index
                .get(source.as_str())
                .ok_or_else(|| GraphError::UnknownSource(source.clone()))?;
            for target in targets {
                if target.port >= MAX_OUTPUT_PORTS {
                    return Err(GraphError::InvalidPort {
                        source_id: source.clone(),
                        port: target.port,
                    });
                }
                if target.node == *source {
                    return Err(GraphError::SelfLoop(source.clone()));
                }
                let v = *index.get(target.node.as_str()).ok_or_else(|| {
                    GraphError::UnknownTarget {
                        source_id: source.clone(),
                        target: target.node.clone(),
                    }
                })?;
                adj[u].push(v);
                in_degree[v] += 1;
            }
        }

        // Kahn: every node must be dequeued exactly once for the graph to be acyclic.
        let mut queue: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut visited = 0;
        while let Some(u) = queue.pop_front() {
            visited += 1;
            for &v in &adj[u] {
                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    queue.push_back(v);
                }
            }
        }

        if visited != self.nodes.len() {
            return Err(GraphError::Cycle);
        }
        Ok(())
    }

    /// Distinct credential classes in order of first appearance.
    pub fn credential_classes(&self) -> Vec<(&str, &NodeDescriptor)> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .filter_map(|n| n.credential_ref.as_deref().map(|c| (c, n)))
            .filter(|(c, _)| seen.insert(*c))
            .collect()
    }
}

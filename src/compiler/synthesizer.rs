use crate::analysis::config::mentions_any;
use crate::compiler::resolver;
use crate::compiler::trigger::build_trigger;
use crate::dsl::WorkflowRequest;
use crate::runtime::graph::{ConnectionMap, ConnectionTarget, NodeDescriptor, Position, WorkflowGraph};
use crate::runtime::ids::IdGenerator;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub const TRANSFORM_KIND: &str = "n8n-nodes-base.code";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub origin_x: i32,
    pub origin_y: i32,
    pub spacing: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 240,
            origin_y: 300,
            spacing: 220,
        }
    }
}

impl LayoutConfig {
    pub fn origin(&self) -> Position {
        self.column(0)
    }

    fn column(&self, index: usize) -> Position {
        Position {
            x: self.origin_x + self.spacing * index as i32,
            y: self.origin_y,
        }
    }
}

/// Deterministic graph builder used whenever the generative path is not.
///
/// Produces `trigger -> integration... [-> transform]` as a single chain.
/// It never infers branches, fan-out or loops.
pub struct Synthesizer {
    layout: LayoutConfig,
    transform_vocabulary: Vec<String>,
}

impl Synthesizer {
    pub fn new(layout: LayoutConfig, transform_vocabulary: Vec<String>) -> Self {
        Self {
            layout,
            transform_vocabulary,
        }
    }

    /// `request` must satisfy [`WorkflowRequest::validate`].
    pub fn synthesize(&self, request: &WorkflowRequest, ids: &dyn IdGenerator) -> WorkflowGraph {
        let mut names = HashSet::new();
        let mut nodes = Vec::with_capacity(request.integrations.len() + 2);

        let mut trigger = build_trigger(
            request.trigger_kind,
            request.trigger_detail.as_deref(),
            self.layout.origin(),
            ids,
        );
        trigger.display_name = unique_name(&trigger.display_name, &mut names);
        nodes.push(trigger);

        for integration in &request.integrations {
            let binding = resolver::resolve(integration);
            let column = nodes.len();
            nodes.push(NodeDescriptor {
                id: ids.next_id(),
                display_name: unique_name(integration.trim(), &mut names),
                kind: binding.kind.to_string(),
                type_version: binding.type_version,
                parameters: binding.default_parameters,
                credential_ref: binding.credential_class.map(str::to_string),
                position: self.layout.column(column),
            });
        }

        if mentions_any(&request.action_narrative, &self.transform_vocabulary) {
            let column = nodes.len();
            let mut parameters = BTreeMap::new();
            parameters.insert(
                "jsCode".to_string(),
                json!("// Reshape incoming items before they leave the workflow\nreturn $input.all();"),
            );
            nodes.push(NodeDescriptor {
                id: ids.next_id(),
                display_name: unique_name("Transform Data", &mut names),
                kind: TRANSFORM_KIND.to_string(),
                type_version: 2,
                parameters,
                credential_ref: None,
                position: self.layout.column(column),
            });
        }

        let mut connections = ConnectionMap::new();
        for pair in nodes.windows(2) {
            connections.insert(
                pair[0].id.clone(),
                vec![ConnectionTarget {
                    node: pair[1].id.clone(),
                    port: 0,
                }],
            );
        }

        debug!(
            nodes = nodes.len(),
            connections = nodes.len().saturating_sub(1),
            "Synthesized fallback graph"
        );

        WorkflowGraph {
            nodes,
            connections,
            tags: vec!["flowsmith".to_string(), request.trigger_kind.to_string()],
        }
    }
}

/// The runtime's import format keys connections by display name, so names
/// must not repeat within one graph.
fn unique_name(base: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.to_lowercase()) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{} {}", base, n);
        if taken.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

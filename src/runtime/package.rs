use crate::analysis::WorkflowAnalysis;
use crate::compiler::trigger::{SCHEDULE_KIND, WEBHOOK_KIND};
use crate::dsl::{TriggerKind, WorkflowRequest};
use crate::runtime::graph::WorkflowGraph;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequirement {
    pub name: String,
    pub credential_class: String,
    pub related_service: String,
    pub priority: Priority,
}

pub const WEBHOOK_AUTH_CLASS: &str = "httpHeaderAuth";

impl CredentialRequirement {
    /// One requirement per distinct credential class, in node order. A webhook
    /// trigger adds an optional header-auth credential.
    pub fn derive(graph: &WorkflowGraph) -> Vec<CredentialRequirement> {
        let mut requirements: Vec<CredentialRequirement> = graph
            .credential_classes()
            .into_iter()
            .map(|(class, node)| CredentialRequirement {
                name: format!("{} credentials", node.display_name),
                credential_class: class.to_string(),
                related_service: node.display_name.clone(),
                priority: Priority::Required,
            })
            .collect();

        if let Some(hook) = graph.nodes.iter().find(|n| n.kind == WEBHOOK_KIND) {
            if !requirements.iter().any(|r| r.credential_class == WEBHOOK_AUTH_CLASS) {
                requirements.push(CredentialRequirement {
                    name: "Webhook header auth".to_string(),
                    credential_class: WEBHOOK_AUTH_CLASS.to_string(),
                    related_service: hook.display_name.clone(),
                    priority: Priority::Optional,
                });
            }
        }
        requirements
    }
}

/// The deliverable for one request. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPackage {
    pub id: String,
    pub name: String,
    pub graph: WorkflowGraph,
    pub analysis: WorkflowAnalysis,
    pub setup_steps: Vec<String>,
    pub credential_requirements: Vec<CredentialRequirement>,
    pub tokens_used: u32,
    pub processing_time_ms: u64,
}

/// Setup instructions derived from the graph, used when the generative
/// service did not supply its own.
pub fn derive_setup_steps(
    graph: &WorkflowGraph,
    request: &WorkflowRequest,
    credentials: &[CredentialRequirement],
) -> Vec<String> {
    let mut steps = vec![format!(
        "Import the \"{}\" workflow JSON into your automation runtime",
        request.name
    )];

    for cred in credentials {
        let verb = match cred.priority {
            Priority::Required => "Create",
            Priority::Optional => "Optionally create",
        };
        steps.push(format!(
            "{} a {} credential for {}",
            verb, cred.credential_class, cred.related_service
        ));
    }

    match request.trigger_kind {
        TriggerKind::Scheduled => {
            let when = match request.trigger_detail.as_deref() {
                Some(detail) if request.uses_default_schedule() => {
                    format!("daily at 09:00 (default, \"{}\" was not understood)", detail)
                }
                Some(detail) => detail.to_string(),
                None => "daily at 09:00 (default)".to_string(),
            };
            steps.push(format!("Check the Schedule Trigger timing: {}", when));
        }
        TriggerKind::InboundRequest => {
            let path = graph
                .nodes
                .iter()
                .find(|n| n.kind == WEBHOOK_KIND)
                .and_then(|n| n.parameters.get("path"))
                .and_then(|p| p.as_str())
                .unwrap_or("<path>");
            steps.push(format!(
                "Point the calling system at the production webhook URL ending in /webhook/{}",
                path
            ));
        }
        TriggerKind::AdHoc => {
            steps.push("Start runs with Execute Workflow from the editor".to_string());
        }
    }

    let blanks: Vec<&str> = graph
        .nodes
        .iter()
        .filter(|n| n.parameters.values().any(|v| v.as_str() == Some("")))
        .map(|n| n.display_name.as_str())
        .collect();
    if !blanks.is_empty() {
        steps.push(format!("Fill in the empty parameters on: {}", blanks.join(", ")));
    }

    steps.push("Execute once with test data and inspect each node's output".to_string());
    if graph.nodes.iter().any(|n| n.kind == SCHEDULE_KIND || n.kind == WEBHOOK_KIND) {
        steps.push("Activate the workflow".to_string());
    }
    steps
}

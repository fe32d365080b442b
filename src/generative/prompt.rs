use crate::dsl::WorkflowRequest;
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str = "You design n8n automation workflows. Reply with a single JSON object and nothing else.";

const SHAPE: &str = r#"{
  "workflow": {
    "nodes": [
      {"id": "string", "displayName": "string", "kind": "n8n-nodes-base.<type>", "typeVersion": 1,
       "parameters": {}, "credentialRef": "string or null", "position": {"x": 0, "y": 0}}
    ],
    "connections": {"<source node id>": [{"node": "<target node id>", "port": 0}]},
    "tags": ["string"]
  },
  "analysis": {
    "nodeCount": 0, "connectionCount": 0,
    "complexityTier": "simple | moderate | complex",
    "estimatedExecutionSeconds": 0,
    "potentialIssues": [], "optimizationSuggestions": [],
    "securityConsiderations": [], "scalabilityNotes": []
  },
  "setupSteps": ["string"],
  "credentialRequirements": [
    {"name": "string", "credentialClass": "string", "relatedService": "string", "priority": "required | optional"}
  ]
}"#;

/// User prompt describing `request` and the exact reply shape.
pub fn build_prompt(request: &WorkflowRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Workflow name: {}", request.name);
    let _ = writeln!(out, "Trigger: {}", request.trigger_kind);
    if let Some(detail) = &request.trigger_detail {
        let _ = writeln!(out, "Trigger detail: {}", detail);
    }
    let _ = writeln!(out, "Integrations (in order): {}", request.integrations.join(", "));
    let _ = writeln!(out, "What should happen: {}", request.action_narrative);
    if !request.additional_context.is_empty() {
        let _ = writeln!(out, "Context: {}", request.additional_context);
    }
    if !request.specific_requirements.is_empty() {
        let _ = writeln!(out, "Requirements:");
        for r in &request.specific_requirements {
            let _ = writeln!(out, "- {}", r);
        }
    }
    if !request.goals.is_empty() {
        let _ = writeln!(out, "Goals:");
        for g in &request.goals {
            let _ = writeln!(out, "- {}", g);
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Node ids must be unique, connections must reference existing ids and must not form cycles. \
         nodeCount and connectionCount must match the workflow. Respond with JSON of exactly this shape:"
    );
    out.push_str(SHAPE);
    out
}

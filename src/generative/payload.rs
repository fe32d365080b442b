//! Strict reading of generative output.
//!
//! The payload is accepted only whole: a graph that validates, an analysis
//! whose counts agree with that graph, and at least one setup step. Anything
//! less is a [`PayloadError`]; nothing is salvaged from a partial payload.

use crate::analysis::WorkflowAnalysis;
use crate::error::PayloadError;
use crate::runtime::graph::WorkflowGraph;
use crate::runtime::package::CredentialRequirement;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    workflow: WorkflowGraph,
    analysis: WorkflowAnalysis,
    setup_steps: Vec<String>,
    #[serde(default)]
    credential_requirements: Option<Vec<CredentialRequirement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPayload {
    pub graph: WorkflowGraph,
    pub analysis: WorkflowAnalysis,
    pub setup_steps: Vec<String>,
    /// `None` when the service left them out; callers derive them from the graph.
    pub credential_requirements: Option<Vec<CredentialRequirement>>,
}

/// Reads the first JSON value embedded in `text`.
///
/// A fenced code block is preferred when present. Exactly one value is read
/// from the first `{`, so trailing prose is ignored but a truncated object is
/// rejected.
pub fn extract_json(text: &str) -> Result<Value, PayloadError> {
    let candidate = fenced_block(text).unwrap_or(text);
    let start = candidate.find('{').ok_or(PayloadError::NotFound)?;

    let mut stream = serde_json::Deserializer::from_str(&candidate[start..]).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(PayloadError::Malformed(e)),
        None => Err(PayloadError::NotFound),
    }
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let rest = &text[open + 3..];
    // Skip the info string (`json`, `JSON`, ...) up to the end of the line.
    let body_start = rest.find('\n')? + 1;
    let body = &rest[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

pub fn parse_payload(text: &str) -> Result<ParsedPayload, PayloadError> {
    let value = extract_json(text)?;
    let raw: RawPayload = serde_json::from_value(value).map_err(PayloadError::Schema)?;

    raw.workflow.validate()?;

    if raw.setup_steps.iter().all(|s| s.trim().is_empty()) {
        return Err(PayloadError::MissingSetupSteps);
    }

    let nodes = raw.workflow.node_count();
    if raw.analysis.node_count != nodes {
        return Err(PayloadError::AnalysisMismatch {
            field: "nodeCount",
            reported: raw.analysis.node_count,
            actual: nodes,
        });
    }
    let connections = raw.workflow.connection_count();
    if raw.analysis.connection_count != connections {
        return Err(PayloadError::AnalysisMismatch {
            field: "connectionCount",
            reported: raw.analysis.connection_count,
            actual: connections,
        });
    }

    Ok(ParsedPayload {
        graph: raw.workflow,
        analysis: raw.analysis,
        setup_steps: raw.setup_steps,
        credential_requirements: raw.credential_requirements,
    })
}

use thiserror::Error;

/// Input contract violations. These are rejected before any generation work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("request must name at least one integration")]
    NoIntegrations,
    #[error("request names {0} integrations, at most {max} are allowed", max = crate::dsl::MAX_INTEGRATIONS)]
    TooManyIntegrations(usize),
    #[error("action narrative must not be empty")]
    EmptyNarrative,
}

/// Structural invariant violations of a [`crate::runtime::graph::WorkflowGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("graph has no nodes")]
    Empty,
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),
    #[error("duplicate display name: {0}")]
    DuplicateDisplayName(String),
    #[error("connection source not found: {0}")]
    UnknownSource(String),
    #[error("connection target not found: {source_id} -> {target}")]
    UnknownTarget { source_id: String, target: String },
    #[error("output port {port} on node {source_id} is out of range")]
    InvalidPort { source_id: String, port: usize },
    #[error("self-loop on node {0}")]
    SelfLoop(String),
    #[error("connections contain a cycle")]
    Cycle,
}

/// Reasons a generative payload is refused. Any of these sends the
/// orchestrator down the fallback path.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("no JSON object found in generated text")]
    NotFound,
    #[error("malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("payload does not match the package shape: {0}")]
    Schema(#[source] serde_json::Error),
    #[error("payload has no setup steps")]
    MissingSetupSteps,
    #[error("payload graph is invalid: {0}")]
    InvalidGraph(#[from] GraphError),
    #[error("analysis reports {field} = {reported}, graph has {actual}")]
    AnalysisMismatch {
        field: &'static str,
        reported: usize,
        actual: usize,
    },
}

/// Why the generative path was abandoned in favour of the fallback.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("generative service timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("generative service failed: {0}")]
    Service(String),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

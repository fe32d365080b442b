pub mod config;

use crate::compiler::resolver;
use crate::dsl::{TriggerKind, WorkflowRequest};
use crate::runtime::graph::WorkflowGraph;
use config::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Simple,
    Moderate,
    Complex,
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexityTier::Simple => write!(f, "simple"),
            ComplexityTier::Moderate => write!(f, "moderate"),
            ComplexityTier::Complex => write!(f, "complex"),
        }
    }
}

/// Structural and operational snapshot of one graph. Built once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAnalysis {
    pub node_count: usize,
    pub connection_count: usize,
    pub complexity_tier: ComplexityTier,
    /// Additive heuristic, not a measurement.
    pub estimated_execution_seconds: u32,
    pub potential_issues: Vec<String>,
    pub optimization_suggestions: Vec<String>,
    pub security_considerations: Vec<String>,
    pub scalability_notes: Vec<String>,
}

pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Pure: equal inputs give equal output.
    pub fn analyze(&self, graph: &WorkflowGraph, request: &WorkflowRequest) -> WorkflowAnalysis {
        let node_count = graph.node_count();
        let connection_count = graph.connection_count();
        let branching = graph.has_kind(&self.config.branching_kinds);

        WorkflowAnalysis {
            node_count,
            connection_count,
            complexity_tier: self.complexity(node_count, connection_count, branching),
            estimated_execution_seconds: self.estimate_seconds(node_count, request),
            potential_issues: self.issues(graph, request),
            optimization_suggestions: self.suggestions(graph, request),
            security_considerations: self.security(request),
            scalability_notes: self.scalability(graph, request),
        }
    }

    /// First match wins: simple, then complex, otherwise moderate.
    pub fn complexity(&self, nodes: usize, connections: usize, branching: bool) -> ComplexityTier {
        let c = &self.config;
        if nodes <= c.simple_max_nodes && connections <= c.simple_max_connections && !branching {
            ComplexityTier::Simple
        } else if nodes > c.complex_node_threshold || connections > c.complex_connection_threshold {
            ComplexityTier::Complex
        } else {
            ComplexityTier::Moderate
        }
    }

    pub fn estimate_seconds(&self, nodes: usize, request: &WorkflowRequest) -> u32 {
        let c = &self.config;
        let nodes = u32::try_from(nodes).unwrap_or(u32::MAX);
        let mut seconds = c.base_seconds.saturating_add(c.seconds_per_node.saturating_mul(nodes));
        if request.integrations.iter().any(|i| c.is_enterprise(i)) {
            seconds = seconds.saturating_add(c.enterprise_penalty_seconds);
        }
        if request.integrations.iter().any(|i| c.is_database(i)) {
            seconds = seconds.saturating_add(c.database_penalty_seconds);
        }
        seconds
    }

    fn issues(&self, graph: &WorkflowGraph, request: &WorkflowRequest) -> Vec<String> {
        let c = &self.config;
        let mut issues = Vec::new();

        if graph.node_count() > c.error_handling_min_nodes && !graph.has_kind(&c.error_handling_kinds) {
            issues.push(
                "No error handling: add an Error Trigger workflow or Stop and Error node so failures are reported"
                    .to_string(),
            );
        }

        let external: Vec<&str> = request
            .integrations
            .iter()
            .filter(|i| !c.is_local(i))
            .map(String::as_str)
            .collect();
        if !external.is_empty() {
            issues.push(format!(
                "External APIs may rate-limit requests: {}",
                external.join(", ")
            ));
        }

        if c.mentions_transform(&request.action_narrative) && !graph.has_kind(&c.data_shaping_kinds) {
            issues.push(
                "Narrative asks for data transformation but the workflow has no data-shaping node".to_string(),
            );
        }

        if request.uses_default_schedule() {
            issues.push(
                "No readable schedule given: defaulted to a daily run at 09:00, adjust the Schedule Trigger".to_string(),
            );
        }

        let generic: Vec<&str> = request
            .integrations
            .iter()
            .filter(|i| resolver::resolve(i).generic)
            .map(String::as_str)
            .collect();
        if !generic.is_empty() {
            issues.push(format!(
                "No dedicated node for {}: mapped to a generic HTTP Request node, endpoint and auth must be configured by hand",
                generic.join(", ")
            ));
        }

        issues
    }

    fn suggestions(&self, graph: &WorkflowGraph, request: &WorkflowRequest) -> Vec<String> {
        let c = &self.config;
        let mut suggestions = Vec::new();

        if graph.node_count() > c.split_suggestion_min_nodes {
            suggestions.push(
                "Split the workflow into sub-workflows with Execute Workflow nodes to keep each part testable"
                    .to_string(),
            );
        }
        if request.integrations.iter().any(|i| c.is_database(i)) {
            suggestions.push("Batch database writes instead of inserting one item per execution".to_string());
        }
        if request.integrations.len() > 2 && !graph.has_kind(&c.data_shaping_kinds) {
            suggestions.push(
                "Add a Set node early on to pass only the fields later nodes need".to_string(),
            );
        }
        if request.trigger_kind == TriggerKind::Scheduled {
            suggestions.push("Match the schedule frequency to how fresh the data needs to be".to_string());
        }
        if request.integrations.iter().filter(|i| !c.is_local(i)).count() > 1 {
            suggestions.push(
                "Enable Retry On Fail on nodes that call external services".to_string(),
            );
        }
        if suggestions.is_empty() {
            suggestions.push("Pin test data on the trigger to iterate without re-running it".to_string());
        }
        suggestions
    }

    fn security(&self, request: &WorkflowRequest) -> Vec<String> {
        let c = &self.config;
        let mut notes = vec![
            "Store API keys and tokens in the runtime's credential store, never in node parameters".to_string(),
        ];
        if request.integrations.iter().any(|i| c.is_payment(i)) {
            notes.push(
                "Payment data: use restricted API keys, verify event signatures and avoid logging card or customer details"
                    .to_string(),
            );
        }
        if request.trigger_kind == TriggerKind::InboundRequest {
            notes.push(
                "Webhook endpoint is publicly reachable: require header authentication or a shared secret and validate the payload"
                    .to_string(),
            );
        }
        notes
    }

    fn scalability(&self, graph: &WorkflowGraph, request: &WorkflowRequest) -> Vec<String> {
        let c = &self.config;
        let mut notes = Vec::new();

        match request.trigger_kind {
            TriggerKind::Scheduled => notes.push(
                "Scheduled runs can overlap if one execution outlasts the interval".to_string(),
            ),
            TriggerKind::InboundRequest => notes.push(
                "Bursts of inbound requests queue executions; consider queue mode with multiple workers".to_string(),
            ),
            TriggerKind::AdHoc => notes.push(
                "Manual runs execute one at a time and do not need capacity planning".to_string(),
            ),
        }

        let external = request.integrations.iter().filter(|i| !c.is_local(i)).count();
        if external > 0 {
            notes.push(format!(
                "Throughput is bounded by the quotas of {} external service(s)",
                external
            ));
        }
        if request.integrations.iter().any(|i| c.is_database(i)) {
            notes.push("Size database connection pools for concurrent executions".to_string());
        }
        if self.complexity(graph.node_count(), graph.connection_count(), graph.has_kind(&c.branching_kinds))
            == ComplexityTier::Complex
        {
            notes.push("Large graphs hold all items in memory; process data in batches".to_string());
        }
        notes
    }
}

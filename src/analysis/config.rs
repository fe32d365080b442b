use serde::{Deserialize, Serialize};

/// Thresholds, heuristic constants and vocabulary lists used by the
/// [`super::Analyzer`]. The numbers are product tuning, not correctness
/// requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub simple_max_nodes: usize,
    pub simple_max_connections: usize,
    /// Strictly more nodes than this is `complex`.
    pub complex_node_threshold: usize,
    /// Strictly more connections than this is `complex`.
    pub complex_connection_threshold: usize,
    /// Missing error handling is only reported above this node count.
    pub error_handling_min_nodes: usize,
    /// Sub-workflow split is suggested above this node count.
    pub split_suggestion_min_nodes: usize,

    pub base_seconds: u32,
    pub seconds_per_node: u32,
    pub enterprise_penalty_seconds: u32,
    pub database_penalty_seconds: u32,

    pub enterprise_services: Vec<String>,
    pub database_services: Vec<String>,
    pub local_services: Vec<String>,
    pub payment_services: Vec<String>,

    pub branching_kinds: Vec<String>,
    pub error_handling_kinds: Vec<String>,
    pub data_shaping_kinds: Vec<String>,

    /// Word stems that mark a narrative as asking for data transformation.
    pub transform_vocabulary: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            simple_max_nodes: 5,
            simple_max_connections: 4,
            complex_node_threshold: 15,
            complex_connection_threshold: 20,
            error_handling_min_nodes: 3,
            split_suggestion_min_nodes: 10,

            base_seconds: 5,
            seconds_per_node: 2,
            enterprise_penalty_seconds: 15,
            database_penalty_seconds: 10,

            enterprise_services: strings(&[
                "salesforce",
                "sap erp",
                "sap s/4hana",
                "oracle",
                "workday",
                "servicenow",
                "dynamics 365",
                "netsuite",
            ]),
            database_services: strings(&[
                "postgres",
                "mysql",
                "mongo",
                "redis",
                "sql server",
                "mssql",
                "sqlite",
                "dynamodb",
                "supabase",
                "database",
            ]),
            local_services: strings(&[
                "local file",
                "filesystem",
                "file system",
                "sqlite",
                "csv",
                "spreadsheet file",
            ]),
            payment_services: strings(&["stripe", "paypal", "square", "braintree", "adyen"]),

            branching_kinds: strings(&[
                "n8n-nodes-base.if",
                "n8n-nodes-base.switch",
                "n8n-nodes-base.splitInBatches",
                "n8n-nodes-base.merge",
            ]),
            error_handling_kinds: strings(&[
                "n8n-nodes-base.errorTrigger",
                "n8n-nodes-base.stopAndError",
            ]),
            data_shaping_kinds: strings(&[
                "n8n-nodes-base.code",
                "n8n-nodes-base.set",
                "n8n-nodes-base.function",
                "n8n-nodes-base.itemLists",
                "n8n-nodes-base.dateTime",
            ]),

            transform_vocabulary: strings(&[
                "transform",
                "convert",
                "reformat",
                "format",
                "parse",
                "parsing",
                "normaliz",
                "normalis",
                "restructur",
                "reshap",
                "clean",
                "enrich",
                "extract",
            ]),
        }
    }
}

impl AnalyzerConfig {
    pub fn is_enterprise(&self, integration: &str) -> bool {
        matches_service(integration, &self.enterprise_services)
    }

    pub fn is_database(&self, integration: &str) -> bool {
        matches_service(integration, &self.database_services)
    }

    pub fn is_local(&self, integration: &str) -> bool {
        matches_service(integration, &self.local_services)
    }

    pub fn is_payment(&self, integration: &str) -> bool {
        matches_service(integration, &self.payment_services)
    }

    pub fn mentions_transform(&self, narrative: &str) -> bool {
        mentions_any(narrative, &self.transform_vocabulary)
    }
}

/// Case-insensitive substring match of a service name against a list.
pub fn matches_service(integration: &str, list: &[String]) -> bool {
    let needle = integration.to_lowercase();
    list.iter().any(|p| needle.contains(&p.to_lowercase()))
}

/// True if any word of `text` starts with one of `stems`.
///
/// Word-level so that `format` does not fire on "information".
pub fn mentions_any(text: &str, stems: &[String]) -> bool {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .any(|w| stems.iter().any(|s| w.starts_with(&s.to_lowercase())))
}

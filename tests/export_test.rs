use flowsmith::dsl::builder::RequestBuilder;
use flowsmith::export::{self, ExportFormat};
use flowsmith::generative::DisabledClient;
use flowsmith::runtime::engine::Engine;
use flowsmith::runtime::graph::ConnectionTarget;
use flowsmith::runtime::ids::SequentialIds;
use flowsmith::runtime::package::GeneratedPackage;
use flowsmith::runtime::storage::InMemoryPackageCache;
use serde_json::json;
use std::sync::Arc;

fn package() -> GeneratedPackage {
    let request = RequestBuilder::new("Payment alerts")
        .inbound_request()
        .integrations(["Stripe", "Slack"])
        .narrative("format each payment and post it")
        .build();
    Engine::new(Arc::new(InMemoryPackageCache::new()), Arc::new(DisabledClient))
        .with_ids(Arc::new(SequentialIds::new("n")))
        .fallback_package(&request)
}

#[test]
fn test_format_names_parse() {
    assert_eq!("summary".parse::<ExportFormat>(), Ok(ExportFormat::Summary));
    assert_eq!("Setup".parse::<ExportFormat>(), Ok(ExportFormat::SetupGuide));
    assert_eq!("setup-guide".parse::<ExportFormat>(), Ok(ExportFormat::SetupGuide));
    assert_eq!("docs".parse::<ExportFormat>(), Ok(ExportFormat::Documentation));
    assert!("pdf".parse::<ExportFormat>().is_err());

    for format in [
        ExportFormat::Summary,
        ExportFormat::Detailed,
        ExportFormat::SetupGuide,
        ExportFormat::Troubleshooting,
        ExportFormat::Documentation,
    ] {
        assert_eq!(format.to_string().parse::<ExportFormat>(), Ok(format));
    }
}

#[test]
fn test_summary_lists_flow_and_tier() {
    let text = export::render(&package(), ExportFormat::Summary);
    assert!(text.starts_with("# Payment alerts"));
    assert!(text.contains("Complexity: simple"));
    assert!(text.contains("Webhook -> Stripe -> Slack -> Transform Data"));
}

#[test]
fn test_detailed_includes_connections_and_sections() {
    let text = export::render(&package(), ExportFormat::Detailed);
    assert!(text.contains("## Nodes"));
    assert!(text.contains("- Webhook -> Stripe [port 0]"));
    assert!(text.contains("## Security considerations"));
    assert!(text.contains("Webhook endpoint is publicly reachable"));
}

#[test]
fn test_setup_guide_numbers_steps_and_marks_optional_credentials() {
    let package = package();
    let text = export::render(&package, ExportFormat::SetupGuide);
    assert!(text.contains("1. Import the \"Payment alerts\" workflow JSON"));
    assert!(text.contains("httpHeaderAuth, optional"));
    assert!(text.contains(&format!("{}. Activate the workflow", package.setup_steps.len())));
}

#[test]
fn test_troubleshooting_has_tip_per_non_manual_node() {
    let text = export::render(&package(), ExportFormat::Troubleshooting);
    assert!(text.contains("- Webhook: 404"));
    assert!(text.contains("- Stripe: 401/403"));
    assert!(text.contains("- Transform Data: Check the node's input items"));
}

#[test]
fn test_documentation_mentions_every_node_id() {
    let package = package();
    let text = export::render(&package, ExportFormat::Documentation);
    for node in &package.graph.nodes {
        assert!(text.contains(&format!("- id: `{}`", node.id)));
    }
    assert!(text.contains("Generated with 0 tokens"));
}

#[test]
fn test_import_document_keys_connections_by_name() {
    let package = package();
    let doc = export::import_document(&package.name, &package.graph);

    assert_eq!(doc["name"], json!("Payment alerts"));
    assert_eq!(doc["nodes"].as_array().map(Vec::len), Some(4));
    assert_eq!(doc["nodes"][0]["type"], json!("n8n-nodes-base.webhook"));
    assert_eq!(doc["nodes"][0]["position"], json!([240, 300]));
    assert_eq!(
        doc["connections"]["Webhook"],
        json!({ "main": [[{ "node": "Stripe", "type": "main", "index": 0 }]] })
    );
    assert!(doc["connections"].get("Transform Data").is_none());
    assert!(doc["nodes"][1]["credentials"]["stripeApi"].is_object());
}

#[test]
fn test_import_document_drops_out_of_range_ports_without_panicking() {
    let mut graph = package().graph;
    let first = graph.nodes[0].id.clone();
    let second = graph.nodes[1].id.clone();
    graph.connections.insert(
        first,
        vec![
            ConnectionTarget { node: second.clone(), port: usize::MAX },
            ConnectionTarget { node: second, port: 0 },
        ],
    );
    assert!(graph.validate().is_err());

    let doc = export::import_document("unchecked", &graph);
    assert_eq!(
        doc["connections"]["Webhook"],
        json!({ "main": [[{ "node": "Stripe", "type": "main", "index": 0 }]] })
    );
}

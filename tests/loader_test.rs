use flowsmith::compiler::loader::load_request_from_yaml;
use flowsmith::dsl::TriggerKind;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_yaml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_request() {
    let file = write_yaml(
        r#"
name: Lead intake
triggerKind: inbound-request
triggerDetail: POST from the landing page form
integrations:
  - HubSpot
  - Slack
actionNarrative: Create a contact and notify sales
additionalContext: Leads arrive in bursts after campaigns
specificRequirements:
  - Deduplicate on email
goals:
  - Respond within five minutes
"#,
    );

    let request = load_request_from_yaml(file.path().to_str().unwrap()).unwrap();
    assert_eq!(request.name, "Lead intake");
    assert_eq!(request.trigger_kind, TriggerKind::InboundRequest);
    assert_eq!(request.integrations, vec!["HubSpot", "Slack"]);
    assert_eq!(request.specific_requirements.len(), 1);
    assert_eq!(request.goals.len(), 1);
}

#[test]
fn test_optional_fields_default_and_aliases() {
    let file = write_yaml(
        r#"
name: Nightly export
triggerKind: cron
integrations: [PostgreSQL]
actionNarrative: Dump yesterday's orders
"#,
    );

    let request = load_request_from_yaml(file.path().to_str().unwrap()).unwrap();
    assert_eq!(request.trigger_kind, TriggerKind::Scheduled);
    assert_eq!(request.trigger_detail, None);
    assert!(request.additional_context.is_empty());
    assert!(request.goals.is_empty());
    assert!(request.uses_default_schedule());
}

#[test]
fn test_unknown_trigger_kind_is_an_error() {
    let file = write_yaml(
        r#"
name: Broken
triggerKind: sometimes
integrations: [Slack]
actionNarrative: Post
"#,
    );
    assert!(load_request_from_yaml(file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let err = load_request_from_yaml("/nonexistent/request.yaml").unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read YAML file"));
}

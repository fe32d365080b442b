use flowsmith::dsl::builder::RequestBuilder;
use flowsmith::dsl::{MAX_INTEGRATIONS, TriggerKind};
use flowsmith::error::RequestError;

#[test]
fn test_builder_defaults_to_ad_hoc() {
    let request = RequestBuilder::new("plain").integration("Slack").narrative("post").build();
    assert_eq!(request.trigger_kind, TriggerKind::AdHoc);
    assert_eq!(request.trigger_detail, None);
    assert!(request.validate().is_ok());
}

#[test]
fn test_normalized_trims_and_dedupes() {
    let request = RequestBuilder::new("  messy  ")
        .scheduled()
        .trigger_detail("   ")
        .integrations([" Slack", "slack", "", "Notion "])
        .narrative("  post updates ")
        .requirement(" ")
        .goal(" save time ")
        .build()
        .normalized();

    assert_eq!(request.name, "messy");
    assert_eq!(request.trigger_detail, None);
    assert_eq!(request.integrations, vec!["Slack", "Notion"]);
    assert_eq!(request.action_narrative, "post updates");
    assert!(request.specific_requirements.is_empty());
    assert_eq!(request.goals, vec!["save time"]);
    assert!(request.uses_default_schedule());
}

#[test]
fn test_validate_limits() {
    let at_limit = RequestBuilder::new("max")
        .integrations((0..MAX_INTEGRATIONS).map(|i| format!("svc {}", i)))
        .narrative("go")
        .build();
    assert!(at_limit.validate().is_ok());

    let over = RequestBuilder::new("over")
        .integrations((0..=MAX_INTEGRATIONS).map(|i| format!("svc {}", i)))
        .narrative("go")
        .build();
    assert_eq!(
        over.validate(),
        Err(RequestError::TooManyIntegrations(MAX_INTEGRATIONS + 1))
    );

    let empty = RequestBuilder::new("empty").narrative("go").build();
    assert_eq!(empty.validate(), Err(RequestError::NoIntegrations));

    let mute = RequestBuilder::new("mute").integration("Slack").build();
    assert_eq!(mute.validate(), Err(RequestError::EmptyNarrative));
}

#[test]
fn test_cache_key_ignores_integration_order_and_case() {
    let a = RequestBuilder::new("sync")
        .integrations(["Slack", "Notion"])
        .narrative("copy pages")
        .build();
    let b = RequestBuilder::new("sync ")
        .integrations(["notion", "Slack"])
        .narrative("copy pages")
        .build();
    assert_eq!(a.cache_key("p", "ns"), b.cache_key("p", "ns"));
}

#[test]
fn test_cache_key_shape_and_separation() {
    let request = RequestBuilder::new("sync")
        .integration("Slack")
        .narrative("copy pages")
        .build();
    let key = request.cache_key("flowsmith:package", "team-a");

    let digest = key.strip_prefix("flowsmith:package:team-a:").expect("prefix and namespace");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));

    assert_ne!(key, request.cache_key("flowsmith:package", "team-b"));

    let mut changed = request.clone();
    changed.action_narrative = "copy pages daily".to_string();
    assert_ne!(key, changed.cache_key("flowsmith:package", "team-a"));

    let mut retriggered = request.clone();
    retriggered.trigger_kind = TriggerKind::Scheduled;
    assert_ne!(key, retriggered.cache_key("flowsmith:package", "team-a"));
}

#[test]
fn test_trigger_kind_serde_names() {
    assert_eq!(serde_json::to_string(&TriggerKind::InboundRequest).unwrap(), "\"inbound-request\"");
    let parsed: TriggerKind = serde_json::from_str("\"webhook\"").unwrap();
    assert_eq!(parsed, TriggerKind::InboundRequest);
    let parsed: TriggerKind = serde_json::from_str("\"manual\"").unwrap();
    assert_eq!(parsed, TriggerKind::AdHoc);
    assert_eq!(TriggerKind::Scheduled.to_string(), "scheduled");
}

#[test]
fn test_unreadable_schedule_detail_uses_default() {
    let readable = RequestBuilder::new("s").scheduled().trigger_detail("every 2 hours").build();
    assert!(!readable.uses_default_schedule());

    let unreadable = RequestBuilder::new("s").scheduled().trigger_detail("whenever sales asks").build();
    assert!(unreadable.uses_default_schedule());

    let webhook = RequestBuilder::new("s").inbound_request().build();
    assert!(!webhook.uses_default_schedule());
}

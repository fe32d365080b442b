use anyhow::{Result, anyhow};
use async_trait::async_trait;
use flowsmith::dsl::WorkflowRequest;
use flowsmith::dsl::builder::RequestBuilder;
use flowsmith::error::{GenerationFailure, PayloadError, RequestError};
use flowsmith::generative::{Completion, DisabledClient, GenerativeClient};
use flowsmith::runtime::engine::{Engine, EngineSettings, PackageSource};
use flowsmith::runtime::ids::SequentialIds;
use flowsmith::runtime::package::GeneratedPackage;
use flowsmith::runtime::storage::{InMemoryPackageCache, PackageCache};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// --- Fakes ---

struct ScriptedClient {
    text: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn slow(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(text)
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeClient for ScriptedClient {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Completion {
            text: self.text.clone(),
            tokens_used: 321,
        })
    }
}

struct BrokenCache;

#[async_trait]
impl PackageCache for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<GeneratedPackage>> {
        Err(anyhow!("connection refused"))
    }

    async fn put(&self, _key: &str, _package: &GeneratedPackage, _ttl: Duration) -> Result<()> {
        Err(anyhow!("connection refused"))
    }
}

fn valid_payload() -> String {
    let body = json!({
        "workflow": {
            "nodes": [
                { "id": "t", "displayName": "Manual Trigger", "kind": "n8n-nodes-base.manualTrigger", "position": { "x": 0, "y": 0 } },
                { "id": "s", "displayName": "Slack", "kind": "n8n-nodes-base.slack", "credentialRef": "slackOAuth2Api", "position": { "x": 220, "y": 0 } }
            ],
            "connections": { "t": [{ "node": "s" }] }
        },
        "analysis": {
            "nodeCount": 2,
            "connectionCount": 1,
            "complexityTier": "simple",
            "estimatedExecutionSeconds": 9,
            "potentialIssues": [],
            "optimizationSuggestions": [],
            "securityConsiderations": [],
            "scalabilityNotes": []
        },
        "setupSteps": ["Connect Slack"]
    });
    format!("```json\n{}\n```", body)
}

fn request() -> WorkflowRequest {
    RequestBuilder::new("notify")
        .ad_hoc()
        .integration("Slack")
        .narrative("post a message")
        .build()
}

fn engine(cache: Arc<dyn PackageCache>, generator: Arc<dyn GenerativeClient>) -> Engine {
    Engine::new(cache, generator).with_ids(Arc::new(SequentialIds::new("id")))
}

// --- Tests ---

#[tokio::test]
async fn test_valid_generative_payload_is_used() {
    let client = Arc::new(ScriptedClient::new(valid_payload()));
    let engine = engine(Arc::new(InMemoryPackageCache::new()), client.clone());

    let outcome = engine.generate("ws", &request()).await.unwrap();
    assert!(matches!(outcome.source, PackageSource::Generated));
    assert_eq!(outcome.package.tokens_used, 321);
    assert_eq!(outcome.package.setup_steps, vec!["Connect Slack".to_string()]);
    // Derived from the graph because the payload left them out.
    assert_eq!(outcome.package.credential_requirements.len(), 1);
    assert_eq!(outcome.package.credential_requirements[0].credential_class, "slackOAuth2Api");
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_cache_hit_returns_stored_package_without_generating() {
    let client = Arc::new(ScriptedClient::new(valid_payload()));
    let engine = engine(Arc::new(InMemoryPackageCache::new()), client.clone());

    let first = engine.generate("ws", &request()).await.unwrap();
    let second = engine.generate("ws", &request()).await.unwrap();

    assert!(matches!(second.source, PackageSource::Cache));
    assert_eq!(first.package, second.package);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_namespaces_do_not_share_entries() {
    let client = Arc::new(ScriptedClient::new(valid_payload()));
    let engine = engine(Arc::new(InMemoryPackageCache::new()), client.clone());

    engine.generate("alice", &request()).await.unwrap();
    let other = engine.generate("bob", &request()).await.unwrap();
    assert!(matches!(other.source, PackageSource::Generated));
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_slow_service_times_out_into_fallback() {
    let client = Arc::new(ScriptedClient::slow(valid_payload(), Duration::from_secs(5)));
    let engine = engine(Arc::new(InMemoryPackageCache::new()), client).with_settings(EngineSettings {
        generation_timeout: Duration::from_millis(50),
        ..EngineSettings::default()
    });

    let outcome = engine.generate("ws", &request()).await.unwrap();
    assert!(matches!(
        outcome.source,
        PackageSource::Fallback(GenerationFailure::Timeout(_))
    ));
    assert_eq!(outcome.package.tokens_used, 0);
    assert_eq!(outcome.package.graph.node_count(), 2);
}

#[tokio::test]
async fn test_malformed_text_falls_back_and_is_cached() {
    let client = Arc::new(ScriptedClient::new("Sorry, here is a partial answer: {\"workflow\": {"));
    let cache = Arc::new(InMemoryPackageCache::new());
    let engine = engine(cache.clone(), client.clone());

    let outcome = engine.generate("ws", &request()).await.unwrap();
    assert!(matches!(
        outcome.source,
        PackageSource::Fallback(GenerationFailure::Payload(PayloadError::Malformed(_)))
    ));
    assert_eq!(cache.len(), 1);

    let again = engine.generate("ws", &request()).await.unwrap();
    assert!(matches!(again.source, PackageSource::Cache));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_service_error_falls_back() {
    let engine = engine(Arc::new(InMemoryPackageCache::new()), Arc::new(DisabledClient));
    let outcome = engine.generate("ws", &request()).await.unwrap();
    match outcome.source {
        PackageSource::Fallback(GenerationFailure::Service(msg)) => {
            assert!(msg.contains("not configured"));
        }
        other => panic!("expected service failure, got {:?}", other),
    }
    assert!(!outcome.package.setup_steps.is_empty());
}

#[tokio::test]
async fn test_broken_cache_never_fails_the_request() {
    let client = Arc::new(ScriptedClient::new(valid_payload()));
    let engine = engine(Arc::new(BrokenCache), client.clone());

    let outcome = engine.generate("ws", &request()).await.unwrap();
    assert!(matches!(outcome.source, PackageSource::Generated));

    let fallback = Engine::new(Arc::new(BrokenCache), Arc::new(DisabledClient))
        .generate("ws", &request())
        .await
        .unwrap();
    assert!(fallback.source.is_fallback());
}

#[tokio::test]
async fn test_invalid_requests_are_rejected_before_generation() {
    let client = Arc::new(ScriptedClient::new(valid_payload()));
    let engine = engine(Arc::new(InMemoryPackageCache::new()), client.clone());

    let no_integrations = RequestBuilder::new("x").narrative("do it").build();
    assert_eq!(
        engine.generate("ws", &no_integrations).await.unwrap_err(),
        RequestError::NoIntegrations
    );

    let blank = RequestBuilder::new("x").integrations(["  ", ""]).narrative("do it").build();
    assert_eq!(
        engine.generate("ws", &blank).await.unwrap_err(),
        RequestError::NoIntegrations
    );

    let no_narrative = RequestBuilder::new("x").integration("Slack").narrative("   ").build();
    assert_eq!(
        engine.generate("ws", &no_narrative).await.unwrap_err(),
        RequestError::EmptyNarrative
    );

    let too_many = RequestBuilder::new("x")
        .integrations((0..21).map(|i| format!("Service {}", i)))
        .narrative("do it")
        .build();
    assert_eq!(
        engine.generate("ws", &too_many).await.unwrap_err(),
        RequestError::TooManyIntegrations(21)
    );

    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_fallback_package_matches_synthesized_graph() {
    let engine = engine(Arc::new(InMemoryPackageCache::new()), Arc::new(DisabledClient));
    let request = RequestBuilder::new("hook")
        .inbound_request()
        .integrations(["Stripe", "Slack"])
        .narrative("announce each payment")
        .build();

    let outcome = engine.generate("ws", &request).await.unwrap();
    let package = outcome.package;
    assert_eq!(package.analysis.node_count, package.graph.node_count());
    assert_eq!(package.analysis.connection_count, package.graph.connection_count());
    package.graph.validate().unwrap();
    assert!(
        package
            .credential_requirements
            .iter()
            .any(|c| c.credential_class == "httpHeaderAuth")
    );
    assert_eq!(package.setup_steps.last().map(String::as_str), Some("Activate the workflow"));
}

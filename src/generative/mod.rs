pub mod http;
pub mod payload;
pub mod prompt;

use async_trait::async_trait;
use anyhow::Result;

/// Raw text returned by the generative service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub tokens_used: u32,
}

/// External text-generation service. The orchestrator bounds every call with
/// its own timeout; implementations must not retry.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<Completion>;
}

/// Client for deployments without a generative service. Every call fails,
/// which sends the orchestrator straight to the fallback path.
#[derive(Debug, Default)]
pub struct DisabledClient;

#[async_trait]
impl GenerativeClient for DisabledClient {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<Completion> {
        Err(anyhow::anyhow!("generative service is not configured"))
    }
}

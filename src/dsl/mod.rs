pub mod builder;

use crate::compiler::trigger::Schedule;
use crate::error::RequestError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

pub const MAX_INTEGRATIONS: usize = 20;

/// How a workflow is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerKind {
    #[serde(alias = "schedule", alias = "cron")]
    Scheduled,
    #[serde(alias = "webhook")]
    InboundRequest,
    #[serde(alias = "manual")]
    AdHoc,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerKind::Scheduled => write!(f, "scheduled"),
            TriggerKind::InboundRequest => write!(f, "inbound-request"),
            TriggerKind::AdHoc => write!(f, "ad-hoc"),
        }
    }
}

/// A free-text description of the automation to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRequest {
    pub name: String,
    pub trigger_kind: TriggerKind,
    #[serde(default)]
    pub trigger_detail: Option<String>,
    pub integrations: Vec<String>,
    pub action_narrative: String,
    #[serde(default)]
    pub additional_context: String,
    #[serde(default)]
    pub specific_requirements: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
}

impl WorkflowRequest {
    /// Trims every text field, drops blank entries and removes duplicate
    /// integrations (case-insensitive, first occurrence wins).
    pub fn normalized(&self) -> WorkflowRequest {
        let mut seen = HashSet::new();
        let integrations = self
            .integrations
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.to_lowercase()))
            .map(str::to_string)
            .collect();

        WorkflowRequest {
            name: self.name.trim().to_string(),
            trigger_kind: self.trigger_kind,
            trigger_detail: self
                .trigger_detail
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            integrations,
            action_narrative: self.action_narrative.trim().to_string(),
            additional_context: self.additional_context.trim().to_string(),
            specific_requirements: trimmed_list(&self.specific_requirements),
            goals: trimmed_list(&self.goals),
        }
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.integrations.iter().all(|s| s.trim().is_empty()) {
            return Err(RequestError::NoIntegrations);
        }
        if self.integrations.len() > MAX_INTEGRATIONS {
            return Err(RequestError::TooManyIntegrations(self.integrations.len()));
        }
        if self.action_narrative.trim().is_empty() {
            return Err(RequestError::EmptyNarrative);
        }
        Ok(())
    }

    /// A scheduled trigger whose detail is missing or could not be read, so
    /// the trigger runs on the default daily schedule.
    pub fn uses_default_schedule(&self) -> bool {
        self.trigger_kind == TriggerKind::Scheduled
            && self
                .trigger_detail
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .and_then(Schedule::parse)
                .is_none()
    }

    /// Cache key for this request within `namespace`.
    ///
    /// Integrations are compared case-insensitively and in sorted order, so
    /// two requests naming the same services in a different order share a key.
    pub fn cache_key(&self, prefix: &str, namespace: &str) -> String {
        let request = self.normalized();
        let mut integrations: Vec<String> = request
            .integrations
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        integrations.sort();

        let canonical = json!({
            "name": request.name,
            "triggerKind": request.trigger_kind,
            "triggerDetail": request.trigger_detail,
            "integrations": integrations,
            "actionNarrative": request.action_narrative,
            "additionalContext": request.additional_context,
            "specificRequirements": request.specific_requirements,
            "goals": request.goals,
        });

        let digest = Sha256::digest(canonical.to_string().as_bytes());
        format!("{}:{}:{}", prefix, namespace, hex::encode(digest))
    }
}

fn trimmed_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

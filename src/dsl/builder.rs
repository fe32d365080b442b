use crate::dsl::{TriggerKind, WorkflowRequest};

pub struct RequestBuilder {
    name: String,
    trigger_kind: TriggerKind,
    trigger_detail: Option<String>,
    integrations: Vec<String>,
    action_narrative: String,
    additional_context: String,
    specific_requirements: Vec<String>,
    goals: Vec<String>,
}

impl RequestBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trigger_kind: TriggerKind::AdHoc,
            trigger_detail: None,
            integrations: Vec::new(),
            action_narrative: String::new(),
            additional_context: String::new(),
            specific_requirements: Vec::new(),
            goals: Vec::new(),
        }
    }

    pub fn scheduled(mut self) -> Self {
        self.trigger_kind = TriggerKind::Scheduled;
        self
    }

    pub fn inbound_request(mut self) -> Self {
        self.trigger_kind = TriggerKind::InboundRequest;
        self
    }

    pub fn ad_hoc(mut self) -> Self {
        self.trigger_kind = TriggerKind::AdHoc;
        self
    }

    pub fn trigger(mut self, kind: TriggerKind) -> Self {
        self.trigger_kind = kind;
        self
    }

    pub fn trigger_detail(mut self, detail: &str) -> Self {
        self.trigger_detail = Some(detail.to_string());
        self
    }

    pub fn integration(mut self, name: &str) -> Self {
        self.integrations.push(name.to_string());
        self
    }

    pub fn integrations<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.integrations.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn narrative(mut self, text: &str) -> Self {
        self.action_narrative = text.to_string();
        self
    }

    pub fn context(mut self, text: &str) -> Self {
        self.additional_context = text.to_string();
        self
    }

    pub fn requirement(mut self, text: &str) -> Self {
        self.specific_requirements.push(text.to_string());
        self
    }

    pub fn goal(mut self, text: &str) -> Self {
        self.goals.push(text.to_string());
        self
    }

    pub fn build(self) -> WorkflowRequest {
        WorkflowRequest {
            name: self.name,
            trigger_kind: self.trigger_kind,
            trigger_detail: self.trigger_detail,
            integrations: self.integrations,
            action_narrative: self.action_narrative,
            additional_context: self.additional_context,
            specific_requirements: self.specific_requirements,
            goals: self.goals,
        }
    }
}

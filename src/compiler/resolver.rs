//! Integration name to runtime node type.
//!
//! Rules are matched case-insensitively by substring, first match wins. A rule
//! whose pattern contains another rule's pattern (`google sheets` vs `google`)
//! must come first; `tests/resolver_test.rs` enforces this over the whole table.

use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const GENERIC_KIND: &str = "n8n-nodes-base.httpRequest";

#[derive(Debug, Clone, PartialEq)]
pub struct NodeTypeBinding {
    pub kind: &'static str,
    pub type_version: u32,
    pub default_parameters: BTreeMap<String, Value>,
    pub credential_class: Option<&'static str>,
    /// No rule matched and the generic HTTP binding was used.
    pub generic: bool,
}

#[derive(Debug)]
pub struct NodeRule {
    pub patterns: &'static [&'static str],
    pub binding: NodeTypeBinding,
}

impl NodeRule {
    fn matches(&self, needle: &str) -> bool {
        self.patterns.iter().any(|p| needle.contains(p))
    }
}

fn rule(
    patterns: &'static [&'static str],
    kind: &'static str,
    type_version: u32,
    credential_class: Option<&'static str>,
    parameters: Value,
) -> NodeRule {
    NodeRule {
        patterns,
        binding: NodeTypeBinding {
            kind,
            type_version,
            default_parameters: into_map(parameters),
            credential_class,
            generic: false,
        },
    }
}

fn into_map(value: Value) -> BTreeMap<String, Value> {
    match value {
        Value::Object(obj) => obj.into_iter().collect(),
        _ => BTreeMap::new(),
    }
}

static RULES: LazyLock<Vec<NodeRule>> = LazyLock::new(|| {
    vec![
        // --- Google family: specific products before the bare vendor ---
        rule(
            &["google sheets", "gsheets", "google sheet"],
            "n8n-nodes-base.googleSheets",
            4,
            Some("googleSheetsOAuth2Api"),
            json!({ "operation": "append", "documentId": "", "sheetName": "Sheet1" }),
        ),
        rule(
            &["google drive"],
            "n8n-nodes-base.googleDrive",
            3,
            Some("googleDriveOAuth2Api"),
            json!({ "operation": "upload", "folderId": "" }),
        ),
        rule(
            &["google calendar"],
            "n8n-nodes-base.googleCalendar",
            1,
            Some("googleCalendarOAuth2Api"),
            json!({ "operation": "create", "calendar": "primary" }),
        ),
        rule(
            &["gmail", "google mail"],
            "n8n-nodes-base.gmail",
            2,
            Some("gmailOAuth2"),
            json!({ "operation": "send", "sendTo": "", "subject": "" }),
        ),
        rule(
            &["google"],
            GENERIC_KIND,
            4,
            Some("googleApi"),
            json!({ "method": "GET", "url": "https://www.googleapis.com/" }),
        ),
        // --- Messaging ---
        rule(
            &["slack"],
            "n8n-nodes-base.slack",
            2,
            Some("slackOAuth2Api"),
            json!({ "resource": "message", "operation": "post", "channel": "#general", "text": "={{ $json.message }}" }),
        ),
        rule(
            &["discord"],
            "n8n-nodes-base.discord",
            2,
            Some("discordWebhookApi"),
            json!({ "content": "={{ $json.message }}" }),
        ),
        rule(
            &["microsoft teams", "ms teams"],
            "n8n-nodes-base.microsoftTeams",
            2,
            Some("microsoftTeamsOAuth2Api"),
            json!({ "resource": "channelMessage", "operation": "create" }),
        ),
        rule(
            &["microsoft excel", "excel"],
            "n8n-nodes-base.microsoftExcel",
            2,
            Some("microsoftExcelOAuth2Api"),
            json!({ "operation": "append" }),
        ),
        rule(
            &["outlook"],
            "n8n-nodes-base.microsoftOutlook",
            2,
            Some("microsoftOutlookOAuth2Api"),
            json!({ "operation": "send" }),
        ),
        rule(
            &["telegram"],
            "n8n-nodes-base.telegram",
            1,
            Some("telegramApi"),
            json!({ "operation": "sendMessage", "chatId": "" }),
        ),
        rule(
            &["twilio", "sms"],
            "n8n-nodes-base.twilio",
            1,
            Some("twilioApi"),
            json!({ "operation": "send", "from": "", "to": "" }),
        ),
        rule(
            &["mailchimp"],
            "n8n-nodes-base.mailchimp",
            1,
            Some("mailchimpApi"),
            json!({ "resource": "member", "operation": "create" }),
        ),
        rule(
            &["email", "smtp", "mail"],
            "n8n-nodes-base.emailSend",
            2,
            Some("smtp"),
            json!({ "fromEmail": "", "toEmail": "", "subject": "" }),
        ),
        // --- Payments and commerce ---
        rule(
            &["stripe"],
            "n8n-nodes-base.stripe",
            1,
            Some("stripeApi"),
            json!({ "resource": "charge", "operation": "getAll" }),
        ),
        rule(
            &["paypal"],
            "n8n-nodes-base.payPal",
            1,
            Some("payPalApi"),
            json!({ "resource": "payout", "operation": "get" }),
        ),
        rule(
            &["shopify"],
            "n8n-nodes-base.shopify",
            1,
            Some("shopifyAccessTokenApi"),
            json!({ "resource": "order", "operation": "getAll" }),
        ),
        // --- CRM ---
        rule(
            &["salesforce"],
            "n8n-nodes-base.salesforce",
            1,
            Some("salesforceOAuth2Api"),
            json!({ "resource": "lead", "operation": "create" }),
        ),
        rule(
            &["hubspot"],
            "n8n-nodes-base.hubspot",
            2,
            Some("hubspotOAuth2Api"),
            json!({ "resource": "contact", "operation": "upsert" }),
        ),
        rule(
            &["pipedrive"],
            "n8n-nodes-base.pipedrive",
            1,
            Some("pipedriveApi"),
            json!({ "resource": "deal", "operation": "create" }),
        ),
        // --- Databases ---
        rule(
            &["postgresql", "postgres"],
            "n8n-nodes-base.postgres",
            2,
            Some("postgres"),
            json!({ "operation": "insert", "schema": "public", "table": "" }),
        ),
        rule(
            &["mysql"],
            "n8n-nodes-base.mySql",
            2,
            Some("mySql"),
            json!({ "operation": "insert", "table": "" }),
        ),
        rule(
            &["mongodb", "mongo"],
            "n8n-nodes-base.mongoDb",
            1,
            Some("mongoDb"),
            json!({ "operation": "insert", "collection": "" }),
        ),
        rule(
            &["redis"],
            "n8n-nodes-base.redis",
            1,
            Some("redis"),
            json!({ "operation": "set", "key": "" }),
        ),
        rule(
            &["supabase"],
            "n8n-nodes-base.supabase",
            1,
            Some("supabaseApi"),
            json!({ "operation": "create", "tableId": "" }),
        ),
        // --- Productivity ---
        rule(
            &["airtable"],
            "n8n-nodes-base.airtable",
            2,
            Some("airtableTokenApi"),
            json!({ "operation": "append", "base": "", "table": "" }),
        ),
        rule(
            &["notion"],
            "n8n-nodes-base.notion",
            2,
            Some("notionApi"),
            json!({ "resource": "databasePage", "operation": "create" }),
        ),
        rule(
            &["trello"],
            "n8n-nodes-base.trello",
            1,
            Some("trelloApi"),
            json!({ "operation": "create", "listId": "" }),
        ),
        rule(
            &["asana"],
            "n8n-nodes-base.asana",
            1,
            Some("asanaApi"),
            json!({ "operation": "create", "workspace": "" }),
        ),
        rule(
            &["jira"],
            "n8n-nodes-base.jira",
            1,
            Some("jiraSoftwareCloudApi"),
            json!({ "resource": "issue", "operation": "create" }),
        ),
        rule(
            &["github"],
            "n8n-nodes-base.github",
            1,
            Some("githubApi"),
            json!({ "resource": "issue", "operation": "create" }),
        ),
        rule(
            &["gitlab"],
            "n8n-nodes-base.gitlab",
            1,
            Some("gitlabApi"),
            json!({ "resource": "issue", "operation": "create" }),
        ),
        rule(
            &["dropbox"],
            "n8n-nodes-base.dropbox",
            1,
            Some("dropboxOAuth2Api"),
            json!({ "operation": "upload", "path": "" }),
        ),
        rule(
            &["openai", "chatgpt", "gpt"],
            "@n8n/n8n-nodes-langchain.openAi",
            1,
            Some("openAiApi"),
            json!({ "resource": "text", "operation": "message" }),
        ),
    ]
});

fn generic_binding() -> NodeTypeBinding {
    NodeTypeBinding {
        kind: GENERIC_KIND,
        type_version: 4,
        default_parameters: into_map(json!({ "method": "POST", "url": "", "options": {} })),
        credential_class: None,
        generic: true,
    }
}

/// The ordered rule table.
pub fn rules() -> &'static [NodeRule] {
    &RULES
}

/// Maps an integration name to its runtime node binding. Total: unknown names
/// resolve to the generic HTTP request binding.
pub fn resolve(integration_name: &str) -> NodeTypeBinding {
    let needle = integration_name.trim().to_lowercase();
    RULES
        .iter()
        .find(|r| r.matches(&needle))
        .map(|r| r.binding.clone())
        .unwrap_or_else(generic_binding)
}

use crate::dsl::TriggerKind;
use crate::runtime::graph::{NodeDescriptor, Position};
use crate::runtime::ids::IdGenerator;
use serde_json::{Value, json};
use std::collections::BTreeMap;

pub const SCHEDULE_KIND: &str = "n8n-nodes-base.scheduleTrigger";
pub const WEBHOOK_KIND: &str = "n8n-nodes-base.webhook";
pub const MANUAL_KIND: &str = "n8n-nodes-base.manualTrigger";

pub const DEFAULT_CRON: &str = "0 9 * * *";

/// Interpreted schedule detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Cron(String),
    Minutes(u32),
    Hours(u32),
    Days { every: u32, hour: u32, minute: u32 },
    Weeks(u32),
}

impl Schedule {
    /// Best effort reading of a free-text schedule. Returns `None` for text
    /// that is not understood.
    pub fn parse(detail: &str) -> Option<Schedule> {
        let text = detail.trim().to_lowercase();

        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() == 5
            && fields
                .iter()
                .all(|f| f.chars().all(|c| c.is_ascii_digit() || "*/,-".contains(c)))
        {
            return Some(Schedule::Cron(fields.join(" ")));
        }

        let words: Vec<&str> = text
            .split(|c: char| !c.is_ascii_alphanumeric() && c != ':')
            .filter(|w| !w.is_empty())
            .collect();

        if let Some(pos) = words.iter().position(|w| *w == "every") {
            let (count, unit) = match (words.get(pos + 1), words.get(pos + 2)) {
                (Some(n), Some(unit)) if n.parse::<u32>().is_ok() => {
                    (n.parse::<u32>().unwrap_or(1), *unit)
                }
                (Some(unit), _) => (1, *unit),
                _ => return None,
            };
            let count = count.max(1);
            return match unit.trim_end_matches('s') {
                "minute" | "min" => Some(Schedule::Minutes(count)),
                "hour" => Some(Schedule::Hours(count)),
                "day" => {
                    let (hour, minute) = time_of_day(&words).unwrap_or((9, 0));
                    Some(Schedule::Days { every: count, hour, minute })
                }
                "week" => Some(Schedule::Weeks(count)),
                _ => None,
            };
        }

        if words.contains(&"hourly") {
            return Some(Schedule::Hours(1));
        }
        if words.contains(&"weekly") {
            return Some(Schedule::Weeks(1));
        }
        if words.contains(&"daily") || words.contains(&"day") || time_of_day(&words).is_some() {
            let (hour, minute) = time_of_day(&words).unwrap_or((9, 0));
            return Some(Schedule::Days { every: 1, hour, minute });
        }
        None
    }

    fn to_rule(&self) -> Value {
        let interval = match self {
            Schedule::Cron(expr) => json!({ "field": "cronExpression", "expression": expr }),
            Schedule::Minutes(n) => json!({ "field": "minutes", "minutesInterval": n }),
            Schedule::Hours(n) => json!({ "field": "hours", "hoursInterval": n }),
            Schedule::Days { every, hour, minute } => json!({
                "field": "days",
                "daysInterval": every,
                "triggerAtHour": hour,
                "triggerAtMinute": minute,
            }),
            Schedule::Weeks(n) => json!({ "field": "weeks", "weeksInterval": n }),
        };
        json!({ "interval": [interval] })
    }
}

/// Finds `at HH:MM`, `HH:MM` or `9am`/`5pm` in the word list.
fn time_of_day(words: &[&str]) -> Option<(u32, u32)> {
    for w in words {
        if let Some((h, m)) = w.split_once(':') {
            if let (Ok(h), Ok(m)) = (h.parse::<u32>(), m.parse::<u32>()) {
                if h < 24 && m < 60 {
                    return Some((h, m));
                }
            }
        }
        for (suffix, offset) in [("am", 0), ("pm", 12)] {
            if let Some(h) = w.strip_suffix(suffix).and_then(|h| h.parse::<u32>().ok()) {
                if (1..=12).contains(&h) {
                    return Some(((h % 12) + offset, 0));
                }
            }
        }
    }
    None
}

/// `GET` as the leading word (any case) or as an upper-case verb anywhere,
/// e.g. "GET from the status page" or "a GET request". Ordinary prose like
/// "we get notified" does not count.
fn names_get_method(detail: &str) -> bool {
    let mut words = detail.split(|c: char| !c.is_ascii_alphanumeric()).filter(|w| !w.is_empty());
    words.next().is_some_and(|w| w.eq_ignore_ascii_case("get")) || words.any(|w| w == "GET")
}

/// Builds the single entry node of a workflow, positioned at `origin`.
pub fn build_trigger(
    kind: TriggerKind,
    detail: Option<&str>,
    origin: Position,
    ids: &dyn IdGenerator,
) -> NodeDescriptor {
    let detail = detail.map(str::trim).filter(|d| !d.is_empty());
    let mut parameters = BTreeMap::new();

    let (display_name, node_kind, type_version) = match kind {
        TriggerKind::Scheduled => {
            let schedule = detail.and_then(Schedule::parse);
            let rule = match &schedule {
                Some(s) => s.to_rule(),
                None => Schedule::Cron(DEFAULT_CRON.to_string()).to_rule(),
            };
            parameters.insert("rule".to_string(), rule);
            if let (Some(text), None) = (detail, &schedule) {
                parameters.insert("notes".to_string(), json!(text));
            }
            ("Schedule Trigger", SCHEDULE_KIND, 1)
        }
        TriggerKind::InboundRequest => {
            let method = if detail.is_some_and(names_get_method) { "GET" } else { "POST" };
            parameters.insert("httpMethod".to_string(), json!(method));
            parameters.insert("path".to_string(), json!(ids.next_id()));
            parameters.insert("responseMode".to_string(), json!("onReceived"));
            ("Webhook", WEBHOOK_KIND, 2)
        }
        TriggerKind::AdHoc => ("Manual Trigger", MANUAL_KIND, 1),
    };

    NodeDescriptor {
        id: ids.next_id(),
        display_name: display_name.to_string(),
        kind: node_kind.to_string(),
        type_version,
        parameters,
        credential_ref: None,
        position: origin,
    }
}

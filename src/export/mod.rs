//! Text projections of a [`GeneratedPackage`] and the runtime import document.

use crate::compiler::trigger::{MANUAL_KIND, SCHEDULE_KIND, WEBHOOK_KIND};
use crate::runtime::graph::{MAX_OUTPUT_PORTS, WorkflowGraph};
use crate::runtime::package::{GeneratedPackage, Priority};
use serde_json::{Map, Value, json};
use std::fmt::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Summary,
    Detailed,
    SetupGuide,
    Troubleshooting,
    Documentation,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Summary => write!(f, "summary"),
            ExportFormat::Detailed => write!(f, "detailed"),
            ExportFormat::SetupGuide => write!(f, "setup-guide"),
            ExportFormat::Troubleshooting => write!(f, "troubleshooting"),
            ExportFormat::Documentation => write!(f, "documentation"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(ExportFormat::Summary),
            "detailed" => Ok(ExportFormat::Detailed),
            "setup-guide" | "setup" => Ok(ExportFormat::SetupGuide),
            "troubleshooting" => Ok(ExportFormat::Troubleshooting),
            "documentation" | "docs" => Ok(ExportFormat::Documentation),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

pub fn render(package: &GeneratedPackage, format: ExportFormat) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = match format {
        ExportFormat::Summary => summary(&mut out, package),
        ExportFormat::Detailed => detailed(&mut out, package),
        ExportFormat::SetupGuide => setup_guide(&mut out, package),
        ExportFormat::Troubleshooting => troubleshooting(&mut out, package),
        ExportFormat::Documentation => documentation(&mut out, package),
    };
    out
}

fn summary(out: &mut String, p: &GeneratedPackage) -> fmt::Result {
    let a = &p.analysis;
    writeln!(out, "# {}", p.name)?;
    writeln!(out)?;
    writeln!(out, "- Complexity: {}", a.complexity_tier)?;
    writeln!(out, "- Nodes: {} ({} connections)", a.node_count, a.connection_count)?;
    writeln!(out, "- Estimated execution: ~{}s", a.estimated_execution_seconds)?;
    writeln!(out, "- Steps: {}", flow_line(&p.graph))?;
    writeln!(out, "- Credentials needed: {}", p.credential_requirements.len())?;
    if !a.potential_issues.is_empty() {
        writeln!(out, "- Potential issues: {}", a.potential_issues.len())?;
    }
    Ok(())
}

fn detailed(out: &mut String, p: &GeneratedPackage) -> fmt::Result {
    summary(out, p)?;
    writeln!(out)?;
    writeln!(out, "## Nodes")?;
    for node in &p.graph.nodes {
        write!(out, "- {} `{}`", node.display_name, node.kind)?;
        if let Some(cred) = &node.credential_ref {
            write!(out, " (credential: {})", cred)?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;
    writeln!(out, "## Connections")?;
    for (source, targets) in &p.graph.connections {
        for t in targets {
            writeln!(out, "- {} -> {} [port {}]", name_of(&p.graph, source), name_of(&p.graph, &t.node), t.port)?;
        }
    }
    section(out, "Potential issues", &p.analysis.potential_issues)?;
    section(out, "Optimization suggestions", &p.analysis.optimization_suggestions)?;
    section(out, "Security considerations", &p.analysis.security_considerations)?;
    section(out, "Scalability notes", &p.analysis.scalability_notes)?;
    Ok(())
}

fn setup_guide(out: &mut String, p: &GeneratedPackage) -> fmt::Result {
    writeln!(out, "# Setting up {}", p.name)?;
    writeln!(out)?;
    if !p.credential_requirements.is_empty() {
        writeln!(out, "## Credentials")?;
        for c in &p.credential_requirements {
            let priority = match c.priority {
                Priority::Required => "required",
                Priority::Optional => "optional",
            };
            writeln!(out, "- {} ({}, {}) for {}", c.name, c.credential_class, priority, c.related_service)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "## Steps")?;
    for (i, step) in p.setup_steps.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, step)?;
    }
    Ok(())
}

fn troubleshooting(out: &mut String, p: &GeneratedPackage) -> fmt::Result {
    writeln!(out, "# Troubleshooting {}", p.name)?;
    writeln!(out)?;
    section(out, "Known risks", &p.analysis.potential_issues)?;
    writeln!(out)?;
    writeln!(out, "## Common problems")?;
    for node in &p.graph.nodes {
        let tip = match node.kind.as_str() {
            WEBHOOK_KIND => "404 on the webhook URL usually means the workflow is not active or the test URL was used in production",
            SCHEDULE_KIND => "Runs at the wrong hour point to the instance timezone differing from the expected one",
            MANUAL_KIND => continue,
            _ if node.credential_ref.is_some() => "401/403 responses mean the credential expired or lacks the required scope",
            _ => "Check the node's input items; empty input skips execution",
        };
        writeln!(out, "- {}: {}", node.display_name, tip)?;
    }
    Ok(())
}

fn documentation(out: &mut String, p: &GeneratedPackage) -> fmt::Result {
    writeln!(out, "# {}: developer notes", p.name)?;
    writeln!(out)?;
    writeln!(out, "Package `{}`; tags: {}", p.id, p.graph.tags.join(", "))?;
    writeln!(out)?;
    writeln!(out, "## Data flow")?;
    writeln!(out, "{}", flow_line(&p.graph))?;
    writeln!(out)?;
    writeln!(out, "## Node reference")?;
    for node in &p.graph.nodes {
        writeln!(out, "### {}", node.display_name)?;
        writeln!(out, "- id: `{}`", node.id)?;
        writeln!(out, "- type: `{}` v{}", node.kind, node.type_version)?;
        if !node.parameters.is_empty() {
            let params = serde_json::to_string_pretty(&node.parameters).unwrap_or_default();
            writeln!(out, "```json\n{}\n```", params)?;
        }
    }
    writeln!(out)?;
    writeln!(
        out,
        "Generated with {} tokens in {} ms.",
        p.tokens_used, p.processing_time_ms
    )?;
    Ok(())
}

fn section(out: &mut String, title: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "## {}", title)?;
    for item in items {
        writeln!(out, "- {}", item)?;
    }
    Ok(())
}

fn name_of<'a>(graph: &'a WorkflowGraph, id: &'a str) -> &'a str {
    graph.node(id).map(|n| n.display_name.as_str()).unwrap_or(id)
}

/// Node names in declaration order.
fn flow_line(graph: &WorkflowGraph) -> String {
    graph
        .nodes
        .iter()
        .map(|n| n.display_name.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// The runtime's import document: nodes plus connections keyed by node name.
pub fn import_document(name: &str, graph: &WorkflowGraph) -> Value {
    let nodes: Vec<Value> = graph
        .nodes
        .iter()
        .map(|n| {
            let mut node = json!({
                "id": n.id,
                "name": n.display_name,
                "type": n.kind,
                "typeVersion": n.type_version,
                "position": [n.position.x, n.position.y],
                "parameters": n.parameters,
            });
            if let Some(cred) = &n.credential_ref {
                let mut credentials = Map::new();
                credentials.insert(
                    cred.clone(),
                    json!({ "name": format!("{} account", n.display_name) }),
                );
                node["credentials"] = Value::Object(credentials);
            }
            node
        })
        .collect();

    // Edges on out-of-range ports are dropped; `WorkflowGraph::validate` rejects them.
    let mut connections = Map::new();
    for (source, targets) in &graph.connections {
        let targets: Vec<_> = targets.iter().filter(|t| t.port < MAX_OUTPUT_PORTS).collect();
        let outputs = targets
            .iter()
            .map(|t| t.port)
            .max()
            .and_then(|m| m.checked_add(1))
            .unwrap_or(0);
        let mut main: Vec<Vec<Value>> = vec![Vec::new(); outputs];
        for t in targets {
            main[t.port].push(json!({
                "node": name_of(graph, &t.node),
                "type": "main",
                "index": 0,
            }));
        }
        connections.insert(name_of(graph, source).to_string(), json!({ "main": main }));
    }

    json!({
        "name": name,
        "nodes": nodes,
        "connections": connections,
        "tags": graph.tags,
        "settings": { "executionOrder": "v1" },
    })
}

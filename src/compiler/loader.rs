use anyhow::{Context, Result};
use std::fs;
use crate::dsl::WorkflowRequest;

pub fn load_request_from_yaml(file_path: &str) -> Result<WorkflowRequest> {
    let yaml_content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read YAML file from {}", file_path))?;

    let request: WorkflowRequest = serde_yaml::from_str(&yaml_content)
        .with_context(|| format!("Failed to deserialize workflow request from {}", file_path))?;

    Ok(request)
}

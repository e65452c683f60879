use crate::io::{decode_document, read_text, DocumentError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const RUNNER_SCHEMA: &str = "tilestyle-runner/0.0.1";
const SHADER_RETURN_TYPES: [&str; 5] = ["bool", "float", "vec2", "vec3", "vec4"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default = "default_runner_schema")]
    pub schema: String,
    #[serde(default)]
    pub shader: ShaderConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            schema: default_runner_schema(),
            shader: ShaderConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderConfig {
    #[serde(default = "default_attribute_prefix")]
    pub attribute_prefix: String,
    #[serde(default = "default_function_name")]
    pub function_name: String,
    #[serde(default = "default_return_type")]
    pub return_type: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            attribute_prefix: default_attribute_prefix(),
            function_name: default_function_name(),
            return_type: default_return_type(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub time_since_load: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub reference: &'static str,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.reference)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerConfigError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("runner config parse failed: {0}")]
    Parse(String),
    #[error("runner config validation failed: {}", join_issues(.0))]
    Validation(Vec<ConfigIssue>),
}

pub fn load_runner_config(path: &Path) -> Result<RunnerConfig, RunnerConfigError> {
    let raw = read_text(path)?;
    let expanded = expand_env_placeholders(&raw).map_err(RunnerConfigError::Parse)?;
    let config: RunnerConfig = decode_document(path, &expanded)?;

    let issues = validate_runner_config(&config);
    if !issues.is_empty() {
        return Err(RunnerConfigError::Validation(issues));
    }
    Ok(config)
}

pub fn validate_runner_config(config: &RunnerConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    if config.schema != RUNNER_SCHEMA {
        issues.push(config_issue(
            "runner.config.schema",
            "schema",
            format!(
                "unsupported runner config schema `{}` (expected `{RUNNER_SCHEMA}`)",
                config.schema
            ),
        ));
    }
    if !is_shader_identifier_prefix(&config.shader.attribute_prefix) {
        issues.push(config_issue(
            "runner.config.shader.attribute_prefix",
            "shader.attribute_prefix",
            format!(
                "attribute_prefix `{}` must start a valid shader identifier",
                config.shader.attribute_prefix
            ),
        ));
    }
    if !is_shader_identifier(&config.shader.function_name) {
        issues.push(config_issue(
            "runner.config.shader.function_name",
            "shader.function_name",
            format!(
                "function_name `{}` is not a valid shader identifier",
                config.shader.function_name
            ),
        ));
    }
    if !SHADER_RETURN_TYPES.contains(&config.shader.return_type.as_str()) {
        issues.push(config_issue(
            "runner.config.shader.return_type",
            "shader.return_type",
            format!(
                "return_type `{}` must be one of {}",
                config.shader.return_type,
                SHADER_RETURN_TYPES.join(", ")
            ),
        ));
    }
    if !config.evaluation.time_since_load.is_finite() {
        issues.push(config_issue(
            "runner.config.evaluation.time_since_load",
            "evaluation.time_since_load",
            "time_since_load must be a finite number of seconds".to_string(),
        ));
    }
    issues
}

pub fn is_shader_identifier(value: &str) -> bool {
    value
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && is_shader_identifier_prefix(value)
}

fn is_shader_identifier_prefix(value: &str) -> bool {
    !value.starts_with(|c: char| c.is_ascii_digit())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn config_issue(reference: &'static str, field: &str, message: String) -> ConfigIssue {
    ConfigIssue {
        reference,
        field: field.to_string(),
        message,
    }
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn default_runner_schema() -> String {
    RUNNER_SCHEMA.to_string()
}

fn default_attribute_prefix() -> String {
    "a_".to_string()
}

fn default_function_name() -> String {
    "getStyleColor".to_string()
}

fn default_return_type() -> String {
    "vec4".to_string()
}

pub(crate) fn expand_env_placeholders(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err("unterminated env placeholder `${...`".to_string());
        };
        let key = &after[..end];
        if key.is_empty() {
            return Err("empty env placeholder `${}`".to_string());
        }
        let value = std::env::var(key)
            .map_err(|_| format!("missing env var for placeholder `${{{key}}}`"))?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

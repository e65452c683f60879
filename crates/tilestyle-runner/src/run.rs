use crate::cli::{CheckCommand, EvalCommand, OutputFormat, ShaderCommand};
use crate::config::{load_runner_config, validate_runner_config, RunnerConfig, RunnerConfigError};
use crate::fixture::{load_feature_fixture, FixtureError};
use serde_json::{json, Value as JsonValue};
use std::path::Path;
use tilestyle_expr::{
    CompileError, CompileErrorClass, EvalError, Expression, FeatureProperties, ShaderState,
    ShaderUnsupported, Value,
};

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("runner config load failed: {0}")]
    Config(#[from] RunnerConfigError),
    #[error("feature fixture load failed: {0}")]
    Fixture(#[from] FixtureError),
    #[error("compile failed ({label}): {0}", label = class_label(.0))]
    Compile(#[from] CompileError),
    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),
    #[error("expression has no shader form: {}", .0.reason)]
    ShaderUnsupported(#[from] ShaderUnsupported),
    #[error("json encode failed: {0}")]
    JsonEncode(#[from] serde_json::Error),
}

fn class_label(error: &CompileError) -> &'static str {
    match error.class() {
        CompileErrorClass::Syntax => "syntax",
        CompileErrorClass::Unsupported => "unsupported",
    }
}

#[tracing::instrument(level = "debug", skip(command), fields(expr = %command.expr))]
pub fn execute_eval(command: &EvalCommand) -> Result<String, RunnerError> {
    let config = load_optional_config(command.config.as_deref())?;
    let subject = match &command.feature {
        Some(path) => load_feature_fixture(path)?.into_subject(config.evaluation.time_since_load)?,
        None => FeatureProperties::new().with_time_since_load(config.evaluation.time_since_load),
    };
    tracing::debug!(properties = subject.len(), "loaded feature");

    let expression = Expression::compile(&command.expr)?;
    let value = if command.color {
        Value::Color(expression.evaluate_color(&subject)?)
    } else {
        expression.evaluate(&subject)?
    };

    Ok(match command.format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "schema": "tilestyle-runner-eval/0.0.1",
            "expression": expression.source(),
            "type": value.type_name(),
            "value": value_to_json(&value),
        }))?,
        OutputFormat::Text => value.to_string(),
    })
}

#[tracing::instrument(level = "debug", skip(command), fields(expr = %command.expr))]
pub fn execute_shader(command: &ShaderCommand) -> Result<String, RunnerError> {
    let mut config = load_optional_config(command.config.as_deref())?;
    if let Some(prefix) = &command.prefix {
        config.shader.attribute_prefix = prefix.clone();
    }
    if let Some(function_name) = &command.function_name {
        config.shader.function_name = function_name.clone();
    }
    if let Some(return_type) = &command.return_type {
        config.shader.return_type = return_type.clone();
    }
    let issues = validate_runner_config(&config);
    if !issues.is_empty() {
        return Err(RunnerConfigError::Validation(issues).into());
    }

    let expression = Expression::compile(&command.expr)?;
    let shader = &config.shader;
    let mut state = ShaderState::default();
    let function = expression.shader_function(
        &shader.function_name,
        &shader.attribute_prefix,
        &mut state,
        &shader.return_type,
    )?;

    Ok(match command.format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "schema": "tilestyle-runner-shader/0.0.1",
            "expression": expression.source(),
            "function": function,
            "translucent": state.translucent,
        }))?,
        OutputFormat::Text => format!("{function}\ntranslucent: {}", state.translucent),
    })
}

pub fn execute_check(command: &CheckCommand) -> Result<String, RunnerError> {
    Expression::compile(&command.expr)?;
    Ok("ok".to_string())
}

fn load_optional_config(path: Option<&Path>) -> Result<RunnerConfig, RunnerError> {
    match path {
        Some(path) => Ok(load_runner_config(path)?),
        None => Ok(RunnerConfig::default()),
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Undefined | Value::Null => JsonValue::Null,
        Value::Bool(value) => JsonValue::Bool(*value),
        Value::Number(number) => json!(number),
        Value::String(text) => JsonValue::String(text.clone()),
        Value::RegExp(regex) => JsonValue::String(regex.to_string()),
        Value::Color(color) => json!(color.to_array()),
        Value::Vec2(vector) => json!(vector.to_array()),
        Value::Vec3(vector) => json!(vector.to_array()),
        Value::Vec4(vector) => json!(vector.to_array()),
        Value::Array(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
    }
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;

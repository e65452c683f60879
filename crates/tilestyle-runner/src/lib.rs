mod cli;
mod config;
mod fixture;
mod io;
mod run;

pub use cli::{CheckCommand, Cli, Commands, EvalCommand, OutputFormat, ShaderCommand};
pub use config::{
    is_shader_identifier, load_runner_config, validate_runner_config, ConfigIssue,
    EvaluationConfig, RunnerConfig, RunnerConfigError, ShaderConfig,
};
pub use fixture::{load_feature_fixture, FeatureFixture, FixtureError};
pub use io::{decode_document, read_document, DocumentError};
pub use run::{execute_check, execute_eval, execute_shader, RunnerError};

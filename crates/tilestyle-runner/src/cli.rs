use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "tilestyle-runner")]
#[command(about = "Compile, evaluate and translate tile styling expressions")]
pub struct Cli {
    /// Log compilation and shader emission at debug level on stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Evaluate an expression against a feature fixture.
    Eval(EvalCommand),
    /// Emit the expression as a shader function.
    Shader(ShaderCommand),
    /// Compile only and report the error class.
    Check(CheckCommand),
}

#[derive(Debug, Clone, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub struct EvalCommand {
    #[arg(long)]
    pub expr: String,
    #[arg(long)]
    pub feature: Option<PathBuf>,
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Require a color result.
    #[arg(long, default_value_t = false)]
    pub color: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ShaderCommand {
    #[arg(long)]
    pub expr: String,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub prefix: Option<String>,
    #[arg(long)]
    pub function_name: Option<String>,
    #[arg(long)]
    pub return_type: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, clap::Args)]
pub struct CheckCommand {
    #[arg(long)]
    pub expr: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

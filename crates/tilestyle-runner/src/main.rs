use clap::Parser;
use tilestyle_runner::{execute_check, execute_eval, execute_shader, Cli, Commands};
use tracing::Level;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Eval(command) => execute_eval(command),
        Commands::Shader(command) => execute_shader(command),
        Commands::Check(command) => execute_check(command),
    };

    match result {
        Ok(output) => {
            println!("{output}");
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

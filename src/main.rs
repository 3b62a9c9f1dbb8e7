use clap::Parser;
use envmin::config::BuildTool;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

/// Exit status for argument parsing and validation failures
const EXIT_INVALID_ARGS: u8 = 1;
/// Exit status for failures while minifying
const EXIT_EXECUTION_FAILED: u8 = 2;

#[derive(Parser)]
#[command(name = "envmin")]
#[command(about = "Minify a Java build environment to the sources a set of classes needs")]
#[command(version)]
struct Cli {
    /// JDK home directory (must contain bin/jdeps)
    #[arg(long, value_parser = existing_dir)]
    java_home: PathBuf,

    /// File with the classes to determine dependencies for; empty lines and lines starting with # are ignored
    #[arg(long, value_parser = existing_file)]
    classes: PathBuf,

    /// File with additional class names to include
    #[arg(long, default_value = ".")]
    additional: PathBuf,

    /// Directory with the pristine build environment
    #[arg(long, value_parser = existing_dir)]
    input: PathBuf,

    /// Directory for the minified build environment (emptied first)
    #[arg(long)]
    output: PathBuf,

    /// Packages or classes to keep (space-separated)
    #[arg(long, required = true, num_args = 1.., value_parser = seed_names)]
    packages: Vec<String>,

    /// Build the minified environment afterwards to verify it
    #[arg(long)]
    test: bool,

    /// Do not build the input environment before resolving dependencies
    #[arg(long)]
    no_input_build: bool,

    /// Build tool preset (ant or maven)
    #[arg(long)]
    build_tool: Option<BuildTool>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn existing_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("'{}' does not exist", value));
    }
    if !path.is_dir() {
        return Err(format!("'{}' is not a directory", value));
    }
    Ok(path)
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("'{}' does not exist", value));
    }
    if !path.is_file() {
        return Err(format!("'{}' is not a file", value));
    }
    Ok(path)
}

fn seed_names(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("package or class name must not be blank".to_string());
    }
    Ok(value.to_string())
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("envmin=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_INVALID_ARGS)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let result = cli::minify::run(cli::minify::MinifyArgs {
        java_home: cli.java_home,
        classes: cli.classes,
        additional: cli.additional,
        input: cli.input,
        output: cli.output,
        packages: cli.packages,
        test: cli.test,
        no_input_build: cli.no_input_build,
        build_tool: cli.build_tool,
        config: cli.config,
    });

    // Display error with helpful suggestions
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", envmin::format_error_with_help(&e));
            ExitCode::from(EXIT_EXECUTION_FAILED)
        }
    }
}

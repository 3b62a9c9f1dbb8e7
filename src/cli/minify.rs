use envmin::build::CommandBuildRunner;
use envmin::config::{BuildTool, Config};
use envmin::core::EnvminResult;
use envmin::minify::{Minifier, MinifyReport, MinifyRequest};
use envmin::resolver::{JdepsResolver, SeedSet};
use std::path::{Path, PathBuf};

/// Arguments of a minify run after clap has validated path types
pub struct MinifyArgs {
    pub java_home: PathBuf,
    pub classes: PathBuf,
    pub additional: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub packages: Vec<String>,
    pub test: bool,
    pub no_input_build: bool,
    pub build_tool: Option<BuildTool>,
    pub config: Option<PathBuf>,
}

/// `.` (the default) or any directory means no additional file was given
fn additional_file(path: &Path) -> Option<PathBuf> {
    if path == Path::new(".") || path.is_dir() {
        None
    } else {
        Some(path.to_path_buf())
    }
}

fn load_config(args: &MinifyArgs) -> EnvminResult<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(tool) = args.build_tool {
        config.build_tool = tool;
    }
    if args.no_input_build {
        config.build_input = false;
    }

    Ok(config)
}

pub fn run(args: MinifyArgs) -> EnvminResult<()> {
    let config = load_config(&args)?;

    let seeds = SeedSet::new(
        args.packages
            .iter()
            .flat_map(|p| p.split_whitespace()),
    )?;

    let request = MinifyRequest {
        additional_file: additional_file(&args.additional),
        java_home: args.java_home,
        classes_file: args.classes,
        input: args.input,
        output: Some(args.output),
        seeds,
        verify: args.test,
    };

    let resolver = JdepsResolver::new();
    let builder = CommandBuildRunner::new(config.build_command(), &request.java_home)?;

    let report = Minifier::new(&config, &resolver, &builder).execute(&request)?;
    print_summary(&report);

    Ok(())
}

fn print_summary(report: &MinifyReport) {
    println!("✓ Minified environment: {}", report.output.display());
    println!("  Classes in closure: {}", report.closure_size);
    println!("  Files copied: {}", report.copy.copied.len());
    println!("  Resources copied: {}", report.copy.resources);
    if !report.copy.missing.is_empty() {
        println!("  Missing sources skipped: {}", report.copy.missing.len());
    }
    if report.verified {
        println!("  ✓ Minified environment builds");
    }
}

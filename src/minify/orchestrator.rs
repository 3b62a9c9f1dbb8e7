use crate::build::BuildRunner;
use crate::config::Config;
use crate::core::path::{paths_overlap, resolve_path};
use crate::core::{EnvminError, EnvminResult};
use crate::minify::copier::{CopyReport, MirrorCopier, TreeCopier};
use crate::minify::preparer::OutputTreePreparer;
use crate::resolver::{ClosureCollector, DependencyResolver, ResolveRequest, SeedSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Steps of a minification run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinifyStage {
    Check,
    BuildInput,
    CollectClosure,
    PrepareOutput,
    Copy,
    BuildOutput,
    Done,
}

impl fmt::Display for MinifyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MinifyStage::Check => "check",
            MinifyStage::BuildInput => "build input",
            MinifyStage::CollectClosure => "collect closure",
            MinifyStage::PrepareOutput => "prepare output",
            MinifyStage::Copy => "copy",
            MinifyStage::BuildOutput => "build output",
            MinifyStage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Inputs of one run, fixed when the run starts
#[derive(Debug, Clone)]
pub struct MinifyRequest {
    pub java_home: PathBuf,
    pub classes_file: PathBuf,
    pub additional_file: Option<PathBuf>,
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub seeds: SeedSet,
    /// Build the minified environment afterwards
    pub verify: bool,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifyReport {
    pub output: PathBuf,
    pub closure_size: usize,
    pub copy: CopyReport,
    pub verified: bool,
}

/// Wires check, builds, closure collection, output preparation and copying.
///
/// Stops at the first failing step and returns its error.
pub struct Minifier<'a> {
    config: &'a Config,
    resolver: &'a dyn DependencyResolver,
    builder: &'a dyn BuildRunner,
}

impl<'a> Minifier<'a> {
    pub fn new(
        config: &'a Config,
        resolver: &'a dyn DependencyResolver,
        builder: &'a dyn BuildRunner,
    ) -> Self {
        Self {
            config,
            resolver,
            builder,
        }
    }

    pub fn execute(&self, request: &MinifyRequest) -> EnvminResult<MinifyReport> {
        enter(MinifyStage::Check);
        let output = check(request)?;

        if self.config.build_input {
            enter(MinifyStage::BuildInput);
            self.build_tree(&request.input)
                .map_err(|e| e.with_build_context("failed building input environment"))?;
        }

        enter(MinifyStage::CollectClosure);
        let classpath = self.config.classpath(&request.input)?;
        let classes_dir = request.input.join(self.config.classes_dir());
        let resolve = ResolveRequest {
            java_home: &request.java_home,
            classpath: &classpath,
            classes_dir: &classes_dir,
            seeds: &request.seeds,
            classes_file: &request.classes_file,
            additional_file: request.additional_file.as_deref(),
        };
        let closure = ClosureCollector::new(self.resolver, self.config.missing_seed_policy)
            .collect(&resolve)?;

        enter(MinifyStage::PrepareOutput);
        let mut copier = MirrorCopier::new(&request.input, output);
        OutputTreePreparer::new(&self.config.build_files, &self.config.lib_dir)
            .prepare(&mut copier)?;

        enter(MinifyStage::Copy);
        let layout = self.config.layout();
        TreeCopier::new(&layout).copy(&closure, &mut copier)?;
        let copy = copier.into_report();

        if request.verify {
            enter(MinifyStage::BuildOutput);
            self.build_tree(output)
                .map_err(|e| e.with_build_context("failed building minified environment"))?;
        }

        enter(MinifyStage::Done);
        Ok(MinifyReport {
            output: output.to_path_buf(),
            closure_size: closure.len(),
            copy,
            verified: request.verify,
        })
    }

    fn build_tree(&self, dir: &Path) -> EnvminResult<()> {
        let description = self.builder.describe();
        info!(command = %description, dir = %dir.display(), "building");
        self.builder.run_build(dir)?.into_result(&description)?;
        Ok(())
    }
}

fn enter(stage: MinifyStage) {
    info!(stage = %stage, "minify");
}

/// Validate every path in the request; the first violation is reported.
pub fn check(request: &MinifyRequest) -> EnvminResult<&Path> {
    let java_home = &request.java_home;
    if !java_home.exists() {
        return Err(precondition("Java home directory does not exist", java_home));
    }
    if !java_home.is_dir() {
        return Err(precondition("Java home does not point to a directory", java_home));
    }

    let classes = &request.classes_file;
    if !classes.exists() {
        return Err(precondition("File with class names does not exist", classes));
    }
    if classes.is_dir() {
        return Err(precondition("File with class names points to directory", classes));
    }

    if let Some(additional) = &request.additional_file {
        if !additional.exists() {
            return Err(precondition(
                "File with additional class names does not exist",
                additional,
            ));
        }
        if additional.is_dir() {
            return Err(precondition(
                "File with additional class names points to directory",
                additional,
            ));
        }
    }

    let input = &request.input;
    if !input.exists() {
        return Err(precondition("Input build environment does not exist", input));
    }
    if !input.is_dir() {
        return Err(precondition("Input build environment points to a file", input));
    }

    let output = request.output.as_deref().ok_or_else(|| {
        EnvminError::Precondition("No output build environment supplied".to_string())
    })?;
    if output.exists() && !output.is_dir() {
        return Err(precondition("Output build environment points to a file", output));
    }
    // The output is emptied before copying, so it must not alias any part of the input
    if paths_overlap(&resolve_path(output)?, &resolve_path(input)?) {
        return Err(precondition(
            "Output build environment overlaps the input",
            output,
        ));
    }

    Ok(output)
}

fn precondition(message: &str, path: &Path) -> EnvminError {
    EnvminError::Precondition(format!("{}: {}", message, path.display()))
}

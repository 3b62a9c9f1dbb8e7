//! Dependency resolver backed by the JDK's `jdeps` tool.

use crate::resolver::closure::{DependencyResolver, ResolveRequest};
use crate::resolver::seeds::{top_level_type, RequiredClosure, SeedSet};
use anyhow::{bail, Context};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tracing::debug;

/// Indented `<source> -> <target> ...` lines of `jdeps -verbose:class`;
/// unindented archive summary lines are not matched.
fn edge_pattern() -> &'static Regex {
    static EDGE: OnceLock<Regex> = OnceLock::new();
    EDGE.get_or_init(|| {
        Regex::new(r"^\s+(\S+)\s+->\s+(\S+)").expect("static regex is valid")
    })
}

/// Read a line-oriented class list: blank lines and `#` comments are skipped.
pub fn read_class_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read class list {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Location of the compiled class file for `type_name` under `classes_dir`.
///
/// Package segments become directories; nested type markers stay in the
/// file name (`a.B$C` becomes `a/B$C.class`).
pub fn class_file_path(classes_dir: &Path, type_name: &str) -> PathBuf {
    let mut path = classes_dir.to_path_buf();
    let mut segments = type_name.split('.').filter(|s| !s.is_empty()).peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_some() {
            path.push(segment);
        } else {
            path.push(format!("{}.class", segment));
        }
    }
    path
}

/// jdeps reports unreadable inputs as a warning and still exits 0
pub fn reject_skipped_inputs(output: &str) -> anyhow::Result<()> {
    let skipped: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|line| line.contains("Path does not exist"))
        .collect();
    if !skipped.is_empty() {
        bail!("jdeps skipped its inputs: {}", skipped.join("; "));
    }
    Ok(())
}

/// Collect every class on either side of a dependency edge that the seeds cover
pub fn parse_jdeps_output(output: &str, seeds: &SeedSet) -> RequiredClosure {
    let mut closure = RequiredClosure::new();

    for line in output.lines() {
        if let Some(caps) = edge_pattern().captures(line) {
            for name in [&caps[1], &caps[2]] {
                let name = top_level_type(name);
                if seeds.covers(name) {
                    closure.insert(name.to_string());
                }
            }
        }
    }

    closure
}

/// Runs `<java_home>/bin/jdeps` recursively over the compiled starting classes
#[derive(Debug, Default)]
pub struct JdepsResolver;

impl JdepsResolver {
    pub fn new() -> Self {
        Self
    }

    fn jdeps_binary(java_home: &Path) -> PathBuf {
        java_home
            .join("bin")
            .join(format!("jdeps{}", std::env::consts::EXE_SUFFIX))
    }
}

impl DependencyResolver for JdepsResolver {
    fn resolve(&self, request: &ResolveRequest<'_>) -> anyhow::Result<RequiredClosure> {
        let classes = read_class_list(request.classes_file)?;
        if classes.is_empty() {
            bail!(
                "No class names found in {}",
                request.classes_file.display()
            );
        }

        let additional = match request.additional_file {
            Some(path) => read_class_list(path)?,
            None => Vec::new(),
        };

        let mut class_files = Vec::with_capacity(classes.len());
        for name in &classes {
            let path = class_file_path(request.classes_dir, name);
            if !path.is_file() {
                bail!(
                    "Compiled class for {} not found at {} (is the input environment built?)",
                    name,
                    path.display()
                );
            }
            class_files.push(path);
        }

        let binary = Self::jdeps_binary(request.java_home);
        debug!(jdeps = %binary.display(), classes = class_files.len(), "running jdeps");

        let output = Command::new(&binary)
            .arg("-verbose:class")
            .arg("-recursive")
            .arg("-cp")
            .arg(request.classpath)
            .args(&class_files)
            .output()
            .with_context(|| format!("Failed to execute {}", binary.display()))?;

        if !output.status.success() {
            bail!(
                "{} exited with code {}: {}",
                binary.display(),
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        reject_skipped_inputs(&stdout)?;
        reject_skipped_inputs(&String::from_utf8_lossy(&output.stderr))?;
        let mut closure = parse_jdeps_output(&stdout, request.seeds);
        closure.extend(
            classes
                .iter()
                .chain(additional.iter())
                .map(|name| top_level_type(name).to_string()),
        );

        Ok(closure)
    }
}

use crate::core::path::{mirror_path, SourceLayout};
use crate::core::{EnvminError, EnvminResult};
use crate::resolver::RequiredClosure;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Result of a single `copy_file` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// Source absent from the input tree; logged and skipped
    Missing,
    /// Destination already written during this run
    AlreadyCopied,
}

/// What a copy pass wrote and what it could not find
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Destination paths, in the order they were written
    pub copied: Vec<PathBuf>,
    /// Source paths that did not exist
    pub missing: Vec<PathBuf>,
    pub touched_directories: usize,
    pub resources: usize,
}

/// Copies files from an input tree to the same relative location in an output tree.
///
/// Each destination is written at most once per `MirrorCopier`, so one copier
/// is shared by every stage that writes into the same output tree.
pub struct MirrorCopier<'a> {
    input_root: &'a Path,
    output_root: &'a Path,
    written: HashSet<PathBuf>,
    report: CopyReport,
}

impl<'a> MirrorCopier<'a> {
    pub fn new(input_root: &'a Path, output_root: &'a Path) -> Self {
        Self {
            input_root,
            output_root,
            written: HashSet::new(),
            report: CopyReport::default(),
        }
    }

    /// Copy `src` (under the input root) byte for byte to its mirrored location.
    ///
    /// A missing source is not an error and leaves the output tree untouched.
    pub fn copy_file(&mut self, src: &Path) -> EnvminResult<CopyOutcome> {
        if !src.exists() {
            warn!(path = %src.display(), "missing source, skipping");
            self.report.missing.push(src.to_path_buf());
            return Ok(CopyOutcome::Missing);
        }

        let dest = mirror_path(self.input_root, self.output_root, src);
        if self.written.contains(&dest) {
            return Ok(CopyOutcome::AlreadyCopied);
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| EnvminError::fs(parent, e))?;
        }
        fs::copy(src, &dest).map_err(|e| EnvminError::fs(src, e))?;
        debug!(path = %dest.display(), "copied");

        self.written.insert(dest.clone());
        self.report.copied.push(dest);
        Ok(CopyOutcome::Copied)
    }

    pub fn input_root(&self) -> &'a Path {
        self.input_root
    }

    pub fn output_root(&self) -> &'a Path {
        self.output_root
    }

    pub fn into_report(self) -> CopyReport {
        self.report
    }
}

/// Direct non-directory entries of `dir`, sorted by name
pub fn list_files(dir: &Path) -> EnvminResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.path().is_dir() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Copies the source files of a closure plus the resources that sit next to them
pub struct TreeCopier<'a> {
    layout: &'a SourceLayout,
}

impl<'a> TreeCopier<'a> {
    pub fn new(layout: &'a SourceLayout) -> Self {
        Self { layout }
    }

    /// Copy every closure member's source file, then every non-source file in
    /// the directories those sources live in.
    ///
    /// Destinations already written through `copier` are not written again.
    /// The first I/O failure aborts the copy; files already written stay.
    pub fn copy(
        &self,
        closure: &RequiredClosure,
        copier: &mut MirrorCopier<'_>,
    ) -> EnvminResult<()> {
        let input_root = copier.input_root();
        let mut sources = 0usize;
        let mut touched: BTreeSet<PathBuf> = BTreeSet::new();

        for type_name in closure {
            let src = self.layout.source_path(input_root, type_name);
            let outcome = copier.copy_file(&src)?;
            if outcome == CopyOutcome::Copied {
                sources += 1;
            }
            if outcome != CopyOutcome::Missing {
                if let Some(parent) = src.parent() {
                    touched.insert(parent.to_path_buf());
                }
            }
        }

        let mut resources = 0;
        for dir in &touched {
            for file in list_files(dir)? {
                if self.layout.is_source_file(&file) {
                    continue;
                }
                if copier.copy_file(&file)? == CopyOutcome::Copied {
                    resources += 1;
                }
            }
        }

        copier.report.touched_directories += touched.len();
        copier.report.resources += resources;

        info!(
            sources,
            resources,
            missing = copier.report.missing.len(),
            directories = touched.len(),
            "copied closure"
        );
        Ok(())
    }
}

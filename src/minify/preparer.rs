use crate::core::path::ensure_dir;
use crate::core::{EnvminError, EnvminResult};
use crate::minify::copier::{list_files, MirrorCopier};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Empties (or creates) the output tree and seeds it with build files and libraries
pub struct OutputTreePreparer<'a> {
    build_files: &'a [String],
    lib_dir: &'a Path,
}

impl<'a> OutputTreePreparer<'a> {
    pub fn new(build_files: &'a [String], lib_dir: &'a Path) -> Self {
        Self {
            build_files,
            lib_dir,
        }
    }

    /// Leave the copier's output root as an existing directory holding only
    /// the named build files and the direct files of the library directory.
    ///
    /// Any deletion or copy failure aborts; nothing is rolled back.
    pub fn prepare(&self, copier: &mut MirrorCopier<'_>) -> EnvminResult<()> {
        let input_root = copier.input_root();
        let output_root = copier.output_root();
        let removed = empty_directory(output_root)?;
        if removed > 0 {
            info!(entries = removed, output = %output_root.display(), "cleared previous output");
        }

        for name in self.build_files {
            copier.copy_file(&input_root.join(name))?;
        }

        let lib = input_root.join(self.lib_dir);
        if lib.is_dir() {
            for file in list_files(&lib)? {
                copier.copy_file(&file)?;
            }
        } else {
            warn!(path = %lib.display(), "library directory not found, skipping");
        }

        Ok(())
    }
}

/// Make `dir` an empty, existing directory. Returns the number of entries removed.
pub fn empty_directory(dir: &Path) -> EnvminResult<usize> {
    if !dir.exists() {
        ensure_dir(dir)?;
        return Ok(0);
    }

    let mut entries: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| EnvminError::fs(dir, e))? {
        let entry = entry.map_err(|e| EnvminError::fs(dir, e))?;
        let name = entry.file_name();
        if name == "." || name == ".." {
            continue;
        }
        entries.push(entry.path());
    }

    for path in &entries {
        let metadata = fs::symlink_metadata(path).map_err(|e| EnvminError::fs(path, e))?;
        if metadata.is_dir() {
            fs::remove_dir_all(path).map_err(|e| EnvminError::fs(path, e))?;
        } else {
            fs::remove_file(path).map_err(|e| EnvminError::fs(path, e))?;
        }
    }

    Ok(entries.len())
}

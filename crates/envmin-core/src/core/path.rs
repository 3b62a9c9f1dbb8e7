use crate::core::error::{EnvminError, EnvminResult};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Separator between an enclosing type and a nested type (`Outer$Inner`)
pub const NESTED_TYPE_SEPARATOR: char = '$';

/// Get the envmin home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\envmin
/// - Linux: ~/.config/envmin
/// - macOS: ~/Library/Application Support/envmin
pub fn envmin_home() -> EnvminResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| EnvminError::Config("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("envmin"))
}

/// Get the config file path (`<envmin home>/config.yaml`)
pub fn config_file() -> EnvminResult<PathBuf> {
    Ok(envmin_home()?.join("config.yaml"))
}

/// Where source files live inside a build environment and what they are called.
///
/// A type name maps to exactly one file: `a.b.C` becomes
/// `<root>/<source_root>/a/b/C.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLayout {
    pub source_root: PathBuf,
    pub extension: String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src").join("main").join("java"),
            extension: "java".to_string(),
        }
    }
}

impl SourceLayout {
    pub fn new(source_root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            source_root: source_root.into(),
            extension: extension.into(),
        }
    }

    /// Map a fully-qualified type name to its expected source file under `root`.
    ///
    /// Never fails; the returned path may not exist. Nested types resolve to
    /// the file of their outermost enclosing type.
    pub fn source_path(&self, root: &Path, type_name: &str) -> PathBuf {
        let top_level = type_name
            .split(NESTED_TYPE_SEPARATOR)
            .next()
            .unwrap_or(type_name);

        let mut path = root.join(&self.source_root);
        let mut segments = top_level.split('.').filter(|s| !s.is_empty()).peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{}.{}", segment, self.extension));
            }
        }
        path
    }

    /// Whether `path` carries the source file extension
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }
}

/// Re-root `path` from `input_root` under `output_root`.
///
/// # Panics
///
/// `path` must lie under `input_root`; anything else is a caller bug.
pub fn mirror_path(input_root: &Path, output_root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(input_root) {
        Ok(relative) => output_root.join(relative),
        Err(_) => panic!(
            "{} is not located under {}",
            path.display(),
            input_root.display()
        ),
    }
}

/// Resolve `path` to the location it names on disk, following symlinks and
/// `..` through its longest existing prefix.
///
/// Components past that prefix do not exist yet, so they are applied
/// lexically. Relative paths are taken against the current directory.
pub fn resolve_path(path: &Path) -> EnvminResult<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut pending: Vec<Component<'_>> = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(last)) => {
                pending.push(last);
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = existing
        .canonicalize()
        .map_err(|e| EnvminError::fs(existing, e))?;
    for component in pending.into_iter().rev() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            other => resolved.push(other.as_os_str()),
        }
    }
    Ok(resolved)
}

/// Whether one of two resolved paths is the other or lies inside it
pub fn paths_overlap(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> EnvminResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| EnvminError::fs(path, e))?;
    }
    Ok(())
}

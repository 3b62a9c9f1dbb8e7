use crate::core::path::{config_file, SourceLayout};
use crate::core::{EnvminError, EnvminResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Build tool driving the environment; selects defaults for output and build command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    #[default]
    Ant,
    Maven,
}

impl BuildTool {
    fn classes_dir(&self) -> PathBuf {
        match self {
            BuildTool::Ant => PathBuf::from("build").join("classes"),
            BuildTool::Maven => PathBuf::from("target").join("classes"),
        }
    }

    fn classpath_wildcard(&self) -> String {
        match self {
            BuildTool::Ant => "lib/*".to_string(),
            BuildTool::Maven => "target/dependency/*".to_string(),
        }
    }

    fn build_command(&self) -> Vec<String> {
        let command: &[&str] = match self {
            BuildTool::Ant => &["ant", "clean", "exejar"],
            BuildTool::Maven => &["mvn", "clean", "package", "-DskipTests"],
        };
        command.iter().map(|s| s.to_string()).collect()
    }
}

impl FromStr for BuildTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ant" => Ok(BuildTool::Ant),
            "maven" | "mvn" => Ok(BuildTool::Maven),
            other => Err(format!("unknown build tool '{}' (expected ant or maven)", other)),
        }
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildTool::Ant => write!(f, "ant"),
            BuildTool::Maven => write!(f, "maven"),
        }
    }
}

/// What to do when a seed matches nothing in the resolved closure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSeedPolicy {
    #[default]
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Build tool preset; fills in `classes_dir`, `classpath_wildcard` and `build_command`
    #[serde(default)]
    pub build_tool: BuildTool,

    /// Source directory relative to the environment root
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Source file extension, without the dot
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Top-level build description files copied verbatim
    #[serde(default = "default_build_files")]
    pub build_files: Vec<String>,

    /// Library directory whose direct files are copied verbatim
    #[serde(default = "default_lib_dir")]
    pub lib_dir: PathBuf,

    /// Compiled class output, relative to the environment root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes_dir: Option<PathBuf>,

    /// Classpath entry for third-party jars, relative to the environment root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classpath_wildcard: Option<String>,

    /// Command used to build an environment, run inside its root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<Vec<String>>,

    /// Whether to build the input environment before resolving
    #[serde(default = "default_true")]
    pub build_input: bool,

    #[serde(default)]
    pub missing_seed_policy: MissingSeedPolicy,
}

fn default_source_root() -> PathBuf {
    SourceLayout::default().source_root
}

fn default_source_extension() -> String {
    SourceLayout::default().extension
}

fn default_build_files() -> Vec<String> {
    vec!["build.xml".to_string(), "pom.xml".to_string()]
}

fn default_lib_dir() -> PathBuf {
    PathBuf::from("lib")
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build_tool: BuildTool::default(),
            source_root: default_source_root(),
            source_extension: default_source_extension(),
            build_files: default_build_files(),
            lib_dir: default_lib_dir(),
            classes_dir: None,
            classpath_wildcard: None,
            build_command: None,
            build_input: true,
            missing_seed_policy: MissingSeedPolicy::default(),
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, falling back to defaults
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\envmin\config.yaml
    /// - Linux: ~/.config/envmin/config.yaml
    /// - macOS: ~/Library/Application Support/envmin/config.yaml
    ///
    /// Nothing is written when the file is absent.
    pub fn load() -> EnvminResult<Self> {
        match config_file() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> EnvminResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| EnvminError::fs(path, e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> EnvminResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;

        if config.source_extension.is_empty() || config.source_extension.starts_with('.') {
            return Err(EnvminError::Config(format!(
                "source_extension must be a bare extension such as 'java', got '{}'",
                config.source_extension
            )));
        }
        if matches!(&config.build_command, Some(cmd) if cmd.is_empty()) {
            return Err(EnvminError::Config(
                "build_command must name a program".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn layout(&self) -> SourceLayout {
        SourceLayout::new(self.source_root.clone(), self.source_extension.clone())
    }

    pub fn classes_dir(&self) -> PathBuf {
        self.classes_dir
            .clone()
            .unwrap_or_else(|| self.build_tool.classes_dir())
    }

    pub fn build_command(&self) -> Vec<String> {
        self.build_command
            .clone()
            .unwrap_or_else(|| self.build_tool.build_command())
    }

    /// Classpath handed to the resolver: compiled classes plus the library wildcard
    pub fn classpath(&self, input_root: &Path) -> EnvminResult<String> {
        let wildcard = self
            .classpath_wildcard
            .clone()
            .unwrap_or_else(|| self.build_tool.classpath_wildcard());
        let entries = [input_root.join(self.classes_dir()), input_root.join(wildcard)];

        let joined = std::env::join_paths(entries.iter())
            .map_err(|e| EnvminError::Config(format!("Invalid classpath entry: {}", e)))?;
        Ok(joined.to_string_lossy().into_owned())
    }
}

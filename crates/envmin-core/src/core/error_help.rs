use crate::core::EnvminError;

/// Number of captured output lines shown when an external build fails
const BUILD_OUTPUT_TAIL: usize = 20;

/// Provides helpful suggestions for common errors
pub trait ErrorHelp {
    fn help(&self) -> Option<String>;
}

impl ErrorHelp for EnvminError {
    fn help(&self) -> Option<String> {
        match self {
            EnvminError::Precondition(msg) => {
                if msg.contains("Java home") {
                    Some(
                        "💡 Suggestion: Point --java-home at a JDK installation (it must contain bin/jdeps)"
                            .to_string(),
                    )
                } else if msg.contains("class names") {
                    Some(
                        "💡 Suggestion: --classes expects a text file with one class name per line"
                            .to_string(),
                    )
                } else if msg.contains("Input build environment") {
                    Some(
                        "💡 Suggestion: --input must be the root of a buildable source tree"
                            .to_string(),
                    )
                } else if msg.contains("overlaps the input") {
                    Some(
                        "💡 Suggestion: Choose an --output directory outside the input tree; it is emptied before copying"
                            .to_string(),
                    )
                } else if msg.contains("seed") {
                    Some(
                        "💡 Suggestion: Pass at least one package or class with --packages"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            EnvminError::ExternalBuild { exit_code, .. } => {
                if exit_code.is_none() {
                    Some(
                        "💡 Suggestion: Check that the build tool is installed and on PATH, or set build_command in the config file"
                            .to_string(),
                    )
                } else {
                    Some(
                        "💡 Suggestion: Run the build command by hand in the reported directory to see the full output"
                            .to_string(),
                    )
                }
            }
            EnvminError::Resolution(_) => Some(
                "💡 Suggestion: Make sure the input environment was built (class files present) and the JDK provides jdeps"
                    .to_string(),
            ),
            EnvminError::Yaml(e) => Some(format!(
                "💡 Suggestion: Check your YAML syntax. Common issues:\n  - Missing colons after keys\n  - Incorrect indentation\n  - Unclosed quotes\n\nError details: {}",
                e
            )),
            EnvminError::Filesystem { source, .. } | EnvminError::Io(source) => {
                if source.kind() == std::io::ErrorKind::PermissionDenied {
                    Some(
                        "💡 Suggestion: Check file permissions, or try running with appropriate permissions"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Last `lines` lines of captured process output
fn tail(output: &str, lines: usize) -> String {
    let all: Vec<&str> = output.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

/// Format an error with helpful suggestions
pub fn format_error_with_help(error: &EnvminError) -> String {
    let mut output = format!("❌ Error: {}", error);

    if let EnvminError::ExternalBuild { stdout, stderr, .. } = error {
        for (label, captured) in [("stdout", stdout), ("stderr", stderr)] {
            if !captured.trim().is_empty() {
                output.push_str(&format!("\n\n--- {} ---\n", label));
                output.push_str(&tail(captured, BUILD_OUTPUT_TAIL));
            }
        }
    }

    if let Some(help) = error.help() {
        output.push_str("\n\n");
        output.push_str(&help);
    }

    output
}

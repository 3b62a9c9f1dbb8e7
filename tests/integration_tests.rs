//! Integration tests for envmin
//!
//! End-to-end minification runs against temporary build environments, with
//! the resolver and build tool replaced by deterministic stand-ins, plus
//! exit-code checks against the compiled binary.

use envmin::build::{BuildOutput, BuildRunner};
use envmin::config::Config;
use envmin::core::{EnvminError, EnvminResult};
use envmin::minify::{Minifier, MinifyRequest};
use envmin::resolver::{DependencyResolver, RequiredClosure, ResolveRequest, SeedSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn envmin_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_envmin"))
}

/// Returns a fixed closure regardless of the seeds
struct FixedResolver(Vec<&'static str>);

impl DependencyResolver for FixedResolver {
    fn resolve(&self, _request: &ResolveRequest<'_>) -> anyhow::Result<RequiredClosure> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

struct BrokenResolver;

impl DependencyResolver for BrokenResolver {
    fn resolve(&self, _request: &ResolveRequest<'_>) -> anyhow::Result<RequiredClosure> {
        anyhow::bail!("jdeps: class path is empty")
    }
}

struct SucceedingBuild;

impl BuildRunner for SucceedingBuild {
    fn run_build(&self, _working_dir: &Path) -> EnvminResult<BuildOutput> {
        Ok(BuildOutput {
            exit_code: Some(0),
            stdout: "BUILD SUCCESSFUL".to_string(),
            stderr: String::new(),
        })
    }

    fn describe(&self) -> String {
        "ant clean exejar".to_string()
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Relative paths of all files below `root`, sorted
fn files_under(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

struct Environment {
    temp: TempDir,
    request: MinifyRequest,
}

impl Environment {
    fn new(seeds: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("weka");
        let java_home = temp.path().join("jdk");
        let classes = temp.path().join("classes.txt");

        fs::create_dir_all(&java_home).unwrap();
        write(&input, "build.xml", "<project name=\"weka\"/>");
        write(&input, "pom.xml", "<project/>");
        write(&input, "lib/mtj.jar", "jar bytes");
        write(&input, "src/main/java/pkg/a.java", "class a {}");
        write(&input, "src/main/java/pkg/b.java", "class b {}");
        write(&input, "src/main/java/pkg/config.properties", "key=value");
        write(&input, "src/main/java/other/C.java", "class C {}");
        fs::write(&classes, "# entry points\npkg.a\n").unwrap();

        let request = MinifyRequest {
            java_home,
            classes_file: classes,
            additional_file: None,
            output: Some(temp.path().join("weka-min")),
            input,
            seeds: SeedSet::new(seeds.iter().copied()).unwrap(),
            verify: false,
        };

        Self { temp, request }
    }

    fn output(&self) -> PathBuf {
        self.request.output.clone().unwrap()
    }

    fn run(&self, resolver: &dyn DependencyResolver) -> EnvminResult<()> {
        let config = Config::default();
        Minifier::new(&config, resolver, &SucceedingBuild)
            .execute(&self.request)
            .map(|_| ())
    }
}

#[test]
fn test_only_required_sources_are_copied() {
    let env = Environment::new(&["pkg.a"]);
    env.run(&FixedResolver(vec!["pkg.a"])).unwrap();

    assert_eq!(
        files_under(&env.output()),
        vec![
            "build.xml",
            "lib/mtj.jar",
            "pom.xml",
            "src/main/java/pkg/a.java",
            "src/main/java/pkg/config.properties",
        ]
    );
}

#[test]
fn test_resolver_failure_leaves_output_untouched() {
    let env = Environment::new(&["pkg.a"]);
    write(&env.output(), "keep.txt", "from an earlier run");

    let error = env.run(&BrokenResolver).unwrap_err();

    assert!(matches!(error, EnvminError::Resolution(_)));
    assert!(error.to_string().contains("class path is empty"));
    assert!(!error.is_invocation_error());
    assert_eq!(files_under(&env.output()), vec!["keep.txt"]);
}

#[test]
fn test_stale_output_is_removed() {
    let env = Environment::new(&["pkg.a"]);
    write(&env.output(), "old.txt", "stale");
    write(&env.output(), "src/main/java/pkg/b.java", "stale copy");

    env.run(&FixedResolver(vec!["pkg.a"])).unwrap();

    let files = files_under(&env.output());
    assert!(!files.contains(&"old.txt".to_string()));
    assert!(!files.contains(&"src/main/java/pkg/b.java".to_string()));
    assert!(files.contains(&"src/main/java/pkg/a.java".to_string()));
}

#[test]
fn test_colocated_resources_follow_sources() {
    let env = Environment::new(&["pkg.a"]);
    env.run(&FixedResolver(vec!["pkg.a"])).unwrap();

    let copied = env.output().join("src/main/java/pkg/config.properties");
    assert_eq!(fs::read_to_string(copied).unwrap(), "key=value");
    assert!(!env.output().join("src/main/java/other").exists());
}

#[test]
fn test_repeated_runs_produce_same_tree() {
    let env = Environment::new(&["pkg"]);
    let resolver = FixedResolver(vec!["pkg.a", "pkg.b", "java.lang.Object"]);

    env.run(&resolver).unwrap();
    let first = files_under(&env.output());
    env.run(&resolver).unwrap();
    let second = files_under(&env.output());

    assert_eq!(first, second);
    assert!(first.contains(&"src/main/java/pkg/b.java".to_string()));
}

#[test]
fn test_binary_rejects_missing_arguments() {
    let output = envmin_command().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_binary_rejects_missing_java_home() {
    let env = Environment::new(&["pkg.a"]);
    let output = envmin_command()
        .arg("--java-home")
        .arg(env.temp.path().join("no-jdk"))
        .arg("--classes")
        .arg(&env.request.classes_file)
        .arg("--input")
        .arg(&env.request.input)
        .arg("--output")
        .arg(env.output())
        .arg("--packages")
        .arg("pkg")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
    assert!(!env.output().exists());
}

#[test]
fn test_binary_rejects_blank_packages() {
    let env = Environment::new(&["pkg.a"]);
    let output = envmin_command()
        .arg("--java-home")
        .arg(&env.request.java_home)
        .arg("--classes")
        .arg(&env.request.classes_file)
        .arg("--input")
        .arg(&env.request.input)
        .arg("--output")
        .arg(env.output())
        .arg("--packages")
        .arg(" ")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("must not be blank"));
    assert!(!env.output().exists());
}

#[test]
fn test_binary_rejects_output_aliasing_input() {
    let env = Environment::new(&["pkg.a"]);
    let alias = env.request.input.join("..").join("weka");
    let output = envmin_command()
        .arg("--java-home")
        .arg(&env.request.java_home)
        .arg("--classes")
        .arg(&env.request.classes_file)
        .arg("--input")
        .arg(&env.request.input)
        .arg("--output")
        .arg(&alias)
        .arg("--packages")
        .arg("pkg")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("overlaps the input"));
    assert!(env.request.input.join("src/main/java/pkg/a.java").exists());
    assert!(env.request.input.join("build.xml").exists());
}

#[test]
fn test_binary_reports_execution_failure() {
    let env = Environment::new(&["pkg.a"]);
    let config = env.temp.path().join("config.yaml");
    fs::write(&config, "build_command: [envmin-no-such-build-tool]\n").unwrap();

    let output = envmin_command()
        .arg("--java-home")
        .arg(&env.request.java_home)
        .arg("--classes")
        .arg(&env.request.classes_file)
        .arg("--input")
        .arg(&env.request.input)
        .arg("--output")
        .arg(env.output())
        .arg("--packages")
        .arg("pkg")
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed building input environment"));
    assert!(!env.output().exists());
}

#[test]
fn test_binary_help_succeeds() {
    let output = envmin_command().arg("--help").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--packages"));
}

//! CLI test runner with fluent assertions.
//!
//! Provides infrastructure for executing the `coach` binary against a
//! throwaway database and verifying output, exit codes and JSON responses in
//! robot mode.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;
use tempfile::TempDir;

/// Settings written for every runner: fast onboarding, default ingest.
const TEST_SETTINGS: &str = "[onboarding]\nstep_interval_ms = 5\n";

/// Configuration for CLI test runs.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Environment variables to set for the command.
    pub env_vars: HashMap<String, String>,
    /// Environment variables to remove for the command.
    pub env_removed: Vec<String>,
    /// Standard input to provide to the command.
    pub stdin: Option<String>,
}

/// Test runner for the `coach` binary.
///
/// Each runner owns a temporary home with its own settings file and
/// database, so runs never touch the user's real profile.
///
/// # Example
///
/// ```ignore
/// let cli = CliRunner::new();
/// cli.onboard("Ana Souza", "(11) 98765-4321");
/// cli.run_robot(&["show"])
///    .assert_success()
///    .assert_json_field("/config/isOnboarded", &Value::Bool(true));
/// ```
pub struct CliRunner {
    binary_path: PathBuf,
    home: TempDir,
    config: CliConfig,
}

impl Default for CliRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRunner {
    /// Create a runner pointing at the compiled `coach` binary.
    ///
    /// # Panics
    ///
    /// Panics if the temporary home cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let binary = env!("CARGO_BIN_EXE_coach");
        let home = TempDir::new().expect("Failed to create temp home");
        std::fs::write(home.path().join("settings.toml"), TEST_SETTINGS)
            .expect("Failed to write test settings");
        Self {
            binary_path: PathBuf::from(binary),
            home,
            config: CliConfig::default(),
        }
    }

    /// Temporary home directory of this runner.
    #[must_use]
    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Database file used by this runner.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.home.path().join("coach.db")
    }

    /// Settings file used by this runner.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.home.path().join("settings.toml")
    }

    /// Replace the settings file contents.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_settings(&self, content: &str) {
        std::fs::write(self.settings_path(), content).expect("Failed to write settings");
    }

    /// Add an environment variable for command execution.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.config
            .env_vars
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Remove an inherited environment variable for command execution.
    #[must_use]
    pub fn without_env(mut self, key: &str) -> Self {
        self.config.env_removed.push(key.to_string());
        self
    }

    /// Set standard input for the command.
    #[must_use]
    pub fn with_stdin(mut self, stdin: &str) -> Self {
        self.config.stdin = Some(stdin.to_string());
        self
    }

    /// Build the command with the runner's environment, without arguments.
    ///
    /// `COACH_CONFIG` and `COACH_DB` point into the temporary home unless a
    /// test overrides them with [`Self::with_env`].
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary_path);
        cmd.env("COACH_CONFIG", self.settings_path())
            .env("COACH_DB", self.db_path())
            .env_remove("COACH_FORMAT")
            .env_remove("RUST_LOG")
            .current_dir(self.home.path());
        for key in &self.config.env_removed {
            cmd.env_remove(key);
        }
        for (key, value) in &self.config.env_vars {
            cmd.env(key, value);
        }
        cmd
    }

    /// Execute the command with the given arguments.
    ///
    /// # Panics
    ///
    /// Panics if the command fails to execute.
    #[must_use]
    pub fn run(&self, args: &[&str]) -> CliResult {
        let start = Instant::now();

        let mut cmd = self.command();
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().expect("Failed to execute command");
        if let Some(mut stdin) = child.stdin.take() {
            if let Some(input) = &self.config.stdin {
                stdin
                    .write_all(input.as_bytes())
                    .expect("Failed to write stdin");
            }
        }
        let output = child.wait_with_output().expect("Failed to wait for command");
        let duration = start.elapsed();

        CliResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration,
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Execute with `--robot` flag for JSON output.
    #[must_use]
    pub fn run_robot(&self, args: &[&str]) -> CliResult {
        let mut full_args = vec!["--robot"];
        full_args.extend(args);
        self.run(&full_args)
    }

    /// Complete onboarding so dashboard commands are reachable.
    ///
    /// # Panics
    ///
    /// Panics if onboarding fails.
    pub fn onboard(&self, name: &str, phone: &str) {
        self.run_robot(&["onboard", "--name", name, "--phone", phone])
            .assert_success();
    }
}

/// Captured output from CLI execution with fluent assertions.
#[derive(Debug, Clone)]
pub struct CliResult {
    /// Standard output captured from the command.
    pub stdout: String,
    /// Standard error captured from the command.
    pub stderr: String,
    /// Exit code from the command.
    pub exit_code: i32,
    /// Time taken to execute the command.
    pub duration: Duration,
    /// Arguments passed to the command.
    pub args: Vec<String>,
}

impl CliResult {
    /// Check if the command succeeded (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    // === Fluent Assertions (all return &Self for chaining) ===

    /// Assert the command succeeded.
    ///
    /// # Panics
    ///
    /// Panics if the command did not exit with code 0.
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success(),
            "Command {:?} failed with exit code {}: {}",
            self.args,
            self.exit_code,
            self.stderr
        );
        self
    }

    /// Assert the command failed.
    ///
    /// # Panics
    ///
    /// Panics if the command exited with code 0.
    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.success(),
            "Command {:?} unexpectedly succeeded\nstdout:\n{}",
            self.args,
            self.stdout
        );
        self
    }

    /// Assert a specific exit code.
    ///
    /// # Panics
    ///
    /// Panics if the exit code doesn't match.
    pub fn assert_exit_code(&self, expected: i32) -> &Self {
        assert_eq!(
            self.exit_code, expected,
            "Expected exit code {expected}, got {} for {:?}",
            self.exit_code, self.args
        );
        self
    }

    // === Stdout Assertions ===

    /// Assert stdout contains the given text.
    ///
    /// # Panics
    ///
    /// Panics if stdout doesn't contain the text.
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "stdout does not contain \"{text}\"\nActual stdout:\n{}",
            self.stdout
        );
        self
    }

    /// Assert stdout does not contain the given text.
    ///
    /// # Panics
    ///
    /// Panics if stdout contains the text.
    pub fn assert_stdout_not_contains(&self, text: &str) -> &Self {
        assert!(
            !self.stdout.contains(text),
            "stdout unexpectedly contains \"{text}\"\nActual stdout:\n{}",
            self.stdout
        );
        self
    }

    /// Assert stdout matches a regex pattern.
    ///
    /// # Panics
    ///
    /// Panics if stdout doesn't match the pattern.
    pub fn assert_stdout_matches(&self, pattern: &str) -> &Self {
        let re = regex::Regex::new(pattern).expect("Invalid regex pattern");
        assert!(
            re.is_match(&self.stdout),
            "stdout does not match pattern \"{pattern}\"\nActual stdout:\n{}",
            self.stdout
        );
        self
    }

    // === Stderr Assertions ===

    /// Assert stderr contains the given text.
    ///
    /// # Panics
    ///
    /// Panics if stderr doesn't contain the text.
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "stderr does not contain \"{text}\"\nActual stderr:\n{}",
            self.stderr
        );
        self
    }

    // === JSON Assertions (for robot mode) ===

    /// Parse stdout as a single JSON document.
    ///
    /// # Panics
    ///
    /// Panics if stdout is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|_| panic!("Failed to parse JSON from stdout:\n{}", self.stdout))
    }

    /// Parse stdout as JSON lines (one event per line).
    ///
    /// # Panics
    ///
    /// Panics if any non-empty line is not valid JSON.
    #[must_use]
    pub fn json_lines(&self) -> Vec<Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|_| panic!("Invalid JSON line: {line}"))
            })
            .collect()
    }

    /// Parse the JSON error document robot mode writes to stderr.
    ///
    /// Log lines share stderr, so the error is the trailing pretty-printed
    /// object starting at the last line that is exactly `{`.
    ///
    /// # Panics
    ///
    /// Panics if no error document is found.
    #[must_use]
    pub fn stderr_error_json(&self) -> Value {
        let start = self
            .stderr
            .rfind("\n{\n")
            .map(|i| i + 1)
            .or_else(|| self.stderr.starts_with("{\n").then_some(0))
            .unwrap_or_else(|| panic!("No JSON error on stderr:\n{}", self.stderr));
        serde_json::from_str(&self.stderr[start..])
            .unwrap_or_else(|_| panic!("Failed to parse JSON error:\n{}", self.stderr))
    }

    /// Assert a JSON field matches an expected value using JSON pointer syntax.
    ///
    /// # Panics
    ///
    /// Panics if the field doesn't exist or doesn't match.
    pub fn assert_json_field(&self, json_pointer: &str, expected: &Value) -> &Self {
        let json = self.json();
        let actual = json.pointer(json_pointer).unwrap_or_else(|| {
            panic!(
                "JSON path {json_pointer} not found in:\n{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            )
        });
        assert_eq!(actual, expected, "JSON field {json_pointer} mismatch");
        self
    }

    /// Assert a JSON field exists at the given pointer path.
    ///
    /// # Panics
    ///
    /// Panics if the field doesn't exist.
    pub fn assert_json_field_exists(&self, json_pointer: &str) -> &Self {
        let json = self.json();
        assert!(
            json.pointer(json_pointer).is_some(),
            "JSON path {json_pointer} not found"
        );
        self
    }

    /// Assert a JSON array has the expected length.
    ///
    /// # Panics
    ///
    /// Panics if the field is not an array or has wrong length.
    pub fn assert_json_array_len(&self, json_pointer: &str, expected_len: usize) -> &Self {
        let json = self.json();
        let arr = json
            .pointer(json_pointer)
            .unwrap_or_else(|| panic!("JSON path {json_pointer} not found"))
            .as_array()
            .unwrap_or_else(|| panic!("JSON path {json_pointer} is not an array"));
        assert_eq!(
            arr.len(),
            expected_len,
            "Array at {json_pointer} has {} elements, expected {expected_len}",
            arr.len()
        );
        self
    }

    // === Timing Assertions ===

    /// Assert the command completed within the given duration.
    ///
    /// # Panics
    ///
    /// Panics if the command took longer.
    pub fn assert_duration_under(&self, max: Duration) -> &Self {
        assert!(
            self.duration < max,
            "Command took {:?}, expected under {max:?}",
            self.duration
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_runner_version() {
        let cli = CliRunner::new();
        cli.run(&["version"]).assert_success();
    }

    #[test]
    fn test_cli_runner_robot_mode() {
        let cli = CliRunner::new();
        cli.run_robot(&[])
            .assert_success()
            .assert_json_field("/name", &Value::String("coach".to_string()));
    }

    #[test]
    fn test_cli_runner_invalid_command() {
        let cli = CliRunner::new();
        cli.run(&["nonexistent-command"]).assert_failure();
    }
}

//! Report configuration stored in `report.toml`.
//!
//! Strings hold the positional message templates (see
//! [`crate::core::template`]); the theme maps each semantic label to a
//! console color. Both can be overridden key by key by the embedding
//! application.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::template::has_placeholder;
use crate::core::types::Color;

pub const DEFAULT_CONFIG_FILE: &str = "report.toml";

/// Report configuration (TOML).
///
/// Missing fields fall back to the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    pub strings: Strings,
    pub theme: Theme,
}

/// Message templates. An empty `contexts_passed` suppresses the contexts line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Strings {
    pub start_message: String,
    pub filter_message: String,
    pub tag_message: String,
    /// Joins multiple filter values inside the filter and tag messages.
    pub message_separator: String,

    pub coverage_title: String,
    /// `{0}` command label, `{1}` file label, `{2}` percentage,
    /// `{3}` analyzed commands, `{4}` analyzed files.
    pub coverage_message: String,
    pub missed_singular: String,
    pub missed_plural: String,
    pub command_singular: String,
    pub command_plural: String,
    pub file_singular: String,
    pub file_plural: String,

    pub describe: String,
    pub context: String,
    /// One indentation step for headers and descriptions.
    pub margin: String,
    pub timing: String,

    pub contexts_passed: String,
    pub contexts_failed: String,
    pub tests_passed: String,
    pub tests_failed: String,
    pub tests_skipped: String,
    pub tests_pending: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            start_message: "Executing all tests in '{0}'".to_string(),
            filter_message: " matching test name '{0}'".to_string(),
            tag_message: " with tags '{0}'".to_string(),
            message_separator: "', '".to_string(),
            coverage_title: "Code coverage report:".to_string(),
            coverage_message: "Covered {2} of {3} analyzed {0} in {4} {1}.".to_string(),
            missed_singular: "Missed command:".to_string(),
            missed_plural: "Missed commands:".to_string(),
            command_singular: "Command".to_string(),
            command_plural: "Commands".to_string(),
            file_singular: "File".to_string(),
            file_plural: "Files".to_string(),
            describe: "Describing {0}".to_string(),
            context: "Context {0}".to_string(),
            margin: "  ".to_string(),
            timing: "Tests completed in {0}".to_string(),
            contexts_passed: String::new(),
            contexts_failed: String::new(),
            tests_passed: "Tests Passed: {0} ".to_string(),
            tests_failed: "Failed: {0} ".to_string(),
            tests_skipped: "Skipped: {0} ".to_string(),
            tests_pending: "Pending: {0} ".to_string(),
        }
    }
}

/// Console color for each semantic label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Theme {
    pub describe: Color,
    pub describe_detail: Color,
    pub context: Color,
    pub context_detail: Color,
    pub pass: Color,
    pub pass_time: Color,
    pub fail: Color,
    pub fail_time: Color,
    pub skipped: Color,
    pub pending: Color,
    pub incomplete: Color,
    pub incomplete_time: Color,
    pub foreground: Color,
    pub information: Color,
    pub coverage: Color,
    pub coverage_warn: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            describe: Color::Green,
            describe_detail: Color::DarkYellow,
            context: Color::Cyan,
            context_detail: Color::DarkCyan,
            pass: Color::DarkGreen,
            pass_time: Color::DarkGray,
            fail: Color::Red,
            fail_time: Color::DarkGray,
            skipped: Color::Yellow,
            pending: Color::Gray,
            incomplete: Color::Yellow,
            incomplete_time: Color::DarkGray,
            foreground: Color::White,
            information: Color::DarkGray,
            coverage: Color::White,
            coverage_warn: Color::DarkRed,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<()> {
        let strings = &self.strings;
        if strings.margin.chars().any(|ch| ch != ' ') {
            return Err(anyhow!("strings.margin must contain only spaces"));
        }
        for (key, template) in [
            ("start_message", &strings.start_message),
            ("describe", &strings.describe),
            ("context", &strings.context),
            ("timing", &strings.timing),
        ] {
            if !has_placeholder(template, 0) {
                return Err(anyhow!("strings.{key} must contain the {{0}} placeholder"));
            }
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ReportConfig::default()`.
pub fn load_config(path: &Path) -> Result<ReportConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = ReportConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ReportConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ReportConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

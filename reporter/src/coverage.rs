//! Code-coverage summary appended to the report.
//!
//! The coverage data itself is produced elsewhere; this module only reads it
//! and renders the covered percentage plus a table of missed commands with
//! file paths shortened to their common parent directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::core::path::{common_parent, relative_to};
use crate::core::template::{format_count, format_percent, format_template};
use crate::core::types::Color;
use crate::io::config::ReportConfig;
use crate::render::ReportLine;

/// Coverage data for one run, as reported by the instrumentation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageReport {
    pub analyzed_files: Vec<PathBuf>,
    pub commands_analyzed: usize,
    pub commands_executed: usize,
    /// In the order the instrumentation reported them.
    #[serde(default)]
    pub missed_commands: Vec<MissedCommand>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissedCommand {
    pub file: PathBuf,
    #[serde(default)]
    pub function: Option<String>,
    pub line: u32,
    pub command: String,
}

impl CoverageReport {
    /// Number of distinct analyzed files.
    pub fn file_count(&self) -> usize {
        self.analyzed_files.iter().collect::<BTreeSet<_>>().len()
    }

    /// Executed share of analyzed commands; `None` when nothing was analyzed.
    pub fn executed_fraction(&self) -> Option<f64> {
        (self.commands_analyzed > 0)
            .then(|| self.commands_executed as f64 / self.commands_analyzed as f64)
    }
}

/// Load a coverage report from a JSON file.
pub fn load_coverage(path: &Path) -> Result<CoverageReport> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let report: CoverageReport = serde_json::from_str(&contents)
        .with_context(|| format!("parse coverage report {}", path.display()))?;
    debug!(
        path = %path.display(),
        analyzed = report.commands_analyzed,
        missed = report.missed_commands.len(),
        "coverage report loaded"
    );
    Ok(report)
}

/// Coverage lines for the report. Empty when there is no report or it
/// analyzed no commands.
pub fn summarize_coverage(
    report: Option<&CoverageReport>,
    config: &ReportConfig,
) -> Vec<ReportLine> {
    let Some(report) = report else {
        return Vec::new();
    };
    let Some(fraction) = report.executed_fraction() else {
        return Vec::new();
    };
    let strings = &config.strings;
    let theme = &config.theme;

    let file_count = report.file_count();
    let command_label = if report.commands_analyzed > 1 {
        &strings.command_plural
    } else {
        &strings.command_singular
    };
    let file_label = if file_count > 1 {
        &strings.file_plural
    } else {
        &strings.file_singular
    };
    let message = format_template(
        &strings.coverage_message,
        &[
            command_label.clone(),
            file_label.clone(),
            format_percent(fraction),
            format_count(report.commands_analyzed),
            format_count(file_count),
        ],
    );

    let mut lines = vec![
        ReportLine::blank(),
        ReportLine::colored(theme.coverage, strings.coverage_title.as_str()),
    ];
    if report.missed_commands.is_empty() {
        lines.push(ReportLine::colored(theme.coverage, message));
        return lines;
    }

    let missed_label = if report.missed_commands.len() == 1 {
        &strings.missed_singular
    } else {
        &strings.missed_plural
    };
    lines.push(ReportLine::colored(theme.coverage_warn, message));
    lines.push(ReportLine::colored(theme.coverage_warn, missed_label.as_str()));
    lines.extend(missed_table(report, theme.foreground));
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

const COLUMNS: [(&str, Align); 4] = [
    ("File", Align::Left),
    ("Function", Align::Left),
    ("Line", Align::Right),
    ("Command", Align::Left),
];

fn missed_table(report: &CoverageReport, color: Color) -> Vec<ReportLine> {
    let parent = common_parent(&report.analyzed_files);
    let rows: Vec<[String; 4]> = report
        .missed_commands
        .iter()
        .map(|missed| {
            [
                relative_to(&missed.file, &parent),
                missed.function.clone().unwrap_or_default(),
                missed.line.to_string(),
                missed.command.lines().map(str::trim).collect::<Vec<_>>().join(" "),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(|(header, _)| header.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let header = COLUMNS.map(|(header, _)| header.to_string());
    let underline = COLUMNS.map(|(header, _)| "-".repeat(header.width()));
    [header, underline]
        .iter()
        .chain(&rows)
        .map(|row| ReportLine::colored(color, table_row(row, &widths)))
        .collect()
}

fn table_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let last = cells.len() - 1;
    let mut out = String::new();
    for (index, ((cell, width), (_, align))) in cells.iter().zip(widths).zip(COLUMNS).enumerate() {
        if index > 0 {
            out.push(' ');
        }
        let pad = " ".repeat(width.saturating_sub(cell.width()));
        match align {
            Align::Right => {
                out.push_str(&pad);
                out.push_str(cell);
            }
            Align::Left if index == last => out.push_str(cell),
            Align::Left => {
                out.push_str(cell);
                out.push_str(&pad);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missed(file: &str, function: &str, line: u32, command: &str) -> MissedCommand {
        MissedCommand {
            file: PathBuf::from(file),
            function: Some(function.to_string()),
            line,
            command: command.to_string(),
        }
    }

    fn texts(lines: &[ReportLine]) -> Vec<String> {
        lines.iter().map(ReportLine::text).collect()
    }

    fn two_file_report() -> CoverageReport {
        CoverageReport {
            analyzed_files: vec![
                PathBuf::from("/repo/src/math/add.ps1"),
                PathBuf::from("/repo/src/io/read.ps1"),
            ],
            commands_analyzed: 10,
            commands_executed: 7,
            missed_commands: vec![
                missed("/repo/src/math/add.ps1", "Add", 4, "return $a + $b"),
                missed("/repo/src/io/read.ps1", "Read", 12, "Get-Content $path"),
                missed("/repo/src/io/read.ps1", "Read", 108, "throw"),
            ],
        }
    }

    #[test]
    fn absent_or_empty_report_renders_nothing() {
        let config = ReportConfig::default();
        assert!(summarize_coverage(None, &config).is_empty());
        let empty = CoverageReport::default();
        assert!(summarize_coverage(Some(&empty), &config).is_empty());
    }

    #[test]
    fn missed_commands_render_warning_and_table() {
        let config = ReportConfig::default();
        let report = two_file_report();
        let lines = summarize_coverage(Some(&report), &config);
        assert_eq!(
            texts(&lines),
            vec![
                "",
                "Code coverage report:",
                "Covered 70.00% of 10 analyzed Commands in 2 Files.",
                "Missed commands:",
                "File         Function Line Command",
                "----         -------- ---- -------",
                "math/add.ps1 Add         4 return $a + $b",
                "io/read.ps1  Read       12 Get-Content $path",
                "io/read.ps1  Read      108 throw",
            ]
        );
        assert_eq!(lines[2].segments[0].color, Color::DarkRed);
        assert_eq!(lines[3].segments[0].color, Color::DarkRed);
        assert_eq!(lines[6].segments[0].color, Color::White);
    }

    #[test]
    fn full_coverage_renders_single_success_line() {
        let config = ReportConfig::default();
        let report = CoverageReport {
            analyzed_files: vec![PathBuf::from("/repo/a.ps1")],
            commands_analyzed: 1,
            commands_executed: 1,
            missed_commands: Vec::new(),
        };
        let lines = summarize_coverage(Some(&report), &config);
        assert_eq!(
            texts(&lines),
            vec![
                "",
                "Code coverage report:",
                "Covered 100.00% of 1 analyzed Command in 1 File."
            ]
        );
        assert_eq!(lines[2].segments[0].color, Color::White);
    }

    #[test]
    fn single_missed_command_uses_singular_label() {
        let config = ReportConfig::default();
        let report = CoverageReport {
            analyzed_files: vec![PathBuf::from("/repo/lib/a.ps1")],
            commands_analyzed: 2_500,
            commands_executed: 2_499,
            missed_commands: vec![missed("/repo/lib/a.ps1", "Init", 1, "exit 1")],
        };
        let lines = summarize_coverage(Some(&report), &config);
        assert_eq!(
            lines[2].text(),
            "Covered 99.96% of 2,500 analyzed Commands in 1 File."
        );
        assert_eq!(lines[3].text(), "Missed command:");
        assert_eq!(lines[6].text(), "a.ps1 Init        1 exit 1");
    }

    #[test]
    fn loads_report_from_json() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("coverage.json");
        fs::write(
            &path,
            r#"{"analyzed_files":["/a/x.ps1"],"commands_analyzed":3,"commands_executed":3}"#,
        )
        .expect("write");
        let report = load_coverage(&path).expect("load");
        assert_eq!(report.file_count(), 1);
        assert!(report.missed_commands.is_empty());
        assert_eq!(report.executed_fraction(), Some(1.0));
    }
}

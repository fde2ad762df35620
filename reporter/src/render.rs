//! Console report rendering.
//!
//! Turns a finished [`RunState`] into styled lines: the start banner,
//! Describe/Context headers interleaved with result lines in execution order,
//! and the trailing summary. Rendering is pure; writing the lines is left to
//! an [`OutputSink`](crate::io::sink::OutputSink).

use tracing::{debug, instrument};
use unicode_width::UnicodeWidthStr;

use crate::core::humanize::humanize_duration;
use crate::core::template::format_template;
use crate::core::types::{Block, Color, ResultKind, Scope, TestOutcome};
use crate::coverage::{CoverageReport, summarize_coverage};
use crate::io::config::ReportConfig;
use crate::run_state::RunState;

/// A run of text in one color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub color: Color,
    pub text: String,
}

/// One report line made of colored segments. An empty line has no segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportLine {
    pub segments: Vec<Segment>,
}

impl ReportLine {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn colored(color: Color, text: impl Into<String>) -> Self {
        Self::blank().then(color, text)
    }

    /// Append a segment, skipping empty text.
    pub fn then(mut self, color: Color, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.segments.push(Segment { color, text });
        }
        self
    }

    /// Plain text with colors dropped.
    pub fn text(&self) -> String {
        self.segments.iter().map(|segment| segment.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Renders report pieces with one config.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    config: &'a ReportConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Target path, followed by the name and tag filters when present.
    pub fn start_banner(&self, state: &RunState) -> ReportLine {
        let strings = &self.config.strings;
        let options = state.options();
        let mut message = format_template(&strings.start_message, &[options.path.as_str()]);
        if !options.name_filter.is_empty() {
            let joined = options.name_filter.join(strings.message_separator.as_str());
            message.push_str(&format_template(&strings.filter_message, &[joined]));
        }
        if !options.tag_filter.is_empty() {
            let joined = options.tag_filter.join(strings.message_separator.as_str());
            message.push_str(&format_template(&strings.tag_message, &[joined]));
        }
        ReportLine::colored(self.config.theme.foreground, message)
    }

    pub fn describe_header(&self, block: &Block) -> Vec<ReportLine> {
        let strings = &self.config.strings;
        let theme = &self.config.theme;
        let header = format_template(&strings.describe, &[block.name.as_str()]);
        let mut lines = vec![ReportLine::blank(), ReportLine::colored(theme.describe, header)];
        let indent = strings.margin.repeat(2);
        lines.extend(description_lines(block, &indent, theme.describe_detail));
        lines
    }

    /// Description lines align under the context name, past the margin and
    /// the template text preceding it.
    pub fn context_header(&self, block: &Block) -> Vec<ReportLine> {
        let strings = &self.config.strings;
        let theme = &self.config.theme;
        let header = format_template(&strings.context, &[block.name.as_str()]);
        let mut lines = vec![
            ReportLine::blank(),
            ReportLine::colored(theme.context, format!("{}{header}", strings.margin)),
        ];
        let prefix = strings.context.split("{0}").next().unwrap_or_default();
        let indent = " ".repeat(strings.margin.width() + prefix.width());
        lines.extend(description_lines(block, &indent, theme.context_detail));
        lines
    }

    pub fn result_lines(&self, outcome: &TestOutcome) -> Vec<ReportLine> {
        let theme = &self.config.theme;
        let margin = " ".repeat(result_depth(outcome));
        let time = humanize_duration(outcome.duration);
        let name = &outcome.name;

        match outcome.result {
            ResultKind::Passed => vec![
                ReportLine::colored(theme.pass, format!("{margin}[+] {name} "))
                    .then(theme.pass_time, time),
            ],
            ResultKind::Failed => {
                let error_margin = format!("{margin}  ");
                let mut lines = vec![
                    ReportLine::colored(theme.fail, format!("{margin}[-] {name} "))
                        .then(theme.fail_time, time),
                ];
                for block in [&outcome.failure_message, &outcome.stack_trace]
                    .into_iter()
                    .flatten()
                {
                    lines.extend(block.lines().map(|line| {
                        ReportLine::colored(theme.fail, format!("{error_margin}{line}"))
                    }));
                }
                lines
            }
            ResultKind::Skipped => vec![ReportLine::colored(
                theme.skipped,
                format!("{margin}[!] {name} {time}"),
            )],
            ResultKind::Pending => vec![ReportLine::colored(
                theme.pending,
                format!("{margin}[?] {name} {time}"),
            )],
        }
    }

    /// Line for a test that was entered but never produced a result.
    pub fn incomplete_line(&self, state: &RunState) -> Option<ReportLine> {
        let name = state.incomplete_test()?;
        let depth = if state.scopes().context().is_some() { 4 } else { 1 };
        let theme = &self.config.theme;
        Some(
            ReportLine::colored(theme.incomplete, format!("{}[?] {name} ", " ".repeat(depth)))
                .then(theme.incomplete_time, "incomplete"),
        )
    }

    pub fn summary(&self, state: &RunState) -> Vec<ReportLine> {
        let strings = &self.config.strings;
        let theme = &self.config.theme;
        let mut lines = vec![ReportLine::colored(
            theme.foreground,
            format_template(&strings.timing, &[humanize_duration(state.total_duration())]),
        )];

        let (success, failure) = if state.failed_count() > 0 {
            (theme.foreground, theme.fail)
        } else {
            (theme.pass, theme.information)
        };
        let skipped = if state.skipped_count() > 0 {
            theme.skipped
        } else {
            theme.information
        };
        let pending = if state.pending_count() > 0 {
            theme.pending
        } else {
            theme.information
        };

        if !strings.contexts_passed.is_empty() {
            let contexts = state.context_counts();
            lines.push(
                ReportLine::colored(success, count_text(&strings.contexts_passed, contexts.passed))
                    .then(failure, count_text(&strings.contexts_failed, contexts.failed)),
            );
        }

        let tests = ReportLine::blank()
            .then(success, count_text(&strings.tests_passed, state.passed_count()))
            .then(failure, count_text(&strings.tests_failed, state.failed_count()))
            .then(skipped, count_text(&strings.tests_skipped, state.skipped_count()))
            .then(pending, count_text(&strings.tests_pending, state.pending_count()));
        if !tests.is_blank() {
            lines.push(tests);
        }
        lines
    }
}

/// Full console report for a run, followed by the coverage summary if any.
#[instrument(skip_all, fields(outcomes = state.total_count()))]
pub fn render_report(
    state: &RunState,
    coverage: Option<&CoverageReport>,
    config: &ReportConfig,
) -> Vec<ReportLine> {
    let renderer = Renderer::new(config);
    let mut lines = vec![renderer.start_banner(state)];

    let mut blocks = state.blocks().iter().peekable();
    for (index, outcome) in state.outcomes().iter().enumerate() {
        while let Some(entry) = blocks.next_if(|entry| entry.first_outcome <= index) {
            lines.extend(header_lines(&renderer, entry.scope, &entry.block));
        }
        lines.extend(renderer.result_lines(outcome));
    }
    for entry in blocks {
        lines.extend(header_lines(&renderer, entry.scope, &entry.block));
    }
    lines.extend(renderer.incomplete_line(state));

    lines.extend(renderer.summary(state));
    lines.extend(summarize_coverage(coverage, config));
    debug!(lines = lines.len(), "report rendered");
    lines
}

/// Journaled blocks are only ever Describe or Context.
fn header_lines(renderer: &Renderer<'_>, scope: Scope, block: &Block) -> Vec<ReportLine> {
    if scope == Scope::Context {
        renderer.context_header(block)
    } else {
        renderer.describe_header(block)
    }
}

fn count_text(template: &str, count: usize) -> String {
    format_template(template, &[count.to_string()])
}

fn description_lines(block: &Block, indent: &str, color: Color) -> Vec<ReportLine> {
    block
        .description
        .iter()
        .flat_map(|description| description.lines())
        .map(|line| ReportLine::colored(color, format!("{indent}{line}")))
        .collect()
}

/// 4 inside a Context, 1 directly under a Describe, 0 outside any block.
fn result_depth(outcome: &TestOutcome) -> usize {
    if outcome.context.is_some() {
        4
    } else if outcome.describe.is_some() {
        1
    } else {
        0
    }
}

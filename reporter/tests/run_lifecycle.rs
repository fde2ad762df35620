//! End-to-end run tests: drive a `RunState` the way a runner would, then
//! render the complete report including coverage.

use std::path::PathBuf;
use std::time::Duration;

use reporter::core::types::{Block, ResultKind, Scope};
use reporter::coverage::{CoverageReport, MissedCommand};
use reporter::io::config::ReportConfig;
use reporter::io::sink::{ConsoleSink, write_lines};
use reporter::render::{ReportLine, render_report};
use reporter::test_support::{ManualClock, manual_state};
use reporter::{Error, RunOptions, TestResult, Violation};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Full lifecycle: nested blocks, clock-derived durations, one failure,
/// then the rendered report with a coverage table.
///
/// ```text
/// Describe Calculator
/// ├── It is constructed        (top level, passes)
/// └── Context adding
///     ├── It adds              (passes)
///     └── It overflows         (fails)
/// ```
#[test]
fn full_run_renders_hierarchical_report() {
    let clock = ManualClock::default();
    let options = RunOptions {
        path: "tests/calculator".to_string(),
        tag_filter: vec!["math".to_string()],
        ..RunOptions::default()
    };
    let mut state = manual_state(options, &clock);

    state
        .enter_describe(Block::new("Calculator").with_description("Basic arithmetic"))
        .expect("describe");
    state.enter_test("is constructed").expect("test");
    clock.set(ms(100));
    state.add_result(TestResult::new("is constructed", ResultKind::Passed));
    state.leave_test();

    state.enter_context("adding").expect("context");
    state.enter_test("adds").expect("test");
    clock.set(ms(250));
    state.add_result(TestResult::new("adds", ResultKind::Passed));
    assert_eq!(state.scope(), Some(Scope::It));
    assert_eq!(state.parent_scope(), Some(Scope::Context));
    state.leave_test();
    assert_eq!(state.scope(), Some(Scope::Context));
    assert_eq!(state.parent_scope(), Some(Scope::Describe));

    state.enter_test("overflows").expect("test");
    clock.set(ms(1_450));
    state.add_result(
        TestResult::new("overflows", ResultKind::Failed)
            .with_failure("Expected 0, but got 256", Some("at add, line 3".to_string())),
    );
    state.leave_test();
    state.leave_context().expect("leave context");
    state.leave_describe().expect("leave describe");
    assert!(state.scopes().is_idle());

    let durations: Vec<Duration> = state.outcomes().iter().map(|o| o.duration).collect();
    assert_eq!(durations, vec![ms(100), ms(150), ms(1_200)]);

    let coverage = CoverageReport {
        analyzed_files: vec![
            PathBuf::from("/src/calc/add.ps1"),
            PathBuf::from("/src/calc/util/bits.ps1"),
        ],
        commands_analyzed: 10,
        commands_executed: 7,
        missed_commands: vec![
            MissedCommand {
                file: PathBuf::from("/src/calc/add.ps1"),
                function: Some("Add".to_string()),
                line: 3,
                command: "throw 'overflow'".to_string(),
            },
            MissedCommand {
                file: PathBuf::from("/src/calc/util/bits.ps1"),
                function: None,
                line: 9,
                command: "$x -shl 1".to_string(),
            },
            MissedCommand {
                file: PathBuf::from("/src/calc/util/bits.ps1"),
                function: Some("Mask".to_string()),
                line: 14,
                command: "return 0".to_string(),
            },
        ],
    };

    let config = ReportConfig::default();
    let lines = render_report(&state, Some(&coverage), &config);
    let text: Vec<String> = lines.iter().map(ReportLine::text).collect();
    assert_eq!(
        text,
        vec![
            "Executing all tests in 'tests/calculator' with tags 'math'",
            "",
            "Describing Calculator",
            "    Basic arithmetic",
            " [+] is constructed 100ms",
            "",
            "  Context adding",
            "    [+] adds 150ms",
            "    [-] overflows 1.2s",
            "      Expected 0, but got 256",
            "      at add, line 3",
            "Tests completed in 1.45s",
            "Tests Passed: 2 Failed: 1 Skipped: 0 Pending: 0 ",
            "",
            "Code coverage report:",
            "Covered 70.00% of 10 analyzed Commands in 2 Files.",
            "Missed commands:",
            "File          Function Line Command",
            "----          -------- ---- -------",
            "add.ps1       Add         3 throw 'overflow'",
            "util/bits.ps1             9 $x -shl 1",
            "util/bits.ps1 Mask       14 return 0",
        ]
    );

    let mut sink = ConsoleSink::new(Vec::new(), false);
    write_lines(&mut sink, &lines).expect("write");
    let printed = String::from_utf8(sink.into_inner()).expect("utf8");
    assert_eq!(printed.lines().count(), lines.len());
}

/// Strict mode turns skipped and pending tests into failures, so a run
/// with no real failures still fails.
#[test]
fn strict_run_leaves_only_passed_and_failed() {
    let options = RunOptions {
        strict: true,
        ..RunOptions::default()
    };
    let mut state = manual_state(options, &ManualClock::default());
    state.enter_describe("Feature").expect("describe");
    for kind in [ResultKind::Passed, ResultKind::Skipped, ResultKind::Pending] {
        state.add_result(TestResult::new(kind.as_str(), kind).with_duration(ms(1)));
    }
    state.leave_describe().expect("leave");

    assert_eq!(state.total_count(), 3);
    assert!(
        state
            .outcomes()
            .iter()
            .all(|o| matches!(o.result, ResultKind::Passed | ResultKind::Failed))
    );
    assert_eq!(state.failed_count(), 2);

    let text: Vec<String> = render_report(&state, None, &ReportConfig::default())
        .iter()
        .map(ReportLine::text)
        .collect();
    assert!(text.contains(&" [-] Skipped 1ms".to_string()));
    assert!(text.iter().any(|line| line.contains("translated to Failed")));
}

/// Every well-formed sequence records exactly one outcome per `add_result`.
#[test]
fn outcome_count_matches_add_result_calls() {
    let mut state = manual_state(RunOptions::default(), &ManualClock::default());
    let mut calls = 0;
    for describe in ["A", "B"] {
        state.enter_describe(describe).expect("describe");
        for context in ["x", "y"] {
            state.enter_context(context).expect("context");
            for test in ["1", "2", "3"] {
                state.enter_test(test).expect("test");
                state.add_result(TestResult::new(test, ResultKind::Passed));
                calls += 1;
                state.leave_test();
            }
            state.leave_context().expect("leave context");
        }
        state.leave_describe().expect("leave describe");
    }
    assert_eq!(state.total_count(), calls);
    assert_eq!(state.blocks().len(), 6);
}

#[test]
fn second_context_is_a_protocol_violation() {
    let mut state = manual_state(RunOptions::default(), &ManualClock::default());
    state.enter_describe("A").expect("describe");
    state.enter_context("B").expect("context");
    let err = state.enter_context("C").expect_err("nested context");
    assert_eq!(err, Error::ProtocolViolation(Violation::ContextAlreadyActive));
    assert_eq!(
        err.to_string(),
        "protocol violation: you already are in Context, you cannot enter Context twice"
    );
}

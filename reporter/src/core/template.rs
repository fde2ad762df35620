//! Positional message templates (`"Describing {0}"`).
//!
//! Templates are plain strings so they can be localized or customized from
//! the report config. `{N}` is replaced by the N-th argument, `{{` and `}}`
//! produce literal braces, and a placeholder with no matching argument is
//! left as written.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{(\d+)\}").expect("placeholder regex is valid"));

/// Substitute positional arguments into `template`.
pub fn format_template<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match caps.get(1) {
            Some(index) => index
                .as_str()
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .map(|arg| arg.as_ref().to_string())
                .unwrap_or_else(|| caps[0].to_string()),
            None => caps[0][..1].to_string(),
        })
        .into_owned()
}

/// True if `template` references placeholder `{index}`.
pub fn has_placeholder(template: &str, index: usize) -> bool {
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .any(|found| found.as_str().parse::<usize>().ok() == Some(index))
}

/// Fraction as a percentage with two decimals (`0.7` -> `"70.00%"`).
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Integer with thousands separators (`12345` -> `"12,345"`).
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

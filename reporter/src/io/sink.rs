//! Output sinks for rendered report lines.

use std::io::{self, Write};

use owo_colors::{AnsiColors, OwoColorize};

use crate::core::types::Color;
use crate::render::ReportLine;

/// Destination for styled report lines.
pub trait OutputSink {
    fn write_line(&mut self, line: &ReportLine) -> io::Result<()>;
}

/// Collects lines in memory.
impl OutputSink for Vec<ReportLine> {
    fn write_line(&mut self, line: &ReportLine) -> io::Result<()> {
        self.push(line.clone());
        Ok(())
    }
}

/// Writes lines to a terminal-like writer, with ANSI colors when enabled.
#[derive(Debug)]
pub struct ConsoleSink<W: Write> {
    out: W,
    colored: bool,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(colored: bool) -> Self {
        Self::new(io::stdout(), colored)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, colored: bool) -> Self {
        Self { out, colored }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for ConsoleSink<W> {
    fn write_line(&mut self, line: &ReportLine) -> io::Result<()> {
        for segment in &line.segments {
            if self.colored {
                write!(self.out, "{}", segment.text.color(ansi(segment.color)))?;
            } else {
                self.out.write_all(segment.text.as_bytes())?;
            }
        }
        writeln!(self.out)
    }
}

/// Write `lines` to `sink` in order.
pub fn write_lines(sink: &mut dyn OutputSink, lines: &[ReportLine]) -> io::Result<()> {
    for line in lines {
        sink.write_line(line)?;
    }
    Ok(())
}

fn ansi(color: Color) -> AnsiColors {
    match color {
        Color::Black => AnsiColors::Black,
        Color::DarkBlue => AnsiColors::Blue,
        Color::DarkGreen => AnsiColors::Green,
        Color::DarkCyan => AnsiColors::Cyan,
        Color::DarkRed => AnsiColors::Red,
        Color::DarkMagenta => AnsiColors::Magenta,
        Color::DarkYellow => AnsiColors::Yellow,
        Color::Gray => AnsiColors::White,
        Color::DarkGray => AnsiColors::BrightBlack,
        Color::Blue => AnsiColors::BrightBlue,
        Color::Green => AnsiColors::BrightGreen,
        Color::Cyan => AnsiColors::BrightCyan,
        Color::Red => AnsiColors::BrightRed,
        Color::Magenta => AnsiColors::BrightMagenta,
        Color::Yellow => AnsiColors::BrightYellow,
        Color::White => AnsiColors::BrightWhite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<ReportLine> {
        vec![
            ReportLine::colored(Color::DarkGreen, " [+] works ").then(Color::DarkGray, "3ms"),
            ReportLine::blank(),
        ]
    }

    #[test]
    fn plain_console_output_has_no_escapes() {
        let mut sink = ConsoleSink::new(Vec::new(), false);
        write_lines(&mut sink, &lines()).expect("write");
        let out = String::from_utf8(sink.into_inner()).expect("utf8");
        assert_eq!(out, " [+] works 3ms\n\n");
    }

    #[test]
    fn colored_console_output_wraps_segments() {
        let mut sink = ConsoleSink::new(Vec::new(), true);
        write_lines(&mut sink, &lines()).expect("write");
        let out = String::from_utf8(sink.into_inner()).expect("utf8");
        assert!(out.contains("\u{1b}[32m [+] works \u{1b}[39m"), "{out:?}");
        assert!(out.contains("\u{1b}[90m3ms\u{1b}[39m"), "{out:?}");
    }

    #[test]
    fn vec_sink_captures_lines() {
        let mut captured: Vec<ReportLine> = Vec::new();
        write_lines(&mut captured, &lines()).expect("write");
        assert_eq!(captured, lines());
    }
}

//! Step-by-step progress output for a PDF run.
//!
//! The pipeline talks to a [`Reporter`] and never checks whether reporting
//! is enabled: `--quiet` just selects [`QuietReporter`].

use std::io::{self, Stderr, Stdout, Write};
use std::path::Path;

/// Receives progress events from the pipeline
pub trait Reporter {
    /// Resets counters and errors for a run of `total` steps
    fn start(&mut self, total: usize);
    /// Moves to the next step
    fn advance(&mut self, label: &str);
    /// Records a recovered per-card failure for the final summary
    fn record_error(&mut self, subject: &str, message: &str);
    /// Prints the final summary for a run that wrote `output_path`
    fn finish(&mut self, output_path: &Path);
}

/// Counters behind the console output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub current_index: usize,
    pub total_operations: usize,
    pub errors: Vec<(String, String)>,
}

/// Prints `[n/total] label` lines to stdout and the error summary to stderr
pub struct ConsoleReporter<O: Write = Stdout, E: Write = Stderr> {
    state: ProgressState,
    out: O,
    err: E,
}

impl ConsoleReporter<Stdout, Stderr> {
    pub fn new() -> Self {
        Self::with_writers(io::stdout(), io::stderr())
    }
}

impl Default for ConsoleReporter<Stdout, Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn with_writers(out: O, err: E) -> Self {
        Self {
            state: ProgressState::default(),
            out,
            err,
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Hands back the writers, mainly so tests can inspect what was printed
    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }
}

// Console output is best effort: a closed stdout must not abort the run.
impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn start(&mut self, total: usize) {
        self.state = ProgressState {
            total_operations: total,
            ..ProgressState::default()
        };
    }

    fn advance(&mut self, label: &str) {
        self.state.current_index += 1;
        let _ = writeln!(
            self.out,
            "[{}/{}] {}",
            self.state.current_index, self.state.total_operations, label
        );
    }

    fn record_error(&mut self, subject: &str, message: &str) {
        self.state
            .errors
            .push((subject.to_string(), message.to_string()));
    }

    fn finish(&mut self, output_path: &Path) {
        if self.state.errors.is_empty() {
            let name = output_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| output_path.display().to_string());
            let _ = writeln!(self.out, "\n✅ Successfully generated PDF '{}'", name);
        } else {
            let _ = writeln!(
                self.err,
                "\n❌ PDF generation completed with {} error(s):",
                self.state.errors.len()
            );
            for (subject, message) in &self.state.errors {
                let _ = writeln!(self.err, "   • {}: {}", subject, message);
            }
        }
        let _ = self.out.flush();
        let _ = self.err.flush();
    }
}

/// Reporter for `--quiet`: prints nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct QuietReporter;

impl Reporter for QuietReporter {
    fn start(&mut self, _total: usize) {}
    fn advance(&mut self, _label: &str) {}
    fn record_error(&mut self, _subject: &str, _message: &str) {}
    fn finish(&mut self, _output_path: &Path) {}
}

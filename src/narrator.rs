//! Step-by-step narration of a row reduction, as shown by the command line tools.

use std::{io::Write, thread, time::Duration};

use tracing::warn;

use crate::tensors::{
    matrix::Matrix,
    row_reduce::{ReductionObserver, ReductionStep, RowOperation},
};

/// Settings of the interactive mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NarratorSettings {
    /// Pause after every row operation.
    pub delay: Duration,
}

impl Default for NarratorSettings {
    fn default() -> Self {
        NarratorSettings {
            delay: Duration::from_secs(1),
        }
    }
}

/// Parse a pause given in (fractional) seconds, as accepted on the command line.
pub fn parse_delay(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", s))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid delay '{}': {}", s, e))
}

/// Writes every decision of the reduction to `out`, and after every row operation the
/// operation and the updated matrix, followed by a pause.
pub struct Narrator<W: Write> {
    out: W,
    settings: NarratorSettings,
}

impl<W: Write> Narrator<W> {
    pub fn new(out: W, settings: NarratorSettings) -> Narrator<W> {
        Narrator { out, settings }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, header: &dyn std::fmt::Display, matrix: Option<&Matrix>) {
        let r = match matrix {
            Some(m) => writeln!(self.out, "{}\n{}", header, m),
            None => writeln!(self.out, "{}", header),
        };

        if let Err(e) = r.and_then(|_| self.out.flush()) {
            warn!("Could not write narration: {}", e);
        }
    }
}

impl<W: Write> ReductionObserver for Narrator<W> {
    fn step(&mut self, step: &ReductionStep, matrix: &Matrix) {
        match step {
            // the initial matrix
            ReductionStep::Start => {
                let r = writeln!(self.out, "{}", matrix);
                if let Err(e) = r {
                    warn!("Could not write narration: {}", e);
                }
            }
            _ => self.emit(step, None),
        }
    }

    fn row_operation(&mut self, operation: &RowOperation, matrix: &Matrix) {
        self.emit(operation, Some(matrix));

        if !self.settings.delay.is_zero() {
            thread::sleep(self.settings.delay);
        }
    }
}

//! The stream that driver messages are written to.
//!
//! Diagnostics, reports and banners all go through one [`Console`]. It writes to
//! standard output unless the `me` switch appears anywhere on the command line.
//! The simulated program's own output is not routed through it.

use std::fmt;
use std::io::{self, Write};

use tracing::warn;

/// Standard stream selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stream {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

impl Stream {
    /// Chooses the stream for `tokens`: standard error if any token is `me` (case-insensitive).
    pub fn select<S: AsRef<str>>(tokens: &[S]) -> Self {
        if tokens.iter().any(|token| token.as_ref().eq_ignore_ascii_case("me")) {
            Self::Stderr
        } else {
            Self::Stdout
        }
    }
}

/// Line-oriented message sink.
///
/// Write failures are logged and otherwise ignored.
pub struct Console {
    out: Box<dyn Write>,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

impl Console {
    /// Creates a console on a standard stream.
    pub fn new(stream: Stream) -> Self {
        match stream {
            Stream::Stdout => Self::from_writer(io::stdout()),
            Stream::Stderr => Self::from_writer(io::stderr()),
        }
    }

    /// Creates a console on an arbitrary writer.
    pub fn from_writer(out: impl Write + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    /// Writes `text` without a line terminator.
    pub fn print(&mut self, text: impl AsRef<str>) {
        if let Err(e) = self.out.write_all(text.as_ref().as_bytes()) {
            warn!(error = %e, "console write failed");
        }
    }

    /// Writes `text` followed by a newline.
    pub fn println(&mut self, text: impl AsRef<str>) {
        self.print(text);
        self.print("\n");
    }

    /// Flushes buffered output.
    pub fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "console flush failed");
        }
    }
}

use std::fmt::Display;
use std::io::{self, Write};

use crate::{error::{Error, ErrorKind}, token::Token};

/// Error-reporting sink shared by every stage of a run.
///
/// Writes one diagnostic per error to `sink` and remembers whether a
/// scan/parse error or a runtime error has been seen. The driver owns the
/// reporter and decides when to reset it.
pub struct Reporter<W> {
    sink: W,
    verbose: bool,
    had_error: bool,
    had_runtime_error: bool,
}

impl <W: Write> Reporter<W> {
    pub fn new(sink: W) -> Self {
        Reporter { sink, verbose: false, had_error: false, had_runtime_error: false }
    }

    /// Also write `trace` lines.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn report(&mut self, line: usize, location: &str, message: &str) -> io::Result<()> {
        self.had_error = true;
        writeln!(self.sink, "[line {}] Error{}: {}", line, location, message)
    }

    pub fn token_error(&mut self, token: &Token, message: &str) -> io::Result<()> {
        self.report(token.line(), &token.location(), message)
    }

    pub fn runtime_error(&mut self, error: &Error) -> io::Result<()> {
        self.had_runtime_error = true;
        writeln!(self.sink, "{}\n[line {}]", error.message(), error.line())
    }

    /// Reports `error` through the entry point matching its kind.
    pub fn error(&mut self, error: &Error) -> io::Result<()> {
        match error.kind() {
            ErrorKind::Runtime { .. } => self.runtime_error(error),
            ErrorKind::Syntactic { token } => self.token_error(token, error.message()),
            _ => self.report(error.line(), "", error.message()),
        }
    }

    pub fn trace<D: Display>(&mut self, what: D) -> io::Result<()> {
        if self.verbose {
            writeln!(self.sink, "{}", what)?;
        }
        Ok(())
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Forgets scan/parse errors. The runtime error flag is kept.
    pub fn reset(&mut self) {
        self.had_error = false;
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

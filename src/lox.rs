use std::io::{self, Write};

use crate::{
    interpreter::Interpreter,
    parser::Parser,
    printer,
    report::Reporter,
    scanner::Scanner,
};

/// One interpreter session: runs source text through scan, parse and
/// interpret, writing program output to `Out` and diagnostics to `ErrOut`.
pub struct Lox<Out, ErrOut> {
    interpreter: Interpreter<Out>,
    reporter: Reporter<ErrOut>,
}

impl <Out: Write, ErrOut: Write> Lox<Out, ErrOut> {
    pub fn new(out: Out, err_out: ErrOut) -> Self {
        Self {
            interpreter: Interpreter::new(out),
            reporter: Reporter::new(err_out),
        }
    }

    pub fn verbose(self, verbose: bool) -> Self {
        Self { reporter: self.reporter.verbose(verbose), ..self }
    }

    /// Runs one unit of source. Scan and parse errors are all reported
    /// and prevent execution; a runtime error is reported and ends it.
    /// Only failures writing to `Out` or `ErrOut` are returned.
    pub fn run(&mut self, source: &str) -> io::Result<()> {
        let mut tokens = Vec::new();
        for result in Scanner::new(source).scan_tokens() {
            match result {
                Ok(token) => {
                    self.reporter.trace(&token)?;
                    tokens.push(token);
                },
                Err(e) => self.reporter.error(&e)?,
            }
        }

        let mut statements = Vec::new();
        for result in Parser::new(tokens.into_iter()).parse() {
            match result {
                Ok(statement) => {
                    self.reporter.trace(printer::print_stmt(&statement))?;
                    statements.push(statement);
                },
                Err(e) => self.reporter.error(&e)?,
            }
        }

        if self.reporter.had_error() { return Ok(()) }

        match self.interpreter.interpret(&statements) {
            Err(e) if e.is_io_error() => Err(e.into()),
            Err(e) => self.reporter.error(&e),
            Ok(()) => Ok(()),
        }
    }

    pub fn had_error(&self) -> bool {
        self.reporter.had_error()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.reporter.had_runtime_error()
    }

    /// Clears the scan/parse error flag between prompt inputs.
    pub fn reset_error(&mut self) {
        self.reporter.reset();
    }

    pub fn into_outputs(self) -> (Out, ErrOut) {
        (self.interpreter.into_writer(), self.reporter.into_inner())
    }
}

use std::io;
use std::result;
use std::fmt::{self, Display};

use crate::token::Token;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    Lexical { line: usize },
    Syntactic { token: Token },
    Runtime { token: Token },
    Unexpected,
    Io(io::Error),
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn lexical<S: Into<String>>(line: usize, message: S) -> Error {
        let kind = ErrorKind::Lexical { line };
        Error { kind, message: message.into() }
    }

    pub fn syntactic<S: Into<String>>(token: Token, message: S) -> Error {
        let kind = ErrorKind::Syntactic { token };
        Error { kind, message: message.into() }
    }

    pub fn runtime<S: Into<String>>(token: Token, message: S) -> Error {
        let kind = ErrorKind::Runtime { token };
        Error { kind, message: message.into() }
    }

    pub fn unexpected() -> Error {
        let kind = ErrorKind::Unexpected;
        Error { kind, message: "Unexpected end of input.".into() }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source line the error is attributed to; 0 when there is none.
    pub fn line(&self) -> usize {
        use ErrorKind::*;
        match self.kind() {
            Lexical { line } => *line,
            Syntactic { token } | Runtime { token } => token.line,
            Unexpected | Io(_) => 0,
        }
    }

    pub fn is_runtime_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Runtime { .. })
    }

    pub fn is_io_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Io(_))
    }

    fn loc(&self) -> String {
        match self.kind() {
            ErrorKind::Syntactic { token } => token.location(),
            _ => "".to_string(),
        }
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ErrorKind::Runtime { token } => write!(f, "{}\n[line {}]", self.message, token.line),
            ErrorKind::Io(e) => write!(f, "{}: {}", self.message, e),
            _ => write!(f, "[line {}] Error{}: {}", self.line(), self.loc(), self.message),
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        match e.kind {
            ErrorKind::Io(inner) => inner,
            _ => io::Error::new(io::ErrorKind::Other, e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error { kind: ErrorKind::Io(e), message: "IO error".into() }
    }
}

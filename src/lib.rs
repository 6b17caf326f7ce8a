pub mod error;
pub mod expr;
pub mod interpreter;
pub mod lox;
pub mod parser;
pub mod printer;
pub mod report;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

pub use crate::error::{Error, Result};
pub use crate::lox::Lox;

use std::io::Write;

use crate::{
    error::{Error, Result},
    expr::{self, Expr},
    stmt::{self, Stmt},
    token::{TokenKind, Token},
    value::Value,
};

/// Tree-walking evaluator. Printed values go to `writer`, one per line.
pub struct Interpreter<W> {
    writer: W,
}

impl <W: Write> Interpreter<W> {
    pub fn new(writer: W) -> Self {
        Interpreter { writer }
    }

    /// Executes `statements` in order, stopping at the first runtime error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        for s in statements.iter() {
            self.execute(s)?;
        }
        Ok(())
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn execute(&mut self, s: &Stmt) -> Result<()> {
        s.accept(self)
    }

    pub(crate) fn evaluate(&mut self, e: &Expr) -> Result<Value> {
        e.accept(self)
    }
}

impl <W: Write> stmt::Visitor<Result<()>> for Interpreter<W> {
    fn visit_expression_stmt(&mut self, e: &stmt::Expression) -> Result<()> {
        self.evaluate(&e.expression)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, p: &stmt::Print) -> Result<()> {
        let value = self.evaluate(&p.expression)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }
}

impl <W: Write> expr::Visitor<Result<Value>> for Interpreter<W> {
    fn visit_binary_expr(&mut self, e: &expr::Binary) -> Result<Value> {
        let left = self.evaluate(e.left.as_ref())?;
        let right = self.evaluate(e.right.as_ref())?;

        use Value::{Number, String, Bool};
        match &e.op.kind {
            TokenKind::Minus => compute_if_numbers(&e.op, left, right, |l, r| l - r),
            TokenKind::Plus => match (left, right) {
                (Number(left), Number(right)) => Ok(Number(left + right)),
                (String(mut left), String(right)) => {
                    left.push_str(&right);
                    Ok(String(left))
                },
                _ => Err(Error::runtime(e.op.clone(), "Operands must be two numbers or two strings.")),
            },
            TokenKind::Slash => compute_if_numbers(&e.op, left, right, |l, r| l / r),
            TokenKind::Star => compute_if_numbers(&e.op, left, right, |l, r| l * r),
            TokenKind::Greater => compute_if_numbers(&e.op, left, right, |l, r| l > r),
            TokenKind::GreaterEqual => compute_if_numbers(&e.op, left, right, |l, r| l >= r),
            TokenKind::Less => compute_if_numbers(&e.op, left, right, |l, r| l < r),
            TokenKind::LessEqual => compute_if_numbers(&e.op, left, right, |l, r| l <= r),
            TokenKind::EqualEqual => Ok(Bool(left.is_equal(&right))),
            TokenKind::BangEqual => Ok(Bool(!left.is_equal(&right))),
            _ => unreachable!("Parser only builds binary expressions from binary operators."),
        }
    }

    fn visit_grouping_expr(&mut self, e: &expr::Grouping) -> Result<Value> {
        self.evaluate(&e.expression)
    }

    fn visit_literal_expr(&mut self, e: &expr::Literal) -> Result<Value> {
        Ok(e.value.clone())
    }

    fn visit_unary_expr(&mut self, e: &expr::Unary) -> Result<Value> {
        let right = self.evaluate(e.right.as_ref())?;

        use Value::*;
        match (&e.op.kind, right) {
            (TokenKind::Minus, Number(right)) => Ok(Number(-right)),
            (TokenKind::Minus, _) => Err(Error::runtime(e.op.clone(), "Operand must be a number.")),
            (TokenKind::Bang, right) => Ok(Bool(!right.is_truthy())),
            _ => unreachable!("Parser only builds unary expressions from '!' and '-'."),
        }
    }
}

fn compute_if_numbers<T: Into<Value>>(
    op: &Token,
    left: Value,
    right: Value,
    f: impl Fn(f64, f64) -> T
) -> Result<Value> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok(f(left, right).into()),
        _ => Err(Error::runtime(op.clone(), "Operands must be numbers.")),
    }
}

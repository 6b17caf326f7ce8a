use std::iter::Peekable;

use crate::{
    error::{Error, Result},
    expr::Expr,
    stmt::Stmt,
    token::*,
    value::Value,
};

const EQUALITY_TOKENS: &[&TokenKind] = &[
    &TokenKind::BangEqual,
    &TokenKind::EqualEqual,
];

const COMPARISON_TOKENS: &[&TokenKind] = &[
    &TokenKind::Greater,
    &TokenKind::GreaterEqual,
    &TokenKind::Less,
    &TokenKind::LessEqual,
];

const TERM_TOKENS: &[&TokenKind] = &[
    &TokenKind::Minus,
    &TokenKind::Plus,
];

const FACTOR_TOKENS: &[&TokenKind] = &[
    &TokenKind::Star,
    &TokenKind::Slash,
];

const UNARY_TOKENS: &[&TokenKind] = &[
    &TokenKind::Bang,
    &TokenKind::Minus,
];

/// Deepest run of nested groups and unary operators the parser accepts.
const MAX_NESTING: usize = 128;

/// Recursive-descent parser over a token stream ending in `EndOfFile`.
pub struct Parser<T> {
    tokens: T,
    depth: usize,
}

impl <T: Iterator<Item = Token>> Parser<Peekable<T>> {
    pub fn new(tokens: T) -> Self {
        let tokens = tokens.peekable();
        Parser { tokens, depth: 0 }
    }

    /// Parses every statement up to end of input. A statement that fails
    /// to parse is yielded as its error and parsing resumes at the next
    /// statement boundary.
    pub fn parse(&mut self) -> Vec<Result<Stmt>> {
        let mut statements = Vec::new();
        while let Some(statement) = self.declaration() {
            statements.push(statement);
        }
        statements
    }

    fn declaration(&mut self) -> Option<Result<Stmt>> {
        if self.is_at_end() { return None }

        let result = self.statement();
        if result.is_err() {
            self.synchronise();
        }

        Some(result)
    }

    fn statement(&mut self) -> Result<Stmt> {
        if self.match_single(&TokenKind::Print).is_some() {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let expression = self.expression()?;
        self.consume(&TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::new_print(expression))
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expression = self.expression()?;
        self.consume(&TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::new_expression(expression))
    }

    fn expression(&mut self) -> Result<Expr> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::comparison,
            EQUALITY_TOKENS
        )
    }

    fn comparison(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::term,
            COMPARISON_TOKENS
        )
    }

    fn term(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::factor,
            TERM_TOKENS
        )
    }

    fn factor(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::unary,
            FACTOR_TOKENS
        )
    }

    fn unary(&mut self) -> Result<Expr> {
        if let Some(token) = self.match_any(UNARY_TOKENS) {
            let right = Box::new(self.nested(Self::unary)?);
            Ok(Expr::new_unary(token, right))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let next = self.tokens.peek().ok_or_else(Error::unexpected)?;
        let literal = match &next.kind {
            TokenKind::False => Some(Value::Bool(false)),
            TokenKind::True => Some(Value::Bool(true)),
            TokenKind::Nil => Some(Value::Nil),
            TokenKind::Number(_) | TokenKind::String(_) => next.literal(),
            _ => None,
        };

        if let Some(value) = literal {
            self.tokens.next();
            return Ok(Expr::new_literal(value))
        }

        if self.match_single(&TokenKind::LeftParen).is_some() {
            let expression = Box::new(self.nested(Self::expression)?);
            self.consume(&TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::new_grouping(expression))
        }

        Err(self.error_at_next("Expect expression."))
    }

    /// Runs `parse` one nesting level deeper, failing at the next token
    /// once `MAX_NESTING` is reached.
    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Result<Expr>) -> Result<Expr> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_at_next("Too much nesting."))
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn is_at_end(&mut self) -> bool {
        self.tokens.peek()
            .map(|t| t.kind == TokenKind::EndOfFile)
            .unwrap_or(true)
    }

    fn check_next(&mut self, kind: &TokenKind) -> bool {
        self.tokens.peek()
            .map(|t| &t.kind == kind)
            .unwrap_or(false)
    }

    fn consume(&mut self, kind: &TokenKind, error_msg: &str) -> Result<Token> {
        match self.match_single(kind) {
            Some(token) => Ok(token),
            None => Err(self.error_at_next(error_msg)),
        }
    }

    /// Errors at the next token without consuming it, so that
    /// synchronisation starts from the offending token.
    fn error_at_next(&mut self, message: &str) -> Error {
        match self.tokens.peek() {
            Some(t) => Error::syntactic(t.clone(), message),
            None => Error::unexpected(),
        }
    }

    fn match_binary_precedence_with_tokens(
        &mut self,
        parse: impl Fn(&mut Self) -> Result<Expr>,
        kinds: &[&TokenKind]
    ) -> Result<Expr> {
        let mut e = parse(self)?;

        while let Some(token) = self.match_any(kinds) {
            let right = Box::new(parse(self)?);
            e = Expr::new_binary(Box::new(e), token, right)
        }

        Ok(e)
    }

    fn match_single(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.check_next(kind) {
            self.tokens.next()
        } else {
            None
        }
    }

    fn match_any(&mut self, kinds: &[&TokenKind]) -> Option<Token> {
        kinds.iter().find_map(|k| self.match_single(k))
    }

    fn synchronise(&mut self) {
        while !self.is_at_end() {
            let current = self.tokens.next();

            if let Some(token) = current {
                use TokenKind::*;
                if token.kind == Semicolon { break }

                if let Some(next) = self.tokens.peek() {
                    match next.kind {
                        Class | Fun | Var
                        | For | If | While
                        | Print | Return => break,
                        _ => continue,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{expr, scanner::Scanner};

    fn assert_tokens_parse_to_expr(tokens: Vec<Token>, expr: Expr) -> Result<()> {
        let mut parser = Parser::new(tokens.into_iter());
        assert_eq!(expr, parser.expression()?);
        Ok(())
    }

    fn parse_expr(src: &str) -> Result<Expr> {
        let tokens: Vec<_> = Scanner::new(src)
            .scan_tokens()
            .into_iter()
            .collect::<Result<_>>()?;
        Parser::new(tokens.into_iter()).expression()
    }

    fn parse_program(src: &str) -> Vec<Result<Stmt>> {
        let tokens: Vec<_> = Scanner::new(src)
            .scan_tokens()
            .into_iter()
            .filter_map(Result::ok)
            .collect();
        Parser::new(tokens.into_iter()).parse()
    }

    fn binary(e: Expr) -> expr::Binary {
        match e {
            Expr::Binary(b) => b,
            other => panic!("expected a binary expression, got {:?}", other),
        }
    }

    fn unary(e: Expr) -> expr::Unary {
        match e {
            Expr::Unary(u) => u,
            other => panic!("expected a unary expression, got {:?}", other),
        }
    }

    #[test]
    fn string_literal_token() -> Result<()> {
        assert_tokens_parse_to_expr(
            vec![
                Token::new(TokenKind::String("abc".into()), "\"abc\"", 1),
            ],
            Expr::new_literal(Value::String("abc".into()))
        )
    }

    #[test]
    fn number_literal_token() -> Result<()> {
        assert_tokens_parse_to_expr(
            vec![
                Token::new(TokenKind::Number(5.1), "5.1", 1),
            ],
            Expr::new_literal(Value::Number(5.1))
        )
    }

    #[test]
    fn nil_literal_token() -> Result<()> {
        assert_tokens_parse_to_expr(
            vec![
                Token::make(TokenKind::Nil),
            ],
            Expr::new_literal(Value::Nil)
        )
    }

    #[test]
    fn bool_literal_tokens() -> Result<()> {
        for (kind, expected) in [(TokenKind::True, true), (TokenKind::False, false)].iter() {
            assert_tokens_parse_to_expr(
                vec![
                    Token::make(kind.clone()),
                ],
                Expr::make(*expected)
            )?;
        }
        Ok(())
    }

    #[test]
    fn unary_op_tokens() -> Result<()> {
        let not = Token::make(TokenKind::Bang);
        assert_tokens_parse_to_expr(
            vec![
                not.clone(),
                Token::make(TokenKind::True),
            ],
            Expr::new_unary(not, Box::new(Expr::make(true)))
        )
    }

    #[test]
    fn equality() -> Result<()> {
        for (src, kind) in [("2 == 3", TokenKind::EqualEqual), ("2 != 3", TokenKind::BangEqual)].iter() {
            let b = binary(parse_expr(src)?);
            assert_eq!(kind, &b.op.kind);
            assert_eq!(Expr::new_literal(Value::Number(2.0)), *b.left);
            assert_eq!(Expr::new_literal(Value::Number(3.0)), *b.right);
        }
        Ok(())
    }

    #[test]
    fn comparison_term_and_factor_operators() -> Result<()> {
        use TokenKind::*;
        let cases = [
            ("2 > 3", Greater), ("2 >= 3", GreaterEqual), ("2 < 3", Less), ("2 <= 3", LessEqual),
            ("2 + 3", Plus), ("2 - 3", Minus), ("2 * 3", Star), ("2 / 3", Slash),
        ];
        for (src, kind) in cases.iter() {
            assert_eq!(kind, &binary(parse_expr(src)?).op.kind);
        }
        Ok(())
    }

    #[test]
    fn unary_minus() -> Result<()> {
        let u = unary(parse_expr("-2")?);
        assert_eq!(TokenKind::Minus, u.op.kind);
        assert_eq!(Expr::new_literal(Value::Number(2.0)), *u.right);
        Ok(())
    }

    #[test]
    fn chained_unary_nests_to_the_right() -> Result<()> {
        let outer = unary(parse_expr("!!false")?);
        assert_eq!(TokenKind::Bang, outer.op.kind);
        let inner = unary(*outer.right);
        assert_eq!(TokenKind::Bang, inner.op.kind);
        assert_eq!(Expr::make(false), *inner.right);
        Ok(())
    }

    #[test]
    fn binary_operators_are_left_associative() -> Result<()> {
        // (1 - 2) - 3
        let outer = binary(parse_expr("1 - 2 - 3")?);
        assert_eq!(Expr::new_literal(Value::Number(3.0)), *outer.right);
        let inner = binary(*outer.left);
        assert_eq!(Expr::new_literal(Value::Number(1.0)), *inner.left);
        assert_eq!(Expr::new_literal(Value::Number(2.0)), *inner.right);
        Ok(())
    }

    #[test]
    fn factor_binds_tighter_than_term() -> Result<()> {
        let sum = binary(parse_expr("1 + 2 * 3")?);
        assert_eq!(TokenKind::Plus, sum.op.kind);
        assert_eq!(TokenKind::Star, binary(*sum.right).op.kind);
        Ok(())
    }

    #[test]
    fn groups() -> Result<()> {
        match parse_expr("(3 + 2)")? {
            Expr::Grouping(g) => assert_eq!(TokenKind::Plus, binary(*g.expression).op.kind),
            other => panic!("expected a grouping, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn unclosed_parens_are_an_error() {
        let e = parse_expr("(3 + 2").unwrap_err();
        assert_eq!("[line 1] Error at end: Expect ')' after expression.", e.to_string());
    }

    #[test]
    fn missing_operand_expects_expression() {
        let e = parse_expr("1 + )").unwrap_err();
        assert_eq!("[line 1] Error at ')': Expect expression.", e.to_string());
    }

    #[test]
    fn statements() {
        let statements = parse_program("print 1; 2;");
        assert_eq!(2, statements.len());
        assert!(matches!(statements[0], Ok(Stmt::Print(_))));
        assert!(matches!(statements[1], Ok(Stmt::Expression(_))));
    }

    #[test]
    fn missing_semicolon() {
        let statements = parse_program("print 1");
        assert_eq!(1, statements.len());
        match &statements[0] {
            Err(e) => assert_eq!("[line 1] Error at end: Expect ';' after value.", e.to_string()),
            Ok(s) => panic!("expected an error, got {:?}", s),
        }
    }

    #[test]
    fn empty_program() {
        assert!(parse_program("").is_empty());
        assert!(parse_program("// nothing here\n").is_empty());
    }

    #[test]
    fn recovers_to_report_every_bad_statement() {
        let statements = parse_program("1 +; print (2; print 3;");
        let errors: Vec<_> = statements.iter().filter_map(|s| s.as_ref().err()).collect();
        assert_eq!(2, errors.len());
        assert_eq!("[line 1] Error at ';': Expect expression.", errors[0].to_string());
        assert_eq!("[line 1] Error at ';': Expect ')' after expression.", errors[1].to_string());
        assert_eq!(1, statements.iter().filter(|s| s.is_ok()).count());
    }

    #[test]
    fn synchronises_at_statement_keywords() {
        let statements = parse_program("1 2 print 3;");
        assert_eq!(2, statements.len());
        assert!(statements[0].is_err());
        assert!(matches!(statements[1], Ok(Stmt::Print(_))));
    }

    #[test]
    fn expression_statements_expect_a_semicolon_after_the_value() {
        match &parse_program("1 + 2")[0] {
            Err(e) => assert_eq!("[line 1] Error at end: Expect ';' after value.", e.to_string()),
            Ok(s) => panic!("expected an error, got {:?}", s),
        }
    }

    #[test]
    fn nesting_up_to_the_limit_parses() -> Result<()> {
        let src = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert!(matches!(parse_expr(&src)?, Expr::Grouping(_)));
        assert!(matches!(parse_expr(&format!("{}1", "-".repeat(MAX_NESTING)))?, Expr::Unary(_)));
        Ok(())
    }

    #[test]
    fn deeply_nested_groups_are_an_error() {
        let src = format!("{}1{}", "(".repeat(400), ")".repeat(400));
        let e = parse_expr(&src).unwrap_err();
        assert_eq!("[line 1] Error at '(': Too much nesting.", e.to_string());
    }

    #[test]
    fn deeply_nested_unary_is_an_error() {
        let e = parse_expr(&format!("{}1", "-".repeat(100_000))).unwrap_err();
        assert_eq!("[line 1] Error at '-': Too much nesting.", e.to_string());
    }

    #[test]
    fn too_much_nesting_synchronises_to_the_next_statement() {
        let src = format!("print {}1{}; print 2;", "(".repeat(400), ")".repeat(400));
        let statements = parse_program(&src);
        assert_eq!(2, statements.len());
        assert!(statements[0].is_err());
        assert!(matches!(statements[1], Ok(Stmt::Print(_))));
    }

    #[test]
    fn missing_end_of_file_is_unexpected() {
        let mut parser = Parser::new(vec![Token::make(TokenKind::Minus)].into_iter());
        let e = parser.expression().unwrap_err();
        assert_eq!("Unexpected end of input.", e.message());
    }

    impl Token {
        fn make(kind: TokenKind) -> Token {
            Token { kind, lexeme: "".into(), line: 0 }
        }
    }

    impl Expr {
        fn make(b: bool) -> Expr {
            Expr::new_literal(Value::Bool(b))
        }
    }
}

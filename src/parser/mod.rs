mod expr;
mod primary;
mod stmt;

use crate::ast::{Location, Node, NodeKind};
use crate::lexer::{Token, TokenKind};
use crate::trace::trace_stage;
use crate::value::{ErrorKind, RuntimeError};

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse a whole source file into a Block node.
    pub(crate) fn parse_program(&mut self) -> Result<Node, RuntimeError> {
        let location = self.location();
        let mut statements = Vec::new();
        self.skip_semicolons();
        while !self.check(&TokenKind::Eof) {
            statements.push(self.parse_stmt()?);
            self.skip_semicolons();
        }
        trace_stage!(Parse, "parsed {} top-level statements", statements.len());
        Ok(Node::new(NodeKind::Block(statements), location))
    }

    /// `{ stmt* }`
    pub(super) fn parse_block(&mut self) -> Result<Vec<Node>, RuntimeError> {
        self.consume_kind(TokenKind::LBrace, "Expected {")?;
        let mut statements = Vec::new();
        self.skip_semicolons();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                return Err(RuntimeError::with_kind(
                    ErrorKind::ParseExpected,
                    "Expected } before end of input",
                )
                .at(self.location()));
            }
            statements.push(self.parse_stmt()?);
            self.skip_semicolons();
        }
        self.consume_kind(TokenKind::RBrace, "Expected }")?;
        Ok(statements)
    }

    /// Class bodies keep named function literals as literals instead of
    /// desugaring them into bindings; everything else parses as a normal
    /// statement and is rejected by the evaluator.
    pub(super) fn parse_class_block(&mut self) -> Result<Vec<Node>, RuntimeError> {
        self.consume_kind(TokenKind::LBrace, "Expected {")?;
        let mut statements = Vec::new();
        self.skip_semicolons();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                return Err(RuntimeError::with_kind(
                    ErrorKind::ParseExpected,
                    "Expected } before end of input",
                )
                .at(self.location()));
            }
            let statement = if self.check(&TokenKind::Func) {
                self.parse_func_literal()?
            } else {
                self.parse_stmt()?
            };
            statements.push(statement);
            self.skip_semicolons();
        }
        self.consume_kind(TokenKind::RBrace, "Expected }")?;
        Ok(statements)
    }

    fn skip_semicolons(&mut self) {
        while self.match_kind(TokenKind::Semicolon) {}
    }

    // The lexer always terminates the stream with Eof and advance() never
    // moves past it.
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(super) fn location(&self) -> Location {
        self.current().location
    }

    pub(super) fn peek_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    pub(super) fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(super) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    pub(super) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(&kind) {
            self.advance();
            return true;
        }
        false
    }

    pub(super) fn consume_kind(
        &mut self,
        kind: TokenKind,
        expected: &str,
    ) -> Result<Token, RuntimeError> {
        if self.check(&kind) {
            return Ok(self.advance());
        }
        Err(RuntimeError::with_kind(
            ErrorKind::ParseExpected,
            format!("{}, found {:?}", expected, self.peek_kind()),
        )
        .at(self.location()))
    }

    pub(super) fn consume_ident(&mut self, expected: &str) -> Result<(String, Location), RuntimeError> {
        let location = self.location();
        if let TokenKind::Ident(name) = self.peek_kind() {
            let name = name.clone();
            self.advance();
            return Ok((name, location));
        }
        Err(RuntimeError::with_kind(
            ErrorKind::ParseExpected,
            format!("{}, found {:?}", expected, self.peek_kind()),
        )
        .at(location))
    }
}

use super::*;

impl Parser {
    pub(super) fn parse_primary(&mut self) -> Result<Node, RuntimeError> {
        let location = self.location();
        match self.peek_kind() {
            TokenKind::Number(_) => {
                let token = self.advance();
                let TokenKind::Number(value) = token.kind else {
                    unreachable!();
                };
                Ok(Node::new(NodeKind::NumericLiteral(value), location))
            }
            TokenKind::Str(_) => {
                let token = self.advance();
                let TokenKind::Str(value) = token.kind else {
                    unreachable!();
                };
                Ok(Node::new(NodeKind::StringLiteral(value), location))
            }
            TokenKind::True => {
                self.advance();
                Ok(Node::new(NodeKind::BooleanLiteral(true), location))
            }
            TokenKind::False => {
                self.advance();
                Ok(Node::new(NodeKind::BooleanLiteral(false), location))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Node::new(NodeKind::NullLiteral, location))
            }
            TokenKind::Nan => {
                self.advance();
                Ok(Node::new(NodeKind::NANLiteral, location))
            }
            TokenKind::Ident(_) => {
                let token = self.advance();
                let TokenKind::Ident(name) = token.kind else {
                    unreachable!();
                };
                Ok(Node::new(NodeKind::IdentifierLiteral(name), location))
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume_kind(TokenKind::RParen, "Expected )")?;
                Ok(inner)
            }
            TokenKind::Func => self.parse_func_literal(),
            TokenKind::Class => self.parse_class_literal(),
            other => Err(RuntimeError::with_kind(
                ErrorKind::ParseExpected,
                format!("Expected an expression, found {:?}", other),
            )
            .at(location)),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Node, RuntimeError> {
        let location = self.advance().location;
        let mut items = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            loop {
                items.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume_kind(TokenKind::RBracket, "Expected ] after array items")?;
        Ok(Node::new(NodeKind::ArrayLiteral(items), location))
    }

    /// `func [name](params) { ... }`. The name is optional in expression
    /// position and mandatory in declaration position (checked by the
    /// caller).
    pub(super) fn parse_func_literal(&mut self) -> Result<Node, RuntimeError> {
        let location = self.consume_kind(TokenKind::Func, "Expected func")?.location;
        let name = if let TokenKind::Ident(name) = self.peek_kind() {
            let name = name.clone();
            self.advance();
            Some(name)
        } else {
            None
        };
        self.consume_kind(TokenKind::LParen, "Expected ( after func")?;
        let mut parameters = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let (param, param_location) = self.consume_ident("Expected a parameter name")?;
                parameters.push(Node::new(NodeKind::IdentifierLiteral(param), param_location));
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume_kind(TokenKind::RParen, "Expected ) after parameters")?;
        let block = self.parse_block()?;
        Ok(Node::new(
            NodeKind::FunctionLiteral {
                name,
                parameters,
                block,
            },
            location,
        ))
    }

    /// `class Name [extends A, B] { ... }`. Body statements are collected
    /// verbatim; only the evaluator decides what a class body may contain.
    pub(super) fn parse_class_literal(&mut self) -> Result<Node, RuntimeError> {
        let location = self
            .consume_kind(TokenKind::Class, "Expected class")?
            .location;
        let (name, _) = self.consume_ident("Expected a class name")?;
        let mut parents = Vec::new();
        if self.match_kind(TokenKind::Extends) {
            loop {
                let (parent, parent_location) = self.consume_ident("Expected a parent class name")?;
                parents.push(Node::new(
                    NodeKind::IdentifierLiteral(parent),
                    parent_location,
                ));
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        let block = self.parse_class_block()?;
        Ok(Node::new(
            NodeKind::ClassLiteral {
                name,
                parents,
                block,
            },
            location,
        ))
    }
}

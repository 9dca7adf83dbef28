use super::*;
use crate::ast::Operator;

impl Parser {
    pub(super) fn parse_expression(&mut self) -> Result<Node, RuntimeError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Node, RuntimeError> {
        let target = self.parse_or()?;
        if !self.match_kind(TokenKind::Assign) {
            return Ok(target);
        }
        if !matches!(
            target.kind,
            NodeKind::IdentifierLiteral(_)
                | NodeKind::MemberExpression { .. }
                | NodeKind::IndexExpression { .. }
        ) {
            return Err(RuntimeError::with_kind(
                ErrorKind::ParseGeneric,
                "Invalid assignment target",
            )
            .at(target.location));
        }
        let expression = self.parse_assignment()?;
        let location = target.location;
        Ok(Node::new(
            NodeKind::VariableAssignment {
                target: Box::new(target),
                expression: Box::new(expression),
            },
            location,
        ))
    }

    fn parse_or(&mut self) -> Result<Node, RuntimeError> {
        let mut left = self.parse_and()?;
        while self.match_kind(TokenKind::OrOr) {
            let right = self.parse_and()?;
            let location = left.location;
            left = Node::new(
                NodeKind::Or {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                location,
            );
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Node, RuntimeError> {
        let mut left = self.parse_comparison()?;
        while self.match_kind(TokenKind::AndAnd) {
            let right = self.parse_comparison()?;
            let location = left.location;
            left = Node::new(
                NodeKind::And {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                location,
            );
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Node, RuntimeError> {
        let mut left = self.parse_additive()?;
        loop {
            let operator = match self.peek_kind() {
                TokenKind::Lt => Operator::Less,
                TokenKind::Gt => Operator::Greater,
                TokenKind::Le => Operator::LessEqual,
                TokenKind::Ge => Operator::GreaterEqual,
                TokenKind::EqEq => Operator::Equal,
                TokenKind::BangEq => Operator::Equal,
                _ => break,
            };
            let negated = matches!(self.peek_kind(), TokenKind::BangEq);
            let location = self.advance().location;
            let right = self.parse_additive()?;
            left = Node::new(
                NodeKind::ComparisonExpression {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                location,
            );
            // `a != b` has no operator of its own; it reads as `!(a == b)`
            // so user __equal overrides compose with the negation.
            if negated {
                left = Node::new(
                    NodeKind::UnaryExpression {
                        operator: Operator::Not,
                        right: Box::new(left),
                    },
                    location,
                );
            }
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Node, RuntimeError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let operator = match self.peek_kind() {
                TokenKind::Plus => Operator::Plus,
                TokenKind::Minus => Operator::Minus,
                _ => break,
            };
            let location = self.advance().location;
            let right = self.parse_multiplicative()?;
            left = Node::new(
                NodeKind::BinaryExpression {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                location,
            );
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Node, RuntimeError> {
        let mut left = self.parse_power()?;
        loop {
            let operator = match self.peek_kind() {
                TokenKind::Star => Operator::Mult,
                TokenKind::Slash => Operator::Divd,
                TokenKind::Percent => Operator::Mod,
                _ => break,
            };
            let location = self.advance().location;
            let right = self.parse_power()?;
            left = Node::new(
                NodeKind::BinaryExpression {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                location,
            );
        }
        Ok(left)
    }

    fn parse_power(&mut self) -> Result<Node, RuntimeError> {
        let left = self.parse_unary()?;
        if self.check(&TokenKind::StarStar) {
            let location = self.advance().location;
            let right = self.parse_power()?;
            return Ok(Node::new(
                NodeKind::BinaryExpression {
                    operator: Operator::Pow,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                location,
            ));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node, RuntimeError> {
        let operator = match self.peek_kind() {
            TokenKind::Bang => Operator::Not,
            TokenKind::Minus => Operator::Minus,
            _ => return self.parse_postfix(),
        };
        let location = self.advance().location;
        let right = self.parse_unary()?;
        Ok(Node::new(
            NodeKind::UnaryExpression {
                operator,
                right: Box::new(right),
            },
            location,
        ))
    }

    fn parse_postfix(&mut self) -> Result<Node, RuntimeError> {
        let mut node = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    let location = self.advance().location;
                    let (member, _) = self.consume_ident("Expected a member name")?;
                    node = Node::new(
                        NodeKind::MemberExpression {
                            target: Box::new(node),
                            member,
                        },
                        location,
                    );
                }
                TokenKind::LParen => {
                    let location = self.advance().location;
                    let mut arguments = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            arguments.push(self.parse_expression()?);
                            if !self.match_kind(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.consume_kind(TokenKind::RParen, "Expected ) after arguments")?;
                    node = Node::new(
                        NodeKind::CallExpression {
                            callee: Box::new(node),
                            arguments,
                        },
                        location,
                    );
                }
                TokenKind::LBracket => {
                    let location = self.advance().location;
                    let index = self.parse_expression()?;
                    self.consume_kind(TokenKind::RBracket, "Expected ] after index")?;
                    node = Node::new(
                        NodeKind::IndexExpression {
                            target: Box::new(node),
                            index: Box::new(index),
                        },
                        location,
                    );
                }
                _ => break,
            }
        }
        Ok(node)
    }
}

use super::*;

impl Parser {
    pub(super) fn parse_stmt(&mut self) -> Result<Node, RuntimeError> {
        match self.peek_kind() {
            TokenKind::Let => self.parse_let(),
            TokenKind::Const => self.parse_const(),
            TokenKind::Func if matches!(self.peek_kind_at(1), Some(TokenKind::Ident(_))) => {
                self.parse_func_decl()
            }
            TokenKind::Class if matches!(self.peek_kind_at(1), Some(TokenKind::Ident(_))) => {
                self.parse_class_decl()
            }
            TokenKind::Primitive => self.parse_primitive_class_decl(),
            TokenKind::Property => self.parse_property(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let location = self.advance().location;
                Ok(Node::new(NodeKind::BreakStatement, location))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::LBrace => {
                let location = self.location();
                let statements = self.parse_block()?;
                Ok(Node::new(NodeKind::Block(statements), location))
            }
            _ => self.parse_expression(),
        }
    }

    fn parse_let(&mut self) -> Result<Node, RuntimeError> {
        let location = self.advance().location;
        let (name, _) = self.consume_ident("Expected a variable name")?;
        let expression = if self.match_kind(TokenKind::Assign) {
            self.parse_expression()?
        } else {
            Node::new(NodeKind::NullLiteral, location)
        };
        Ok(Node::new(
            NodeKind::VariableInitialisation {
                name,
                expression: Box::new(expression),
            },
            location,
        ))
    }

    fn parse_const(&mut self) -> Result<Node, RuntimeError> {
        let location = self.advance().location;
        let (name, _) = self.consume_ident("Expected a constant name")?;
        self.consume_kind(TokenKind::Assign, "Expected = after constant name")?;
        let expression = self.parse_expression()?;
        Ok(Node::new(
            NodeKind::ConstantInitialisation {
                name,
                expression: Box::new(expression),
            },
            location,
        ))
    }

    // `func name(...) {}` in statement position binds its name,
    // exactly like `let name = func name(...) {}`.
    fn parse_func_decl(&mut self) -> Result<Node, RuntimeError> {
        let literal = self.parse_func_literal()?;
        let NodeKind::FunctionLiteral { name: Some(name), .. } = &literal.kind else {
            return Err(RuntimeError::with_kind(
                ErrorKind::ParseExpected,
                "Expected a function name",
            )
            .at(literal.location));
        };
        Ok(bind_name(name.clone(), literal))
    }

    fn parse_class_decl(&mut self) -> Result<Node, RuntimeError> {
        let literal = self.parse_class_literal()?;
        let NodeKind::ClassLiteral { name, .. } = &literal.kind else {
            unreachable!("parse_class_literal always yields a class literal");
        };
        Ok(bind_name(name.clone(), literal))
    }

    fn parse_primitive_class_decl(&mut self) -> Result<Node, RuntimeError> {
        let location = self.advance().location;
        self.consume_kind(TokenKind::Class, "Expected class after primitive")?;
        let (name, _) = self.consume_ident("Expected a primitive class name")?;
        let block = self.parse_class_block()?;
        let literal = Node::new(
            NodeKind::PrimitiveClassLiteral {
                name: name.clone(),
                block,
            },
            location,
        );
        Ok(bind_name(name, literal))
    }

    fn parse_property(&mut self) -> Result<Node, RuntimeError> {
        let location = self.advance().location;
        let (name, _) = self.consume_ident("Expected a property name")?;
        Ok(Node::new(NodeKind::PropertyDeclaration(name), location))
    }

    fn parse_return(&mut self) -> Result<Node, RuntimeError> {
        let location = self.advance().location;
        let expression = match self.peek_kind() {
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => None,
            _ => Some(Box::new(self.parse_expression()?)),
        };
        Ok(Node::new(NodeKind::ReturnStatement(expression), location))
    }

    fn parse_if(&mut self) -> Result<Node, RuntimeError> {
        let location = self.advance().location;
        let test = self.parse_expression()?;
        let consequent = self.parse_block()?;
        let alternate = if self.match_kind(TokenKind::Else) {
            if self.check(&TokenKind::If) {
                Some(Box::new(self.parse_if()?))
            } else {
                let else_location = self.location();
                let statements = self.parse_block()?;
                Some(Box::new(Node::new(
                    NodeKind::Block(statements),
                    else_location,
                )))
            }
        } else {
            None
        };
        Ok(Node::new(
            NodeKind::IfStatement {
                test: Box::new(test),
                consequent,
                alternate,
            },
            location,
        ))
    }

    fn parse_while(&mut self) -> Result<Node, RuntimeError> {
        let location = self.advance().location;
        let test = self.parse_expression()?;
        let consequent = self.parse_block()?;
        Ok(Node::new(
            NodeKind::WhileStatement {
                test: Box::new(test),
                consequent,
            },
            location,
        ))
    }
}

fn bind_name(name: String, literal: Node) -> Node {
    let location = literal.location;
    Node::new(
        NodeKind::VariableInitialisation {
            name,
            expression: Box::new(literal),
        },
        location,
    )
}

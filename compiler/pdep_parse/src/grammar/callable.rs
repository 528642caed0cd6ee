//! Parameter lists, type hints, return types and callable bodies.

use pdep_code::CallableId;
use pdep_ir::{DeclarationKind, Modifiers, NodeFlags, NodeId, NodeKind, TokenKind};

use super::docblock;
use crate::names::is_scalar_type;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parameters, return type and body of a function or method.
    ///
    /// Without `body_required` a `;` may stand in for the body.
    pub(crate) fn parse_callable_tail(
        &mut self,
        id: CallableId,
        node: NodeId,
        doc: Option<&str>,
        body_required: bool,
    ) -> Result<(), ParseError> {
        let params = self.parse_formal_parameters()?;
        self.attach(node, params)?;

        let mut has_return_type = false;
        if self.eat(TokenKind::Colon) {
            let hint = self.parse_type()?;
            self.attach(node, hint)?;
            if let Some(reference) = self.class_type_of(hint) {
                self.builder.set_return_type(id, reference);
                has_return_type = true;
            }
        }

        if let Some(doc) = doc.filter(|_| !self.config.without_annotations) {
            let annotations = docblock::annotations(doc);
            if !has_return_type {
                if let Some(&reference) = self.annotation_references(&annotations.returns)?.first() {
                    self.builder.set_return_type(id, reference);
                }
            }
            for reference in self.annotation_references(&annotations.throws)? {
                self.builder.add_exception_reference(id, reference);
            }
        }

        if self.check(TokenKind::LBrace) {
            let body = self.parse_scope()?;
            self.attach(node, body)?;
            Ok(())
        } else if body_required {
            Err(self.unexpected())
        } else {
            self.expect_terminator()
        }
    }

    /// The class reference a type hint names, if any.
    pub(crate) fn class_type_of(&self, hint: NodeId) -> Option<NodeId> {
        let ast = self.builder.ast();
        let kind = ast.kind(hint);
        if kind.is_a(NodeKind::ClassOrInterfaceReference) {
            return Some(hint);
        }
        if matches!(kind, NodeKind::NullableType | NodeKind::UnionType) {
            return ast
                .children(hint)
                .iter()
                .copied()
                .find(|&c| ast.kind(c).is_a(NodeKind::ClassOrInterfaceReference));
        }
        None
    }

    /// `( [param {, param}] )`.
    pub(crate) fn parse_formal_parameters(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::LParen)?;
        let list = self.alloc(NodeKind::FormalParameters, "")?;
        while !self.eat(TokenKind::RParen) {
            let param = self.parse_formal_parameter()?;
            self.attach(list, param)?;
            if !self.eat(TokenKind::Comma) {
                self.expect(TokenKind::RParen)?;
                break;
            }
        }
        self.close(list, mark);
        Ok(list)
    }

    fn parse_formal_parameter(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        let param = self.alloc(NodeKind::FormalParameter, "")?;

        let mut promoted = Modifiers::empty();
        loop {
            match self.current_kind() {
                TokenKind::Public => promoted |= Modifiers::PUBLIC,
                TokenKind::Protected => promoted |= Modifiers::PROTECTED,
                TokenKind::Private => promoted |= Modifiers::PRIVATE,
                TokenKind::Readonly => promoted |= Modifiers::READONLY,
                _ => break,
            }
            self.advance();
        }
        if !promoted.is_empty() {
            self.ast()
                .get_mut(param)
                .metadata
                .modifiers
                .assign(DeclarationKind::Property, promoted)?;
        }

        if self.at_type_start() {
            let hint = self.parse_type()?;
            self.attach(param, hint)?;
        }
        let mut flags = NodeFlags::empty();
        if self.eat(TokenKind::Ampersand) {
            flags |= NodeFlags::BY_REFERENCE;
        }
        if self.eat(TokenKind::Ellipsis) {
            flags |= NodeFlags::VARIADIC;
        }
        self.ast().get_mut(param).metadata.flags |= flags;

        let variable = self.expect(TokenKind::Variable)?;
        let declarator = self.leaf(NodeKind::VariableDeclarator, variable.image.as_str(), variable)?;
        if self.eat(TokenKind::Equal) {
            let default = self.parse_expr()?;
            self.attach(declarator, default)?;
            let start = self.mark_of(declarator);
            self.close(declarator, start);
        }
        self.attach(param, declarator)?;
        self.close(param, mark);
        Ok(param)
    }

    pub(crate) fn at_type_start(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Question
                | TokenKind::Array
                | TokenKind::Callable
                | TokenKind::SelfKw
                | TokenKind::Parent
                | TokenKind::Static
                | TokenKind::Identifier
                | TokenKind::QualifiedName
                | TokenKind::Null
                | TokenKind::False
                | TokenKind::True
        )
    }

    /// `?T`, `A|B` or a single type.
    pub(crate) fn parse_type(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        if self.eat(TokenKind::Question) {
            let inner = self.parse_single_type()?;
            let nullable = self.alloc(NodeKind::NullableType, "?")?;
            self.attach(nullable, inner)?;
            self.close(nullable, mark);
            return Ok(nullable);
        }
        let first = self.parse_single_type()?;
        if !self.check(TokenKind::Pipe) {
            return Ok(first);
        }
        let union = self.alloc(NodeKind::UnionType, "|")?;
        self.attach(union, first)?;
        while self.eat(TokenKind::Pipe) {
            let next = self.parse_single_type()?;
            self.attach(union, next)?;
        }
        self.close(union, mark);
        Ok(union)
    }

    fn parse_single_type(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::Array => {
                let token = self.advance();
                self.leaf(NodeKind::ArrayType, "array", token)
            }
            TokenKind::Callable => {
                let token = self.advance();
                self.leaf(NodeKind::CallableType, "callable", token)
            }
            TokenKind::SelfKw | TokenKind::Parent | TokenKind::Static => self.parse_special_reference(),
            TokenKind::Null | TokenKind::False | TokenKind::True => {
                let token = self.advance();
                self.leaf(NodeKind::ScalarType, token.image.to_ascii_lowercase(), token)
            }
            TokenKind::Identifier if is_scalar_type(&self.current().image) => {
                let token = self.advance();
                self.leaf(NodeKind::ScalarType, token.image.to_ascii_lowercase(), token)
            }
            _ => self.parse_class_reference(NodeKind::ClassOrInterfaceReference),
        }
    }
}

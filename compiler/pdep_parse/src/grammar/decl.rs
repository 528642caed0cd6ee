//! Namespaces, imports and type and function declarations.

use pdep_code::{TypeId, TypeKind};
use pdep_ir::{Modifiers, NodeId, NodeKind, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// A statement at file level, where namespaces and imports may appear.
    pub(crate) fn parse_top_statement(&mut self) -> Result<Option<NodeId>, ParseError> {
        match self.current_kind() {
            TokenKind::Namespace
                if matches!(
                    self.peek_kind(1),
                    TokenKind::Identifier | TokenKind::QualifiedName | TokenKind::LBrace
                ) =>
            {
                self.parse_namespace()?;
                Ok(None)
            }
            TokenKind::Use => {
                self.parse_use_imports()?;
                Ok(None)
            }
            _ => self.parse_statement(),
        }
    }

    /// `namespace Foo;` or `namespace [Foo] { ... }`.
    fn parse_namespace(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Namespace)?;
        let name = match self.current_kind() {
            TokenKind::Identifier | TokenKind::QualifiedName => Some(self.advance().image.clone()),
            _ => None,
        };
        self.names.enter(name.as_deref());
        tracing::debug!(namespace = self.names.namespace(), "enter namespace");

        if !self.eat(TokenKind::LBrace) {
            return self.expect_terminator();
        }
        let root = self.builder.unit(self.unit).node();
        while !self.eat(TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(self.unexpected());
            }
            if self.check(TokenKind::Use) {
                self.parse_use_imports()?;
            } else if let Some(node) = self.parse_statement()? {
                self.attach(root, node)?;
            }
        }
        self.names.enter(None);
        Ok(())
    }

    /// `use A\B [as C], D;`. Function and constant imports are skipped.
    fn parse_use_imports(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Use)?;
        let classes = !(self.eat(TokenKind::Function) || self.eat(TokenKind::Const));
        loop {
            let name = match self.current_kind() {
                TokenKind::Identifier | TokenKind::QualifiedName => self.advance().image.clone(),
                _ => return Err(self.unexpected()),
            };
            let alias = if self.eat(TokenKind::As) {
                Some(self.expect_name()?.image.clone())
            } else {
                None
            };
            if classes {
                self.names.import(&name, alias.as_deref());
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_terminator()
    }

    /// Whether the current token starts a class, interface or trait.
    pub(crate) fn at_type_declaration(&self) -> bool {
        match self.current_kind() {
            TokenKind::Class | TokenKind::Interface | TokenKind::Trait => true,
            TokenKind::Abstract | TokenKind::Final => true,
            TokenKind::Readonly => self.peek_kind(1) == TokenKind::Class,
            _ => false,
        }
    }

    /// `[abstract|final] class`, `interface` or `trait` declaration.
    pub(crate) fn parse_type_declaration(&mut self) -> Result<NodeId, ParseError> {
        let doc = self.doc_comment();
        let mark = self.mark();
        let mut modifiers = Modifiers::empty();
        loop {
            match self.current_kind() {
                TokenKind::Abstract => modifiers |= Modifiers::EXPLICIT_ABSTRACT,
                TokenKind::Final => modifiers |= Modifiers::FINAL,
                TokenKind::Readonly => {}
                _ => break,
            }
            self.advance();
        }
        let (kind, node_kind) = match self.current_kind() {
            TokenKind::Class => (TypeKind::Class, NodeKind::Class),
            TokenKind::Interface => (TypeKind::Interface, NodeKind::Interface),
            TokenKind::Trait => (TypeKind::Trait, NodeKind::Trait),
            _ => return Err(self.unexpected()),
        };
        self.advance();
        let name = self.expect(TokenKind::Identifier)?.image.clone();
        let node = self.alloc(node_kind, name.as_str())?;

        let ns = self.builder.namespace(self.names.namespace());
        let unit = Some(self.unit);
        let ty = match kind {
            TypeKind::Class => self.builder.register_class(unit, ns, &name, node),
            TypeKind::Interface => self.builder.register_interface(unit, ns, &name, node),
            TypeKind::Trait => self.builder.register_trait(unit, ns, &name, node),
        };
        if kind == TypeKind::Class || !modifiers.is_empty() {
            self.builder.type_decl_mut(ty).set_modifiers(modifiers)?;
        }
        self.builder.set_type_comment(ty, doc);
        self.parse_type_tail(kind, ty, node)?;
        self.close(node, mark);
        Ok(node)
    }

    /// Everything after the type name: `extends`, `implements` and the body.
    pub(crate) fn parse_type_tail(&mut self, kind: TypeKind, ty: TypeId, node: NodeId) -> Result<(), ParseError> {
        if self.eat(TokenKind::Extends) {
            if kind == TypeKind::Class {
                let parent = self.parse_class_reference(NodeKind::ClassReference)?;
                self.attach(node, parent)?;
                self.builder.set_parent_reference(ty, parent);
            } else {
                self.parse_interface_list(ty, node)?;
            }
        }
        if kind == TypeKind::Class && self.eat(TokenKind::Implements) {
            self.parse_interface_list(ty, node)?;
        }

        let outer = self.current_type.replace(ty);
        let body = self.parse_type_body(ty, node);
        self.current_type = outer;
        body
    }

    fn parse_interface_list(&mut self, ty: TypeId, node: NodeId) -> Result<(), ParseError> {
        loop {
            let reference = self.parse_class_reference(NodeKind::ClassOrInterfaceReference)?;
            self.attach(node, reference)?;
            self.builder.add_interface_reference(ty, reference);
            if !self.eat(TokenKind::Comma) {
                return Ok(());
            }
        }
    }

    /// Whether `function` at the current token declares a named function
    /// rather than starting a closure.
    pub(crate) fn at_function_declaration(&self) -> bool {
        if !self.check(TokenKind::Function) {
            return false;
        }
        match self.peek_kind(1) {
            TokenKind::Ampersand => self.peek_kind(2) != TokenKind::LParen,
            TokenKind::LParen => false,
            kind => kind == TokenKind::Identifier || kind.is_keyword(),
        }
    }

    /// `function [&]name(...) [: type] { ... }`.
    pub(crate) fn parse_function_declaration(&mut self) -> Result<NodeId, ParseError> {
        let doc = self.doc_comment();
        let mark = self.mark();
        self.expect(TokenKind::Function)?;
        let by_reference = self.eat(TokenKind::Ampersand);
        let name = self.expect_name()?.image.clone();
        let node = self.alloc(NodeKind::Function, name.as_str())?;

        let ns = self.builder.namespace(self.names.namespace());
        let id = self.builder.register_function(Some(self.unit), ns, &name, node);
        self.builder.set_callable_comment(id, doc.clone());
        self.builder.set_returns_reference(id, by_reference);

        let outer = self.current_type.take();
        let tail = self.parse_callable_tail(id, node, doc.as_deref(), true);
        self.current_type = outer;
        tail?;

        self.close(node, mark);
        Ok(node)
    }
}

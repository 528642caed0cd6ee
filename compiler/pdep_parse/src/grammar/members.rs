//! Class, interface and trait bodies.

use pdep_code::TypeId;
use pdep_ir::{DeclarationKind, Modifiers, NodeId, NodeKind, TokenKind};

use super::docblock;
use crate::{Mark, ParseError, Parser};

/// Modifier keywords in front of a member, as written.
#[derive(Copy, Clone, Default)]
struct MemberModifiers {
    bits: Modifiers,
    /// `abstract` keyword.
    is_abstract: bool,
    /// `var` keyword.
    is_var: bool,
    any: bool,
}

impl MemberModifiers {
    /// Modifiers with `PUBLIC` filled in when no visibility was written.
    fn with_default_visibility(self) -> Modifiers {
        if self.bits.visibility().is_empty() {
            self.bits | Modifiers::PUBLIC
        } else {
            self.bits
        }
    }
}

impl Parser<'_> {
    /// `{ member* }` of the type `ty` declared by `node`.
    pub(crate) fn parse_type_body(&mut self, ty: TypeId, node: NodeId) -> Result<(), ParseError> {
        self.expect(TokenKind::LBrace)?;
        while !self.eat(TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(self.unexpected());
            }
            let member = if self.check(TokenKind::Use) {
                self.parse_trait_use()?
            } else {
                self.parse_member(ty)?
            };
            self.attach(node, member)?;
        }
        Ok(())
    }

    fn parse_member(&mut self, ty: TypeId) -> Result<NodeId, ParseError> {
        let doc = self.doc_comment();
        let mark = self.mark();
        let mut modifiers = MemberModifiers::default();
        loop {
            let bit = match self.current_kind() {
                TokenKind::Public => Modifiers::PUBLIC,
                TokenKind::Protected => Modifiers::PROTECTED,
                TokenKind::Private => Modifiers::PRIVATE,
                TokenKind::Static => Modifiers::STATIC,
                TokenKind::Final => Modifiers::FINAL,
                TokenKind::Readonly => Modifiers::READONLY,
                TokenKind::Abstract => {
                    modifiers.is_abstract = true;
                    Modifiers::ABSTRACT
                }
                TokenKind::Var => {
                    modifiers.is_var = true;
                    Modifiers::empty()
                }
                _ => break,
            };
            modifiers.bits |= bit;
            modifiers.any = true;
            self.advance();
        }

        match self.current_kind() {
            TokenKind::Const => self.parse_constant_definition(modifiers.bits, mark),
            TokenKind::Function if !modifiers.is_var => self.parse_method(ty, modifiers, doc, mark),
            _ if modifiers.any && !modifiers.is_abstract => self.parse_field_declaration(modifiers, doc, mark),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_method(
        &mut self,
        ty: TypeId,
        modifiers: MemberModifiers,
        doc: Option<String>,
        mark: Mark,
    ) -> Result<NodeId, ParseError> {
        self.expect(TokenKind::Function)?;
        let by_reference = self.eat(TokenKind::Ampersand);
        let name = self.expect_name()?.image.clone();
        let node = self.alloc(NodeKind::Method, name.as_str())?;

        let mut bits = modifiers.with_default_visibility();
        if self.builder.type_decl(ty).is_interface() {
            bits |= Modifiers::ABSTRACT;
        }
        let id = self.builder.register_method(ty, &name, node);
        self.builder.callable_mut(id).set_modifiers(bits)?;
        self.builder.set_callable_comment(id, doc.clone());
        self.builder.set_returns_reference(id, by_reference);

        self.parse_callable_tail(id, node, doc.as_deref(), !bits.is_abstract())?;
        self.close(node, mark);
        Ok(node)
    }

    /// `[modifiers] [type] $a [= 1], $b;`
    fn parse_field_declaration(
        &mut self,
        modifiers: MemberModifiers,
        doc: Option<String>,
        mark: Mark,
    ) -> Result<NodeId, ParseError> {
        let field = self.alloc(NodeKind::FieldDeclaration, "")?;
        self.ast()
            .get_mut(field)
            .metadata
            .modifiers
            .assign(DeclarationKind::Property, modifiers.with_default_visibility())?;

        let mut has_type = false;
        if self.at_type_start() {
            let hint = self.parse_type()?;
            self.attach(field, hint)?;
            has_type = true;
        }

        loop {
            let variable = self.expect(TokenKind::Variable)?;
            let declarator = self.leaf(NodeKind::VariableDeclarator, variable.image.as_str(), variable)?;
            if self.eat(TokenKind::Equal) {
                let value = self.parse_expr()?;
                self.attach(declarator, value)?;
                let start = self.mark_of(declarator);
                self.close(declarator, start);
            }
            self.attach(field, declarator)?;
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_terminator()?;

        if let Some(doc) = doc.filter(|_| !has_type && !self.config.without_annotations) {
            let names = docblock::annotations(&doc).var;
            if let Some(&reference) = self.annotation_references(&names)?.first() {
                self.ast().prepend_child(field, reference)?;
            }
        }
        self.close(field, mark);
        Ok(field)
    }

    /// `[modifiers] const A = 1, B = 2;`
    pub(crate) fn parse_constant_definition(&mut self, modifiers: Modifiers, mark: Mark) -> Result<NodeId, ParseError> {
        self.expect(TokenKind::Const)?;
        let definition = self.alloc(NodeKind::ConstantDefinition, "const")?;
        let modifiers = if modifiers.visibility().is_empty() {
            modifiers | Modifiers::PUBLIC
        } else {
            modifiers
        };
        self.ast()
            .get_mut(definition)
            .metadata
            .modifiers
            .assign(DeclarationKind::Constant, modifiers)?;

        loop {
            let start = self.mark();
            let name = self.expect_name()?;
            let declarator = self.alloc(NodeKind::ConstantDeclarator, name.image.as_str())?;
            self.expect(TokenKind::Equal)?;
            let value = self.parse_expr()?;
            self.attach(declarator, value)?;
            self.close(declarator, start);
            self.attach(definition, declarator)?;
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_terminator()?;
        self.close(definition, mark);
        Ok(definition)
    }

    /// `use A, B;` or `use A, B { adaptations }` inside a type body.
    fn parse_trait_use(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Use)?;
        let statement = self.alloc(NodeKind::TraitUseStatement, "use")?;
        loop {
            let reference = self.parse_class_reference(NodeKind::TraitReference)?;
            self.attach(statement, reference)?;
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        if self.check(TokenKind::LBrace) {
            let block_mark = self.mark();
            self.advance();
            let block = self.alloc(NodeKind::TraitAdaptation, "")?;
            while !self.eat(TokenKind::RBrace) {
                if self.is_at_end() {
                    return Err(self.unexpected());
                }
                let rule = self.parse_adaptation_rule()?;
                self.attach(block, rule)?;
            }
            self.close(block, block_mark);
            self.attach(statement, block)?;
        } else {
            self.expect_terminator()?;
        }
        self.close(statement, mark);
        Ok(statement)
    }

    /// `[T::]m insteadof U, V;` or `[T::]m as [visibility] [alias];`
    fn parse_adaptation_rule(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        let trait_ref = if self.peek_kind(1) == TokenKind::DoubleColon {
            let reference = self.parse_class_reference(NodeKind::TraitReference)?;
            self.expect(TokenKind::DoubleColon)?;
            Some(reference)
        } else {
            None
        };
        let method = self.expect_name()?.image.clone();

        let rule = match (self.current_kind(), trait_ref) {
            (TokenKind::InsteadOf, Some(winner)) => {
                self.advance();
                let rule = self.alloc(NodeKind::TraitAdaptationPrecedence, method.as_str())?;
                self.attach(rule, winner)?;
                loop {
                    let excluded = self.parse_class_reference(NodeKind::TraitReference)?;
                    self.attach(rule, excluded)?;
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                rule
            }
            (TokenKind::As, _) => {
                self.advance();
                let rule = self.alloc(NodeKind::TraitAdaptationAlias, method.as_str())?;
                if let Some(reference) = trait_ref {
                    self.attach(rule, reference)?;
                }
                let visibility = match self.current_kind() {
                    TokenKind::Public => Modifiers::PUBLIC,
                    TokenKind::Protected => Modifiers::PROTECTED,
                    TokenKind::Private => Modifiers::PRIVATE,
                    _ => Modifiers::empty(),
                };
                if !visibility.is_empty() {
                    self.advance();
                    self.ast()
                        .get_mut(rule)
                        .metadata
                        .modifiers
                        .assign(DeclarationKind::Method, visibility)?;
                }
                let alias = match self.current_kind() {
                    TokenKind::Semicolon => None,
                    _ => Some(self.expect_name()?.image.clone()),
                };
                if alias.is_none() && visibility.is_empty() {
                    return Err(self.unexpected());
                }
                self.ast().get_mut(rule).metadata.alias = alias;
                rule
            }
            _ => return Err(self.unexpected()),
        };
        self.expect_terminator()?;
        self.close(rule, mark);
        Ok(rule)
    }
}

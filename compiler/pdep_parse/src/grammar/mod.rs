//! Grammar productions, one module per construct family.
//!
//! - `decl.rs`: namespaces, imports, type and function declarations
//! - `members.rs`: class bodies (constants, properties, methods, trait use)
//! - `callable.rs`: parameter lists, return types and bodies
//! - `stmt.rs`: statements
//! - `expr.rs`: expressions by precedence
//! - `docblock.rs`: doc comment annotations

mod callable;
mod decl;
mod docblock;
mod expr;
mod members;
mod stmt;

use pdep_ir::{NodeId, NodeKind, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// A class name reference of `kind`, resolved to its qualified name.
    pub(crate) fn parse_class_reference(&mut self, kind: NodeKind) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::Identifier | TokenKind::QualifiedName => {
                let token = self.advance();
                let name = self.names.resolve_class(&token.image);
                self.leaf(kind, name, token)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `self`, `parent` or `static` as a reference node.
    pub(crate) fn parse_special_reference(&mut self) -> Result<NodeId, ParseError> {
        let kind = match self.current_kind() {
            TokenKind::SelfKw => NodeKind::SelfReference,
            TokenKind::Parent => NodeKind::ParentReference,
            TokenKind::Static => NodeKind::StaticReference,
            _ => return Err(self.unexpected()),
        };
        let token = self.advance();
        self.leaf(kind, token.image.to_ascii_lowercase(), token)
    }

    /// Detached reference nodes for the class names of an annotation.
    pub(crate) fn annotation_references(&mut self, names: &[String]) -> Result<Vec<NodeId>, ParseError> {
        names
            .iter()
            .map(|written| {
                let name = self.names.resolve_class(written);
                self.alloc(NodeKind::ClassOrInterfaceReference, name)
            })
            .collect()
    }
}

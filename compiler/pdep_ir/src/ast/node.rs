use bitflags::bitflags;

use super::{NodeId, NodeKind};
use crate::{ModifierSlot, SourceRange, Span, Spanned};

bitflags! {
    /// Boolean facts about a node that the parser records.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct NodeFlags: u16 {
        /// `&$value`, `function &foo()`, `use (&$x)`.
        const BY_REFERENCE = 1 << 0;
        /// `...$args`
        const VARIADIC = 1 << 1;
        /// `static function`, `static fn`, `static::` member access.
        const STATIC = 1 << 2;
        /// `if` with an `else` branch.
        const HAS_ELSE = 1 << 3;
        /// `default:` switch label.
        const DEFAULT_LABEL = 1 << 4;
        /// `?->`
        const NULLSAFE = 1 << 5;
        /// `[...]` instead of `array(...)`.
        const SHORT_SYNTAX = 1 << 6;
        /// Parameter has a default value.
        const HAS_DEFAULT = 1 << 7;
    }
}

/// Per-node data beyond kind and image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeMetadata {
    pub flags: NodeFlags,
    pub modifiers: ModifierSlot,
    /// New name introduced by a trait alias (`foo as bar`).
    pub alias: Option<String>,
}

/// A node in the syntax tree.
///
/// The parent link is a back-reference only and is not serialized;
/// [`super::AstArena::relink`] rebuilds it from the child lists.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct AstNode {
    pub kind: NodeKind,
    /// Source image: a name, operator or literal text.
    pub image: String,
    pub span: Span,
    pub range: SourceRange,
    pub comment: Option<String>,
    pub metadata: NodeMetadata,
    #[cfg_attr(feature = "cache", serde(skip))]
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl AstNode {
    pub(super) fn new(kind: NodeKind, image: String) -> Self {
        AstNode {
            kind,
            image,
            span: Span::DUMMY,
            range: SourceRange::default(),
            comment: None,
            metadata: NodeMetadata::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn is_a(&self, kind: NodeKind) -> bool {
        self.kind.is_a(kind)
    }

    #[inline]
    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.metadata.flags.contains(flag)
    }

    #[inline]
    pub fn is_by_reference(&self) -> bool {
        self.has_flag(NodeFlags::BY_REFERENCE)
    }

    #[inline]
    pub fn start_line(&self) -> u32 {
        self.range.start_line
    }

    #[inline]
    pub fn start_column(&self) -> u32 {
        self.range.start_column
    }

    #[inline]
    pub fn end_line(&self) -> u32 {
        self.range.end_line
    }

    #[inline]
    pub fn end_column(&self) -> u32 {
        self.range.end_column
    }
}

impl Spanned for AstNode {
    fn span(&self) -> Span {
        self.span
    }
}

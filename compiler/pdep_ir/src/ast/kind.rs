//! Node kinds and their specialisation chain.

use std::fmt;

/// Runtime kind of an AST node.
///
/// Some kinds specialise others (see [`NodeKind::parent_kind`]): searching
/// for `IndexExpression` also finds `ArrayIndexExpression` nodes, searching
/// for `Type` finds every class reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    // === Artifact roots ===
    CompilationUnit,
    Class,
    Interface,
    Trait,
    /// `new class { ... }`.
    AnonymousClass,
    Method,
    Function,
    Closure,

    // === Declarations ===
    FormalParameters,
    FormalParameter,
    VariableDeclarator,
    StaticVariableDeclaration,
    FieldDeclaration,
    ConstantDefinition,
    ConstantDeclarator,
    ClosureUse,
    TraitUseStatement,
    TraitAdaptation,
    TraitAdaptationAlias,
    TraitAdaptationPrecedence,

    // === Types ===
    Type,
    ScalarType,
    ArrayType,
    CallableType,
    NullableType,
    UnionType,
    ClassOrInterfaceReference,
    ClassReference,
    ParentReference,
    SelfReference,
    StaticReference,
    TraitReference,

    // === Statements ===
    Statement,
    Scope,
    ScopeStatement,
    IfStatement,
    ElseIfStatement,
    ForStatement,
    ForInit,
    ForUpdate,
    ForeachStatement,
    WhileStatement,
    DoWhileStatement,
    SwitchStatement,
    SwitchLabel,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    EchoStatement,
    ThrowStatement,
    TryStatement,
    CatchStatement,
    FinallyStatement,
    GlobalStatement,
    UnsetStatement,

    // === Expressions ===
    Expression,
    AssignmentExpression,
    ConditionalExpression,
    BooleanAndExpression,
    BooleanOrExpression,
    LogicalAndExpression,
    LogicalOrExpression,
    LogicalXorExpression,
    MathematicalExpression,
    ComparisonExpression,
    CoalesceExpression,
    InstanceOfExpression,
    UnaryExpression,
    CastExpression,
    PreIncrementExpression,
    PreDecrementExpression,
    PostfixExpression,
    AllocationExpression,
    CloneExpression,
    PrintExpression,
    /// `yield`, `yield $v`, `yield $k => $v` or `yield from $e`.
    YieldExpression,
    IncludeExpression,
    RequireExpression,
    IndexExpression,
    ArrayIndexExpression,
    StringIndexExpression,
    MemberPrimaryPrefix,
    MethodPostfix,
    PropertyPostfix,
    ConstantPostfix,
    FunctionPostfix,
    Arguments,
    Array,
    ArrayElement,
    ListExpression,
    Variable,
    CompoundVariable,
    VariableVariable,
    Literal,
    Constant,
    Identifier,
}

impl NodeKind {
    /// The kind this kind directly specialises, if any.
    pub const fn parent_kind(self) -> Option<NodeKind> {
        match self {
            NodeKind::ArrayIndexExpression | NodeKind::StringIndexExpression => {
                Some(NodeKind::IndexExpression)
            }

            NodeKind::ClassReference
            | NodeKind::ParentReference
            | NodeKind::SelfReference
            | NodeKind::StaticReference
            | NodeKind::TraitReference => Some(NodeKind::ClassOrInterfaceReference),

            NodeKind::ClassOrInterfaceReference
            | NodeKind::ScalarType
            | NodeKind::ArrayType
            | NodeKind::CallableType
            | NodeKind::NullableType
            | NodeKind::UnionType => Some(NodeKind::Type),

            NodeKind::AnonymousClass => Some(NodeKind::Class),

            NodeKind::ScopeStatement => Some(NodeKind::Scope),

            NodeKind::IfStatement
            | NodeKind::ElseIfStatement
            | NodeKind::ForStatement
            | NodeKind::ForeachStatement
            | NodeKind::WhileStatement
            | NodeKind::DoWhileStatement
            | NodeKind::SwitchStatement
            | NodeKind::BreakStatement
            | NodeKind::ContinueStatement
            | NodeKind::ReturnStatement
            | NodeKind::EchoStatement
            | NodeKind::ThrowStatement
            | NodeKind::TryStatement
            | NodeKind::GlobalStatement
            | NodeKind::UnsetStatement
            | NodeKind::TraitAdaptationAlias
            | NodeKind::TraitAdaptationPrecedence => Some(NodeKind::Statement),

            _ => None,
        }
    }

    /// Whether a node of this kind is an instance of `target`.
    pub fn is_a(self, target: NodeKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == target {
                return true;
            }
            current = kind.parent_kind();
        }
        false
    }

    /// Roots of code-model artifacts (types and callables).
    pub const fn is_artifact_root(self) -> bool {
        matches!(
            self,
            NodeKind::Class
                | NodeKind::Interface
                | NodeKind::Trait
                | NodeKind::Method
                | NodeKind::Function
        )
    }

    /// Class, interface or trait declaration roots.
    pub const fn is_type_declaration(self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Interface | NodeKind::Trait)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

//! Token kinds for the supported PHP subset.

use std::fmt;

/// Kind of a lexed token.
///
/// Keywords are matched case-insensitively by the lexer; the token image
/// keeps the original spelling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    // === Tags and trivia ===
    OpenTag,
    OpenTagWithEcho,
    CloseTag,
    InlineHtml,
    Comment,
    DocComment,

    // === Names and literals ===
    Variable,
    Identifier,
    /// `Foo\Bar` or `\Foo\Bar`.
    QualifiedName,
    Integer,
    Float,
    ConstantString,
    DoubleQuotedString,

    // === Keywords ===
    Abstract,
    And,
    Array,
    As,
    Break,
    Callable,
    Case,
    Catch,
    Class,
    Clone,
    Const,
    Continue,
    Default,
    Do,
    Echo,
    Else,
    ElseIf,
    EndFor,
    EndForeach,
    EndIf,
    EndSwitch,
    EndWhile,
    Extends,
    False,
    Final,
    Finally,
    Fn,
    For,
    Foreach,
    Function,
    Global,
    If,
    Implements,
    Include,
    IncludeOnce,
    InstanceOf,
    InsteadOf,
    Interface,
    List,
    Namespace,
    New,
    Null,
    Or,
    Parent,
    Print,
    Private,
    Protected,
    Public,
    Readonly,
    Require,
    RequireOnce,
    Return,
    SelfKw,
    Static,
    Switch,
    Throw,
    Trait,
    True,
    Try,
    Use,
    Var,
    While,
    Xor,
    Yield,

    // === Punctuation ===
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Arrow,
    NullsafeArrow,
    DoubleArrow,
    DoubleColon,
    Question,
    Colon,
    Ellipsis,
    Dollar,
    At,

    // === Assignment operators ===
    Equal,
    PlusEqual,
    MinusEqual,
    MulEqual,
    DivEqual,
    ConcatEqual,
    ModEqual,
    PowEqual,
    AndEqual,
    OrEqual,
    XorEqual,
    ShiftLeftEqual,
    ShiftRightEqual,
    CoalesceEqual,

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pow,
    Dot,
    Ampersand,
    Pipe,
    Caret,
    Tilde,
    ShiftLeft,
    ShiftRight,
    BooleanAnd,
    BooleanOr,
    Bang,
    IsEqual,
    IsNotEqual,
    IsIdentical,
    IsNotIdentical,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Spaceship,
    Coalesce,
    Increment,
    Decrement,

    /// End of the token stream.
    Eof,
}

impl TokenKind {
    /// Look up the keyword for a lower-cased identifier.
    pub fn keyword(lowercase: &str) -> Option<TokenKind> {
        let kind = match lowercase {
            "abstract" => TokenKind::Abstract,
            "and" => TokenKind::And,
            "array" => TokenKind::Array,
            "as" => TokenKind::As,
            "break" => TokenKind::Break,
            "callable" => TokenKind::Callable,
            "case" => TokenKind::Case,
            "catch" => TokenKind::Catch,
            "class" => TokenKind::Class,
            "clone" => TokenKind::Clone,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "default" => TokenKind::Default,
            "do" => TokenKind::Do,
            "echo" => TokenKind::Echo,
            "else" => TokenKind::Else,
            "elseif" => TokenKind::ElseIf,
            "endfor" => TokenKind::EndFor,
            "endforeach" => TokenKind::EndForeach,
            "endif" => TokenKind::EndIf,
            "endswitch" => TokenKind::EndSwitch,
            "endwhile" => TokenKind::EndWhile,
            "extends" => TokenKind::Extends,
            "false" => TokenKind::False,
            "final" => TokenKind::Final,
            "finally" => TokenKind::Finally,
            "fn" => TokenKind::Fn,
            "for" => TokenKind::For,
            "foreach" => TokenKind::Foreach,
            "function" => TokenKind::Function,
            "global" => TokenKind::Global,
            "if" => TokenKind::If,
            "implements" => TokenKind::Implements,
            "include" => TokenKind::Include,
            "include_once" => TokenKind::IncludeOnce,
            "instanceof" => TokenKind::InstanceOf,
            "insteadof" => TokenKind::InsteadOf,
            "interface" => TokenKind::Interface,
            "list" => TokenKind::List,
            "namespace" => TokenKind::Namespace,
            "new" => TokenKind::New,
            "null" => TokenKind::Null,
            "or" => TokenKind::Or,
            "parent" => TokenKind::Parent,
            "print" => TokenKind::Print,
            "private" => TokenKind::Private,
            "protected" => TokenKind::Protected,
            "public" => TokenKind::Public,
            "readonly" => TokenKind::Readonly,
            "require" => TokenKind::Require,
            "require_once" => TokenKind::RequireOnce,
            "return" => TokenKind::Return,
            "self" => TokenKind::SelfKw,
            "static" => TokenKind::Static,
            "switch" => TokenKind::Switch,
            "throw" => TokenKind::Throw,
            "trait" => TokenKind::Trait,
            "true" => TokenKind::True,
            "try" => TokenKind::Try,
            "use" => TokenKind::Use,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            "xor" => TokenKind::Xor,
            "yield" => TokenKind::Yield,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether this kind is a reserved word.
    ///
    /// Reserved words may still be used as member names after `->`, `::`
    /// and `function`.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Abstract
                | TokenKind::And
                | TokenKind::Array
                | TokenKind::As
                | TokenKind::Break
                | TokenKind::Callable
                | TokenKind::Case
                | TokenKind::Catch
                | TokenKind::Class
                | TokenKind::Clone
                | TokenKind::Const
                | TokenKind::Continue
                | TokenKind::Default
                | TokenKind::Do
                | TokenKind::Echo
                | TokenKind::Else
                | TokenKind::ElseIf
                | TokenKind::EndFor
                | TokenKind::EndForeach
                | TokenKind::EndIf
                | TokenKind::EndSwitch
                | TokenKind::EndWhile
                | TokenKind::Extends
                | TokenKind::False
                | TokenKind::Final
                | TokenKind::Finally
                | TokenKind::Fn
                | TokenKind::For
                | TokenKind::Foreach
                | TokenKind::Function
                | TokenKind::Global
                | TokenKind::If
                | TokenKind::Implements
                | TokenKind::Include
                | TokenKind::IncludeOnce
                | TokenKind::InstanceOf
                | TokenKind::InsteadOf
                | TokenKind::Interface
                | TokenKind::List
                | TokenKind::Namespace
                | TokenKind::New
                | TokenKind::Null
                | TokenKind::Or
                | TokenKind::Parent
                | TokenKind::Print
                | TokenKind::Private
                | TokenKind::Protected
                | TokenKind::Public
                | TokenKind::Readonly
                | TokenKind::Require
                | TokenKind::RequireOnce
                | TokenKind::Return
                | TokenKind::SelfKw
                | TokenKind::Static
                | TokenKind::Switch
                | TokenKind::Throw
                | TokenKind::Trait
                | TokenKind::True
                | TokenKind::Try
                | TokenKind::Use
                | TokenKind::Var
                | TokenKind::While
                | TokenKind::Xor
                | TokenKind::Yield
        )
    }

    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::DocComment)
    }

    /// Tokens the parser never sees: trivia and PHP open/close tags.
    #[inline]
    pub fn is_insignificant(self) -> bool {
        matches!(
            self,
            TokenKind::Comment | TokenKind::DocComment | TokenKind::OpenTag | TokenKind::InlineHtml
        )
    }

    /// Assignment operators (`=`, `+=`, `??=`, ...).
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::PlusEqual
                | TokenKind::MinusEqual
                | TokenKind::MulEqual
                | TokenKind::DivEqual
                | TokenKind::ConcatEqual
                | TokenKind::ModEqual
                | TokenKind::PowEqual
                | TokenKind::AndEqual
                | TokenKind::OrEqual
                | TokenKind::XorEqual
                | TokenKind::ShiftLeftEqual
                | TokenKind::ShiftRightEqual
                | TokenKind::CoalesceEqual
        )
    }

    /// Visibility and other member modifiers.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::Public
                | TokenKind::Protected
                | TokenKind::Private
                | TokenKind::Static
                | TokenKind::Abstract
                | TokenKind::Final
                | TokenKind::Readonly
                | TokenKind::Var
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

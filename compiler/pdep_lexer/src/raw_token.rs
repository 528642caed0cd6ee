//! Raw Token Definition
//!
//! The logos-derived tokenizer for PHP code regions. Tag handling and
//! inline HTML live in `tags`; this enum only sees text between `<?php`
//! and `?>`.

use logos::{Lexer, Logos};

/// Failure inside a logos callback.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum RawError {
    #[default]
    Unexpected,
    UnterminatedComment,
    UnterminatedString,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = RawError)]
#[logos(skip r"[ \t\r\n\x0C]+")]
pub(crate) enum RawToken {
    // === Tags and comments ===
    #[token("?>", close_tag)]
    CloseTag,
    #[token("/*", block_comment)]
    BlockComment,
    #[token("//", line_comment)]
    #[token("#", line_comment)]
    LineComment,

    // === Names ===
    #[regex(r"\$[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*")]
    Variable,
    #[regex(r"[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*")]
    Ident,
    #[regex(r"(\\[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*)+")]
    #[regex(r"[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*(\\[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*)+")]
    QualifiedName,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
    #[regex(r"0[bB][01][01_]*")]
    #[regex(r"[0-9][0-9_]*")]
    Integer,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,
    #[regex(r"'([^'\\]|\\[\x00-\x{10FFFF}])*'")]
    SingleQuoted,
    #[regex(r#""([^"\\]|\\[\x00-\x{10FFFF}])*""#)]
    DoubleQuoted,
    /// Heredoc or, with a quoted `'LABEL'`, nowdoc.
    #[regex(r"<<<[ \t]*[a-zA-Z_][a-zA-Z0-9_]*", heredoc)]
    #[regex(r#"<<<[ \t]*"[a-zA-Z_][a-zA-Z0-9_]*""#, heredoc)]
    #[regex(r"<<<[ \t]*'[a-zA-Z_][a-zA-Z0-9_]*'", heredoc)]
    Heredoc,

    // === Punctuation ===
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("->")]
    Arrow,
    #[token("?->")]
    NullsafeArrow,
    #[token("=>")]
    DoubleArrow,
    #[token("::")]
    DoubleColon,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("...")]
    Ellipsis,
    #[token("$")]
    Dollar,
    #[token("@")]
    At,

    // === Assignment ===
    #[token("=")]
    Equal,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    MulEqual,
    #[token("/=")]
    DivEqual,
    #[token(".=")]
    ConcatEqual,
    #[token("%=")]
    ModEqual,
    #[token("**=")]
    PowEqual,
    #[token("&=")]
    AndEqual,
    #[token("|=")]
    OrEqual,
    #[token("^=")]
    XorEqual,
    #[token("<<=")]
    ShiftLeftEqual,
    #[token(">>=")]
    ShiftRightEqual,
    #[token("??=")]
    CoalesceEqual,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("**")]
    Pow,
    #[token(".")]
    Dot,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    ShiftLeft,
    #[token(">>")]
    ShiftRight,
    #[token("&&")]
    BooleanAnd,
    #[token("||")]
    BooleanOr,
    #[token("!")]
    Bang,
    #[token("==")]
    IsEqual,
    #[token("!=")]
    #[token("<>")]
    IsNotEqual,
    #[token("===")]
    IsIdentical,
    #[token("!==")]
    IsNotIdentical,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<=>")]
    Spaceship,
    #[token("??")]
    Coalesce,
    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,
}

/// `?>` swallows a single directly following newline.
fn close_tag(lex: &mut Lexer<'_, RawToken>) {
    let rest = lex.remainder();
    if rest.starts_with("\r\n") {
        lex.bump(2);
    } else if rest.starts_with('\n') {
        lex.bump(1);
    }
}

fn block_comment(lex: &mut Lexer<'_, RawToken>) -> Result<(), RawError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(RawError::UnterminatedComment)
        }
    }
}

/// Consume a heredoc body through its closing label.
///
/// The opening label must end its line. The body ends at the first line
/// whose indented text starts with the label not followed by a name
/// character.
fn heredoc(lex: &mut Lexer<'_, RawToken>) -> Result<(), RawError> {
    let label = lex.slice()[3..]
        .trim_start_matches([' ', '\t'])
        .trim_matches(['"', '\''])
        .to_owned();
    let rest = lex.remainder();
    let Some(newline) = rest.find('\n') else {
        lex.bump(rest.len());
        return Err(RawError::UnterminatedString);
    };
    if !rest[..newline].trim().is_empty() {
        return Err(RawError::Unexpected);
    }

    let mut offset = newline + 1;
    for line in rest[offset..].split_inclusive('\n') {
        let body = line.trim_start_matches([' ', '\t']);
        if let Some(after) = body.strip_prefix(label.as_str()) {
            if !after.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
                lex.bump(offset + (line.len() - body.len()) + label.len());
                return Ok(());
            }
        }
        offset += line.len();
    }
    lex.bump(rest.len());
    Err(RawError::UnterminatedString)
}

/// Line comments end before a newline or a closing tag.
fn line_comment(lex: &mut Lexer<'_, RawToken>) {
    let rest = lex.remainder();
    let newline = rest.find(['\n', '\r']).unwrap_or(rest.len());
    let close = rest.find("?>").unwrap_or(rest.len());
    lex.bump(newline.min(close));
}

use super::*;
use crate::{SourceRange, Span};

fn token(kind: TokenKind, image: &str, start: u32, column: u32) -> Token {
    let len = u32::try_from(image.len()).unwrap_or(0);
    Token::new(
        kind,
        image,
        Span::new(start, start + len),
        SourceRange::new(1, column, 1, column + len - 1),
    )
}

#[test]
fn keyword_lookup_is_lowercase_only() {
    assert_eq!(TokenKind::keyword("class"), Some(TokenKind::Class));
    assert_eq!(TokenKind::keyword("insteadof"), Some(TokenKind::InsteadOf));
    assert_eq!(TokenKind::keyword("self"), Some(TokenKind::SelfKw));
    assert_eq!(TokenKind::keyword("Class"), None);
    assert_eq!(TokenKind::keyword("foo"), None);
}

#[test]
fn every_keyword_lookup_is_a_keyword() {
    for word in [
        "abstract", "and", "array", "as", "break", "callable", "case", "catch", "class", "clone",
        "const", "continue", "default", "do", "echo", "else", "elseif", "endfor", "endforeach",
        "endif", "endswitch", "endwhile", "extends", "false",
        "final", "finally", "fn", "for", "foreach", "function", "global", "if", "implements",
        "include", "include_once", "instanceof", "insteadof", "interface", "list", "namespace",
        "new", "null", "or", "parent", "print", "private", "protected", "public", "readonly",
        "require", "require_once", "return", "self", "static", "switch", "throw", "trait",
        "true", "try", "use", "var", "while", "xor", "yield",
    ] {
        let kind = TokenKind::keyword(word);
        assert!(
            kind.is_some_and(TokenKind::is_keyword),
            "`{word}` should map to a keyword kind"
        );
    }
}

#[test]
fn trivia_and_insignificant_kinds() {
    assert!(TokenKind::DocComment.is_trivia());
    assert!(!TokenKind::OpenTag.is_trivia());
    assert!(TokenKind::OpenTag.is_insignificant());
    assert!(!TokenKind::CloseTag.is_insignificant());
    assert!(!TokenKind::Identifier.is_insignificant());
}

#[test]
fn token_list_finish_appends_single_eof() {
    let mut list = TokenList::new();
    list.push(token(TokenKind::OpenTag, "<?php", 0, 1));
    list.push(token(TokenKind::Variable, "$a", 6, 7));
    list.finish(8);
    list.finish(8);

    assert_eq!(list.len(), 3);
    let eof = &list[2];
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.span, Span::point(8));
    assert_eq!(eof.range, SourceRange::new(1, 9, 1, 9));
}

#[test]
fn token_list_within_span() {
    let mut list = TokenList::new();
    list.push(token(TokenKind::Identifier, "foo", 0, 1));
    list.push(token(TokenKind::LParen, "(", 3, 4));
    list.push(token(TokenKind::RParen, ")", 4, 5));
    list.finish(5);

    let images: Vec<&str> = list
        .within(Span::new(3, 5))
        .map(|t| t.image.as_str())
        .collect();
    assert_eq!(images, vec!["(", ")"]);
}

#[test]
fn token_accessors() {
    let tok = token(TokenKind::Identifier, "foo", 0, 5);
    assert_eq!(tok.start_line(), 1);
    assert_eq!(tok.end_line(), 1);
    assert_eq!(tok.start_column(), 5);
    assert_eq!(tok.end_column(), 7);
    assert!(!tok.is_trivia());
}

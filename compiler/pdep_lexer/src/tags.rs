//! Splitting a file into inline HTML and PHP code regions.

use pdep_ir::TokenKind;

/// An opening tag found in inline HTML.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct OpenTag {
    pub start: usize,
    pub len: usize,
    pub kind: TokenKind,
}

/// Find the next `<?php` (any case) or `<?=` at or after `from`.
///
/// `<?php` must be followed by whitespace or the end of input.
pub(crate) fn find_open_tag(source: &str, from: usize) -> Option<OpenTag> {
    let haystack = source.get(from..)?;
    for (pos, _) in haystack.match_indices("<?") {
        let start = from + pos;
        let rest = &source[start + 2..];
        if rest.starts_with('=') {
            return Some(OpenTag {
                start,
                len: 3,
                kind: TokenKind::OpenTagWithEcho,
            });
        }
        let is_php = rest
            .get(..3)
            .is_some_and(|word| word.eq_ignore_ascii_case("php"));
        let delimited = rest
            .get(3..)
            .and_then(|tail| tail.chars().next())
            .map_or(true, char::is_whitespace);
        if is_php && delimited {
            return Some(OpenTag {
                start,
                len: 5,
                kind: TokenKind::OpenTag,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_php_tag_case_insensitive() {
        let source = "<html><?PHP echo 1;";
        assert_eq!(
            find_open_tag(source, 0),
            Some(OpenTag {
                start: 6,
                len: 5,
                kind: TokenKind::OpenTag
            })
        );
    }

    #[test]
    fn finds_echo_tag() {
        let tag = find_open_tag("a <?= $b ?>", 0);
        assert_eq!(tag.map(|t| (t.start, t.kind)), Some((2, TokenKind::OpenTagWithEcho)));
    }

    #[test]
    fn ignores_xml_declarations() {
        assert_eq!(find_open_tag("<?xml version=\"1.0\"?>", 0), None);
        assert_eq!(find_open_tag("<?phpx", 0), None);
    }

    #[test]
    fn tag_at_end_of_input() {
        assert_eq!(find_open_tag("<?php", 0).map(|t| t.len), Some(5));
    }
}

//! Compile-time values of defaults, constants and static variables.

use pdep_ir::{AstArena, NodeId, NodeKind};

/// A value that can be computed without running code.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StaticValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Elements in source order; `None` keys are implicit.
    Array(Vec<(Option<StaticValue>, StaticValue)>),
    /// A named constant (`FOO`, `Foo::BAR`) left unevaluated.
    Constant(String),
    /// Anything else.
    Unknown,
}

impl StaticValue {
    /// Evaluate the expression rooted at `node`.
    pub fn evaluate(ast: &AstArena, node: NodeId) -> StaticValue {
        let image = ast.image(node);
        match ast.kind(node) {
            NodeKind::Literal => literal(image),
            NodeKind::Constant | NodeKind::Identifier => match image.to_ascii_lowercase().as_str() {
                "null" => StaticValue::Null,
                "true" => StaticValue::Bool(true),
                "false" => StaticValue::Bool(false),
                _ => StaticValue::Constant(image.to_owned()),
            },
            NodeKind::UnaryExpression => {
                let Some(&operand) = ast.children(node).first() else {
                    return StaticValue::Unknown;
                };
                match (image, StaticValue::evaluate(ast, operand)) {
                    ("-", StaticValue::Int(i)) => StaticValue::Int(i.wrapping_neg()),
                    ("-", StaticValue::Float(f)) => StaticValue::Float(-f),
                    ("+", value @ (StaticValue::Int(_) | StaticValue::Float(_))) => value,
                    ("!", StaticValue::Bool(b)) => StaticValue::Bool(!b),
                    _ => StaticValue::Unknown,
                }
            }
            NodeKind::Array => StaticValue::Array(
                ast.children(node)
                    .iter()
                    .map(|&element| array_element(ast, element))
                    .collect(),
            ),
            NodeKind::MemberPrimaryPrefix => class_constant(ast, node),
            _ => StaticValue::Unknown,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StaticValue::Null)
    }
}

fn array_element(ast: &AstArena, element: NodeId) -> (Option<StaticValue>, StaticValue) {
    match ast.children(element) {
        [key, value] => (
            Some(StaticValue::evaluate(ast, *key)),
            StaticValue::evaluate(ast, *value),
        ),
        [value] => (None, StaticValue::evaluate(ast, *value)),
        _ => (None, StaticValue::Unknown),
    }
}

/// `Foo::BAR` as `Constant("Foo::BAR")`.
fn class_constant(ast: &AstArena, node: NodeId) -> StaticValue {
    match ast.children(node) {
        [class, postfix] if ast.kind(*postfix) == NodeKind::ConstantPostfix => {
            StaticValue::Constant(format!("{}::{}", ast.image(*class), ast.image(*postfix)))
        }
        _ => StaticValue::Unknown,
    }
}

fn literal(image: &str) -> StaticValue {
    let lower = image.to_ascii_lowercase();
    match lower.as_str() {
        "null" => return StaticValue::Null,
        "true" => return StaticValue::Bool(true),
        "false" => return StaticValue::Bool(false),
        _ => {}
    }
    if let Some(body) = image.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return StaticValue::String(unescape_single(body));
    }
    if let Some(body) = image.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return StaticValue::String(unescape_double(body));
    }
    let digits = lower.replace('_', "");
    let int = if let Some(hex) = digits.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = digits.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()
    } else if digits.len() > 1 && digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit()) {
        i64::from_str_radix(&digits[1..], 8).ok()
    } else {
        digits.parse().ok()
    };
    if let Some(int) = int {
        return StaticValue::Int(int);
    }
    digits.parse().map_or(StaticValue::Unknown, StaticValue::Float)
}

fn unescape_single(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('\'' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn unescape_double(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(next @ ('"' | '\\' | '$')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use pdep_ir::AstError;

    use super::*;

    #[test]
    fn literals() {
        assert_eq!(literal("42"), StaticValue::Int(42));
        assert_eq!(literal("0x1F"), StaticValue::Int(31));
        assert_eq!(literal("0b101"), StaticValue::Int(5));
        assert_eq!(literal("017"), StaticValue::Int(15));
        assert_eq!(literal("1_000"), StaticValue::Int(1000));
        assert_eq!(literal("1.5"), StaticValue::Float(1.5));
        assert_eq!(literal("NULL"), StaticValue::Null);
        assert_eq!(literal("'it\\'s'"), StaticValue::String("it's".to_owned()));
        assert_eq!(literal("\"a\\tb\""), StaticValue::String("a\tb".to_owned()));
    }

    #[test]
    fn negative_numbers_and_arrays() -> Result<(), AstError> {
        let mut ast = AstArena::new();
        let neg = ast.alloc(NodeKind::UnaryExpression, "-")?;
        let one = ast.alloc(NodeKind::Literal, "1")?;
        ast.add_child(neg, one)?;
        assert_eq!(StaticValue::evaluate(&ast, neg), StaticValue::Int(-1));

        let array = ast.alloc(NodeKind::Array, "array")?;
        let element = ast.alloc(NodeKind::ArrayElement, "")?;
        let key = ast.alloc(NodeKind::Literal, "'a'")?;
        let value = ast.alloc(NodeKind::Constant, "true")?;
        ast.add_child(array, element)?;
        ast.add_child(element, key)?;
        ast.add_child(element, value)?;
        assert_eq!(
            StaticValue::evaluate(&ast, array),
            StaticValue::Array(vec![(
                Some(StaticValue::String("a".to_owned())),
                StaticValue::Bool(true)
            )])
        );
        Ok(())
    }

    #[test]
    fn class_constant_reference() -> Result<(), AstError> {
        let mut ast = AstArena::new();
        let prefix = ast.alloc(NodeKind::MemberPrimaryPrefix, "::")?;
        let class = ast.alloc(NodeKind::ClassReference, "Foo")?;
        let postfix = ast.alloc(NodeKind::ConstantPostfix, "BAR")?;
        ast.add_child(prefix, class)?;
        ast.add_child(prefix, postfix)?;
        assert_eq!(
            StaticValue::evaluate(&ast, prefix),
            StaticValue::Constant("Foo::BAR".to_owned())
        );
        Ok(())
    }
}

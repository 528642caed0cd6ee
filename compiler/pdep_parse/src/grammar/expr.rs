//! Expressions.
//!
//! Binary operators are parsed by precedence climbing. A run of operators
//! at the same level is kept flat: `1 + 2 - 3` becomes one `Expression`
//! whose children alternate operands and operator nodes.

use pdep_code::{TypeKind, ANONYMOUS_CLASS};
use pdep_ir::{Modifiers, NodeFlags, NodeId, NodeKind, TokenKind};

use crate::stack::ensure_sufficient_stack;
use crate::{Mark, ParseError, Parser};

/// Binding power of each operator level, loosest first.
mod prec {
    pub const LOGICAL_OR: u8 = 1;
    pub const LOGICAL_XOR: u8 = 2;
    pub const LOGICAL_AND: u8 = 3;
    pub const ASSIGN: u8 = 4;
    pub const TERNARY: u8 = 5;
    pub const COALESCE: u8 = 6;
    pub const BOOL_OR: u8 = 7;
    pub const BOOL_AND: u8 = 8;
    pub const BIT_OR: u8 = 9;
    pub const BIT_XOR: u8 = 10;
    pub const BIT_AND: u8 = 11;
    pub const EQUALITY: u8 = 12;
    pub const COMPARE: u8 = 13;
    pub const SHIFT: u8 = 14;
    pub const ADDITIVE: u8 = 15;
    pub const MULTIPLICATIVE: u8 = 16;
    pub const INSTANCEOF: u8 = 17;
    pub const UNARY: u8 = 18;
    pub const POW: u8 = 19;
}

/// Precedence, operator node kind and right associativity of a binary operator.
fn binary_operator(kind: TokenKind) -> Option<(u8, NodeKind, bool)> {
    let op = match kind {
        TokenKind::Or => (prec::LOGICAL_OR, NodeKind::LogicalOrExpression, false),
        TokenKind::Xor => (prec::LOGICAL_XOR, NodeKind::LogicalXorExpression, false),
        TokenKind::And => (prec::LOGICAL_AND, NodeKind::LogicalAndExpression, false),
        TokenKind::Coalesce => (prec::COALESCE, NodeKind::CoalesceExpression, true),
        TokenKind::BooleanOr => (prec::BOOL_OR, NodeKind::BooleanOrExpression, false),
        TokenKind::BooleanAnd => (prec::BOOL_AND, NodeKind::BooleanAndExpression, false),
        TokenKind::Pipe => (prec::BIT_OR, NodeKind::MathematicalExpression, false),
        TokenKind::Caret => (prec::BIT_XOR, NodeKind::MathematicalExpression, false),
        TokenKind::Ampersand => (prec::BIT_AND, NodeKind::MathematicalExpression, false),
        TokenKind::IsEqual
        | TokenKind::IsNotEqual
        | TokenKind::IsIdentical
        | TokenKind::IsNotIdentical
        | TokenKind::Spaceship => (prec::EQUALITY, NodeKind::ComparisonExpression, false),
        TokenKind::Less | TokenKind::Greater | TokenKind::LessEqual | TokenKind::GreaterEqual => {
            (prec::COMPARE, NodeKind::ComparisonExpression, false)
        }
        TokenKind::ShiftLeft | TokenKind::ShiftRight => (prec::SHIFT, NodeKind::MathematicalExpression, false),
        TokenKind::Plus | TokenKind::Minus | TokenKind::Dot => {
            (prec::ADDITIVE, NodeKind::MathematicalExpression, false)
        }
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
            (prec::MULTIPLICATIVE, NodeKind::MathematicalExpression, false)
        }
        TokenKind::Pow => (prec::POW, NodeKind::MathematicalExpression, true),
        _ => return None,
    };
    Some(op)
}

const CAST_TYPES: &[&str] = &[
    "int", "integer", "bool", "boolean", "float", "double", "real", "string", "array", "object", "unset",
    "binary",
];

impl Parser<'_> {
    /// A full expression, including low-precedence `and`/`or`/`xor`.
    pub(crate) fn parse_expr(&mut self) -> Result<NodeId, ParseError> {
        ensure_sufficient_stack(|| self.parse_expr_bp(prec::LOGICAL_OR))
    }

    fn parse_expr_bp(&mut self, min: u8) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        let mut lhs = self.parse_unary()?;
        // Open flat group and its level.
        let mut group: Option<(NodeId, u8)> = None;

        loop {
            let kind = self.current_kind();

            // Assignment binds to the variable on its left whatever the
            // surrounding level, as in `!$a = f()`.
            if kind.is_assignment() {
                let op = self.advance();
                let assignment = self.alloc(NodeKind::AssignmentExpression, op.image.as_str())?;
                if kind == TokenKind::Equal && self.eat(TokenKind::Ampersand) {
                    self.ast().get_mut(assignment).metadata.flags |= NodeFlags::BY_REFERENCE;
                }
                let value = self.parse_expr_bp(prec::ASSIGN)?;
                self.attach(assignment, lhs)?;
                self.attach(assignment, value)?;
                self.close(assignment, mark);
                lhs = assignment;
                group = None;
                continue;
            }

            if kind == TokenKind::Question && min <= prec::TERNARY {
                self.advance();
                let conditional = self.alloc(NodeKind::ConditionalExpression, "?")?;
                self.attach(conditional, lhs)?;
                if !self.eat(TokenKind::Colon) {
                    let then = self.parse_expr()?;
                    self.attach(conditional, then)?;
                    self.expect(TokenKind::Colon)?;
                }
                let otherwise = self.parse_expr_bp(prec::TERNARY + 1)?;
                self.attach(conditional, otherwise)?;
                self.close(conditional, mark);
                lhs = conditional;
                group = None;
                continue;
            }

            if kind == TokenKind::InstanceOf && min <= prec::INSTANCEOF {
                let op_mark = self.mark();
                self.advance();
                let op = self.alloc(NodeKind::InstanceOfExpression, "instanceof")?;
                let class = self.parse_instanceof_target()?;
                self.attach(op, class)?;
                self.close(op, op_mark);
                lhs = self.extend_group(&mut group, lhs, prec::INSTANCEOF, op, None, mark)?;
                continue;
            }

            let Some((level, op_kind, right_assoc)) = binary_operator(kind) else {
                break;
            };
            if level < min {
                break;
            }
            let token = self.advance();
            let op = self.leaf(op_kind, token.image.as_str(), token)?;
            let next_min = if right_assoc { level } else { level + 1 };
            let rhs = self.parse_expr_bp(next_min)?;
            lhs = self.extend_group(&mut group, lhs, level, op, Some(rhs), mark)?;
        }
        Ok(lhs)
    }

    /// Append `op [rhs]` to the open group at `level`, or open a new one
    /// around `lhs`.
    fn extend_group(
        &mut self,
        group: &mut Option<(NodeId, u8)>,
        lhs: NodeId,
        level: u8,
        op: NodeId,
        rhs: Option<NodeId>,
        mark: Mark,
    ) -> Result<NodeId, ParseError> {
        let node = match *group {
            Some((node, open)) if open == level && node == lhs => node,
            _ => {
                let node = self.alloc(NodeKind::Expression, "")?;
                self.attach(node, lhs)?;
                *group = Some((node, level));
                node
            }
        };
        self.attach(node, op)?;
        if let Some(rhs) = rhs {
            self.attach(node, rhs)?;
        }
        self.close(node, mark);
        Ok(node)
    }

    fn parse_instanceof_target(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::SelfKw | TokenKind::Parent | TokenKind::Static => self.parse_special_reference(),
            TokenKind::Identifier | TokenKind::QualifiedName => self.parse_class_reference(NodeKind::ClassReference),
            _ => self.parse_postfix_expr(),
        }
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        let (kind, operand_level) = match self.current_kind() {
            TokenKind::Bang => (NodeKind::UnaryExpression, prec::INSTANCEOF),
            TokenKind::Minus | TokenKind::Plus | TokenKind::Tilde | TokenKind::At => {
                (NodeKind::UnaryExpression, prec::UNARY)
            }
            TokenKind::Increment => (NodeKind::PreIncrementExpression, prec::UNARY),
            TokenKind::Decrement => (NodeKind::PreDecrementExpression, prec::UNARY),
            TokenKind::Clone => (NodeKind::CloneExpression, prec::UNARY),
            TokenKind::Print => (NodeKind::PrintExpression, prec::ASSIGN),
            TokenKind::Include | TokenKind::IncludeOnce => (NodeKind::IncludeExpression, prec::ASSIGN),
            TokenKind::Require | TokenKind::RequireOnce => (NodeKind::RequireExpression, prec::ASSIGN),
            TokenKind::LParen if self.at_cast() => return self.parse_cast(),
            TokenKind::New => return self.parse_allocation(),
            TokenKind::Yield => return self.parse_yield(),
            _ => return self.parse_postfix_expr(),
        };
        let op = self.advance();
        let node = self.alloc(kind, op.image.to_ascii_lowercase())?;
        let operand = ensure_sufficient_stack(|| self.parse_expr_bp(operand_level))?;
        self.attach(node, operand)?;
        self.close(node, mark);
        Ok(node)
    }

    /// `(int)`, `(string)` and the other cast operators.
    fn at_cast(&self) -> bool {
        matches!(self.peek_kind(1), TokenKind::Identifier | TokenKind::Array)
            && self.peek_kind(2) == TokenKind::RParen
            && CAST_TYPES.contains(&self.peek(1).image.to_ascii_lowercase().as_str())
    }

    fn parse_cast(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::LParen)?;
        let name = self.advance().image.to_ascii_lowercase();
        self.expect(TokenKind::RParen)?;
        let cast = self.alloc(NodeKind::CastExpression, format!("({name})"))?;
        let operand = ensure_sufficient_stack(|| self.parse_expr_bp(prec::UNARY))?;
        self.attach(cast, operand)?;
        self.close(cast, mark);
        Ok(cast)
    }

    /// `new Class(args)`, `new static`, `new $name(args)` or
    /// `new class(args) extends P implements I { ... }`.
    fn parse_allocation(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::New)?;
        let allocation = self.alloc(NodeKind::AllocationExpression, "new")?;
        if self.check(TokenKind::Class) {
            return self.parse_anonymous_class(allocation, mark);
        }
        let class = match self.current_kind() {
            TokenKind::SelfKw | TokenKind::Parent | TokenKind::Static => self.parse_special_reference()?,
            TokenKind::Variable => {
                let token = self.advance();
                self.leaf(NodeKind::Variable, token.image.as_str(), token)?
            }
            _ => self.parse_class_reference(NodeKind::ClassReference)?,
        };
        self.attach(allocation, class)?;
        if self.check(TokenKind::LParen) {
            let arguments = self.parse_arguments()?;
            self.attach(allocation, arguments)?;
        }
        self.close(allocation, mark);
        Ok(allocation)
    }

    fn parse_anonymous_class(&mut self, allocation: NodeId, mark: Mark) -> Result<NodeId, ParseError> {
        let class_mark = self.mark();
        self.expect(TokenKind::Class)?;
        let node = self.alloc(NodeKind::AnonymousClass, ANONYMOUS_CLASS)?;
        let ns = self.builder.namespace(self.names.namespace());
        let ty = self.builder.register_anonymous_class(Some(self.unit), ns, node);
        self.builder.type_decl_mut(ty).set_modifiers(Modifiers::empty())?;

        let arguments = if self.check(TokenKind::LParen) {
            Some(self.parse_arguments()?)
        } else {
            None
        };
        self.parse_type_tail(TypeKind::Class, ty, node)?;
        self.close(node, class_mark);

        self.attach(allocation, node)?;
        if let Some(arguments) = arguments {
            self.attach(allocation, arguments)?;
        }
        self.close(allocation, mark);
        Ok(allocation)
    }

    /// `yield`, `yield $v`, `yield $k => $v` or `yield from $e`.
    fn parse_yield(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Yield)?;
        if self.check(TokenKind::Identifier) && self.current().image.eq_ignore_ascii_case("from") {
            self.advance();
            let node = self.alloc(NodeKind::YieldExpression, "yield from")?;
            let operand = ensure_sufficient_stack(|| self.parse_expr_bp(prec::ASSIGN))?;
            self.attach(node, operand)?;
            self.close(node, mark);
            return Ok(node);
        }
        let node = self.alloc(NodeKind::YieldExpression, "yield")?;
        let bare = matches!(
            self.current_kind(),
            TokenKind::Semicolon
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::Comma
                | TokenKind::CloseTag
                | TokenKind::Eof
        );
        if !bare {
            let first = ensure_sufficient_stack(|| self.parse_expr_bp(prec::ASSIGN))?;
            self.attach(node, first)?;
            if self.eat(TokenKind::DoubleArrow) {
                let value = ensure_sufficient_stack(|| self.parse_expr_bp(prec::ASSIGN))?;
                self.attach(node, value)?;
            }
        }
        self.close(node, mark);
        Ok(node)
    }

    /// A primary expression followed by any number of postfix operators.
    fn parse_postfix_expr(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        let primary = self.parse_primary()?;
        self.parse_postfix(primary, mark)
    }

    fn parse_postfix(&mut self, mut base: NodeId, mark: Mark) -> Result<NodeId, ParseError> {
        loop {
            base = match self.current_kind() {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.alloc(NodeKind::ArrayIndexExpression, "")?;
                    self.attach(index, base)?;
                    if !self.check(TokenKind::RBracket) {
                        let offset = self.parse_expr()?;
                        self.attach(index, offset)?;
                    }
                    self.expect(TokenKind::RBracket)?;
                    index
                }
                TokenKind::LBrace if self.cursor.adjacent_to_previous() && self.is_variable_like(base) => {
                    self.advance();
                    let index = self.alloc(NodeKind::StringIndexExpression, "")?;
                    self.attach(index, base)?;
                    let offset = self.parse_expr()?;
                    self.attach(index, offset)?;
                    self.expect(TokenKind::RBrace)?;
                    index
                }
                TokenKind::Arrow | TokenKind::NullsafeArrow => {
                    let op = self.advance();
                    let access = self.alloc(NodeKind::MemberPrimaryPrefix, op.image.as_str())?;
                    if op.kind == TokenKind::NullsafeArrow {
                        self.ast().get_mut(access).metadata.flags |= NodeFlags::NULLSAFE;
                    }
                    self.attach(access, base)?;
                    let member = self.parse_instance_member()?;
                    self.attach(access, member)?;
                    access
                }
                TokenKind::DoubleColon => {
                    self.advance();
                    let access = self.alloc(NodeKind::MemberPrimaryPrefix, "::")?;
                    self.attach(access, base)?;
                    let member = self.parse_static_member()?;
                    self.attach(access, member)?;
                    access
                }
                TokenKind::LParen => {
                    let image = match self.builder.ast().kind(base) {
                        NodeKind::Variable => self.builder.ast().image(base).to_owned(),
                        _ => String::new(),
                    };
                    let call = self.alloc(NodeKind::FunctionPostfix, image)?;
                    self.attach(call, base)?;
                    let arguments = self.parse_arguments()?;
                    self.attach(call, arguments)?;
                    call
                }
                TokenKind::Increment | TokenKind::Decrement => {
                    let op = self.advance();
                    let postfix = self.alloc(NodeKind::PostfixExpression, op.image.as_str())?;
                    self.attach(postfix, base)?;
                    postfix
                }
                _ => return Ok(base),
            };
            self.close(base, mark);
        }
    }

    fn is_variable_like(&self, node: NodeId) -> bool {
        matches!(
            self.builder.ast().kind(node),
            NodeKind::Variable
                | NodeKind::VariableVariable
                | NodeKind::CompoundVariable
                | NodeKind::ArrayIndexExpression
                | NodeKind::StringIndexExpression
        )
    }

    /// Member after `->` or `?->`.
    fn parse_instance_member(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        let name = match self.current_kind() {
            TokenKind::Variable => {
                let token = self.advance();
                self.leaf(NodeKind::Variable, token.image.as_str(), token)?
            }
            TokenKind::LBrace => {
                self.advance();
                let name = self.alloc(NodeKind::CompoundVariable, "{")?;
                let inner = self.parse_expr()?;
                self.attach(name, inner)?;
                self.expect(TokenKind::RBrace)?;
                self.close(name, mark);
                name
            }
            _ => {
                let token = self.expect_name()?;
                self.leaf(NodeKind::Identifier, token.image.as_str(), token)?
            }
        };
        let image = self.builder.ast().image(name).to_owned();
        if self.check(TokenKind::LParen) {
            self.member_call(image, name, mark)
        } else {
            let property = self.alloc(NodeKind::PropertyPostfix, image)?;
            self.attach(property, name)?;
            self.close(property, mark);
            Ok(property)
        }
    }

    /// Member after `::`: method, static property, constant or `class`.
    fn parse_static_member(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        if self.check(TokenKind::Variable) {
            let token = self.advance();
            let variable = self.leaf(NodeKind::Variable, token.image.as_str(), token)?;
            if self.check(TokenKind::LParen) {
                return self.member_call(token.image.clone(), variable, mark);
            }
            let property = self.alloc(NodeKind::PropertyPostfix, token.image.as_str())?;
            self.attach(property, variable)?;
            self.close(property, mark);
            return Ok(property);
        }

        let token = self.expect_name()?;
        let identifier = self.leaf(NodeKind::Identifier, token.image.as_str(), token)?;
        if token.kind != TokenKind::Class && self.check(TokenKind::LParen) {
            return self.member_call(token.image.clone(), identifier, mark);
        }
        let image = if token.kind == TokenKind::Class {
            "class".to_owned()
        } else {
            token.image.clone()
        };
        let constant = self.alloc(NodeKind::ConstantPostfix, image)?;
        self.attach(constant, identifier)?;
        self.close(constant, mark);
        Ok(constant)
    }

    fn member_call(&mut self, image: String, name: NodeId, mark: Mark) -> Result<NodeId, ParseError> {
        let method = self.alloc(NodeKind::MethodPostfix, image)?;
        self.attach(method, name)?;
        let arguments = self.parse_arguments()?;
        self.attach(method, arguments)?;
        self.close(method, mark);
        Ok(method)
    }

    /// `( [arg {, arg}] )` of a call. Named argument labels are dropped;
    /// `...$args` is flagged [`NodeFlags::VARIADIC`].
    fn parse_arguments(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::LParen)?;
        let arguments = self.alloc(NodeKind::Arguments, "")?;
        // `f(...)` creates a closure from a callable.
        if self.check(TokenKind::Ellipsis) && self.peek_kind(1) == TokenKind::RParen {
            self.advance();
        }
        while !self.eat(TokenKind::RParen) {
            let spread = self.eat(TokenKind::Ellipsis);
            let kind = self.current_kind();
            if (kind == TokenKind::Identifier || kind.is_keyword()) && self.peek_kind(1) == TokenKind::Colon {
                self.advance();
                self.advance();
            }
            let argument = self.parse_expr()?;
            if spread {
                self.ast().get_mut(argument).metadata.flags |= NodeFlags::VARIADIC;
            }
            self.attach(arguments, argument)?;
            if !self.eat(TokenKind::Comma) {
                self.expect(TokenKind::RParen)?;
                break;
            }
        }
        self.close(arguments, mark);
        Ok(arguments)
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        match self.current_kind() {
            TokenKind::Variable => {
                let token = self.advance();
                self.leaf(NodeKind::Variable, token.image.as_str(), token)
            }
            TokenKind::Dollar => self.parse_variable_variable(),
            TokenKind::Integer
            | TokenKind::Float
            | TokenKind::ConstantString
            | TokenKind::DoubleQuotedString
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => {
                let token = self.advance();
                self.leaf(NodeKind::Literal, token.image.as_str(), token)
            }
            TokenKind::Array if self.peek_kind(1) == TokenKind::LParen => {
                self.advance();
                self.parse_array_literal(TokenKind::RParen, mark)
            }
            TokenKind::LBracket => self.parse_array_literal(TokenKind::RBracket, mark),
            TokenKind::List => self.parse_list(),
            TokenKind::LParen => {
                self.advance();
                let group = self.alloc(NodeKind::Expression, "")?;
                let inner = self.parse_expr()?;
                self.attach(group, inner)?;
                self.expect(TokenKind::RParen)?;
                self.close(group, mark);
                Ok(group)
            }
            TokenKind::Identifier | TokenKind::QualifiedName => self.parse_name_expression(),
            TokenKind::Static if matches!(self.peek_kind(1), TokenKind::Function | TokenKind::Fn) => {
                self.parse_closure()
            }
            TokenKind::SelfKw | TokenKind::Parent | TokenKind::Static => self.parse_special_reference(),
            TokenKind::Function | TokenKind::Fn => self.parse_closure(),
            _ => Err(self.unexpected()),
        }
    }

    /// A bare name: function call, class before `::`, or constant.
    fn parse_name_expression(&mut self) -> Result<NodeId, ParseError> {
        match self.peek_kind(1) {
            TokenKind::LParen => {
                let mark = self.mark();
                let token = self.advance();
                let call = self.alloc(NodeKind::FunctionPostfix, token.image.as_str())?;
                let name = self.leaf(NodeKind::Identifier, token.image.as_str(), token)?;
                self.attach(call, name)?;
                let arguments = self.parse_arguments()?;
                self.attach(call, arguments)?;
                self.close(call, mark);
                Ok(call)
            }
            TokenKind::DoubleColon => self.parse_class_reference(NodeKind::ClassOrInterfaceReference),
            _ => {
                let token = self.advance();
                self.leaf(NodeKind::Constant, token.image.as_str(), token)
            }
        }
    }

    /// `$$name` or `${expr}`.
    fn parse_variable_variable(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Dollar)?;
        let node = if self.eat(TokenKind::LBrace) {
            let node = self.alloc(NodeKind::CompoundVariable, "$")?;
            let inner = self.parse_expr()?;
            self.attach(node, inner)?;
            self.expect(TokenKind::RBrace)?;
            node
        } else {
            let node = self.alloc(NodeKind::VariableVariable, "$")?;
            let inner = ensure_sufficient_stack(|| self.parse_primary())?;
            self.attach(node, inner)?;
            node
        };
        self.close(node, mark);
        Ok(node)
    }

    /// `array(...)` or `[...]`, the opening token at `mark`.
    fn parse_array_literal(&mut self, end: TokenKind, mark: Mark) -> Result<NodeId, ParseError> {
        if end == TokenKind::RParen {
            self.expect(TokenKind::LParen)?;
        } else {
            self.expect(TokenKind::LBracket)?;
        }
        let array = self.alloc(NodeKind::Array, "")?;
        if end == TokenKind::RBracket {
            self.ast().get_mut(array).metadata.flags |= NodeFlags::SHORT_SYNTAX;
        }
        while !self.eat(end) {
            // Skipped slot in a destructuring pattern.
            if self.eat(TokenKind::Comma) {
                continue;
            }
            let element = self.parse_array_element()?;
            self.attach(array, element)?;
            if !self.eat(TokenKind::Comma) {
                self.expect(end)?;
                break;
            }
        }
        self.close(array, mark);
        Ok(array)
    }

    /// `[key =>] [&]value` or `...spread`.
    fn parse_array_element(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        let element = self.alloc(NodeKind::ArrayElement, "")?;
        let mut flags = NodeFlags::empty();
        if self.eat(TokenKind::Ellipsis) {
            flags |= NodeFlags::VARIADIC;
            let value = self.parse_expr()?;
            self.attach(element, value)?;
        } else {
            let mut by_reference = self.eat(TokenKind::Ampersand);
            let first = self.parse_expr()?;
            self.attach(element, first)?;
            if !by_reference && self.eat(TokenKind::DoubleArrow) {
                by_reference = self.eat(TokenKind::Ampersand);
                let value = self.parse_expr()?;
                self.attach(element, value)?;
            }
            if by_reference {
                flags |= NodeFlags::BY_REFERENCE;
            }
        }
        self.ast().get_mut(element).metadata.flags |= flags;
        self.close(element, mark);
        Ok(element)
    }

    /// `list($a, , $b)`; keys are dropped, only the targets are kept.
    fn parse_list(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::List)?;
        self.expect(TokenKind::LParen)?;
        let list = self.alloc(NodeKind::ListExpression, "list")?;
        while !self.eat(TokenKind::RParen) {
            if self.eat(TokenKind::Comma) {
                continue;
            }
            let by_reference = self.eat(TokenKind::Ampersand);
            let mut target = self.parse_expr()?;
            if self.eat(TokenKind::DoubleArrow) {
                target = self.parse_expr()?;
            }
            if by_reference {
                self.ast().get_mut(target).metadata.flags |= NodeFlags::BY_REFERENCE;
            }
            self.attach(list, target)?;
            if !self.eat(TokenKind::Comma) {
                self.expect(TokenKind::RParen)?;
                break;
            }
        }
        self.close(list, mark);
        Ok(list)
    }

    /// `[static] function [&](...) [use (...)] [: T] { }` or
    /// `[static] fn [&](...) [: T] => expr`.
    fn parse_closure(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        let mut flags = NodeFlags::empty();
        if self.eat(TokenKind::Static) {
            flags |= NodeFlags::STATIC;
        }
        let short = self.eat(TokenKind::Fn);
        if !short {
            self.expect(TokenKind::Function)?;
        }
        if self.eat(TokenKind::Ampersand) {
            flags |= NodeFlags::BY_REFERENCE;
        }
        let closure = if short {
            flags |= NodeFlags::SHORT_SYNTAX;
            self.alloc(NodeKind::Closure, "fn")?
        } else {
            self.alloc(NodeKind::Closure, "function")?
        };
        self.ast().get_mut(closure).metadata.flags |= flags;

        let params = self.parse_formal_parameters()?;
        self.attach(closure, params)?;
        if !short && self.check(TokenKind::Use) {
            let uses = self.parse_closure_use()?;
            self.attach(closure, uses)?;
        }
        if self.eat(TokenKind::Colon) {
            let hint = self.parse_type()?;
            self.attach(closure, hint)?;
        }
        let body = if short {
            self.expect(TokenKind::DoubleArrow)?;
            self.parse_expr_bp(prec::ASSIGN)?
        } else {
            self.parse_scope()?
        };
        self.attach(closure, body)?;
        self.close(closure, mark);
        Ok(closure)
    }

    /// `use ($a, &$b)` of a closure.
    fn parse_closure_use(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Use)?;
        self.expect(TokenKind::LParen)?;
        let uses = self.alloc(NodeKind::ClosureUse, "use")?;
        while !self.eat(TokenKind::RParen) {
            let by_reference = self.eat(TokenKind::Ampersand);
            let token = self.expect(TokenKind::Variable)?;
            let variable = self.leaf(NodeKind::Variable, token.image.as_str(), token)?;
            if by_reference {
                self.ast().get_mut(variable).metadata.flags |= NodeFlags::BY_REFERENCE;
            }
            self.attach(uses, variable)?;
            if !self.eat(TokenKind::Comma) {
                self.expect(TokenKind::RParen)?;
                break;
            }
        }
        self.close(uses, mark);
        Ok(uses)
    }
}

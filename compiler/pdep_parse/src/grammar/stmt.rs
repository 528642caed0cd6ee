//! Statements and blocks.

use pdep_ir::{Modifiers, NodeFlags, NodeId, NodeKind, TokenKind};

use crate::{Mark, ParseError, Parser};

impl Parser<'_> {
    /// One statement, or `None` for an empty statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Option<NodeId>, ParseError> {
        let node = match self.current_kind() {
            TokenKind::Semicolon => {
                self.advance();
                return Ok(None);
            }
            TokenKind::CloseTag => {
                self.advance();
                return Ok(None);
            }
            TokenKind::LBrace => self.parse_block()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Do => self.parse_do_while()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Foreach => self.parse_foreach()?,
            TokenKind::Switch => self.parse_switch()?,
            TokenKind::Try => self.parse_try()?,
            TokenKind::Break => self.parse_jump(NodeKind::BreakStatement)?,
            TokenKind::Continue => self.parse_jump(NodeKind::ContinueStatement)?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Throw => self.parse_throw()?,
            TokenKind::Echo | TokenKind::OpenTagWithEcho => self.parse_echo()?,
            TokenKind::Global => self.parse_global()?,
            TokenKind::Identifier
                if self.current().image.eq_ignore_ascii_case("unset") && self.peek_kind(1) == TokenKind::LParen =>
            {
                self.parse_unset()?
            }
            TokenKind::Static if self.peek_kind(1) == TokenKind::Variable => self.parse_static_variables()?,
            TokenKind::Const => {
                let mark = self.mark();
                self.parse_constant_definition(Modifiers::empty(), mark)?
            }
            TokenKind::Function if self.at_function_declaration() => self.parse_function_declaration()?,
            _ if self.at_type_declaration() => self.parse_type_declaration()?,
            _ => self.parse_expression_statement()?,
        };
        Ok(Some(node))
    }

    /// The body of a function, method or closure.
    pub(crate) fn parse_scope(&mut self) -> Result<NodeId, ParseError> {
        self.parse_braced(NodeKind::Scope)
    }

    fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        self.parse_braced(NodeKind::ScopeStatement)
    }

    fn parse_braced(&mut self, kind: NodeKind) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::LBrace)?;
        let scope = self.alloc(kind, "")?;
        while !self.eat(TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(self.unexpected());
            }
            if let Some(statement) = self.parse_statement()? {
                self.attach(scope, statement)?;
            }
        }
        self.close(scope, mark);
        Ok(scope)
    }

    /// A loop or branch body. An empty `;` body yields no node.
    fn parse_body(&mut self, owner: NodeId) -> Result<(), ParseError> {
        if let Some(body) = self.parse_statement()? {
            self.attach(owner, body)?;
        }
        Ok(())
    }

    /// A loop body, either a single statement or `: ... end<keyword>;`.
    fn parse_loop_body(&mut self, owner: NodeId, end: TokenKind) -> Result<(), ParseError> {
        if !self.check(TokenKind::Colon) {
            return self.parse_body(owner);
        }
        let block = self.parse_alternative_block(&[end])?;
        self.attach(owner, block)?;
        self.expect(end)?;
        self.expect_terminator()
    }

    /// `: statements` up to (not including) one of `ends`, as a
    /// `ScopeStatement`.
    fn parse_alternative_block(&mut self, ends: &[TokenKind]) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Colon)?;
        let block = self.alloc(NodeKind::ScopeStatement, "")?;
        while !ends.contains(&self.current_kind()) {
            if self.is_at_end() {
                return Err(self.unexpected());
            }
            if let Some(statement) = self.parse_statement()? {
                self.attach(block, statement)?;
            }
        }
        self.close(block, mark);
        Ok(block)
    }

    /// `( expr )` wrapped in an `Expression` node.
    fn parse_condition(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::LParen)?;
        let condition = self.alloc(NodeKind::Expression, "")?;
        let inner = self.parse_expr()?;
        self.attach(condition, inner)?;
        self.expect(TokenKind::RParen)?;
        self.close(condition, mark);
        Ok(condition)
    }

    /// `if (c) s [elseif (c) s]* [else s]`.
    ///
    /// Each `elseif` nests inside the previous branch; the `else` body hangs
    /// off the innermost one, which gets [`NodeFlags::HAS_ELSE`].
    fn parse_if(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::If)?;
        let statement = self.alloc(NodeKind::IfStatement, "if")?;
        let condition = self.parse_condition()?;
        self.attach(statement, condition)?;
        if self.check(TokenKind::Colon) {
            return self.parse_alternative_if(statement, mark);
        }
        self.parse_body(statement)?;

        let mut chain = vec![(statement, mark)];
        let mut last = statement;
        loop {
            let branch_mark = self.mark();
            if self.eat(TokenKind::ElseIf) {
                let branch = self.alloc(NodeKind::ElseIfStatement, "elseif")?;
                let condition = self.parse_condition()?;
                self.attach(branch, condition)?;
                self.parse_body(branch)?;
                self.attach(last, branch)?;
                chain.push((branch, branch_mark));
                last = branch;
            } else if self.check(TokenKind::Else) && self.peek_kind(1) == TokenKind::If {
                self.advance();
                let branch_mark = self.mark();
                self.advance();
                let branch = self.alloc(NodeKind::ElseIfStatement, "elseif")?;
                let condition = self.parse_condition()?;
                self.attach(branch, condition)?;
                self.parse_body(branch)?;
                self.attach(last, branch)?;
                chain.push((branch, branch_mark));
                last = branch;
            } else if self.eat(TokenKind::Else) {
                self.ast().get_mut(last).metadata.flags |= NodeFlags::HAS_ELSE;
                self.parse_body(last)?;
                break;
            } else {
                break;
            }
        }
        for (node, start) in chain {
            self.close(node, start);
        }
        Ok(statement)
    }

    /// The rest of `if (c): ... [elseif (c): ...]* [else: ...] endif;`,
    /// shaped like the braced form.
    fn parse_alternative_if(&mut self, statement: NodeId, mark: Mark) -> Result<NodeId, ParseError> {
        const ENDS: &[TokenKind] = &[TokenKind::ElseIf, TokenKind::Else, TokenKind::EndIf];
        let block = self.parse_alternative_block(ENDS)?;
        self.attach(statement, block)?;

        let mut chain = vec![(statement, mark)];
        let mut last = statement;
        loop {
            let branch_mark = self.mark();
            if self.eat(TokenKind::ElseIf) {
                let branch = self.alloc(NodeKind::ElseIfStatement, "elseif")?;
                let condition = self.parse_condition()?;
                self.attach(branch, condition)?;
                let block = self.parse_alternative_block(ENDS)?;
                self.attach(branch, block)?;
                self.attach(last, branch)?;
                chain.push((branch, branch_mark));
                last = branch;
            } else if self.eat(TokenKind::Else) {
                self.ast().get_mut(last).metadata.flags |= NodeFlags::HAS_ELSE;
                let block = self.parse_alternative_block(&[TokenKind::EndIf])?;
                self.attach(last, block)?;
                break;
            } else {
                break;
            }
        }
        self.expect(TokenKind::EndIf)?;
        self.expect_terminator()?;
        for (node, start) in chain {
            self.close(node, start);
        }
        Ok(statement)
    }

    fn parse_while(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::While)?;
        let statement = self.alloc(NodeKind::WhileStatement, "while")?;
        let condition = self.parse_condition()?;
        self.attach(statement, condition)?;
        self.parse_loop_body(statement, TokenKind::EndWhile)?;
        self.close(statement, mark);
        Ok(statement)
    }

    fn parse_do_while(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Do)?;
        let statement = self.alloc(NodeKind::DoWhileStatement, "do")?;
        self.parse_body(statement)?;
        self.expect(TokenKind::While)?;
        let condition = self.parse_condition()?;
        self.attach(statement, condition)?;
        self.expect_terminator()?;
        self.close(statement, mark);
        Ok(statement)
    }

    /// `for (init; condition; update) body`, each clause optional.
    fn parse_for(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::For)?;
        let statement = self.alloc(NodeKind::ForStatement, "for")?;
        self.expect(TokenKind::LParen)?;

        if let Some(init) = self.parse_for_clause(NodeKind::ForInit, TokenKind::Semicolon)? {
            self.attach(statement, init)?;
        }
        self.expect(TokenKind::Semicolon)?;
        if let Some(condition) = self.parse_for_clause(NodeKind::Expression, TokenKind::Semicolon)? {
            self.attach(statement, condition)?;
        }
        self.expect(TokenKind::Semicolon)?;
        if let Some(update) = self.parse_for_clause(NodeKind::ForUpdate, TokenKind::RParen)? {
            self.attach(statement, update)?;
        }
        self.expect(TokenKind::RParen)?;

        self.parse_loop_body(statement, TokenKind::EndFor)?;
        self.close(statement, mark);
        Ok(statement)
    }

    /// Comma separated expressions up to `end`, or `None` if the clause is empty.
    fn parse_for_clause(&mut self, kind: NodeKind, end: TokenKind) -> Result<Option<NodeId>, ParseError> {
        if self.check(end) {
            return Ok(None);
        }
        let mark = self.mark();
        let clause = self.alloc(kind, "")?;
        loop {
            let expr = self.parse_expr()?;
            self.attach(clause, expr)?;
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.close(clause, mark);
        Ok(Some(clause))
    }

    /// `foreach (expr as [key =>] [&]value) body`.
    fn parse_foreach(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Foreach)?;
        let statement = self.alloc(NodeKind::ForeachStatement, "foreach")?;
        self.expect(TokenKind::LParen)?;
        let subject = self.parse_expr()?;
        self.attach(statement, subject)?;
        self.expect(TokenKind::As)?;

        let by_reference = self.eat(TokenKind::Ampersand);
        let first = self.parse_expr()?;
        if self.check(TokenKind::DoubleArrow) {
            // A key can never be taken by reference.
            if by_reference {
                return Err(self.unexpected());
            }
            self.advance();
            self.attach(statement, first)?;
            let value_by_reference = self.eat(TokenKind::Ampersand);
            let value = self.parse_expr()?;
            if value_by_reference {
                self.ast().get_mut(value).metadata.flags |= NodeFlags::BY_REFERENCE;
            }
            self.attach(statement, value)?;
        } else {
            if by_reference {
                self.ast().get_mut(first).metadata.flags |= NodeFlags::BY_REFERENCE;
            }
            self.attach(statement, first)?;
        }
        self.expect(TokenKind::RParen)?;

        self.parse_loop_body(statement, TokenKind::EndForeach)?;
        self.close(statement, mark);
        Ok(statement)
    }

    /// `switch (expr) { case e: ... default: ... }`, or with `: ... endswitch;`.
    fn parse_switch(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Switch)?;
        let statement = self.alloc(NodeKind::SwitchStatement, "switch")?;
        let subject = self.parse_condition()?;
        self.attach(statement, subject)?;
        let end = if self.eat(TokenKind::Colon) {
            TokenKind::EndSwitch
        } else {
            self.expect(TokenKind::LBrace)?;
            TokenKind::RBrace
        };

        while !self.eat(end) {
            let label_mark = self.mark();
            let label = match self.current_kind() {
                TokenKind::Case => {
                    self.advance();
                    let label = self.alloc(NodeKind::SwitchLabel, "case")?;
                    let value = self.parse_expr()?;
                    self.attach(label, value)?;
                    label
                }
                TokenKind::Default => {
                    self.advance();
                    let label = self.alloc(NodeKind::SwitchLabel, "default")?;
                    self.ast().get_mut(label).metadata.flags |= NodeFlags::DEFAULT_LABEL;
                    label
                }
                _ => return Err(self.unexpected()),
            };
            if !self.eat(TokenKind::Colon) {
                self.expect(TokenKind::Semicolon)?;
            }
            while !matches!(self.current_kind(), TokenKind::Case | TokenKind::Default | TokenKind::Eof)
                && !self.check(end)
            {
                if let Some(body) = self.parse_statement()? {
                    self.attach(label, body)?;
                }
            }
            self.close(label, label_mark);
            self.attach(statement, label)?;
        }
        if end == TokenKind::EndSwitch {
            self.expect_terminator()?;
        }
        self.close(statement, mark);
        Ok(statement)
    }

    /// `try { } catch (A | B [$e]) { } [finally { }]`.
    fn parse_try(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Try)?;
        let statement = self.alloc(NodeKind::TryStatement, "try")?;
        let body = self.parse_block()?;
        self.attach(statement, body)?;

        let mut handlers = 0;
        while self.check(TokenKind::Catch) {
            let catch_mark = self.mark();
            self.advance();
            let catch = self.alloc(NodeKind::CatchStatement, "catch")?;
            self.expect(TokenKind::LParen)?;
            loop {
                let class = self.parse_class_reference(NodeKind::ClassOrInterfaceReference)?;
                self.attach(catch, class)?;
                if !self.eat(TokenKind::Pipe) {
                    break;
                }
            }
            if self.check(TokenKind::Variable) {
                let token = self.advance();
                let variable = self.leaf(NodeKind::Variable, token.image.as_str(), token)?;
                self.attach(catch, variable)?;
            }
            self.expect(TokenKind::RParen)?;
            let block = self.parse_block()?;
            self.attach(catch, block)?;
            self.close(catch, catch_mark);
            self.attach(statement, catch)?;
            handlers += 1;
        }
        if self.check(TokenKind::Finally) {
            let finally_mark = self.mark();
            self.advance();
            let finally = self.alloc(NodeKind::FinallyStatement, "finally")?;
            let block = self.parse_block()?;
            self.attach(finally, block)?;
            self.close(finally, finally_mark);
            self.attach(statement, finally)?;
            handlers += 1;
        }
        if handlers == 0 {
            return Err(self.unexpected());
        }
        self.close(statement, mark);
        Ok(statement)
    }

    /// `break [n];` or `continue [n];`
    fn parse_jump(&mut self, kind: NodeKind) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        let keyword = self.advance();
        let statement = self.alloc(kind, keyword.image.to_ascii_lowercase())?;
        if !self.at_terminator() {
            let levels = self.parse_expr()?;
            self.attach(statement, levels)?;
        }
        self.expect_terminator()?;
        self.close(statement, mark);
        Ok(statement)
    }

    fn parse_return(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Return)?;
        let statement = self.alloc(NodeKind::ReturnStatement, "return")?;
        if !self.at_terminator() {
            let value = self.parse_expr()?;
            self.attach(statement, value)?;
        }
        self.expect_terminator()?;
        self.close(statement, mark);
        Ok(statement)
    }

    fn parse_throw(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Throw)?;
        let statement = self.alloc(NodeKind::ThrowStatement, "throw")?;
        let value = self.parse_expr()?;
        self.attach(statement, value)?;
        self.expect_terminator()?;
        self.close(statement, mark);
        Ok(statement)
    }

    /// `echo a, b;` or the `<?=` short form.
    fn parse_echo(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.advance();
        let statement = self.alloc(NodeKind::EchoStatement, "echo")?;
        loop {
            let value = self.parse_expr()?;
            self.attach(statement, value)?;
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_terminator()?;
        self.close(statement, mark);
        Ok(statement)
    }

    fn parse_global(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Global)?;
        let statement = self.alloc(NodeKind::GlobalStatement, "global")?;
        loop {
            let token = self.expect(TokenKind::Variable)?;
            let variable = self.leaf(NodeKind::Variable, token.image.as_str(), token)?;
            self.attach(statement, variable)?;
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_terminator()?;
        self.close(statement, mark);
        Ok(statement)
    }

    /// `unset($a, $b[1]);`
    fn parse_unset(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.advance();
        let statement = self.alloc(NodeKind::UnsetStatement, "unset")?;
        self.expect(TokenKind::LParen)?;
        while !self.eat(TokenKind::RParen) {
            let target = self.parse_expr()?;
            self.attach(statement, target)?;
            if !self.eat(TokenKind::Comma) {
                self.expect(TokenKind::RParen)?;
                break;
            }
        }
        self.expect_terminator()?;
        self.close(statement, mark);
        Ok(statement)
    }

    /// `static $a [= expr], $b;` inside a function body.
    fn parse_static_variables(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        self.expect(TokenKind::Static)?;
        let declaration = self.alloc(NodeKind::StaticVariableDeclaration, "static")?;
        loop {
            let token = self.expect(TokenKind::Variable)?;
            let declarator = self.leaf(NodeKind::VariableDeclarator, token.image.as_str(), token)?;
            if self.eat(TokenKind::Equal) {
                let value = self.parse_expr()?;
                self.attach(declarator, value)?;
                let start = self.mark_of(declarator);
                self.close(declarator, start);
            }
            self.attach(declaration, declarator)?;
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_terminator()?;
        self.close(declaration, mark);
        Ok(declaration)
    }

    fn parse_expression_statement(&mut self) -> Result<NodeId, ParseError> {
        let mark = self.mark();
        let statement = self.alloc(NodeKind::Statement, "")?;
        let expr = self.parse_expr()?;
        self.attach(statement, expr)?;
        self.expect_terminator()?;
        self.close(statement, mark);
        Ok(statement)
    }

    fn at_terminator(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Semicolon | TokenKind::CloseTag)
    }
}

/**
 * Expression Parser
 *
 * Recursive descent parser for template expressions. Bindings are pure
 * reads; actions (event handlers) may also assign and chain with `;`.
 */

use super::ast::*;
use super::lexer::{Lexer, Token, TokenType};
use crate::error::{CompileError, Result};
use crate::value::Value;

/// Parse flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFlags {
    None = 0,
    Action = 1 << 0,
}

/// Parser for template expressions
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            lexer: Lexer::new(),
        }
    }

    /// Parse an action expression (event handler)
    pub fn parse_action(&self, input: &str) -> Result<Expr> {
        self.parse(input, ParseFlags::Action)
    }

    /// Parse a binding expression (property, attribute or text binding)
    pub fn parse_binding(&self, input: &str) -> Result<Expr> {
        self.parse(input, ParseFlags::None)
    }

    fn parse(&self, input: &str, flags: ParseFlags) -> Result<Expr> {
        let tokens = self.lexer.tokenize(input);
        if let Some(error) = tokens.iter().find(|t| t.is_error()) {
            return Err(CompileError::expression(input, error.str_value.clone()));
        }
        if tokens.is_empty() {
            return Err(CompileError::expression(input, "Empty expression"));
        }
        let mut parse_ast = ParseAST::new(input, tokens, flags);
        let ast = parse_ast.parse_chain()?;
        if let Some(token) = parse_ast.current() {
            let message = format!("Unexpected token '{}'", parse_ast.token_text(token));
            return Err(parse_ast.error(message));
        }
        Ok(ast)
    }
}

/// Parser state over one token stream
struct ParseAST<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    index: usize,
    flags: ParseFlags,
}

impl<'a> ParseAST<'a> {
    fn new(input: &'a str, tokens: Vec<Token>, flags: ParseFlags) -> Self {
        ParseAST {
            input,
            tokens,
            index: 0,
            flags,
        }
    }

    fn error(&self, message: impl Into<String>) -> CompileError {
        CompileError::expression(self.input, message)
    }

    fn token_text(&self, token: &Token) -> &'a str {
        &self.input[token.index..token.end]
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn consume_optional_character(&mut self, code: char) -> bool {
        if let Some(token) = self.current() {
            if token.is_character(code) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn consume_optional_operator(&mut self, op: &str) -> bool {
        if let Some(token) = self.current() {
            if token.is_operator(op) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn expect_character(&mut self, code: char) -> Result<()> {
        if self.consume_optional_character(code) {
            return Ok(());
        }
        let found = match self.current() {
            Some(token) => format!("'{}'", self.token_text(token)),
            None => "end of input".to_string(),
        };
        Err(self.error(format!("Expected '{}' but found {}", code, found)))
    }

    /// Take the current token if it is one of the binary operators in `ops`.
    fn consume_binary_operator(&mut self, ops: &[&str]) -> Option<BinaryOp> {
        let token = self.current()?;
        let text = match token.token_type {
            TokenType::Operator => token.str_value.as_str(),
            TokenType::Keyword if token.str_value == "in" => "in",
            _ => return None,
        };
        if !ops.contains(&text) {
            return None;
        }
        let op = BinaryOp::from_operator(text)?;
        self.advance();
        Some(op)
    }

    /// Parse `a; b; c`
    fn parse_chain(&mut self) -> Result<Expr> {
        let mut expressions = vec![self.parse_assignment()?];

        while self.consume_optional_character(';') {
            if self.at_end() {
                break;
            }
            expressions.push(self.parse_assignment()?);
        }

        if expressions.len() == 1 {
            return Ok(expressions.remove(0));
        }
        if self.flags != ParseFlags::Action {
            return Err(self.error("Bindings cannot contain chained expressions"));
        }
        Ok(Expr::Chain { expressions })
    }

    /// Parse assignment (e.g., `self.count = self.count + 1`)
    fn parse_assignment(&mut self) -> Result<Expr> {
        let left = self.parse_conditional()?;

        if !self.consume_optional_operator("=") {
            return Ok(left);
        }
        if self.flags != ParseFlags::Action {
            return Err(self.error("Bindings cannot contain assignments"));
        }
        let Expr::PropertyRead { receiver, name } = left else {
            return Err(self.error("Left side of assignment is not a property"));
        };
        let value = self.parse_assignment()?;
        Ok(Expr::PropertyWrite {
            receiver,
            name,
            value: Box::new(value),
        })
    }

    /// Parse conditional/ternary expression (e.g., `a ? b : c`)
    fn parse_conditional(&mut self) -> Result<Expr> {
        let condition = self.parse_logical_or()?;

        if self.consume_optional_operator("?") {
            let true_exp = self.parse_conditional()?;
            self.expect_character(':')?;
            let false_exp = self.parse_conditional()?;
            return Ok(Expr::Conditional {
                condition: Box::new(condition),
                true_exp: Box::new(true_exp),
                false_exp: Box::new(false_exp),
            });
        }

        Ok(condition)
    }

    fn parse_binary_level(
        &mut self,
        ops: &[&str],
        next: fn(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        let mut result = next(self)?;
        while let Some(op) = self.consume_binary_operator(ops) {
            let right = next(self)?;
            result = Expr::Binary {
                op,
                left: Box::new(result),
                right: Box::new(right),
            };
        }
        Ok(result)
    }

    fn parse_logical_or(&mut self) -> Result<Expr> {
        self.parse_binary_level(&["||"], Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> Result<Expr> {
        self.parse_binary_level(&["&&"], Self::parse_nullish_coalescing)
    }

    fn parse_nullish_coalescing(&mut self) -> Result<Expr> {
        self.parse_binary_level(&["??"], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        self.parse_binary_level(&["==", "!=", "===", "!=="], Self::parse_relational)
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        self.parse_binary_level(&["<", ">", "<=", ">=", "in"], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        self.parse_binary_level(&["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        self.parse_binary_level(&["*", "/", "%"], Self::parse_prefix)
    }

    /// Parse prefix operators (`!`, `-`, `+`)
    fn parse_prefix(&mut self) -> Result<Expr> {
        let op = match self.current() {
            Some(token) if token.is_operator("!") => Some(UnaryOp::Not),
            Some(token) if token.is_operator("-") => Some(UnaryOp::Minus),
            Some(token) if token.is_operator("+") => Some(UnaryOp::Plus),
            _ => None,
        };
        match op {
            Some(op) => {
                self.advance();
                let expr = self.parse_prefix()?;
                Ok(Expr::Unary {
                    op,
                    expr: Box::new(expr),
                })
            }
            None => self.parse_call_chain(),
        }
    }

    /// Parse member access, keyed access and method calls
    fn parse_call_chain(&mut self) -> Result<Expr> {
        let mut result = self.parse_primary()?;

        loop {
            if self.consume_optional_character('.') {
                result = self.parse_access_member(result)?;
            } else if self.consume_optional_character('[') {
                let key = self.parse_conditional()?;
                self.expect_character(']')?;
                result = Expr::KeyedRead {
                    receiver: Box::new(result),
                    key: Box::new(key),
                };
            } else if self
                .current()
                .map(|t| t.is_character('('))
                .unwrap_or(false)
            {
                return Err(self.error("Only methods of a role or value can be called"));
            } else {
                return Ok(result);
            }
        }
    }

    fn parse_access_member(&mut self, receiver: Expr) -> Result<Expr> {
        let name = match self.current() {
            Some(token) if token.is_identifier() || token.is_keyword() => token.str_value.clone(),
            _ => return Err(self.error("Expected a property name after '.'")),
        };
        self.advance();

        if self.consume_optional_character('(') {
            let args = self.parse_call_arguments()?;
            return Ok(Expr::MethodCall {
                receiver: Box::new(receiver),
                method: name,
                args,
            });
        }

        Ok(Expr::PropertyRead {
            receiver: Box::new(receiver),
            name,
        })
    }

    /// Arguments after an already consumed `(`
    fn parse_call_arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.consume_optional_character(')') {
            return Ok(args);
        }
        loop {
            args.push(self.parse_conditional()?);
            if !self.consume_optional_character(',') {
                break;
            }
        }
        self.expect_character(')')?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let Some(token) = self.current().cloned() else {
            return Err(self.error("Unexpected end of expression"));
        };

        if token.is_character('(') {
            self.advance();
            let result = self.parse_conditional()?;
            self.expect_character(')')?;
            return Ok(result);
        }

        if token.is_character('[') {
            self.advance();
            return self.parse_literal_list();
        }

        if token.is_character('{') {
            self.advance();
            return self.parse_literal_map();
        }

        match token.token_type {
            TokenType::Number => {
                self.advance();
                Ok(Expr::literal(token.num_value))
            }
            TokenType::String => {
                self.advance();
                Ok(Expr::literal(token.str_value))
            }
            TokenType::Keyword => {
                let expr = match token.str_value.as_str() {
                    "true" => Expr::literal(true),
                    "false" => Expr::literal(false),
                    "null" | "undefined" => Expr::Literal { value: Value::Null },
                    other => match Role::from_name(other) {
                        Some(role) => Expr::role(role),
                        None => return Err(self.error(format!("Unexpected keyword '{}'", other))),
                    },
                };
                self.advance();
                Ok(expr)
            }
            TokenType::Identifier => Err(self.error(format!(
                "Unknown identifier '{}'; use self, parent, root or this",
                token.str_value
            ))),
            _ => Err(self.error(format!(
                "Unexpected token '{}'",
                self.token_text(&token)
            ))),
        }
    }

    /// List literal after an already consumed `[`
    fn parse_literal_list(&mut self) -> Result<Expr> {
        let mut items = Vec::new();
        if !self.consume_optional_character(']') {
            loop {
                items.push(self.parse_conditional()?);
                if !self.consume_optional_character(',') {
                    break;
                }
            }
            self.expect_character(']')?;
        }
        Ok(Expr::LiteralList { items })
    }

    /// Map literal after an already consumed `{`
    fn parse_literal_map(&mut self) -> Result<Expr> {
        let mut entries = Vec::new();
        if !self.consume_optional_character('}') {
            loop {
                let key = match self.current() {
                    Some(token)
                        if token.is_identifier() || token.is_keyword() || token.is_string() =>
                    {
                        token.str_value.clone()
                    }
                    _ => return Err(self.error("Expected a key in map literal")),
                };
                self.advance();
                self.expect_character(':')?;
                let value = self.parse_conditional()?;
                entries.push((key, value));
                if !self.consume_optional_character(',') {
                    break;
                }
            }
            self.expect_character('}')?;
        }
        Ok(Expr::LiteralMap { entries })
    }
}

use anyhow::{anyhow, bail, Result};

use crate::{
    ast::{Expression, Program, Statement},
    lexer::Lexer,
    token::Token,
};

#[derive(Debug, Clone, PartialOrd, PartialEq, Eq, Ord)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl Precedence {
    fn from_token(token: Token) -> Self {
        match token {
            Token::Eq | Token::NotEq => Precedence::Equals,
            Token::Lt | Token::Gt => Precedence::LessGreater,
            Token::Plus | Token::Minus => Precedence::Sum,
            Token::Asterisk | Token::Slash => Precedence::Product,
            Token::Lparen => Precedence::Call,
            Token::Lbracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    cur_token: Option<Token>,
    peek_token: Option<Token>,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        Self {
            cur_token: lexer.next_token(),
            peek_token: lexer.next_token(),
            lexer,
            errors: Vec::new(),
        }
    }

    /// Drains the token stream into a program. A statement that fails to
    /// parse is dropped and its message recorded; parsing resumes at the
    /// next token so one bad statement surfaces at most a few messages.
    pub fn parse_program(&mut self) -> Program {
        let mut statements: Vec<Statement> = Vec::new();
        while self.cur_token().is_some() {
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => self.errors.push(error.to_string()),
            }
            self.next_token();
        }
        Program { statements }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn cur_token(&mut self) -> Option<Token> {
        self.cur_token.clone()
    }

    fn peek_token(&mut self) -> Option<Token> {
        self.peek_token.clone()
    }

    fn next_token(&mut self) -> &mut Self {
        self.cur_token = self.peek_token();
        self.peek_token = self.lexer.next_token();
        self
    }

    fn peek_precedence(&mut self) -> Result<Precedence> {
        Ok(Precedence::from_token(
            self.peek_token().ok_or(anyhow!("no token found"))?,
        ))
    }

    fn cur_precedence(&mut self) -> Result<Precedence> {
        Ok(Precedence::from_token(
            self.cur_token().ok_or(anyhow!("no token found"))?,
        ))
    }

    fn expect_peek(&mut self, exp_token: Token) -> Result<()> {
        let peek_token = self.peek_token().ok_or(anyhow!("no token found"))?;
        if peek_token.variant_eq(exp_token.clone()) {
            self.next_token();
            Ok(())
        } else {
            bail!("expected next token to be {exp_token}, found {peek_token}",)
        }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.cur_token().ok_or(anyhow!("no token found"))? {
            Token::Let => self.parse_let_statement(),
            Token::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Statement> {
        let name = match self
            .next_token()
            .cur_token()
            .ok_or(anyhow!("no token found"))?
        {
            Token::Ident(value) => Expression::Identifier(value),
            token => bail!("expected identifier, found {token}"),
        };

        self.expect_peek(Token::Assign)?;

        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self
            .peek_token()
            .is_some_and(|token| token.variant_eq(Token::Semicolon))
        {
            self.next_token();
        }

        Ok(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Result<Statement> {
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self
            .peek_token()
            .is_some_and(|token| token.variant_eq(Token::Semicolon))
        {
            self.next_token();
        }

        Ok(Statement::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;

        let statement = Statement::Expression(expression);

        if self
            .peek_token()
            .is_some_and(|token| token.variant_eq(Token::Semicolon))
        {
            self.next_token();
        }

        Ok(statement)
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression> {
        let cur_token = self.cur_token().ok_or(anyhow!("no token found"))?;

        let mut left_exp = match cur_token.clone() {
            Token::Ident(value) => Expression::Identifier(value),
            Token::Int(value) => self.parse_integer_literal(value)?,
            Token::String(value) => Expression::StringLiteral(value),
            Token::True | Token::False => self.parse_boolean_literal(cur_token)?,
            Token::Bang | Token::Minus => self.parse_prefix_expression(cur_token)?,
            Token::Lparen => self.parse_grouped_expression()?,
            Token::Lbracket => self.parse_array_literal()?,
            Token::If => self.parse_if_expression()?,
            Token::Function => self.parse_function_literal()?,
            token => bail!("no prefix parse function for {token}"),
        };

        while self
            .peek_token()
            .is_some_and(|token| !token.variant_eq(Token::Semicolon))
            && precedence < self.peek_precedence()?
        {
            match self.peek_token().ok_or(anyhow!("no token found"))? {
                Token::Plus
                | Token::Minus
                | Token::Asterisk
                | Token::Slash
                | Token::Eq
                | Token::NotEq
                | Token::Lt
                | Token::Gt => {
                    self.next_token();
                    left_exp = self.parse_infix_expression(left_exp)?;
                }
                Token::Lparen => {
                    self.next_token();
                    left_exp = self.parse_call_expression(left_exp)?;
                }
                Token::Lbracket => {
                    self.next_token();
                    left_exp = self.parse_index_expression(left_exp)?;
                }
                _ => return Ok(left_exp),
            };
        }

        Ok(left_exp)
    }

    fn parse_prefix_expression(&mut self, token: Token) -> Result<Expression> {
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Ok(Expression::Prefix {
            operator: token,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Result<Expression> {
        let token = self.cur_token().ok_or(anyhow!("no token found"))?;
        let precedence = self.cur_precedence()?;
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Ok(Expression::Infix {
            left: Box::new(left),
            operator: token,
            right: Box::new(right),
        })
    }

    fn parse_integer_literal(&mut self, literal: String) -> Result<Expression> {
        let value = literal
            .parse::<i64>()
            .map_err(|err| anyhow!("could not parse integer literal as i64: {err}"))?;
        Ok(Expression::IntegerLiteral(value))
    }

    fn parse_boolean_literal(&mut self, token: Token) -> Result<Expression> {
        let value = match token {
            Token::True => true,
            Token::False => false,
            _ => bail!("no boolean parse function for {token}"),
        };
        Ok(Expression::BooleanLiteral(value))
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression> {
        self.next_token();
        let exp = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::Rparen)?;
        Ok(exp)
    }

    fn parse_if_expression(&mut self) -> Result<Expression> {
        self.expect_peek(Token::Lparen)?;

        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(Token::Rparen)?;

        self.expect_peek(Token::Lbrace)?;

        let consequence = self.parse_block_statement()?;

        let alternative = if self
            .peek_token()
            .is_some_and(|token| token.variant_eq(Token::Else))
        {
            self.next_token();
            self.expect_peek(Token::Lbrace)?;
            Some(Box::new(self.parse_block_statement()?))
        } else {
            None
        };

        Ok(Expression::If {
            condition: Box::new(condition),
            consequence: Box::new(consequence),
            alternative,
        })
    }

    fn parse_array_literal(&mut self) -> Result<Expression> {
        let elements = self.parse_expression_list(Token::Rbracket)?;

        Ok(Expression::ArrayLiteral(elements))
    }

    fn parse_function_literal(&mut self) -> Result<Expression> {
        self.expect_peek(Token::Lparen)?;

        let parameters = self.parse_function_parameters()?;

        self.expect_peek(Token::Lbrace)?;

        let body = self.parse_block_statement()?;

        Ok(Expression::FunctionLiteral {
            parameters,
            body: Box::new(body),
        })
    }

    // A parameter list is identifiers only; an empty list parses to an
    // empty vec.
    fn parse_function_parameters(&mut self) -> Result<Vec<Expression>> {
        let mut parameters: Vec<Expression> = Vec::new();

        if self
            .peek_token()
            .is_some_and(|token| token.variant_eq(Token::Rparen))
        {
            self.next_token();
            return Ok(parameters);
        }

        self.next_token();

        parameters.push(self.parse_function_parameter()?);

        while self
            .peek_token()
            .is_some_and(|token| token.variant_eq(Token::Comma))
        {
            self.next_token();
            self.next_token();
            parameters.push(self.parse_function_parameter()?);
        }

        self.expect_peek(Token::Rparen)?;

        Ok(parameters)
    }

    fn parse_function_parameter(&mut self) -> Result<Expression> {
        match self.cur_token().ok_or(anyhow!("no token found"))? {
            Token::Ident(value) => Ok(Expression::Identifier(value)),
            token => bail!("expected identifier, found {token}"),
        }
    }

    fn parse_expression_list(&mut self, end_token: Token) -> Result<Vec<Expression>> {
        let mut expressions: Vec<Expression> = Vec::new();

        if self
            .peek_token()
            .is_some_and(|token| token.variant_eq(end_token.clone()))
        {
            self.next_token();
            return Ok(expressions);
        }

        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;
        expressions.push(expression);

        while self
            .peek_token()
            .is_some_and(|token| token.variant_eq(Token::Comma))
        {
            self.next_token();
            self.next_token();
            let expression = self.parse_expression(Precedence::Lowest)?;
            expressions.push(expression);
        }

        self.expect_peek(end_token)?;

        Ok(expressions)
    }

    fn parse_block_statement(&mut self) -> Result<Statement> {
        self.next_token();

        let mut statements: Vec<Statement> = Vec::new();

        while self
            .cur_token()
            .is_some_and(|token| !token.variant_eq(Token::Rbrace))
        {
            let statement = self.parse_statement()?;
            statements.push(statement);
            self.next_token();
        }

        Ok(Statement::Block(statements))
    }

    fn parse_call_expression(&mut self, function: Expression) -> Result<Expression> {
        let arguments = self.parse_expression_list(Token::Rparen)?;
        Ok(Expression::Call {
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Result<Expression> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::Rbracket)?;
        Ok(Expression::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }
}

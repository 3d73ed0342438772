use std::{cell::RefCell, mem, rc::Rc};

use anyhow::{anyhow, bail, Result};

use crate::{
    ast::{Expression, Program, Statement},
    token::Token,
};

use super::{builtins::Builtins, environment::Environment, object::Object};

const TRUE: Object = Object::Boolean(true);
const FALSE: Object = Object::Boolean(false);
const NULL: Object = Object::Null;

// Calls past this depth error out instead of exhausting the host stack.
const MAX_CALL_DEPTH: usize = 512;

pub struct Evaluator {
    env: Rc<RefCell<Environment>>,
    depth: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            env: Rc::new(RefCell::new(Environment::new())),
            depth: 0,
        }
    }

    pub fn eval(&mut self, program: Program) -> Result<Object> {
        let mut result = Object::Null;
        for statement in program.statements {
            result = match self.eval_statement(Box::new(statement))? {
                Object::ReturnValue(value) => return Ok(*value),
                object => object,
            };
        }
        Ok(result)
    }

    fn eval_statement(&mut self, statement: Box<Statement>) -> Result<Object> {
        let object = match *statement {
            Statement::Expression(expression) => self.eval_expression(Box::new(expression))?,
            Statement::Block(statements) => self.eval_block_statement(statements)?,
            Statement::Return(expression) => {
                let value = self.eval_expression(Box::new(expression))?;
                return Ok(Object::ReturnValue(Box::new(value)));
            }
            Statement::Let { name, value } => {
                self.eval_let_statement(Box::new(value), Box::new(name))?
            }
        };
        Ok(object)
    }

    fn eval_let_statement(
        &mut self,
        value: Box<Expression>,
        name: Box<Expression>,
    ) -> Result<Object> {
        let value = self.eval_expression(value)?;
        let str_name = match *name {
            Expression::Identifier(name) => name,
            _ => bail!("{} not implemented", name),
        };
        self.env.borrow_mut().set(&str_name, value);
        Ok(Object::Null)
    }

    // A return propagates through enclosing blocks unwrapped; only the
    // program and function-call boundaries unwrap it.
    fn eval_block_statement(&mut self, statements: Vec<Statement>) -> Result<Object> {
        let mut result = Object::Null;
        for statement in statements {
            result = self.eval_statement(Box::new(statement))?;
            if let Object::ReturnValue(_) = result {
                return Ok(result);
            }
        }
        Ok(result)
    }

    fn eval_expression(&mut self, expression: Box<Expression>) -> Result<Object> {
        let object = match *expression {
            Expression::IntegerLiteral(value) => Object::Integer(value),
            Expression::StringLiteral(value) => Object::String(value),
            Expression::BooleanLiteral(value) => self.native_bool_to_boolean_object(value),
            Expression::Prefix { operator, right } => {
                let right = self.eval_expression(right)?;
                self.eval_prefix_expression(operator, right)?
            }
            Expression::Infix {
                left,
                operator,
                right,
            } => {
                let left = self.eval_expression(left)?;
                let right = self.eval_expression(right)?;
                self.eval_infix_expression(left, operator, right)?
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => self.eval_if_expression(condition, consequence, alternative)?,
            Expression::Identifier(name) => self.eval_identifier_expression(name)?,
            Expression::FunctionLiteral { parameters, body } => {
                self.eval_function_literal(parameters, body)?
            }
            Expression::Call {
                function,
                arguments,
            } => self.eval_call_function(function, arguments)?,
            Expression::ArrayLiteral(elements) => self.eval_array_literal(elements)?,
            Expression::Index { left, index } => self.eval_index(left, index)?,
        };
        Ok(object)
    }

    fn eval_array_literal(&mut self, elements: Vec<Expression>) -> Result<Object> {
        let elements = elements
            .into_iter()
            .map(|e| self.eval_expression(Box::new(e)))
            .collect::<Result<Vec<Object>>>()?;
        Ok(Object::Array(elements))
    }

    fn eval_index(&mut self, left: Box<Expression>, index: Box<Expression>) -> Result<Object> {
        let left = self.eval_expression(left)?;
        let index = self.eval_expression(index)?;
        match (&left, &index) {
            (Object::Array(elements), Object::Integer(index)) => {
                // negative indexes wrap to out-of-range and fall through
                match elements.get(*index as usize) {
                    Some(element) => Ok(element.clone()),
                    None => Ok(NULL),
                }
            }
            _ => Err(anyhow!(
                "index operator not supported: {}",
                left.type_name()
            )),
        }
    }

    fn eval_function_literal(
        &mut self,
        parameters: Vec<Expression>,
        body: Box<Statement>,
    ) -> Result<Object> {
        Ok(Object::Function {
            parameters: parameters
                .into_iter()
                .map(|p| match p {
                    Expression::Identifier(name) => Ok(name),
                    _ => Err(anyhow!("{} not implemented", p)),
                })
                .collect::<Result<Vec<String>>>()?,
            body,
            env: self.env.clone(),
        })
    }

    fn eval_call_function(
        &mut self,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    ) -> Result<Object> {
        let function = self.eval_expression(function)?;
        let args = arguments
            .into_iter()
            .map(|arg| self.eval_expression(Box::new(arg)))
            .collect::<Result<Vec<Object>>>()?;
        match function {
            Object::Function {
                parameters,
                body,
                env,
            } => {
                if self.depth >= MAX_CALL_DEPTH {
                    bail!("maximum recursion depth exceeded");
                }
                // parameters bind positionally, surplus arguments are
                // dropped, missing ones are simply left unbound
                let mut call_env = Environment::new_enclosed(env);
                parameters.into_iter().zip(args).for_each(|(param, arg)| {
                    call_env.set(&param, arg);
                });
                let old_env = self.env.clone();
                self.env = Rc::new(RefCell::new(call_env));
                self.depth += 1;
                let result = self.eval_statement(body);
                self.depth -= 1;
                self.env = old_env;
                match result? {
                    Object::ReturnValue(value) => Ok(*value),
                    object => Ok(object),
                }
            }
            Object::BuiltInFunction(function) => function(args),
            other => Err(anyhow!("not a function: {}", other.type_name())),
        }
    }

    fn eval_prefix_expression(&mut self, operator: Token, right: Object) -> Result<Object> {
        match operator {
            Token::Bang => self.eval_bang_operator_expression(right),
            Token::Minus => self.eval_minus_prefix_operator_expression(right),
            _ => bail!("unknown operator: {}{}", operator, right.type_name()),
        }
    }

    fn eval_bang_operator_expression(&mut self, right: Object) -> Result<Object> {
        match right {
            Object::Boolean(true) => Ok(FALSE),
            Object::Boolean(false) => Ok(TRUE),
            Object::Null => Ok(TRUE),
            _ => Ok(FALSE),
        }
    }

    fn eval_minus_prefix_operator_expression(&mut self, right: Object) -> Result<Object> {
        match right {
            Object::Integer(value) => Ok(Object::Integer(-value)),
            _ => Err(anyhow!("unknown operator: -{}", right.type_name())),
        }
    }

    fn eval_infix_expression(
        &mut self,
        left: Object,
        operator: Token,
        right: Object,
    ) -> Result<Object> {
        match (left, right) {
            (Object::Integer(left), Object::Integer(right)) => {
                self.eval_integer_infix_expression(left, operator, right)
            }
            (Object::Boolean(left), Object::Boolean(right)) => {
                self.eval_boolean_infix_expression(left, operator, right)
            }
            (Object::String(left), Object::String(right)) => {
                self.eval_string_infix_expression(left, operator, right)
            }
            (Object::Null, Object::Null) => self.eval_null_infix_expression(operator),
            (left, right) => {
                if mem::discriminant(&left) == mem::discriminant(&right) {
                    Err(anyhow!(
                        "unknown operator: {} {} {}",
                        left.type_name(),
                        operator,
                        right.type_name()
                    ))
                } else {
                    Err(anyhow!(
                        "type mismatch: {} {} {}",
                        left.type_name(),
                        operator,
                        right.type_name()
                    ))
                }
            }
        }
    }

    fn eval_integer_infix_expression(
        &mut self,
        left: i64,
        operator: Token,
        right: i64,
    ) -> Result<Object> {
        match operator {
            Token::Plus => Ok(Object::Integer(left + right)),
            Token::Minus => Ok(Object::Integer(left - right)),
            Token::Asterisk => Ok(Object::Integer(left * right)),
            Token::Slash => {
                if right == 0 {
                    bail!("division by zero");
                }
                Ok(Object::Integer(left / right))
            }
            Token::Lt => Ok(self.native_bool_to_boolean_object(left < right)),
            Token::Gt => Ok(self.native_bool_to_boolean_object(left > right)),
            Token::Eq => Ok(self.native_bool_to_boolean_object(left == right)),
            Token::NotEq => Ok(self.native_bool_to_boolean_object(left != right)),
            _ => Err(anyhow!("unknown operator: INTEGER {} INTEGER", operator)),
        }
    }

    fn eval_boolean_infix_expression(
        &mut self,
        left: bool,
        operator: Token,
        right: bool,
    ) -> Result<Object> {
        match operator {
            Token::Eq => Ok(self.native_bool_to_boolean_object(left == right)),
            Token::NotEq => Ok(self.native_bool_to_boolean_object(left != right)),
            _ => Err(anyhow!("unknown operator: BOOLEAN {} BOOLEAN", operator)),
        }
    }

    fn eval_string_infix_expression(
        &mut self,
        left: String,
        operator: Token,
        right: String,
    ) -> Result<Object> {
        match operator {
            Token::Plus => Ok(Object::String(format!("{}{}", left, right))),
            Token::Eq => Ok(self.native_bool_to_boolean_object(left == right)),
            Token::NotEq => Ok(self.native_bool_to_boolean_object(left != right)),
            _ => Err(anyhow!("unknown operator: STRING {} STRING", operator)),
        }
    }

    fn eval_null_infix_expression(&mut self, operator: Token) -> Result<Object> {
        match operator {
            Token::Eq => Ok(TRUE),
            Token::NotEq => Ok(FALSE),
            _ => Err(anyhow!("unknown operator: NULL {} NULL", operator)),
        }
    }

    fn native_bool_to_boolean_object(&mut self, input: bool) -> Object {
        if input {
            TRUE
        } else {
            FALSE
        }
    }

    fn eval_if_expression(
        &mut self,
        condition: Box<Expression>,
        consequence: Box<Statement>,
        alternative: Option<Box<Statement>>,
    ) -> Result<Object> {
        let condition = self.eval_expression(condition)?;
        if self.is_truthy(condition) {
            self.eval_statement(consequence)
        } else if let Some(alternative) = alternative {
            self.eval_statement(alternative)
        } else {
            Ok(NULL)
        }
    }

    fn is_truthy(&mut self, object: Object) -> bool {
        match object {
            Object::Null => false,
            Object::Boolean(value) => value,
            _ => true,
        }
    }

    fn eval_identifier_expression(&mut self, name: String) -> Result<Object> {
        match self.env.borrow().get(&name) {
            Some(value) => Ok(value),
            None => match Builtins::lookup(&name) {
                Some(builtin) => Ok(builtin),
                None => Err(anyhow!("identifier not found: {}", name)),
            },
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

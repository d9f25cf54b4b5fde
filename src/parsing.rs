use crate::error_handling::*;
use crate::value::Value;

use std::str::FromStr;

use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    addition,
    subtraction,
    multiplication,
    division,
    exponentiation,
}

impl BinaryOperator {
    pub fn call(&self, left: Value, right: Value) -> Value {
        use BinaryOperator::*;

        match self {
            addition => left + right,
            subtraction => left - right,
            multiplication => left * right,
            division => left / right,
            exponentiation => left.pow(right),
        }
    }

    fn precedence(&self) -> i32 {
        use BinaryOperator::*;
        match self {
            addition | subtraction => 1,
            multiplication | division => 2,
            exponentiation => 3,
        }
    }
}

impl FromStr for BinaryOperator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        use BinaryOperator::*;
        match s {
            "+" => Ok(addition),
            "-" => Ok(subtraction),
            "*" => Ok(multiplication),
            "/" => Ok(division),
            "^" => Ok(exponentiation),
            _ => Err(CalcError::invalid_character(s.into())),
        }
    }
}

/// Operand and pending-operator stacks for an expression read from right to
/// left. The top of `operands` is always the leftmost operand seen so far.
///
/// Before an operator is pushed, every pending operator that binds strictly
/// tighter is applied; `finish` then folds the rest from the left. Together
/// this gives the usual precedence with left associativity for all five
/// operators, `^` included.
#[derive(Debug, Default)]
pub struct Yard {
    operands: Vec<Value>,
    operators: Vec<BinaryOperator>,
}

impl Yard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_operand(&mut self, value: Value) {
        self.operands.push(value);
        trace!(operands = ?self.operands, operators = ?self.operators, "operand");
    }

    fn is_balanced(&self) -> bool {
        self.operands.len() == self.operators.len() + 1
    }

    fn pop_higher_operator(&mut self, precedence: i32) -> Option<BinaryOperator> {
        if self.operators.last().filter(|operator| operator.precedence() > precedence).is_some() {
            self.operators.pop()
        } else {
            None
        }
    }

    fn apply(&mut self, operator: BinaryOperator) -> Result<()> {
        let left = self.operands.pop().ok_or(CalcError::invalid_expression)?;
        let right = self.operands.pop().ok_or(CalcError::invalid_expression)?;
        self.operands.push(operator.call(left, right));
        Ok(())
    }

    pub fn add_operator(&mut self, operator: BinaryOperator) -> Result<()> {
        if !self.is_balanced() {
            return Err(CalcError::invalid_expression);
        }

        let precedence = operator.precedence();
        while let Some(pending) = self.pop_higher_operator(precedence) {
            self.apply(pending)?;
        }
        self.operators.push(operator);
        trace!(operands = ?self.operands, operators = ?self.operators, "operator");
        Ok(())
    }

    /// Applies a sign to the operand pushed last.
    pub fn negate_operand(&mut self) -> Result<()> {
        if !self.is_balanced() {
            return Err(CalcError::invalid_expression);
        }
        let operand = self.operands.pop().ok_or(CalcError::invalid_expression)?;
        self.operands.push(-operand);
        Ok(())
    }

    pub fn finish(mut self) -> Result<Value> {
        if !self.is_balanced() {
            return Err(CalcError::invalid_expression);
        }
        while let Some(operator) = self.operators.pop() {
            self.apply(operator)?;
        }
        match (self.operands.pop(), self.operands.is_empty()) {
            (Some(value), true) => Ok(value),
            _ => Err(CalcError::invalid_expression),
        }
    }
}

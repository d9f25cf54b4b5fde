use crate::environment::*;
use crate::error_handling::*;
use crate::parsing::*;
use crate::scanning::*;
use crate::value::Value;

use tracing::debug;

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Computes the value of grouped blocks, recursing into every bracket pair.
pub struct Evaluator<'a> {
    source: &'a str,
    blocks: &'a [Block],
    environment: &'a Environment,
    max_depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(source: &'a str, blocks: &'a [Block], environment: &'a Environment) -> Self {
        Self {
            source,
            blocks,
            environment,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Value of the whole expression. Failures come back as an invalid value.
    pub fn evaluate(&self) -> Value {
        self.calculate(0, self.blocks.len(), 0).unwrap_or_else(|error| {
            debug!(source = self.source, %error, "evaluation failed");
            Value::invalid(error)
        })
    }

    fn text(&self, index: usize) -> &'a str {
        self.blocks[index].text(self.source)
    }

    fn kind(&self, index: usize) -> BlockType {
        self.blocks[index].kind
    }

    fn is_minus(&self, index: usize) -> bool {
        self.kind(index) == BlockType::operator && self.text(index) == "-"
    }

    /// A `-` is a sign when nothing but an operator stands before it within
    /// the range. Signs only go in front of numbers and bracketed groups, and
    /// bind to that operand alone, except for a leading sign before a bracket
    /// which `calculate` applies to the rest of the range.
    fn is_sign(&self, index: usize, start: usize) -> bool {
        self.is_minus(index) && (index == start || self.kind(index - 1) == BlockType::operator)
    }

    fn check_sign(&self, index: usize, end: usize) -> Result<()> {
        match (index + 1 < end).then(|| self.kind(index + 1)) {
            Some(BlockType::number | BlockType::left_bracket) => Ok(()),
            _ => Err(CalcError::invalid_expression),
        }
    }

    /// Index of the `(` matching the `)` at `closing`: the block right after
    /// the nearest block to the left at one level lower.
    fn find_opening_bracket(&self, closing: usize, start: usize) -> Result<usize> {
        let outer_level = self.blocks[closing].level - 1;
        let mut index = closing;
        while index > start && self.blocks[index - 1].level != outer_level {
            index -= 1;
        }
        if self.kind(index) == BlockType::left_bracket {
            Ok(index)
        } else {
            Err(CalcError::unpaired_brackets)
        }
    }

    fn lookup_constant(&self, name: &str) -> Result<Value> {
        let value = self
            .environment
            .constant(name)
            .ok_or_else(|| CalcError::undefined(name.into()))?;
        if name == ANS && !value.is_calculable() {
            return Err(CalcError::ans_undefined);
        }
        Ok(value.clone())
    }

    fn lookup_variable(&self, name: &str) -> Result<Value> {
        self.environment
            .variable(name)
            .cloned()
            .ok_or_else(|| CalcError::undefined(name.into()))
    }

    /// Value of blocks `start..end`, read from right to left.
    fn calculate(&self, start: usize, end: usize, depth: usize) -> Result<Value> {
        if start >= end {
            return Err(CalcError::invalid_expression);
        }
        if depth > self.max_depth {
            return Err(CalcError::nesting_too_deep(self.max_depth));
        }
        if self.is_minus(start) {
            self.check_sign(start, end)?;
            // A leading sign before a bracket negates the whole remainder.
            if self.kind(start + 1) == BlockType::left_bracket {
                return Ok(-self.calculate(start + 1, end, depth)?);
            }
        }

        let mut yard = Yard::new();
        let mut index = end;

        while index > start {
            index -= 1;
            let text = self.text(index);

            match self.kind(index) {
                BlockType::number => yard.add_operand(Value::from_literal(text)),

                BlockType::function => return Err(CalcError::function_needs_brackets(text.into())),

                BlockType::constant => yard.add_operand(self.lookup_constant(text)?),

                BlockType::variable => yard.add_operand(self.lookup_variable(text)?),

                BlockType::right_bracket => {
                    let opening = self.find_opening_bracket(index, start)?;
                    let inner = self.calculate(opening + 1, index, depth + 1)?;

                    if opening > start && self.kind(opening - 1) == BlockType::function {
                        let name = self.text(opening - 1);
                        let function = self
                            .environment
                            .function(name)
                            .ok_or_else(|| CalcError::undefined(name.into()))?;
                        let result = match inner.to_f64() {
                            Some(argument) => Value::from_f64((function.action)(argument)),
                            None => inner,
                        };
                        yard.add_operand(result);
                        index = opening - 1;
                    } else {
                        yard.add_operand(inner);
                        index = opening;
                    }
                }

                BlockType::operator if self.is_sign(index, start) => {
                    self.check_sign(index, end)?;
                    yard.negate_operand()?;
                }

                BlockType::operator => yard.add_operator(text.parse()?)?,

                BlockType::unresolved => return Err(CalcError::undefined(text.into())),

                BlockType::left_bracket => return Err(CalcError::unpaired_brackets),

                BlockType::none => return Err(CalcError::invalid_character(text.into())),
            }
        }

        yard.finish()
    }
}

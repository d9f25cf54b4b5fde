use crate::environment::*;
use crate::error_handling::*;

use std::iter;

use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockType {
    number,
    operator,
    function,
    constant,
    variable,
    left_bracket,
    right_bracket,
    unresolved,
    none,
}

/// A classified span `start..end` of the source text. `level` is the bracket
/// depth at that span; a bracket pair shares the level of its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
    pub level: isize,
    pub kind: BlockType,
}

impl Block {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharKind {
    letter,
    digit,
    left_bracket,
    right_bracket,
    operator,
    other,
}

fn is_operator(character: char) -> bool {
    matches!(character, '+' | '-' | '*' | '/' | '^')
}

fn is_letter(character: char) -> bool {
    character.is_ascii_alphabetic() || character == '_'
}

fn is_digit_or_dot(character: char) -> bool {
    character.is_ascii_digit() || character == '.'
}

impl CharKind {
    fn of(character: char) -> Self {
        use CharKind::*;
        match character {
            '(' => left_bracket,
            ')' => right_bracket,
            c if is_operator(c) => operator,
            c if is_letter(c) => letter,
            c if is_digit_or_dot(c) => digit,
            _ => other,
        }
    }

    /// Brackets and operators never merge with what follows them.
    fn is_single(self) -> bool {
        matches!(self, Self::left_bracket | Self::right_bracket | Self::operator)
    }
}

fn resolve(name: &str, environment: &Environment) -> BlockType {
    match environment.classify(name) {
        Ok(Symbol::function) => BlockType::function,
        Ok(Symbol::constant) => BlockType::constant,
        Ok(Symbol::variable) => BlockType::variable,
        Err(_) => BlockType::unresolved,
    }
}

/// Partitions a space-free expression into blocks.
///
/// Runs of one character kind form a block, except that digits after a
/// letter extend the identifier (`log10`, `x2`). Identifiers are resolved
/// against `environment` as soon as their run closes.
pub fn group(source: &str, environment: &Environment) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut level: isize = 0;
    let mut current: Option<CharKind> = None;

    let positions = source
        .char_indices()
        .map(|(index, character)| (index, Some(CharKind::of(character))))
        .chain(iter::once((source.len(), None)));

    for (index, kind) in positions {
        if let Some(run) = current {
            let continues_identifier = run == CharKind::letter && kind == Some(CharKind::digit);
            let boundary = kind.is_none() || run.is_single() || kind != Some(run);

            if boundary && !continues_identifier {
                let block_type = match run {
                    CharKind::letter => resolve(&source[start..index], environment),
                    CharKind::digit => BlockType::number,
                    CharKind::operator => BlockType::operator,
                    CharKind::left_bracket => BlockType::left_bracket,
                    CharKind::right_bracket => BlockType::right_bracket,
                    CharKind::other => BlockType::none,
                };
                blocks.push(Block {
                    start,
                    end: index,
                    level,
                    kind: block_type,
                });

                if run == CharKind::right_bracket {
                    level -= 1;
                    if level < 0 {
                        return Err(CalcError::unpaired_brackets);
                    }
                }

                current = kind;
                start = index;
            }
        } else {
            current = kind;
            start = index;
        }

        if kind == Some(CharKind::left_bracket) {
            level += 1;
        }
    }

    debug!(source, blocks = blocks.len(), "grouped expression");

    if level != 0 {
        return Err(CalcError::unpaired_brackets);
    }
    Ok(blocks)
}

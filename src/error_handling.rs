use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("brackets are not paired")]
    unpaired_brackets,

    #[error("brackets are nested deeper than {0} levels")]
    nesting_too_deep(usize),

    #[error("too many '='")]
    too_many_equals,

    #[error("'{0}' is not a valid variable name")]
    invalid_variable_name(String),

    #[error("function '{0}' needs brackets after its name")]
    function_needs_brackets(String),

    #[error("invalid expression")]
    invalid_expression,

    #[error("invalid character, '{0}', encountered")]
    invalid_character(String),

    #[error("identifier, '{0}', is not defined")]
    undefined(String),

    #[error("\"ans\" is not defined currently")]
    ans_undefined,

    #[error("constant '{0}' cannot be declared")]
    constant_redeclared(String),

    #[error("denominator is zero")]
    zero_denominator,

    #[error("'{0}' is too large")]
    number_too_large(String),

    #[error("'{0}' is not a valid number")]
    invalid_number(String),

    #[error("can't raise a negative number to a non-integer power")]
    negative_base,

    #[error("result does not fit in an exact fraction")]
    overflow,

    #[error("result is not a finite number")]
    not_finite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    syntax,
    arithmetic,
    semantic,
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        use CalcError::*;
        match self {
            unpaired_brackets
            | nesting_too_deep(_)
            | too_many_equals
            | invalid_variable_name(_)
            | function_needs_brackets(_)
            | invalid_expression
            | invalid_character(_) => ErrorKind::syntax,

            zero_denominator
            | number_too_large(_)
            | invalid_number(_)
            | negative_base
            | overflow
            | not_finite => ErrorKind::arithmetic,

            undefined(_) | ans_undefined | constant_redeclared(_) => ErrorKind::semantic,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

use crate::error_handling::*;

/// An input line split at its `=`: `name` is set for declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub name: Option<&'a str>,
    pub body: &'a str,
}

fn is_valid_name(name: &str) -> bool {
    let mut characters = name.chars();
    match characters.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            characters.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Splits `name=expression` input. Text without `=` is a plain expression.
pub fn split_declaration(line: &str) -> Result<Declaration<'_>> {
    let Some((name, body)) = line.split_once('=') else {
        return Ok(Declaration { name: None, body: line });
    };

    if body.contains('=') {
        return Err(CalcError::too_many_equals);
    }
    if !is_valid_name(name) {
        return Err(CalcError::invalid_variable_name(name.into()));
    }
    Ok(Declaration {
        name: Some(name),
        body,
    })
}

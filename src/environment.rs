use crate::error_handling::*;
use crate::value::Value;

use std::collections::HashMap;

use tracing::{debug, trace};

/// Name of the constant slot holding the last plain calculation.
pub const ANS: &str = "ans";

#[derive(Clone, Debug)]
pub struct Function {
    pub name: String,
    pub action: fn(f64) -> f64,
}

#[derive(Clone, Debug)]
pub struct Constant {
    pub name: String,
    pub value: Value,
}

/// What an identifier turned out to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    function,
    constant,
    variable,
}

/// The name tables an expression is evaluated against. Names are unique
/// within a table; across tables the first match in the order functions,
/// constants, variables wins.
#[derive(Clone, Debug)]
pub struct Environment {
    functions: Vec<Function>,
    constants: Vec<Constant>,
    variables: HashMap<String, Value>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Tables with the predefined constants and functions.
    pub fn new() -> Self {
        let mut environment = Self::empty();

        environment.define_constant("e", Value::approximate(std::f64::consts::E));
        environment.define_constant("pi", Value::approximate(std::f64::consts::PI));
        environment.define_constant(ANS, Value::invalid(CalcError::ans_undefined));

        environment.define_function("sin", f64::sin);
        environment.define_function("cos", f64::cos);
        environment.define_function("tan", f64::tan);
        environment.define_function("exp", f64::exp);
        environment.define_function("sqrt", f64::sqrt);
        environment.define_function("floor", f64::floor);
        environment.define_function("ln", f64::ln);
        environment.define_function("log", f64::log10);
        environment
    }

    pub fn empty() -> Self {
        Self {
            functions: Vec::new(),
            constants: Vec::new(),
            variables: HashMap::new(),
        }
    }

    pub fn define_function(&mut self, name: &str, action: fn(f64) -> f64) {
        match self.functions.iter_mut().find(|function| function.name == name) {
            Some(function) => function.action = action,
            None => self.functions.push(Function { name: name.into(), action }),
        }
    }

    pub fn define_constant(&mut self, name: &str, value: Value) {
        match self.constants.iter_mut().find(|constant| constant.name == name) {
            Some(constant) => constant.value = value,
            None => self.constants.push(Constant { name: name.into(), value }),
        }
    }

    pub fn classify(&self, name: &str) -> Result<Symbol> {
        let symbol = if self.function(name).is_some() {
            Symbol::function
        } else if self.constant(name).is_some() {
            Symbol::constant
        } else if self.variable(name).is_some() {
            Symbol::variable
        } else {
            trace!(name, "identifier not recognized");
            return Err(CalcError::undefined(name.into()));
        };
        Ok(symbol)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants
            .iter()
            .find(|constant| constant.name == name)
            .map(|constant| &constant.value)
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn ans(&self) -> Option<&Value> {
        self.constant(ANS).filter(|value| value.is_calculable())
    }

    pub fn set_ans(&mut self, value: Value) {
        self.define_constant(ANS, value);
    }

    /// Binds `name` to `value`, replacing an earlier binding. Constant names
    /// can't be declared.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<()> {
        if self.constant(name).is_some() {
            return Err(CalcError::constant_redeclared(name.into()));
        }
        if self.function(name).is_some() {
            debug!(name, "variable is shadowed by a function of the same name");
        }
        self.variables.insert(name.into(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_order_is_function_constant_variable() {
        let mut environment = Environment::new();
        assert_eq!(environment.classify("sqrt"), Ok(Symbol::function));
        assert_eq!(environment.classify("pi"), Ok(Symbol::constant));
        assert_eq!(environment.classify("ans"), Ok(Symbol::constant));

        environment.declare("x", Value::integer(1)).unwrap();
        assert_eq!(environment.classify("x"), Ok(Symbol::variable));

        environment.declare("sin", Value::integer(1)).unwrap();
        assert_eq!(environment.classify("sin"), Ok(Symbol::function));
    }

    #[test]
    fn variable_named_like_a_function_is_kept_but_shadowed() {
        let mut environment = Environment::new();
        assert_eq!(environment.declare("sqrt", Value::integer(3)), Ok(()));
        assert_eq!(environment.variable("sqrt"), Some(&Value::integer(3)));
        assert_eq!(environment.classify("sqrt"), Ok(Symbol::function));
    }

    #[test]
    fn unknown_names_are_undefined() {
        let environment = Environment::new();
        assert_eq!(
            environment.classify("foo"),
            Err(CalcError::undefined("foo".into()))
        );
        assert_eq!(
            Environment::empty().classify("pi"),
            Err(CalcError::undefined("pi".into()))
        );
    }

    #[test]
    fn redeclaring_overwrites() {
        let mut environment = Environment::empty();
        environment.declare("x", Value::integer(5)).unwrap();
        environment.declare("x", Value::integer(7)).unwrap();
        assert_eq!(environment.variable("x"), Some(&Value::integer(7)));
        assert_eq!(environment.variables().count(), 1);
    }

    #[test]
    fn constants_cannot_be_declared() {
        let mut environment = Environment::new();
        assert_eq!(
            environment.declare("e", Value::integer(1)),
            Err(CalcError::constant_redeclared("e".into()))
        );
        assert!(environment.variable("e").is_none());
    }

    #[test]
    fn ans_starts_undefined() {
        let mut environment = Environment::new();
        assert!(environment.ans().is_none());
        environment.set_ans(Value::fraction(2, 3));
        assert_eq!(environment.ans(), Some(&Value::fraction(2, 3)));
    }
}

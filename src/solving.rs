use crate::declaring::*;
use crate::environment::Environment;
use crate::error_handling::*;
use crate::evaluating::{Evaluator, DEFAULT_MAX_DEPTH};
use crate::scanning::group;
use crate::value::Value;

use std::fmt;

use tracing::{debug, info};

/// What `solve` prints for any failed line.
pub const ABORTED: &str = "Calculation aborted. ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Deepest bracket nesting an expression may use.
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    answer(Value),
    declaration { name: String, value: Value },
}

impl Outcome {
    pub fn value(&self) -> &Value {
        match self {
            Self::answer(value) | Self::declaration { value, .. } => value,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::answer(value) => write!(f, "Ans = {value}"),
            Self::declaration { name, value } => write!(f, "{name} = {value}"),
        }
    }
}

fn discard_spaces(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// One calculator session: its name tables live as long as the solver.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    environment: Environment,
    settings: Settings,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            environment: Environment::new(),
            settings,
        }
    }

    pub fn with_environment(environment: Environment, settings: Settings) -> Self {
        Self {
            environment,
            settings,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Value of an expression, leaving the session untouched.
    pub fn evaluate(&self, expression: &str) -> Value {
        let expression = discard_spaces(expression);
        match group(&expression, &self.environment) {
            Ok(blocks) => Evaluator::new(&expression, &blocks, &self.environment)
                .with_max_depth(self.settings.max_depth)
                .evaluate(),
            Err(error) => Value::invalid(error),
        }
    }

    /// Solves one input line. A plain expression updates `ans`, a declaration
    /// binds its variable; on error nothing changes.
    pub fn solve_checked(&mut self, line: &str) -> Result<Outcome> {
        let line = discard_spaces(line);
        debug!(line = line.as_str(), "solving");

        let declaration = split_declaration(&line)?;
        let value = self.evaluate(declaration.body).into_result()?;

        match declaration.name {
            Some(name) => {
                self.environment.declare(name, value.clone())?;
                info!(name, %value, "declared variable");
                Ok(Outcome::declaration {
                    name: name.into(),
                    value,
                })
            }
            None => {
                self.environment.set_ans(value.clone());
                Ok(Outcome::answer(value))
            }
        }
    }

    /// Like `solve_checked`, rendered the way the prompt prints it.
    pub fn solve(&mut self, line: &str) -> String {
        match self.solve_checked(line) {
            Ok(outcome) => outcome.to_string(),
            Err(error) => {
                debug!(%error, "calculation aborted");
                ABORTED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_calculation_updates_ans() {
        let mut solver = Solver::new();
        assert_eq!(solver.solve("1/2 + 1/4"), "Ans = 3/4");
        assert_eq!(solver.environment().ans(), Some(&Value::fraction(3, 4)));
        assert_eq!(solver.solve("ans * 4"), "Ans = 3");
    }

    #[test]
    fn declaration_does_not_touch_ans() {
        let mut solver = Solver::new();
        assert_eq!(
            solver.solve_checked("x = 2"),
            Ok(Outcome::declaration {
                name: "x".into(),
                value: Value::integer(2)
            })
        );
        assert!(solver.environment().ans().is_none());
    }

    #[test]
    fn failures_leave_the_session_alone() {
        let mut solver = Solver::new();
        solver.solve("x = 1");
        solver.solve("5");

        assert_eq!(solver.solve_checked("x = 1/0"), Err(CalcError::zero_denominator));
        assert_eq!(solver.solve_checked("(1"), Err(CalcError::unpaired_brackets));
        assert_eq!(
            solver.solve_checked("pi = 3"),
            Err(CalcError::constant_redeclared("pi".into()))
        );

        assert_eq!(solver.environment().variable("x"), Some(&Value::integer(1)));
        assert_eq!(solver.environment().ans(), Some(&Value::integer(5)));
        assert!(solver.environment().variable("pi").is_none());
    }

    #[test]
    fn declaration_errors_come_before_evaluation() {
        let mut solver = Solver::new();
        assert_eq!(solver.solve_checked("x=1=2"), Err(CalcError::too_many_equals));
        assert_eq!(
            solver.solve_checked("1x=2"),
            Err(CalcError::invalid_variable_name("1x".into()))
        );
        assert_eq!(solver.solve("=2"), ABORTED);
    }

    #[test]
    fn evaluate_is_read_only() {
        let solver = Solver::new();
        assert_eq!(solver.evaluate("2^10"), Value::integer(1024));
        assert!(solver.environment().ans().is_none());
    }

    #[test]
    fn custom_environment() {
        let mut environment = Environment::empty();
        environment.define_function("double", |x| x * 2.0);
        let mut solver = Solver::with_environment(environment, Settings::default());
        assert_eq!(solver.solve("double(1.5)"), "Ans = 3");
        assert_eq!(solver.solve("ans + 1"), "Ans = 4");
        assert_eq!(solver.solve_checked("pi"), Err(CalcError::undefined("pi".into())));
    }

    #[test]
    fn depth_setting_is_honoured() {
        let mut solver = Solver::with_settings(Settings { max_depth: 1 });
        assert_eq!(solver.settings().max_depth, 1);
        assert_eq!(Solver::new().settings(), &Settings::default());
        assert_eq!(solver.solve("(1)"), "Ans = 1");
        assert_eq!(
            solver.solve_checked("((1))"),
            Err(CalcError::nesting_too_deep(1))
        );
    }
}

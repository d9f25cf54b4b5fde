#![allow(nonstandard_style)]

pub mod declaring;
pub mod environment;
pub mod error_handling;
pub mod evaluating;
pub mod parsing;
pub mod scanning;
pub mod solving;
pub mod value;

pub use environment::Environment;
pub use error_handling::{CalcError, ErrorKind, Result};
pub use solving::{Outcome, Settings, Solver, ABORTED};
pub use value::{Fraction, Value};

use crate::error_handling::*;

use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, One, Zero};

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

pub type Fraction = Ratio<i64>;

/// Literals whose integer part has this many digits are rejected.
const MAX_INTEGER_DIGITS: usize = 10;

/// Longest fractional part a literal may have and still be read exactly.
const MAX_EXACT_DECIMALS: usize = 5;

const DISPLAY_DECIMALS: usize = 6;

/// A number that is either an exact reduced fraction or a floating point
/// approximation. `invalid` is the "could not be computed" state and carries
/// the first error met on the way; every operator passes it through untouched.
///
/// Once a value is approximate, everything computed from it stays approximate.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    exact(Fraction),
    approximate(f64),
    invalid(CalcError),
}

impl Value {
    pub fn fraction(numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            Self::invalid(CalcError::zero_denominator)
        } else if numerator == i64::MIN || denominator == i64::MIN {
            Self::invalid(CalcError::overflow)
        } else {
            Self::exact(Fraction::new(numerator, denominator))
        }
    }

    pub fn integer(number: i64) -> Self {
        Self::exact(Fraction::from_integer(number))
    }

    /// Reads a number literal, turning a malformed one into an invalid value.
    pub fn from_literal(text: &str) -> Self {
        text.parse().unwrap_or_else(Self::invalid)
    }

    /// Converts the result of a float computation. Results that print with at
    /// most five significant decimals are read back as exact fractions, so
    /// `sqrt(16)` is exactly 4.
    pub fn from_f64(number: f64) -> Self {
        if !number.is_finite() {
            return Self::invalid(CalcError::not_finite);
        }
        let text = format!("{:.*}", DISPLAY_DECIMALS, number.abs());
        match text.parse::<Value>() {
            Ok(value @ Value::exact(_)) if number.is_sign_negative() => -value,
            Ok(value @ Value::exact(_)) => value,
            _ => Self::approximate(number),
        }
    }

    fn approximation(number: f64) -> Self {
        if number.is_finite() {
            Self::approximate(number)
        } else {
            Self::invalid(CalcError::not_finite)
        }
    }

    pub fn is_calculable(&self) -> bool {
        !matches!(self, Self::invalid(_))
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Self::exact(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::exact(fraction) => fraction.is_zero(),
            Self::approximate(number) => *number == 0.0,
            Self::invalid(_) => false,
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::exact(fraction) => Some(*fraction.numer() as f64 / *fraction.denom() as f64),
            Self::approximate(number) => Some(*number),
            Self::invalid(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CalcError> {
        match self {
            Self::invalid(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<Value> {
        match self {
            Self::invalid(error) => Err(error),
            value => Ok(value),
        }
    }

    fn magnitude(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    fn combine(
        self,
        rhs: Value,
        exact_op: fn(&Fraction, &Fraction) -> Option<Fraction>,
        approximate_op: fn(f64, f64) -> f64,
    ) -> Value {
        match (self, rhs) {
            (Self::invalid(error), _) | (_, Self::invalid(error)) => Self::invalid(error),
            (Self::exact(left), Self::exact(right)) => exact_op(&left, &right)
                .map_or(Self::invalid(CalcError::overflow), Self::exact),
            (left, right) => Self::approximation(approximate_op(left.magnitude(), right.magnitude())),
        }
    }

    pub fn pow(self, exponent: Value) -> Value {
        let (base, exponent) = match (self, exponent) {
            (Self::invalid(error), _) | (_, Self::invalid(error)) => return Self::invalid(error),
            pair => pair,
        };

        let (b, e) = (base.magnitude(), exponent.magnitude());
        if b < 0.0 && e.fract() != 0.0 {
            return Self::invalid(CalcError::negative_base);
        }

        match (&base, &exponent) {
            (Self::exact(base), Self::exact(exponent)) if exponent.is_integer() => {
                exact_power(base, *exponent.numer())
            }
            (Self::exact(_), Self::exact(_)) => Self::from_f64(b.powf(e)),
            _ => Self::approximation(b.powf(e)),
        }
    }
}

fn exact_power(base: &Fraction, exponent: i64) -> Value {
    let Ok(times) = usize::try_from(exponent.unsigned_abs()) else {
        return Value::invalid(CalcError::overflow);
    };
    let numerator = num_traits::checked_pow(*base.numer(), times);
    let denominator = num_traits::checked_pow(*base.denom(), times);
    match (numerator, denominator) {
        (Some(numerator), Some(denominator)) if exponent < 0 => Value::fraction(denominator, numerator),
        (Some(numerator), Some(denominator)) => Value::fraction(numerator, denominator),
        _ => Value::invalid(CalcError::overflow),
    }
}

impl FromStr for Value {
    type Err = CalcError;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || CalcError::invalid_number(text.to_string());

        let (integer, decimals) = text.split_once('.').unwrap_or((text, ""));
        if decimals.contains('.') {
            return Err(invalid());
        }
        if integer.is_empty() && decimals.is_empty() {
            return Err(invalid());
        }
        if !integer.bytes().chain(decimals.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if integer.len() >= MAX_INTEGER_DIGITS {
            return Err(CalcError::number_too_large(text.to_string()));
        }

        let whole: i64 = if integer.is_empty() {
            0
        } else {
            integer.parse().map_err(|_| invalid())?
        };

        let decimals = decimals.trim_end_matches('0');
        match decimals.len() {
            0 => Ok(Value::integer(whole)),
            count if count <= MAX_EXACT_DECIMALS => {
                let scale = 10_i64.pow(count as u32);
                let part: i64 = decimals.parse().map_err(|_| invalid())?;
                Value::fraction(whole * scale + part, scale).into_result()
            }
            _ => text.parse::<f64>().map(Value::approximate).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::invalid(_) => Ok(()),
            Self::exact(fraction) if fraction.denom().is_one() || fraction.numer().is_zero() => {
                write!(f, "{}", fraction.numer())
            }
            Self::exact(fraction) => write!(f, "{}/{}", fraction.numer(), fraction.denom()),
            Self::approximate(number) => write!(f, "{:.*}", DISPLAY_DECIMALS, number),
        }
    }
}

impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        self.combine(rhs, CheckedAdd::checked_add, |a, b| a + b)
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Value) -> Value {
        self.combine(rhs, CheckedSub::checked_sub, |a, b| a - b)
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, rhs: Value) -> Value {
        self.combine(rhs, CheckedMul::checked_mul, |a, b| a * b)
    }
}

impl Div for Value {
    type Output = Value;

    fn div(self, rhs: Value) -> Value {
        if self.is_calculable() && rhs.is_zero() {
            return Value::invalid(CalcError::zero_denominator);
        }
        self.combine(rhs, CheckedDiv::checked_div, |a, b| a / b)
    }
}

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        match self {
            Self::exact(fraction) => match fraction.numer().checked_neg() {
                Some(numerator) => Self::exact(Fraction::new_raw(numerator, *fraction.denom())),
                None => Self::invalid(CalcError::overflow),
            },
            Self::approximate(number) => Self::approximate(-number),
            invalid => invalid,
        }
    }
}

use thiserror::Error;

use crate::VarKey;

/// Errors raised while building or evaluating nomials, constraints, and programs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("coefficient {coeff} is not positive and finite")]
    NonPositiveCoefficient { coeff: f64 },

    #[error("exponent {exp} of {key} is not finite")]
    NonFiniteExponent { key: VarKey, exp: f64 },

    #[error("no value for variable {key}")]
    MissingValue { key: VarKey },

    #[error("value {value} for variable {key} is not positive and finite")]
    InvalidValue { key: VarKey, value: f64 },

    #[error("no term has a usable weight at the approximation point")]
    DegenerateApproximation,

    #[error("signomial inequality requires {less} <= 0")]
    EmptyGreaterSide { less: String },

    #[error("constraint is not a posynomial inequality or monomial equality: {constraint}")]
    NotGeometric { constraint: String },

    #[error("geometric program has an empty cost")]
    EmptyCost,

    #[error("slot {slot} is out of range for a program with {slots} slots")]
    SlotOutOfRange { slot: usize, slots: usize },
}

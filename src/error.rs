use crate::parser::ParseError;
use crate::roll::{MAX_COUNT, MAX_SIDES};


/// Any failure a single evaluation can surface.
///
/// Every variant is terminal for the call that produced it: there is no
/// partial result and nothing is recovered internally.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The notation could not be parsed.
    #[error("parse error - {0}")]
    Parse(#[from] ParseError),

    /// A dice group violated the numeric bounds.
    #[error("range error - {0}")]
    Range(#[from] RangeError),

    /// The safety validator rejected a resolved expression tree.
    ///
    /// This indicates an integrity fault in the evaluation pipeline rather
    /// than a user-input problem.
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// Evaluation itself failed, e.g. division by zero.
    #[error("arithmetic error - {0}")]
    Arithmetic(#[from] ArithmeticError),
}


/// Bound violations on a dice group. Never clamped, always surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// The group rolls no dice at all.
    #[error("dice count must be at least 1")]
    ZeroCount,

    /// A die with no sides cannot be rolled.
    #[error("die sides must be at least 1")]
    ZeroSides,

    /// More dice than the supported limit.
    #[error("dice count {0} exceeds the limit of {max}", max = MAX_COUNT)]
    CountTooLarge(u16),

    /// More sides than the supported limit.
    #[error("die sides {0} exceeds the limit of {max}", max = MAX_SIDES)]
    SidesTooLarge(u16),

    /// Keeping zero dice is never meaningful.
    #[error("must keep at least 1 die")]
    ZeroKeep,

    /// A keep modifier cannot select more dice than were rolled.
    #[error("cannot keep {keep} of {count} dice")]
    KeepTooLarge {
        /// Requested keep count.
        keep: u16,
        /// Number of dice in the group.
        count: u16,
    },
}


/// Failures during the arithmetic passes over a resolved expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    /// `/` or `//` with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// A pass produced a non-finite number, e.g. through `**`.
    #[error("result is not a finite number")]
    Overflow,
}

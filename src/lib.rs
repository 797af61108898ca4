#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]

//! Evaluation of tabletop dice notation strings.
//!
//! Expressions such as `2d6+3`, `4d8k3`, `a1d20*2` or `(1d4+1)**2` are
//! parsed into a typed expression tree and rolled, producing the actual
//! value alongside the expression's expected average, guaranteed minimum
//! and guaranteed maximum, plus a critical flag.
//!
//! Notation supports `k`/`l` keep-highest/keep-lowest modifiers, per-group
//! `A`/`D` advantage markers, a leading `a`/`d` whole-expression marker,
//! and the arithmetic operators `+ - * / // **` (`^` is an alias for `**`)
//! with parentheses.
//!
//! ```
//! use multi_dice::evaluate;
//!
//! let result = evaluate("4d6k3+2").unwrap();
//! assert!(result.value >= 5.0 && result.value <= 20.0);
//! assert_eq!(result.rolls.len(), 5); // four dice and one literal
//! ```

#[cfg(test)]
mod roll_test_strategies;

mod error;
mod eval;
mod parser;
mod roll;
mod validate;

pub use error::{ArithmeticError, Error, RangeError};
pub use eval::{
    best_of, evaluate, evaluate_with_threshold, roll_value, worst_of,
    Expression, ExpressionResult,
};
pub use parser::{BinaryOperator, Expr, ParseError, Parser};
pub use roll::{
    Dice, DiceBuilder, Edge, Keep, RollOutcome,
    DEFAULT_CRIT_THRESHOLD, MAX_COUNT, MAX_SIDES,
};

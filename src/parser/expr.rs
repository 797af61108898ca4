use std::convert::From;
use std::fmt::Display;
use crate::{ArithmeticError, Dice, RollOutcome};


/// An abstract syntax tree for dice notation: integer literals and dice
/// groups joined by the six arithmetic operators.
///
/// The grammar has no unary operators and no non-numeric leaves; anything
/// else fails during parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A plain integer operand.
    Literal(u16),
    /// A dice group operand.
    Dice(Dice),
    /// Two sub-expressions joined by a binary operator.
    Binary {
        /// The operator.
        op: BinaryOperator,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
}

impl Expr {
    /// Samples every dice leaf once, producing a [`Resolved`] tree whose
    /// leaves carry the rolled total alongside the operand's average,
    /// minimum and maximum.
    pub(crate) fn resolve(&self, threshold: u16) -> Resolved {
        match self {
            Expr::Literal(value) => Resolved::Outcome(RollOutcome::literal(*value)),
            Expr::Dice(dice) => Resolved::Outcome(dice.roll(threshold)),
            Expr::Binary { op, left, right } => Resolved::Binary {
                op: *op,
                left: Box::new(left.resolve(threshold)),
                right: Box::new(right.resolve(threshold)),
            },
        }
    }

    fn binary_op<L: Into<Expr>, R: Into<Expr>>(op: BinaryOperator, left: L, right: R) -> Self {
        Self::Binary { op, left: Box::new(left.into()), right: Box::new(right.into()) }
    }

    /// Builds an addition node.
    pub fn add<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Add, left, right)
    }

    /// Builds a subtraction node.
    pub fn sub<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Subtract, left, right)
    }

    /// Builds a multiplication node.
    pub fn mul<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Multiply, left, right)
    }

    /// Builds a true-division node.
    pub fn div<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Divide, left, right)
    }

    /// Builds a floor-division node.
    pub fn floor_div<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::FloorDivide, left, right)
    }

    /// Builds an exponentiation node.
    pub fn pow<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Power, left, right)
    }
}

impl From<Dice> for Expr {
    fn from(value: Dice) -> Self {
        Self::Dice(value)
    }
}

impl From<u16> for Expr {
    fn from(value: u16) -> Self {
        Self::Literal(value)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{v}"),
            Expr::Dice(dice) => write!(f, "{dice}"),
            Expr::Binary { op, left, right } => write!(f, "({left}{op}{right})"),
        }
    }
}


/// The six permitted binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`, true division.
    Divide,
    /// `//`, floor division.
    FloorDivide,
    /// `**` (also written `^`), exponentiation.
    Power,
}

impl BinaryOperator {
    /// Applies the operator over real numbers.
    ///
    /// # Errors
    /// [`ArithmeticError::DivisionByZero`] for `/` or `//` with a zero
    /// divisor. The error is surfaced, never coerced to a default.
    pub fn apply(&self, left: f64, right: f64) -> Result<f64, ArithmeticError> {
        use BinaryOperator as Op;
        match self {
            Op::Add => Ok(left + right),
            Op::Subtract => Ok(left - right),
            Op::Multiply => Ok(left * right),
            Op::Divide => {
                if right == 0.0 {
                    Err(ArithmeticError::DivisionByZero)
                } else {
                    Ok(left / right)
                }
            }
            Op::FloorDivide => {
                if right == 0.0 {
                    Err(ArithmeticError::DivisionByZero)
                } else {
                    Ok((left / right).floor())
                }
            }
            Op::Power => Ok(left.powf(right)),
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
            BinaryOperator::FloorDivide => write!(f, "//"),
            BinaryOperator::Power => write!(f, "**"),
        }
    }
}


/// Which numeric interpretation of an operand a pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Facet {
    Value,
    Average,
    Minimum,
    Maximum,
}


/// An expression tree whose dice leaves have been sampled. Each leaf carries
/// all four interpretations at once, so the same tree is evaluated once per
/// [`Facet`] with identical operator semantics.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolved {
    Outcome(RollOutcome),
    Binary {
        op: BinaryOperator,
        left: Box<Resolved>,
        right: Box<Resolved>,
    },
}

impl Resolved {
    pub fn eval(&self, facet: Facet) -> Result<f64, ArithmeticError> {
        match self {
            Resolved::Outcome(outcome) => Ok(match facet {
                Facet::Value => outcome.value,
                Facet::Average => outcome.average,
                Facet::Minimum => outcome.minimum,
                Facet::Maximum => outcome.maximum,
            }),
            Resolved::Binary { op, left, right } => {
                op.apply(left.eval(facet)?, right.eval(facet)?)
            }
        }
    }

    /// All individual die values in left-to-right operand order.
    pub fn rolls(&self) -> Vec<u16> {
        match self {
            Resolved::Outcome(outcome) => outcome.rolls.clone(),
            Resolved::Binary { left, right, .. } => {
                let mut rolls = left.rolls();
                rolls.extend(right.rolls());
                rolls
            }
        }
    }

    /// Whether any sampled die anywhere in the tree was critical.
    pub fn critical(&self) -> bool {
        match self {
            Resolved::Outcome(outcome) => outcome.critical,
            Resolved::Binary { left, right, .. } => left.critical() || right.critical(),
        }
    }
}

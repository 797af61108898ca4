//! Second line of defense before arithmetic evaluation.
//!
//! The typed pipeline already rejects names, calls and any non-numeric
//! syntax at the lexer, but the tree that is ultimately evaluated is built
//! from roll results after parsing. This walk accepts that tree only if
//! every node is a numeric leaf joined by one of the six permitted binary
//! operators, and every leaf is internally consistent. A rejection is an
//! integrity fault, not a user-input error.

use crate::Error;
use crate::parser::Resolved;


pub(crate) fn validate(expr: &Resolved) -> Result<(), Error> {
    match expr {
        Resolved::Outcome(outcome) => {
            for figure in [outcome.value, outcome.average, outcome.minimum, outcome.maximum] {
                if !figure.is_finite() {
                    return Err(Error::InvalidExpression(
                        "leaf carries a non-finite number".into(),
                    ));
                }
            }

            if outcome.rolls.is_empty() {
                return Err(Error::InvalidExpression(
                    "leaf carries no recorded rolls".into(),
                ));
            }

            if outcome.minimum > outcome.maximum
                || outcome.value < outcome.minimum
                || outcome.value > outcome.maximum
            {
                return Err(Error::InvalidExpression(
                    "leaf total lies outside its own bounds".into(),
                ));
            }

            Ok(())
        }

        Resolved::Binary { op, left, right } => {
            use crate::BinaryOperator as Op;
            // Exhaustive: only the six arithmetic operators are evaluable.
            match op {
                Op::Add | Op::Subtract | Op::Multiply
                | Op::Divide | Op::FloorDivide | Op::Power => {}
            }

            validate(left)?;
            validate(right)
        }
    }
}

use std::fmt::Display;
use crate::{ArithmeticError, Edge, Error, DEFAULT_CRIT_THRESHOLD};
use crate::parser::{Expr, Facet, ParseError, Parser, Resolved};
use crate::validate::validate;


/// A parsed, immutable dice expression that can be rolled repeatedly.
///
/// The notation is normalized on construction: whitespace is stripped and a
/// leading `a` or `d` is consumed as the whole-expression advantage or
/// disadvantage marker. `^` is accepted as an alias for `**`.
///
/// # Examples
/// ```
/// use multi_dice::Expression;
///
/// let attack = Expression::new("1d20+5").unwrap();
/// let result = attack.roll().unwrap();
///
/// assert!(result.value >= 6.0 && result.value <= 25.0);
/// assert_eq!(result.minimum, 6.0);
/// assert_eq!(result.maximum, 25.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    notation: String,
    edge: Edge,
    root: Expr,
    threshold: u16,
}

impl Expression {
    /// Parses a dice notation string with the default critical threshold
    /// of 20.
    ///
    /// # Errors
    /// [`Error::Parse`] for malformed notation, [`Error::Range`] for dice
    /// bounds violations.
    pub fn new(input: &str) -> Result<Self, Error> {
        Self::with_threshold(input, DEFAULT_CRIT_THRESHOLD)
    }

    /// Parses a dice notation string with a custom critical threshold.
    ///
    /// # Errors
    /// [`Error::Parse`] for malformed notation, [`Error::Range`] for dice
    /// bounds violations.
    pub fn with_threshold(input: &str, threshold: u16) -> Result<Self, Error> {
        let notation: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if notation.is_empty() {
            return Err(ParseError::Empty.into());
        }

        // A leading lowercase marker covers the whole expression; per-group
        // uppercase markers are part of the grammar itself.
        let (edge, rest) = match notation.as_bytes()[0] {
            b'a' => (Edge::Advantage, &notation[1..]),
            b'd' => (Edge::Disadvantage, &notation[1..]),
            _ => (Edge::Flat, notation.as_str()),
        };

        let root = Parser::new(rest)?.parse()?;

        Ok(Self { notation, edge, root, threshold })
    }

    /// The normalized notation, including any leading marker.
    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// The configured critical threshold.
    pub const fn threshold(&self) -> u16 {
        self.threshold
    }

    /// The whole-expression advantage mode.
    pub const fn edge(&self) -> Edge {
        self.edge
    }

    /// Evaluates the expression once, producing a fresh immutable result.
    ///
    /// Under advantage or disadvantage the whole expression is evaluated
    /// twice with independent sampling and the pass with the strictly
    /// greater (or lesser) value wins; ties keep the first pass. The winning
    /// pass contributes the roll list and the critical flag. A plain integer
    /// expression is a fixed point under either marker.
    ///
    /// # Errors
    /// [`Error::Arithmetic`] on division by zero or a non-finite result;
    /// [`Error::InvalidExpression`] if the resolved tree fails validation.
    pub fn roll(&self) -> Result<ExpressionResult, Error> {
        let result = match self.edge {
            Edge::Flat => self.roll_once()?,
            Edge::Advantage => {
                let first = self.roll_once()?;
                let second = self.roll_once()?;
                if second.value > first.value { second } else { first }
            }
            Edge::Disadvantage => {
                let first = self.roll_once()?;
                let second = self.roll_once()?;
                if second.value < first.value { second } else { first }
            }
        };

        tracing::debug!(
            notation = %self.notation,
            value = result.value,
            critical = result.critical,
            "evaluated dice expression"
        );

        Ok(result)
    }

    fn roll_once(&self) -> Result<ExpressionResult, Error> {
        let resolved = self.root.resolve(self.threshold);
        validate(&resolved)?;

        let result = ExpressionResult {
            value: Self::finite(resolved.eval(Facet::Value)?)?,
            average: Self::finite(resolved.eval(Facet::Average)?)?,
            minimum: Self::finite(resolved.eval(Facet::Minimum)?)?,
            maximum: Self::finite(resolved.eval(Facet::Maximum)?)?,
            rolls: resolved.rolls(),
            critical: resolved.critical(),
        };

        Ok(result)
    }

    fn finite(value: f64) -> Result<f64, Error> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ArithmeticError::Overflow.into())
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation)
    }
}


/// The externally visible result of one full evaluation.
///
/// The same expression was evaluated under four interpretations that share
/// one set of sampled rolls: the actual value plus its theoretical average,
/// minimum and maximum.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionResult {
    /// The rolled value of the whole expression.
    pub value: f64,
    /// Expected value of the whole expression.
    pub average: f64,
    /// Value if every kept die had shown a 1.
    pub minimum: f64,
    /// Value if every kept die had shown its highest face.
    pub maximum: f64,
    /// Every individual die value in left-to-right operand order, including
    /// one synthetic roll per integer literal.
    pub rolls: Vec<u16>,
    /// Whether any sampled die met the critical threshold.
    pub critical: bool,
}


/// Parses and evaluates a dice notation string with the default critical
/// threshold of 20.
///
/// # Errors
/// Any [`Error`]: parse, range, invalid-expression or arithmetic.
///
/// # Examples
/// ```
/// use multi_dice::evaluate;
///
/// let result = evaluate("2d6+3").unwrap();
/// assert!(result.value >= 5.0 && result.value <= 15.0);
/// assert_eq!(result.rolls.len(), 3); // two dice and one literal
/// ```
pub fn evaluate(input: &str) -> Result<ExpressionResult, Error> {
    Expression::new(input)?.roll()
}

/// Parses and evaluates a dice notation string with a custom critical
/// threshold.
///
/// # Errors
/// Any [`Error`]: parse, range, invalid-expression or arithmetic.
pub fn evaluate_with_threshold(input: &str, threshold: u16) -> Result<ExpressionResult, Error> {
    Expression::with_threshold(input, threshold)?.roll()
}

/// Evaluates a dice notation string and returns only the rolled value.
///
/// # Errors
/// Any [`Error`]: parse, range, invalid-expression or arithmetic.
///
/// # Examples
/// ```
/// use multi_dice::roll_value;
///
/// let value = roll_value("1d6").unwrap();
/// assert!(value >= 1.0 && value <= 6.0);
/// ```
pub fn roll_value(input: &str) -> Result<f64, Error> {
    Ok(evaluate(input)?.value)
}

/// Invokes the producer twice and returns the greater result; ties return
/// the first. Works over any ordered value, independent of the dice grammar.
///
/// # Examples
/// ```
/// use multi_dice::{best_of, roll_value};
///
/// let value = best_of(|| roll_value("1d20").unwrap());
/// assert!(value >= 1.0 && value <= 20.0);
/// ```
pub fn best_of<T, F>(mut producer: F) -> T
where
    T: PartialOrd,
    F: FnMut() -> T,
{
    let first = producer();
    let second = producer();

    if second > first { second } else { first }
}

/// Invokes the producer twice and returns the lesser result; ties return
/// the first. The counterpart of [`best_of`].
pub fn worst_of<T, F>(mut producer: F) -> T
where
    T: PartialOrd,
    F: FnMut() -> T,
{
    let first = producer();
    let second = producer();

    if second < first { second } else { first }
}

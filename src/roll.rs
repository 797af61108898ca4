use std::fmt::Display;
use rand::Rng;
use crate::RangeError;


/// Largest number of dice a single group may roll.
pub const MAX_COUNT: u16 = 1000;

/// Largest number of sides a die may have.
pub const MAX_SIDES: u16 = 1000;

/// Critical threshold used when none is configured.
pub const DEFAULT_CRIT_THRESHOLD: u16 = 20;


/// Selects which dice of a rolled pool contribute to the kept total.
///
/// This implements the `k` (keep highest) and `l` (keep lowest) notation
/// modifiers, e.g. `4d6k3` or `2d20l1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Keep {
    /// Every rolled die is summed.
    #[default]
    All,

    /// Only the `n` highest dice are summed.
    Highest(u16),

    /// Only the `n` lowest dice are summed.
    Lowest(u16),
}

impl Keep {
    /// Returns the keep count if the mode has one, `None` for [`Keep::All`].
    pub fn value(&self) -> Option<u16> {
        match self {
            Keep::Highest(n) | Keep::Lowest(n) => Some(*n),
            Keep::All => None,
        }
    }
}

impl Display for Keep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Keep::All => Ok(()),
            Keep::Highest(n) => write!(f, "k{n}"),
            Keep::Lowest(n) => write!(f, "l{n}"),
        }
    }
}


/// Per-group advantage marker, written as an `A` or `D` prefix in notation
/// (`A1d20`). The group is rolled twice and the strictly better or worse
/// kept total wins; ties keep the first roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// A single roll, no re-roll.
    #[default]
    Flat,

    /// Roll twice, keep the higher total.
    Advantage,

    /// Roll twice, keep the lower total.
    Disadvantage,
}

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Edge::Flat => Ok(()),
            Edge::Advantage => write!(f, "A"),
            Edge::Disadvantage => write!(f, "D"),
        }
    }
}


/// A validated dice group: `count` dice of `sides` sides, an optional
/// [`Keep`] modifier and an optional per-group [`Edge`] marker.
///
/// Construct it with [`Dice::builder()`] or the [`crate::dice!`] macro.
/// The builder enforces the numeric bounds (`1..=1000` dice and sides,
/// keep count within the dice count); violations are [`RangeError`]s and
/// are never clamped.
///
/// # Examples
/// ```
/// use multi_dice::{Dice, Keep};
///
/// let dice = Dice::builder(6)
///     .count(4)
///     .keep(Keep::Highest(3))
///     .build()
///     .unwrap();
///
/// assert_eq!(format!("{dice}"), "4d6k3");
/// assert_eq!(dice.minimum(), 3);
/// assert_eq!(dice.maximum(), 18);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dice {
    sides: u16,
    count: u16,
    keep: Keep,
    edge: Edge,
}

impl Dice {
    /// Creates a new [`DiceBuilder`] for dice with the given number of sides.
    pub fn builder(sides: u16) -> DiceBuilder {
        DiceBuilder::new(sides)
    }

    /// Number of dice in the group.
    pub const fn count(&self) -> u16 {
        self.count
    }

    /// Number of sides per die.
    pub const fn sides(&self) -> u16 {
        self.sides
    }

    /// The keep modifier.
    pub const fn keep(&self) -> Keep {
        self.keep
    }

    /// The per-group advantage marker.
    pub const fn edge(&self) -> Edge {
        self.edge
    }

    /// Returns a copy of this group with a different [`Edge`] marker.
    pub fn with_edge(self, edge: Edge) -> Self {
        Self { edge, ..self }
    }

    /// Number of dice that contribute to the kept total.
    pub const fn kept_count(&self) -> u16 {
        match self.keep {
            Keep::All => self.count,
            Keep::Highest(n) | Keep::Lowest(n) => n,
        }
    }

    /// Smallest possible kept total: every kept die shows a 1.
    pub const fn minimum(&self) -> u32 {
        self.kept_count() as u32
    }

    /// Largest possible kept total: every kept die shows its highest face.
    pub const fn maximum(&self) -> u32 {
        self.kept_count() as u32 * self.sides as u32
    }

    /// Expected value of the kept total, `(kept_count * sides + 1) / 2`.
    ///
    /// # Examples
    /// ```
    /// use multi_dice::Dice;
    ///
    /// let d6 = Dice::builder(6).build().unwrap();
    /// assert_eq!(d6.average(), 3.5);
    /// ```
    pub fn average(&self) -> f64 {
        f64::from(self.kept_count() as u32 * self.sides as u32 + 1) / 2.0
    }

    /// Rolls the group once and folds the sampled values into a
    /// [`RollOutcome`].
    ///
    /// A group marked with [`Edge::Advantage`] or [`Edge::Disadvantage`] is
    /// sampled twice; the pass with the strictly higher (or lower) kept total
    /// wins and its rolls and critical flag are the ones reported. Ties keep
    /// the first pass.
    ///
    /// `threshold` is the critical threshold: the outcome is critical if any
    /// sampled die, kept or not, shows `threshold` or more.
    pub fn roll(&self, threshold: u16) -> RollOutcome {
        let first = self.outcome_from(self.generate_values(), threshold);

        let outcome = match self.edge {
            Edge::Flat => first,
            Edge::Advantage => {
                let second = self.outcome_from(self.generate_values(), threshold);
                if second.value > first.value { second } else { first }
            }
            Edge::Disadvantage => {
                let second = self.outcome_from(self.generate_values(), threshold);
                if second.value < first.value { second } else { first }
            }
        };

        tracing::trace!(dice = %self, total = outcome.value, critical = outcome.critical, "rolled dice group");
        outcome
    }

    /// Generates one uniform random value in `1..=sides` per die.
    pub fn generate_values(&self) -> Vec<u16> {
        let mut rng = rand::rng();

        (0..self.count)
            .map(|_| rng.random_range(1..=self.sides))
            .collect()
    }

    /// Folds already-sampled die values into a [`RollOutcome`], applying the
    /// keep modifier and the critical threshold. The rolls are reported in
    /// their original order.
    pub fn outcome_from(&self, values: Vec<u16>, threshold: u16) -> RollOutcome {
        let critical = values.iter().any(|&v| v >= threshold);

        let kept: u32 = match self.keep {
            Keep::All => values.iter().map(|&v| u32::from(v)).sum(),
            Keep::Highest(n) => {
                let mut sorted = values.clone();
                sorted.sort_unstable_by(|a, b| b.cmp(a));
                sorted.iter().take(n as usize).map(|&v| u32::from(v)).sum()
            }
            Keep::Lowest(n) => {
                let mut sorted = values.clone();
                sorted.sort_unstable();
                sorted.iter().take(n as usize).map(|&v| u32::from(v)).sum()
            }
        };

        RollOutcome {
            rolls: values,
            value: f64::from(kept),
            average: self.average(),
            minimum: f64::from(self.minimum()),
            maximum: f64::from(self.maximum()),
            critical,
        }
    }
}

impl Display for Dice {
    /// Formats the group as dice notation, e.g. `A4d6k3`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}d{}{}", self.edge, self.count, self.sides, self.keep)
    }
}


/// Fluent builder for [`Dice`], started with [`Dice::builder()`].
#[derive(Debug, Clone)]
pub struct DiceBuilder {
    sides: u16,
    count: u16,
    keep: Keep,
    edge: Edge,
}

impl DiceBuilder {
    fn new(sides: u16) -> Self {
        Self {
            sides,
            count: 1,
            keep: Keep::All,
            edge: Edge::Flat,
        }
    }

    /// Sets the number of dice to roll. Defaults to 1.
    pub fn count(mut self, count: u16) -> Self {
        self.count = count;
        self
    }

    /// Sets the keep modifier. Defaults to [`Keep::All`].
    pub fn keep(mut self, keep: Keep) -> Self {
        self.keep = keep;
        self
    }

    /// Sets the per-group advantage marker. Defaults to [`Edge::Flat`].
    pub fn edge(mut self, edge: Edge) -> Self {
        self.edge = edge;
        self
    }

    /// Validates the configuration and builds the [`Dice`] group.
    ///
    /// # Errors
    /// - [`RangeError::ZeroCount`] / [`RangeError::ZeroSides`] if either is 0.
    /// - [`RangeError::CountTooLarge`] / [`RangeError::SidesTooLarge`] above
    ///   [`MAX_COUNT`] / [`MAX_SIDES`].
    /// - [`RangeError::ZeroKeep`] for a keep modifier of 0 dice.
    /// - [`RangeError::KeepTooLarge`] if the keep count exceeds the dice
    ///   count. Keeping every die is allowed.
    pub fn build(self) -> Result<Dice, RangeError> {
        if self.count == 0 {
            return Err(RangeError::ZeroCount);
        }

        if self.sides == 0 {
            return Err(RangeError::ZeroSides);
        }

        if self.count > MAX_COUNT {
            return Err(RangeError::CountTooLarge(self.count));
        }

        if self.sides > MAX_SIDES {
            return Err(RangeError::SidesTooLarge(self.sides));
        }

        if let Some(n) = self.keep.value() {
            if n == 0 {
                return Err(RangeError::ZeroKeep);
            }

            if n > self.count {
                return Err(RangeError::KeepTooLarge { keep: n, count: self.count });
            }
        }

        Ok(Dice {
            sides: self.sides,
            count: self.count,
            keep: self.keep,
            edge: self.edge,
        })
    }
}


/// The outcome of rolling one operand, either a dice group or an integer
/// literal (which contributes a single synthetic "roll" equal to itself).
///
/// Besides the actual kept total, the outcome carries the three theoretical
/// statistics of the same operand so that a whole expression can be
/// evaluated once per interpretation without re-rolling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollOutcome {
    /// Individual die values in roll order, before the keep filter.
    pub rolls: Vec<u16>,
    /// The kept total actually rolled.
    pub value: f64,
    /// Expected value of the operand.
    pub average: f64,
    /// Guaranteed minimum of the operand.
    pub minimum: f64,
    /// Guaranteed maximum of the operand.
    pub maximum: f64,
    /// Whether any sampled die, kept or not, met the critical threshold.
    pub critical: bool,
}

impl RollOutcome {
    /// The outcome of an integer literal: all four interpretations equal the
    /// literal, one synthetic roll, never critical.
    pub fn literal(value: u16) -> Self {
        Self {
            rolls: vec![value],
            value: f64::from(value),
            average: f64::from(value),
            minimum: f64::from(value),
            maximum: f64::from(value),
            critical: false,
        }
    }
}


/// A macro for conveniently creating [`Dice`] groups.
///
/// # Syntax
/// - `dice!(SIDES)`: one die (e.g. `dice!(20)` for 1d20).
/// - `dice!(SIDES, COUNT)`: `COUNT` dice (e.g. `dice!(6, 3)` for 3d6).
/// - `dice!(SIDES, COUNT, k, N)` / `dice!(SIDES, COUNT, l, N)`: keep the `N`
///   highest or lowest (e.g. `dice!(6, 4, k, 3)` for 4d6k3).
///
/// # Returns
/// `Result<Dice, RangeError>` - the result of [`DiceBuilder::build()`].
///
/// # Examples
/// ```
/// use multi_dice::dice;
///
/// let d20 = dice!(20);
/// assert!(d20.is_ok());
/// assert_eq!(format!("{}", d20.unwrap()), "1d20");
///
/// let heroic = dice!(6, 4, k, 3);
/// assert!(heroic.is_ok());
/// assert_eq!(format!("{}", heroic.unwrap()), "4d6k3");
/// ```
#[macro_export]
macro_rules! dice {
    ($sides:literal) => {
        $crate::Dice::builder($sides)
            .build()
    };

    ($sides:literal, $count:literal) => {
        $crate::Dice::builder($sides)
            .count($count)
            .build()
    };

    ($sides:literal, $count:literal, k, $n:literal) => {
        $crate::Dice::builder($sides)
            .count($count)
            .keep($crate::Keep::Highest($n))
            .build()
    };

    ($sides:literal, $count:literal, l, $n:literal) => {
        $crate::Dice::builder($sides)
            .count($count)
            .keep($crate::Keep::Lowest($n))
            .build()
    };
}


#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use super::*;
    use crate::roll_test_strategies::dice_strategy;


    proptest! {
        #[test]
        fn test_keep_value(n in 1..100u16) {
            prop_assert_eq!(Keep::Highest(n).value(), Some(n));
            prop_assert_eq!(Keep::Lowest(n).value(), Some(n));
            prop_assert_eq!(Keep::All.value(), None);
        }

        #[test]
        fn test_dice_display(dice in dice_strategy()) {
            let keep = match dice.keep() {
                Keep::All => String::new(),
                Keep::Highest(n) => format!("k{n}"),
                Keep::Lowest(n) => format!("l{n}"),
            };

            let expected = format!("{}d{}{}", dice.count(), dice.sides(), keep);
            prop_assert_eq!(dice.to_string(), expected);
        }

        #[test]
        fn test_dice_statistics(dice in dice_strategy()) {
            let kept = u32::from(dice.kept_count());
            let sides = u32::from(dice.sides());

            prop_assert_eq!(dice.minimum(), kept);
            prop_assert_eq!(dice.maximum(), kept * sides);
            prop_assert_eq!(dice.average(), f64::from(kept * sides + 1) / 2.0);
            prop_assert!(f64::from(dice.minimum()) <= dice.average());
        }

        #[test]
        fn test_generate_values(dice in dice_strategy()) {
            let values = dice.generate_values();

            prop_assert_eq!(values.len(), dice.count() as usize);
            for &value in &values {
                prop_assert!(value >= 1 && value <= dice.sides());
            }
        }

        #[test]
        fn test_roll_within_bounds(dice in dice_strategy()) {
            let outcome = dice.roll(DEFAULT_CRIT_THRESHOLD);

            prop_assert_eq!(outcome.rolls.len(), dice.count() as usize);
            prop_assert!(outcome.value >= f64::from(dice.minimum()));
            prop_assert!(outcome.value <= f64::from(dice.maximum()));
            prop_assert_eq!(outcome.minimum, f64::from(dice.minimum()));
            prop_assert_eq!(outcome.maximum, f64::from(dice.maximum()));
            prop_assert_eq!(outcome.average, dice.average());
        }

        #[test]
        fn test_edge_roll_within_bounds(
            dice in dice_strategy(),
            edge in prop::sample::select(&[Edge::Advantage, Edge::Disadvantage])
        ) {
            let dice = dice.with_edge(edge);
            let outcome = dice.roll(DEFAULT_CRIT_THRESHOLD);

            prop_assert_eq!(outcome.rolls.len(), dice.count() as usize);
            prop_assert!(outcome.value >= f64::from(dice.minimum()));
            prop_assert!(outcome.value <= f64::from(dice.maximum()));
        }

        #[test]
        fn test_critical_threshold_one(dice in dice_strategy()) {
            // Every face is >= 1, so the flag must always be set.
            let outcome = dice.roll(1);
            prop_assert!(outcome.critical);
        }

        #[test]
        fn test_never_critical_above_sides(dice in dice_strategy()) {
            let outcome = dice.roll(dice.sides() + 1);
            prop_assert!(!outcome.critical);
        }

        #[test]
        fn test_builder_bounds(count in 0..1200u16, sides in 0..1200u16) {
            let result = Dice::builder(sides).count(count).build();

            if count == 0 {
                prop_assert_eq!(result, Err(RangeError::ZeroCount));
            } else if sides == 0 {
                prop_assert_eq!(result, Err(RangeError::ZeroSides));
            } else if count > MAX_COUNT {
                prop_assert_eq!(result, Err(RangeError::CountTooLarge(count)));
            } else if sides > MAX_SIDES {
                prop_assert_eq!(result, Err(RangeError::SidesTooLarge(sides)));
            } else {
                prop_assert!(result.is_ok());
            }
        }

        #[test]
        fn test_builder_keep_bounds(count in 1..100u16, extra in 1..100u16, highest: bool) {
            let keep_n = count + extra;
            let keep = if highest { Keep::Highest(keep_n) } else { Keep::Lowest(keep_n) };
            let result = Dice::builder(6).count(count).keep(keep).build();

            prop_assert_eq!(result, Err(RangeError::KeepTooLarge { keep: keep_n, count }));
        }

        #[test]
        fn test_builder_keep_all_dice_allowed(count in 1..100u16, highest: bool) {
            let keep = if highest { Keep::Highest(count) } else { Keep::Lowest(count) };
            let result = Dice::builder(6).count(count).keep(keep).build();

            prop_assert!(result.is_ok());
        }

        #[test]
        fn test_literal_outcome(value in 0..1000u16) {
            let outcome = RollOutcome::literal(value);

            prop_assert_eq!(outcome.rolls, vec![value]);
            prop_assert_eq!(outcome.value, f64::from(value));
            prop_assert_eq!(outcome.average, f64::from(value));
            prop_assert_eq!(outcome.minimum, f64::from(value));
            prop_assert_eq!(outcome.maximum, f64::from(value));
            prop_assert!(!outcome.critical);
        }
    }

    #[test]
    fn test_keep_highest_outcome() {
        let dice = Dice::builder(6).count(2).keep(Keep::Highest(1)).build().unwrap();
        let outcome = dice.outcome_from(vec![3, 5], DEFAULT_CRIT_THRESHOLD);

        assert_eq!(outcome.value, 5.0);
        assert_eq!(outcome.minimum, 1.0);
        assert_eq!(outcome.maximum, 6.0);
        assert_eq!(outcome.rolls, vec![3, 5]);
        assert!(!outcome.critical);
    }

    #[test]
    fn test_keep_lowest_outcome() {
        let dice = Dice::builder(8).count(3).keep(Keep::Lowest(2)).build().unwrap();
        let outcome = dice.outcome_from(vec![7, 2, 4], 7);

        assert_eq!(outcome.value, 6.0);
        assert_eq!(outcome.rolls, vec![7, 2, 4]);
        // The 7 was dropped by the keep filter but still triggers the flag.
        assert!(outcome.critical);
    }

    #[test]
    fn test_keep_all_outcome() {
        let dice = Dice::builder(6).count(3).build().unwrap();
        let outcome = dice.outcome_from(vec![1, 4, 6], DEFAULT_CRIT_THRESHOLD);

        assert_eq!(outcome.value, 11.0);
        assert_eq!(outcome.average, 9.5);
        assert_eq!(outcome.minimum, 3.0);
        assert_eq!(outcome.maximum, 18.0);
    }

    #[test]
    fn test_zero_keep_rejected() {
        let result = Dice::builder(6).count(3).keep(Keep::Highest(0)).build();
        assert_eq!(result, Err(RangeError::ZeroKeep));
    }

    #[test]
    fn test_dice_macro() {
        assert_eq!(dice!(20).unwrap().to_string(), "1d20");
        assert_eq!(dice!(6, 3).unwrap().to_string(), "3d6");
        assert_eq!(dice!(6, 4, k, 3).unwrap().to_string(), "4d6k3");
        assert_eq!(dice!(20, 2, l, 1).unwrap().to_string(), "2d20l1");
    }
}

use proptest::prelude::*;
use crate::roll::{Dice, Keep};


pub(crate) fn keep_strategy(count: u16) -> impl Strategy<Value = Keep> {
    (1..=count, 0u8..3).prop_map(|(n, keep_type)| {
        match keep_type {
            0 => Keep::All,
            1 => Keep::Highest(n),
            _ => Keep::Lowest(n),
        }
    })
}

pub(crate) fn dice_strategy() -> impl Strategy<Value = Dice> {
    (1..=100u16, 1..=100u16)
        .prop_flat_map(|(sides, count)| {
            keep_strategy(count).prop_map(move |keep| {
                Dice::builder(sides).count(count).keep(keep).build().unwrap()
            })
        })
}

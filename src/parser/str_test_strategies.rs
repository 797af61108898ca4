use proptest::prelude::*;


pub(crate) fn number_strategy() -> impl Strategy<Value = String> {
    (0u16..=1000).prop_map(|n| n.to_string())
}

pub(crate) fn dice_strategy() -> impl Strategy<Value = String> {
    (1u16..=1000, 1u16..=1000)
        .prop_map(|(count, sides)| format!("{}d{}", count, sides))
}

pub(crate) fn dice_with_keep_strategy() -> impl Strategy<Value = String> {
    (
        1u16..=1000,
        1u16..=1000,
        prop_oneof![Just("k"), Just("l")],
        1u16..=1000,
    ).prop_map(|(count, sides, modifier, keep_n)| {
        let keep_n = std::cmp::min(count, keep_n);
        format!("{}d{}{}{}", count, sides, modifier, keep_n)
    })
}

pub(crate) fn marked_dice_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("A"), Just("D")],
        1u16..=100,
        1u16..=100,
    ).prop_map(|(marker, count, sides)| format!("{}{}d{}", marker, count, sides))
}

pub(crate) fn parenthesized_strategy(inner: impl Strategy<Value = String>) -> impl Strategy<Value = String> {
    inner.prop_map(|expr| format!("({})", expr))
}

// Only + and * so that every generated expression evaluates cleanly in all
// four passes: no zero divisors and no negative intermediates.
pub(crate) fn binary_operation_strategy(
    left: impl Strategy<Value = String>,
    right: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    (
        left,
        prop_oneof![Just("+"), Just("*")],
        right,
    ).prop_map(|(l, op, r)| format!("{}{}{}", l, op, r))
}

pub(crate) fn notation_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        number_strategy(),
        dice_strategy(),
        dice_with_keep_strategy(),
        marked_dice_strategy(),
    ];

    leaf.prop_recursive(4, 32, 10, |inner| {
        prop_oneof![
            parenthesized_strategy(inner.clone()),
            binary_operation_strategy(inner.clone(), inner),
        ]
    })
}

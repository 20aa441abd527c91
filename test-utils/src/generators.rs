//! Shared proptest generators.

use proptest::prelude::*;

/// Generate arbitrary payloads, including the empty one.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

/// Generate non-empty payloads.
pub fn non_empty_payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..512)
}

/// Generate tokens that are valid header values.
pub fn token_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._~+/=-]{8,64}"
}

/// Generate base URL suffixes: an optional path prefix with any number of
/// trailing slashes.
pub fn base_path_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of("[a-z]{1,8}(/[a-z]{1,8}){0,2}"),
        0usize..3,
    )
        .prop_map(|(prefix, slashes)| {
            let prefix = prefix.map(|p| format!("/{p}")).unwrap_or_default();
            format!("{prefix}{}", "/".repeat(slashes))
        })
}

/// Generate HTTP statuses the client must reject.
pub fn rejected_status_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![
        Just(201u16),
        Just(202u16),
        Just(206u16),
        400u16..=451,
        500u16..=511,
    ]
}

// Unit tests for sender hue assignment

use crate::color::{hsl_to_rgb, hue_of, sender_rgb};

/// **VALUE**: Pins the hash to known values.
///
/// **WHY THIS MATTERS**: Every client must color a given user the same way. A change to
/// the multiplier, the code units hashed, or the reduction would silently recolor everyone.
///
/// **BUG THIS CATCHES**: Would catch hashing bytes instead of UTF-16 units, or a different
/// multiplier.
#[test]
fn given_known_names_when_hue_of_called_then_matches_reference_values() {
    // GIVEN / WHEN / THEN: hand-computed hashes
    assert_eq!(hue_of(""), 0);
    assert_eq!(hue_of("a"), 97);
    // b=98, o=111: ((98*31)+111)*31+98 = 97717; 97717 % 360 = 157
    assert_eq!(hue_of("bob"), 157);
}

/// **VALUE**: Verifies the hash wraps like a 32-bit signed integer.
///
/// **WHY THIS MATTERS**: Long names overflow quickly. A panic on overflow would crash
/// rendering; a bignum would drift from other clients.
///
/// **BUG THIS CATCHES**: Would catch plain `*` / `+` arithmetic (panics in debug builds).
#[test]
fn given_long_name_when_hue_of_called_then_wraps_and_stays_in_range() {
    // GIVEN: A name long enough to overflow i32 many times
    let name = "z".repeat(4096);

    // WHEN: Hashing it
    let hue = hue_of(&name);

    // THEN: In range and matches a wrapping reference
    let reference = name
        .encode_utf16()
        .fold(0i32, |h, u| h.wrapping_mul(31).wrapping_add(u as i32));
    assert!(hue < 360);
    assert_eq!(u32::from(hue), reference.unsigned_abs() % 360);
}

#[test]
fn given_any_name_when_hue_of_called_repeatedly_then_is_deterministic_and_in_range() {
    let names = ["alice", "bob", "Zoë", "日本語", "🦀 crab", "  spaced  ", "bot"];

    for name in names {
        let first = hue_of(name);
        for _ in 0..10 {
            assert_eq!(hue_of(name), first, "hue for {name:?} changed");
        }
        assert!(first < 360, "hue for {name:?} out of range: {first}");
    }
}

/// **VALUE**: Non-BMP characters hash as two UTF-16 code units.
///
/// **BUG THIS CATCHES**: Would catch hashing `char`s instead of code units.
#[test]
fn given_astral_character_when_hue_of_called_then_hashes_surrogate_pair() {
    let crab = "🦀";
    let units: Vec<u16> = crab.encode_utf16().collect();
    assert_eq!(units.len(), 2);

    let expected = (i32::from(units[0]) * 31 + i32::from(units[1])) % 360;
    assert_eq!(i32::from(hue_of(crab)), expected.abs());
}

#[test]
fn given_primary_hues_when_hsl_to_rgb_called_then_returns_primaries() {
    assert_eq!(hsl_to_rgb(0, 1.0, 0.5), (255, 0, 0));
    assert_eq!(hsl_to_rgb(120, 1.0, 0.5), (0, 255, 0));
    assert_eq!(hsl_to_rgb(240, 1.0, 0.5), (0, 0, 255));
    assert_eq!(hsl_to_rgb(200, 0.0, 1.0), (255, 255, 255));
    assert_eq!(hsl_to_rgb(200, 0.0, 0.0), (0, 0, 0));
}

#[test]
fn given_same_sender_when_sender_rgb_called_then_color_is_stable() {
    assert_eq!(sender_rgb("alice"), sender_rgb("alice"));
}

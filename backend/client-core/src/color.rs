//! Deterministic sender colors.
//!
//! Names hash to a hue so the same user always renders in the same color,
//! in this process and any other. Collisions between names are fine; the
//! hue is a display aid, not an identity.

/// Saturation used when rendering a sender hue.
pub const SENDER_SATURATION: f32 = 0.90;

/// Lightness used when rendering a sender hue.
pub const SENDER_LIGHTNESS: f32 = 0.36;

/// Map a user name to a hue in `[0, 360)`.
///
/// Rolls a 32-bit signed hash over the UTF-16 code units of `name`
/// (`hash * 31 + unit`, wrapping on overflow) and reduces it modulo 360.
pub fn hue_of(name: &str) -> u16 {
    let hash = name
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        });

    // `unsigned_abs` keeps i32::MIN in range where `abs` would overflow.
    (hash % 360).unsigned_abs() as u16
}

/// Convert an HSL color to 8-bit RGB.
///
/// `hue` is in degrees; `saturation` and `lightness` are fractions in `[0, 1]`.
pub fn hsl_to_rgb(hue: u16, saturation: f32, lightness: f32) -> (u8, u8, u8) {
    let hue = f32::from(hue % 360);
    let saturation = saturation.clamp(0.0, 1.0);
    let lightness = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let second = chroma * (1.0 - (sector % 2.0 - 1.0).abs());

    let (r, g, b) = match sector as u8 {
        0 => (chroma, second, 0.0),
        1 => (second, chroma, 0.0),
        2 => (0.0, chroma, second),
        3 => (0.0, second, chroma),
        4 => (second, 0.0, chroma),
        _ => (chroma, 0.0, second),
    };

    let offset = lightness - chroma / 2.0;
    let channel = |value: f32| ((value + offset) * 255.0).round().clamp(0.0, 255.0) as u8;

    (channel(r), channel(g), channel(b))
}

/// RGB color for a sender name, using the standard sender saturation and lightness.
pub fn sender_rgb(name: &str) -> (u8, u8, u8) {
    hsl_to_rgb(hue_of(name), SENDER_SATURATION, SENDER_LIGHTNESS)
}

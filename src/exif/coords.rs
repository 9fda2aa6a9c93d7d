use super::block::Rational;

/// Denominator used for the seconds component (four decimal places).
pub const SECONDS_DENOMINATOR: u32 = 10_000;

/// Convert non-negative decimal degrees to degrees/minutes/seconds rationals.
///
/// Degrees and minutes are whole numbers over 1; seconds are rounded to four
/// decimal places over [`SECONDS_DENOMINATOR`]. The sign is not encoded here,
/// pass the absolute value and carry the sign with [`hemisphere_ref`].
pub fn to_dms(decimal: f64) -> [Rational; 3] {
    let degrees = decimal.trunc();
    let minutes_float = (decimal - degrees) * 60.0;
    let minutes = minutes_float.trunc();
    let seconds = (minutes_float - minutes) * 60.0;

    [
        Rational::new(degrees as u32, 1),
        Rational::new(minutes as u32, 1),
        Rational::new(
            (seconds * f64::from(SECONDS_DENOMINATOR)).round() as u32,
            SECONDS_DENOMINATOR,
        ),
    ]
}

/// Convert degrees/minutes/seconds rationals back to decimal degrees.
///
/// A component with a zero denominator contributes nothing.
pub fn from_dms(degrees: Rational, minutes: Rational, seconds: Rational) -> f64 {
    degrees.to_f64() + minutes.to_f64() / 60.0 + seconds.to_f64() / 3600.0
}

/// Hemisphere symbol for a signed coordinate; zero counts as positive.
pub fn hemisphere_ref(value: f64, positive: char, negative: char) -> char {
    if value >= 0.0 { positive } else { negative }
}

pub mod assets;
pub mod persistence;
pub mod version;

/// Rounds to two decimal places, half-up (ties go towards positive infinity).
///
/// Ties are judged on the binary value, not the decimal text. A product such
/// as `0.05 * 95.30` is stored just below `4.765` and rounds to `4.76`.
///
/// Every monetary and quantity figure leaving the engine passes through here so
/// that round-trip and linearity checks share one tolerance of `0.01`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 100.0 + 0.5).floor() / 100.0
}

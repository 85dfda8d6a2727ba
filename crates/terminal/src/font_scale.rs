//! Discrete font zoom levels.
//!
//! The seven standard sizes (xx-small through xx-large, each 1.2x the
//! previous) extended by four rungs on either side.

const STEP: f64 = 1.2;
const EPSILON: f64 = 1e-6;

const XX_SMALL: f64 = 1.0 / (STEP * STEP * STEP);
const X_SMALL: f64 = 1.0 / (STEP * STEP);
const SMALL: f64 = 1.0 / STEP;
const MEDIUM: f64 = 1.0;
const LARGE: f64 = STEP;
const X_LARGE: f64 = STEP * STEP;
const XX_LARGE: f64 = STEP * STEP * STEP;

const XXX_SMALL: f64 = XX_SMALL / STEP;
const XXXX_SMALL: f64 = XXX_SMALL / STEP;
const XXXXX_SMALL: f64 = XXXX_SMALL / STEP;
const XXX_LARGE: f64 = XX_LARGE * STEP;
const XXXX_LARGE: f64 = XXX_LARGE * STEP;
const XXXXX_LARGE: f64 = XXXX_LARGE * STEP;

pub const MINIMUM: f64 = XXXXX_SMALL / STEP;
pub const MAXIMUM: f64 = XXXXX_LARGE * STEP;

/// Every rung, ascending.
pub const LADDER: [f64; 15] = [
    MINIMUM,
    XXXXX_SMALL,
    XXXX_SMALL,
    XXX_SMALL,
    XX_SMALL,
    X_SMALL,
    SMALL,
    MEDIUM,
    LARGE,
    X_LARGE,
    XX_LARGE,
    XXX_LARGE,
    XXXX_LARGE,
    XXXXX_LARGE,
    MAXIMUM,
];

/// Smallest rung above `current`, or `current` at the top.
pub fn next(current: f64) -> f64 {
    LADDER
        .iter()
        .copied()
        .find(|rung| rung - current > EPSILON)
        .unwrap_or(current)
}

/// Largest rung below `current`, or `current` at the bottom.
pub fn previous(current: f64) -> f64 {
    LADDER
        .iter()
        .rev()
        .copied()
        .find(|rung| current - rung > EPSILON)
        .unwrap_or(current)
}

/// The scale captured when the config was last applied.
pub fn reset(baseline: f64) -> f64 {
    baseline
}

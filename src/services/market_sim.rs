//! Random-number helpers shared by every simulated feed.
//!
//! All generators take the RNG as a parameter so tests can drive them with a
//! seeded `StdRng`; the timer tasks use one entropy-seeded RNG per task.

use rand::Rng;

/// Below this the change-percent base is treated as zero.
const MIN_PERCENT_BASE: f64 = 1e-6;

/// Uniform draw in `[-span / 2, span / 2)`.
pub fn delta<R: Rng + ?Sized>(rng: &mut R, span: f64) -> f64 {
    (rng.gen_range(0.0..1.0) - 0.5) * span
}

/// Uniform draw in `[0, max)`.
pub fn up_to<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
    rng.gen_range(0.0..1.0) * max
}

/// Percent change relative to the implied previous close (`price - change`).
///
/// Returns 0 when that base is (close to) zero instead of dividing by it.
pub fn change_percent(price: f64, change: f64) -> f64 {
    let base = price - change;
    if !base.is_finite() || base.abs() < MIN_PERCENT_BASE {
        return 0.0;
    }
    (change / base) * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteStep {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// One perturbation step: price moves by U[-1, 1), the day change follows by
/// `change_weight` of that move, and change % is recomputed.
pub fn perturb_quote<R: Rng + ?Sized>(
    rng: &mut R,
    price: f64,
    change: f64,
    change_weight: f64,
) -> QuoteStep {
    let step = delta(rng, 2.0);
    let price = price + step;
    let change = change + step * change_weight;

    QuoteStep {
        price,
        change,
        change_percent: change_percent(price, change),
    }
}

//! Token-cost estimate shown under the report.
//!
//! Rates are per million tokens in USD, converted with a fixed multiplier.
//! The arithmetic stays in integers (units of 1e-8) so half-way values round
//! up the way a reader doing the math by hand would expect.

use super::models::TokenUsage;

/// USD per million input tokens, in cents.
const INPUT_CENTS_PER_MILLION: u128 = 15;
/// USD per million output tokens, in cents.
const OUTPUT_CENTS_PER_MILLION: u128 = 60;
/// USD → INR.
const CURRENCY_MULTIPLIER: u128 = 85;
pub const CURRENCY_SYMBOL: &str = "₹";

/// cents × 1e-6 → 1e-8 currency units.
const UNITS_PER_WHOLE: u128 = 100_000_000;
const DISPLAY_DECIMALS: u32 = 4;

fn cost_units(usage: &TokenUsage) -> u128 {
    (usage.input as u128 * INPUT_CENTS_PER_MILLION
        + usage.output as u128 * OUTPUT_CENTS_PER_MILLION)
        * CURRENCY_MULTIPLIER
}

/// Estimated cost as a float, for JSON consumers.
pub fn estimate_cost(usage: &TokenUsage) -> f64 {
    cost_units(usage) as f64 / UNITS_PER_WHOLE as f64
}

/// Estimated cost formatted to four decimal places, rounding half up.
pub fn format_cost(usage: &TokenUsage) -> String {
    let step = UNITS_PER_WHOLE / 10u128.pow(DISPLAY_DECIMALS);
    let scaled = (cost_units(usage) + step / 2) / step;
    let scale = 10u128.pow(DISPLAY_DECIMALS);
    format!(
        "{}.{:0width$}",
        scaled / scale,
        scaled % scale,
        width = DISPLAY_DECIMALS as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(input: u64, output: u64) -> TokenUsage {
        TokenUsage {
            input,
            output,
            total: input + output,
        }
    }

    #[test]
    fn test_half_way_cost_rounds_up() {
        // (1000/1e6 × 0.15 + 500/1e6 × 0.60) × 85 = 0.03825
        assert_eq!(format_cost(&usage(1000, 500)), "0.0383");
        assert!((estimate_cost(&usage(1000, 500)) - 0.03825).abs() < 1e-12);
    }

    #[test]
    fn test_zero_usage_is_free() {
        assert_eq!(format_cost(&usage(0, 0)), "0.0000");
    }

    #[test]
    fn test_large_usage_carries_into_whole_units() {
        // 1M input + 1M output = (0.15 + 0.60) × 85 = 63.75
        assert_eq!(format_cost(&usage(1_000_000, 1_000_000)), "63.7500");
    }

    #[test]
    fn test_below_half_step_rounds_down() {
        // 3 input tokens → 3 × 15 × 85 = 3825 units = 0.00003825
        assert_eq!(format_cost(&usage(3, 0)), "0.0000");
    }
}

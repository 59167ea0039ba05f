//! RMB to USD display conversion.
//!
//! Quotes are always priced in RMB. The USD figure shown next to the price
//! input is an estimate at a fixed, documented rate and is never persisted.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// RMB per USD. 1 RMB = 0.138 USD.
pub fn exchange_rate() -> Decimal {
    Decimal::new(725, 2)
}

pub fn exchange_rate_label() -> &'static str {
    "Exchange rate: 1 RMB = 0.138 USD (1:7.25)"
}

/// Converts a positive RMB amount to USD rounded to cents. Returns `None` for
/// zero or negative input so callers can suppress the estimate entirely.
pub fn convert_rmb_to_usd(price_rmb: Decimal) -> Option<Decimal> {
    if price_rmb <= Decimal::ZERO {
        return None;
    }

    let usd = price_rmb.checked_div(exchange_rate())?;
    Some(usd.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Parses raw price input the way the price field accepts it: surrounding
/// whitespace is ignored, anything that is not a plain decimal is rejected.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Display string for the USD estimate of raw price input, or `None` when the
/// estimate must not be shown (empty, non-numeric or non-positive input).
pub fn usd_estimate(raw_price: &str) -> Option<String> {
    parse_amount(raw_price).and_then(convert_rmb_to_usd).map(format_usd)
}

pub fn format_usd(amount: Decimal) -> String {
    format!("${amount:.2}")
}

pub fn format_rmb(amount: Decimal) -> String {
    format!("¥{amount:.2}")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        convert_rmb_to_usd, exchange_rate, format_rmb, format_usd, parse_amount, usd_estimate,
    };

    #[test]
    fn converts_with_fixed_rate_and_rounds_to_cents() {
        assert_eq!(convert_rmb_to_usd(Decimal::new(150, 0)), Some(Decimal::new(2069, 2)));
        assert_eq!(convert_rmb_to_usd(Decimal::new(100, 0)), Some(Decimal::new(1379, 2)));
        assert_eq!(convert_rmb_to_usd(exchange_rate()), Some(Decimal::ONE));
        assert_eq!(convert_rmb_to_usd(Decimal::new(1, 2)), Some(Decimal::ZERO));
    }

    #[test]
    fn non_positive_prices_have_no_conversion() {
        assert_eq!(convert_rmb_to_usd(Decimal::ZERO), None);
        assert_eq!(convert_rmb_to_usd(Decimal::new(-500, 2)), None);
    }

    #[test]
    fn conversion_is_monotonic() {
        let mut previous = Decimal::ZERO;
        for cents in (1..5_000).step_by(37) {
            let usd = convert_rmb_to_usd(Decimal::new(cents, 2)).expect("positive price converts");
            assert!(usd >= previous, "conversion decreased at {cents} cents");
            previous = usd;
        }
    }

    #[test]
    fn estimate_is_suppressed_for_unusable_input() {
        for raw in ["", "   ", "abc", "12,50", "0", "0.00", "-3", "NaN"] {
            assert_eq!(usd_estimate(raw), None, "estimate shown for {raw:?}");
        }
    }

    #[test]
    fn estimate_is_formatted_as_two_decimal_currency() {
        assert_eq!(usd_estimate("150").as_deref(), Some("$20.69"));
        assert_eq!(usd_estimate(" 7.25 ").as_deref(), Some("$1.00"));
    }

    #[test]
    fn parse_amount_trims_input() {
        assert_eq!(parse_amount(" 99.5 "), Some(Decimal::new(995, 1)));
        assert_eq!(parse_amount("ninety"), None);
    }

    #[test]
    fn formats_both_currencies() {
        assert_eq!(format_usd(Decimal::new(5, 0)), "$5.00");
        assert_eq!(format_rmb(Decimal::new(15_050, 2)), "¥150.50");
    }
}

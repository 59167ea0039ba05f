use quoteflow_core::currency::{
    convert_rmb_to_usd, exchange_rate_label, format_rmb, format_usd, parse_amount,
};
use rust_decimal::Decimal;

use crate::commands::CommandResult;

pub fn run(raw_price: &str) -> CommandResult {
    let Some(price) = parse_amount(raw_price) else {
        return CommandResult::failure(
            "convert",
            "invalid_amount",
            format!("`{}` is not a decimal RMB amount", raw_price.trim()),
            2,
        );
    };

    match convert_rmb_to_usd(price) {
        Some(usd) => CommandResult::success("convert", render(price, usd)),
        None => CommandResult::failure(
            "convert",
            "non_positive_amount",
            "no USD estimate for a price of zero or less",
            2,
        ),
    }
}

fn render(price: Decimal, usd: Decimal) -> String {
    format!("{} = {} ({})", format_rmb(price), format_usd(usd), exchange_rate_label())
}

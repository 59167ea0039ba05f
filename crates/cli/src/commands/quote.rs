use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;
use quoteflow_core::audit::InMemoryAuditSink;
use quoteflow_core::catalog::FormConfigRegistry;
use quoteflow_core::config::{AppConfig, LoadOptions};
use quoteflow_core::currency::{convert_rmb_to_usd, format_rmb, format_usd};
use quoteflow_core::domain::product::{Product, ProductId};
use quoteflow_core::flows::{QuoteDialog, SubmitOutcome, TranslateOutcome};
use quoteflow_core::submission::InMemoryQuoteBook;
use quoteflow_core::translation::Language;
use quoteflow_translate::GoogleTranslateGateway;
use tokio::runtime::Runtime;
use tracing::info;

use crate::commands::{build_runtime, CommandResult};

const COMMAND: &str = "quote";

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    #[arg(long, help = "Product identifier")]
    pub product_id: String,
    #[arg(long, help = "Product SKU")]
    pub sku: String,
    #[arg(long, default_value = "", help = "Product WLID")]
    pub wlid: String,
    #[arg(long, help = "Product series, e.g. Wig or Topper")]
    pub series: String,
    #[arg(long, help = "Quoted price in RMB")]
    pub price: String,
    #[arg(long, help = "Delivery date as YYYY-MM-DD, after today")]
    pub delivery_date: String,
    #[arg(long, default_value = "", help = "Message to the buyer, at most 300 characters")]
    pub message: String,
    #[arg(long, help = "Translate the message to en, de or zh before submitting")]
    pub translate_to: Option<String>,
    #[arg(long, default_value = "cli", help = "Supplier recorded on the quote")]
    pub supplier: String,
}

pub fn run(options: &LoadOptions, args: &QuoteArgs) -> CommandResult {
    if FormConfigRegistry.get_config(args.series.trim()).is_none() {
        return CommandResult::failure(
            COMMAND,
            "unknown_series",
            format!("no form table for series `{}`", args.series.trim()),
            3,
        );
    }
    let delivery_date = match NaiveDate::parse_from_str(args.delivery_date.trim(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            return CommandResult::failure(
                COMMAND,
                "invalid_date",
                format!("`{}` is not a YYYY-MM-DD date", args.delivery_date.trim()),
                2,
            )
        }
    };
    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure(COMMAND, "runtime", format!("{error:#}"), 5),
    };

    let product = Product {
        id: ProductId(args.product_id.trim().to_string()),
        sku: args.sku.clone(),
        wlid: args.wlid.clone(),
        series: args.series.trim().to_string(),
    };
    let book = InMemoryQuoteBook::new(args.supplier.clone());
    let audit = InMemoryAuditSink::default();
    let mut dialog = QuoteDialog::new(product.clone(), None)
        .with_actor(args.supplier.clone())
        .with_audit_sink(Arc::new(audit.clone()));

    let edited = dialog
        .open()
        .and_then(|()| dialog.set_price(args.price.as_str()))
        .and_then(|()| dialog.set_delivery_date(Some(delivery_date)))
        .and_then(|()| dialog.set_message(args.message.as_str()));
    if let Err(error) = edited {
        return CommandResult::application_failure(COMMAND, &error);
    }

    if let Some(target) = &args.translate_to {
        if let Err(result) = translate_message(options, &runtime, &mut dialog, target) {
            return result;
        }
    }

    let outcome = match runtime.block_on(dialog.submit(&book)) {
        Ok(outcome) => outcome,
        Err(error) => return CommandResult::application_failure(COMMAND, &error),
    };
    match outcome {
        SubmitOutcome::Submitted => {}
        SubmitOutcome::Failed(error) => return CommandResult::application_failure(COMMAND, &error),
        SubmitOutcome::Stale => {
            return CommandResult::failure(COMMAND, "stale_result", "submission result was discarded", 5)
        }
    }

    let Some(quote) = runtime.block_on(book.quote_for(&product.id)) else {
        return CommandResult::failure(COMMAND, "internal", "submitted quote was not recorded", 5);
    };
    info!(
        event_name = "cli.quote.submitted",
        product_id = %quote.product_id,
        quote_id = %quote.id.0,
        audit_records = audit.records().len(),
        "quote workflow completed"
    );

    let estimate =
        convert_rmb_to_usd(quote.price).map(format_usd).unwrap_or_else(|| "-".to_string());
    CommandResult::success(
        COMMAND,
        format!(
            "quote {} saved for {} ({}): {} (~{}), delivery {}, message: {:?}",
            quote.id.0,
            quote.product_id,
            product.series,
            format_rmb(quote.price),
            estimate,
            quote.delivery_date,
            quote.notes
        ),
    )
}

fn translate_message(
    options: &LoadOptions,
    runtime: &Runtime,
    dialog: &mut QuoteDialog,
    target: &str,
) -> Result<(), CommandResult> {
    let target = target.parse::<Language>().map_err(|error| {
        CommandResult::failure(COMMAND, "unsupported_language", error.to_string(), 2)
    })?;
    let config = AppConfig::load(options.clone())
        .map_err(|error| CommandResult::config_failure(COMMAND, &error))?;
    let gateway = GoogleTranslateGateway::from_config(&config.translation)
        .map_err(|error| CommandResult::failure(COMMAND, "client_build", error.to_string(), 5))?;

    match runtime.block_on(dialog.translate(&gateway, target)) {
        Ok(TranslateOutcome::Applied { .. }) => Ok(()),
        Ok(TranslateOutcome::Failed(error)) | Err(error) => {
            Err(CommandResult::application_failure(COMMAND, &error))
        }
        Ok(TranslateOutcome::Stale) => {
            Err(CommandResult::failure(COMMAND, "stale_result", "translation result was discarded", 5))
        }
    }
}

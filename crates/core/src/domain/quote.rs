use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::ProductId;

/// Upper bound on quote notes, counted in characters rather than bytes.
pub const MAX_NOTES_CHARS: usize = 300;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

impl QuoteId {
    pub fn generate() -> Self {
        Self(format!("Q-{}", Uuid::new_v4().simple()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub product_id: ProductId,
    /// Offered unit price in RMB.
    pub price: Decimal,
    pub delivery_date: NaiveDate,
    pub notes: String,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
}

/// Validated payload handed to the submit callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSubmission {
    pub product_id: ProductId,
    pub price: Decimal,
    pub delivery_date: NaiveDate,
    pub message: String,
    /// Present when the supplier is revising a quote they already submitted.
    pub existing_quote: Option<Quote>,
}

impl QuoteSubmission {
    pub fn is_update(&self) -> bool {
        self.existing_quote.is_some()
    }

    /// Builds the quote this submission stands for. Updates keep the id of the
    /// quote they supersede.
    pub fn into_quote(self, submitted_by: impl Into<String>, submitted_at: DateTime<Utc>) -> Quote {
        let id = self.existing_quote.map(|quote| quote.id).unwrap_or_else(QuoteId::generate);
        Quote {
            id,
            product_id: self.product_id,
            price: self.price,
            delivery_date: self.delivery_date,
            notes: self.message,
            submitted_by: submitted_by.into(),
            submitted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use crate::domain::product::ProductId;

    use super::{Quote, QuoteId, QuoteSubmission};

    fn submission(existing_quote: Option<Quote>) -> QuoteSubmission {
        QuoteSubmission {
            product_id: ProductId("prd-wig-001".to_owned()),
            price: Decimal::new(15_000, 2),
            delivery_date: NaiveDate::from_ymd_opt(2026, 11, 30).expect("valid date"),
            message: "urgent".to_owned(),
            existing_quote,
        }
    }

    #[test]
    fn new_submission_gets_fresh_quote_id() {
        let quote = submission(None).into_quote("supplier-7", Utc::now());

        assert!(quote.id.0.starts_with("Q-"));
        assert_eq!(quote.notes, "urgent");
        assert_eq!(quote.submitted_by, "supplier-7");
    }

    #[test]
    fn update_submission_keeps_existing_quote_id() {
        let existing = submission(None).into_quote("supplier-7", Utc::now());
        let existing_id = existing.id.clone();

        let update = submission(Some(existing));
        assert!(update.is_update());

        let quote = update.into_quote("supplier-7", Utc::now());
        assert_eq!(quote.id, existing_id);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(QuoteId::generate(), QuoteId::generate());
    }
}

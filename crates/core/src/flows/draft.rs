use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency;
use crate::domain::quote::{Quote, MAX_NOTES_CHARS};
use crate::errors::ValidationError;

/// Editable fields of one dialog session. Price is kept as typed so the input
/// round-trips exactly; it is only parsed on validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QuoteDraft {
    price: String,
    delivery_date: Option<NaiveDate>,
    message: String,
}

impl QuoteDraft {
    pub fn from_quote(source: Option<&Quote>) -> Self {
        let mut draft = Self::default();
        draft.reset(source);
        draft
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn delivery_date(&self) -> Option<NaiveDate> {
        self.delivery_date
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn message_chars(&self) -> usize {
        self.message.chars().count()
    }

    pub fn set_price(&mut self, raw: impl Into<String>) {
        self.price = raw.into();
    }

    pub fn set_delivery_date(&mut self, date: Option<NaiveDate>) {
        self.delivery_date = date;
    }

    /// Replaces the message, refusing input over the character cap. A refused
    /// value leaves the current message untouched.
    pub fn set_message(&mut self, message: impl Into<String>) -> Result<(), ValidationError> {
        let message = message.into();
        let length = message.chars().count();
        if length > MAX_NOTES_CHARS {
            return Err(ValidationError::MessageTooLong { length, max: MAX_NOTES_CHARS });
        }
        self.message = message;
        Ok(())
    }

    pub fn reset(&mut self, source: Option<&Quote>) {
        match source {
            Some(quote) => {
                self.price = quote.price.normalize().to_string();
                self.delivery_date = Some(quote.delivery_date);
                self.message = quote.notes.clone();
            }
            None => *self = Self::default(),
        }
    }

    pub fn usd_estimate(&self) -> Option<String> {
        currency::usd_estimate(&self.price)
    }

    /// Required inputs that have not been provided at all. Malformed values are
    /// reported by `validate`.
    pub fn missing_required_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.price.trim().is_empty() {
            missing.push("price".to_string());
        }
        if self.delivery_date.is_none() {
            missing.push("delivery_date".to_string());
        }
        missing
    }

    /// Parsed price and delivery date, provided the draft can be submitted on
    /// `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<(Decimal, NaiveDate), ValidationError> {
        if self.price.trim().is_empty() {
            return Err(ValidationError::MissingPrice);
        }
        let price = currency::parse_amount(&self.price)
            .ok_or_else(|| ValidationError::InvalidPrice(self.price.clone()))?;
        if price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice);
        }

        let date = self.delivery_date.ok_or(ValidationError::MissingDeliveryDate)?;
        if date <= today {
            return Err(ValidationError::DeliveryDateNotInFuture { date, today });
        }

        let length = self.message_chars();
        if length > MAX_NOTES_CHARS {
            return Err(ValidationError::MessageTooLong { length, max: MAX_NOTES_CHARS });
        }

        Ok((price, date))
    }
}

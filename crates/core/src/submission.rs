use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::product::ProductId;
use crate::domain::quote::{Quote, QuoteSubmission};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("quote submission rejected: {message}")]
pub struct SubmissionError {
    pub message: String,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// The only persistence boundary of the quote dialog. Implementations decide
/// where and how the quote is stored.
#[async_trait]
pub trait QuoteSubmitter: Send + Sync {
    async fn submit(&self, submission: QuoteSubmission) -> Result<(), SubmissionError>;
}

/// Quotes of a single supplier session, keyed by product. A second submission
/// for the same product replaces the first.
pub struct InMemoryQuoteBook {
    supplier: String,
    quotes: RwLock<HashMap<ProductId, Quote>>,
}

impl InMemoryQuoteBook {
    pub fn new(supplier: impl Into<String>) -> Self {
        Self { supplier: supplier.into(), quotes: RwLock::new(HashMap::new()) }
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub async fn quote_for(&self, product_id: &ProductId) -> Option<Quote> {
        self.quotes.read().await.get(product_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.quotes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.quotes.read().await.is_empty()
    }
}

#[async_trait]
impl QuoteSubmitter for InMemoryQuoteBook {
    async fn submit(&self, submission: QuoteSubmission) -> Result<(), SubmissionError> {
        let mut quotes = self.quotes.write().await;

        if let Some(existing) = &submission.existing_quote {
            let current = quotes.get(&submission.product_id).map(|quote| &quote.id);
            if current != Some(&existing.id) {
                return Err(SubmissionError::new(format!(
                    "quote {} is no longer the current quote for product {}",
                    existing.id.0, submission.product_id
                )));
            }
        }

        let product_id = submission.product_id.clone();
        let quote = submission.into_quote(self.supplier.clone(), Utc::now());
        quotes.insert(product_id, quote);
        Ok(())
    }
}

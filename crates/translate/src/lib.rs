//! HTTP translation provider for the quote dialog.

pub mod google;

pub use google::{GatewayError, GoogleTranslateGateway};

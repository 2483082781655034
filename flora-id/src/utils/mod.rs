//! Utility modules for flora-id

pub mod retry;

pub use retry::{retry_fixed, RetryPolicy};

pub mod checker;
pub mod classifier;
pub mod client;
pub mod error;
pub mod logger;
pub mod models;
pub mod parser;
pub mod provider;
pub mod proxy;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use checker::{PhoneChecker, ProviderChecker};
pub use classifier::MarkType;
pub use client::RetrievalClient;
pub use error::{ConfigError, FetchError, UnknownProvider};
pub use models::MarkRecord;
pub use parser::parse;
pub use provider::Provider;
pub use proxy::ProxySettings;

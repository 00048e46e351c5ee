use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::RetrievalClient;
use crate::error::FetchError;
use crate::models::MarkRecord;
use crate::parser::parse;
use crate::provider::{search_url, Provider};
use crate::proxy::ProxySettings;

/// Checks phone numbers against a single provider.
#[derive(Debug, Clone)]
pub struct ProviderChecker {
    provider: Provider,
    client: Arc<RetrievalClient>,
    search_base: String,
}

impl ProviderChecker {
    pub fn new(provider: Provider, client: Arc<RetrievalClient>) -> Self {
        Self {
            provider,
            client,
            search_base: provider.search_base().to_string(),
        }
    }

    /// Query a different endpoint, e.g. a mirror. The phone number is URL-encoded
    /// and appended to it.
    pub fn with_search_base(mut self, search_base: impl Into<String>) -> Self {
        self.search_base = search_base.into();
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Fetch and parse the provider page, keeping retrieval failures distinct
    /// from "no mark found".
    pub fn try_check(&self, phone: &str) -> Result<MarkRecord, FetchError> {
        let url = search_url(&self.search_base, phone);
        let body = self.client.fetch(&url)?;
        debug!(provider = %self.provider, phone, bytes = body.len(), "Fetched search page");
        Ok(parse(self.provider, &body))
    }

    /// Like [`ProviderChecker::try_check`], but a retrieval failure yields the
    /// "no mark" sentinel. Callers that must tell "clean number" from "could not
    /// check" should use `try_check`.
    pub fn check(&self, phone: &str) -> MarkRecord {
        match self.try_check(phone) {
            Ok(record) => record,
            Err(e) => {
                warn!(provider = %self.provider, phone, error = %e, "Check failed, reporting no mark");
                MarkRecord::no_mark(self.provider)
            }
        }
    }
}

/// Checks phone numbers against every provider over one shared client.
#[derive(Debug, Clone)]
pub struct PhoneChecker {
    client: Arc<RetrievalClient>,
    search_bases: HashMap<Provider, String>,
}

impl PhoneChecker {
    pub fn new(settings: &ProxySettings) -> Result<Self, FetchError> {
        Ok(Self::with_client(Arc::new(RetrievalClient::new(settings)?)))
    }

    pub fn with_client(client: Arc<RetrievalClient>) -> Self {
        Self {
            client,
            search_bases: HashMap::new(),
        }
    }

    pub fn with_search_base(mut self, provider: Provider, search_base: impl Into<String>) -> Self {
        self.search_bases.insert(provider, search_base.into());
        self
    }

    pub fn checker(&self, provider: Provider) -> ProviderChecker {
        let checker = ProviderChecker::new(provider, Arc::clone(&self.client));
        match self.search_bases.get(&provider) {
            Some(base) => checker.with_search_base(base.clone()),
            None => checker,
        }
    }

    pub fn check_provider(&self, provider: Provider, phone: &str) -> MarkRecord {
        self.checker(provider).check(phone)
    }

    pub fn try_check_provider(&self, provider: Provider, phone: &str) -> Result<MarkRecord, FetchError> {
        self.checker(provider).try_check(phone)
    }

    /// Check every provider concurrently; records come back in `Provider::ALL` order.
    pub fn check_all(&self, phone: &str) -> Vec<MarkRecord> {
        Provider::ALL
            .par_iter()
            .map(|provider| self.check_provider(*provider, phone))
            .collect()
    }
}

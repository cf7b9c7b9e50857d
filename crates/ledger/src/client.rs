//! REST ledger client implementation.
//!
//! This module provides [`RestLedger`], a [`LedgerStore`] backed by the
//! library's REST API.

use std::time::Duration;

use libcard_protocol::record::PlacingUpdate;
use libcard_protocol::{PlacingNumber, Record, RecordId, Transaction};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result, api_message};
use crate::store::LedgerStore;

/// Where the ledger lives and how to reach it.
#[derive(Debug, Clone)]
pub struct LedgerEndpoint {
    /// API root, e.g. `https://library.example.edu/api`.
    pub base_url: String,
    /// Student whose card is being edited.
    pub student_id: String,
    /// Bearer token, if the API requires one.
    pub api_key: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// The transaction list either bare or wrapped in a paginated envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum TransactionList {
    Bare(Vec<Transaction>),
    Paged { results: Vec<Transaction> },
}

impl From<TransactionList> for Vec<Transaction> {
    fn from(list: TransactionList) -> Self {
        match list {
            TransactionList::Bare(transactions) | TransactionList::Paged { results: transactions } => {
                transactions
            }
        }
    }
}

/// REST ledger client with optional bearer authentication.
///
/// # Security
///
/// The API key is held as a [`SecretString`] and the authorization header
/// is marked sensitive so it never shows up in debug output.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use libcard_ledger::{LedgerEndpoint, LedgerStore, RestLedger};
///
/// # async fn example() -> libcard_ledger::Result<()> {
/// let ledger = RestLedger::new(LedgerEndpoint {
///     base_url: "https://library.example.edu/api".to_string(),
///     student_id: "2024-00117".to_string(),
///     api_key: None,
///     timeout: Duration::from_secs(30),
/// })?;
///
/// let transactions = ledger.fetch_transactions().await?;
/// println!("{} transactions", transactions.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RestLedger {
    http: reqwest::Client,
    base_url: String,
    student_id: String,
    authenticated: bool,
}

impl RestLedger {
    /// Creates a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`] if the API key cannot be used as a
    /// header value, and [`Error::Http`] if the HTTP client fails to build.
    #[instrument(skip(endpoint), fields(base_url = %endpoint.base_url, authenticated = endpoint.api_key.is_some()))]
    pub fn new(endpoint: LedgerEndpoint) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &endpoint.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                .map_err(|_| Error::InvalidSettings {
                    reason: "API key contains characters not allowed in a header".to_string(),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(endpoint.timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| Error::Http {
                endpoint: "client_init".to_string(),
                source,
            })?;

        debug!("created ledger client");
        Ok(Self {
            http,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            student_id: endpoint.student_id,
            authenticated: endpoint.api_key.is_some(),
        })
    }

    /// Returns whether requests carry an API key.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// The API root requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn error_from(endpoint: String, resp: reqwest::Response) -> Error {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = api_message(&body);
        warn!(%endpoint, status, %message, "ledger request rejected");
        Error::Api {
            endpoint,
            status,
            message,
        }
    }
}

impl LedgerStore for RestLedger {
    /// Calls `GET {base_url}/transactions/?student_id={id}`.
    #[instrument(skip(self), fields(student_id = %self.student_id))]
    async fn fetch_transactions(&self) -> Result<Vec<Transaction>> {
        let endpoint = "GET /transactions/".to_string();
        let url = format!("{}/transactions/", self.base_url);

        let resp = self
            .http
            .get(&url)
            .query(&[("student_id", self.student_id.as_str())])
            .send()
            .await
            .map_err(|source| Error::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(Self::error_from(endpoint, resp).await);
        }

        let list: TransactionList = resp.json().await.map_err(|source| Error::Deserialization {
            endpoint,
            source,
        })?;
        let transactions: Vec<Transaction> = list.into();
        debug!(count = transactions.len(), "fetched transactions");
        Ok(transactions)
    }

    /// Calls `PATCH {base_url}/records/{record_id}/` with
    /// `{"placing_number": n}`.
    #[instrument(skip(self))]
    async fn update_placing_number(
        &self,
        record_id: RecordId,
        placing_number: PlacingNumber,
    ) -> Result<Record> {
        let endpoint = format!("PATCH /records/{record_id}/");
        let url = format!("{}/records/{record_id}/", self.base_url);

        let resp = self
            .http
            .patch(&url)
            .json(&PlacingUpdate { placing_number })
            .send()
            .await
            .map_err(|source| Error::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            warn!(record_id, "record not found");
            return Err(Error::RecordNotFound(record_id));
        }
        if !resp.status().is_success() {
            return Err(Self::error_from(endpoint, resp).await);
        }

        let record: Record = resp.json().await.map_err(|source| Error::Deserialization {
            endpoint,
            source,
        })?;
        debug!(record_id, placing_number, "placing number updated");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(key: Option<&str>) -> LedgerEndpoint {
        LedgerEndpoint {
            base_url: "http://127.0.0.1:9/api/".to_string(),
            student_id: "s-1".to_string(),
            api_key: key.map(|k| SecretString::from(k.to_string())),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let ledger = RestLedger::new(endpoint(None)).expect("client");
        assert_eq!(ledger.base_url(), "http://127.0.0.1:9/api");
        assert!(!ledger.is_authenticated());
    }

    #[test]
    fn key_with_newline_is_rejected() {
        let err = RestLedger::new(endpoint(Some("abc\ndef"))).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings { .. }));
    }

    #[test]
    fn debug_output_hides_key() {
        let ledger = RestLedger::new(endpoint(Some("sk-secret-value"))).expect("client");
        assert!(ledger.is_authenticated());
        assert!(!format!("{ledger:?}").contains("sk-secret-value"));
    }

    #[test]
    fn paged_transaction_list_unwraps() {
        let list: TransactionList = serde_json::from_str(r#"{"count":0,"results":[]}"#).expect("parse");
        let transactions: Vec<Transaction> = list.into();
        assert!(transactions.is_empty());
    }
}

//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

pub mod error;
pub mod types;

use emi_market_common_types::Address;
use log::*;
use reqwest::{
    header::{self, HeaderMap},
    IntoUrl,
    StatusCode,
    Url,
};

pub use crate::{
    error::LedgerClientError,
    types::{AddPaymentRequest, PaymentReceipt},
};

const LOG_TARGET: &str = "market::ledger_client";

/// Client for the off-chain payment ledger backend.
///
/// The ledger is the store of record for receipts; this client only produces
/// and consumes them. Posting the same transaction hash twice is safe: the
/// backend dedups on it, so a retried `post_payment` never creates a second
/// receipt.
#[derive(Debug, Clone)]
pub struct PaymentLedgerClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl PaymentLedgerClient {
    pub fn connect<T: IntoUrl>(endpoint: T) -> Result<Self, LedgerClientError> {
        let client = reqwest::Client::builder()
            .default_headers({
                let mut headers = HeaderMap::with_capacity(1);
                headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
                headers
            })
            .build()?;

        let mut endpoint = endpoint.into_url()?;
        // Url::join treats a path without a trailing slash as a file segment.
        if !endpoint.path().ends_with('/') {
            endpoint.set_path(&format!("{}/", endpoint.path()));
        }

        Ok(Self { client, endpoint })
    }

    /// Records a confirmed on-chain payment. Returns `Ok(())` on HTTP 200,
    /// including repeat posts of an already-recorded transaction hash.
    pub async fn post_payment(&self, request: &AddPaymentRequest) -> Result<(), LedgerClientError> {
        let url = self.url("add-payment")?;
        debug!(
            target: LOG_TARGET,
            "POST {} (tx {})", url, request.payment_details.transaction_hash
        );
        let resp = self.client.post(url.clone()).json(request).send().await?;
        check_status(&url, resp.status(), resp.text().await.unwrap_or_default())
    }

    /// Fetches the payment history for an account, newest first. The backend
    /// is expected to return receipts ordered by creation time; the list is
    /// re-sorted here so callers can rely on descending date order
    /// regardless.
    pub async fn user_payments(&self, account: &Address) -> Result<Vec<PaymentReceipt>, LedgerClientError> {
        let url = self.url(&format!("user-payments/{}", account))?;
        debug!(target: LOG_TARGET, "GET {}", url);
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        check_status(&url, status, body.clone())?;

        let mut receipts: Vec<PaymentReceipt> =
            serde_json::from_str(&body).map_err(|source| LedgerClientError::DeserializeResponse {
                endpoint: url.to_string(),
                source,
            })?;
        receipts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(receipts)
    }

    fn url(&self, path: &str) -> Result<Url, LedgerClientError> {
        self.endpoint
            .join(path)
            .map_err(|e| LedgerClientError::InvalidEndpoint { message: e.to_string() })
    }
}

fn check_status(url: &Url, status: StatusCode, body: String) -> Result<(), LedgerClientError> {
    if status == StatusCode::OK {
        return Ok(());
    }
    warn!(target: LOG_TARGET, "Request to {} failed with status {}", url, status);
    Err(LedgerClientError::RequestFailedWithStatus {
        endpoint: url.to_string(),
        code: status.as_u16(),
        message: body,
    })
}

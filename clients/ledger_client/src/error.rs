//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

#[derive(Debug, thiserror::Error)]
pub enum LedgerClientError {
    #[error("Failed to send request: {source}")]
    RequestFailed {
        #[from]
        source: reqwest::Error,
    },
    #[error("Ledger request to {endpoint} failed: status {code}: {message}")]
    RequestFailedWithStatus {
        endpoint: String,
        code: u16,
        message: String,
    },
    #[error("Failed to deserialize response from {endpoint}: {source}")]
    DeserializeResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid ledger endpoint: {message}")]
    InvalidEndpoint { message: String },
}

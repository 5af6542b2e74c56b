//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use chrono::{DateTime, Utc};
use emi_market_common_types::{Address, ProductId, TransactionHash};
use serde::{Deserialize, Serialize};

/// One recorded payment. Amounts are human-denomination decimal strings; the
/// chain boundary converts to base units before this type is ever built.
/// Receipts are append-only and deduplicated by the backend on
/// `transaction_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub product_id: ProductId,
    pub amount: String,
    pub date: DateTime<Utc>,
    pub transaction_hash: TransactionHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentRequest {
    pub user_id: Address,
    pub payment_details: PaymentReceipt,
}

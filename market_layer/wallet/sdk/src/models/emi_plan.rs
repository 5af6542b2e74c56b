//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use emi_market_common_types::{Address, Amount, ProductId};
use serde::{Deserialize, Serialize};

/// The installment plan for one (account, product) pair. The contract is the
/// source of truth; after the initial creation estimate the client never
/// computes the remaining amount itself, it re-reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiPlan {
    pub owner: Address,
    pub product_id: ProductId,
    pub tenure_months: u32,
    /// In base units.
    pub monthly_installment: Amount,
    /// In base units. Decreases with each payment; zero when settled.
    pub remaining_amount: Amount,
}

impl EmiPlan {
    pub fn is_settled(&self) -> bool {
        self.remaining_amount.is_zero()
    }
}

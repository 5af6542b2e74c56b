//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use async_trait::async_trait;
use emi_market_common_types::{optional::IsNotFoundError, Address, Amount, ProductId, TransactionHash};
use serde::{Deserialize, Serialize};

/// Read-side access to the deployed contract plus transaction status queries.
/// All amounts cross this boundary in base units.
#[async_trait]
pub trait ContractNetworkInterface: Send + Sync {
    type Error: std::error::Error + IsNotFoundError + Send + Sync + 'static;

    async fn product_count(&self) -> Result<u64, Self::Error>;

    async fn get_product(&self, product_id: ProductId) -> Result<ProductRecord, Self::Error>;

    /// Fails with a not-found error when no plan exists for the pair.
    async fn get_emi_plan(
        &self,
        owner: &Address,
        product_id: ProductId,
    ) -> Result<EmiPlanRecord, Self::Error>;

    async fn transaction_status(&self, hash: TransactionHash) -> Result<TransactionStatus, Self::Error>;
}

/// A product row as the contract returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in base units.
    pub price: Amount,
    pub seller: Address,
    pub rating: u8,
    pub image_link: String,
}

/// An EMI plan row as the contract returns it, in base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiPlanRecord {
    pub tenure_months: u32,
    pub monthly_installment: Amount,
    pub remaining_amount: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Rejected,
}

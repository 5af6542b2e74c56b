//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use async_trait::async_trait;
use emi_market_common_types::{Address, Amount, ProductId, TransactionHash};

/// Seam for the browser-resident wallet capability. The wallet holds the
/// signing key; the SDK only describes the call to sign and submit.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether a wallet capability is present in this environment at all.
    fn is_available(&self) -> bool;

    /// Prompts the user for account access. The first returned account is the
    /// active one.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletProviderError>;

    /// Signs and submits a contract call, returning as soon as the
    /// transaction has been accepted into the mempool. Finality must be
    /// awaited separately.
    async fn sign_and_send(&self, call: ContractCall) -> Result<TransactionHash, WalletProviderError>;
}

/// A fully-described contract invocation ready for signing. ABI encoding is
/// the wallet side's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub from: Address,
    pub contract: Address,
    pub chain_id: u64,
    pub method: ContractMethod,
    /// Currency attached to the call, in base units.
    pub value: Amount,
    /// Fixed upper bound on execution cost. No dynamic estimation.
    pub gas_limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractMethod {
    ListProduct {
        name: String,
        description: String,
        /// Unit price in base units.
        price: Amount,
        rating: u8,
        image_link: String,
    },
    CreateEmiPlan {
        product_id: ProductId,
        tenure_months: u32,
    },
    PayInstallment {
        product_id: ProductId,
    },
}

/// Outcomes a wallet can report. `UserRejected` and `InsufficientFunds` are
/// the two user-facing rejections the UI must distinguish (MetaMask reports
/// them as codes 4001 and -32000 respectively).
#[derive(Debug, thiserror::Error)]
pub enum WalletProviderError {
    #[error("No wallet capability is available")]
    Unavailable,
    #[error("The user rejected the request in the wallet")]
    UserRejected,
    #[error("Insufficient funds to cover the value and fees")]
    InsufficientFunds,
    #[error("Wallet provider error: {0}")]
    Provider(String),
}

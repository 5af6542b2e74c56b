//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use std::time::Duration;

use emi_market_common_types::{optional::IsNotFoundError, Address, Amount, ProductId, TransactionHash};
use log::*;
use tokio::time::{self, Instant};

use crate::{
    models::{EmiPlan, Product},
    network::{ContractNetworkInterface, TransactionStatus},
    provider::{ContractCall, ContractMethod, WalletProvider, WalletProviderError},
    MarketSdkConfig,
};

const LOG_TARGET: &str = "market::wallet_sdk::gateway";

const MAX_RATING: u8 = 5;

/// Opaque reference to a submitted, not-yet-final transaction. Returned by
/// every write immediately on submission; the effect is durable only once
/// [`ContractGateway::wait_for_confirmation`] succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionHandle {
    hash: TransactionHash,
}

impl TransactionHandle {
    pub fn hash(&self) -> TransactionHash {
        self.hash
    }
}

/// Typed wrapper around the one deployed marketplace contract. Address, chain
/// and gas parameters come from [`MarketSdkConfig`]; nothing is global.
///
/// Write calls take the signing account explicitly. Callers obtain it from
/// the session api, which is what enforces "no signer, no write".
pub struct ContractGateway<'a, TProvider, TNetwork> {
    provider: &'a TProvider,
    network: &'a TNetwork,
    config: &'a MarketSdkConfig,
}

impl<'a, TProvider, TNetwork> ContractGateway<'a, TProvider, TNetwork>
where
    TProvider: WalletProvider,
    TNetwork: ContractNetworkInterface,
{
    pub(crate) fn new(provider: &'a TProvider, network: &'a TNetwork, config: &'a MarketSdkConfig) -> Self {
        Self {
            provider,
            network,
            config,
        }
    }

    pub async fn get_product_count(&self) -> Result<u64, GatewayError> {
        self.network
            .product_count()
            .await
            .map_err(|e| GatewayError::CallFailed { details: e.to_string() })
    }

    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, GatewayError> {
        let record = self
            .network
            .get_product(product_id)
            .await
            .map_err(|e| GatewayError::CallFailed { details: e.to_string() })?;
        Ok(record.into())
    }

    pub async fn get_emi_plan(&self, owner: &Address, product_id: ProductId) -> Result<EmiPlan, GatewayError> {
        let record = self
            .network
            .get_emi_plan(owner, product_id)
            .await
            .map_err(|e| {
                if e.is_not_found_error() {
                    GatewayError::PlanNotFound {
                        owner: *owner,
                        product_id,
                    }
                } else {
                    GatewayError::CallFailed { details: e.to_string() }
                }
            })?;
        Ok(EmiPlan {
            owner: *owner,
            product_id,
            tenure_months: record.tenure_months,
            monthly_installment: record.monthly_installment,
            remaining_amount: record.remaining_amount,
        })
    }

    pub async fn list_product(
        &self,
        seller: &Address,
        name: String,
        description: String,
        price: Amount,
        rating: u8,
        image_link: String,
    ) -> Result<TransactionHandle, GatewayError> {
        if rating > MAX_RATING {
            return Err(GatewayError::InvalidRating { rating });
        }
        self.submit(seller, Amount::zero(), ContractMethod::ListProduct {
            name,
            description,
            price,
            rating,
            image_link,
        })
        .await
    }

    pub async fn create_emi_plan(
        &self,
        owner: &Address,
        product_id: ProductId,
        tenure_months: u32,
        value: Amount,
    ) -> Result<TransactionHandle, GatewayError> {
        self.submit(owner, value, ContractMethod::CreateEmiPlan {
            product_id,
            tenure_months,
        })
        .await
    }

    pub async fn pay_installment(
        &self,
        owner: &Address,
        product_id: ProductId,
        value: Amount,
    ) -> Result<TransactionHandle, GatewayError> {
        self.submit(owner, value, ContractMethod::PayInstallment { product_id })
            .await
    }

    /// Polls the transaction status until it is confirmed, the chain rejects
    /// it, or the configured confirmation timeout elapses.
    pub async fn wait_for_confirmation(&self, handle: &TransactionHandle) -> Result<(), GatewayError> {
        let hash = handle.hash();
        let deadline = Instant::now() + self.config.confirmation_timeout;
        loop {
            let status = self
                .network
                .transaction_status(hash)
                .await
                .map_err(|e| GatewayError::CallFailed { details: e.to_string() })?;
            match status {
                TransactionStatus::Confirmed => {
                    info!(target: LOG_TARGET, "Transaction {} confirmed", hash);
                    return Ok(());
                },
                TransactionStatus::Rejected => {
                    warn!(target: LOG_TARGET, "Transaction {} rejected by the chain", hash);
                    return Err(GatewayError::TransactionRejected { hash });
                },
                TransactionStatus::Pending => {
                    if Instant::now() >= deadline {
                        return Err(GatewayError::ConfirmationTimeout {
                            hash,
                            timeout: self.config.confirmation_timeout,
                        });
                    }
                    time::sleep(self.config.confirmation_poll_interval).await;
                },
            }
        }
    }

    async fn submit(
        &self,
        from: &Address,
        value: Amount,
        method: ContractMethod,
    ) -> Result<TransactionHandle, GatewayError> {
        let call = ContractCall {
            from: *from,
            contract: self.config.contract_address,
            chain_id: self.config.chain_id,
            method,
            value,
            gas_limit: self.config.gas_limit,
        };
        let hash = self.provider.sign_and_send(call).await?;
        info!(target: LOG_TARGET, "Submitted transaction with hash {}", hash);
        Ok(TransactionHandle { hash })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("No wallet capability is available")]
    WalletUnavailable,
    #[error("The user rejected the transaction in the wallet")]
    UserRejected,
    #[error("Insufficient funds to cover the value and fees")]
    InsufficientFunds,
    #[error("Contract call failed: {details}")]
    CallFailed { details: String },
    #[error("No EMI plan exists for {owner} on product {product_id}")]
    PlanNotFound { owner: Address, product_id: ProductId },
    #[error("Transaction {hash} was rejected by the chain")]
    TransactionRejected { hash: TransactionHash },
    #[error("Transaction {hash} was not confirmed within {timeout:?}")]
    ConfirmationTimeout {
        hash: TransactionHash,
        timeout: Duration,
    },
    #[error("Invalid rating {rating}: must be 0 to {MAX_RATING}")]
    InvalidRating { rating: u8 },
}

impl From<WalletProviderError> for GatewayError {
    fn from(e: WalletProviderError) -> Self {
        match e {
            WalletProviderError::Unavailable => GatewayError::WalletUnavailable,
            WalletProviderError::UserRejected => GatewayError::UserRejected,
            WalletProviderError::InsufficientFunds => GatewayError::InsufficientFunds,
            WalletProviderError::Provider(details) => GatewayError::CallFailed { details },
        }
    }
}

impl IsNotFoundError for GatewayError {
    fn is_not_found_error(&self) -> bool {
        matches!(self, Self::PlanNotFound { .. })
    }
}

//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use emi_market_common_types::{optional::Optional, Address, Amount, ProductId, TransactionHash};
use emi_market_ledger_client::{
    types::{AddPaymentRequest, PaymentReceipt},
    PaymentLedgerClient,
};
use log::*;
use tokio::sync::Mutex;

use crate::{
    apis::session::{SessionApi, SessionApiError},
    events::{CheckoutEvent, CheckoutEvents},
    gateway::{ContractGateway, GatewayError, TransactionHandle},
    models::{EmiPlan, InstallmentSchedule},
    network::ContractNetworkInterface,
    provider::WalletProvider,
    storage::SessionStore,
    MarketSdkConfig,
};

const LOG_TARGET: &str = "market::wallet_sdk::apis::checkout";

/// Serializes checkout invocations per (account, product) pair. Two
/// installment payments racing against a stale remaining-amount read is the
/// failure mode this prevents; unrelated pairs proceed concurrently.
#[derive(Debug, Default)]
pub(crate) struct CheckoutLocks {
    locks: DashMap<(Address, ProductId), Arc<Mutex<()>>>,
}

impl CheckoutLocks {
    fn entry(&self, account: Address, product_id: ProductId) -> Arc<Mutex<()>> {
        self.locks.entry((account, product_id)).or_default().clone()
    }
}

/// Whether the off-chain receipt write succeeded. `Failed` is a warning
/// state, not an error: the money already moved on-chain and only the
/// history entry is missing. Retrying the receipt POST alone is safe, the
/// ledger dedups on the transaction hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptStatus {
    Recorded,
    Failed { reason: String },
}

impl ReceiptStatus {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded)
    }
}

/// Result of a completed checkout action. `plan` is the contract state
/// re-read after confirmation, the sole source of truth for the remaining
/// amount.
#[derive(Debug, Clone)]
pub struct CheckoutSummary {
    pub transaction_hash: TransactionHash,
    pub amount_paid: Amount,
    pub plan: EmiPlan,
    pub receipt: ReceiptStatus,
}

/// Sequences a user-initiated plan creation or installment payment:
/// validate, submit, await finality, reconcile the plan, record the receipt.
/// Linear per invocation; a failure at any point is terminal and recovery is
/// the user re-triggering the action.
pub struct CheckoutApi<'a, TStore, TProvider, TNetwork> {
    session: SessionApi<'a, TStore, TProvider>,
    gateway: ContractGateway<'a, TProvider, TNetwork>,
    ledger: &'a PaymentLedgerClient,
    locks: &'a CheckoutLocks,
    events: &'a CheckoutEvents,
    config: &'a MarketSdkConfig,
}

impl<'a, TStore, TProvider, TNetwork> CheckoutApi<'a, TStore, TProvider, TNetwork>
where
    TStore: SessionStore,
    TProvider: WalletProvider,
    TNetwork: ContractNetworkInterface,
{
    pub(crate) fn new(
        session: SessionApi<'a, TStore, TProvider>,
        gateway: ContractGateway<'a, TProvider, TNetwork>,
        ledger: &'a PaymentLedgerClient,
        locks: &'a CheckoutLocks,
        events: &'a CheckoutEvents,
        config: &'a MarketSdkConfig,
    ) -> Self {
        Self {
            session,
            gateway,
            ledger,
            locks,
            events,
            config,
        }
    }

    /// Creates an EMI plan for the connected account. The submitted value is
    /// the monthly installment: plan creation collects the first payment.
    pub async fn create_plan(
        &self,
        product_id: ProductId,
        tenure_months: u32,
    ) -> Result<CheckoutSummary, CheckoutApiError> {
        let account = self.session.active_account()?;
        if tenure_months == 0 || tenure_months > self.config.max_tenure_months {
            return Err(CheckoutApiError::Validation {
                reason: format!(
                    "Tenure must be between 1 and {} months, got {}",
                    self.config.max_tenure_months, tenure_months
                ),
            });
        }

        let product = self.gateway.get_product(product_id).await?;
        let schedule = InstallmentSchedule::split(product.price, tenure_months)
            .map_err(|e| CheckoutApiError::Validation { reason: e.to_string() })?;
        let value = schedule.monthly_installment();

        let lock = self.locks.entry(account, product_id);
        let _guard = lock.lock().await;

        let handle = self
            .gateway
            .create_emi_plan(&account, product_id, tenure_months, value)
            .await?;
        self.finalize(account, product_id, value, handle).await
    }

    /// The connected account's plan for this product, or `None` when no plan
    /// has been created yet.
    pub async fn plan_status(&self, product_id: ProductId) -> Result<Option<EmiPlan>, CheckoutApiError> {
        let account = self.session.active_account()?;
        let plan = self.gateway.get_emi_plan(&account, product_id).await.optional()?;
        Ok(plan)
    }

    /// Pays an installment on the connected account's plan for this product.
    pub async fn pay_installment(
        &self,
        product_id: ProductId,
        amount: Amount,
    ) -> Result<CheckoutSummary, CheckoutApiError> {
        let account = self.session.active_account()?;
        if amount.is_zero() {
            return Err(CheckoutApiError::Validation {
                reason: "Payment amount must be positive".to_string(),
            });
        }

        let lock = self.locks.entry(account, product_id);
        let _guard = lock.lock().await;

        let handle = self.gateway.pay_installment(&account, product_id, amount).await?;
        self.finalize(account, product_id, amount, handle).await
    }

    /// Shared tail of both actions: await finality, reconcile the plan from
    /// the contract, then record the receipt off-chain.
    async fn finalize(
        &self,
        account: Address,
        product_id: ProductId,
        amount: Amount,
        handle: TransactionHandle,
    ) -> Result<CheckoutSummary, CheckoutApiError> {
        let hash = handle.hash();
        self.events.publish(CheckoutEvent::Submitted {
            account,
            product_id,
            hash,
        });

        self.gateway.wait_for_confirmation(&handle).await?;
        self.events.publish(CheckoutEvent::Confirmed { hash });

        let plan = self.gateway.get_emi_plan(&account, product_id).await?;
        let receipt = self.record_receipt(account, product_id, amount, hash).await;

        Ok(CheckoutSummary {
            transaction_hash: hash,
            amount_paid: amount,
            plan,
            receipt,
        })
    }

    async fn record_receipt(
        &self,
        account: Address,
        product_id: ProductId,
        amount: Amount,
        hash: TransactionHash,
    ) -> ReceiptStatus {
        let request = AddPaymentRequest {
            user_id: account,
            payment_details: PaymentReceipt {
                product_id,
                amount: amount.to_decimal_string(self.config.decimals),
                date: Utc::now(),
                transaction_hash: hash,
            },
        };
        match self.ledger.post_payment(&request).await {
            Ok(()) => {
                self.events.publish(CheckoutEvent::Recorded { hash });
                ReceiptStatus::Recorded
            },
            Err(e) => {
                // The on-chain effect already happened and is never rolled
                // back or resubmitted; only the receipt POST may be retried.
                warn!(
                    target: LOG_TARGET,
                    "Payment {} succeeded on-chain but receipt logging failed: {}", hash, e
                );
                self.events.publish(CheckoutEvent::RecordingFailed { hash });
                ReceiptStatus::Failed { reason: e.to_string() }
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutApiError {
    #[error("Validation failed: {reason}")]
    Validation { reason: String },
    #[error(transparent)]
    Session(#[from] SessionApiError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

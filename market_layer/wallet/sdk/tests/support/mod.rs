//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use emi_market_common_types::{optional::IsNotFoundError, Address, Amount, ProductId, TransactionHash};
use emi_market_wallet_sdk::{
    network::{ContractNetworkInterface, EmiPlanRecord, ProductRecord, TransactionStatus},
    provider::{ContractCall, ContractMethod, WalletProvider, WalletProviderError},
    MarketSdkConfig,
};

pub fn test_address(fill: u8) -> Address {
    Address::from([fill; 20])
}

/// Config with short confirmation windows so polls and timeouts complete
/// quickly. `decimals` is 0 so ledger receipt amounts read as plain base
/// units.
pub fn test_config(ledger_endpoint: String) -> MarketSdkConfig {
    let mut config = MarketSdkConfig::new(test_address(0xCC), 1337, ledger_endpoint);
    config.decimals = 0;
    config.confirmation_timeout = Duration::from_millis(250);
    config.confirmation_poll_interval = Duration::from_millis(10);
    config
}

pub fn product_record(id: u64, price: u128) -> ProductRecord {
    ProductRecord {
        id: ProductId::new(id),
        name: format!("Product {}", id),
        description: format!("Description for product {}", id),
        price: Amount::new(price),
        seller: test_address(0x5e),
        rating: 4,
        image_link: format!("https://img.example.com/{}.png", id),
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SignFailure {
    UserRejected,
    InsufficientFunds,
}

#[derive(Default)]
struct ChainInner {
    products: Vec<ProductRecord>,
    plans: HashMap<(Address, ProductId), EmiPlanRecord>,
    // Transaction hash to the number of Pending polls left before Confirmed.
    transactions: HashMap<TransactionHash, u32>,
    log: Vec<String>,
    next_nonce: u8,
}

/// Shared in-memory chain plus all the mock knobs. The provider and network
/// interface move into the sdk on initialize, so tests steer behavior through
/// this handle. The provider applies write effects at submission time and the
/// network interface serves reads and status polls from the same state, so a
/// confirmed write is always visible to the reconciliation read that follows
/// it.
pub struct ChainState {
    inner: Mutex<ChainInner>,
    wallet_available: AtomicBool,
    prompts: AtomicUsize,
    fail_signing: Mutex<Option<SignFailure>>,
    fail_product: Mutex<Option<ProductId>>,
    never_confirm: AtomicBool,
    reject_transactions: AtomicBool,
}

impl ChainState {
    pub fn new(products: Vec<ProductRecord>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(ChainInner {
                products,
                ..Default::default()
            }),
            wallet_available: AtomicBool::new(true),
            prompts: AtomicUsize::new(0),
            fail_signing: Mutex::new(None),
            fail_product: Mutex::new(None),
            never_confirm: AtomicBool::new(false),
            reject_transactions: AtomicBool::new(false),
        })
    }

    pub fn set_wallet_available(&self, available: bool) {
        self.wallet_available.store(available, Ordering::SeqCst);
    }

    /// How many times the wallet prompted for account access.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    /// The next `sign_and_send` fails with the given outcome.
    pub fn fail_next_signing(&self, failure: SignFailure) {
        *self.fail_signing.lock().unwrap() = Some(failure);
    }

    /// Reads of this product id fail with an rpc error.
    pub fn fail_product_reads(&self, product_id: ProductId) {
        *self.fail_product.lock().unwrap() = Some(product_id);
    }

    pub fn set_never_confirm(&self) {
        self.never_confirm.store(true, Ordering::SeqCst);
    }

    pub fn set_reject_transactions(&self) {
        self.reject_transactions.store(true, Ordering::SeqCst);
    }

    pub fn plan(&self, owner: Address, product_id: ProductId) -> Option<EmiPlanRecord> {
        self.inner.lock().unwrap().plans.get(&(owner, product_id)).cloned()
    }

    pub fn take_log(&self) -> Vec<String> {
        std::mem::take(&mut self.inner.lock().unwrap().log)
    }

    fn apply(&self, call: &ContractCall) -> TransactionHash {
        let mut inner = self.inner.lock().unwrap();
        inner.next_nonce += 1;
        let hash = TransactionHash::from([inner.next_nonce; 32]);

        match &call.method {
            ContractMethod::ListProduct {
                name,
                description,
                price,
                rating,
                image_link,
            } => {
                let id = ProductId::new(inner.products.len() as u64 + 1);
                inner.products.push(ProductRecord {
                    id,
                    name: name.clone(),
                    description: description.clone(),
                    price: *price,
                    seller: call.from,
                    rating: *rating,
                    image_link: image_link.clone(),
                });
            },
            ContractMethod::CreateEmiPlan {
                product_id,
                tenure_months,
            } => {
                let price = inner
                    .products
                    .iter()
                    .find(|p| p.id == *product_id)
                    .map(|p| p.price)
                    .unwrap_or_else(Amount::zero);
                inner.plans.insert((call.from, *product_id), EmiPlanRecord {
                    tenure_months: *tenure_months,
                    monthly_installment: call.value,
                    remaining_amount: price.saturating_sub(call.value),
                });
            },
            ContractMethod::PayInstallment { product_id } => {
                if let Some(plan) = inner.plans.get_mut(&(call.from, *product_id)) {
                    plan.remaining_amount = plan.remaining_amount.saturating_sub(call.value);
                }
            },
        }

        // One Pending poll per transaction before it confirms.
        inner.transactions.insert(hash, 1);
        inner.log.push(format!("submit {}", hash));
        hash
    }

    fn poll_status(&self, hash: TransactionHash) -> TransactionStatus {
        if self.reject_transactions.load(Ordering::SeqCst) {
            return TransactionStatus::Rejected;
        }
        if self.never_confirm.load(Ordering::SeqCst) {
            return TransactionStatus::Pending;
        }
        let mut inner = self.inner.lock().unwrap();
        let remaining = inner.transactions.get_mut(&hash).expect("status poll for unknown tx");
        if *remaining > 0 {
            *remaining -= 1;
            return TransactionStatus::Pending;
        }
        inner.log.push(format!("confirm {}", hash));
        TransactionStatus::Confirmed
    }
}

pub struct MockProvider {
    state: Arc<ChainState>,
    accounts: Vec<Address>,
}

impl MockProvider {
    pub fn new(state: Arc<ChainState>, accounts: Vec<Address>) -> Self {
        Self { state, accounts }
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    fn is_available(&self) -> bool {
        self.state.wallet_available.load(Ordering::SeqCst)
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletProviderError> {
        if !self.is_available() {
            return Err(WalletProviderError::Unavailable);
        }
        self.state.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.clone())
    }

    async fn sign_and_send(&self, call: ContractCall) -> Result<TransactionHash, WalletProviderError> {
        if !self.is_available() {
            return Err(WalletProviderError::Unavailable);
        }
        if let Some(failure) = self.state.fail_signing.lock().unwrap().take() {
            return Err(match failure {
                SignFailure::UserRejected => WalletProviderError::UserRejected,
                SignFailure::InsufficientFunds => WalletProviderError::InsufficientFunds,
            });
        }
        Ok(self.state.apply(&call))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MockNetworkError {
    #[error("Not found")]
    NotFound,
    #[error("Rpc failure: {0}")]
    Rpc(String),
}

impl IsNotFoundError for MockNetworkError {
    fn is_not_found_error(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

pub struct MockNetwork {
    state: Arc<ChainState>,
}

impl MockNetwork {
    pub fn new(state: Arc<ChainState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl ContractNetworkInterface for MockNetwork {
    type Error = MockNetworkError;

    async fn product_count(&self) -> Result<u64, Self::Error> {
        Ok(self.state.inner.lock().unwrap().products.len() as u64)
    }

    async fn get_product(&self, product_id: ProductId) -> Result<ProductRecord, Self::Error> {
        if *self.state.fail_product.lock().unwrap() == Some(product_id) {
            return Err(MockNetworkError::Rpc(format!("read of product {} failed", product_id)));
        }
        self.state
            .inner
            .lock()
            .unwrap()
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or(MockNetworkError::NotFound)
    }

    async fn get_emi_plan(&self, owner: &Address, product_id: ProductId) -> Result<EmiPlanRecord, Self::Error> {
        self.state.plan(*owner, product_id).ok_or(MockNetworkError::NotFound)
    }

    async fn transaction_status(&self, hash: TransactionHash) -> Result<TransactionStatus, Self::Error> {
        Ok(self.state.poll_status(hash))
    }
}

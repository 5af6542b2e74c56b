//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use std::time::Duration;

use emi_market_common_types::Address;
use emi_market_ledger_client::{LedgerClientError, PaymentLedgerClient};
use tokio::sync::broadcast;

use crate::{
    apis::{
        catalog::CatalogApi,
        checkout::{CheckoutApi, CheckoutLocks},
        session::SessionApi,
    },
    events::{CheckoutEvent, CheckoutEvents},
    gateway::ContractGateway,
    network::ContractNetworkInterface,
    provider::WalletProvider,
    storage::SessionStore,
};

const EVENT_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct MarketSdkConfig {
    /// The one deployed marketplace contract everything talks to.
    pub contract_address: Address,
    pub chain_id: u64,
    /// Base URL of the payment ledger service, e.g. `http://localhost:5000`.
    pub ledger_endpoint: String,
    /// Decimal places of the chain's base unit. 18 for ether-denominated
    /// chains.
    pub decimals: u32,
    /// Fixed gas limit attached to every write. No dynamic estimation.
    pub gas_limit: u64,
    pub confirmation_timeout: Duration,
    pub confirmation_poll_interval: Duration,
    pub max_tenure_months: u32,
}

impl MarketSdkConfig {
    pub fn new(contract_address: Address, chain_id: u64, ledger_endpoint: String) -> Self {
        Self {
            contract_address,
            chain_id,
            ledger_endpoint,
            decimals: 18,
            gas_limit: 500_000,
            confirmation_timeout: Duration::from_secs(60),
            confirmation_poll_interval: Duration::from_secs(2),
            max_tenure_months: 60,
        }
    }
}

/// Facade over the marketplace wallet stack. Construct once with
/// [`MarketWalletSdk::initialize`] and hand out the per-concern apis from it.
/// The apis borrow from the sdk, so it outlives any in-flight call.
pub struct MarketWalletSdk<TStore, TProvider, TNetwork> {
    store: TStore,
    provider: TProvider,
    network: TNetwork,
    ledger: PaymentLedgerClient,
    locks: CheckoutLocks,
    events: CheckoutEvents,
    config: MarketSdkConfig,
}

impl<TStore, TProvider, TNetwork> MarketWalletSdk<TStore, TProvider, TNetwork>
where
    TStore: SessionStore,
    TProvider: WalletProvider,
    TNetwork: ContractNetworkInterface,
{
    pub fn initialize(
        store: TStore,
        provider: TProvider,
        network: TNetwork,
        config: MarketSdkConfig,
    ) -> Result<Self, MarketSdkError> {
        let ledger = PaymentLedgerClient::connect(&config.ledger_endpoint)?;
        Ok(Self {
            store,
            provider,
            network,
            ledger,
            locks: CheckoutLocks::default(),
            events: CheckoutEvents::new(EVENT_CHANNEL_CAPACITY),
            config,
        })
    }

    pub fn config(&self) -> &MarketSdkConfig {
        &self.config
    }

    pub fn ledger_client(&self) -> &PaymentLedgerClient {
        &self.ledger
    }

    pub fn session_api(&self) -> SessionApi<'_, TStore, TProvider> {
        SessionApi::new(&self.store, &self.provider)
    }

    pub fn catalog_api(&self) -> CatalogApi<'_, TProvider, TNetwork> {
        CatalogApi::new(self.gateway())
    }

    pub fn checkout_api(&self) -> CheckoutApi<'_, TStore, TProvider, TNetwork> {
        CheckoutApi::new(
            self.session_api(),
            self.gateway(),
            &self.ledger,
            &self.locks,
            &self.events,
            &self.config,
        )
    }

    pub fn gateway(&self) -> ContractGateway<'_, TProvider, TNetwork> {
        ContractGateway::new(&self.provider, &self.network, &self.config)
    }

    pub fn subscribe_checkout_events(&self) -> broadcast::Receiver<CheckoutEvent> {
        self.events.subscribe()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MarketSdkError {
    #[error("Failed to initialize the payment ledger client: {0}")]
    LedgerClient(#[from] LedgerClientError),
}

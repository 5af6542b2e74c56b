//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use emi_market_common_types::Address;
use log::*;

use crate::{
    provider::{WalletProvider, WalletProviderError},
    storage::{SessionStore, SessionStorageError},
};

const LOG_TARGET: &str = "market::wallet_sdk::apis::session";

/// Wallet session lifecycle: connect once, reuse the cached account until an
/// explicit disconnect.
pub struct SessionApi<'a, TStore, TProvider> {
    store: &'a TStore,
    provider: &'a TProvider,
}

impl<'a, TStore, TProvider> SessionApi<'a, TStore, TProvider>
where
    TStore: SessionStore,
    TProvider: WalletProvider,
{
    pub(crate) fn new(store: &'a TStore, provider: &'a TProvider) -> Self {
        Self { store, provider }
    }

    pub fn is_wallet_available(&self) -> bool {
        self.provider.is_available()
    }

    pub fn cached_account(&self) -> Result<Option<Address>, SessionApiError> {
        Ok(self.store.get_session()?)
    }

    /// Idempotent connect: a cached account is returned without prompting.
    /// Otherwise the wallet is asked for account access and the first granted
    /// account is persisted. Nothing is written on failure.
    pub async fn connect(&self) -> Result<Address, SessionApiError> {
        if let Some(account) = self.store.get_session()? {
            debug!(target: LOG_TARGET, "Reusing cached session account {}", account);
            return Ok(account);
        }

        if !self.provider.is_available() {
            return Err(SessionApiError::WalletUnavailable);
        }

        let accounts = self.provider.request_accounts().await?;
        let account = accounts.first().copied().ok_or(SessionApiError::NoAccounts)?;
        self.store.put_session(&account)?;
        info!(target: LOG_TARGET, "Connected wallet account {}", account);
        Ok(account)
    }

    /// Ends the session. The next `connect` prompts again.
    pub fn disconnect(&self) -> Result<(), SessionApiError> {
        self.store.clear_session()?;
        info!(target: LOG_TARGET, "Session cleared");
        Ok(())
    }

    /// The account that signs writes. Errors with `NoSigner` when no session
    /// is active.
    pub fn active_account(&self) -> Result<Address, SessionApiError> {
        self.store.get_session()?.ok_or(SessionApiError::NoSigner)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionApiError {
    #[error("No wallet capability is available")]
    WalletUnavailable,
    #[error("The user rejected the connection request")]
    UserRejected,
    #[error("The wallet granted no accounts")]
    NoAccounts,
    #[error("No signer: connect a wallet account first")]
    NoSigner,
    #[error("Session store error: {0}")]
    StoreError(#[from] SessionStorageError),
    #[error("Wallet provider error: {0}")]
    Provider(String),
}

impl From<WalletProviderError> for SessionApiError {
    fn from(e: WalletProviderError) -> Self {
        match e {
            WalletProviderError::Unavailable => SessionApiError::WalletUnavailable,
            WalletProviderError::UserRejected => SessionApiError::UserRejected,
            WalletProviderError::InsufficientFunds | WalletProviderError::Provider(_) => {
                SessionApiError::Provider(e.to_string())
            },
        }
    }
}

//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use std::{fs, io, path::Path};

use emi_market_common_types::Address;
use log::*;
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "market::wallet_sdk::storage";

/// Key under which the connected account is persisted. No expiry: a cached
/// account is trusted until it is explicitly cleared.
const SESSION_KEY: &str = "wallet_account";

/// Persistence for the connected wallet account. At most one account is
/// stored per profile.
pub trait SessionStore: Send + Sync {
    fn get_session(&self) -> Result<Option<Address>, SessionStorageError>;
    fn put_session(&self, account: &Address) -> Result<(), SessionStorageError>;
    fn clear_session(&self) -> Result<(), SessionStorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStorageError {
    #[error("Session store IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    account: Address,
}

/// JSON-file-backed session store.
pub struct JfsSessionStore {
    store: jfs::Store,
}

impl JfsSessionStore {
    pub fn try_open<P: AsRef<Path>>(base_path: P) -> Result<Self, SessionStorageError> {
        let path = base_path.as_ref().join("session");
        fs::create_dir_all(&path)?;
        let store = jfs::Store::new_with_cfg(path, jfs::Config {
            pretty: true,
            indent: 2,
            single: false,
        })?;
        Ok(Self { store })
    }
}

impl SessionStore for JfsSessionStore {
    fn get_session(&self) -> Result<Option<Address>, SessionStorageError> {
        match self.store.get::<SessionRecord>(SESSION_KEY) {
            Ok(record) => Ok(Some(record.account)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put_session(&self, account: &Address) -> Result<(), SessionStorageError> {
        self.store.save_with_id(&SessionRecord { account: *account }, SESSION_KEY)?;
        debug!(target: LOG_TARGET, "Persisted session account {}", account);
        Ok(())
    }

    fn clear_session(&self) -> Result<(), SessionStorageError> {
        match self.store.delete(SESSION_KEY) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

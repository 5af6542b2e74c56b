//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

pub mod apis;
pub mod events;
pub mod gateway;
pub mod models;
pub mod network;
pub mod provider;
pub mod storage;

mod sdk;
pub use sdk::{MarketSdkConfig, MarketSdkError, MarketWalletSdk};

//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use emi_market_common_types::ProductId;
use log::*;

use crate::{
    gateway::{ContractGateway, GatewayError},
    models::Product,
    network::ContractNetworkInterface,
    provider::WalletProvider,
};

const LOG_TARGET: &str = "market::wallet_sdk::apis::catalog";

/// Loads the full product catalog from the contract.
pub struct CatalogApi<'a, TProvider, TNetwork> {
    gateway: ContractGateway<'a, TProvider, TNetwork>,
}

impl<'a, TProvider, TNetwork> CatalogApi<'a, TProvider, TNetwork>
where
    TProvider: WalletProvider,
    TNetwork: ContractNetworkInterface,
{
    pub(crate) fn new(gateway: ContractGateway<'a, TProvider, TNetwork>) -> Self {
        Self { gateway }
    }

    /// Fetches every product, in contract id order (ids are 1-based and
    /// contiguous). All-or-nothing: a failure on any product aborts the load
    /// and discards what was fetched so far.
    pub async fn load_all(&self) -> Result<Vec<Product>, CatalogApiError> {
        let count = self
            .gateway
            .get_product_count()
            .await
            .map_err(|source| CatalogApiError::CountFailed { source })?;

        let mut products = Vec::with_capacity(count as usize);
        for id in 1..=count {
            let product_id = ProductId::new(id);
            let product = self
                .gateway
                .get_product(product_id)
                .await
                .map_err(|source| CatalogApiError::ProductFetchFailed {
                    id: product_id,
                    count,
                    source,
                })?;
            products.push(product);
        }

        info!(target: LOG_TARGET, "Loaded {} product(s) from the contract", products.len());
        Ok(products)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogApiError {
    #[error("Failed to read the product count: {source}")]
    CountFailed { source: GatewayError },
    #[error("Failed to fetch product {id} of {count}: {source}")]
    ProductFetchFailed {
        id: ProductId,
        count: u64,
        source: GatewayError,
    },
}

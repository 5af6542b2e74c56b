//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use emi_market_common_types::{Address, Amount, ProductId};
use serde::{Deserialize, Serialize};

use crate::network::ProductRecord;

/// A listed product. Owned by the contract and immutable once listed; the
/// client only ever holds read copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in base units. Never changes after listing.
    pub price: Amount,
    pub seller: Address,
    /// 0 to 5 inclusive.
    pub rating: u8,
    pub image_link: String,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            price: record.price,
            seller: record.seller,
            rating: record.rating,
            image_link: record.image_link,
        }
    }
}

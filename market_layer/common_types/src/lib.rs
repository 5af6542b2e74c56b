//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

mod address;
pub use address::{Address, AddressParseError};

mod amount;
pub use amount::{Amount, AmountError};

pub mod optional;

mod product_id;
pub use product_id::ProductId;

mod tx_hash;
pub use tx_hash::{TransactionHash, TransactionHashParseError};

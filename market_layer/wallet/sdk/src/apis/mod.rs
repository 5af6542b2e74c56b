//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

pub mod catalog;
pub mod checkout;
pub mod session;

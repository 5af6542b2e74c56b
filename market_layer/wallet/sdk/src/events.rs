//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use emi_market_common_types::{Address, ProductId, TransactionHash};
use tokio::sync::broadcast;

/// Checkout progress, published in state-machine order: `Submitted`, then
/// `Confirmed`, then exactly one of `Recorded` or `RecordingFailed`. A
/// consumer (typically the UI) subscribes and renders progress; missing a
/// lagged event is acceptable, the checkout result itself is returned to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    Submitted {
        account: Address,
        product_id: ProductId,
        hash: TransactionHash,
    },
    Confirmed {
        hash: TransactionHash,
    },
    Recorded {
        hash: TransactionHash,
    },
    RecordingFailed {
        hash: TransactionHash,
    },
}

#[derive(Debug)]
pub struct CheckoutEvents {
    publisher: broadcast::Sender<CheckoutEvent>,
}

impl CheckoutEvents {
    pub fn new(capacity: usize) -> Self {
        let (publisher, _) = broadcast::channel(capacity);
        Self { publisher }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CheckoutEvent> {
        self.publisher.subscribe()
    }

    pub(crate) fn publish(&self, event: CheckoutEvent) {
        // Nobody listening is fine
        let _ignore = self.publisher.send(event);
    }
}

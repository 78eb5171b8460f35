//! Mint authority over the reward asset.
//!
//! The engine never initiates the handoff: the reward ledger's current owner
//! calls `transfer_ownership(engine)` on the ledger. The engine observes the
//! result by querying the ledger's owner and caches the flag once set, since
//! the handoff is one-directional.

use farm_token::RewardLedger;
use farm_types::AccountId;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct MintAuthority {
    held: AtomicBool,
}

impl MintAuthority {
    pub fn new(held: bool) -> Self {
        Self {
            held: AtomicBool::new(held),
        }
    }

    /// The cached flag. May lag the ledger until the next [`observe`](Self::observe).
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Query the ledger and cache a positive result.
    pub fn observe<R: RewardLedger + ?Sized>(&self, ledger: &R, engine: &AccountId) -> bool {
        if self.is_held() {
            return true;
        }
        let held = ledger.owner().as_ref() == Some(engine);
        if held {
            self.held.store(true, Ordering::Release);
            tracing::info!(%engine, "mint authority observed on reward ledger");
        }
        held
    }
}

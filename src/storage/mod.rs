//! Persistence for the subscription list.

pub mod json_backend;
pub mod paths;

use crate::errors::LedgerError;
use crate::ledger::Subscription;

pub use json_backend::{ensure_dir, JsonStorage, LoadOutcome};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Storage seam for the subscription list; the whole list is the unit of
/// persistence.
pub trait SubscriptionStore {
    fn save(&self, subscriptions: &[Subscription]) -> Result<()>;
    fn load(&self) -> Result<Vec<Subscription>>;
}

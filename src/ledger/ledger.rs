use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::LedgerError;

use super::subscription::{Subscription, SubscriptionDraft};

/// The owned subscription list plus bookkeeping timestamps.
///
/// The persisted unit is the plain record list (see `storage`); the
/// surrounding metadata lives in memory only.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub id: Uuid,
    pub subscriptions: Vec<Subscription>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The single mutation entry point. Every state change flows through
/// [`Ledger::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    Add { draft: SubscriptionDraft },
    Update { id: Uuid, draft: SubscriptionDraft },
    Remove { id: Uuid },
    Toggle { id: Uuid },
}

impl Ledger {
    pub fn new() -> Self {
        Self::from_subscriptions(Vec::new())
    }

    pub fn from_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            subscriptions,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a command and returns the id of the affected record.
    pub fn apply(&mut self, command: LedgerCommand) -> Result<Uuid, LedgerError> {
        let id = match command {
            LedgerCommand::Add { draft } => {
                draft.validate()?;
                let subscription = Subscription::new(draft);
                let id = subscription.id;
                self.subscriptions.push(subscription);
                id
            }
            LedgerCommand::Update { id, draft } => {
                draft.validate()?;
                let subscription = self.subscription_mut(id)?;
                subscription.name = draft.name;
                subscription.category = draft.category;
                subscription.billing = draft.billing;
                subscription.price = draft.price;
                subscription.renew_day = draft.renew_day;
                id
            }
            LedgerCommand::Remove { id } => {
                let index = self.index_of(id)?;
                self.subscriptions.remove(index);
                id
            }
            LedgerCommand::Toggle { id } => {
                let subscription = self.subscription_mut(id)?;
                subscription.active = !subscription.active;
                id
            }
        };
        self.touch();
        tracing::debug!(%id, "ledger command applied");
        Ok(id)
    }

    pub fn subscription(&self, id: Uuid) -> Option<&Subscription> {
        self.subscriptions.iter().find(|sub| sub.id == id)
    }

    /// Case-insensitive exact name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&Subscription> {
        self.subscriptions
            .iter()
            .find(|sub| sub.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.subscriptions.iter().filter(|sub| sub.active).count()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn subscription_mut(&mut self, id: Uuid) -> Result<&mut Subscription, LedgerError> {
        self.subscriptions
            .iter_mut()
            .find(|sub| sub.id == id)
            .ok_or_else(|| LedgerError::Invalid(format!("no subscription with id {}", id)))
    }

    fn index_of(&self, id: Uuid) -> Result<usize, LedgerError> {
        self.subscriptions
            .iter()
            .position(|sub| sub.id == id)
            .ok_or_else(|| LedgerError::Invalid(format!("no subscription with id {}", id)))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

//! Subscription ledger domain models, derived aggregates, and helpers.

pub mod billing;
pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod sample;
pub mod schedule;
pub mod stats;
pub mod subscription;

pub use billing::BillingCadence;
pub use category::Category;
pub use ledger::{Ledger, LedgerCommand};
pub use sample::sample_subscriptions;
pub use schedule::{days_until_renewal, next_renewal_date, URGENT_WINDOW_DAYS};
pub use stats::{
    biggest_category_insight, filter_and_sort, group_by_category, totals, upcoming_renewals,
    CategoryFilter, CategorySpend, SortKey, Totals, UpcomingRenewal,
};
pub use subscription::{Subscription, SubscriptionDraft};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

use super::{billing::BillingCadence, category::Category};

/// A single recurring payment tracked by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub billing: BillingCadence,
    pub price: f64,
    pub renew_day: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Subscription {
    pub fn new(draft: SubscriptionDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            category: draft.category,
            billing: draft.billing,
            price: draft.price,
            renew_day: draft.renew_day,
            active: true,
        }
    }

    /// Cost normalized to one month.
    pub fn monthly_cost(&self) -> f64 {
        self.price / self.billing.months() as f64
    }

    /// Cost normalized to one year.
    pub fn annual_cost(&self) -> f64 {
        self.monthly_cost() * 12.0
    }
}

/// Field set collected by the add/edit form; everything except the id.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionDraft {
    pub name: String,
    pub category: Category,
    pub billing: BillingCadence,
    pub price: f64,
    pub renew_day: u32,
}

impl SubscriptionDraft {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::Invalid("name must not be empty".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(LedgerError::Invalid(format!(
                "price must be a non-negative amount, got {}",
                self.price
            )));
        }
        if !(1..=31).contains(&self.renew_day) {
            return Err(LedgerError::Invalid(format!(
                "renewal day must be between 1 and 31, got {}",
                self.renew_day
            )));
        }
        Ok(())
    }
}

impl From<&Subscription> for SubscriptionDraft {
    fn from(subscription: &Subscription) -> Self {
        Self {
            name: subscription.name.clone(),
            category: subscription.category,
            billing: subscription.billing,
            price: subscription.price,
            renew_day: subscription.renew_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, price: f64, renew_day: u32) -> SubscriptionDraft {
        SubscriptionDraft {
            name: name.into(),
            category: Category::Streaming,
            billing: BillingCadence::Monthly,
            price,
            renew_day,
        }
    }

    #[test]
    fn monthly_cost_times_cadence_months_equals_price() {
        for billing in BillingCadence::ALL {
            let mut d = draft("Plan", 120.0, 5);
            d.billing = billing;
            let sub = Subscription::new(d);
            let recovered = sub.monthly_cost() * billing.months() as f64;
            assert!((recovered - sub.price).abs() < 1e-9);
        }
    }

    #[test]
    fn annual_cost_normalizes_across_cadences() {
        let mut quarterly = draft("Box", 30.0, 1);
        quarterly.billing = BillingCadence::Quarterly;
        let sub = Subscription::new(quarterly);
        assert!((sub.monthly_cost() - 10.0).abs() < 1e-9);
        assert!((sub.annual_cost() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn draft_validation_rejects_bad_fields() {
        assert!(draft("", 1.0, 1).validate().is_err());
        assert!(draft("   ", 1.0, 1).validate().is_err());
        assert!(draft("Ok", -1.0, 1).validate().is_err());
        assert!(draft("Ok", f64::NAN, 1).validate().is_err());
        assert!(draft("Ok", 1.0, 0).validate().is_err());
        assert!(draft("Ok", 1.0, 32).validate().is_err());
        assert!(draft("Ok", 0.0, 31).validate().is_ok());
    }

    #[test]
    fn missing_active_flag_defaults_to_true() {
        let json = r#"{
            "id": "6f9fdf3e-9f3a-4a63-bd39-6a4c7ffeb2f1",
            "name": "Netflix",
            "category": "streaming",
            "billing": "monthly",
            "price": 15.49,
            "renew_day": 14
        }"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert!(sub.active);
    }
}

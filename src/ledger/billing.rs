use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How often a subscription bills.
///
/// Unknown persisted cadences deserialize as [`BillingCadence::Monthly`], the
/// most conservative reading of an unrecognized value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum BillingCadence {
    Monthly,
    Quarterly,
    Yearly,
}

impl From<String> for BillingCadence {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(BillingCadence::Monthly)
    }
}

impl BillingCadence {
    pub const ALL: [BillingCadence; 3] = [
        BillingCadence::Monthly,
        BillingCadence::Quarterly,
        BillingCadence::Yearly,
    ];

    /// Months covered by one charge. Always >= 1.
    pub fn months(&self) -> u32 {
        match self {
            BillingCadence::Monthly => 1,
            BillingCadence::Quarterly => 3,
            BillingCadence::Yearly => 12,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillingCadence::Monthly => "Monthly",
            BillingCadence::Quarterly => "Quarterly",
            BillingCadence::Yearly => "Yearly",
        }
    }

    /// Lowercase form used after a price, as in `$15.49 / monthly`.
    pub fn per_label(&self) -> &'static str {
        match self {
            BillingCadence::Monthly => "monthly",
            BillingCadence::Quarterly => "quarterly",
            BillingCadence::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillingCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BillingCadence {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        BillingCadence::ALL
            .into_iter()
            .find(|cadence| cadence.per_label() == needle)
            .ok_or_else(|| format!("unknown billing cadence `{}`", value.trim()))
    }
}

//! Derived aggregates over the subscription list.
//!
//! Everything here is a pure function of the records and (where scheduling is
//! involved) an explicit reference date, so the dashboard and manage views
//! can be exercised in isolation.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::currency::format_usd;

use super::{
    category::Category,
    schedule::{days_until_renewal, URGENT_WINDOW_DAYS},
    subscription::Subscription,
};

/// Spend totals over the active records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub monthly: f64,
    pub annual: f64,
    pub daily: f64,
}

/// Annual spend attributed to one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpend {
    pub category: Category,
    pub annual_total: f64,
}

/// An active subscription annotated with its projected renewal distance.
#[derive(Debug, Clone)]
pub struct UpcomingRenewal<'a> {
    pub subscription: &'a Subscription,
    pub days_left: i64,
}

impl UpcomingRenewal<'_> {
    pub fn is_urgent(&self) -> bool {
        self.days_left <= URGENT_WINDOW_DAYS
    }
}

/// Manage-view category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    One(Category),
}

impl CategoryFilter {
    fn matches(&self, subscription: &Subscription) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::One(category) => subscription.category == *category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::One(category) => category.label(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            value.parse::<Category>().map(CategoryFilter::One)
        }
    }
}

/// Manage-view sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Descending annual cost.
    #[default]
    Cost,
    /// Ascending name, case-insensitive first.
    Name,
    /// Ascending days until renewal.
    Renew,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Cost => "cost",
            SortKey::Name => "name",
            SortKey::Renew => "renew",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cost" => Ok(SortKey::Cost),
            "name" => Ok(SortKey::Name),
            "renew" => Ok(SortKey::Renew),
            other => Err(format!(
                "unknown sort key `{}` (expected cost, name, or renew)",
                other
            )),
        }
    }
}

/// Sums normalized costs over active records. Empty input yields zeros.
pub fn totals(subscriptions: &[Subscription]) -> Totals {
    let mut result = Totals::default();
    for sub in subscriptions.iter().filter(|sub| sub.active) {
        result.monthly += sub.monthly_cost();
        result.annual += sub.annual_cost();
    }
    result.daily = result.annual / 365.0;
    result
}

/// Annual spend per category over active records, nonzero categories only,
/// descending by total. Ties keep [`Category::ALL`] order.
pub fn group_by_category(subscriptions: &[Subscription]) -> Vec<CategorySpend> {
    let mut grouped: Vec<CategorySpend> = Category::ALL
        .into_iter()
        .filter_map(|category| {
            let annual_total: f64 = subscriptions
                .iter()
                .filter(|sub| sub.active && sub.category == category)
                .map(Subscription::annual_cost)
                .sum();
            (annual_total > 0.0).then_some(CategorySpend {
                category,
                annual_total,
            })
        })
        .collect();
    grouped.sort_by(|a, b| {
        b.annual_total
            .partial_cmp(&a.annual_total)
            .unwrap_or(Ordering::Equal)
    });
    grouped
}

/// Active records ranked by renewal distance, nearest first, truncated to
/// `limit` entries.
pub fn upcoming_renewals(
    subscriptions: &[Subscription],
    today: NaiveDate,
    limit: usize,
) -> Vec<UpcomingRenewal<'_>> {
    let mut upcoming: Vec<UpcomingRenewal<'_>> = subscriptions
        .iter()
        .filter(|sub| sub.active)
        .map(|sub| UpcomingRenewal {
            subscription: sub,
            days_left: days_until_renewal(sub.renew_day, today),
        })
        .collect();
    upcoming.sort_by_key(|entry| entry.days_left);
    upcoming.truncate(limit);
    upcoming
}

/// Filters by category and orders by the given key. Inactive records pass
/// through the filter; only the cost totals exclude them.
pub fn filter_and_sort<'a>(
    subscriptions: &'a [Subscription],
    filter: CategoryFilter,
    sort: SortKey,
    today: NaiveDate,
) -> Vec<&'a Subscription> {
    let mut list: Vec<&Subscription> = subscriptions
        .iter()
        .filter(|sub| filter.matches(sub))
        .collect();
    match sort {
        SortKey::Cost => list.sort_by(|a, b| {
            b.annual_cost()
                .partial_cmp(&a.annual_cost())
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Name => list.sort_by(|a, b| {
            let folded = a.name.to_lowercase().cmp(&b.name.to_lowercase());
            folded.then_with(|| a.name.cmp(&b.name))
        }),
        SortKey::Renew => list.sort_by_key(|sub| days_until_renewal(sub.renew_day, today)),
    }
    list
}

/// One-sentence summary of the dominant category's share of annual spend.
pub fn biggest_category_insight(grouped: &[CategorySpend], total_annual: f64) -> String {
    match grouped.first() {
        Some(top) if total_annual > 0.0 => {
            let share = (top.annual_total / total_annual * 100.0).round() as i64;
            format!(
                "Your biggest spend is {} at {}/yr, that's {}% of your total subscriptions.",
                top.category.label(),
                format_usd(top.annual_total),
                share
            )
        }
        _ => "Add some subscriptions to start tracking your spending.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{BillingCadence, SubscriptionDraft};

    fn sub(name: &str, category: Category, billing: BillingCadence, price: f64, day: u32) -> Subscription {
        Subscription::new(SubscriptionDraft {
            name: name.into(),
            category,
            billing,
            price,
            renew_day: day,
        })
    }

    fn fixture() -> Vec<Subscription> {
        vec![
            sub("Netflix", Category::Streaming, BillingCadence::Monthly, 15.49, 14),
            sub("Spotify", Category::Music, BillingCadence::Monthly, 10.99, 3),
            sub("Disney+", Category::Streaming, BillingCadence::Monthly, 13.99, 19),
            sub("Amazon Prime", Category::Shopping, BillingCadence::Yearly, 139.0, 11),
        ]
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn totals_cover_active_records_only() {
        let mut subs = fixture();
        let t = totals(&subs);
        let expected_monthly = 15.49 + 10.99 + 13.99 + 139.0 / 12.0;
        assert!((t.monthly - expected_monthly).abs() < 1e-9);
        assert!((t.annual - expected_monthly * 12.0).abs() < 1e-9);
        assert!((t.daily - t.annual / 365.0).abs() < 1e-9);

        subs[0].active = false;
        let without_netflix = totals(&subs);
        assert!((t.annual - without_netflix.annual - 15.49 * 12.0).abs() < 1e-9);
        // The record itself is still present.
        assert_eq!(subs.len(), 4);
    }

    #[test]
    fn totals_of_empty_set_are_zero() {
        let t = totals(&[]);
        assert_eq!(t, Totals::default());

        let mut subs = fixture();
        for sub in &mut subs {
            sub.active = false;
        }
        assert_eq!(totals(&subs), Totals::default());
    }

    #[test]
    fn grouping_sums_match_overall_annual_total() {
        let subs = fixture();
        let grouped = group_by_category(&subs);
        let group_sum: f64 = grouped.iter().map(|g| g.annual_total).sum();
        assert!((group_sum - totals(&subs).annual).abs() < 1e-9);
    }

    #[test]
    fn grouping_orders_descending_and_skips_empty_categories() {
        let subs = fixture();
        let grouped = group_by_category(&subs);
        assert_eq!(grouped[0].category, Category::Streaming);
        assert!(grouped.windows(2).all(|w| w[0].annual_total >= w[1].annual_total));
        assert!(grouped.iter().all(|g| g.annual_total > 0.0));
        assert!(!grouped.iter().any(|g| g.category == Category::Gaming));
    }

    #[test]
    fn grouping_ties_keep_enumeration_order() {
        let subs = vec![
            sub("Gym", Category::Fitness, BillingCadence::Monthly, 10.0, 1),
            sub("Spotify", Category::Music, BillingCadence::Monthly, 10.0, 2),
        ];
        let grouped = group_by_category(&subs);
        // Music precedes Fitness in the category enumeration.
        assert_eq!(grouped[0].category, Category::Music);
        assert_eq!(grouped[1].category, Category::Fitness);
    }

    #[test]
    fn inactive_records_drop_out_of_grouping() {
        let mut subs = fixture();
        subs.iter_mut()
            .filter(|s| s.category == Category::Streaming)
            .for_each(|s| s.active = false);
        let grouped = group_by_category(&subs);
        assert!(!grouped.iter().any(|g| g.category == Category::Streaming));
    }

    #[test]
    fn upcoming_ranks_by_days_left_and_truncates() {
        let subs = fixture();
        let upcoming = upcoming_renewals(&subs, today(), 4);
        assert_eq!(upcoming.len(), 4);
        assert!(upcoming.windows(2).all(|w| w[0].days_left <= w[1].days_left));
        // Jan 19 is the nearest renewal after Jan 15.
        assert_eq!(upcoming[0].subscription.name, "Disney+");

        let top_two = upcoming_renewals(&subs, today(), 2);
        assert_eq!(top_two.len(), 2);
    }

    #[test]
    fn upcoming_flags_urgent_renewals() {
        let subs = fixture();
        let upcoming = upcoming_renewals(&subs, today(), 4);
        assert!(!upcoming[0].is_urgent(), "4 days out is not urgent");
        let urgent: Vec<_> = upcoming.iter().filter(|u| u.is_urgent()).collect();
        assert_eq!(urgent.len(), 0);

        let soon = upcoming_renewals(&subs, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(), 4);
        assert_eq!(soon[0].subscription.name, "Disney+");
        assert!(soon[0].is_urgent());
    }

    #[test]
    fn upcoming_skips_inactive_records() {
        let mut subs = fixture();
        subs[2].active = false; // Disney+
        let upcoming = upcoming_renewals(&subs, today(), 4);
        assert!(!upcoming.iter().any(|u| u.subscription.name == "Disney+"));
    }

    #[test]
    fn filter_streaming_sort_name_orders_disney_before_netflix() {
        let subs = fixture();
        let list = filter_and_sort(
            &subs,
            CategoryFilter::One(Category::Streaming),
            SortKey::Name,
            today(),
        );
        let names: Vec<&str> = list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Disney+", "Netflix"]);
    }

    #[test]
    fn filter_all_passes_inactive_records_through() {
        let mut subs = fixture();
        subs[1].active = false;
        let list = filter_and_sort(&subs, CategoryFilter::All, SortKey::Cost, today());
        assert_eq!(list.len(), 4);
        assert!(list.windows(2).all(|w| w[0].annual_cost() >= w[1].annual_cost()));
    }

    #[test]
    fn sort_by_renewal_uses_projected_days() {
        let subs = fixture();
        let list = filter_and_sort(&subs, CategoryFilter::All, SortKey::Renew, today());
        assert_eq!(list[0].name, "Disney+");
        // Netflix's day 14 has passed on Jan 15, so it rolls a full month out.
        assert_eq!(list[1].name, "Spotify");
        assert_eq!(list[3].name, "Netflix");
    }

    #[test]
    fn name_sort_is_stable_for_equal_keys() {
        let subs = vec![
            sub("Acme", Category::Software, BillingCadence::Monthly, 5.0, 1),
            sub("Acme", Category::Cloud, BillingCadence::Monthly, 7.0, 2),
        ];
        let list = filter_and_sort(&subs, CategoryFilter::All, SortKey::Name, today());
        assert_eq!(list[0].category, Category::Software);
        assert_eq!(list[1].category, Category::Cloud);
    }

    #[test]
    fn insight_names_top_category_with_rounded_share() {
        let subs = fixture();
        let grouped = group_by_category(&subs);
        let t = totals(&subs);
        let text = biggest_category_insight(&grouped, t.annual);
        assert!(text.contains("Streaming"), "{}", text);
        let share = (grouped[0].annual_total / t.annual * 100.0).round() as i64;
        assert!(text.contains(&format!("{}%", share)), "{}", text);
    }

    #[test]
    fn insight_handles_empty_ledger() {
        let text = biggest_category_insight(&[], 0.0);
        assert_eq!(text, "Add some subscriptions to start tracking your spending.");
    }
}

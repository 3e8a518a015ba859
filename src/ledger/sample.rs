use super::{BillingCadence, Category, Subscription, SubscriptionDraft};

/// Built-in starter dataset shown before the user has a save of their own.
pub fn sample_subscriptions() -> Vec<Subscription> {
    let records: [(&str, Category, BillingCadence, f64, u32); 8] = [
        ("Netflix", Category::Streaming, BillingCadence::Monthly, 15.49, 14),
        ("Spotify", Category::Music, BillingCadence::Monthly, 10.99, 3),
        ("Adobe Creative", Category::Software, BillingCadence::Monthly, 54.99, 22),
        ("Xbox Game Pass", Category::Gaming, BillingCadence::Monthly, 16.99, 8),
        ("Disney+", Category::Streaming, BillingCadence::Monthly, 13.99, 19),
        ("iCloud 200GB", Category::Cloud, BillingCadence::Monthly, 2.99, 1),
        ("Amazon Prime", Category::Shopping, BillingCadence::Yearly, 139.00, 11),
        ("Gym Membership", Category::Fitness, BillingCadence::Monthly, 49.99, 28),
    ];

    records
        .into_iter()
        .map(|(name, category, billing, price, renew_day)| {
            Subscription::new(SubscriptionDraft {
                name: name.into(),
                category,
                billing,
                price,
                renew_day,
            })
        })
        .collect()
}

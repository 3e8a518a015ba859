use criterion::{black_box, criterion_group, criterion_main, Criterion};

use billguard_core::ledger::{
    filter_and_sort, group_by_category, totals, upcoming_renewals, BillingCadence, Category,
    CategoryFilter, SortKey, Subscription, SubscriptionDraft,
};
use chrono::NaiveDate;

fn fixture(count: usize) -> Vec<Subscription> {
    (0..count)
        .map(|index| {
            Subscription::new(SubscriptionDraft {
                name: format!("Service {index}"),
                category: Category::ALL[index % Category::ALL.len()],
                billing: BillingCadence::ALL[index % BillingCadence::ALL.len()],
                price: 5.0 + (index % 40) as f64,
                renew_day: (index % 28 + 1) as u32,
            })
        })
        .collect()
}

fn bench_aggregates(c: &mut Criterion) {
    let subs = fixture(512);
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    c.bench_function("totals_512", |b| b.iter(|| totals(black_box(&subs))));
    c.bench_function("group_by_category_512", |b| {
        b.iter(|| group_by_category(black_box(&subs)))
    });
    c.bench_function("upcoming_renewals_512", |b| {
        b.iter(|| upcoming_renewals(black_box(&subs), today, 4))
    });
    c.bench_function("filter_and_sort_512", |b| {
        b.iter(|| filter_and_sort(black_box(&subs), CategoryFilter::All, SortKey::Cost, today))
    });
}

criterion_group!(benches, bench_aggregates);
criterion_main!(benches);

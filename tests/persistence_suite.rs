mod common;

use std::fs;
use std::path::Path;

use billguard_core::{
    ledger::{
        sample_subscriptions, totals, BillingCadence, Category, Subscription, SubscriptionDraft,
    },
    storage::{JsonStorage, SubscriptionStore},
};
use tempfile::tempdir;

use common::setup_test_env;

fn subscription(name: &str, price: f64) -> Subscription {
    Subscription::new(SubscriptionDraft {
        name: name.into(),
        category: Category::Software,
        billing: BillingCadence::Monthly,
        price,
        renew_day: 12,
    })
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

#[test]
fn roundtrip_reproduces_partition_and_totals() {
    let (storage, _config) = setup_test_env();
    let mut subs = sample_subscriptions();
    subs[0].active = false;
    subs[3].active = false;

    storage.save(&subs).expect("save subscriptions");
    let loaded = storage.load().expect("load subscriptions");

    let active = |set: &[Subscription]| {
        set.iter()
            .map(|sub| (sub.name.clone(), sub.active))
            .collect::<Vec<_>>()
    };
    assert_eq!(active(&loaded), active(&subs));
    assert_eq!(totals(&loaded), totals(&subs));
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();

    storage
        .save(&[subscription("Figma", 12.0)])
        .expect("initial save");
    let original = fs::read_to_string(storage.file_path()).expect("read original file");

    // A directory colliding with the temp file name forces File::create to fail.
    let tmp_path = tmp_path_for(storage.file_path());
    fs::create_dir_all(&tmp_path).unwrap();

    let result = storage.save(&[subscription("Figma", 99.0)]);
    assert!(
        result.is_err(),
        "expected save to fail when the temp path is a directory"
    );

    let current = fs::read_to_string(storage.file_path()).expect("read after failure");
    assert_eq!(
        current, original,
        "atomic save failure must not corrupt the original file"
    );

    let _ = fs::remove_dir_all(&tmp_path);
}

#[test]
fn corrupt_save_falls_back_to_sample_data() {
    let (storage, _config) = setup_test_env();
    fs::write(storage.file_path(), "[{ definitely not json").unwrap();

    let outcome = storage.load_or_sample();
    assert!(!outcome.started, "corrupt data must not count as a save");
    assert_eq!(outcome.subscriptions.len(), 8);
}

#[test]
fn absent_save_is_treated_as_not_started() {
    let (storage, _config) = setup_test_env();
    let outcome = storage.load_or_sample();
    assert!(!outcome.started);
    assert_eq!(outcome.subscriptions.len(), 8);

    storage.save(&outcome.subscriptions).unwrap();
    let second = storage.load_or_sample();
    assert!(second.started, "a valid save means the user has started");
}

#[test]
fn saved_file_is_a_plain_json_array() {
    let (storage, _config) = setup_test_env();
    storage.save(&[subscription("Figma", 12.0)]).unwrap();

    let raw = fs::read_to_string(storage.file_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let records = value.as_array().expect("top-level JSON array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Figma");
    assert_eq!(records[0]["category"], "software");
    assert_eq!(records[0]["billing"], "monthly");
}

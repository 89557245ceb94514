//! Reconciliation lifecycle tests against the in-memory store.

use std::sync::Arc;

use chrono::Utc;

use catalog_sync::{
    reconcile, Category, MemoryCatalogStore, NormalizedModel, Normalizer, PriceKind,
    PriceResolution, PriceSource, RawListing, ResolvedPrice,
};

fn model(owner: &str, name: &str, category: Category, price: f64) -> NormalizedModel {
    let normalizer = Normalizer::with_builtin();
    let mut listing = RawListing::new(owner, name);
    listing.description = "test model".into();
    listing.run_count = 1_000;
    normalizer.normalize(
        &listing,
        PriceResolution::Priced(ResolvedPrice {
            amount: price,
            kind: PriceKind::PerOutput,
            source: PriceSource::StructuredField,
        }),
        category,
        Utc::now(),
    )
}

#[tokio::test]
async fn reconcile_twice_with_identical_input_is_idempotent() {
    let store = Arc::new(MemoryCatalogStore::new());
    let records = vec![
        model("a", "x", Category::Image, 0.01),
        model("b", "y", Category::Image, 0.02),
    ];
    let categories = [Category::Image];

    let first = reconcile(store.as_ref(), &records, &categories, Utc::now())
        .await
        .unwrap();
    let entry_after_first = store.entry("a/x").unwrap();

    let second = reconcile(store.as_ref(), &records, &categories, Utc::now())
        .await
        .unwrap();
    let entry_after_second = store.entry("a/x").unwrap();

    assert_eq!(first.upserted, 2);
    assert_eq!(second.upserted, 2);
    assert_eq!(second.soft_deleted, 0);
    assert_eq!(second.restored, 0);
    assert_eq!(store.len(), 2);
    assert_eq!(entry_after_first.created_at, entry_after_second.created_at);
    assert!(entry_after_second.is_active());
}

#[tokio::test]
async fn active_and_soft_deleted_entries_flip_on_reappearance() {
    let store = Arc::new(MemoryCatalogStore::new());
    let categories = [Category::Image];
    let a = model("p", "a", Category::Image, 0.01);
    let b = model("p", "b", Category::Image, 0.01);

    // Seed: both present, then a run that only sees A.
    reconcile(store.as_ref(), &[a.clone(), b.clone()], &categories, Utc::now())
        .await
        .unwrap();
    reconcile(store.as_ref(), &[a.clone()], &categories, Utc::now())
        .await
        .unwrap();
    assert!(store.entry("p/a").unwrap().is_active());
    assert!(!store.entry("p/b").unwrap().is_active());

    // A run that fetches only B must soft-delete A and restore B.
    let stats = reconcile(store.as_ref(), &[b], &categories, Utc::now())
        .await
        .unwrap();
    assert_eq!(stats.soft_deleted, 1);
    assert_eq!(stats.restored, 1);
    assert!(!store.entry("p/a").unwrap().is_active());
    assert!(store.entry("p/b").unwrap().is_active());
}

#[tokio::test]
async fn soft_delete_then_restore_updates_price_and_clears_timestamp() {
    let store = Arc::new(MemoryCatalogStore::new());
    let categories = [Category::Image];

    // Run 1: the model appears at 0.01.
    reconcile(
        store.as_ref(),
        &[model("p", "x", Category::Image, 0.01)],
        &categories,
        Utc::now(),
    )
    .await
    .unwrap();
    let entry = store.entry("p/x").unwrap();
    assert!(entry.is_active());
    assert_eq!(entry.price_amount, Some(0.01));

    // Run 2: the category fetch succeeds but returns nothing.
    reconcile(store.as_ref(), &[], &categories, Utc::now())
        .await
        .unwrap();
    let entry = store.entry("p/x").unwrap();
    assert!(entry.deleted_at.is_some());

    // Run 3: it reappears at 0.02.
    reconcile(
        store.as_ref(),
        &[model("p", "x", Category::Image, 0.02)],
        &categories,
        Utc::now(),
    )
    .await
    .unwrap();
    let entry = store.entry("p/x").unwrap();
    assert!(entry.deleted_at.is_none());
    assert_eq!(entry.price_amount, Some(0.02));
}

#[tokio::test]
async fn failed_category_is_never_swept() {
    let store = Arc::new(MemoryCatalogStore::new());

    // Seed both categories.
    reconcile(
        store.as_ref(),
        &[
            model("p", "img", Category::Image, 0.01),
            model("p", "aud", Category::Audio, 0.01),
        ],
        &[Category::Image, Category::Audio],
        Utc::now(),
    )
    .await
    .unwrap();

    // Audio's fetch failed this run: it contributes no records and is
    // excluded from the sweep universe. Its entries must stay active.
    let stats = reconcile(
        store.as_ref(),
        &[model("p", "img", Category::Image, 0.01)],
        &[Category::Image],
        Utc::now(),
    )
    .await
    .unwrap();

    assert_eq!(stats.soft_deleted, 0);
    assert!(store.entry("p/aud").unwrap().is_active());
    assert!(store.entry("p/img").unwrap().is_active());
}

#[tokio::test]
async fn upsert_overwrites_mutable_fields_but_not_creation_metadata() {
    let store = Arc::new(MemoryCatalogStore::new());
    let categories = [Category::Video];

    reconcile(
        store.as_ref(),
        &[model("p", "vid", Category::Video, 0.05)],
        &categories,
        Utc::now(),
    )
    .await
    .unwrap();
    let original = store.entry("p/vid").unwrap();

    let mut updated = model("p", "vid", Category::Video, 0.07);
    updated.description = "updated description".into();
    reconcile(store.as_ref(), &[updated], &categories, Utc::now())
        .await
        .unwrap();

    let entry = store.entry("p/vid").unwrap();
    assert_eq!(entry.created_at, original.created_at);
    assert_eq!(entry.model_id, original.model_id);
    assert_eq!(entry.description, "updated description");
    assert_eq!(entry.price_amount, Some(0.07));
}

#[tokio::test]
async fn unresolved_price_persists_as_absent() {
    let store = Arc::new(MemoryCatalogStore::new());
    let normalizer = Normalizer::with_builtin();
    let listing = RawListing::new("p", "mystery");
    let record = normalizer.normalize(
        &listing,
        PriceResolution::Unresolved,
        Category::Image,
        Utc::now(),
    );

    reconcile(store.as_ref(), &[record], &[Category::Image], Utc::now())
        .await
        .unwrap();

    let entry = store.entry("p/mystery").unwrap();
    assert_eq!(entry.price_amount, None);
    assert_eq!(entry.price_kind, None);
}

#[tokio::test]
async fn known_free_persists_as_zero_with_free_kind() {
    let store = Arc::new(MemoryCatalogStore::new());
    let normalizer = Normalizer::with_builtin();
    let listing = RawListing::new("p", "gratis");
    let record =
        normalizer.normalize(&listing, PriceResolution::Free, Category::Image, Utc::now());

    reconcile(store.as_ref(), &[record], &[Category::Image], Utc::now())
        .await
        .unwrap();

    let entry = store.entry("p/gratis").unwrap();
    assert_eq!(entry.price_amount, Some(0.0));
    assert_eq!(entry.price_kind, Some(PriceKind::Free));
}

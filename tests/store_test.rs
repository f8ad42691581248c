use chrono::{Duration, Utc};
use zylo_estate::storage::entity::{
    BuilderPatch, GeoType, NewBuilder, NewLegalDoc, NewMarketStat, NewOffer, NewProject,
    NewUnit, LegalDocType, OfferType, PriceBand, ProjectPatch, ProjectStatus,
    UnitPatch, Visibility, InventoryStatus,
};
use zylo_estate::storage::repository::{
    BuilderRepository, LegalDocRepository, MarketStatRepository, OfferRepository,
    ProjectRepository, UnitRepository,
};
use zylo_estate::storage::StoreCounts;
use zylo_estate::{Store, StoreError};

fn lakeside() -> NewProject {
    let mut p = NewProject::new(
        "Prestige Lakeside Habitat",
        "builder-prestige",
        "Bangalore",
        "Whitefield",
        ProjectStatus::UnderConstruction,
        PriceBand::inr(12_000_000, 25_000_000),
    );
    p.credibility_score = Some(92);
    p.amenities = Some(vec!["Gym".into(), "Pool".into()]);
    p
}

#[tokio::test]
async fn get_returns_what_create_stored() {
    let store = Store::new();
    let created = ProjectRepository::create(&store, lakeside()).await.unwrap();
    let fetched = ProjectRepository::get(&store, &created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Prestige Lakeside Habitat");
    assert_eq!(fetched.amenities, ["Gym", "Pool"]);
    assert!(!fetched.approved);
    assert!(ProjectRepository::get(&store, "missing").await.is_none());
}

#[tokio::test]
async fn create_fills_documented_defaults() {
    let store = Store::new();
    let b = BuilderRepository::create(&store, NewBuilder::named("Acme")).await.unwrap();
    assert!(!b.verified);
    assert_eq!(b.inventory_freshness_hours, 24);
    assert_eq!(b.sla_response_minutes, 30);

    let mut bare = lakeside();
    bare.credibility_score = None;
    let p = ProjectRepository::create(&store, bare).await.unwrap();
    assert_eq!(p.credibility_score, 0);

    let u = UnitRepository::create(&store, NewUnit::new(&p.id, 2, 1000.0, 9_000_000))
        .await
        .unwrap();
    assert_eq!(u.inventory_status, InventoryStatus::Available);
}

#[tokio::test]
async fn update_missing_id_is_not_found_and_creates_nothing() {
    let store = Store::new();
    ProjectRepository::create(&store, lakeside()).await.unwrap();
    let before = store.counts().await;

    let patch = ProjectPatch {
        name: Some("Ghost".into()),
        ..Default::default()
    };
    let out = ProjectRepository::update(&store, "nope", patch).await.unwrap();
    assert!(out.is_none());
    assert_eq!(store.counts().await, before);

    let err = BuilderRepository::verify(&store, "nope").await.unwrap_err();
    assert_eq!(err, StoreError::not_found("builder", "nope"));
    assert!(matches!(
        ProjectRepository::approve(&store, "nope").await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn update_is_shallow_and_validated_before_write() {
    let store = Store::new();
    let p = ProjectRepository::create(&store, lakeside()).await.unwrap();

    let bad = ProjectPatch {
        price_band: Some(PriceBand::inr(30_000_000, 10_000_000)),
        ..Default::default()
    };
    let err = ProjectRepository::update(&store, &p.id, bad).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(ProjectRepository::get(&store, &p.id).await.unwrap(), p);

    let patch = ProjectPatch {
        amenities: Some(vec!["Spa".into()]),
        credibility_score: Some(70),
        ..Default::default()
    };
    let updated = ProjectRepository::update(&store, &p.id, patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.amenities, ["Spa"]);
    assert_eq!(updated.credibility_score, 70);
    assert_eq!(updated.name, p.name);
    assert_eq!(updated.created_at, p.created_at);

    let too_high = ProjectPatch {
        credibility_score: Some(101),
        ..Default::default()
    };
    assert!(ProjectRepository::update(&store, &p.id, too_high).await.is_err());
}

#[tokio::test]
async fn invalid_payloads_leave_store_untouched() {
    let store = Store::new();
    let mut bad = lakeside();
    bad.price_band = PriceBand::inr(-1, 10);
    assert!(ProjectRepository::create(&store, bad).await.is_err());

    let mut rating = NewBuilder::named("Acme");
    rating.rating = Some(5.5);
    assert!(BuilderRepository::create(&store, rating).await.is_err());

    let stat = NewMarketStat::new("Pune", GeoType::City, "2024-13", 7000.0);
    assert!(MarketStatRepository::create(&store, stat).await.is_err());

    let doc = NewLegalDoc {
        project_id: "p1".into(),
        doc_type: LegalDocType::Title,
        file_url: " ".into(),
        ocr_text: None,
        risk_flags: None,
        summary: None,
        verified: None,
    };
    assert!(LegalDocRepository::create(&store, doc).await.is_err());

    let offer = NewOffer {
        builder_id: "b1".into(),
        project_id: None,
        offer_type: OfferType::Discount,
        title: "Festive".into(),
        details: "Flat off".into(),
        valid_till: Utc::now() + Duration::days(10),
        visibility: Some(Visibility::Public),
        terms: None,
        discount_pct: Some(120.0),
    };
    assert!(OfferRepository::create(&store, offer).await.is_err());

    assert_eq!(store.counts().await, StoreCounts::default());
}

#[tokio::test]
async fn unit_patch_keeps_untouched_fields() {
    let store = Store::with_sample_data().await.unwrap();
    let patch = UnitPatch {
        inventory_status: Some(InventoryStatus::Sold),
        ..Default::default()
    };
    let sold = UnitRepository::update(&store, "unit-1", patch).await.unwrap().unwrap();
    assert_eq!(sold.inventory_status, InventoryStatus::Sold);
    assert_eq!(sold.unit_number.as_deref(), Some("T1-505"));
}

#[tokio::test]
async fn by_parent_lists_are_empty_not_errors() {
    let store = Store::with_sample_data().await.unwrap();
    assert!(UnitRepository::list_by_project(&store, "nope").await.is_empty());
    assert!(OfferRepository::list_by_builder(&store, "nope").await.is_empty());
    assert_eq!(
        UnitRepository::list_by_project(&store, "project-prestige-lakeside")
            .await
            .len(),
        1
    );

    let patch = BuilderPatch {
        rating: Some(4.1),
        ..Default::default()
    };
    let b = BuilderRepository::update(&store, "builder-brigade", patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(b.rating, 4.1);
    let b = BuilderRepository::recompute_stats(&store, "builder-brigade", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(b.project_count, 0);
    assert_eq!(b.rating, 4.1);
}

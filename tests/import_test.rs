use chrono::{Datelike, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use zylo_estate::import::mapper::{self, MappingConfig};
use zylo_estate::import::{spawn_import, FeedClient, ImportService, PlaceholderGen, RawListing};
use zylo_estate::storage::entity::{PriceBand, ProjectStatus};
use zylo_estate::storage::repository::{BuilderRepository, ProjectRepository};
use zylo_estate::Store;

const FEED: &str = r##"[
  {"id": 7001, "name": "Skyline Residences", "builder": "Acme Developers",
   "location": ["Pune", "Baner", "411045", "Survey 12, Baner Road"],
   "images": ["a.jpg", "b.jpg", "c.jpg"], "price": "Rs. 2.5 Cr",
   "possession": "Dec 2030", "type": ["Apartment"], "typeDetail": ["2 BHK", "3 BHK", "3 BHK"],
   "rera": ["P52100012345", "https://maharera.example/P52100012345"],
   "keywords": "Luxury, RERA, premium, modern, family homes"},
  {"id": "7002", "name": "Harbour View", "builder": "Acme Developers",
   "location": ["Mumbai", "Worli"], "images": [], "price": "On Request",
   "possession": "Possession 2019", "rera": ["#", ""]},
  {"id": "", "name": "No Id Tower"},
  {"id": 7003, "name": "Orphan Heights", "builder": "",
   "location": ["Hyderabad", "Kokapet"], "price": "garbage"}
]"##;

/// 每个连接都回同一份响应体
async fn serve(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = sock.read(&mut buf).await;
                let resp = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    format!("http://{addr}/api/properties")
}

fn importer(store: Arc<Store>, url: String, limit: Option<usize>) -> ImportService {
    let feed = FeedClient::new(url, Duration::from_secs(5)).unwrap();
    ImportService::new(
        store,
        feed,
        MappingConfig::default(),
        limit,
        PlaceholderGen::from_seed(7),
    )
}

#[tokio::test]
async fn feed_import_end_to_end_and_rerun_is_idempotent() {
    let url = serve(FEED).await;
    let store = Arc::new(Store::new());
    let service = Arc::new(importer(store.clone(), url, None));

    let report = spawn_import(service.clone()).await.unwrap();
    assert_eq!(report.fetched, 4);
    assert_eq!(report.imported, 3);
    assert_eq!(report.skipped_invalid, 1);
    assert_eq!(report.builders_created, 2);

    let skyline = ProjectRepository::get(&store, "mt_7001").await.unwrap();
    assert_eq!(skyline.price_band, PriceBand::inr(22_500_000, 32_500_000));
    assert_eq!(
        skyline.status,
        mapper::derive_status("Dec 2030", Utc::now().year())
    );
    assert_eq!(skyline.state.as_deref(), Some("Maharashtra"));
    assert_eq!(skyline.rera_id.as_deref(), Some("P52100012345"));
    assert_eq!(skyline.credibility_score, 100);
    assert_eq!(skyline.media.len(), 3);
    assert_eq!(skyline.highlights.len(), 4);
    assert!(skyline.approved);
    let bhks: Vec<u32> = skyline.floor_plans.iter().map(|f| f.bhk).collect();
    assert_eq!(bhks, [2, 3]);

    let harbour = ProjectRepository::get(&store, "mt_7002").await.unwrap();
    assert_eq!(harbour.status, ProjectStatus::Ready);
    assert_eq!(harbour.rera_id, None);
    assert!(harbour.price_band.min >= 50_000_000);
    assert!(harbour.price_band.max <= 200_000_000);
    assert_eq!(harbour.builder_id, skyline.builder_id);

    let acme = BuilderRepository::get(&store, &skyline.builder_id).await.unwrap();
    assert_eq!(acme.name, "Acme Developers");
    assert_eq!(acme.project_count, 2);

    let orphan = ProjectRepository::get(&store, "mt_7003").await.unwrap();
    let unknown = BuilderRepository::get(&store, &orphan.builder_id).await.unwrap();
    assert_eq!(unknown.name, "Unknown Builder");

    let before = store.counts().await;
    let again = service.run().await;
    assert_eq!(again.imported, 0);
    assert_eq!(again.skipped_existing, 3);
    assert_eq!(again.builders_created, 0);
    assert_eq!(store.counts().await, before);
}

#[tokio::test]
async fn limit_caps_processed_records() {
    let url = serve(FEED).await;
    let store = Arc::new(Store::new());
    let report = importer(store.clone(), url, Some(1)).run().await;
    assert_eq!(report.imported, 1);
    assert_eq!(store.counts().await.projects, 1);
}

#[tokio::test]
async fn unreachable_feed_imports_nothing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = Arc::new(Store::new());
    let report = importer(store.clone(), format!("http://{addr}/"), None).run().await;
    assert_eq!(report.fetched, 0);
    assert_eq!(store.counts().await.projects, 0);
}

#[test]
fn full_marks_listing_scores_one_hundred() {
    let cfg = MappingConfig::default();
    let raw = RawListing {
        id: "1".into(),
        name: "Full Marks".into(),
        builder: "Acme".into(),
        images: vec!["a".into(), "b".into(), "c".into()],
        price: "Rs. 3 Cr".into(),
        rera: vec!["RERA-1".into()],
        ..Default::default()
    };
    assert_eq!(mapper::credibility_score(&raw, &cfg), 100);

    let bare = RawListing {
        id: "2".into(),
        name: "Bare".into(),
        price: "On Request".into(),
        rera: vec!["#".into()],
        ..Default::default()
    };
    assert_eq!(mapper::credibility_score(&bare, &cfg), 60);
}

#[test]
fn status_tracks_possession_year() {
    let year = Utc::now().year();
    assert_eq!(
        mapper::derive_status(&format!("Dec {}", year - 1), year),
        ProjectStatus::Ready
    );
    assert_eq!(
        mapper::derive_status(&format!("Mar {year}"), year),
        ProjectStatus::NearingCompletion
    );
    assert_eq!(
        mapper::derive_status(&format!("Mar {}", year + 1), year),
        ProjectStatus::UnderConstruction
    );
    assert_eq!(
        mapper::derive_status(&format!("Mar {}", year + 3), year),
        ProjectStatus::Launched
    );
    assert_eq!(
        mapper::derive_status("TBD", year),
        ProjectStatus::UnderConstruction
    );
}

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use zylo_estate::storage::entity::{NewProject, PriceBand, ProjectPatch, ProjectStatus};
use zylo_estate::storage::repository::ProjectRepository;
use zylo_estate::Store;

fn tower(i: usize) -> NewProject {
    NewProject::new(
        format!("Tower {i}"),
        "b1",
        "Chennai",
        "OMR",
        ProjectStatus::Launched,
        PriceBand::inr(1_000_000, 2_000_000),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_ids() {
    let store = Arc::new(Store::new());
    let tasks = (0..64).map(|i| {
        let store = store.clone();
        tokio::spawn(async move { ProjectRepository::create(&store, tower(i)).await })
    });
    let created: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap())
        .collect();

    let ids: HashSet<&str> = created.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), 64);
    assert_eq!(store.counts().await.projects, 64);
    for p in &created {
        assert_eq!(ProjectRepository::get(&store, &p.id).await.as_ref(), Some(p));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_never_lose_the_record() {
    let store = Arc::new(Store::new());
    let p = ProjectRepository::create(&store, tower(0)).await.unwrap();

    let tasks = (0..32u32).map(|score| {
        let store = store.clone();
        let id = p.id.clone();
        tokio::spawn(async move {
            let patch = ProjectPatch {
                credibility_score: Some(score),
                ..Default::default()
            };
            ProjectRepository::update(&store, &id, patch).await
        })
    });
    for r in join_all(tasks).await {
        assert!(r.unwrap().unwrap().is_some());
    }

    let last = ProjectRepository::get(&store, &p.id).await.unwrap();
    assert!(last.credibility_score < 32);
    assert_eq!(last.name, "Tower 0");
    assert_eq!(store.counts().await.projects, 1);
}

//! 内置示例目录：4 个开发商、3 个项目、2 套房源、2 条市场统计。
//! 固定 id，便于命令行和测试直接引用。

use crate::storage::entity::{
    Avm, BuilderContact, Connectivity, FloorPlan, GeoType, Media, MediaType, NewBuilder,
    NewMarketStat, NewProject, NewUnit, PriceBand, ProjectStatus, Roi, RoiScenarios,
};
use crate::storage::repository::{
    BuilderRepository, MarketStatRepository, ProjectRepository, UnitRepository,
};
use crate::storage::{Store, StoreError};
use chrono::NaiveDate;

struct SeedBuilder {
    id: &'static str,
    name: &'static str,
    rera_id: &'static str,
    freshness_hours: u32,
    sla_minutes: u32,
    phone: &'static str,
    email: &'static str,
    website: &'static str,
    rating: f64,
    project_count: u32,
    description: &'static str,
}

const BUILDERS: &[SeedBuilder] = &[
    SeedBuilder {
        id: "builder-prestige",
        name: "Prestige Group",
        rera_id: "PRM/KA/RERA/1251/309",
        freshness_hours: 12,
        sla_minutes: 15,
        phone: "+91 80 4055 9999",
        email: "sales@prestigeconstructions.com",
        website: "https://www.prestigeconstructions.com",
        rating: 4.8,
        project_count: 125,
        description: "Leading real estate developer in South India with 35+ years of experience",
    },
    SeedBuilder {
        id: "builder-dlf",
        name: "DLF Limited",
        rera_id: "RC/REP/HARERA/GGM/766/499",
        freshness_hours: 18,
        sla_minutes: 20,
        phone: "+91 124 4513 000",
        email: "customercare@dlf.in",
        website: "https://www.dlf.in",
        rating: 4.6,
        project_count: 200,
        description: "India's largest real estate developer with pan-India presence",
    },
    SeedBuilder {
        id: "builder-godrej",
        name: "Godrej Properties",
        rera_id: "P51700000652",
        freshness_hours: 10,
        sla_minutes: 12,
        phone: "+91 22 2518 8070",
        email: "customercare@godrejproperties.com",
        website: "https://www.godrejproperties.com",
        rating: 4.9,
        project_count: 90,
        description: "Trusted real estate brand with innovative and sustainable developments",
    },
    SeedBuilder {
        id: "builder-brigade",
        name: "Brigade Group",
        rera_id: "PRM/KA/RERA/1251/308",
        freshness_hours: 16,
        sla_minutes: 18,
        phone: "+91 80 4179 4179",
        email: "info@brigadegroup.com",
        website: "https://www.brigadegroup.com",
        rating: 4.5,
        project_count: 75,
        description: "Bangalore-based real estate developer known for quality constructions",
    },
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn image(url: &str, score: u32) -> Media {
    Media {
        url: url.to_string(),
        media_type: MediaType::Image,
        verified: true,
        score,
        caption: None,
    }
}

fn plan(bhk: u32, area: f64, price: i64) -> FloorPlan {
    FloorPlan {
        bhk,
        area,
        price,
        image_url: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn project(
    name: &str,
    builder_id: &str,
    rera_id: &str,
    city: &str,
    locality: &str,
    (lat, lng): (f64, f64),
    status: ProjectStatus,
    possession: Option<NaiveDate>,
    band: (i64, i64),
    score: u32,
) -> NewProject {
    let mut p = NewProject::new(
        name,
        builder_id,
        city,
        locality,
        status,
        PriceBand::inr(band.0, band.1),
    );
    p.rera_id = Some(rera_id.to_string());
    p.lat = Some(lat);
    p.lng = Some(lng);
    p.possession_date = possession;
    p.credibility_score = Some(score);
    p.approved = Some(true);
    p.featured = Some(true);
    p
}

fn projects() -> Vec<(&'static str, NewProject)> {
    let mut lakeside = project(
        "Prestige Lakeside Habitat",
        "builder-prestige",
        "PRM/KA/RERA/1251/309",
        "Bangalore",
        "Whitefield",
        (12.9698, 77.75),
        ProjectStatus::UnderConstruction,
        NaiveDate::from_ymd_opt(2025, 12, 31),
        (12_000_000, 25_000_000),
        92,
    );
    lakeside.state = Some("Karnataka".to_string());
    lakeside.amenities = Some(strings(&[
        "Swimming Pool",
        "Gym",
        "Club House",
        "Children's Play Area",
        "24/7 Security",
        "Power Backup",
    ]));
    lakeside.connectivity = Some(Connectivity {
        metro_km: Some(5.2),
        airport_km: Some(35.0),
        railway_km: Some(8.0),
        it_hub_km: Some(2.5),
    });
    lakeside.media = Some(vec![image(
        "https://images.unsplash.com/photo-1545324418-cc1a3fa10c00",
        95,
    )]);
    lakeside.sources = Some(strings(&["RERA Portal", "Builder Direct", "Municipal Records"]));
    lakeside.description =
        Some("Premium residential development with lake views and world-class amenities".into());
    lakeside.highlights = Some(strings(&[
        "Lake Facing",
        "RERA Approved",
        "Near IT Parks",
        "Metro Connectivity",
    ]));
    lakeside.floor_plans = Some(vec![
        plan(2, 1200.0, 12_000_000),
        plan(3, 1800.0, 18_000_000),
    ]);

    let mut privana = project(
        "DLF Privana South",
        "builder-dlf",
        "RC/REP/HARERA/GGM/766/499",
        "Gurgaon",
        "Sector 77",
        (28.3836, 77.0642),
        ProjectStatus::Ready,
        NaiveDate::from_ymd_opt(2024, 6, 30),
        (28_000_000, 55_000_000),
        88,
    );
    privana.state = Some("Haryana".to_string());
    privana.amenities = Some(strings(&[
        "Swimming Pool",
        "Spa",
        "Golf Course",
        "Concierge",
        "Valet Parking",
        "High-Speed Elevators",
    ]));
    privana.connectivity = Some(Connectivity {
        metro_km: Some(3.5),
        airport_km: Some(25.0),
        railway_km: Some(12.0),
        it_hub_km: Some(8.0),
    });
    privana.media = Some(vec![image(
        "https://images.unsplash.com/photo-1545324418-cc1a3fa10c00",
        88,
    )]);
    privana.sources = Some(strings(&["RERA Portal", "Builder Direct"]));
    privana.description = Some(
        "Ultra-luxury residential towers with premium amenities and prime location".into(),
    );
    privana.highlights = Some(strings(&[
        "Ready to Move",
        "Golf Course Views",
        "Metro Connected",
        "Premium Location",
    ]));
    privana.floor_plans = Some(vec![
        plan(3, 1800.0, 28_000_000),
        plan(4, 2500.0, 45_000_000),
    ]);

    let mut reserve = project(
        "Godrej Reserve",
        "builder-godrej",
        "P51700000652",
        "Mumbai",
        "Kandivali East",
        (19.2056, 72.8681),
        ProjectStatus::UnderConstruction,
        NaiveDate::from_ymd_opt(2026, 3, 31),
        (35_000_000, 80_000_000),
        95,
    );
    reserve.state = Some("Maharashtra".to_string());
    reserve.amenities = Some(strings(&[
        "Forest Trail",
        "Organic Farming",
        "Yoga Deck",
        "Adventure Sports",
        "Amphitheatre",
        "Pet Park",
    ]));
    reserve.connectivity = Some(Connectivity {
        metro_km: Some(2.8),
        airport_km: Some(18.0),
        railway_km: Some(1.5),
        it_hub_km: Some(15.0),
    });
    reserve.media = Some(vec![image(
        "https://images.unsplash.com/photo-1564013799919-ab600027ffc6",
        95,
    )]);
    reserve.sources = Some(strings(&[
        "RERA Portal",
        "Builder Direct",
        "Municipal Records",
        "Environmental Clearance",
    ]));
    reserve.description = Some(
        "Luxury residences amidst 100 acres of lush greenery with sustainable living features"
            .into(),
    );
    reserve.highlights = Some(strings(&[
        "100 Acres Green",
        "Sustainable Living",
        "Premium Amenities",
        "Metro Proximity",
    ]));
    reserve.floor_plans = Some(vec![
        plan(4, 2200.0, 35_000_000),
        plan(5, 3000.0, 55_000_000),
    ]);

    vec![
        ("project-prestige-lakeside", lakeside),
        ("project-dlf-privana", privana),
        ("project-godrej-reserve", reserve),
    ]
}

#[allow(clippy::too_many_arguments)]
fn unit(
    project_id: &str,
    bhk: u32,
    carpet: f64,
    price: i64,
    facing: &str,
    floor: i32,
    avm: (i64, i64, i64, f64),
    yield_pct: f64,
    (appreciation, irr): (f64, f64),
    (bull, bear): (f64, f64),
    unit_number: &str,
) -> NewUnit {
    let mut u = NewUnit::new(project_id, bhk, carpet, price);
    u.facing = Some(facing.to_string());
    u.floor = Some(floor);
    u.avm = Some(Avm {
        fair_value: avm.0,
        low: avm.1,
        high: avm.2,
        confidence: avm.3,
    });
    u.rent_yield_pct = Some(yield_pct);
    u.roi = Some(Roi {
        appreciation,
        yield_pct,
        irr,
        scenarios: RoiScenarios {
            bull,
            base: appreciation,
            bear,
        },
    });
    u.unit_number = Some(unit_number.to_string());
    u
}

fn market(
    geo: &str,
    median: f64,
    qoq: f64,
    yoy: f64,
    inventory: f64,
    absorption: f64,
    launches: u32,
) -> NewMarketStat {
    let mut m = NewMarketStat::new(geo, GeoType::City, "2024-08", median);
    m.qoq_pct = Some(qoq);
    m.yoy_pct = Some(yoy);
    m.inventory_index = Some(inventory);
    m.price_per_sqft = Some(median);
    m.absorption_rate = Some(absorption);
    m.new_launches = Some(launches);
    m
}

pub async fn load_sample_data(store: &Store) -> Result<(), StoreError> {
    for b in BUILDERS {
        let new = NewBuilder {
            verified: Some(true),
            rera_ids: Some(vec![b.rera_id.to_string()]),
            inventory_freshness_hours: Some(b.freshness_hours),
            sla_response_minutes: Some(b.sla_minutes),
            contact: Some(BuilderContact {
                phone: Some(b.phone.to_string()),
                email: Some(b.email.to_string()),
                website: Some(b.website.to_string()),
            }),
            rating: Some(b.rating),
            project_count: Some(b.project_count),
            description: Some(b.description.to_string()),
            ..NewBuilder::named(b.name)
        };
        BuilderRepository::create_with_id(store, b.id, new).await?;
    }

    for (id, new) in projects() {
        ProjectRepository::create_with_id(store, id, new).await?;
    }

    let units = [
        (
            "unit-1",
            unit(
                "project-prestige-lakeside",
                2,
                1200.0,
                12_000_000,
                "East",
                5,
                (12_500_000, 11_800_000, 13_200_000, 0.85),
                3.2,
                (12.5, 15.8),
                (18.5, 8.2),
                "T1-505",
            ),
        ),
        (
            "unit-2",
            unit(
                "project-dlf-privana",
                3,
                1800.0,
                28_000_000,
                "North",
                12,
                (29_200_000, 27_500_000, 31_000_000, 0.78),
                2.8,
                (8.5, 11.3),
                (13.2, 5.8),
                "A-1205",
            ),
        ),
    ];
    for (id, new) in units {
        UnitRepository::create_with_id(store, id, new).await?;
    }

    MarketStatRepository::create_with_id(
        store,
        "market-bangalore-2024-08",
        market("Bangalore", 6850.0, 3.2, 12.5, 125.5, 15.8, 25),
    )
    .await?;
    MarketStatRepository::create_with_id(
        store,
        "market-mumbai-2024-08",
        market("Mumbai", 15200.0, 2.8, 8.9, 98.2, 12.3, 18),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_catalogue_loads_once() {
        let store = Store::new();
        load_sample_data(&store).await.unwrap();
        let counts = store.counts().await;
        assert_eq!(counts.builders, 4);
        assert_eq!(counts.projects, 3);
        assert_eq!(counts.units, 2);
        assert_eq!(counts.market_stats, 2);

        let err = load_sample_data(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { field: "id", .. }));
    }
}

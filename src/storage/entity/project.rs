use super::{require_non_empty, require_non_negative, Patch, Record, Validate};
use crate::storage::error::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_CREDIBILITY_SCORE: u32 = 100;

text_enum! {
    /// 项目进度。`nearing_completion` 只由外部数据导入推导得到。
    pub enum ProjectStatus {
        Launched => "launched",
        NearingCompletion => "nearing_completion",
        UnderConstruction => "under_construction",
        Ready => "ready",
    }
}

text_enum! {
    pub enum MediaType {
        Image => "image",
        Video => "video",
        Tour => "tour",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Connectivity {
    #[serde(rename = "metroKm", default)]
    pub metro_km: Option<f64>,
    #[serde(rename = "airportKm", default)]
    pub airport_km: Option<f64>,
    #[serde(rename = "railwayKm", default)]
    pub railway_km: Option<f64>,
    #[serde(rename = "it_hubKm", default)]
    pub it_hub_km: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: i64,
    pub max: i64,
    pub currency: String,
}

impl PriceBand {
    pub fn inr(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            currency: "INR".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlan {
    pub bhk: u32,
    pub area: f64,
    pub price: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub builder_id: String,
    pub rera_id: Option<String>,
    pub rera_link: Option<String>,
    pub city: String,
    pub locality: String,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub status: ProjectStatus,
    pub possession_date: Option<NaiveDate>,
    pub possession_timeline: Option<String>,
    pub amenities: Vec<String>,
    pub connectivity: Option<Connectivity>,
    pub price_band: PriceBand,
    pub media: Vec<Media>,
    pub credibility_score: u32,
    pub sources: Vec<String>,
    pub last_verified: DateTime<Utc>,
    pub description: Option<String>,
    pub highlights: Vec<String>,
    pub floor_plans: Vec<FloorPlan>,
    pub unit_types: Vec<String>,
    pub approved: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn has_rera(&self) -> bool {
        self.rera_id.is_some()
    }
}

impl Record for Project {
    const ENTITY: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for Project {
    fn validate(&self) -> Result<(), StoreError> {
        require_non_empty("project.name", &self.name)?;
        require_non_empty("project.builderId", &self.builder_id)?;
        require_non_empty("project.city", &self.city)?;
        require_non_negative("project.priceBand.min", self.price_band.min as f64)?;
        require_non_negative("project.priceBand.max", self.price_band.max as f64)?;
        if self.price_band.min > self.price_band.max {
            return Err(StoreError::invalid(format!(
                "project.priceBand.min ({}) exceeds max ({})",
                self.price_band.min, self.price_band.max
            )));
        }
        if self.credibility_score > MAX_CREDIBILITY_SCORE {
            return Err(StoreError::invalid(format!(
                "project.credibilityScore must be within [0, 100], got {}",
                self.credibility_score
            )));
        }
        if let Some(lat) = self.lat {
            super::require_range("project.lat", lat, -90.0, 90.0)?;
        }
        if let Some(lng) = self.lng {
            super::require_range("project.lng", lng, -180.0, 180.0)?;
        }
        for plan in &self.floor_plans {
            require_non_negative("project.floorPlans.area", plan.area)?;
            require_non_negative("project.floorPlans.price", plan.price as f64)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub builder_id: String,
    pub city: String,
    pub locality: String,
    pub status: ProjectStatus,
    pub price_band: PriceBand,
    #[serde(default)]
    pub rera_id: Option<String>,
    #[serde(default)]
    pub rera_link: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub possession_date: Option<NaiveDate>,
    #[serde(default)]
    pub possession_timeline: Option<String>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub connectivity: Option<Connectivity>,
    #[serde(default)]
    pub media: Option<Vec<Media>>,
    #[serde(default)]
    pub credibility_score: Option<u32>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub highlights: Option<Vec<String>>,
    #[serde(default)]
    pub floor_plans: Option<Vec<FloorPlan>>,
    #[serde(default)]
    pub unit_types: Option<Vec<String>>,
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default)]
    pub featured: Option<bool>,
}

impl NewProject {
    pub fn new(
        name: impl Into<String>,
        builder_id: impl Into<String>,
        city: impl Into<String>,
        locality: impl Into<String>,
        status: ProjectStatus,
        price_band: PriceBand,
    ) -> Self {
        Self {
            name: name.into(),
            builder_id: builder_id.into(),
            city: city.into(),
            locality: locality.into(),
            status,
            price_band,
            rera_id: None,
            rera_link: None,
            state: None,
            pincode: None,
            address: None,
            lat: None,
            lng: None,
            possession_date: None,
            possession_timeline: None,
            amenities: None,
            connectivity: None,
            media: None,
            credibility_score: None,
            sources: None,
            description: None,
            highlights: None,
            floor_plans: None,
            unit_types: None,
            approved: None,
            featured: None,
        }
    }

    pub fn into_project(self, id: String, now: DateTime<Utc>) -> Project {
        Project {
            id,
            name: self.name,
            builder_id: self.builder_id,
            rera_id: self.rera_id,
            rera_link: self.rera_link,
            city: self.city,
            locality: self.locality,
            state: self.state,
            pincode: self.pincode,
            address: self.address,
            lat: self.lat,
            lng: self.lng,
            status: self.status,
            possession_date: self.possession_date,
            possession_timeline: self.possession_timeline,
            amenities: self.amenities.unwrap_or_default(),
            connectivity: self.connectivity,
            price_band: self.price_band,
            media: self.media.unwrap_or_default(),
            credibility_score: self.credibility_score.unwrap_or(0),
            sources: self.sources.unwrap_or_default(),
            last_verified: now,
            description: self.description,
            highlights: self.highlights.unwrap_or_default(),
            floor_plans: self.floor_plans.unwrap_or_default(),
            unit_types: self.unit_types.unwrap_or_default(),
            approved: self.approved.unwrap_or(false),
            featured: self.featured.unwrap_or(false),
            created_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub builder_id: Option<String>,
    pub rera_id: Option<String>,
    pub rera_link: Option<String>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub status: Option<ProjectStatus>,
    pub possession_date: Option<NaiveDate>,
    pub possession_timeline: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub connectivity: Option<Connectivity>,
    pub price_band: Option<PriceBand>,
    pub media: Option<Vec<Media>>,
    pub credibility_score: Option<u32>,
    pub sources: Option<Vec<String>>,
    pub last_verified: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub highlights: Option<Vec<String>>,
    pub floor_plans: Option<Vec<FloorPlan>>,
    pub unit_types: Option<Vec<String>>,
    pub approved: Option<bool>,
    pub featured: Option<bool>,
}

impl Patch<Project> for ProjectPatch {
    fn apply_to(self, target: &mut Project) {
        patch_fields!(self, target, {
            name,
            builder_id,
            city,
            locality,
            status,
            amenities,
            price_band,
            media,
            credibility_score,
            sources,
            last_verified,
            highlights,
            floor_plans,
            unit_types,
            approved,
            featured,
        });
        patch_optional_fields!(self, target, {
            rera_id,
            rera_link,
            state,
            pincode,
            address,
            lat,
            lng,
            possession_date,
            possession_timeline,
            connectivity,
            description,
        });
    }
}

use super::{require_non_empty, require_range, Patch, Record, Validate};
use crate::storage::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INVENTORY_FRESHNESS_HOURS: u32 = 24;
pub const DEFAULT_SLA_RESPONSE_MINUTES: u32 = 30;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderContact {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Builder {
    pub id: String,
    pub name: String,
    pub verified: bool,
    pub rera_ids: Vec<String>,
    pub inventory_freshness_hours: u32,
    pub sla_response_minutes: u32,
    pub contact: Option<BuilderContact>,
    /// 0–5，一位或两位小数
    pub rating: f64,
    pub project_count: u32,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Builder {
    const ENTITY: &'static str = "builder";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for Builder {
    fn validate(&self) -> Result<(), StoreError> {
        require_non_empty("builder.name", &self.name)?;
        require_range("builder.rating", self.rating, 0.0, 5.0)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewBuilder {
    pub name: String,
    pub verified: Option<bool>,
    pub rera_ids: Option<Vec<String>>,
    pub inventory_freshness_hours: Option<u32>,
    pub sla_response_minutes: Option<u32>,
    pub contact: Option<BuilderContact>,
    pub rating: Option<f64>,
    pub project_count: Option<u32>,
    pub description: Option<String>,
    pub logo: Option<String>,
}

impl NewBuilder {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn into_builder(self, id: String, now: DateTime<Utc>) -> Builder {
        Builder {
            id,
            name: self.name,
            verified: self.verified.unwrap_or(false),
            rera_ids: self.rera_ids.unwrap_or_default(),
            inventory_freshness_hours: self
                .inventory_freshness_hours
                .unwrap_or(DEFAULT_INVENTORY_FRESHNESS_HOURS),
            sla_response_minutes: self
                .sla_response_minutes
                .unwrap_or(DEFAULT_SLA_RESPONSE_MINUTES),
            contact: self.contact,
            rating: self.rating.unwrap_or(0.0),
            project_count: self.project_count.unwrap_or(0),
            description: self.description,
            logo: self.logo,
            created_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderPatch {
    pub name: Option<String>,
    pub verified: Option<bool>,
    pub rera_ids: Option<Vec<String>>,
    pub inventory_freshness_hours: Option<u32>,
    pub sla_response_minutes: Option<u32>,
    pub contact: Option<BuilderContact>,
    pub rating: Option<f64>,
    pub project_count: Option<u32>,
    pub description: Option<String>,
    pub logo: Option<String>,
}

impl Patch<Builder> for BuilderPatch {
    fn apply_to(self, target: &mut Builder) {
        patch_fields!(self, target, {
            name,
            verified,
            rera_ids,
            inventory_freshness_hours,
            sla_response_minutes,
            rating,
            project_count,
        });
        patch_optional_fields!(self, target, { contact, description, logo });
    }
}

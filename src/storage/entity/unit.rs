use super::{require_non_empty, require_non_negative, require_range, Patch, Record, Validate};
use crate::storage::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    pub enum InventoryStatus {
        Available => "available",
        Hold => "hold",
        Sold => "sold",
    }
}

/// 自动估值区间
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Avm {
    pub fair_value: i64,
    pub low: i64,
    pub high: i64,
    pub confidence: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiScenarios {
    pub bull: f64,
    pub base: f64,
    pub bear: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub appreciation: f64,
    #[serde(rename = "yield")]
    pub yield_pct: f64,
    pub irr: f64,
    pub scenarios: RoiScenarios,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub project_id: String,
    pub bhk: u32,
    pub carpet: f64,
    pub price: i64,
    pub facing: Option<String>,
    pub floor: Option<i32>,
    pub inventory_status: InventoryStatus,
    pub avm: Option<Avm>,
    pub rent_yield_pct: Option<f64>,
    pub roi: Option<Roi>,
    pub unit_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Unit {
    const ENTITY: &'static str = "unit";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for Unit {
    fn validate(&self) -> Result<(), StoreError> {
        require_non_empty("unit.projectId", &self.project_id)?;
        if self.bhk == 0 {
            return Err(StoreError::invalid("unit.bhk must be at least 1"));
        }
        require_non_negative("unit.carpet", self.carpet)?;
        require_non_negative("unit.price", self.price as f64)?;
        if let Some(avm) = &self.avm {
            if avm.low > avm.fair_value || avm.fair_value > avm.high {
                return Err(StoreError::invalid(format!(
                    "unit.avm must satisfy low <= fairValue <= high, got {} / {} / {}",
                    avm.low, avm.fair_value, avm.high
                )));
            }
            require_range("unit.avm.confidence", avm.confidence, 0.0, 1.0)?;
        }
        if let Some(y) = self.rent_yield_pct {
            require_range("unit.rentYieldPct", y, 0.0, 100.0)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUnit {
    pub project_id: String,
    pub bhk: u32,
    pub carpet: f64,
    pub price: i64,
    #[serde(default)]
    pub facing: Option<String>,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub inventory_status: Option<InventoryStatus>,
    #[serde(default)]
    pub avm: Option<Avm>,
    #[serde(default)]
    pub rent_yield_pct: Option<f64>,
    #[serde(default)]
    pub roi: Option<Roi>,
    #[serde(default)]
    pub unit_number: Option<String>,
}

impl NewUnit {
    pub fn new(project_id: impl Into<String>, bhk: u32, carpet: f64, price: i64) -> Self {
        Self {
            project_id: project_id.into(),
            bhk,
            carpet,
            price,
            facing: None,
            floor: None,
            inventory_status: None,
            avm: None,
            rent_yield_pct: None,
            roi: None,
            unit_number: None,
        }
    }

    pub fn into_unit(self, id: String, now: DateTime<Utc>) -> Unit {
        Unit {
            id,
            project_id: self.project_id,
            bhk: self.bhk,
            carpet: self.carpet,
            price: self.price,
            facing: self.facing,
            floor: self.floor,
            inventory_status: self.inventory_status.unwrap_or(InventoryStatus::Available),
            avm: self.avm,
            rent_yield_pct: self.rent_yield_pct,
            roi: self.roi,
            unit_number: self.unit_number,
            created_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitPatch {
    pub bhk: Option<u32>,
    pub carpet: Option<f64>,
    pub price: Option<i64>,
    pub facing: Option<String>,
    pub floor: Option<i32>,
    pub inventory_status: Option<InventoryStatus>,
    pub avm: Option<Avm>,
    pub rent_yield_pct: Option<f64>,
    pub roi: Option<Roi>,
    pub unit_number: Option<String>,
}

impl Patch<Unit> for UnitPatch {
    fn apply_to(self, target: &mut Unit) {
        patch_fields!(self, target, { bhk, carpet, price, inventory_status });
        patch_optional_fields!(self, target, {
            facing,
            floor,
            avm,
            rent_yield_pct,
            roi,
            unit_number,
        });
    }
}

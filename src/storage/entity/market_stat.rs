use super::{require_non_empty, require_non_negative, Patch, Record, Validate};
use crate::storage::error::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    pub enum GeoType {
        City => "city",
        Locality => "locality",
        Pincode => "pincode",
    }
}

/// 某地区某月的市场指标，逻辑主键为 (geo, geo_type, period)。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStat {
    pub id: String,
    pub geo: String,
    pub geo_type: GeoType,
    /// YYYY-MM
    pub period: String,
    pub median_price: f64,
    pub qoq_pct: Option<f64>,
    pub yoy_pct: Option<f64>,
    pub inventory_index: Option<f64>,
    pub price_per_sqft: Option<f64>,
    pub absorption_rate: Option<f64>,
    pub new_launches: Option<u32>,
    pub created_at: DateTime<Utc>,
}

pub fn is_valid_period(period: &str) -> bool {
    period.len() == 7
        && NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d").is_ok()
}

impl Record for MarketStat {
    const ENTITY: &'static str = "market_stat";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for MarketStat {
    fn validate(&self) -> Result<(), StoreError> {
        require_non_empty("marketStat.geo", &self.geo)?;
        if !is_valid_period(&self.period) {
            return Err(StoreError::invalid(format!(
                "marketStat.period must be YYYY-MM, got {}",
                self.period
            )));
        }
        require_non_negative("marketStat.medianPrice", self.median_price)?;
        if let Some(v) = self.price_per_sqft {
            require_non_negative("marketStat.pricePerSqft", v)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMarketStat {
    pub geo: String,
    pub geo_type: GeoType,
    pub period: String,
    pub median_price: f64,
    #[serde(default)]
    pub qoq_pct: Option<f64>,
    #[serde(default)]
    pub yoy_pct: Option<f64>,
    #[serde(default)]
    pub inventory_index: Option<f64>,
    #[serde(default)]
    pub price_per_sqft: Option<f64>,
    #[serde(default)]
    pub absorption_rate: Option<f64>,
    #[serde(default)]
    pub new_launches: Option<u32>,
}

impl NewMarketStat {
    pub fn new(
        geo: impl Into<String>,
        geo_type: GeoType,
        period: impl Into<String>,
        median_price: f64,
    ) -> Self {
        Self {
            geo: geo.into(),
            geo_type,
            period: period.into(),
            median_price,
            qoq_pct: None,
            yoy_pct: None,
            inventory_index: None,
            price_per_sqft: None,
            absorption_rate: None,
            new_launches: None,
        }
    }

    pub fn into_stat(self, id: String, now: DateTime<Utc>) -> MarketStat {
        MarketStat {
            id,
            geo: self.geo,
            geo_type: self.geo_type,
            period: self.period,
            median_price: self.median_price,
            qoq_pct: self.qoq_pct,
            yoy_pct: self.yoy_pct,
            inventory_index: self.inventory_index,
            price_per_sqft: self.price_per_sqft,
            absorption_rate: self.absorption_rate,
            new_launches: self.new_launches,
            created_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketStatPatch {
    pub median_price: Option<f64>,
    pub qoq_pct: Option<f64>,
    pub yoy_pct: Option<f64>,
    pub inventory_index: Option<f64>,
    pub price_per_sqft: Option<f64>,
    pub absorption_rate: Option<f64>,
    pub new_launches: Option<u32>,
}

impl Patch<MarketStat> for MarketStatPatch {
    fn apply_to(self, target: &mut MarketStat) {
        patch_fields!(self, target, { median_price });
        patch_optional_fields!(self, target, {
            qoq_pct,
            yoy_pct,
            inventory_index,
            price_per_sqft,
            absorption_rate,
            new_launches,
        });
    }
}

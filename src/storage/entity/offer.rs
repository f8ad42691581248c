use super::{require_non_empty, require_range, Patch, Record, Validate};
use crate::storage::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    pub enum OfferType {
        Discount => "discount",
        Upgrade => "upgrade",
        Waiver => "waiver",
        TokenCashback => "token_cashback",
    }
}

text_enum! {
    pub enum Visibility {
        Public => "public",
        Private => "private",
    }
}

/// 开发商优惠。对 builder / project 只是弱引用，不做级联。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub builder_id: String,
    pub project_id: Option<String>,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    pub title: String,
    pub details: String,
    pub valid_till: DateTime<Utc>,
    pub visibility: Visibility,
    pub terms: Option<String>,
    pub discount_pct: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.valid_till >= now
    }
}

impl Record for Offer {
    const ENTITY: &'static str = "offer";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for Offer {
    fn validate(&self) -> Result<(), StoreError> {
        require_non_empty("offer.builderId", &self.builder_id)?;
        require_non_empty("offer.title", &self.title)?;
        if let Some(pct) = self.discount_pct {
            require_range("offer.discountPct", pct, 0.0, 100.0)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    pub builder_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    pub title: String,
    pub details: String,
    pub valid_till: DateTime<Utc>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub discount_pct: Option<f64>,
}

impl NewOffer {
    pub fn into_offer(self, id: String, now: DateTime<Utc>) -> Offer {
        Offer {
            id,
            builder_id: self.builder_id,
            project_id: self.project_id,
            offer_type: self.offer_type,
            title: self.title,
            details: self.details,
            valid_till: self.valid_till,
            visibility: self.visibility.unwrap_or(Visibility::Public),
            terms: self.terms,
            discount_pct: self.discount_pct,
            created_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferPatch {
    pub project_id: Option<String>,
    #[serde(rename = "type")]
    pub offer_type: Option<OfferType>,
    pub title: Option<String>,
    pub details: Option<String>,
    pub valid_till: Option<DateTime<Utc>>,
    pub visibility: Option<Visibility>,
    pub terms: Option<String>,
    pub discount_pct: Option<f64>,
}

impl Patch<Offer> for OfferPatch {
    fn apply_to(self, target: &mut Offer) {
        patch_fields!(self, target, {
            offer_type,
            title,
            details,
            valid_till,
            visibility,
        });
        patch_optional_fields!(self, target, { project_id, terms, discount_pct });
    }
}

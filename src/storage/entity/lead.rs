use super::{Patch, Record, Validate};
use crate::storage::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    /// 销售漏斗阶段
    pub enum LeadStage {
        New => "new",
        Qualified => "qualified",
        Visit => "visit",
        Negotiation => "negotiation",
        Booked => "booked",
    }
}

text_enum! {
    pub enum LeadChannel {
        Web => "web",
        Whatsapp => "whatsapp",
        Phone => "phone",
    }
}

text_enum! {
    pub enum Purpose {
        Investment => "investment",
        Enduse => "enduse",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadPreferences {
    #[serde(default)]
    pub budget: Option<i64>,
    #[serde(default)]
    pub bhk: Vec<u32>,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub purpose: Option<Purpose>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub user_id: Option<String>,
    pub project_id: Option<String>,
    pub builder_id: Option<String>,
    pub stage: LeadStage,
    pub preferences: Option<LeadPreferences>,
    pub channel: LeadChannel,
    pub notes: Option<String>,
    pub contact_info: Option<ContactInfo>,
    pub created_at: DateTime<Utc>,
}

impl Record for Lead {
    const ENTITY: &'static str = "lead";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for Lead {
    fn validate(&self) -> Result<(), StoreError> {
        if let Some(budget) = self.preferences.as_ref().and_then(|p| p.budget) {
            if budget < 0 {
                return Err(StoreError::invalid(format!(
                    "lead.preferences.budget must not be negative, got {budget}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewLead {
    pub user_id: Option<String>,
    pub project_id: Option<String>,
    pub builder_id: Option<String>,
    pub stage: Option<LeadStage>,
    pub preferences: Option<LeadPreferences>,
    pub channel: Option<LeadChannel>,
    pub notes: Option<String>,
    pub contact_info: Option<ContactInfo>,
}

impl NewLead {
    pub fn into_lead(self, id: String, now: DateTime<Utc>) -> Lead {
        Lead {
            id,
            user_id: self.user_id,
            project_id: self.project_id,
            builder_id: self.builder_id,
            stage: self.stage.unwrap_or(LeadStage::New),
            preferences: self.preferences,
            channel: self.channel.unwrap_or(LeadChannel::Web),
            notes: self.notes,
            contact_info: self.contact_info,
            created_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadPatch {
    pub stage: Option<LeadStage>,
    pub preferences: Option<LeadPreferences>,
    pub channel: Option<LeadChannel>,
    pub notes: Option<String>,
    pub contact_info: Option<ContactInfo>,
}

impl Patch<Lead> for LeadPatch {
    fn apply_to(self, target: &mut Lead) {
        patch_fields!(self, target, { stage, channel });
        patch_optional_fields!(self, target, { preferences, notes, contact_info });
    }
}

use super::{require_non_empty, Patch, Record, Validate};
use crate::storage::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    pub enum LegalDocType {
        Title => "title",
        Noc => "noc",
        Layout => "layout",
        Agreement => "agreement",
        Rera => "rera",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalDoc {
    pub id: String,
    pub project_id: String,
    #[serde(rename = "type")]
    pub doc_type: LegalDocType,
    pub file_url: String,
    pub ocr_text: Option<String>,
    pub risk_flags: Vec<String>,
    pub summary: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for LegalDoc {
    const ENTITY: &'static str = "legal_doc";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for LegalDoc {
    fn validate(&self) -> Result<(), StoreError> {
        require_non_empty("legalDoc.projectId", &self.project_id)?;
        require_non_empty("legalDoc.fileUrl", &self.file_url)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLegalDoc {
    pub project_id: String,
    #[serde(rename = "type")]
    pub doc_type: LegalDocType,
    pub file_url: String,
    #[serde(default)]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub risk_flags: Option<Vec<String>>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

impl NewLegalDoc {
    pub fn into_doc(self, id: String, now: DateTime<Utc>) -> LegalDoc {
        LegalDoc {
            id,
            project_id: self.project_id,
            doc_type: self.doc_type,
            file_url: self.file_url,
            ocr_text: self.ocr_text,
            risk_flags: self.risk_flags.unwrap_or_default(),
            summary: self.summary,
            verified: self.verified.unwrap_or(false),
            created_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegalDocPatch {
    pub file_url: Option<String>,
    pub ocr_text: Option<String>,
    pub risk_flags: Option<Vec<String>>,
    pub summary: Option<String>,
    pub verified: Option<bool>,
}

impl Patch<LegalDoc> for LegalDocPatch {
    fn apply_to(self, target: &mut LegalDoc) {
        patch_fields!(self, target, { file_url, risk_flags, verified });
        patch_optional_fields!(self, target, { ocr_text, summary });
    }
}

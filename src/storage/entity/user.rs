use super::{require_non_empty, require_non_negative, Record, Validate};
use crate::storage::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

impl BudgetRange {
    pub fn check(&self, field: &str) -> Result<(), StoreError> {
        if let Some(min) = self.min {
            require_non_negative(&format!("{field}.min"), min as f64)?;
        }
        if let Some(max) = self.max {
            require_non_negative(&format!("{field}.max"), max as f64)?;
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(StoreError::invalid(format!(
                    "{field}.min ({min}) exceeds {field}.max ({max})"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub budget: Option<BudgetRange>,
    #[serde(default)]
    pub bhk: Vec<u32>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// 注册用户。password 只在内存中保存，不参与序列化也不会出现在日志里。
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferences: Option<UserPreferences>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("preferences", &self.preferences)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Record for User {
    const ENTITY: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), StoreError> {
        require_non_empty("username", &self.username)?;
        require_non_empty("password", &self.password)?;
        require_non_empty("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(StoreError::invalid(format!("email is malformed: {}", self.email)));
        }
        if let Some(budget) = self.preferences.as_ref().and_then(|p| p.budget.as_ref()) {
            budget.check("preferences.budget")?;
        }
        Ok(())
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
}

impl NewUser {
    pub fn into_user(self, id: String, now: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
            email: self.email,
            phone: self.phone,
            preferences: self.preferences,
            created_at: now,
        }
    }
}

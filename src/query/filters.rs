use crate::storage::entity::{BudgetRange, Project, ProjectStatus};
use crate::storage::StoreError;
use serde::{Deserialize, Serialize};

/// credibility_score 达到该值视为 "verified" 项目（固定阈值，与 Builder.verified 无关）
pub const VERIFIED_CREDIBILITY_THRESHOLD: u32 = 80;

/// 项目筛选条件。各维度之间是 AND；维度内部是集合 / 区间判断；未给出的维度不参与过滤。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub city: Option<String>,
    pub locality: Option<String>,
    pub budget: Option<BudgetRange>,
    pub bhk: Vec<u32>,
    pub status: Vec<ProjectStatus>,
    pub verified: Option<bool>,
    pub rera_approved: Option<bool>,
    pub credibility_min: Option<u32>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(budget) = &self.budget {
            budget.check("budget")?;
        }
        if let Some(min) = self.credibility_min {
            if min > 100 {
                return Err(StoreError::invalid(format!(
                    "credibilityMin must be within [0, 100], got {min}"
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, p: &Project) -> bool {
        if let Some(city) = non_blank(&self.city) {
            if !contains_ignore_case(&p.city, city) {
                return false;
            }
        }
        if let Some(locality) = non_blank(&self.locality) {
            if !contains_ignore_case(&p.locality, locality) {
                return false;
            }
        }
        if let Some(budget) = &self.budget {
            if budget.min.is_some_and(|min| p.price_band.min < min) {
                return false;
            }
            if budget.max.is_some_and(|max| p.price_band.max > max) {
                return false;
            }
        }
        if !self.bhk.is_empty()
            && !p.floor_plans.iter().any(|fp| self.bhk.contains(&fp.bhk))
        {
            return false;
        }
        if !self.status.is_empty() && !self.status.contains(&p.status) {
            return false;
        }
        if self.verified == Some(true) && p.credibility_score < VERIFIED_CREDIBILITY_THRESHOLD {
            return false;
        }
        if self.rera_approved == Some(true) && !p.has_rera() {
            return false;
        }
        if let Some(min) = self.credibility_min {
            if p.credibility_score < min {
                return false;
            }
        }
        true
    }

    /// 解析 `key=value` 形式的参数，例如 `city=pune max=20000000 status=ready,launched`
    pub fn from_args<'a, I>(args: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut f = Self::default();
        for arg in args {
            let Some((key, value)) = arg.split_once('=') else {
                return Err(StoreError::invalid(format!("expected key=value, got {arg}")));
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "city" => f.city = Some(value.to_string()),
                "locality" => f.locality = Some(value.to_string()),
                "min" => {
                    f.budget.get_or_insert_with(Default::default).min = Some(parse_num(key, value)?)
                }
                "max" => {
                    f.budget.get_or_insert_with(Default::default).max = Some(parse_num(key, value)?)
                }
                "status" => {
                    f.status = value
                        .split(',')
                        .filter(|s| !s.trim().is_empty())
                        .map(str::parse::<ProjectStatus>)
                        .collect::<Result<Vec<_>, StoreError>>()?
                }
                "bhk" => {
                    f.bhk = value
                        .split(',')
                        .filter(|s| !s.trim().is_empty())
                        .map(|s| parse_num::<u32>(key, s))
                        .collect::<Result<Vec<_>, StoreError>>()?
                }
                "verified" => f.verified = Some(parse_bool(key, value)?),
                "rera" | "rera_approved" => f.rera_approved = Some(parse_bool(key, value)?),
                "credibility" | "credibility_min" => {
                    f.credibility_min = Some(parse_num(key, value)?)
                }
                other => {
                    return Err(StoreError::invalid(format!("unknown filter: {other}")));
                }
            }
        }
        f.validate()?;
        Ok(f)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderFilters {
    pub verified: Option<bool>,
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, StoreError> {
    value
        .trim()
        .parse()
        .map_err(|_| StoreError::invalid(format!("{key} expects a number, got {value}")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, StoreError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StoreError::invalid(format!("{key} expects a boolean, got {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_arguments() {
        let f = SearchFilters::from_args(
            "city=Bangalore min=1000000 max=30000000 status=ready,under_construction rera=true bhk=2,3"
                .split_whitespace(),
        )
        .unwrap();
        assert_eq!(f.city.as_deref(), Some("Bangalore"));
        assert_eq!(
            f.budget,
            Some(BudgetRange {
                min: Some(1_000_000),
                max: Some(30_000_000)
            })
        );
        assert_eq!(
            f.status,
            vec![ProjectStatus::Ready, ProjectStatus::UnderConstruction]
        );
        assert_eq!(f.rera_approved, Some(true));
        assert_eq!(f.bhk, vec![2, 3]);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(SearchFilters::from_args(["status=sold_out"]).is_err());
        assert!(SearchFilters::from_args(["min=abc"]).is_err());
        assert!(SearchFilters::from_args(["min=10", "max=5"]).is_err());
        assert!(SearchFilters::from_args(["credibility=120"]).is_err());
        assert!(SearchFilters::from_args(["colour=blue"]).is_err());
        assert!(SearchFilters::from_args(["city"]).is_err());
    }

    #[test]
    fn empty_filters_are_detected() {
        assert!(SearchFilters::default().is_empty());
        assert!(SearchFilters::from_args(std::iter::empty()).unwrap().is_empty());
    }
}

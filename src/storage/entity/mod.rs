use crate::storage::error::StoreError;

/// 为只有固定取值的文本字段生成枚举：serde 名称、`as_str`、`FromStr`、`Display` 保持一致。
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::storage::error::StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(crate::storage::error::StoreError::invalid(format!(
                        "unknown {} value: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// 把 `Option` 字段写进补丁：只有给出的字段才覆盖。
macro_rules! patch_fields {
    ($patch:expr, $target:expr, { $($field:ident),+ $(,)? }) => {
        $(
            if let Some(v) = $patch.$field {
                $target.$field = v;
            }
        )+
    };
}

/// 同上，但目标字段本身是 `Option`。
macro_rules! patch_optional_fields {
    ($patch:expr, $target:expr, { $($field:ident),+ $(,)? }) => {
        $(
            if let Some(v) = $patch.$field {
                $target.$field = Some(v);
            }
        )+
    };
}

pub mod builder;
pub mod chat_history;
pub mod lead;
pub mod legal_doc;
pub mod market_stat;
pub mod offer;
pub mod project;
pub mod unit;
pub mod user;

pub use builder::{
    Builder, BuilderContact, BuilderPatch, NewBuilder, DEFAULT_INVENTORY_FRESHNESS_HOURS,
    DEFAULT_SLA_RESPONSE_MINUTES,
};
pub use chat_history::{AiChatHistory, ChatContext, NewAiChatHistory};
pub use lead::{ContactInfo, Lead, LeadChannel, LeadPatch, LeadPreferences, LeadStage, NewLead, Purpose};
pub use legal_doc::{LegalDoc, LegalDocPatch, LegalDocType, NewLegalDoc};
pub use market_stat::{GeoType, MarketStat, MarketStatPatch, NewMarketStat};
pub use offer::{NewOffer, Offer, OfferPatch, OfferType, Visibility};
pub use project::{
    Connectivity, FloorPlan, Media, MediaType, NewProject, PriceBand, Project, ProjectPatch,
    ProjectStatus, MAX_CREDIBILITY_SCORE,
};
pub use unit::{Avm, InventoryStatus, NewUnit, Roi, RoiScenarios, Unit, UnitPatch};
pub use user::{BudgetRange, NewUser, User, UserPreferences};

/// 存储中的一行记录，按 id 唯一索引。
pub trait Record: Clone + Send + Sync + 'static {
    const ENTITY: &'static str;

    fn id(&self) -> &str;
}

/// 整条记录的约束检查，create 与 update 合并后都会调用。
pub trait Validate {
    fn validate(&self) -> Result<(), StoreError>;
}

/// 浅合并：补丁里给出的字段整体替换原值，嵌套对象不做深合并。
pub trait Patch<T> {
    fn apply_to(self, target: &mut T);
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), StoreError> {
    if !value.is_finite() || value < min || value > max {
        return Err(StoreError::invalid(format!(
            "{field} must be within [{min}, {max}], got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<(), StoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StoreError::invalid(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

pub mod filters;
pub mod service;
pub mod stats;

pub use filters::{BuilderFilters, SearchFilters};
pub use service::{BuilderDetail, LocalityTrend, PropertyDetail, QueryService, UnitDetail};
pub use stats::{AdminStats, BuilderStats};

//! 外部房源数据导入：拉取、映射、去重并写入存储。

pub mod feed;
pub mod mapper;
pub mod placeholder;
pub mod service;

pub use feed::{FeedClient, ImportError, RawListing};
pub use mapper::MappingConfig;
pub use placeholder::PlaceholderGen;
pub use service::{spawn_import, ImportReport, ImportService};

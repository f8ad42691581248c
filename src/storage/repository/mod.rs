pub mod builder_repo;
pub mod chat_repo;
pub mod lead_repo;
pub mod legal_doc_repo;
pub mod market_repo;
pub mod offer_repo;
pub mod project_repo;
pub mod unit_repo;
pub mod user_repo;

pub use builder_repo::BuilderRepository;
pub use chat_repo::ChatHistoryRepository;
pub use lead_repo::LeadRepository;
pub use legal_doc_repo::LegalDocRepository;
pub use market_repo::MarketStatRepository;
pub use offer_repo::OfferRepository;
pub use project_repo::ProjectRepository;
pub use unit_repo::UnitRepository;
pub use user_repo::UserRepository;

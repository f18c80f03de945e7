//! PostgreSQL repositories, one per table family.

pub mod collection_repo;
pub mod environment_repo;
pub mod history_repo;

pub use collection_repo::CollectionRepo;
pub use environment_repo::EnvironmentRepo;
pub use history_repo::HistoryRepo;

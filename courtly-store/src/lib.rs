pub mod app_config;
pub mod court_repo;
pub mod database;
pub mod memory_repo;
pub mod reservation_repo;

pub use court_repo::PgCourtRepository;
pub use database::DbClient;
pub use memory_repo::{InMemoryReservationRepository, StaticCourtRepository};
pub use reservation_repo::PgReservationRepository;

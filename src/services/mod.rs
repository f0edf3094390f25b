// Service exports
pub mod postgres;
pub mod recommendations;
pub mod store;

pub use postgres::PostgresStore;
pub use recommendations::{RecommendationService, Recommendations};
pub use store::{InMemoryStore, StoreError, VenueStore};

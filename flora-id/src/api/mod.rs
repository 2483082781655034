//! HTTP API handlers for flora-id

pub mod details;
pub mod facts;
pub mod health;
pub mod identify;
pub mod search;

pub use details::details_routes;
pub use facts::facts_routes;
pub use health::health_routes;
pub use identify::identify_routes;
pub use search::search_routes;

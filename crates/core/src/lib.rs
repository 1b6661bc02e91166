pub mod catalog;
pub mod intent;
pub mod models;
pub mod route;

pub use catalog::{Catalog, CatalogError};
pub use intent::{normalize_text, parse_intent_reply};
pub use models::*;
pub use route::{build_route_data, comprehensive_alternative, stable_hash, synthesize_route};

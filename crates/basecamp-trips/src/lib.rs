//! Basecamp trip catalog
//!
//! Trips, rental packages and booking contacts, with the list filters shown
//! on the site and WhatsApp booking links.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod types;

pub use catalog::Catalog;
pub use error::TripError;
pub use filter::{Availability, CampsiteCategory, TripFilter};
pub use types::{Package, Trip, WhatsAppContact};

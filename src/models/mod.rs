//! Domain models for Aquascape.
//!
//! # Core Concepts
//!
//! ## Catalog Entities
//!
//! Read-only reference data, identified by a string `id`:
//!
//! - [`Equipment`]: Hardware with a category, optional model number and a list
//!   of [`PriceQuote`]s from different retailers.
//! - [`Livestock`]: A fish or plant species ([`LivestockKind`]).
//!
//! ## Build Entities
//!
//! - [`AquariumBuild`]: The single build a user is assembling. Catalog items are
//!   copied into it as [`LineItem`]s carrying a quantity.
//! - [`Comment`]: Session-local discussion on the build's listing.

mod build;
mod catalog;
mod comment;

pub use build::*;
pub use catalog::*;
pub use comment::*;

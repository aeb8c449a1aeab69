//! Core domain entities.
//!
//! - [`ShortCodeRecord`] - a short code and everything needed to resolve it
//! - [`NewRecord`] - input for inserting a record
//! - [`Owner`] / [`PlanTier`] - the principal behind an API key
//! - [`OwnerAccount`] - owner details for administration
//! - [`ClickRanking`] / [`ShortenRanking`] - read-only ranking rows

pub mod owner;
pub mod short_code_record;

pub use owner::{Owner, OwnerAccount, PlanTier};
pub use short_code_record::{ClickRanking, NewRecord, ShortCodeRecord, ShortenRanking};

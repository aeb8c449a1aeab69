//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod delete;
pub mod expiry;
pub mod health;
pub mod listing;
pub mod redirect;
pub mod shorten;

pub use delete::delete_handler;
pub use expiry::update_expiry_handler;
pub use health::health_handler;
pub use listing::{top_clicked_handler, top_shortened_handler, user_urls_handler};
pub use redirect::redirect_handler;
pub use shorten::{batch_shorten_handler, shorten_handler};

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use services::DraftService;
pub use store::{DraftStore, PgDraftStore};

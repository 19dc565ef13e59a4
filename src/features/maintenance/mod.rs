pub mod dtos;
pub mod engine;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::{TaskService, WorkflowService};
pub use store::{PgWorkflowStore, WorkflowStore};

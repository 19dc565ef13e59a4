pub mod services;

pub use services::RateLimitService;

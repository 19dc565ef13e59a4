mod draft_service;

pub use draft_service::DraftService;

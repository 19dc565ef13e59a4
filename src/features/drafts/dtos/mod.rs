mod draft_dto;

pub use draft_dto::{ReportDraftDto, TaskDraftDto};

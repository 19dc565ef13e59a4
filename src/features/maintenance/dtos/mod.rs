mod maintenance_dto;

pub use maintenance_dto::{
    AssignTechnicianDto, CompleteTaskDto, TaskDetailDto, TicketResponseDto,
};

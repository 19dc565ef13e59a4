mod ticket;

pub use ticket::MaintenanceTicket;

mod report;

pub use report::{DamageReport, NewDamageReport, Priority, WorkStatus};

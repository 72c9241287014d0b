mod activity;
mod draft;
mod session;
mod task;

pub use activity::{ActivityDetails, ActivityKind, ActivityRecord};
pub use draft::TaskDraft;
pub use session::{Session, User};
pub use task::{Column, NewTask, Priority, PriorityFilter, Task, TaskUpdate, parse_due_date};

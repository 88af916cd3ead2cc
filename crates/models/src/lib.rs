// Core modules
pub mod project;
pub mod task;
pub mod comment;
pub mod envelope;
pub mod dates;
pub mod normalize;

// Read models computed from the core types
pub mod dashboard;
pub mod calendar;

// Re-export commonly used types
pub use project::{
    completion_rate, CreateProject, Priority, Project, ProjectQuery, ProjectStatus,
    ProjectSummary, UpdateProject,
};
pub use task::{
    CreateTask, MyTask, Task, TaskField, TaskListQuery, TaskScopeQuery, TaskStatus, TaskType,
    TaskWithProject, UpdateTask,
};
pub use comment::{Comment, CreateComment, UpdateComment};
pub use envelope::ApiResponse;
pub use normalize::{first_validation_message, Normalize};
pub use dashboard::{DashboardSummary, DashboardTask, ProjectWithTasks};
pub use calendar::{CalendarEvents, CalendarQuery, CalendarWindow, ProjectEvent, TaskEvent};

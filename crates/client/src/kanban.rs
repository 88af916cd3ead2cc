use tigger_models::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropLocation {
    pub status: TaskStatus,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanColumn {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

/// Tasks grouped into the Todo, In Progress and Done columns
#[derive(Debug, Clone, PartialEq)]
pub struct KanbanBoard {
    columns: Vec<KanbanColumn>,
}

impl KanbanBoard {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let columns = TaskStatus::ALL
            .iter()
            .map(|status| KanbanColumn {
                status: *status,
                tasks: tasks.iter().filter(|t| t.status == *status).cloned().collect(),
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[KanbanColumn] {
        &self.columns
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.tasks.as_slice())
            .unwrap_or(&[])
    }

    /// Status to apply for a drag from `source` to `destination`.
    /// Dropping outside the board or back onto the same slot changes nothing.
    pub fn drop_status(source: DropLocation, destination: Option<DropLocation>) -> Option<TaskStatus> {
        let destination = destination?;
        if destination == source {
            return None;
        }
        Some(destination.status)
    }
}

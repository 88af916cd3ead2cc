//! Typed client for the Tigger API plus the state stores a UI binds to.
//!
//! An [`AppContext`] owns one store per screen. Stores load nothing until
//! `init()` or `refresh()` is called.

pub mod client;
pub mod context;
pub mod debounce;
pub mod error;
pub mod kanban;
pub mod optimistic;
pub mod stores;

pub use client::ApiClient;
pub use context::AppContext;
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use error::{ClientError, Result};
pub use kanban::{DropLocation, KanbanBoard, KanbanColumn};
pub use optimistic::optimistic;
pub use stores::{
    CalendarStore, CalendarView, CommentsStore, DashboardStore, ProjectsStore, StoreState,
    TasksStore,
};

//! Kanban board management
//!
//! This module provides board state management for the three-column layout
//! (Todo, In-Progress, Completed).

mod command;
mod drag;
mod model;
mod store;

pub use command::*;
pub use drag::*;
pub use model::*;
pub use store::*;

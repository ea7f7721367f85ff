//! Kanban board persistent store
//!
//! Owns the board and mirrors it to a key-value slot after every change.

use tracing::{debug, info, warn};

use crate::config::{LoadPolicy, StoreConfig};
use crate::storage::KeyValueStorage;
use crate::Result;

use super::command::BoardCommand;
use super::model::{Board, Column, Task};

/// Task store backed by an injected key-value storage
///
/// Every operation runs to completion before the next one starts; callers
/// read the board through [`TaskStore::board`] and never mutate it directly.
pub struct TaskStore<S> {
    board: Board,
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> TaskStore<S> {
    /// Load the board saved under the configured key
    ///
    /// Missing, unreadable or unparsable data starts an empty board.
    pub async fn initialize(storage: S, config: &StoreConfig) -> Self {
        let key = config.storage_key.clone();
        let board = load_board(&storage, &key, config.load_policy).await;
        info!(
            "Loaded board '{}' with {} tasks ({} todo, {} in progress, {} completed)",
            key,
            board.len(),
            board.todo.len(),
            board.in_progress.len(),
            board.completed.len()
        );
        Self { board, storage, key }
    }

    /// Current board state
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Owned copy of the current board state
    pub fn snapshot(&self) -> Board {
        self.board.clone()
    }

    /// Append a task to the todo column
    ///
    /// Blank text is ignored without persisting.
    pub async fn add_task(&mut self, text: &str) -> Result<&Board> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank task text");
            return Ok(&self.board);
        }

        let mut task = Task::new(text);
        while self.board.find(&task.id).is_some() {
            task = Task::new(text);
        }
        debug!("Adding task {} to {}", task.id, Column::Todo);
        self.board.todo.push(task);

        self.persist().await?;
        Ok(&self.board)
    }

    /// Move a task between columns, or reorder it within one
    ///
    /// With `from == to` the task at `drag_index` is relocated to
    /// `hover_index` and `task` is not consulted. Otherwise the task is
    /// looked up in `from` by id and appended to `to`; the indices are
    /// unused.
    pub async fn move_task(
        &mut self,
        task: &Task,
        from: Column,
        to: Column,
        drag_index: Option<usize>,
        hover_index: Option<usize>,
    ) -> Result<&Board> {
        if from == to {
            let (Some(drag_index), Some(hover_index)) = (drag_index, hover_index) else {
                debug!("Same-column move of {} without indices ignored", task.id);
                return Ok(&self.board);
            };
            return self.reorder_task(from, drag_index, hover_index).await;
        }

        let source = self.board.column_mut(from);
        let mut removed: Option<Task> = None;
        source.retain(|t| {
            if t.id == task.id {
                removed.get_or_insert_with(|| t.clone());
                false
            } else {
                true
            }
        });

        let Some(moved) = removed else {
            warn!("Task {} is not in {}, move ignored", task.id, from);
            return Ok(&self.board);
        };

        debug!("Moving task {} from {} to {}", moved.id, from, to);
        self.board.column_mut(to).push(moved);

        self.persist().await?;
        Ok(&self.board)
    }

    /// Relocate the task at `drag_index` to `hover_index` within `column`
    pub async fn reorder_task(
        &mut self,
        column: Column,
        drag_index: usize,
        hover_index: usize,
    ) -> Result<&Board> {
        if drag_index == hover_index {
            return Ok(&self.board);
        }

        let tasks = self.board.column_mut(column);
        if drag_index >= tasks.len() || hover_index >= tasks.len() {
            warn!(
                "Reorder {} -> {} out of range for {} ({} tasks), ignored",
                drag_index,
                hover_index,
                column,
                tasks.len()
            );
            return Ok(&self.board);
        }

        let task = tasks.remove(drag_index);
        debug!(
            "Reordering task {} in {}: {} -> {}",
            task.id, column, drag_index, hover_index
        );
        tasks.insert(hover_index, task);

        self.persist().await?;
        Ok(&self.board)
    }

    /// Remove a task from a column
    pub async fn delete_task(&mut self, task_id: &str, column: Column) -> Result<&Board> {
        let tasks = self.board.column_mut(column);
        let before = tasks.len();
        tasks.retain(|t| t.id != task_id);

        if tasks.len() == before {
            debug!("Task {} not in {}, nothing to delete", task_id, column);
            return Ok(&self.board);
        }

        debug!("Deleted task {} from {}", task_id, column);
        self.persist().await?;
        Ok(&self.board)
    }

    /// Apply a single command
    pub async fn dispatch(&mut self, command: BoardCommand) -> Result<&Board> {
        match command {
            BoardCommand::Add { text } => self.add_task(&text).await,
            BoardCommand::Move { task, from, to } => {
                self.move_task(&task, from, to, None, None).await
            }
            BoardCommand::Reorder {
                column,
                drag_index,
                hover_index,
            } => self.reorder_task(column, drag_index, hover_index).await,
            BoardCommand::Delete { task_id, column } => self.delete_task(&task_id, column).await,
        }
    }

    /// Write the whole board to storage
    ///
    /// A failed write leaves the in-memory board as it is.
    pub async fn persist(&self) -> Result<()> {
        let content = serde_json::to_string(&self.board)?;
        self.storage.set(&self.key, &content).await
    }
}

async fn load_board<S: KeyValueStorage>(storage: &S, key: &str, policy: LoadPolicy) -> Board {
    let content = match storage.get(key).await {
        Ok(Some(content)) => content,
        Ok(None) => return Board::new(),
        Err(e) => {
            warn!("Failed to read board '{}', starting empty: {}", key, e);
            return Board::new();
        }
    };

    let mut board: Board = match serde_json::from_str(&content) {
        Ok(board) => board,
        Err(e) => {
            warn!("Failed to parse board '{}', starting empty: {}", key, e);
            return Board::new();
        }
    };

    if policy == LoadPolicy::Validate {
        let dropped = board.normalize();
        if dropped > 0 {
            warn!("Dropped {} invalid or duplicate tasks from '{}'", dropped, key);
        }
    }

    board
}

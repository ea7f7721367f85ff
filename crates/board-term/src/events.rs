//! Event handling for the terminal view
//!
//! Each input line is one user interaction. Drag gestures go through a
//! [`DragSession`]; everything becomes a [`BoardCommand`] dispatched to the
//! store.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use taskboard_core::kanban::{Board, BoardCommand, Column, DragSession, TaskStore};
use taskboard_core::storage::KeyValueStorage;

// ============ Event Payloads ============

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ViewEvent {
    /// New task text submitted from the input box
    Submit { text: String },
    /// Drag started on the task at `index` in `column`
    DragStart { column: Column, index: usize },
    /// Pointer is over position `index` in `column`
    Hover { column: Column, index: usize },
    /// Dragged task released over `column`
    Drop { column: Column },
    Delete { task_id: String, column: Column },
    /// Ask for the current board without changing it
    Sync,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ViewOutput<'a> {
    Sync {
        columns: Vec<ColumnHeading>,
        board: &'a Board,
    },
    Error { message: String },
}

/// Column key and heading, in display order
#[derive(Debug, Serialize)]
pub struct ColumnHeading {
    pub id: Column,
    pub title: &'static str,
}

impl<'a> ViewOutput<'a> {
    fn sync(board: &'a Board) -> Self {
        let columns = Column::ALL
            .into_iter()
            .map(|id| ColumnHeading {
                id,
                title: id.title(),
            })
            .collect();
        Self::Sync { columns, board }
    }
}

// ============ Event Loop ============

pub struct EventLoop<S> {
    store: TaskStore<S>,
    drag: Option<DragSession>,
}

impl<S: KeyValueStorage> EventLoop<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        Self { store, drag: None }
    }

    #[cfg(test)]
    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    /// Process events until the reader is exhausted
    ///
    /// The current board is written once before the first event.
    pub async fn run<R, W>(&mut self, reader: R, writer: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_line(writer, &self.render_sync()).await?;

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let output = self.handle_line(&line).await;
            write_line(writer, &output).await?;
        }
        Ok(())
    }

    /// Handle one raw input line and return the output line
    pub async fn handle_line(&mut self, line: &str) -> String {
        match serde_json::from_str::<ViewEvent>(line) {
            Ok(event) => self.handle_event(event).await,
            Err(e) => {
                warn!("Malformed event: {}", e);
                render(&ViewOutput::Error {
                    message: format!("Malformed event: {}", e),
                })
            }
        }
    }

    pub async fn handle_event(&mut self, event: ViewEvent) -> String {
        let Some(command) = self.command_for(event) else {
            return self.render_sync();
        };

        match self.store.dispatch(command).await {
            Ok(board) => render(&ViewOutput::sync(board)),
            Err(e) => {
                warn!("Failed to save board: {}", e);
                render(&ViewOutput::Error {
                    message: e.to_string(),
                })
            }
        }
    }

    fn command_for(&mut self, event: ViewEvent) -> Option<BoardCommand> {
        match event {
            ViewEvent::Submit { text } => Some(BoardCommand::Add { text }),
            ViewEvent::DragStart { column, index } => {
                self.drag = DragSession::start(self.store.board(), column, index);
                match &self.drag {
                    Some(session) => debug!("Drag started on {} in {}", session.task.id, column),
                    None => debug!("Drag start on empty slot {} in {}", index, column),
                }
                None
            }
            ViewEvent::Hover { column, index } => {
                let board = self.store.board();
                self.drag.as_mut().and_then(|s| s.hover(board, column, index))
            }
            ViewEvent::Drop { column } => {
                let command = self.drag.as_mut().and_then(|s| s.drop_on(column));
                self.drag = None;
                command
            }
            ViewEvent::Delete { task_id, column } => {
                info!("Deleting task: {}", task_id);
                Some(BoardCommand::Delete { task_id, column })
            }
            ViewEvent::Sync => None,
        }
    }

    fn render_sync(&self) -> String {
        render(&ViewOutput::sync(self.store.board()))
    }
}

fn render(output: &ViewOutput<'_>) -> String {
    // Board and message serialization cannot fail
    serde_json::to_string(output).unwrap_or_else(|_| String::from(r#"{"event":"error"}"#))
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::Arc;
    use taskboard_core::storage::MemoryStorage;
    use taskboard_core::StoreConfig;

    async fn create_test_loop() -> EventLoop<Arc<MemoryStorage>> {
        let storage = Arc::new(MemoryStorage::new());
        let store = TaskStore::initialize(storage, &StoreConfig::default()).await;
        EventLoop::new(store)
    }

    fn texts(board: &Board, column: Column) -> Vec<String> {
        board.column(column).iter().map(|t| t.text.clone()).collect()
    }

    #[tokio::test]
    async fn test_submit_and_sync_output() {
        let mut events = create_test_loop().await;

        let output = events.handle_line(r#"{"event":"submit","text":" buy milk "}"#).await;
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["event"], "sync");
        assert_eq!(value["board"]["todo"][0]["text"], "buy milk");
        assert_eq!(value["board"]["inProgress"], Value::Array(vec![]));
        assert_eq!(value["columns"][1]["id"], "inProgress");
        assert_eq!(value["columns"][1]["title"], "In-Progress");
        assert_eq!(value["columns"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_line_reports_error() {
        let mut events = create_test_loop().await;

        for line in ["not json", r#"{"event":"explode"}"#, r#"{"event":"drop","column":"done"}"#] {
            let output = events.handle_line(line).await;
            let value: Value = serde_json::from_str(&output).unwrap();
            assert_eq!(value["event"], "error", "line {:?}", line);
        }
    }

    #[tokio::test]
    async fn test_drag_reorder_then_drop_across_columns() {
        let mut events = create_test_loop().await;
        for text in ["A", "B", "C"] {
            events.handle_event(ViewEvent::Submit { text: text.into() }).await;
        }

        // Drag A down over B then C, then release it on in-progress
        events
            .handle_event(ViewEvent::DragStart { column: Column::Todo, index: 0 })
            .await;
        events
            .handle_event(ViewEvent::Hover { column: Column::Todo, index: 1 })
            .await;
        events
            .handle_event(ViewEvent::Hover { column: Column::Todo, index: 2 })
            .await;
        assert_eq!(texts(events.store().board(), Column::Todo), vec!["B", "C", "A"]);

        events
            .handle_event(ViewEvent::Drop { column: Column::InProgress })
            .await;
        let board = events.store().board();
        assert_eq!(texts(board, Column::Todo), vec!["B", "C"]);
        assert_eq!(texts(board, Column::InProgress), vec!["A"]);
    }

    #[tokio::test]
    async fn test_hover_past_the_end_does_not_move_other_tasks() {
        let mut events = create_test_loop().await;
        for text in ["A", "B", "C"] {
            events.handle_event(ViewEvent::Submit { text: text.into() }).await;
        }

        events
            .handle_event(ViewEvent::DragStart { column: Column::Todo, index: 0 })
            .await;
        for index in [5, 1, 0] {
            events
                .handle_event(ViewEvent::Hover { column: Column::Todo, index })
                .await;
        }
        assert_eq!(texts(events.store().board(), Column::Todo), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_hover_and_drop_without_drag_do_nothing() {
        let mut events = create_test_loop().await;
        events.handle_event(ViewEvent::Submit { text: "A".into() }).await;
        events.handle_event(ViewEvent::Submit { text: "B".into() }).await;
        let before = events.store().snapshot();

        events
            .handle_event(ViewEvent::Hover { column: Column::Todo, index: 1 })
            .await;
        events
            .handle_event(ViewEvent::Drop { column: Column::Completed })
            .await;
        assert_eq!(events.store().board(), &before);

        // A finished drag does not linger
        events
            .handle_event(ViewEvent::DragStart { column: Column::Todo, index: 0 })
            .await;
        events.handle_event(ViewEvent::Drop { column: Column::Todo }).await;
        events
            .handle_event(ViewEvent::Hover { column: Column::Todo, index: 1 })
            .await;
        assert_eq!(events.store().board(), &before);
    }

    #[tokio::test]
    async fn test_delete_event() {
        let mut events = create_test_loop().await;
        events.handle_event(ViewEvent::Submit { text: "A".into() }).await;
        let id = events.store().board().todo[0].id.clone();

        let line = format!(r#"{{"event":"delete","taskId":"{}","column":"todo"}}"#, id);
        events.handle_line(&line).await;
        assert!(events.store().board().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let storage = Arc::new(MemoryStorage::with_quota(16));
        let store = TaskStore::initialize(storage, &StoreConfig::default()).await;
        let mut events = EventLoop::new(store);

        let output = events.handle_event(ViewEvent::Submit { text: "A".into() }).await;
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["event"], "error");
        assert!(value["message"].as_str().unwrap().contains("quota"));

        // The task is still shown
        let output = events.handle_event(ViewEvent::Sync).await;
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["board"]["todo"][0]["text"], "A");
    }

    #[tokio::test]
    async fn test_run_writes_one_line_per_event() {
        let mut events = create_test_loop().await;
        let input = "{\"event\":\"submit\",\"text\":\"A\"}\n\n{\"event\":\"sync\"}\nbogus\n";
        let mut output: Vec<u8> = Vec::new();

        events.run(input.as_bytes(), &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains(r#""todo":[]"#));
        assert!(lines[1].contains(r#""text":"A""#));
        assert!(lines[3].starts_with(r#"{"event":"error""#));
    }
}

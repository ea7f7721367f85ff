//! Board mutation commands
//!
//! The closed set of changes a view layer may request from the store.

use serde::{Deserialize, Serialize};

use super::model::{Column, Task};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BoardCommand {
    /// Append a new task to the todo column
    Add { text: String },
    /// Move a task to the end of another column
    Move { task: Task, from: Column, to: Column },
    /// Relocate the task at `drag_index` to `hover_index` within one column
    Reorder {
        column: Column,
        drag_index: usize,
        hover_index: usize,
    },
    /// Remove a task from a column
    Delete { task_id: String, column: Column },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_format() {
        let command: BoardCommand = serde_json::from_str(
            r#"{"type":"reorder","column":"inProgress","dragIndex":2,"hoverIndex":0}"#,
        )
        .unwrap();
        assert_eq!(
            command,
            BoardCommand::Reorder {
                column: Column::InProgress,
                drag_index: 2,
                hover_index: 0,
            }
        );

        let command: BoardCommand =
            serde_json::from_str(r#"{"type":"delete","taskId":"t1","column":"todo"}"#).unwrap();
        assert_eq!(
            command,
            BoardCommand::Delete {
                task_id: "t1".to_string(),
                column: Column::Todo,
            }
        );
    }
}

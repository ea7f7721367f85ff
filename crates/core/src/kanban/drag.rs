//! Drag-and-drop bookkeeping
//!
//! A drag session remembers which task is being dragged and where it
//! currently sits, and turns hover and drop events into board commands.

use serde::{Deserialize, Serialize};

use super::command::BoardCommand;
use super::model::{Board, Column, Task};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragSession {
    pub task: Task,
    pub column: Column,
    pub index: usize,
}

impl DragSession {
    /// Begin dragging the task at `index` in `column`
    pub fn start(board: &Board, column: Column, index: usize) -> Option<Self> {
        let task = board.column(column).get(index)?.clone();
        Some(Self {
            task,
            column,
            index,
        })
    }

    /// Pointer moved over position `index` in `column`
    ///
    /// Only a different, existing position in the session's own column
    /// reorders; the session index follows the hover position so the next
    /// hover is measured from where the task now is.
    pub fn hover(&mut self, board: &Board, column: Column, index: usize) -> Option<BoardCommand> {
        if column != self.column || index == self.index {
            return None;
        }
        let len = board.column(column).len();
        if index >= len || self.index >= len {
            return None;
        }

        let command = BoardCommand::Reorder {
            column,
            drag_index: self.index,
            hover_index: index,
        };
        self.index = index;
        Some(command)
    }

    /// Task released over `column`
    pub fn drop_on(&mut self, column: Column) -> Option<BoardCommand> {
        if column == self.column {
            return None;
        }

        let command = BoardCommand::Move {
            task: self.task.clone(),
            from: self.column,
            to: column,
        };
        self.column = column;
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(texts: &[&str]) -> Board {
        let mut board = Board::new();
        for (i, text) in texts.iter().enumerate() {
            board.todo.push(Task::with_id(format!("t{}", i), *text));
        }
        board
    }

    #[test]
    fn test_start_needs_a_task() {
        let board = board_with(&["A"]);
        assert!(DragSession::start(&board, Column::Todo, 1).is_none());
        assert!(DragSession::start(&board, Column::Completed, 0).is_none());

        let session = DragSession::start(&board, Column::Todo, 0).unwrap();
        assert_eq!(session.task.id, "t0");
    }

    #[test]
    fn test_hover_tracks_index() {
        let board = board_with(&["A", "B", "C"]);
        let mut session = DragSession::start(&board, Column::Todo, 0).unwrap();

        assert_eq!(session.hover(&board, Column::Todo, 0), None);
        assert_eq!(
            session.hover(&board, Column::Todo, 1),
            Some(BoardCommand::Reorder {
                column: Column::Todo,
                drag_index: 0,
                hover_index: 1,
            })
        );
        assert_eq!(
            session.hover(&board, Column::Todo, 2),
            Some(BoardCommand::Reorder {
                column: Column::Todo,
                drag_index: 1,
                hover_index: 2,
            })
        );
        // Hovering another column never reorders
        assert_eq!(session.hover(&board, Column::InProgress, 0), None);
        assert_eq!(session.index, 2);
    }

    #[test]
    fn test_hover_past_the_end_keeps_index() {
        let board = board_with(&["A", "B", "C"]);
        let mut session = DragSession::start(&board, Column::Todo, 0).unwrap();

        assert_eq!(session.hover(&board, Column::Todo, 5), None);
        assert_eq!(session.index, 0);
        assert_eq!(
            session.hover(&board, Column::Todo, 1),
            Some(BoardCommand::Reorder {
                column: Column::Todo,
                drag_index: 0,
                hover_index: 1,
            })
        );
    }

    #[test]
    fn test_drop_updates_column() {
        let board = board_with(&["A"]);
        let mut session = DragSession::start(&board, Column::Todo, 0).unwrap();

        assert_eq!(session.drop_on(Column::Todo), None);

        let command = session.drop_on(Column::Completed).unwrap();
        assert_eq!(
            command,
            BoardCommand::Move {
                task: Task::with_id("t0", "A"),
                from: Column::Todo,
                to: Column::Completed,
            }
        );
        assert_eq!(session.column, Column::Completed);

        // A repeated drop on the same column is ignored
        assert_eq!(session.drop_on(Column::Completed), None);
    }
}

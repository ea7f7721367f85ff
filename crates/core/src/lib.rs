//! Core library for the task board
//!
//! This crate contains the board state and everything that mutates it:
//! - Task, column and board model
//! - The task store and its command set
//! - Drag-and-drop bookkeeping for the view layer
//! - The persistent key-value slot the board is mirrored to

pub mod config;
pub mod error;
pub mod kanban;
pub mod storage;

pub use config::{LoadPolicy, StoreConfig};
pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

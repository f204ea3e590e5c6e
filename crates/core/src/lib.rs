//! # Taleweaver Core
//!
//! Domain types and error definitions shared by every Taleweaver crate.
//! This crate has **no framework dependencies**: it defines the
//! message model that the trimmer, the memory layer and the CLI all
//! work against.

pub mod error;
pub mod message;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{ConversationLog, Message, roles};

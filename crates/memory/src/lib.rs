//! Conversation memory for Taleweaver chat loops.

pub mod conversation;
pub mod session_store;
pub mod window;

pub use conversation::ConversationMemory;
pub use session_store::{SessionInfo, SessionStore, SharedMemory};
pub use window::WindowedHistory;

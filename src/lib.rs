// src/lib.rs

pub mod api;
pub mod chart;
pub mod config;
pub mod conversation;
pub mod error;
pub mod intake;
pub mod notify;
pub mod repl;
pub mod session;

pub use api::{Backend, HttpBackend};
pub use chart::ChartSnapshot;
pub use conversation::{Conversation, FocusContext};
pub use error::{ClientError, Result};
pub use intake::IntakeForm;
pub use session::{Phase, SessionController};

pub mod admin;
pub mod app;
pub mod backend;
pub mod command;
pub mod config;
pub mod entries;
pub mod errors;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod session;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod words;

pub use admin::{AdminSession, AdminState};
pub use app::App;
pub use backend::{Backend, HttpBackend};
pub use config::ClientConfig;
pub use entries::{DailyEntryInput, EntryController};
pub use errors::{ApiError, ClientError, ValidationError};
pub use session::{SessionManager, SessionState};
pub use stats::StatisticsController;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use words::aggregate;

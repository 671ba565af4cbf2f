/*
[INPUT]:  Public API exports for wfe-mobile-app crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod app;
pub mod config;
pub mod error;
pub mod statistics;
pub mod view;

// Re-export main types for convenience
pub use app::App;
pub use app::action::Action;
pub use app::state::{Notice, NoticeKind, Tab, TaskForm, TrackedProcess, ViewState};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use statistics::Statistics;
pub use view::{ProcessView, TaskView};

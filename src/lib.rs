// lib.rs - Client library for the video analysis service
pub mod analysis_client;
pub mod chat;
pub mod config;
pub mod error;
pub mod mindmap;
pub mod models;
pub mod progress;
pub mod session;
pub mod summary;
pub mod template;
pub mod view;

// Re-export commonly used types for convenience
pub use analysis_client::{AnalysisBackend, AnalysisClient};
pub use chat::{ChatEvent, ChatFlow, TypingConfig};
pub use config::Config;
pub use error::{InsightError, InsightResult, RenderError};
pub use models::*;
pub use progress::{ProgressConfig, ProgressSimulator, ProgressTick};
pub use session::{AnalysisFlow, FallbackReason, FallbackSource, SessionState, SubmitOutcome};
pub use view::{Presenter, TerminalView};

pub mod analysis;
pub mod chat;
pub mod mindmap;

pub use analysis::*;
pub use chat::*;
pub use mindmap::*;

pub mod generation_flow;
pub mod progress;

pub use generation_flow::GenerationFlow;
pub use progress::{ProgressTracker, SessionState};

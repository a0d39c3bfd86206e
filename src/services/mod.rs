pub mod analysis_service;
pub mod history_store;
pub mod mock_analysis;

pub use analysis_service::{build_analysis_service, AnalysisService};
pub use history_store::{HistoryStore, HISTORY_KEY, MAX_HISTORY};
pub use mock_analysis::MockAnalysisService;

pub mod documentation;
pub mod history;
pub mod status;

pub use documentation::{
    AnalysisTicket, Appendix, Conclusion, DocumentationRecord, OutlineSection, ProjectIntroduction,
    ProjectMethodology, SystemDesign, TestingAndResults,
};
pub use history::HistoryEntry;
pub use status::{GenerationSnapshot, ProcessingStatus};

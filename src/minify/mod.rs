pub mod copier;
pub mod orchestrator;
pub mod preparer;

pub use copier::{CopyOutcome, CopyReport, MirrorCopier, TreeCopier};
pub use orchestrator::{Minifier, MinifyReport, MinifyRequest, MinifyStage};
pub use preparer::OutputTreePreparer;

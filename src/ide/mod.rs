//! Engine facade for editors and tools.
//!
//! [`AnalysisHost`] owns the documents, the parse database and the semantic
//! model; [`Analysis`] is a read-only snapshot exposing resolution, scopes,
//! evaluation and diagnostics.
//!
//! ```ignore
//! use syster::ide::AnalysisHost;
//!
//! let mut host = AnalysisHost::new();
//! let file = host.set_file_content("test.sysml", "package Test {}");
//! let diagnostics = host.analysis().diagnostics(file);
//! ```

mod analysis;

pub use analysis::{Analysis, AnalysisHost, EngineOptions};

//! `roster-recon`: company roster reconciliation engine.
//!
//! Pure engine crate: receives a baseline roster and an observed roster,
//! returns classified results, a run summary and a trend report against the
//! previous run. Persistence sits behind [`history::HistoryStore`]; the
//! SQLite implementation lives in `roster-io`.

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod model;
pub mod normalize;
pub mod scorer;
pub mod sector;
pub mod summary;
pub mod trend;

pub use config::ReconConfig;
pub use engine::{reconcile, run, Reconciliation, RunOutput};
pub use error::ReconError;
pub use history::{HistoryStore, MemoryStore};
pub use model::{BaselineRecord, ClassifiedResult, ObservedRecord, ReconInput, RunReport, Status};

//! Landed-cost pricing and break-even engine for imported products.
//!
//! Supplier quotes and competitor prices flow through aggregation, landed
//! cost, pricing and viability scoring; a purchase plan is projected against
//! the landed cost. Every step is a pure function of its inputs.

pub mod config;
pub mod domain;
pub mod error;
pub mod util;

pub use config::{resolve_exchange_rate, EngineSettings};
pub use domain::*;
pub use error::{AnalysisError, Result};
pub use util::persistence::{JsonFileStore, PersistSaveError, SnapshotSink};

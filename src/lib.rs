//! tsonorm - Offline midnight normalization for periodic TSO measurement series
//!
//! tsonorm cleans a batch of stored sensor measurements through a
//! deterministic pipeline: time sort → duplicate removal → per-channel
//! midnight-window reconciliation.
//!
//! ## Modules
//!
//! - **Deduplicator**: collapse records describing the same observation, max value wins
//! - **ChannelGrouper**: partition records per (place, method) channel
//! - **MidnightReconciler**: attribute 23:45-00:15 readings to their midnight
//!   and promote the window maximum into the exact-midnight record

pub mod dedup;
pub mod error;
pub mod grouping;
pub mod loader;
pub mod pipeline;
pub mod reconcile;
pub mod types;
pub mod window;

pub use dedup::Deduplicator;
pub use error::NormalizeError;
pub use grouping::ChannelGrouper;
pub use loader::RecordLoader;
pub use pipeline::{normalize_records, sort_by_datetime};
pub use reconcile::MidnightReconciler;
pub use types::{ChannelKey, DedupKey, MeasurementRecord, MidnightKey};

/// tsonorm version reported by the CLI
pub const NORMALIZER_VERSION: &str = env!("CARGO_PKG_VERSION");

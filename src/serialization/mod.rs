//! Helpers for (de)serialising classifier state as JSON snapshots.

pub mod snapshot;

pub use snapshot::{load_classifier, load_snapshot, save_classifier, Snapshot, STATE_KEYS};

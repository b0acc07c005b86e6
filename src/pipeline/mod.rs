//! Snapshot processing.
//!
//! - `codec`: Encode/decode a language snapshot to its persisted JSON form
//! - `diff`: Classify the changes between two snapshots

pub mod codec;
pub mod diff;

pub use codec::{Decoded, decode, encode, from_document};
pub use diff::{Change, ChangeLog, ChangeType, DiffCalculator, calculate_diff};

//! Extent segments: the record model, its owning store and the search index.
//!
//! Provides:
//! - `record` -- `SegmentRecord`, one contiguous run of extents
//! - `store` -- `SegmentStore`, append / sort / reset lifecycle
//! - `index` -- `SegmentIndex`, forward binary search and reverse scan

pub mod index;
pub mod record;
pub mod store;

pub use index::{OwnerInfo, PhysicalLocation, SegmentIndex};
pub use record::SegmentRecord;
pub use store::{Overlap, OverlapKind, SegmentStore, StoreState};

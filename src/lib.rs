//! lvmap: in-memory map of LVM extent layout.
//!
//! Maps logical extents of logical volumes to the physical extents that back
//! them, and answers placement questions over a snapshot of the layout:
//! forward lookup (LE -> PE), reverse lookup (PE -> owner), free-space and
//! per-device usage accounting.
//!
//! The snapshot is rebuilt in full from a [`RecordSource`] (parsed `pvs` /
//! `vgs` output) on every [`ExtentMap::reload`]. Nothing is persisted and
//! nothing in the layout is ever modified.

pub mod config;
pub mod error;
pub mod extent_size;
pub mod map;
pub mod query;
pub mod segment;
pub mod shared;
pub mod source;

pub use config::{Config, LayoutPolicy};
pub use error::{MalformedRecord, MapError, Result};
pub use extent_size::{ExtentSize, ExtentSizeTable};
pub use map::{ExtentMap, ReloadReport};
pub use query::{FirstExtent, Placement, PlacementReport, QueryEngine};
pub use segment::{OwnerInfo, PhysicalLocation, SegmentIndex, SegmentRecord, SegmentStore, StoreState};
pub use shared::SharedExtentMap;
pub use source::{CommandSource, RecordSource, StaticSource, TextSource};

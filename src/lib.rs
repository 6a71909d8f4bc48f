//! Bandtree compiles a band membership graph into a family-tree layout.
//!
//! The pipeline is a single pure call, [`compile_layout`]:
//!
//! - Normalize the [`Graph`] (year fallbacks, duplicate removal)
//! - Partition each band's history into lineups at membership boundaries
//! - Assign stable member columns and place one box per lineup, either in time-disjoint lanes or
//!   by an outward collision search on a free canvas
//! - Route continuity and migration edges between consecutive appearances of each artist
//!
//! The resulting [`Layout`] is everything a renderer needs. The [`harvest`] module carries the
//! small, deterministic pieces of the upstream graph harvester.
#![forbid(unsafe_code)]

/// Shared geometry, year spans and errors.
pub mod foundation;
/// Input graph model and normalization.
pub mod graph;
/// Lineup partitioning.
pub mod partition;
/// Layout configuration, lane packing, collision search and column assignment.
pub mod layout;
/// Edge routing.
pub mod route;
/// Compiler driver, output model and fingerprints.
pub mod compile;
/// Retry backoff and depth-bounded exploration for graph harvesting.
pub mod harvest;

pub use crate::compile::compiler::compile_layout;
pub use crate::compile::fingerprint::{LayoutFingerprint, fingerprint_layout};
pub use crate::compile::layout::{
    CanvasSize, CompileWarning, Edge, EdgeKind, Layout, MemberNode, VersionBox,
};
pub use crate::foundation::core::{Point, Rect, UNKNOWN_YEAR, YearSpan};
pub use crate::foundation::error::{BandtreeError, BandtreeResult};
pub use crate::graph::model::{BandDef, Graph, MembershipDef};
pub use crate::layout::config::{LayoutConfig, LayoutMode};
pub use crate::partition::lineups::{Lineup, PartitionedBand, partition_graph};

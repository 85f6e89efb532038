//! Road topology derived on demand from local grid probes.
//!
//! No road graph is stored. Junctions, their shapes and the ends of straight
//! runs are recovered by looking at the cells around a position, so the
//! answers always agree with whatever the grid holds right now (including
//! half-built previews and rolled-back edits).

mod adjacency;
mod classifier;
mod snap;

pub use adjacency::{adjacent_sides, Probe};
pub use classifier::{arm_present, classify, geometric_type, locate_junction};
pub use snap::{snap_endpoint, snap_to_nearest_end, snap_to_nearest_node};

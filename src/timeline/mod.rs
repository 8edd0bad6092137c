//! The availability timeline engine: pure, synchronous computation.
//!
//! Availability over a day is modeled as a step function driven by
//! time-stamped change points. [`aggregator`] integrates that function
//! over a query window, [`editor`] turns it into draggable render
//! segments, and [`clock`] handles the `"HH:MM"`/decimal-hours boundary.
//! Nothing in this tree performs I/O.

pub mod aggregator;
pub mod clock;
pub mod editor;

pub use aggregator::{ChangePoint, Segment, Window};
pub use clock::{ClockTime, TimeParseError};
pub use editor::{DragState, SegmentKind, SegmentLine, TimelineGeometry};

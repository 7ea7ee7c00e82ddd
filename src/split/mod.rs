//! Output units and the splitting policy that creates them.

mod splitter;
mod unit;

pub use splitter::{BlockEvent, OpenSection, OutputSplitter, SplitReason};
pub use unit::{Cursor, OutputUnit, UnitNaming};

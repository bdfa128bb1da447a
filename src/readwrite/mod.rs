//! Readers and writers of the side files referenced by a parameter overlay.

mod dms;
mod sequence;
mod sites;

pub use dms::DmsIO;
pub use sequence::read_sequence;
pub use sites::{read_sites, write_sites};

//! Track library: builds the startup playlist from a directory scan.
//!
//! Tags are read with `lofty`; files without usable tags fall back to the
//! filename as the title and a placeholder artist.

mod scan;

pub use scan::*;

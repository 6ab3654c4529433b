pub mod detail_enricher;
pub mod directory_lister;
pub mod droid;
pub mod merge_engine;
pub mod pipeline;
pub mod report;

pub use detail_enricher::*;
pub use directory_lister::*;
pub use droid::*;
pub use pipeline::*;

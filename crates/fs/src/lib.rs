mod filter;
mod record;
mod walker;

pub use filter::NameFilter;
pub use record::{DateProperty, FileRecord};
pub use walker::{WalkOptions, enumerate};

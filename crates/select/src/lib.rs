mod period;
mod rule;
mod selector;

pub use period::parse_period;
pub use rule::{InvalidRule, PeriodDirection, PeriodUnit, SelectionRule};
pub use selector::{select, select_at};

pub use sift_fs::{DateProperty, FileRecord};

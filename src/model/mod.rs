//! Schedule domain types shared by the extraction pipeline and its callers.

pub mod date;
pub mod pair;
pub mod time;

pub use date::{DateError, DateItem, DateModel, Frequency};
pub use pair::{PairModel, PairType, Subgroup};
pub use time::{Time, TimeError, SLOT_ENDS, SLOT_STARTS};

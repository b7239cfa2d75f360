mod month_regrouper;

pub use month_regrouper::{month_of, MonthRegrouper, MonthlyBuckets, DEFAULT_MONTH_OFFSET, MONTHS};

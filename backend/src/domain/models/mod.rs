pub mod month;
pub mod monthly_override;
pub mod planning;

pub use month::{MonthKey, MonthKeyError};
pub use monthly_override::MonthlyOverride;
pub use planning::{PlanningDefinition, MAX_CATEGORY_NAME_LENGTH};

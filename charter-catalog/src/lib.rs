pub mod inventory;
pub mod pricing;
pub mod schedule;

pub use inventory::{ensure_bookable, InventoryError};
pub use pricing::{FareCalculator, FareQuote, PricingError};
pub use schedule::{OperationalClock, ScheduleError};

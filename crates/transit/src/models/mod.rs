//! Transit data models, types, and traits.

pub mod schedule;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use schedule::{DaySchedule, DayType, ScheduleDescriptor, TimeOfDay};
pub use traits::{NearbyStation, TransitLine, TransitProvider, TransitStation};
pub use types::{LineKind, Result, StationKind, TransitError};

// Domain types and value objects

pub mod calendar;
pub mod site;
pub mod winter;

// Re-export commonly used types
pub use calendar::CalendarDay;
pub use site::{SiteInfo, SiteResolver};
pub use winter::WinterWindow;

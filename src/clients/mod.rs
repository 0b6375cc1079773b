pub mod calendar;
pub mod mock;

pub mod traits;
pub mod json;

pub use traits::DayRepository;
pub use json::JsonDayRepository;

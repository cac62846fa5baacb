mod day_repository;

pub use day_repository::JsonDayRepository;

use crate::domain::Day;
use crate::errors::ArchiveResult;

/// Persisted day records, one per date
#[cfg_attr(test, mockall::automock)]
pub trait DayRepository: Send + Sync {
    /// `Ok(None)` when nothing has been stored for `date` yet
    fn load(&self, date: &str) -> ArchiveResult<Option<Day>>;
    /// Replace whatever is stored under `day.date`
    fn store(&self, day: &Day) -> ArchiveResult<()>;
    /// Dates that have a stored record, in calendar order
    fn dates(&self) -> ArchiveResult<Vec<String>>;
}

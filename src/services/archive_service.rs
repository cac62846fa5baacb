use crate::domain::Day;
use crate::errors::ArchiveResult;
use crate::storage::traits::DayRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDay {
    pub date: String,
    /// Items that were not in the stored record before
    pub added: usize,
    /// Items in the record as written
    pub total: usize,
}

pub struct ArchiveService<R: DayRepository> {
    repository: R,
}

impl<R: DayRepository> ArchiveService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Merge each day into its stored record and write it back.
    ///
    /// Stops at the first day that cannot be loaded or written; days
    /// already saved stay saved.
    pub fn save(&self, days: Vec<Day>) -> ArchiveResult<Vec<SavedDay>> {
        let mut saved = Vec::with_capacity(days.len());
        for day in days {
            saved.push(self.save_day(day)?);
        }
        Ok(saved)
    }

    pub fn save_day(&self, src: Day) -> ArchiveResult<SavedDay> {
        let mut dest = match self.repository.load(&src.date)? {
            Some(stored) if stored.date != src.date => {
                tracing::warn!(
                    file = %src.date,
                    recorded = %stored.date,
                    "Stored record names another date, keeping the file name"
                );
                Day {
                    date: src.date.clone(),
                    ..stored
                }
            }
            Some(stored) => stored,
            None => Day::new(src.date.clone()),
        };

        let added = dest.merge(src);
        dest.canonicalize();
        self.repository.store(&dest)?;

        tracing::info!(date = %dest.date, added = added, "Saved day");

        Ok(SavedDay {
            added,
            total: dest.item_count(),
            date: dest.date,
        })
    }

    /// Stored dates with the number of items each holds
    pub fn summaries(&self) -> ArchiveResult<Vec<SavedDay>> {
        let mut summaries = Vec::new();
        for date in self.repository.dates()? {
            let total = self
                .repository
                .load(&date)?
                .map(|day| day.item_count())
                .unwrap_or(0);
            summaries.push(SavedDay {
                date,
                added: 0,
                total,
            });
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArchivedItem, DayChannel, Owner};
    use crate::errors::ArchiveError;
    use crate::storage::traits::MockDayRepository;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn item(title: &str, description: &str) -> ArchivedItem {
        ArchivedItem {
            title: title.to_string(),
            link: String::new(),
            description: description.to_string(),
        }
    }

    fn day(date: &str, owner: &str, channel: &str, items: Vec<ArchivedItem>) -> Day {
        let mut day_channel = DayChannel::new(channel, "");
        day_channel.items = items;
        let mut owner = Owner::new(owner);
        owner.channels.push(day_channel);
        let mut day = Day::new(date);
        day.owners.push(owner);
        day
    }

    #[test]
    fn test_save_new_date_writes_sorted_record() {
        let mut repo = MockDayRepository::new();
        repo.expect_load().with(eq("2016-4-19")).returning(|_| Ok(None));
        repo.expect_store()
            .withf(|stored: &Day| {
                let titles: Vec<&str> = stored.owners[0].channels[0]
                    .items
                    .iter()
                    .map(|i| i.title.as_str())
                    .collect();
                stored.date == "2016-4-19" && titles == vec!["a", "b"]
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = ArchiveService::new(repo);
        let saved = service
            .save(vec![day("2016-4-19", "cnet", "iPhone", vec![item("b", ""), item("a", "")])])
            .unwrap();

        assert_eq!(
            saved,
            vec![SavedDay {
                date: "2016-4-19".to_string(),
                added: 2,
                total: 2,
            }]
        );
    }

    #[test]
    fn test_save_keeps_stored_item() {
        let mut repo = MockDayRepository::new();
        repo.expect_load()
            .returning(|_| Ok(Some(day("2016-4-19", "cnet", "iPhone", vec![item("T", "D1")]))));
        repo.expect_store()
            .withf(|stored: &Day| {
                let items = &stored.owners[0].channels[0].items;
                items.len() == 2 && items[0].title == "T" && items[0].description == "D1"
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = ArchiveService::new(repo);
        let saved = service
            .save_day(day("2016-4-19", "cnet", "iPhone", vec![item("T", "D2"), item("U", "")]))
            .unwrap();

        assert_eq!(saved.added, 1);
        assert_eq!(saved.total, 2);
    }

    #[test]
    fn test_save_stops_at_first_failure() {
        let mut repo = MockDayRepository::new();
        let mut seq = Sequence::new();
        repo.expect_load()
            .with(eq("2016-4-19"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_store()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        repo.expect_load()
            .with(eq("2016-4-20"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|date| {
                Err(ArchiveError::RecordDecode {
                    path: date.to_string(),
                    message: "expected value".to_string(),
                })
            });

        let service = ArchiveService::new(repo);
        let result = service.save(vec![
            day("2016-4-19", "cnet", "iPhone", vec![item("a", "")]),
            day("2016-4-20", "cnet", "iPhone", vec![item("b", "")]),
            day("2016-4-21", "cnet", "iPhone", vec![item("c", "")]),
        ]);

        assert!(matches!(result, Err(ArchiveError::RecordDecode { .. })));
    }

    #[test]
    fn test_save_surfaces_write_failure() {
        let mut repo = MockDayRepository::new();
        repo.expect_load().returning(|_| Ok(None));
        repo.expect_store().times(1).returning(|stored| {
            Err(ArchiveError::RecordWrite {
                path: stored.date.clone(),
                message: "read-only file system".to_string(),
            })
        });

        let service = ArchiveService::new(repo);
        let result = service.save(vec![
            day("2016-4-19", "cnet", "iPhone", vec![item("a", "")]),
            day("2016-4-20", "cnet", "iPhone", vec![item("b", "")]),
        ]);

        assert!(matches!(result, Err(ArchiveError::RecordWrite { .. })));
    }

    #[test]
    fn test_save_uses_file_date_over_recorded_date() {
        let mut repo = MockDayRepository::new();
        repo.expect_load()
            .returning(|_| Ok(Some(day("2016-04-19", "cnet", "iPhone", vec![item("a", "")]))));
        repo.expect_store()
            .withf(|stored: &Day| stored.date == "2016-4-19")
            .times(1)
            .returning(|_| Ok(()));

        let service = ArchiveService::new(repo);
        let saved = service
            .save_day(day("2016-4-19", "cnet", "iPhone", vec![item("b", "")]))
            .unwrap();

        assert_eq!(saved.date, "2016-4-19");
        assert_eq!(saved.total, 2);
    }

    #[test]
    fn test_summaries() {
        let mut repo = MockDayRepository::new();
        repo.expect_dates()
            .returning(|| Ok(vec!["2016-4-19".to_string(), "2016-4-20".to_string()]));
        repo.expect_load()
            .with(eq("2016-4-19"))
            .returning(|_| Ok(Some(day("2016-4-19", "cnet", "iPhone", vec![item("a", ""), item("b", "")]))));
        repo.expect_load()
            .with(eq("2016-4-20"))
            .returning(|_| Ok(Some(Day::new("2016-4-20"))));

        let service = ArchiveService::new(repo);
        let summaries = service.summaries().unwrap();

        let totals: Vec<(&str, usize)> = summaries.iter().map(|s| (s.date.as_str(), s.total)).collect();
        assert_eq!(totals, vec![("2016-4-19", 2), ("2016-4-20", 0)]);
    }
}

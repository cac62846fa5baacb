//! Re-bucketing of crawled channels by publication day.
//!
//! Lookups at every level go through hash indices kept beside the nested
//! vectors, so insertion order is preserved for output while each add stays
//! constant time.

use std::collections::{HashMap, HashSet};

use crate::domain::{ArchivedItem, Channel, Day, DayChannel, Owner, PubDate, TimezoneTable};

/// Date-centric accumulator.
#[derive(Debug, Default)]
pub struct DayBuckets {
    days: Vec<Day>,
    day_index: HashMap<String, usize>,
    owner_index: HashMap<(usize, String), usize>,
    channel_index: HashMap<(usize, usize, String), usize>,
    item_titles: HashSet<(usize, usize, usize, String)>,
}

impl DayBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `item` under date → owner → channel, creating each level on
    /// first use. `channel_description` is only used when the channel is new.
    /// Returns `false` when the channel already holds an item with this title.
    pub fn add_item(
        &mut self,
        item: ArchivedItem,
        date: &str,
        owner_id: &str,
        channel_title: &str,
        channel_description: &str,
    ) -> bool {
        let day_idx = match self.day_index.get(date) {
            Some(&idx) => idx,
            None => {
                self.days.push(Day::new(date));
                self.day_index.insert(date.to_string(), self.days.len() - 1);
                self.days.len() - 1
            }
        };
        let day = &mut self.days[day_idx];

        let owner_key = (day_idx, owner_id.to_string());
        let owner_idx = match self.owner_index.get(&owner_key) {
            Some(&idx) => idx,
            None => {
                day.owners.push(Owner::new(owner_id));
                self.owner_index.insert(owner_key, day.owners.len() - 1);
                day.owners.len() - 1
            }
        };
        let owner = &mut day.owners[owner_idx];

        let channel_key = (day_idx, owner_idx, channel_title.to_string());
        let channel_idx = match self.channel_index.get(&channel_key) {
            Some(&idx) => idx,
            None => {
                owner
                    .channels
                    .push(DayChannel::new(channel_title, channel_description));
                self.channel_index.insert(channel_key, owner.channels.len() - 1);
                owner.channels.len() - 1
            }
        };

        let item_key = (day_idx, owner_idx, channel_idx, item.title.clone());
        if !self.item_titles.insert(item_key) {
            return false;
        }
        owner.channels[channel_idx].items.push(item);
        true
    }

    pub fn into_days(self) -> Vec<Day> {
        self.days
    }
}

/// Outcome of re-bucketing one crawl
#[derive(Debug, Default)]
pub struct Rearranged {
    pub days: Vec<Day>,
    pub skipped: usize,
    pub duplicates: usize,
}

pub struct Bucketizer {
    zones: TimezoneTable,
}

impl Bucketizer {
    pub fn new(zones: TimezoneTable) -> Self {
        Self { zones }
    }

    /// Turn channel-centric records into day records. Items whose date does
    /// not parse are skipped.
    pub fn rearrange(&self, channels: Vec<Channel>) -> Rearranged {
        let mut buckets = DayBuckets::new();
        let mut skipped = 0;
        let mut duplicates = 0;

        for channel in channels {
            for item in channel.items {
                let date = match PubDate::parse(&item.pub_date, &self.zones) {
                    Ok(date) => date,
                    Err(e) => {
                        tracing::debug!(
                            title = %item.title,
                            date = %item.pub_date,
                            error = %e,
                            "Skipping item with unusable date"
                        );
                        skipped += 1;
                        continue;
                    }
                };

                let added = buckets.add_item(
                    ArchivedItem::from(item),
                    &date.day,
                    &channel.owner,
                    &channel.title,
                    &channel.description,
                );
                if !added {
                    duplicates += 1;
                }
            }
        }

        Rearranged {
            days: buckets.into_days(),
            skipped,
            duplicates,
        }
    }
}

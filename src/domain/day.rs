//! Date-centric records, one [`Day`] per persisted file.
//!
//! Merging is keyed on owner id, channel title and item title. When a key
//! is already present the existing entry wins. Items are moved in from the
//! source, so the result owns everything it holds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::feed::Item;

/// An article as archived. The raw publication date is not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(rename = "desc", default)]
    pub description: String,
}

impl From<Item> for ArchivedItem {
    fn from(item: Item) -> Self {
        Self {
            title: item.title,
            link: item.link,
            description: item.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayChannel {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<ArchivedItem>,
}

impl DayChannel {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            items: Vec::new(),
        }
    }

    /// Returns the number of items that were not already present
    pub fn merge(&mut self, src: DayChannel) -> usize {
        let mut index: HashMap<String, usize> = self
            .items
            .iter()
            .enumerate()
            .rev()
            .map(|(idx, item)| (item.title.clone(), idx))
            .collect();

        let mut added = 0;
        for item in src.items {
            if index.contains_key(&item.title) {
                continue;
            }
            index.insert(item.title.clone(), self.items.len());
            self.items.push(item);
            added += 1;
        }
        added
    }

    fn canonicalize(&mut self) {
        self.items.sort_by(|a, b| a.title.cmp(&b.title));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    #[serde(default)]
    pub channels: Vec<DayChannel>,
}

impl Owner {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            channels: Vec::new(),
        }
    }

    pub fn merge(&mut self, src: Owner) -> usize {
        let mut index: HashMap<String, usize> = self
            .channels
            .iter()
            .enumerate()
            .rev()
            .map(|(idx, channel)| (channel.title.clone(), idx))
            .collect();

        let mut added = 0;
        for channel in src.channels {
            let idx = match index.get(&channel.title) {
                Some(&idx) => idx,
                None => {
                    index.insert(channel.title.clone(), self.channels.len());
                    self.channels
                        .push(DayChannel::new(channel.title.clone(), channel.description.clone()));
                    self.channels.len() - 1
                }
            };
            added += self.channels[idx].merge(channel);
        }
        added
    }

    pub fn item_count(&self) -> usize {
        self.channels.iter().map(|c| c.items.len()).sum()
    }

    fn canonicalize(&mut self) {
        self.channels.sort_by(|a, b| a.title.cmp(&b.title));
        for channel in &mut self.channels {
            channel.canonicalize();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: String,
    #[serde(default)]
    pub owners: Vec<Owner>,
}

impl Day {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            owners: Vec::new(),
        }
    }

    /// Fold `src` into this day, returning how many items were added
    pub fn merge(&mut self, src: Day) -> usize {
        let mut index: HashMap<String, usize> = self
            .owners
            .iter()
            .enumerate()
            .rev()
            .map(|(idx, owner)| (owner.id.clone(), idx))
            .collect();

        let mut added = 0;
        for owner in src.owners {
            let idx = match index.get(&owner.id) {
                Some(&idx) => idx,
                None => {
                    index.insert(owner.id.clone(), self.owners.len());
                    self.owners.push(Owner::new(owner.id.clone()));
                    self.owners.len() - 1
                }
            };
            added += self.owners[idx].merge(owner);
        }
        added
    }

    /// Sort owners by id, channels by title and items by title
    pub fn canonicalize(&mut self) {
        self.owners.sort_by(|a, b| a.id.cmp(&b.id));
        for owner in &mut self.owners {
            owner.canonicalize();
        }
    }

    pub fn item_count(&self) -> usize {
        self.owners.iter().map(Owner::item_count).sum()
    }
}

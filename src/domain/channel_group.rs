use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ArchiveError, ArchiveResult};

/// One owner's feed URLs, as written in a config fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelGroup {
    pub owner: String,
    #[serde(default)]
    pub channels: Vec<String>,
}

impl ChannelGroup {
    pub fn new(owner: impl Into<String>, channels: Vec<String>) -> Self {
        Self {
            owner: owner.into(),
            channels,
        }
    }
}

/// Merged configuration: one group per owner, owners ascending, each URL
/// list sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelGroups(Vec<ChannelGroup>);

impl ChannelGroups {
    /// Merge any number of fragments into canonical groups.
    ///
    /// The merged list goes through the same ordering check as
    /// [`ChannelGroups::try_from`], so a broken merge surfaces as
    /// `UnsortedInput` instead of reaching the crawl.
    pub fn merge<I>(fragments: I) -> ArchiveResult<Self>
    where
        I: IntoIterator<Item = Vec<ChannelGroup>>,
    {
        let mut by_owner: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for group in fragments.into_iter().flatten() {
            by_owner
                .entry(group.owner)
                .or_default()
                .extend(group.channels);
        }

        let groups: Vec<ChannelGroup> = by_owner
            .into_iter()
            .map(|(owner, mut channels)| {
                channels.sort();
                channels.dedup();
                ChannelGroup { owner, channels }
            })
            .collect();

        Self::try_from(groups)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChannelGroup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of URLs across all owners
    pub fn url_count(&self) -> usize {
        self.0.iter().map(|g| g.channels.len()).sum()
    }

}

/// Accepts groups that are already canonical. Adjacent pairs are checked in
/// a single pass; the first one out of order (or repeated) is reported.
impl TryFrom<Vec<ChannelGroup>> for ChannelGroups {
    type Error = ArchiveError;

    fn try_from(groups: Vec<ChannelGroup>) -> ArchiveResult<Self> {
        for pair in groups.windows(2) {
            if pair[0].owner >= pair[1].owner {
                return Err(ArchiveError::UnsortedInput(format!(
                    "owner '{}' followed by '{}'",
                    pair[0].owner, pair[1].owner
                )));
            }
        }

        for group in &groups {
            for pair in group.channels.windows(2) {
                if pair[0] >= pair[1] {
                    return Err(ArchiveError::UnsortedInput(format!(
                        "owner '{}': channel '{}' followed by '{}'",
                        group.owner, pair[0], pair[1]
                    )));
                }
            }
        }

        Ok(Self(groups))
    }
}

impl<'a> IntoIterator for &'a ChannelGroups {
    type Item = &'a ChannelGroup;
    type IntoIter = std::slice::Iter<'a, ChannelGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

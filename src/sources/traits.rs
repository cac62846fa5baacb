use crate::domain::Channel;
use crate::errors::ArchiveResult;

/// Fetches one configured URL and decodes it into channel records.
///
/// Implementations leave `Channel::owner` empty; the crawl tags it.
#[cfg_attr(test, mockall::automock)]
pub trait FeedSource: Send + Sync {
    fn fetch_channels(&self, url: &str) -> ArchiveResult<Vec<Channel>>;
}

use crate::domain::{Channel, ChannelGroups};
use crate::errors::{ArchiveError, ArchiveResult};
use crate::sources::FeedSource;

/// Channels gathered by one crawl, plus the URLs that could not be used
#[derive(Debug, Default)]
pub struct CrawlResult {
    pub channels: Vec<Channel>,
    pub failed: Vec<(String, String)>, // (url, error_message)
}

impl CrawlResult {
    pub fn item_count(&self) -> usize {
        self.channels.iter().map(|c| c.items.len()).sum()
    }
}

pub struct CrawlService<S: FeedSource> {
    source: S,
}

impl<S: FeedSource> CrawlService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch every configured URL in order and accumulate its channels.
    ///
    /// A URL that fails to fetch or decode is recorded and skipped. Channels
    /// are not deduplicated here: the same title under two owners stays as
    /// two entries.
    pub fn crawl(&self, groups: &ChannelGroups) -> ArchiveResult<CrawlResult> {
        if groups.is_empty() {
            return Err(ArchiveError::NoChannelGroups);
        }

        let mut result = CrawlResult::default();

        for group in groups {
            for url in &group.channels {
                match self.source.fetch_channels(url) {
                    Ok(channels) => {
                        tracing::debug!(url = %url, channels = channels.len(), "Fetched feed");
                        result.channels.extend(
                            channels
                                .into_iter()
                                .map(|channel| channel.with_owner(group.owner.as_str())),
                        );
                    }
                    Err(e) => {
                        // Log error but continue with other feeds
                        tracing::warn!(url = %url, owner = %group.owner, error = %e, "Skipping feed");
                        result.failed.push((url.clone(), e.to_string()));
                    }
                }
            }
        }

        for channel in &mut result.channels {
            channel.trim_whitespace();
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelGroup, Item};
    use crate::sources::traits::MockFeedSource;
    use mockall::predicate::eq;

    fn groups(entries: Vec<(&str, Vec<&str>)>) -> ChannelGroups {
        ChannelGroups::merge(vec![entries
            .into_iter()
            .map(|(owner, urls)| {
                ChannelGroup::new(owner, urls.into_iter().map(String::from).collect())
            })
            .collect::<Vec<_>>()])
        .unwrap()
    }

    #[test]
    fn test_crawl_without_groups_fails() {
        let service = CrawlService::new(MockFeedSource::new());

        let result = service.crawl(&ChannelGroups::default());
        assert!(matches!(result, Err(ArchiveError::NoChannelGroups)));
    }

    #[test]
    fn test_crawl_tags_owner_and_trims() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_channels()
            .with(eq("http://www.cnet.com/rss/iphone-update/"))
            .times(1)
            .returning(|_| {
                Ok(vec![Channel::new("\n  CNET iPhone Update \n").with_items(vec![
                    Item::new(" glitch ").with_pub_date(" Tue, 19 Apr 2016 17:25:18 +0000 "),
                ])])
            });

        let service = CrawlService::new(source);
        let result = service
            .crawl(&groups(vec![("cnet", vec!["http://www.cnet.com/rss/iphone-update/"])]))
            .unwrap();

        assert_eq!(result.channels.len(), 1);
        let channel = &result.channels[0];
        assert_eq!(channel.owner, "cnet");
        assert_eq!(channel.title, "CNET iPhone Update");
        assert_eq!(channel.items[0].title, "glitch");
        assert_eq!(channel.items[0].pub_date, "Tue, 19 Apr 2016 17:25:18 +0000");
        assert!(result.failed.is_empty());
    }

    #[test]
    fn test_crawl_skips_failed_urls() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_channels()
            .with(eq("http://a.example/rss"))
            .returning(|_| Err(ArchiveError::FeedParse("unexpected EOF".to_string())));
        source
            .expect_fetch_channels()
            .with(eq("http://b.example/rss"))
            .returning(|_| Ok(vec![Channel::new("B").with_items(vec![Item::new("one")])]));

        let service = CrawlService::new(source);
        let result = service
            .crawl(&groups(vec![("example", vec!["http://a.example/rss", "http://b.example/rss"])]))
            .unwrap();

        assert_eq!(result.channels.len(), 1);
        assert_eq!(result.item_count(), 1);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].0, "http://a.example/rss");
    }

    #[test]
    fn test_crawl_keeps_same_title_under_different_owners() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_channels()
            .times(2)
            .returning(|_| Ok(vec![Channel::new("Top Stories")]));

        let service = CrawlService::new(source);
        let result = service
            .crawl(&groups(vec![("cnn", vec!["http://cnn/rss"]), ("bbc", vec!["http://bbc/rss"])]))
            .unwrap();

        let owners: Vec<&str> = result.channels.iter().map(|c| c.owner.as_str()).collect();
        assert_eq!(owners, vec!["bbc", "cnn"]);
        assert!(result.channels.iter().all(|c| c.title == "Top Stories"));
    }

    #[test]
    fn test_crawl_document_with_several_channels() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_channels()
            .returning(|_| Ok(vec![Channel::new("first"), Channel::new("second")]));

        let service = CrawlService::new(source);
        let result = service.crawl(&groups(vec![("multi", vec!["http://multi/rss"])])).unwrap();

        assert_eq!(result.channels.len(), 2);
        assert!(result.channels.iter().all(|c| c.owner == "multi"));
    }
}

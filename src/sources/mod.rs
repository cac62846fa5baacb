pub mod traits;
pub mod rss;

pub use traits::FeedSource;
pub use rss::RssSource;

pub mod config_loader;
pub mod crawl_service;
pub mod bucket_service;
pub mod archive_service;

pub use config_loader::ConfigLoader;
pub use crawl_service::{CrawlResult, CrawlService};
pub use bucket_service::{Bucketizer, DayBuckets, Rearranged};
pub use archive_service::{ArchiveService, SavedDay};

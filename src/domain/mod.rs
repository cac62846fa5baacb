pub mod channel_group;
pub mod feed;
pub mod day;
pub mod pub_date;

pub use channel_group::{ChannelGroup, ChannelGroups};
pub use feed::{Channel, Item};
pub use day::{ArchivedItem, Day, DayChannel, Owner};
pub use pub_date::{PubDate, TimezoneTable};

use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::blocking::Client;
use url::Url;

use crate::domain::{Channel, Item};
use crate::errors::{ArchiveError, ArchiveResult};
use crate::sources::traits::FeedSource;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Elements kept from a channel or an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Description,
    PubDate,
}

impl Field {
    fn of_channel(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"description" => Some(Self::Description),
            _ => None,
        }
    }

    fn of_item(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"link" => Some(Self::Link),
            b"description" => Some(Self::Description),
            b"pubDate" => Some(Self::PubDate),
            _ => None,
        }
    }
}

/// Builds channels from the event stream of one RSS document.
///
/// Names are compared with their prefix, so `media:title` or `atom:link`
/// never stand in for the plain elements. Anything that is not a channel,
/// an item or one of their kept fields is walked over and dropped.
#[derive(Debug, Default)]
struct DocumentBuilder {
    path: Vec<Vec<u8>>,
    channels: Vec<Channel>,
    item: Option<Item>,
    // Field being read and the depth of its element
    capture: Option<(Field, usize, String)>,
}

impl DocumentBuilder {
    fn in_channel(&self) -> bool {
        self.path.len() == 2 && self.path[1] == b"channel"
    }

    fn in_item(&self) -> bool {
        self.path.len() == 3 && self.path[1] == b"channel" && self.path[2] == b"item"
    }

    fn open(&mut self, name: &[u8]) {
        if self.capture.is_none() {
            let field = if self.path.len() == 1 && name == b"channel" {
                self.channels.push(Channel::default());
                None
            } else if self.in_channel() && name == b"item" {
                self.item = Some(Item::default());
                None
            } else if self.in_channel() {
                Field::of_channel(name)
            } else if self.in_item() {
                Field::of_item(name)
            } else {
                None
            };

            if let Some(field) = field {
                self.capture = Some((field, self.path.len() + 1, String::new()));
            }
        }
        self.path.push(name.to_vec());
    }

    fn text(&mut self, text: &str) {
        if let Some((_, _, value)) = self.capture.as_mut() {
            value.push_str(text);
        }
    }

    fn close(&mut self) {
        let depth = self.path.len();
        let name = self.path.pop();

        match self.capture.take() {
            Some((field, at, value)) if at == depth => self.store(field, value),
            other => {
                self.capture = other;
                if name.as_deref() == Some(b"item".as_slice()) && self.in_channel() {
                    if let (Some(item), Some(channel)) = (self.item.take(), self.channels.last_mut()) {
                        channel.items.push(item);
                    }
                }
            }
        }
    }

    fn store(&mut self, field: Field, value: String) {
        if let Some(item) = self.item.as_mut() {
            match field {
                Field::Title => item.title = value,
                Field::Link => item.link = value,
                Field::Description => item.description = value,
                Field::PubDate => item.pub_date = value,
            }
        } else if let Some(channel) = self.channels.last_mut() {
            match field {
                Field::Title => channel.title = value,
                Field::Description => channel.description = value,
                Field::Link | Field::PubDate => {}
            }
        }
    }
}

/// RSS 2.0 over HTTP(S)
pub struct RssSource {
    client: Client,
}

impl RssSource {
    pub fn new() -> ArchiveResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> ArchiveResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Decode an RSS document. Text is returned as found, whitespace included.
    pub fn parse_document(bytes: &[u8]) -> ArchiveResult<Vec<Channel>> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut builder = DocumentBuilder::default();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => builder.open(e.name().as_ref()),
                Ok(Event::Empty(e)) => {
                    builder.open(e.name().as_ref());
                    builder.close();
                }
                Ok(Event::End(_)) => builder.close(),
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| ArchiveError::FeedParse(e.to_string()))?;
                    builder.text(&text);
                }
                Ok(Event::CData(e)) => builder.text(&String::from_utf8_lossy(&e.into_inner())),
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ArchiveError::FeedParse(format!(
                        "at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = builder.path.last() {
            return Err(ArchiveError::FeedParse(format!(
                "document ends inside <{}>",
                String::from_utf8_lossy(open)
            )));
        }

        Ok(builder.channels)
    }
}

impl FeedSource for RssSource {
    fn fetch_channels(&self, url: &str) -> ArchiveResult<Vec<Channel>> {
        Url::parse(url).map_err(|e| ArchiveError::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self.client.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;

        Self::parse_document(&bytes)
    }
}

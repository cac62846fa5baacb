use serde::{Deserialize, Serialize};

/// One article as fetched, before it is bucketed by day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_pub_date(mut self, pub_date: impl Into<String>) -> Self {
        self.pub_date = pub_date.into();
        self
    }

    pub fn trim_whitespace(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.link);
        trim_in_place(&mut self.description);
        trim_in_place(&mut self.pub_date);
    }
}

/// One feed as fetched, tagged with the owner whose config listed it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub owner: String,
    pub title: String,
    pub description: String,
    pub items: Vec<Item>,
}

impl Channel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Strip indentation that feed documents leave around text nodes
    pub fn trim_whitespace(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.description);
        for item in &mut self.items {
            item.trim_whitespace();
        }
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_whitespace_covers_every_field() {
        let mut channel = Channel::new("\n    CNET iPhone Update  ")
            .with_description("\t Updates \n")
            .with_items(vec![Item::new("  Glitch ")
                .with_link("\n http://cnet.com/1 \n")
                .with_description(" desc ")
                .with_pub_date("  Tue, 19 Apr 2016 17:25:18 +0000\n")]);

        channel.trim_whitespace();

        assert_eq!(channel.title, "CNET iPhone Update");
        assert_eq!(channel.description, "Updates");
        let item = &channel.items[0];
        assert_eq!(item.title, "Glitch");
        assert_eq!(item.link, "http://cnet.com/1");
        assert_eq!(item.description, "desc");
        assert_eq!(item.pub_date, "Tue, 19 Apr 2016 17:25:18 +0000");
    }

    #[test]
    fn test_trim_keeps_inner_whitespace() {
        let mut item = Item::new(" two  words ");
        item.trim_whitespace();
        assert_eq!(item.title, "two  words");
    }
}

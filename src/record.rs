use serde::{Deserialize, Serialize};

/// Record is one corpus entry (a tweet)
///
/// Only `text` is looked at by the index and the ranking code. The author
/// handle and the counters are display metadata carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "likecount", alias = "like_count", default)]
    pub like_count: u64,
    #[serde(rename = "replycount", alias = "reply_count", default)]
    pub reply_count: u64,
    #[serde(rename = "retweetcount", alias = "retweet_count", default)]
    pub retweet_count: u64,
}

impl Record {
    pub fn new(id: String, text: String) -> Self {
        Self {
            id,
            username: String::new(),
            text: Some(text),
            like_count: 0,
            reply_count: 0,
            retweet_count: 0,
        }
    }

    pub fn with_username(mut self, username: String) -> Self {
        self.username = username;
        self
    }

    pub fn with_counts(mut self, likes: u64, replies: u64, retweets: u64) -> Self {
        self.like_count = likes;
        self.reply_count = replies;
        self.retweet_count = retweets;
        self
    }

    /// Searchable text; an absent text field reads as empty
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

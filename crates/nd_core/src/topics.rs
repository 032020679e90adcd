use serde::{Deserialize, Serialize};

/// Topics offered by the preferences view.
pub const AVAILABLE_TOPICS: [&str; 8] = [
    "Technology",
    "Business",
    "Science",
    "Entertainment",
    "Health",
    "Sports",
    "Politics",
    "Other",
];

/// The user's selected topics, in the order they were picked.
///
/// Membership is what matters; order is only kept for display. The set does not
/// check labels against [`AVAILABLE_TOPICS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicSet {
    topics: Vec<String>,
}

impl TopicSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the topic was not already selected.
    pub fn add(&mut self, topic: impl Into<String>) -> bool {
        let topic = topic.into();
        if self.contains(&topic) {
            return false;
        }
        self.topics.push(topic);
        true
    }

    /// Returns `true` if the topic was selected.
    pub fn remove(&mut self, topic: &str) -> bool {
        let before = self.topics.len();
        self.topics.retain(|t| t != topic);
        before != self.topics.len()
    }

    pub fn clear(&mut self) {
        self.topics.clear();
    }

    /// Swaps the whole selection, dropping duplicates.
    pub fn replace_with<I, S>(&mut self, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clear();
        for topic in topics {
            self.add(topic);
        }
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Order-insensitive identity of the selection, used to key article fetches.
    pub fn cache_key(&self) -> String {
        cache_key(&self.topics)
    }
}

pub fn cache_key<S: AsRef<str>>(topics: &[S]) -> String {
    let mut sorted: Vec<&str> = topics.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted.join(",")
}

impl<S: Into<String>> FromIterator<S> for TopicSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TopicSet::new();
        set.replace_with(iter);
        set
    }
}

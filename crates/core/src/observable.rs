//! Observable detail-error list carried by every envelope.
//!
//! [`ErrorList`] is an ordered sequence of strings that publishes a
//! [`ListChange`] on a `tokio::sync::broadcast` channel whenever an item is
//! added or removed, so a UI layer can follow the list without polling.
//! Publishing never blocks and needs no runtime.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio::sync::broadcast;

/// Default buffer capacity for the change channel.
pub const DEFAULT_CHANGE_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// ListChange
// ---------------------------------------------------------------------------

/// A single mutation of an [`ErrorList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListChange {
    Added { index: usize, item: String },
    Removed { index: usize, item: String },
    Cleared,
}

// ---------------------------------------------------------------------------
// ErrorList
// ---------------------------------------------------------------------------

/// Ordered, observable list of error details.
///
/// Cloning copies the items into a new list with its own change channel;
/// subscribers of the original do not see mutations of the clone.
///
/// Lists built with `From<Vec<String>>`, `collect` or deserialization use
/// [`DEFAULT_CHANGE_CAPACITY`]. Use [`with_change_capacity`] or
/// [`EnvelopeConfig::adopt`](crate::config::EnvelopeConfig::adopt) to apply a
/// configured capacity afterwards.
///
/// [`with_change_capacity`]: ErrorList::with_change_capacity
pub struct ErrorList {
    items: Vec<String>,
    capacity: usize,
    changes: broadcast::Sender<ListChange>,
}

impl ErrorList {
    /// Create an empty list with the default change capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANGE_CAPACITY)
    }

    /// Create an empty list whose change channel buffers `capacity` events.
    ///
    /// Slow subscribers that fall further behind observe
    /// `TryRecvError::Lagged`. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (changes, _) = broadcast::channel(capacity);
        Self {
            items: Vec::new(),
            capacity,
            changes,
        }
    }

    /// Keep the items but move them to a change channel of `capacity` events.
    ///
    /// Existing subscribers stay attached to the old channel and receive no
    /// further changes.
    pub fn with_change_capacity(self, capacity: usize) -> Self {
        let mut resized = Self::with_capacity(capacity);
        resized.items = self.items;
        resized
    }

    /// Buffer size of the change channel.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Subscribe to future changes of this list.
    pub fn subscribe(&self) -> broadcast::Receiver<ListChange> {
        self.changes.subscribe()
    }

    /// Append an item and notify subscribers.
    pub fn push(&mut self, item: impl Into<String>) {
        let item = item.into();
        let index = self.items.len();
        self.items.push(item.clone());
        self.publish(ListChange::Added { index, item });
    }

    /// Remove the item at `index`, returning it if it existed.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.publish(ListChange::Removed {
            index,
            item: item.clone(),
        });
        Some(item)
    }

    /// Remove every item. Subscribers receive a single `Cleared` event.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.publish(ListChange::Cleared);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    fn publish(&self, change: ListChange) {
        // Ignore the SendError, it only means there are zero subscribers.
        let _ = self.changes.send(change);
    }
}

impl Default for ErrorList {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ErrorList {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.capacity);
        copy.items = self.items.clone();
        copy
    }
}

impl std::fmt::Debug for ErrorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl PartialEq for ErrorList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ErrorList {}

impl From<Vec<String>> for ErrorList {
    fn from(items: Vec<String>) -> Self {
        let mut list = Self::new();
        list.items = items;
        list
    }
}

impl<S: Into<String>> FromIterator<S> for ErrorList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from(iter.into_iter().map(Into::into).collect::<Vec<String>>())
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for ErrorList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

impl<'de> Deserialize<'de> for ErrorList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<String>::deserialize(deserializer).map(Self::from)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

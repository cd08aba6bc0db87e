use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Set of queue names a worker is allowed to drain.
///
/// An empty filter means "every queue". The filter is parsed from a comma-separated list
/// (`"mail,reports"`): entries are trimmed, blank entries are skipped and duplicates collapse.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueFilter(BTreeSet<String>);

impl QueueFilter {
    /// Filter that accepts every queue.
    pub fn all() -> Self {
        Self(BTreeSet::new())
    }

    /// Build a filter from an iterator of names.
    ///
    /// Names are validated the same way as in [`FromStr`].
    pub fn from_names<I, S>(names: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(ModelError::InvalidQueueName(name.to_string()));
            }
            set.insert(name.to_string());
        }
        Ok(Self(set))
    }

    /// Returns `true` when no queue restriction is configured.
    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if a task bound to `queue` may be taken under this filter.
    pub fn matches(&self, queue: &str) -> bool {
        self.0.is_empty() || self.0.contains(queue)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Same as [`QueueFilter::is_all`]: no names configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the configured names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }
}

impl FromStr for QueueFilter {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        Self::from_names(s.split(','))
    }
}

impl fmt::Display for QueueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("*");
        }
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(","))
    }
}

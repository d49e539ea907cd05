//! Preference models
//!
//! [`SortOrder`] is the persisted form of two independent toggles, sort by
//! deadline and sort by priority. Every change goes through [`SortFacets`]:
//! decode the current order, flip one facet, encode again. The four orders
//! and the four facet pairs are in one-to-one correspondence, so no
//! transition can produce an order outside the enumeration.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Order in which the task list is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    None,
    ByDeadline,
    ByPriority,
    ByDeadlineAndPriority,
}

/// The sort toggles encoded by a [`SortOrder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortFacets {
    pub by_deadline: bool,
    pub by_priority: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sort order: {0}")]
pub struct ParseSortOrderError(pub String);

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::None,
        SortOrder::ByDeadline,
        SortOrder::ByPriority,
        SortOrder::ByDeadlineAndPriority,
    ];

    pub fn facets(self) -> SortFacets {
        let (by_deadline, by_priority) = match self {
            SortOrder::None => (false, false),
            SortOrder::ByDeadline => (true, false),
            SortOrder::ByPriority => (false, true),
            SortOrder::ByDeadlineAndPriority => (true, true),
        };
        SortFacets {
            by_deadline,
            by_priority,
        }
    }

    pub fn from_facets(facets: SortFacets) -> Self {
        match (facets.by_deadline, facets.by_priority) {
            (false, false) => SortOrder::None,
            (true, false) => SortOrder::ByDeadline,
            (false, true) => SortOrder::ByPriority,
            (true, true) => SortOrder::ByDeadlineAndPriority,
        }
    }

    /// Same order with the deadline facet set to `enable`
    pub fn with_deadline(self, enable: bool) -> Self {
        Self::from_facets(SortFacets {
            by_deadline: enable,
            ..self.facets()
        })
    }

    /// Same order with the priority facet set to `enable`
    pub fn with_priority(self, enable: bool) -> Self {
        Self::from_facets(SortFacets {
            by_priority: enable,
            ..self.facets()
        })
    }

    /// Symbolic name used in storage
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::None => "NONE",
            SortOrder::ByDeadline => "BY_DEADLINE",
            SortOrder::ByPriority => "BY_PRIORITY",
            SortOrder::ByDeadlineAndPriority => "BY_DEADLINE_AND_PRIORITY",
        }
    }

    /// Decode a stored name, falling back to [`SortOrder::None`] for missing
    /// or unrecognized input
    pub fn from_name_lossy(name: Option<&str>) -> Self {
        name.and_then(|name| name.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| ParseSortOrderError(s.to_string()))
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Any stored `sort_order` value: a name, or something that is not a string
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSortOrder {
    Name(String),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match StoredSortOrder::deserialize(deserializer)? {
            StoredSortOrder::Name(name) => SortOrder::from_name_lossy(Some(&name)),
            StoredSortOrder::Other(_) => SortOrder::None,
        })
    }
}

/// The user's task-list preferences
///
/// A value type: every change produces a new instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub show_completed: bool,
    pub sort_order: SortOrder,
}

impl UserPreferences {
    pub fn new(show_completed: bool, sort_order: SortOrder) -> Self {
        Self {
            show_completed,
            sort_order,
        }
    }

    pub fn with_show_completed(self, show_completed: bool) -> Self {
        Self {
            show_completed,
            ..self
        }
    }

    pub fn with_sort_by_deadline(self, enable: bool) -> Self {
        Self {
            sort_order: self.sort_order.with_deadline(enable),
            ..self
        }
    }

    pub fn with_sort_by_priority(self, enable: bool) -> Self {
        Self {
            sort_order: self.sort_order.with_priority(enable),
            ..self
        }
    }
}

use indexmap::IndexMap;

use super::work_item::{State, WorkItem};

pub const NO_FEATURE_TITLE: &str = "No Feature";

/// Parent grouping item. Two features are the same bucket only when id, title
/// and state all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Feature {
    pub id: Option<u32>,
    pub title: String,
    pub state: State,
}

impl Feature {
    /// Bucket for stories whose parent could not be resolved.
    pub fn none() -> Self {
        Self {
            id: None,
            title: NO_FEATURE_TITLE.to_string(),
            state: State::Unknown,
        }
    }

    pub fn is_none(&self) -> bool {
        self.id.is_none()
    }
}

/// Stories bucketed by feature. Buckets and the stories inside them keep the
/// order in which they were first pushed.
#[derive(Debug, Default)]
pub struct Grouping {
    buckets: IndexMap<Feature, Vec<WorkItem>>,
}

impl Grouping {
    pub fn push(&mut self, feature: Feature, item: WorkItem) {
        self.buckets.entry(feature).or_default().push(item);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Feature, &[WorkItem])> {
        self.buckets
            .iter()
            .map(|(feature, items)| (feature, items.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn story_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

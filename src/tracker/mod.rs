pub mod azure;

#[cfg(test)]
pub mod canned;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::model::feature::Feature;
use crate::model::work_item::{State, WorkItem};

pub const PARENT_LINK: &str = "System.LinkTypes.Hierarchy-Reverse";

/// Read side of a work item tracker.
///
/// Implementations log and swallow non-200 responses, returning an empty
/// result instead. Only transport and decoding failures are errors.
#[async_trait]
pub trait Tracker: Send + Sync {
    fn name(&self) -> &str;
    /// Id of the team's current iteration, `None` when there is none.
    async fn current_iteration(&self) -> Result<Option<String>>;
    /// Target ids of the iteration's backlog references, first occurrence order.
    async fn iteration_work_item_ids(&self, iteration_id: &str) -> Result<Vec<u32>>;
    async fn work_item_type(&self, id: u32) -> Result<Option<String>>;
    /// Batch fetch. With `expand_relations` the items carry their link list.
    async fn work_items(&self, ids: &[u32], expand_relations: bool) -> Result<Vec<ApiWorkItem>>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiWorkItem {
    pub id: u32,
    #[serde(default)]
    pub fields: ApiFields,
    #[serde(default)]
    pub relations: Option<Vec<ApiRelation>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiFields {
    #[serde(rename = "System.Title")]
    pub title: Option<String>,
    #[serde(rename = "System.State")]
    pub state: Option<String>,
    #[serde(rename = "System.WorkItemType")]
    pub work_item_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRelation {
    pub rel: String,
    pub url: String,
}

impl ApiWorkItem {
    /// Parent id taken from the last segment of the reverse hierarchy link.
    /// When several such links exist the last one wins.
    pub fn parent_id(&self) -> Option<u32> {
        self.relations
            .iter()
            .flatten()
            .filter(|rel| rel.rel == PARENT_LINK)
            .filter_map(|rel| rel.url.rsplit('/').next()?.parse().ok())
            .last()
    }

    pub fn to_work_item(&self) -> WorkItem {
        WorkItem {
            id: self.id,
            title: self
                .fields
                .title
                .clone()
                .unwrap_or_else(|| "No Title".to_string()),
            state: self.state(),
            parent_id: self.parent_id(),
        }
    }

    pub fn to_feature(&self) -> Feature {
        Feature {
            id: Some(self.id),
            title: self
                .fields
                .title
                .clone()
                .unwrap_or_else(|| "Untitled Feature".to_string()),
            state: self.state(),
        }
    }

    fn state(&self) -> State {
        self.fields
            .state
            .as_deref()
            .map(State::parse)
            .unwrap_or(State::Unknown)
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use super::{ApiFields, ApiRelation, ApiWorkItem, Tracker, PARENT_LINK};

/// In-memory tracker serving fixed responses. `unavailable()` mimics a server
/// answering every call with a non-200 status.
#[derive(Default)]
pub struct CannedTracker {
    iteration: Option<String>,
    backlog: Vec<u32>,
    items: HashMap<u32, (String, ApiWorkItem)>,
    pub type_checks: Arc<Mutex<Vec<u32>>>,
}

impl CannedTracker {
    pub fn new(iteration: &str) -> Self {
        Self {
            iteration: Some(iteration.to_string()),
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Add an item to the backlog and to the item store.
    pub fn with_backlog_item(mut self, kind: &str, item: ApiWorkItem) -> Self {
        self.backlog.push(item.id);
        self.items.insert(item.id, (kind.to_string(), item));
        self
    }

    /// Add an item that is only reachable by id (a parent feature).
    pub fn with_item(mut self, kind: &str, item: ApiWorkItem) -> Self {
        self.items.insert(item.id, (kind.to_string(), item));
        self
    }
}

pub fn api_item(id: u32, title: &str, state: &str, parent: Option<u32>) -> ApiWorkItem {
    ApiWorkItem {
        id,
        fields: ApiFields {
            title: Some(title.to_string()),
            state: Some(state.to_string()),
            work_item_type: None,
        },
        relations: parent.map(|p| {
            vec![ApiRelation {
                rel: PARENT_LINK.to_string(),
                url: format!("https://tfs.example.com/_apis/wit/workItems/{p}"),
            }]
        }),
    }
}

#[async_trait]
impl Tracker for CannedTracker {
    fn name(&self) -> &str {
        "Canned"
    }

    async fn current_iteration(&self) -> Result<Option<String>> {
        Ok(self.iteration.clone())
    }

    async fn iteration_work_item_ids(&self, _iteration_id: &str) -> Result<Vec<u32>> {
        Ok(self.backlog.clone())
    }

    async fn work_item_type(&self, id: u32) -> Result<Option<String>> {
        self.type_checks.lock().unwrap().push(id);
        Ok(self.items.get(&id).map(|(kind, _)| kind.clone()))
    }

    async fn work_items(&self, ids: &[u32], expand_relations: bool) -> Result<Vec<ApiWorkItem>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.items.get(id))
            .map(|(_, item)| {
                let mut item = item.clone();
                if !expand_relations {
                    item.relations = None;
                }
                item
            })
            .collect())
    }
}

use std::collections::HashMap;

use anyhow::Result;
use tracing::{info, warn};

use crate::model::feature::{Feature, Grouping};
use crate::model::work_item::WorkItem;
use crate::tracker::Tracker;

pub const USER_STORY: &str = "User Story";

/// Stories of the current iteration plus the parent features they point at.
#[derive(Debug, Default)]
pub struct Backlog {
    pub stories: Vec<WorkItem>,
    pub features: HashMap<u32, Feature>,
}

/// Fetch the current iteration's user stories and their parent features.
///
/// Any call the tracker answers with nothing (no iteration, failed request)
/// shrinks the result instead of failing the run.
pub async fn collect_backlog(tracker: &dyn Tracker) -> Result<Backlog> {
    let Some(iteration) = tracker.current_iteration().await? else {
        warn!(tracker = tracker.name(), "No current iteration found");
        return Ok(Backlog::default());
    };
    info!(iteration = %iteration, "Using current iteration");

    let candidates = tracker.iteration_work_item_ids(&iteration).await?;

    // One request per candidate; the tracker has no batched type filter here.
    let mut story_ids = Vec::new();
    for id in candidates {
        if tracker.work_item_type(id).await?.as_deref() == Some(USER_STORY) {
            story_ids.push(id);
        }
    }
    info!(count = story_ids.len(), "User stories in iteration");

    let stories: Vec<WorkItem> = tracker
        .work_items(&story_ids, true)
        .await?
        .iter()
        .map(|item| item.to_work_item())
        .collect();

    let parent_ids = parent_ids(&stories);
    let features = tracker
        .work_items(&parent_ids, false)
        .await?
        .iter()
        .map(|item| (item.id, item.to_feature()))
        .collect::<HashMap<_, _>>();
    info!(count = features.len(), "Parent features resolved");

    Ok(Backlog { stories, features })
}

fn parent_ids(stories: &[WorkItem]) -> Vec<u32> {
    let mut ids = Vec::new();
    for id in stories.iter().filter_map(|s| s.parent_id) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Bucket every story under its parent feature, or under the "No Feature"
/// sentinel when the parent is missing or was not returned.
pub fn group_by_feature(backlog: &Backlog) -> Grouping {
    let mut grouping = Grouping::default();
    for story in &backlog.stories {
        let feature = story
            .parent_id
            .and_then(|id| backlog.features.get(&id))
            .cloned()
            .unwrap_or_else(Feature::none);
        grouping.push(feature, story.clone());
    }
    grouping
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{ApiWorkItem, Tracker};
use crate::config::ReviewConfig;

const WORK_API_VERSION: &str = "7.0";
const ITEM_API_VERSION: &str = "6.0";

/// Azure DevOps / TFS work item tracking API.
pub struct AzureDevOps {
    base_url: String,
    project: String,
    team: String,
    auth_header: String,
    client: reqwest::Client,
}

impl AzureDevOps {
    pub fn new(config: &ReviewConfig) -> Result<Self> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(format!(":{}", config.pat));
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project: urlencoding::encode(&config.project).into_owned(),
            team: urlencoding::encode(&config.team).into_owned(),
            auth_header: format!("Basic {encoded}"),
            client,
        })
    }

    fn team_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/_apis/work/teamsettings/{path}",
            self.base_url, self.project, self.team
        )
    }

    /// GET and decode. A non-200 status is logged and yields `None`.
    async fn get<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<Option<T>> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .send()
            .await
            .with_context(|| format!("Azure DevOps request for {what} failed"))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = status.as_u16(), "Failed to fetch {what}");
            return Ok(None);
        }

        let body = resp
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse {what} response"))?;
        Ok(Some(body))
    }
}

#[derive(Deserialize)]
struct IterationList {
    #[serde(default)]
    value: Vec<Iteration>,
}

#[derive(Deserialize)]
struct Iteration {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IterationWorkItems {
    #[serde(default)]
    work_item_relations: Vec<WorkItemLink>,
}

#[derive(Deserialize)]
struct WorkItemLink {
    target: Option<WorkItemRef>,
}

#[derive(Deserialize)]
struct WorkItemRef {
    id: u32,
}

#[derive(Deserialize)]
struct WorkItemBatch {
    #[serde(default)]
    value: Vec<ApiWorkItem>,
}

#[async_trait]
impl Tracker for AzureDevOps {
    fn name(&self) -> &str {
        "Azure DevOps"
    }

    async fn current_iteration(&self) -> Result<Option<String>> {
        let url = format!(
            "{}?$timeframe=current&api-version={WORK_API_VERSION}",
            self.team_url("iterations")
        );
        let list: Option<IterationList> = self.get(&url, "current iteration").await?;
        Ok(list.and_then(|l| l.value.into_iter().next()).map(|it| it.id))
    }

    async fn iteration_work_item_ids(&self, iteration_id: &str) -> Result<Vec<u32>> {
        let url = format!(
            "{}?api-version={WORK_API_VERSION}",
            self.team_url(&format!("iterations/{iteration_id}/workitems"))
        );
        let Some(backlog) = self.get::<IterationWorkItems>(&url, "iteration work items").await? else {
            return Ok(Vec::new());
        };

        let mut ids: Vec<u32> = Vec::new();
        for id in backlog
            .work_item_relations
            .into_iter()
            .filter_map(|link| link.target.map(|t| t.id))
        {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    async fn work_item_type(&self, id: u32) -> Result<Option<String>> {
        let url = format!(
            "{}/_apis/wit/workItems/{id}?api-version={ITEM_API_VERSION}",
            self.base_url
        );
        let item: Option<ApiWorkItem> = self.get(&url, &format!("work item {id}")).await?;
        Ok(item.and_then(|i| i.fields.work_item_type))
    }

    async fn work_items(&self, ids: &[u32], expand_relations: bool) -> Result<Vec<ApiWorkItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids_str = ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let expand = if expand_relations { "&$expand=relations" } else { "" };
        let url = format!(
            "{}/_apis/wit/workitems?ids={ids_str}{expand}&api-version={WORK_API_VERSION}",
            self.base_url
        );
        let batch: Option<WorkItemBatch> = self.get(&url, "work item details").await?;
        Ok(batch.map(|b| b.value).unwrap_or_default())
    }
}

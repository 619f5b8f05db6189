//! GitHub REST client.
//!
//! Blocking, one request at a time, no retries. Every unexpected status is
//! returned as [`TrackerError::Status`]; the only status handled locally is the
//! 404 from a label lookup, which means "create it".

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::TrackerError;
use crate::tracker::{index_issues, Tracker};
use crate::types::{ApiToken, IssueDraft, IssueIndex, Label, RemoteIssue, RepoSlug};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 1000;

const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("tasksync/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without a trailing slash.
    pub api_url: String,
    pub repo: RepoSlug,
    pub token: ApiToken,
    pub page_size: u32,
    /// Upper bound on listing requests, the terminating empty page included.
    pub max_pages: u32,
}

impl ClientConfig {
    pub fn new(repo: RepoSlug, token: ApiToken) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            repo,
            token,
            page_size: PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// [`Tracker`] over the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
        Self { agent, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}{path}", self.config.api_url, self.config.repo)
    }

    fn send(
        &self,
        method: &str,
        url: &str,
        payload: Option<&Value>,
    ) -> Result<ureq::Response, TrackerError> {
        tracing::debug!("{method} {url}");
        let request = self
            .agent
            .request(method, url)
            .set("Authorization", &format!("Bearer {}", self.config.token.expose()))
            .set("Accept", ACCEPT);
        let result = match payload {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        result.map_err(|err| match err {
            ureq::Error::Status(status, response) => TrackerError::Status {
                method: method.to_owned(),
                url: url.to_owned(),
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => TrackerError::Transport {
                url: url.to_owned(),
                source: Box::new(transport),
            },
        })
    }

    fn send_decode<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &str,
        payload: Option<&Value>,
    ) -> Result<T, TrackerError> {
        self.send(method, url, payload)?
            .into_json::<T>()
            .map_err(|source| TrackerError::Decode {
                url: url.to_owned(),
                source,
            })
    }
}

impl Tracker for GitHubClient {
    fn ensure_label(&self, label: &Label) -> Result<(), TrackerError> {
        let lookup = self.repo_url(&format!("/labels/{}", label.name));
        match self.send("GET", &lookup, None) {
            Ok(_) => {
                tracing::debug!("label '{}' exists", label.name);
                return Ok(());
            }
            Err(TrackerError::Status { status: 404, .. }) => {}
            Err(err) => return Err(err),
        }

        let payload = json!({ "name": label.name, "color": label.color });
        self.send("POST", &self.repo_url("/labels"), Some(&payload))?;
        tracing::info!("created label '{}' ({})", label.name, label.color);
        Ok(())
    }

    fn list_issues(&self) -> Result<IssueIndex, TrackerError> {
        let mut issues = Vec::new();
        for page in 1..=self.config.max_pages {
            let url = self.repo_url(&format!(
                "/issues?state=all&per_page={}&page={page}",
                self.config.page_size
            ));
            let batch: Vec<RemoteIssue> = self.send_decode("GET", &url, None)?;
            if batch.is_empty() {
                let index = index_issues(issues);
                tracing::debug!("listed {page} page(s), {} task issue(s)", index.len());
                return Ok(index);
            }
            tracing::debug!("page {page}: {} entries", batch.len());
            issues.extend(batch);
        }
        Err(TrackerError::PageLimit {
            max_pages: self.config.max_pages,
        })
    }

    fn create_issue(&self, draft: &IssueDraft) -> Result<RemoteIssue, TrackerError> {
        self.provision_labels(&draft.labels)?;
        let payload = json!({
            "title": draft.title,
            "body": draft.body,
            "labels": draft.label_names(),
        });
        let issue: RemoteIssue = self.send_decode("POST", &self.repo_url("/issues"), Some(&payload))?;
        tracing::info!("created issue #{} {}", issue.number, issue.title);
        Ok(issue)
    }

    fn update_issue(
        &self,
        issue: &RemoteIssue,
        draft: &IssueDraft,
    ) -> Result<RemoteIssue, TrackerError> {
        self.provision_labels(&draft.labels)?;
        let payload = json!({
            "title": draft.title,
            "body": draft.body,
            "state": draft.state,
            "labels": draft.label_names(),
        });
        let url = self.repo_url(&format!("/issues/{}", issue.number));
        let updated: RemoteIssue = self.send_decode("PATCH", &url, Some(&payload))?;
        tracing::info!(
            "updated issue #{} {} ({})",
            updated.number,
            updated.title,
            draft.state
        );
        Ok(updated)
    }
}

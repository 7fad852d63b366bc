use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;

use crate::domain::issue::ResolvedIssue;
use crate::error::{AppError, AppResult};
use crate::services::VulnerabilityScannerService;

pub struct SnykClient {
    http: Client,
    api_url: String,
    token: Option<String>,
    org_id: Option<String>,
}

impl SnykClient {
    pub fn new(api_url: String, token: Option<String>, org_id: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_url,
            token,
            org_id,
        }
    }

    fn api_details(&self) -> AppResult<(&str, &str)> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Snyk API token not configured".to_string()))?;
        let org_id = self
            .org_id
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Snyk org id not configured".to_string()))?;
        Ok((token, org_id))
    }

    fn issues_endpoint(api_url: &str, org_id: &str) -> String {
        format!("{}/org/{}/issues", api_url.trim_end_matches('/'), org_id)
    }
}

#[async_trait]
impl VulnerabilityScannerService for SnykClient {
    async fn fetch_resolved_issues(&self) -> AppResult<Vec<ResolvedIssue>> {
        let (token, org_id) = self.api_details()?;

        let response = self
            .http
            .get(Self::issues_endpoint(&self.api_url, org_id))
            .query(&[("state", "fixed"), ("includeFixed", "true")])
            .header(AUTHORIZATION, format!("token {token}"))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Scanner(format!("failed to call Snyk: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Scanner(format!(
                "Snyk responded with {status}: {body}"
            )));
        }

        let payload: SnykIssuesResponse = response
            .json()
            .await
            .map_err(|err| AppError::Scanner(format!("failed to parse Snyk response: {err}")))?;

        Ok(payload
            .issues
            .unwrap_or_default()
            .into_iter()
            .map(|issue| ResolvedIssue::new(issue.id, issue.jira_issue_key))
            .collect())
    }
}

#[derive(Deserialize)]
struct SnykIssuesResponse {
    issues: Option<Vec<SnykIssue>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnykIssue {
    id: String,
    #[serde(default)]
    jira_issue_key: Option<String>,
}

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, Response,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};

use crate::domain::transition::Transition;
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    base_url: Option<String>,
    email: Option<String>,
    token: Option<String>,
}

impl JiraClient {
    pub fn new(base_url: Option<String>, email: Option<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            email,
            token,
        }
    }

    fn api_details(&self) -> AppResult<(&str, &str, &str)> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira base URL not configured".to_string()))?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira email not configured".to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira API token not configured".to_string()))?;
        Ok((base_url, email, token))
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn transitions_endpoint(base_url: &str, ticket_key: &str) -> String {
        format!(
            "{}/rest/api/3/issue/{}/transitions",
            base_url.trim_end_matches('/'),
            ticket_key
        )
    }

    async fn ensure_success(response: Response, action: &str) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        Err(AppError::IssueTracker(format!(
            "Jira responded with {status} while {action}: {body}"
        )))
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn list_transitions(&self, ticket_key: &str) -> AppResult<Vec<Transition>> {
        let (base_url, email, token) = self.api_details()?;

        let response = self
            .http
            .get(Self::transitions_endpoint(base_url, ticket_key))
            .header(AUTHORIZATION, Self::auth_header(email, token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;
        let response = Self::ensure_success(response, "listing transitions").await?;

        let payload: JiraTransitionsResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira transitions: {err}"))
        })?;

        Ok(payload
            .transitions
            .into_iter()
            .map(|transition| Transition {
                id: transition.id,
                name: transition.name,
            })
            .collect())
    }

    async fn apply_transition(&self, ticket_key: &str, transition_id: &str) -> AppResult<()> {
        let (base_url, email, token) = self.api_details()?;
        let request_body = JiraTransitionRequest::new(transition_id);

        let response = self
            .http
            .post(Self::transitions_endpoint(base_url, ticket_key))
            .header(AUTHORIZATION, Self::auth_header(email, token))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;
        Self::ensure_success(response, "applying transition").await?;

        Ok(())
    }
}

#[derive(Serialize)]
struct JiraTransitionRequest {
    transition: JiraTransitionRef,
}

impl JiraTransitionRequest {
    fn new(transition_id: &str) -> Self {
        Self {
            transition: JiraTransitionRef {
                id: transition_id.to_string(),
            },
        }
    }
}

#[derive(Serialize)]
struct JiraTransitionRef {
    id: String,
}

#[derive(Deserialize)]
struct JiraTransitionsResponse {
    #[serde(default)]
    transitions: Vec<JiraTransition>,
}

#[derive(Deserialize)]
struct JiraTransition {
    id: String,
    name: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> JiraClient {
        JiraClient::new(
            Some(format!("{}/", server.uri())),
            Some("bot@example.com".to_string()),
            Some("jira-token".to_string()),
        )
    }

    #[test]
    fn builds_basic_auth_header() {
        assert_eq!(
            JiraClient::auth_header("bot@example.com", "jira-token"),
            format!("Basic {}", BASE64_STANDARD.encode("bot@example.com:jira-token"))
        );
    }

    #[tokio::test]
    async fn lists_transitions_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/PROJ-1/transitions"))
            .and(header(
                "authorization",
                JiraClient::auth_header("bot@example.com", "jira-token").as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "expand": "transitions",
                "transitions": [
                    {"id": "11", "name": "In Progress", "to": {"name": "In Progress"}},
                    {"id": "31", "name": "Done"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transitions = client_for(&server).list_transitions("PROJ-1").await.unwrap();
        assert_eq!(
            transitions,
            vec![
                Transition {
                    id: "11".to_string(),
                    name: "In Progress".to_string()
                },
                Transition {
                    id: "31".to_string(),
                    name: "Done".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn posts_selected_transition_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue/PROJ-1/transitions"))
            .and(body_json(json!({"transition": {"id": "31"}})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .apply_transition("PROJ-1", "31")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn surfaces_error_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/GONE-9/transitions"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Issue does not exist"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_transitions("GONE-9")
            .await
            .unwrap_err();
        match err {
            AppError::IssueTracker(message) => {
                assert!(message.contains("404"));
                assert!(message.contains("Issue does not exist"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_credentials_is_configuration_error() {
        let client = JiraClient::new(Some("http://localhost".to_string()), None, None);
        assert!(matches!(
            client.list_transitions("PROJ-1").await,
            Err(AppError::Configuration(_))
        ));
    }
}

//! Analysis backend client
//!
//! Three JSON endpoints: the recent reports list, a single report, and the
//! analysis trigger. Requests are issued one at a time from a single-threaded
//! runtime, so the trait does not require `Send` futures.

use crate::model::{RecentReport, Report};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Body of `POST /api/analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub repo_path: String,
    pub timeframe: String,
}

/// Response of `POST /api/analyze`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyzeResponse {
    #[serde(deserialize_with = "crate::model::null_default")]
    pub success: bool,
    #[serde(deserialize_with = "crate::model::null_default")]
    pub commit_count: u64,
    pub report_id: Option<String>,
    pub error: Option<String>,
    /// Server-side traceback for failed analyses
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Completed {
        report_id: Option<String>,
        commit_count: u64,
    },
    /// Succeeded, but the timeframe contained no commits
    NoCommits,
    Failed {
        error: String,
        details: Option<String>,
    },
}

impl AnalyzeResponse {
    pub fn outcome(&self) -> AnalysisOutcome {
        if !self.success {
            return AnalysisOutcome::Failed {
                error: self
                    .error
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
                details: self.details.clone(),
            };
        }
        if self.commit_count == 0 {
            return AnalysisOutcome::NoCommits;
        }
        AnalysisOutcome::Completed {
            report_id: self.report_id.clone().filter(|id| !id.is_empty()),
            commit_count: self.commit_count,
        }
    }
}

#[async_trait(?Send)]
pub trait ReportApi {
    async fn list_recent(&self) -> Result<Vec<RecentReport>, ApiError>;

    async fn get(&self, report_id: &str) -> Result<Report, ApiError>;

    async fn run_analysis(
        &self,
        repo_path: &str,
        timeframe: &str,
    ) -> Result<AnalyzeResponse, ApiError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `ReportApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpReportApi {
    base_url: Url,
    client: Client,
}

impl HttpReportApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpReportApi { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[async_trait(?Send)]
impl ReportApi for HttpReportApi {
    async fn list_recent(&self) -> Result<Vec<RecentReport>, ApiError> {
        let url = self.endpoint(&["api", "reports", "recent"]);
        tracing::debug!(%url, "fetching recent reports");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn get(&self, report_id: &str) -> Result<Report, ApiError> {
        let url = self.endpoint(&["api", "reports", report_id]);
        tracing::debug!(%url, "fetching report");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn run_analysis(
        &self,
        repo_path: &str,
        timeframe: &str,
    ) -> Result<AnalyzeResponse, ApiError> {
        let url = self.endpoint(&["api", "analyze"]);
        let request = AnalyzeRequest {
            repo_path: repo_path.to_string(),
            timeframe: timeframe.to_string(),
        };
        tracing::debug!(%url, repo = repo_path, timeframe, "requesting analysis");
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> AnalyzeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_outcome_completed() {
        let r = response(r#"{"success": true, "commit_count": 12, "report_id": "report_1", "summary": "ok"}"#);
        assert_eq!(
            r.outcome(),
            AnalysisOutcome::Completed {
                report_id: Some("report_1".to_string()),
                commit_count: 12
            }
        );
    }

    #[test]
    fn test_outcome_no_commits() {
        let r = response(r#"{"success": true, "commit_count": 0, "report_id": "report_1"}"#);
        assert_eq!(r.outcome(), AnalysisOutcome::NoCommits);
    }

    #[test]
    fn test_outcome_failed_keeps_details() {
        let r = response(
            r#"{"success": false, "error": "bad path", "details": "Traceback (most recent call last)"}"#,
        );
        assert_eq!(
            r.outcome(),
            AnalysisOutcome::Failed {
                error: "bad path".to_string(),
                details: Some("Traceback (most recent call last)".to_string()),
            }
        );

        let r = response(r#"{"success": false}"#);
        assert!(matches!(r.outcome(), AnalysisOutcome::Failed { error, .. } if error == "Unknown error"));
    }

    #[test]
    fn test_request_body_is_camel_case() {
        let body = serde_json::to_value(AnalyzeRequest {
            repo_path: "/tmp/repo".to_string(),
            timeframe: "month".to_string(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"repoPath": "/tmp/repo", "timeframe": "month"})
        );
    }

    #[test]
    fn test_endpoint_encodes_report_id() {
        let api = HttpReportApi::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            api.endpoint(&["api", "reports", "report_20240115_103000"]).as_str(),
            "http://localhost:5000/api/reports/report_20240115_103000"
        );
        assert_eq!(
            api.endpoint(&["api", "reports", "a/b c"]).as_str(),
            "http://localhost:5000/api/reports/a%2Fb%20c"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = HttpReportApi::new("http://example.com/backend", Duration::from_secs(1)).unwrap();
        assert_eq!(
            api.endpoint(&["api", "analyze"]).as_str(),
            "http://example.com/backend/api/analyze"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpReportApi::new("not a url", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpReportApi::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_status_error_uses_server_message() {
        let err = status_error(StatusCode::NOT_FOUND, r#"{"error": "Report not found"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 404,
                message: "Report not found".to_string()
            }
        );
        assert_eq!(err.to_string(), "server returned 404: Report not found");

        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "Internal Server Error".to_string()
            }
        );
    }
}

/*
[INPUT]:  Task id, or the report URL of a finished task
[OUTPUT]: Report generation status, report bytes
[POS]:    HTTP layer - report status and download endpoints
[UPDATE]: When report status contract changes
*/

use crate::http::client::{error_detail, status_text};
use crate::http::{DrawTestClient, DrawTestError, Result};
use crate::types::ReportStatusResponse;
use reqwest::{Method, StatusCode, Url};

impl DrawTestClient {
    /// Poll report generation status
    ///
    /// GET /report/{task_id}
    pub async fn poll_status(&self, task_id: &str) -> Result<ReportStatusResponse> {
        let response = self
            .request(Method::GET, &["report", task_id])
            .send()
            .await
            .map_err(|err| DrawTestError::StatusCheck(format!("Status check failed: {err}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DrawTestError::NotFound("Report not found".to_string()));
        }
        if !status.is_success() {
            let detail = error_detail(response).await;
            return Err(DrawTestError::StatusCheck(format!(
                "Status check failed: {}{}",
                status_text(status),
                detail
            )));
        }

        let report: ReportStatusResponse = response
            .json()
            .await
            .map_err(|err| DrawTestError::StatusCheck(format!("Status check failed: {err}")))?;

        tracing::debug!(task_id, status = ?report.status, "report status");
        Ok(report)
    }

    /// Download a finished report from the URL the status check returned
    pub async fn fetch_report(&self, report_url: &str) -> Result<Vec<u8>> {
        let url = self.resolve_report_url(report_url)?;

        let response = self
            .get_absolute(url)
            .send()
            .await
            .map_err(|err| DrawTestError::Download(format!("Download failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DrawTestError::Download(format!(
                "Download failed: {}",
                status_text(status)
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| DrawTestError::Download(format!("Download failed: {err}")))?;
        Ok(bytes.to_vec())
    }

    /// Absolute URLs are used as-is, relative ones resolve against the base URL
    fn resolve_report_url(&self, report_url: &str) -> Result<Url> {
        self.base_url()
            .join(report_url)
            .map_err(|err| DrawTestError::Download(format!("Download failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, DrawTestClient, DrawTestError, ErrorKind};
    use crate::types::RemoteReportStatus;
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DrawTestClient {
        DrawTestClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
    }

    #[rstest]
    #[case(json!({ "status": "processing" }), RemoteReportStatus::Processing, None)]
    #[case(
        json!({ "status": "completed", "report_url": "https://files.example/r.pdf" }),
        RemoteReportStatus::Completed,
        Some("https://files.example/r.pdf")
    )]
    #[case(json!({ "status": "error" }), RemoteReportStatus::Error, None)]
    #[tokio::test]
    async fn test_poll_status(
        #[case] body: serde_json::Value,
        #[case] expected_status: RemoteReportStatus,
        #[case] expected_url: Option<&str>,
    ) {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/report/task-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let report = client_for(&server)
            .poll_status("task-1")
            .await
            .expect("poll_status failed");

        assert_eq!(report.status, expected_status);
        assert_eq!(report.report_url.as_deref(), expected_url);
    }

    #[tokio::test]
    async fn test_poll_status_unknown_task() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/report/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "nope" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .poll_status("missing")
            .await
            .expect_err("should fail");

        assert_eq!(err, DrawTestError::NotFound("Report not found".into()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_poll_status_server_error() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/report/task-1"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .poll_status("task-1")
            .await
            .expect_err("should fail");

        assert_eq!(
            err,
            DrawTestError::StatusCheck("Status check failed: Bad Gateway".into())
        );
    }

    #[tokio::test]
    async fn test_poll_status_unknown_status_value() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/report/task-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "queued" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .poll_status("task-1")
            .await
            .expect_err("should fail");

        assert_eq!(err.kind(), ErrorKind::StatusCheck);
    }

    #[tokio::test]
    async fn test_fetch_report_relative_url() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/files/report.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let bytes = client_for(&server)
            .fetch_report("/files/report.pdf")
            .await
            .expect("fetch_report failed");

        assert_eq!(bytes, b"%PDF-1.7".to_vec());
    }

    #[tokio::test]
    async fn test_fetch_report_missing_file() {
        let server = MockServer::start().await;
        let url = format!("{}/files/gone.pdf", server.uri());

        let err = client_for(&server)
            .fetch_report(&url)
            .await
            .expect_err("should fail");

        assert_eq!(err, DrawTestError::Download("Download failed: Not Found".into()));
    }
}

/*
[INPUT]:  Drawings selected for the three categories
[OUTPUT]: Created task id or UploadError
[POS]:    HTTP layer - task creation endpoint
[UPDATE]: When the upload contract or its messages change
*/

use crate::http::client::{error_detail, status_text};
use crate::http::{DrawTestClient, DrawTestError, Result};
use crate::types::{CreatedTask, ImageFile, UploadResponse};
use reqwest::Method;
use reqwest::multipart::{Form, Part};

impl DrawTestClient {
    /// Create a remote task from the drawings
    ///
    /// POST /upload (multipart, one `files` part per image)
    pub async fn create_task(&self, images: &[ImageFile]) -> Result<CreatedTask> {
        let mut form = Form::new();
        for image in images {
            let part = Part::bytes(image.data.to_vec())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)
                .map_err(|err| DrawTestError::Upload(format!("Upload failed: {err}")))?;
            form = form.part("files", part);
        }

        tracing::debug!(parts = images.len(), "uploading drawings");

        let response = self
            .request(Method::POST, &["upload"])
            .multipart(form)
            .send()
            .await
            .map_err(|err| DrawTestError::Upload(format!("Upload failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            return Err(DrawTestError::Upload(format!(
                "Upload failed: {}{}",
                status_text(status),
                detail
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|err| DrawTestError::Upload(format!("Upload failed: {err}")))?;

        match body.task_id {
            Some(task_id) if !task_id.is_empty() => {
                tracing::info!(task_id = %task_id, "task created");
                Ok(CreatedTask { task_id })
            }
            _ => Err(DrawTestError::Upload(
                "No task_id received from server".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, DrawTestClient, DrawTestError};
    use crate::types::ImageFile;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn drawings() -> Vec<ImageFile> {
        vec![
            ImageFile::new("house.png", vec![0x89u8, 0x50, 0x4e, 0x47]),
            ImageFile::new("animal.jpg", vec![0xffu8, 0xd8, 0xff]),
            ImageFile::new("portrait.pdf", b"%PDF-1.4".to_vec()),
        ]
    }

    fn client_for(server: &MockServer) -> DrawTestClient {
        DrawTestClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
    }

    #[tokio::test]
    async fn test_create_task_returns_task_id() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "task_id": "task-42" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let created = client_for(&server)
            .create_task(&drawings())
            .await
            .expect("create_task failed");

        assert_eq!(created.task_id, "task-42");
    }

    #[tokio::test]
    async fn test_create_task_sends_three_file_parts() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "task_id": "t" })),
            )
            .mount(&server)
            .await;

        client_for(&server)
            .create_task(&drawings())
            .await
            .expect("create_task failed");

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));

        let body = String::from_utf8_lossy(&requests[0].body);
        assert_eq!(body.matches("name=\"files\"").count(), 3);
        assert!(body.contains("filename=\"house.png\""));
        assert!(body.contains("filename=\"portrait.pdf\""));
        assert!(body.contains("Content-Type: application/pdf"));
    }

    #[tokio::test]
    async fn test_create_task_failure_includes_detail() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({ "detail": "disk full" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_task(&drawings())
            .await
            .expect_err("should fail");

        assert_eq!(
            err,
            DrawTestError::Upload("Upload failed: Internal Server Error - \"disk full\"".into())
        );
    }

    #[tokio::test]
    async fn test_create_task_unparsable_error_body() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_task(&drawings())
            .await
            .expect_err("should fail");

        assert_eq!(err.message(), "Upload failed: Internal Server Error");
    }

    #[tokio::test]
    async fn test_create_task_missing_task_id() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_task(&drawings())
            .await
            .expect_err("should fail");

        assert_eq!(
            err,
            DrawTestError::Upload("No task_id received from server".into())
        );
    }

    #[tokio::test]
    async fn test_create_task_empty_task_id() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "task_id": "" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_task(&drawings())
            .await
            .expect_err("should fail");

        assert_eq!(err.message(), "No task_id received from server");
    }
}

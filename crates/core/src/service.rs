use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    config::ServiceConfig,
    error::{Result, UploadError},
    submission::Submission,
    types::{AnalysisResult, HealthStatus},
};

/// The remote side of an upload: takes one submission, answers once.
#[allow(async_fn_in_trait)]
pub trait AnalysisService {
    async fn analyze(&self, submission: Submission) -> Result<AnalysisResult>;
}

#[derive(Clone, Debug)]
pub struct HttpAnalysisService {
    client: Client,
    config: ServiceConfig,
}

#[derive(Deserialize)]
struct FailureBody {
    detail: Option<serde_json::Value>,
}

impl HttpAnalysisService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.config.health_url()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(UploadError::ApplicationFailure {
                status: status.as_u16(),
                detail: failure_detail(status, &body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, submission: Submission) -> Result<AnalysisResult> {
        let url = self.config.analyze_url();
        info!(
            file = %submission.file.name,
            size = submission.file.size,
            podcaster = submission.podcaster.as_str(),
            platforms = submission.platforms.len(),
            %url,
            "submitting file for analysis"
        );

        let form = submission.into_form().await?;
        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "analysis service responded");

        classify_response(status, &body)
    }
}

/// Map a status and body to a result using the service's own status signal.
pub fn classify_response(status: StatusCode, body: &[u8]) -> Result<AnalysisResult> {
    if status.is_success() {
        Ok(serde_json::from_slice(body)?)
    } else {
        Err(UploadError::ApplicationFailure {
            status: status.as_u16(),
            detail: failure_detail(status, body),
        })
    }
}

fn failure_detail(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<FailureBody>(body) {
        Ok(FailureBody {
            detail: Some(serde_json::Value::String(detail)),
        }) => detail,
        Ok(FailureBody {
            detail: Some(detail),
        }) => detail.to_string(),
        _ => format!("HTTP {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::*;
    use crate::types::{Configuration, PendingFile, Platform, Podcaster};

    /// Accept one connection, answer it with `status` and a JSON `body`, and
    /// hand back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            while !request_complete(&request) {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            String::from_utf8_lossy(&request).to_string()
        });

        (base_url, handle)
    }

    /// Headers are in, and a multipart body has reached its closing boundary
    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let headers = text[..header_end].to_lowercase();
        let Some(start) = headers.find("boundary=") else {
            return true;
        };
        let boundary = headers[start + "boundary=".len()..]
            .split("\r\n")
            .next()
            .unwrap_or_default()
            .trim_matches('"')
            .to_string();
        text.to_lowercase().contains(&format!("--{boundary}--"))
    }

    fn submission(media_type: &str, config: &Configuration) -> Submission {
        let file = PendingFile::from_bytes("episode.mp3", media_type, b"ID3fake".to_vec());
        Submission::build(file, config)
    }

    #[test]
    fn success_status_decodes_result() {
        let body = br#"{"success": true, "clips_found": 0, "clips": []}"#;
        let result = classify_response(StatusCode::OK, body).unwrap();
        assert!(result.success);
        assert_eq!(result.clips_found, 0);
    }

    #[test]
    fn failure_detail_is_used_verbatim() {
        let body = br#"{"detail": "unsupported format"}"#;
        let err = classify_response(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert_eq!(
            err,
            UploadError::ApplicationFailure {
                status: 400,
                detail: "unsupported format".to_string()
            }
        );
        assert_eq!(err.to_string(), "Upload failed: unsupported format");
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let body = br#"{"detail": [{"loc": ["body", "file"], "msg": "field required"}]}"#;
        let err = classify_response(StatusCode::UNPROCESSABLE_ENTITY, body).unwrap_err();
        let UploadError::ApplicationFailure { detail, .. } = err else {
            panic!("expected application failure");
        };
        assert!(detail.contains("field required"));
    }

    #[test]
    fn missing_detail_falls_back_to_status() {
        let err = classify_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>")
            .unwrap_err();
        assert_eq!(err.to_string(), "Upload failed: HTTP 502");
    }

    #[test]
    fn undecodable_success_body_is_a_transport_failure() {
        let err = classify_response(StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, UploadError::Transport { .. }));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = HttpAnalysisService::new(ServiceConfig::new(format!("http://{addr}")));
        let file = PendingFile::from_bytes("a.mp3", "audio/mpeg", b"ID3".to_vec());
        let err = service
            .analyze(Submission::build(file, &Configuration::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Transport { .. }));
        assert!(err.to_string().starts_with("Upload failed: "));
    }

    #[tokio::test]
    async fn analyze_posts_the_multipart_form() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"success": true, "clips_found": 1, "clips": [{"start_time": 1.0, "end_time": 3.0, "duration": 2.0, "confidence_score": 0.9, "transcript": "hey", "keywords": ["hey"]}]}"#,
        )
        .await;
        let service = HttpAnalysisService::new(ServiceConfig::new(base_url));
        let config = Configuration {
            podcaster: Podcaster::JoeRogan,
            platforms: [Platform::Tiktok, Platform::YoutubeShorts]
                .into_iter()
                .collect(),
        };

        let result = service
            .analyze(submission("audio/mpeg", &config))
            .await
            .unwrap();
        assert_eq!(result.clips_found, 1);
        assert_eq!(result.clips[0].keywords, Some(vec!["hey".to_string()]));

        let request = server.await.unwrap();
        let lower = request.to_lowercase();
        assert!(request.starts_with("POST /upload/analyze "), "{request}");
        assert!(lower.contains("content-type: multipart/form-data; boundary="));
        assert!(lower.contains(r#"name="file"; filename="episode.mp3""#));
        assert!(lower.contains("content-type: audio/mpeg"));
        assert!(request.contains("ID3fake"));
        assert!(lower.contains(r#"name="podcaster""#));
        assert!(request.contains("joe_rogan"));
        assert_eq!(lower.matches(r#"name="platforms""#).count(), 2);
        assert!(request.contains("tiktok"));
        assert!(request.contains("youtube_shorts"));
        assert!(!request.contains("instagram"));
    }

    #[tokio::test]
    async fn empty_platform_set_sends_no_platform_fields() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"success": true, "clips_found": 0, "clips": []}"#).await;
        let service = HttpAnalysisService::new(ServiceConfig::new(base_url));
        let config = Configuration {
            podcaster: Podcaster::Unknown,
            platforms: crate::types::PlatformSet::empty(),
        };

        service
            .analyze(submission("audio/mpeg", &config))
            .await
            .unwrap();

        let request = server.await.unwrap().to_lowercase();
        assert!(!request.contains(r#"name="platforms""#));
        assert!(request.contains(r#"name="podcaster""#));
    }

    #[tokio::test]
    async fn unparsable_media_type_is_sent_without_content_type() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"success": true, "clips_found": 0, "clips": []}"#).await;
        let service = HttpAnalysisService::new(ServiceConfig::new(base_url));

        let result = service
            .analyze(submission("audio/", &Configuration::default()))
            .await;
        assert!(result.is_ok(), "{result:?}");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.contains(r#"filename="episode.mp3""#));
        assert!(!request.contains("content-type: audio/"));
    }

    #[tokio::test]
    async fn analyze_failure_response_carries_detail() {
        let (base_url, server) =
            serve_once("400 Bad Request", r#"{"detail": "unsupported format"}"#).await;
        let service = HttpAnalysisService::new(ServiceConfig::new(base_url));

        let err = service
            .analyze(submission("audio/mpeg", &Configuration::default()))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert_eq!(
            err,
            UploadError::ApplicationFailure {
                status: 400,
                detail: "unsupported format".to_string()
            }
        );
        assert_eq!(err.to_string(), "Upload failed: unsupported format");
    }

    #[tokio::test]
    async fn health_decodes_status() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"status": "healthy", "service": "upload"}"#).await;
        let service = HttpAnalysisService::new(ServiceConfig::new(base_url));

        let health = service.health().await.unwrap();
        assert_eq!(
            health,
            HealthStatus {
                status: "healthy".to_string(),
                service: Some("upload".to_string())
            }
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /upload/health "), "{request}");
    }

    #[tokio::test]
    async fn health_non_success_is_an_application_failure() {
        let (base_url, server) =
            serve_once("503 Service Unavailable", r#"{"detail": "warming up"}"#).await;
        let service = HttpAnalysisService::new(ServiceConfig::new(base_url));

        let err = service.health().await.unwrap_err();
        server.await.unwrap();

        assert_eq!(
            err,
            UploadError::ApplicationFailure {
                status: 503,
                detail: "warming up".to_string()
            }
        );
    }
}

use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerationConfig, InlineData, Part};
use crate::ai::fallback::first_available;
use crate::ai::{DiagnosisService, VendorEnvelope};
use crate::models::{EncodedImage, Provider};
use crate::{prompts, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Gemini diagnosis client walking an ordered list of candidate models.
pub struct GeminiDiagnosisClient {
    http: GeminiHttpClient,
    models: Vec<String>,
}

impl GeminiDiagnosisClient {
    pub fn new(base_url: String, models: Vec<String>, timeout: Duration) -> Self {
        Self::new_with_client(base_url, models, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        base_url: String,
        models: Vec<String>,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(base_url, timeout, client),
            models,
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    fn build_request(image: &EncodedImage) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::Text {
                        text: prompts::DIAGNOSIS.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
            }),
        }
    }
}

#[async_trait]
impl DiagnosisService for GeminiDiagnosisClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn request_diagnosis(
        &self,
        api_key: &str,
        image: &EncodedImage,
    ) -> Result<VendorEnvelope> {
        tracing::debug!(
            "Requesting Gemini diagnosis ({} base64 chars, {})",
            image.data.len(),
            image.mime_type
        );

        let request = Self::build_request(image);
        let http = &self.http;
        let request = &request;

        let response = first_available(Provider::Gemini.name(), &self.models, |model| async move {
            http.generate_content(&model, api_key, request).await
        })
        .await?;

        Ok(VendorEnvelope::Gemini(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;
    use crate::Error;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn image() -> EncodedImage {
        EncodedImage {
            data: "/9j/4AAQSkY=".to_string(),
            mime_type: "image/jpeg".to_string(),
        }
    }

    fn models() -> Vec<String> {
        vec![
            "gemini-a".to_string(),
            "gemini-b".to_string(),
            "gemini-c".to_string(),
        ]
    }

    fn client(server: &MockServer) -> GeminiDiagnosisClient {
        GeminiDiagnosisClient::new(server.uri(), models(), Duration::from_secs(5))
    }

    fn text_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    fn error_body(code: u16, message: &str) -> serde_json::Value {
        serde_json::json!({
            "error": { "code": code, "message": message, "status": "ERROR" }
        })
    }

    #[tokio::test]
    async fn test_request_payload_shape() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-a:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_string_contains("\"inlineData\""))
            .and(body_string_contains("\"mimeType\":\"image/jpeg\""))
            .and(body_string_contains("\"data\":\"/9j/4AAQSkY=\""))
            .and(body_string_contains("\"responseMimeType\":\"application/json\""))
            .and(body_string_contains("agricultural pest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body("{}")))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client(&server)
            .request_diagnosis("test-key", &image())
            .await
            .unwrap();
        assert_eq!(envelope.first_text(), Some("{}"));
    }

    #[tokio::test]
    async fn test_model_not_found_falls_back_without_trying_third() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-a:generateContent"))
            .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
                404,
                "models/gemini-a is not found for API version v1beta",
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-b:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body("from b")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-c:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body("from c")))
            .expect(0)
            .mount(&server)
            .await;

        let envelope = client(&server)
            .request_diagnosis("test-key", &image())
            .await
            .unwrap();
        assert_eq!(envelope.first_text(), Some("from b"));
    }

    #[tokio::test]
    async fn test_definitive_error_stops_without_trying_second() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-a:generateContent"))
            .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
                400,
                "API key not valid. Please pass a valid API key.",
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-b:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body("from b")))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .request_diagnosis("bad-key", &image())
            .await
            .unwrap_err();

        match err {
            Error::Request(RequestError::Rejected { model, message, .. }) => {
                assert_eq!(model, "gemini-a");
                assert!(message.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_null_candidates_is_an_answer() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-a:generateContent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": null })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-b:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body("from b")))
            .expect(0)
            .mount(&server)
            .await;

        let envelope = client(&server)
            .request_diagnosis("test-key", &image())
            .await
            .unwrap();
        assert_eq!(envelope.first_text(), None);
    }

    #[tokio::test]
    async fn test_unreadable_body_falls_back() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-a:generateContent"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-b:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body("from b")))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client(&server)
            .request_diagnosis("test-key", &image())
            .await
            .unwrap();
        assert_eq!(envelope.first_text(), Some("from b"));
    }

    #[tokio::test]
    async fn test_all_models_missing_exhausts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(error_body(404, "model is not supported for generateContent")),
            )
            .expect(3)
            .mount(&server)
            .await;

        let err = client(&server)
            .request_diagnosis("test-key", &image())
            .await
            .unwrap_err();

        match err {
            Error::Request(RequestError::AllEndpointsExhausted {
                attempts,
                last_error,
                ..
            }) => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("not supported"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_key_is_not_leaked_in_transport_errors() {
        // Nothing listens on port 9 of localhost, so every attempt fails to connect.
        let client = GeminiDiagnosisClient::new(
            "http://127.0.0.1:9".to_string(),
            models(),
            Duration::from_secs(2),
        );

        let err = client
            .request_diagnosis("super-secret-key", &image())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Request(RequestError::AllEndpointsExhausted { attempts: 3, .. })
        ));
        assert!(!err.to_string().contains("super-secret-key"));
    }
}

use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::emotion::EmotionLabels;
use crate::error::{AppError, Result};

const VISION_API_BASE: &str = "https://vision.googleapis.com";

/// Client for the face-detection REST API. Sends image bytes, gets back
/// per-face likelihood labels.
#[derive(Clone)]
pub struct VisionService {
    client: Client,
    api_key: String,
    api_base: String,
}

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    feature_type: &'static str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AnnotateImageResponse {
    face_annotations: Vec<FaceAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiStatus {
    code: i32,
    message: String,
}

/// One detected face. Only the four emotion likelihoods are of interest;
/// absent fields deserialize to empty strings and score 0 downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceAnnotation {
    pub joy_likelihood: String,
    pub sorrow_likelihood: String,
    pub anger_likelihood: String,
    pub surprise_likelihood: String,
}

impl FaceAnnotation {
    pub fn emotion_labels(&self) -> EmotionLabels {
        EmotionLabels {
            joy: self.joy_likelihood.clone(),
            sorrow: self.sorrow_likelihood.clone(),
            angry: self.anger_likelihood.clone(),
            surprise: self.surprise_likelihood.clone(),
        }
    }
}

impl VisionService {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, VISION_API_BASE.to_string())
    }

    /// Point the client at a different host (used by tests).
    pub fn with_base_url(api_key: String, api_base: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base,
        }
    }

    /// Run face detection on raw image bytes. Returns every detected face;
    /// the caller decides what to do with multiple faces.
    pub async fn detect_faces(&self, image: &[u8]) -> Result<Vec<FaceAnnotation>> {
        let request = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: general_purpose::STANDARD.encode(image),
                },
                features: vec![Feature {
                    feature_type: "FACE_DETECTION",
                    max_results: 10,
                }],
            }],
        };

        let url = format!(
            "{}/v1/images:annotate?key={}",
            self.api_base,
            urlencoding::encode(&self.api_key)
        );

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(AppError::ExternalApi(format!(
                "Vision API error ({}): {}",
                status, error_text
            )));
        }

        let data: AnnotateResponse = response.json().await?;
        let first = data.responses.into_iter().next().unwrap_or_default();

        if let Some(error) = first.error {
            return Err(AppError::ExternalApi(format!(
                "Vision API rejected the image ({}): {}",
                error.code, error.message
            )));
        }

        Ok(first.face_annotations)
    }
}

//! Test doubles shared by the pipeline unit tests.

use std::collections::VecDeque;
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

use crate::error::BrandError;
use crate::model::{GenerativeModel, ModelRequest};

/// Replays canned responses in order and records every request it receives.
/// Once the queue is drained it answers with [`BrandError::EmptyResponse`].
pub(crate) struct StubModel {
    responses: Mutex<VecDeque<Result<String, BrandError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl StubModel {
    pub(crate) fn new(responses: Vec<Result<String, BrandError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok((*t).to_string())).collect())
    }

    pub(crate) fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl GenerativeModel for StubModel {
    async fn generate(&self, request: &ModelRequest) -> Result<String, BrandError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BrandError::EmptyResponse))
    }
}

/// Encode a tiny solid-colour PNG.
pub(crate) fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([255, 128, 0]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

pub(crate) fn write_png(path: &Path) {
    std::fs::write(path, png_bytes()).unwrap();
}

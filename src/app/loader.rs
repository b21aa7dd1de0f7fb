use std::{
    path::PathBuf,
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use anyhow::{Context, Result};

use crate::image_utils::{prepare_stage_image, StageImage};

/// Where the bytes of a dropped/selected image come from. Some platforms
/// only hand over raw bytes for a drop, others a path.
pub enum ImageSource {
    Path(PathBuf),
    Bytes { name: String, bytes: Vec<u8> },
}

impl ImageSource {
    fn label(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes { name, .. } => name.clone(),
        }
    }
}

pub struct LoadRequest {
    /// Stage that was current when the image arrived; completion must not
    /// move the stage index.
    pub stage: usize,
    pub source: ImageSource,
}

pub struct LoadResult {
    pub stage: usize,
    pub label: String,
    pub outcome: Result<StageImage>,
}

/// Background image decoder. Requests go in over a channel, the GUI drains
/// completions once per frame.
pub struct Loader {
    request_tx: Sender<LoadRequest>,
    result_rx: Receiver<LoadResult>,
    pub in_flight: usize,
}

impl Loader {
    pub fn new() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (result_tx, result_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let label = request.source.label();
                let outcome = Self::decode(request.source);
                if result_tx
                    .send(LoadResult {
                        stage: request.stage,
                        label,
                        outcome,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });

        Self {
            request_tx,
            result_rx,
            in_flight: 0,
        }
    }

    fn decode(source: ImageSource) -> Result<StageImage> {
        match source {
            ImageSource::Path(path) => {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("unable to read {}", path.display()))?;
                let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
                prepare_stage_image(name.as_deref(), &bytes)
            }
            ImageSource::Bytes { name, bytes } => prepare_stage_image(Some(&name), &bytes),
        }
    }

    pub fn request(&mut self, request: LoadRequest) {
        if self.request_tx.send(request).is_ok() {
            self.in_flight += 1;
        }
    }

    pub fn poll(&mut self) -> Vec<LoadResult> {
        let mut completed = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            completed.push(result);
        }
        completed
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

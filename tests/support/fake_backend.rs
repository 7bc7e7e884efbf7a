use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use cancerna::analysis::wire::{NoduleLabel, PredictResponse};
use cancerna::analysis::{AnalysisBackend, AnalysisError, AnalysisResult, ScanUpload};

struct Script {
    reply: Result<AnalysisResult, AnalysisError>,
    gate: Option<Receiver<()>>,
}

/// Backend double with per-file scripted replies.
///
/// Replies are keyed by upload file name so concurrent workers cannot take
/// each other's script. A gated reply blocks until its sender fires or drops.
#[derive(Default)]
pub struct FakeBackend {
    scripts: Mutex<HashMap<String, VecDeque<Script>>>,
    uploads: Mutex<Vec<String>>,
    completed: Mutex<usize>,
    images: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeBackend {
    pub fn reply(&self, file_name: &str, reply: Result<AnalysisResult, AnalysisError>) {
        self.push(file_name, Script { reply, gate: None });
    }

    /// Script a reply held back until the returned sender is used.
    pub fn gated_reply(
        &self,
        file_name: &str,
        reply: Result<AnalysisResult, AnalysisError>,
    ) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.push(
            file_name,
            Script {
                reply,
                gate: Some(rx),
            },
        );
        tx
    }

    pub fn serve_image(&self, path: &str, bytes: Vec<u8>) {
        self.images
            .lock()
            .unwrap()
            .insert(path.to_string(), bytes);
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    /// Number of predict calls that have returned.
    pub fn completed(&self) -> usize {
        *self.completed.lock().unwrap()
    }

    fn push(&self, file_name: &str, script: Script) {
        self.scripts
            .lock()
            .unwrap()
            .entry(file_name.to_string())
            .or_default()
            .push_back(script);
    }
}

impl AnalysisBackend for FakeBackend {
    fn predict(&self, upload: &ScanUpload) -> Result<AnalysisResult, AnalysisError> {
        self.uploads.lock().unwrap().push(upload.file_name.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&upload.file_name)
            .and_then(VecDeque::pop_front);
        let reply = match script {
            Some(Script { reply, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.recv();
                }
                reply
            }
            None => Err(AnalysisError::Transport("no scripted reply".into())),
        };
        *self.completed.lock().unwrap() += 1;
        reply
    }

    fn fetch_segmentation_image(&self, path: &str) -> Result<Vec<u8>, AnalysisError> {
        self.images
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| AnalysisError::Status {
                code: 404,
                body: "not found".into(),
            })
    }
}

/// Mapped result for a backend reply of `label`/`p`.
pub fn result(label: NoduleLabel, p: f64, image: Option<&str>) -> AnalysisResult {
    AnalysisResult::from_prediction(PredictResponse {
        label,
        malignancy_probability: p,
        risk_score: None,
        segmentation_image_url: image.map(str::to_string),
    })
}

pub fn transport_error() -> AnalysisError {
    AnalysisError::Transport("connection refused".into())
}

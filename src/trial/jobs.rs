//! Background work for the trial flow.
//!
//! Each job runs on its own thread and reports back over one channel that
//! the controller drains from the UI thread. Jobs carry the request id of
//! the analysis episode they belong to so late replies can be recognized.

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, Sender, TryRecvError},
    },
    thread,
};

use crate::analysis::{AnalysisBackend, AnalysisError, AnalysisResult};

use super::image::{self, DecodedImage, ImageLoadError};
use super::state::SelectedFile;

pub(crate) enum JobMessage {
    AnalysisFinished(AnalysisJobResult),
    ImageLoaded(ImageJobResult),
}

#[derive(Debug)]
pub(crate) struct AnalysisJobResult {
    pub(crate) request_id: u64,
    pub(crate) result: Result<AnalysisResult, AnalysisError>,
}

#[derive(Debug)]
pub(crate) struct ImageJobResult {
    pub(crate) request_id: u64,
    pub(crate) result: Result<DecodedImage, ImageLoadError>,
}

/// Where the results screen gets its picture from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ImageSource {
    /// Server-relative path returned by the backend.
    Backend(String),
    /// Configured local placeholder.
    Fallback(PathBuf),
}

pub(crate) struct TrialJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    next_request_id: u64,
    analysis_cancel: Option<Arc<AtomicBool>>,
    image_cancel: Option<Arc<AtomicBool>>,
}

impl TrialJobs {
    pub(crate) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel();
        Self {
            message_tx,
            message_rx,
            next_request_id: 1,
            analysis_cancel: None,
            image_cancel: None,
        }
    }

    pub(crate) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(crate) fn analysis_in_progress(&self) -> bool {
        self.analysis_cancel.is_some()
    }

    pub(crate) fn image_in_progress(&self) -> bool {
        self.image_cancel.is_some()
    }

    fn next_request_id(&mut self) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1).max(1);
        request_id
    }

    /// Submit `file` on a worker thread and return the episode's request id.
    pub(crate) fn begin_analysis(
        &mut self,
        backend: Arc<dyn AnalysisBackend>,
        file: SelectedFile,
    ) -> u64 {
        self.cancel_analysis();
        let request_id = self.next_request_id();
        let cancel = Arc::new(AtomicBool::new(false));
        self.analysis_cancel = Some(cancel.clone());
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = file
                .to_upload()
                .and_then(|upload| backend.predict(&upload));
            if cancel.load(Ordering::Relaxed) {
                tracing::debug!("Dropping analysis reply for canceled request {request_id}");
                return;
            }
            let _ = tx.send(JobMessage::AnalysisFinished(AnalysisJobResult {
                request_id,
                result,
            }));
        });
        request_id
    }

    /// Mark the in-flight analysis as ignorable. The request itself is not
    /// aborted.
    pub(crate) fn cancel_analysis(&mut self) {
        if let Some(cancel) = self.analysis_cancel.take() {
            cancel.store(true, Ordering::Relaxed);
        }
    }

    pub(crate) fn clear_analysis(&mut self) {
        self.analysis_cancel = None;
    }

    pub(crate) fn begin_image_load(
        &mut self,
        backend: Arc<dyn AnalysisBackend>,
        request_id: u64,
        source: ImageSource,
    ) {
        self.cancel_image_load();
        let cancel = Arc::new(AtomicBool::new(false));
        self.image_cancel = Some(cancel.clone());
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = match &source {
                ImageSource::Backend(path) => backend
                    .fetch_segmentation_image(path)
                    .map_err(ImageLoadError::from)
                    .and_then(|bytes| image::decode(&bytes)),
                ImageSource::Fallback(path) => image::load_file(path),
            };
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            let _ = tx.send(JobMessage::ImageLoaded(ImageJobResult { request_id, result }));
        });
    }

    pub(crate) fn cancel_image_load(&mut self) {
        if let Some(cancel) = self.image_cancel.take() {
            cancel.store(true, Ordering::Relaxed);
        }
    }

    pub(crate) fn clear_image_load(&mut self) {
        self.image_cancel = None;
    }

    pub(crate) fn cancel_all(&mut self) {
        self.cancel_analysis();
        self.cancel_image_load();
    }
}

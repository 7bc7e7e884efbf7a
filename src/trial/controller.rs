use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rfd::FileDialog;

use crate::analysis::{AnalysisBackend, AnalysisResult, HttpAnalysisBackend};
use crate::config::{AppSettings, ConfigError};

use super::jobs::{AnalysisJobResult, ImageJobResult, ImageSource, JobMessage, TrialJobs};
use super::progress::AnalysisProgress;
use super::state::{
    PICKER_EXTENSIONS, ResultImage, SelectedFile, TrialNotice, TrialView, ViewState,
};
use super::viewport::ViewportTransform;

/// Rejected view transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrialError {
    #[error("Cannot {action} from the {from} screen")]
    IllegalTransition {
        from: ViewState,
        action: &'static str,
    },
}

/// Owns the trial flow's state and brokers every transition.
///
/// `Upload -> Preview -> Analyzing -> Results`, with failures returning to
/// `Preview` and `reset` returning to `Upload` from anywhere.
pub struct TrialController {
    view: TrialView,
    viewport: ViewportTransform,
    progress: AnalysisProgress,
    notice: Option<TrialNotice>,
    jobs: TrialJobs,
    backend: Arc<dyn AnalysisBackend>,
    fallback_image: Option<PathBuf>,
}

impl TrialController {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            view: TrialView::Upload,
            viewport: ViewportTransform::default(),
            progress: AnalysisProgress::default(),
            notice: None,
            jobs: TrialJobs::new(),
            backend,
            fallback_image: None,
        }
    }

    /// Local image shown when the backend returns none.
    pub fn with_fallback_image(mut self, path: Option<PathBuf>) -> Self {
        self.fallback_image = path;
        self
    }

    /// Build a controller talking to the configured HTTP backend.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, ConfigError> {
        let endpoint = settings.endpoint()?;
        tracing::info!("Inference backend at {}", endpoint.base());
        Ok(Self::new(Arc::new(HttpAnalysisBackend::new(endpoint)))
            .with_fallback_image(settings.trial.fallback_image.clone()))
    }

    pub fn view_state(&self) -> ViewState {
        self.view.state()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.view.file()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.view.result()
    }

    pub fn result_image(&self) -> Option<&ResultImage> {
        match &self.view {
            TrialView::Results { image, .. } => Some(image),
            _ => None,
        }
    }

    /// Request id of the analysis whose result is on screen.
    pub fn result_request_id(&self) -> Option<u64> {
        match &self.view {
            TrialView::Results { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&TrialNotice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportTransform {
        &mut self.viewport
    }

    /// Animation step while analyzing.
    pub fn progress_percent(&self) -> Option<u8> {
        self.progress.percent_at(Instant::now())
    }

    /// True while a worker may still report back.
    pub fn has_pending_jobs(&self) -> bool {
        self.jobs.analysis_in_progress() || self.jobs.image_in_progress()
    }

    /// Store the chosen file and show its preview. `None` (dialog canceled)
    /// changes nothing.
    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        let Some(file) = file else {
            return;
        };
        let from = self.view_state();
        self.leave_current_view();
        tracing::info!("Selected {} ({} bytes)", file.name, file.size_bytes);
        self.notice = (from == ViewState::Analyzing)
            .then(|| TrialNotice::info("Previous analysis discarded"));
        self.view = TrialView::Preview { file };
        log_transition(from, ViewState::Preview);
    }

    /// Select the file at `path`. Unreadable paths raise a notice instead.
    pub fn select_path(&mut self, path: &Path) {
        match SelectedFile::from_path(path) {
            Ok(file) => self.select_file(Some(file)),
            Err(err) => {
                tracing::warn!("Cannot open {}: {err}", path.display());
                self.notice = Some(TrialNotice::error(format!(
                    "Cannot open {}: {err}",
                    path.display()
                )));
            }
        }
    }

    /// Open the native file picker and select the chosen scan.
    pub fn select_file_via_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("CT scans and images", PICKER_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.select_path(&path);
    }

    /// Submit the previewed file. Only legal from `Preview`.
    pub fn start_analysis(&mut self) -> Result<u64, TrialError> {
        let TrialView::Preview { file } = &self.view else {
            return Err(TrialError::IllegalTransition {
                from: self.view_state(),
                action: "start an analysis",
            });
        };
        let file = file.clone();
        let request_id = self.jobs.begin_analysis(self.backend.clone(), file.clone());
        tracing::info!("Analysis {request_id} started for {}", file.name);
        self.view = TrialView::Analyzing { file, request_id };
        self.notice = None;
        self.progress.start(Instant::now());
        log_transition(ViewState::Preview, ViewState::Analyzing);
        Ok(request_id)
    }

    /// Back to `Upload` with nothing selected, from any screen.
    pub fn reset(&mut self) {
        let from = self.view_state();
        self.leave_current_view();
        self.view = TrialView::Upload;
        self.viewport.reset();
        self.notice = None;
        log_transition(from, ViewState::Upload);
    }

    /// Apply every finished job. Call once per frame.
    pub fn poll_jobs(&mut self) {
        while let Ok(message) = self.jobs.try_recv_message() {
            self.apply_message(message);
        }
    }

    fn apply_message(&mut self, message: JobMessage) {
        match message {
            JobMessage::AnalysisFinished(message) => self.finish_analysis(message),
            JobMessage::ImageLoaded(message) => self.finish_image_load(message),
        }
    }

    fn finish_analysis(&mut self, message: AnalysisJobResult) {
        if self.view.analyzing_request() != Some(message.request_id) {
            tracing::debug!("Ignoring stale analysis reply {}", message.request_id);
            return;
        }
        let TrialView::Analyzing { file, request_id } = std::mem::take(&mut self.view) else {
            return;
        };
        self.jobs.clear_analysis();
        self.progress.stop();
        match message.result {
            Ok(result) => {
                tracing::info!(
                    "Analysis {request_id} finished: {} (p={:.3})",
                    result.classification.prediction,
                    result.classification.confidence
                );
                let image = match self.image_source_for(&result) {
                    Some(source) => {
                        self.jobs
                            .begin_image_load(self.backend.clone(), request_id, source);
                        ResultImage::Loading
                    }
                    None => ResultImage::Unavailable("No segmentation image available".into()),
                };
                self.viewport.reset();
                self.view = TrialView::Results {
                    file,
                    result: Box::new(result),
                    request_id,
                    image,
                };
                log_transition(ViewState::Analyzing, ViewState::Results);
            }
            Err(err) => {
                tracing::warn!("Analysis {request_id} failed: {err}");
                self.notice = Some(TrialNotice::error(format!("Error analyzing file: {err}")));
                self.view = TrialView::Preview { file };
                log_transition(ViewState::Analyzing, ViewState::Preview);
            }
        }
    }

    fn finish_image_load(&mut self, message: ImageJobResult) {
        let TrialView::Results {
            request_id, image, ..
        } = &mut self.view
        else {
            return;
        };
        if *request_id != message.request_id {
            return;
        }
        self.jobs.clear_image_load();
        *image = match message.result {
            Ok(decoded) => ResultImage::Ready(decoded),
            Err(err) => {
                tracing::warn!("Segmentation image unavailable: {err}");
                ResultImage::Unavailable(err.to_string())
            }
        };
    }

    fn image_source_for(&self, result: &AnalysisResult) -> Option<ImageSource> {
        result
            .segmentation_image_url
            .clone()
            .map(ImageSource::Backend)
            .or_else(|| self.fallback_image.clone().map(ImageSource::Fallback))
    }

    // Cancels work owned by the screen being left and stops the animation.
    fn leave_current_view(&mut self) {
        self.jobs.cancel_all();
        self.progress.stop();
    }
}

fn log_transition(from: ViewState, to: ViewState) {
    tracing::debug!("Trial view {from} -> {to}");
}

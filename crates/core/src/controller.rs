//! Upload workflow state machine.
//!
//! [`WorkflowController::handle`] is a pure transition function: it consumes a
//! [`WorkflowEvent`], updates the owned state and returns a [`Transition`]
//! describing what the caller has to do or show next. Only
//! [`WorkflowController::dispatch`] touches the network, through an
//! [`AnalysisService`].

use tracing::{debug, info, warn};

use crate::{
    error::{Result, UploadError},
    selection::{SelectionAdapter, SelectionEvent},
    service::AnalysisService,
    submission::Submission,
    types::{AnalysisResult, Configuration, PendingFile, Platform, Podcaster, WorkflowState},
    validate::validate_file,
};

#[derive(Debug)]
pub enum WorkflowEvent {
    Selection(SelectionEvent),
    SetPodcaster(Podcaster),
    TogglePlatform(Platform),
    ExchangeCompleted(Result<AnalysisResult>),
}

#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Nothing changed
    Ignored,
    /// Configuration or the dragging flag changed
    Updated,
    /// Selection refused by the validator; state untouched
    Rejected(UploadError),
    /// Entered `Submitting`; the caller must send this payload
    Submit(Submission),
    /// A new result replaced the previous one
    Published { clips_found: u64 },
    /// The exchange failed; no result was published
    Failed(UploadError),
}

#[derive(Debug, Default)]
pub struct WorkflowController {
    state: WorkflowState,
    config: Configuration,
    selection: SelectionAdapter,
    pending: Option<PendingFile>,
    result: Option<AnalysisResult>,
}

impl WorkflowController {
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.selection.is_dragging()
    }

    pub fn pending(&self) -> Option<&PendingFile> {
        self.pending.as_ref()
    }

    /// Latest published result. Kept while a new submission is in flight and
    /// after a failed one.
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn handle(&mut self, event: WorkflowEvent) -> Transition {
        match event {
            WorkflowEvent::Selection(selection) => self.on_selection(selection),
            WorkflowEvent::SetPodcaster(podcaster) => {
                if self.state == WorkflowState::Submitting {
                    debug!(?podcaster, "podcaster change ignored while submitting");
                    return Transition::Ignored;
                }
                self.config.podcaster = podcaster;
                Transition::Updated
            }
            WorkflowEvent::TogglePlatform(platform) => {
                if self.state == WorkflowState::Submitting {
                    debug!(?platform, "platform toggle ignored while submitting");
                    return Transition::Ignored;
                }
                self.config.platforms.toggle(platform);
                Transition::Updated
            }
            WorkflowEvent::ExchangeCompleted(outcome) => self.on_completed(outcome),
        }
    }

    /// Run one event through the state machine, performing the exchange if
    /// the event starts a submission.
    pub async fn dispatch<S: AnalysisService>(
        &mut self,
        event: WorkflowEvent,
        service: &S,
    ) -> Transition {
        match self.handle(event) {
            Transition::Submit(submission) => {
                let outcome = service.analyze(submission).await;
                self.handle(WorkflowEvent::ExchangeCompleted(outcome))
            }
            other => other,
        }
    }

    fn on_selection(&mut self, event: SelectionEvent) -> Transition {
        let is_drag = matches!(
            event,
            SelectionEvent::DragEnter | SelectionEvent::DragOver | SelectionEvent::DragLeave
        );
        let was_dragging = self.selection.is_dragging();
        let selected = self.selection.apply(event);

        if is_drag {
            return if was_dragging != self.selection.is_dragging() {
                Transition::Updated
            } else {
                Transition::Ignored
            };
        }

        let Some(file) = selected else {
            return Transition::Ignored;
        };

        if self.state == WorkflowState::Submitting {
            debug!(file = %file.name, "selection ignored while submitting");
            return Transition::Ignored;
        }

        if let Err(err) = validate_file(&file) {
            warn!(file = %file.name, media_type = %file.media_type, "selection rejected");
            return Transition::Rejected(err);
        }

        let submission = Submission::build(file.clone(), &self.config);
        self.pending = Some(file);
        self.state = WorkflowState::Submitting;
        Transition::Submit(submission)
    }

    fn on_completed(&mut self, outcome: Result<AnalysisResult>) -> Transition {
        if self.state != WorkflowState::Submitting {
            warn!("exchange completion received while idle");
            return Transition::Ignored;
        }

        self.state = WorkflowState::Idle;
        self.pending = None;

        match outcome {
            Ok(result) => {
                let clips_found = result.clips_found;
                info!(clips_found, success = result.success, "analysis result published");
                self.result = Some(result);
                Transition::Published { clips_found }
            }
            Err(err) => {
                warn!(error = %err, "upload failed");
                Transition::Failed(err)
            }
        }
    }
}

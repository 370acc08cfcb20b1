//! Submission: uploads the selected resume to the parse endpoint and hands
//! the parsed profile to match retrieval.
//!
//! Lifecycle: `Idle → FileSelected → Submitting → {Success, Failure}`.
//! A failure keeps the selected file so the user can retry straight away.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api_client::JobAlignApi;
use crate::models::resume::{ExperienceLevel, NavigationHandoff};
use crate::workflow::file_acquisition::FileAcquisition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    FileSelected,
    Submitting,
    Success,
    Failure(String),
}

/// Result of a single `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// File or experience missing; nothing was sent.
    NotReady,
    /// A submission is already in flight; this one was refused.
    AlreadySubmitting,
    /// The controller's lifetime ended before the response arrived.
    Cancelled,
    Handoff(NavigationHandoff),
    Failed(String),
}

pub struct SubmissionController {
    api: Arc<dyn JobAlignApi>,
    state: SubmissionState,
    experience: Option<ExperienceLevel>,
    lifetime: CancellationToken,
}

/// Puts the state back to `FileSelected` if a submit future is dropped
/// before it settles.
struct InFlight<'a> {
    state: &'a mut SubmissionState,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, next: SubmissionState) {
        *self.state = next;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.state = SubmissionState::FileSelected;
        }
    }
}

impl SubmissionController {
    pub fn new(api: Arc<dyn JobAlignApi>) -> Self {
        Self::with_lifetime(api, CancellationToken::new())
    }

    /// Binds in-flight requests to `lifetime`; cancelling it discards any
    /// pending response.
    pub fn with_lifetime(api: Arc<dyn JobAlignApi>, lifetime: CancellationToken) -> Self {
        Self {
            api,
            state: SubmissionState::Idle,
            experience: None,
            lifetime,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn experience(&self) -> Option<ExperienceLevel> {
        self.experience
    }

    pub fn set_experience(&mut self, experience: Option<ExperienceLevel>) {
        self.experience = experience;
    }

    /// Mirrors the file selection into the lifecycle. Outcomes of a finished
    /// submission are kept until the file is removed.
    pub fn sync_selection(&mut self, files: &FileAcquisition) {
        let has_file = files.has_file();
        match self.state {
            SubmissionState::Submitting => {}
            _ if !has_file => self.state = SubmissionState::Idle,
            SubmissionState::Idle => self.state = SubmissionState::FileSelected,
            _ => {}
        }
    }

    pub fn can_submit(&self, files: &FileAcquisition) -> bool {
        self.state != SubmissionState::Submitting
            && files.has_file()
            && self.experience.is_some()
    }

    pub fn cancellation_handle(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    pub async fn submit(&mut self, files: &FileAcquisition) -> SubmitOutcome {
        if self.state == SubmissionState::Submitting {
            warn!("Submit refused: a resume upload is already in flight");
            return SubmitOutcome::AlreadySubmitting;
        }

        let (Some(file), Some(experience)) = (files.selected(), self.experience) else {
            debug!(
                has_file = files.has_file(),
                has_experience = self.experience.is_some(),
                "Submit ignored: file and experience are both required"
            );
            return SubmitOutcome::NotReady;
        };

        if self.lifetime.is_cancelled() {
            return SubmitOutcome::Cancelled;
        }

        info!(
            file = file.name(),
            size_bytes = file.size_bytes(),
            experience = %experience,
            "Uploading resume for parsing"
        );

        let request = self.lifetime.child_token();
        let api = &self.api;
        self.state = SubmissionState::Submitting;
        let guard = InFlight {
            state: &mut self.state,
            settled: false,
        };

        let result = tokio::select! {
            biased;
            _ = request.cancelled() => None,
            result = api.upload_resume(file, experience) => Some(result),
        };

        match result {
            None => {
                info!("Resume upload cancelled; response discarded");
                guard.settle(SubmissionState::FileSelected);
                SubmitOutcome::Cancelled
            }
            Some(Ok(parsed_data)) => {
                info!("Resume parsed successfully");
                guard.settle(SubmissionState::Success);
                SubmitOutcome::Handoff(NavigationHandoff {
                    parsed_data,
                    experience,
                })
            }
            Some(Err(e)) => {
                error!("Resume upload failed: {e}");
                let message = e.upload_message();
                guard.settle(SubmissionState::Failure(message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::errors::{INVALID_RESPONSE_MESSAGE, UPLOAD_FAILED_MESSAGE};
    use crate::models::matches::MatchSet;
    use crate::models::resume::ParsedResumeData;
    use crate::workflow::fake::{FakeApi, MatchReply, UploadReply};
    use crate::workflow::file_acquisition::{FileSource, SelectedFile};

    fn empty_match_set() -> MatchSet {
        serde_json::from_str(r#"{"matches": []}"#).unwrap()
    }

    fn parsed() -> ParsedResumeData {
        ParsedResumeData {
            email: Some("a@b.com".to_string()),
            skills: Some("Go, SQL".to_string()),
            ..Default::default()
        }
    }

    fn controller(reply: UploadReply) -> (Arc<FakeApi>, SubmissionController) {
        let api = Arc::new(FakeApi::new(reply, MatchReply::Matches(empty_match_set())));
        let controller = SubmissionController::new(api.clone());
        (api, controller)
    }

    fn files_with_resume() -> FileAcquisition {
        let mut files = FileAcquisition::default();
        files.select_file(FileSource::Picker(vec![SelectedFile::new(
            "resume.pdf",
            vec![7u8; 2 * 1024 * 1024],
        )]));
        files
    }

    fn three() -> Option<ExperienceLevel> {
        ExperienceLevel::from_years(3)
    }

    #[tokio::test]
    async fn submit_without_file_is_noop() {
        let (api, mut ctl) = controller(UploadReply::Parsed(parsed()));
        ctl.set_experience(three());
        let files = FileAcquisition::default();

        assert!(!ctl.can_submit(&files));
        assert_eq!(ctl.submit(&files).await, SubmitOutcome::NotReady);
        assert_eq!(api.upload_calls(), 0);
        assert_eq!(ctl.state(), &SubmissionState::Idle);
    }

    #[tokio::test]
    async fn submit_without_experience_is_noop() {
        let (api, mut ctl) = controller(UploadReply::Parsed(parsed()));
        let files = files_with_resume();
        ctl.sync_selection(&files);

        assert!(!ctl.can_submit(&files));
        assert_eq!(ctl.submit(&files).await, SubmitOutcome::NotReady);
        assert_eq!(api.upload_calls(), 0);
        assert_eq!(ctl.state(), &SubmissionState::FileSelected);
    }

    #[tokio::test]
    async fn successful_parse_hands_off_payload_unchanged() {
        let (api, mut ctl) = controller(UploadReply::Parsed(parsed()));
        let files = files_with_resume();
        ctl.set_experience(three());
        ctl.sync_selection(&files);
        assert!(ctl.can_submit(&files));

        let outcome = ctl.submit(&files).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Handoff(NavigationHandoff {
                parsed_data: parsed(),
                experience: ExperienceLevel::from_years(3).unwrap(),
            })
        );
        assert_eq!(ctl.state(), &SubmissionState::Success);
        assert_eq!(api.upload_calls(), 1);
        assert_eq!(api.match_calls().len(), 0);
    }

    #[tokio::test]
    async fn server_message_is_surfaced_and_file_kept() {
        let (_api, mut ctl) = controller(UploadReply::Rejected(Some(
            "Unable to extract text from the file.".to_string(),
        )));
        let files = files_with_resume();
        ctl.set_experience(three());
        ctl.sync_selection(&files);

        let outcome = ctl.submit(&files).await;

        let expected = "Unable to extract text from the file.".to_string();
        assert_eq!(outcome, SubmitOutcome::Failed(expected.clone()));
        assert_eq!(ctl.state(), &SubmissionState::Failure(expected));
        assert!(files.has_file());
        assert!(ctl.can_submit(&files));
    }

    #[tokio::test]
    async fn failure_without_message_uses_generic_text_and_allows_retry() {
        let (api, mut ctl) = controller(UploadReply::Rejected(None));
        let files = files_with_resume();
        ctl.set_experience(three());

        assert_eq!(
            ctl.submit(&files).await,
            SubmitOutcome::Failed(UPLOAD_FAILED_MESSAGE.to_string())
        );
        assert_eq!(
            ctl.submit(&files).await,
            SubmitOutcome::Failed(UPLOAD_FAILED_MESSAGE.to_string())
        );
        assert_eq!(api.upload_calls(), 2);
    }

    #[tokio::test]
    async fn non_json_response_yields_invalid_response_message() {
        let (_api, mut ctl) = controller(UploadReply::InvalidResponse);
        let files = files_with_resume();
        ctl.set_experience(three());

        assert_eq!(
            ctl.submit(&files).await,
            SubmitOutcome::Failed(INVALID_RESPONSE_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn submit_while_submitting_is_refused() {
        let (api, mut ctl) = controller(UploadReply::Parsed(parsed()));
        let files = files_with_resume();
        ctl.set_experience(three());
        ctl.state = SubmissionState::Submitting;

        assert!(!ctl.can_submit(&files));
        assert_eq!(ctl.submit(&files).await, SubmitOutcome::AlreadySubmitting);
        assert_eq!(api.upload_calls(), 0);
    }

    #[tokio::test]
    async fn cancelling_mid_flight_discards_response() {
        let (api, mut ctl) = controller(UploadReply::Pending);
        let files = files_with_resume();
        ctl.set_experience(three());
        let handle = ctl.cancellation_handle();

        let (outcome, _) = tokio::join!(ctl.submit(&files), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });

        assert_eq!(outcome, SubmitOutcome::Cancelled);
        assert_eq!(ctl.state(), &SubmissionState::FileSelected);
        assert_eq!(api.upload_calls(), 1);
    }

    #[tokio::test]
    async fn submit_after_cancel_sends_nothing() {
        let (api, mut ctl) = controller(UploadReply::Parsed(parsed()));
        let files = files_with_resume();
        ctl.set_experience(three());
        ctl.cancellation_handle().cancel();

        assert_eq!(ctl.submit(&files).await, SubmitOutcome::Cancelled);
        assert_eq!(api.upload_calls(), 0);
    }

    #[tokio::test]
    async fn cancel_landing_with_ready_response_wins() {
        for _ in 0..50 {
            let (_api, mut ctl) = controller(UploadReply::ParsedAfterYield(parsed()));
            let files = files_with_resume();
            ctl.set_experience(three());
            ctl.sync_selection(&files);
            let handle = ctl.cancellation_handle();

            let (outcome, _) = tokio::join!(ctl.submit(&files), async { handle.cancel() });

            assert_eq!(outcome, SubmitOutcome::Cancelled);
            assert_eq!(ctl.state(), &SubmissionState::FileSelected);
        }
    }

    #[tokio::test]
    async fn dropped_submit_does_not_leave_controller_submitting() {
        let (_api, mut ctl) = controller(UploadReply::Pending);
        let files = files_with_resume();
        ctl.set_experience(three());

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), ctl.submit(&files)).await;

        assert!(timed_out.is_err());
        assert_eq!(ctl.state(), &SubmissionState::FileSelected);
    }

    #[test]
    fn test_sync_selection_tracks_file_presence() {
        let (_api, mut ctl) = controller(UploadReply::Parsed(parsed()));
        let mut files = files_with_resume();

        ctl.sync_selection(&files);
        assert_eq!(ctl.state(), &SubmissionState::FileSelected);

        ctl.state = SubmissionState::Failure("boom".to_string());
        ctl.sync_selection(&files);
        assert_eq!(ctl.state(), &SubmissionState::Failure("boom".to_string()));

        files.clear();
        ctl.sync_selection(&files);
        assert_eq!(ctl.state(), &SubmissionState::Idle);
    }
}

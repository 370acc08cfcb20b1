//! Match retrieval: runs the authenticated match exchange for the profile
//! handed over by a successful submission.
//!
//! Lifecycle: `Loading → {Success, Error}`. The exchange runs once per
//! distinct (parsed data, experience, token) triple.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api_client::{JobAlignApi, MatchRequest};
use crate::auth::AuthSession;
use crate::errors::{LOGIN_REQUIRED_MESSAGE, MATCH_CANCELLED_MESSAGE};
use crate::models::matches::MatchSet;
use crate::models::resume::{ExperienceLevel, NavigationHandoff, ParsedResumeData};

#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalState {
    Loading,
    Success(MatchSet),
    Error(String),
}

/// What retrieval works from. A missing handoff (e.g. the results screen was
/// opened directly) degrades to empty data rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalInput {
    pub parsed_data: ParsedResumeData,
    pub experience: Option<ExperienceLevel>,
}

impl From<Option<NavigationHandoff>> for RetrievalInput {
    fn from(handoff: Option<NavigationHandoff>) -> Self {
        match handoff {
            Some(h) => Self {
                parsed_data: h.parsed_data,
                experience: Some(h.experience),
            },
            None => Self::default(),
        }
    }
}

impl RetrievalInput {
    fn to_request(&self) -> MatchRequest {
        MatchRequest {
            skills: self.parsed_data.skills.clone(),
            experience: self
                .experience
                .map(ExperienceLevel::as_wire)
                .unwrap_or_default(),
        }
    }
}

type Trigger = (RetrievalInput, Option<String>);

pub struct MatchRetrievalController {
    api: Arc<dyn JobAlignApi>,
    state: RetrievalState,
    input: RetrievalInput,
    last_trigger: Option<Trigger>,
    lifetime: CancellationToken,
}

/// Settles an exchange that never delivered a result (cancelled, or its
/// future dropped) in the cancelled error and forgets its trigger.
struct InFlight<'a> {
    state: &'a mut RetrievalState,
    last_trigger: &'a mut Option<Trigger>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, next: RetrievalState) {
        *self.state = next;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.last_trigger = None;
            *self.state = RetrievalState::Error(MATCH_CANCELLED_MESSAGE.to_string());
        }
    }
}

impl MatchRetrievalController {
    pub fn new(api: Arc<dyn JobAlignApi>) -> Self {
        Self::with_lifetime(api, CancellationToken::new())
    }

    pub fn with_lifetime(api: Arc<dyn JobAlignApi>, lifetime: CancellationToken) -> Self {
        Self {
            api,
            state: RetrievalState::Loading,
            input: RetrievalInput::default(),
            last_trigger: None,
            lifetime,
        }
    }

    pub fn state(&self) -> &RetrievalState {
        &self.state
    }

    pub fn input(&self) -> &RetrievalInput {
        &self.input
    }

    /// Cancelling the returned token discards any pending response and stops
    /// further requests from this controller.
    pub fn cancellation_handle(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    /// Enters the results stage. Re-arriving with the same inputs after a
    /// settled exchange reuses its result; changed inputs re-trigger it.
    pub async fn arrive(
        &mut self,
        handoff: Option<NavigationHandoff>,
        session: &dyn AuthSession,
    ) -> &RetrievalState {
        if handoff.is_none() {
            warn!("Results opened without a handoff; continuing with empty resume data");
        }
        let input = RetrievalInput::from(handoff);
        let token = session
            .current_token()
            .filter(|t| !t.trim().is_empty());
        let trigger = (input, token);

        if self.last_trigger.as_ref() == Some(&trigger) && self.state != RetrievalState::Loading {
            debug!("Inputs unchanged since last retrieval; keeping result");
            return &self.state;
        }

        let (input, token) = trigger.clone();
        self.input = input;

        if self.lifetime.is_cancelled() {
            info!("Retrieval cancelled; job match request not sent");
            self.last_trigger = None;
            self.state = RetrievalState::Error(MATCH_CANCELLED_MESSAGE.to_string());
            return &self.state;
        }

        self.last_trigger = Some(trigger);
        self.state = RetrievalState::Loading;

        let Some(token) = token else {
            warn!("No session token; skipping job match request");
            self.state = RetrievalState::Error(LOGIN_REQUIRED_MESSAGE.to_string());
            return &self.state;
        };

        let request = self.input.to_request();
        info!(
            experience = %request.experience,
            has_skills = request.skills.is_some(),
            "Requesting job matches"
        );

        let cancel = self.lifetime.child_token();
        let api = &self.api;
        let guard = InFlight {
            state: &mut self.state,
            last_trigger: &mut self.last_trigger,
            settled: false,
        };
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = api.match_jobs(&token, &request) => Some(result),
        };

        match result {
            None => {
                info!("Job match request cancelled; response discarded");
                drop(guard);
            }
            Some(Ok(set)) => {
                info!(matches = set.matches.len(), "Job matches loaded");
                guard.settle(RetrievalState::Success(set));
            }
            Some(Err(e)) => {
                error!("Job match request failed: {e}");
                guard.settle(RetrievalState::Error(e.match_message()));
            }
        }
        &self.state
    }
}

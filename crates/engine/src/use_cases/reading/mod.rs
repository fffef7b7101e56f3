//! Reading use cases: walking a published story one choice at a time.
//!
//! Sessions live in [`ReadingSessionStore`] only. If a move uncovers corrupt
//! story data (no entry scene, or a choice pointing at a missing scene) the
//! session is dropped and the reader has to start again from the library.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use branchtale_domain::{DomainError, ReadingSession, SceneId, StoryId};

use crate::infrastructure::ports::RepoError;
use crate::stores::{ActiveReading, ReadingSessionStore};

mod navigate;
mod start;

pub use navigate::{ChooseOption, EndReading, GoBack, RestartReading, ViewReading};
pub use start::StartReading;

/// Container for reading use cases.
pub struct ReadingUseCases {
    pub start: Arc<StartReading>,
    pub choose: Arc<ChooseOption>,
    pub back: Arc<GoBack>,
    pub restart: Arc<RestartReading>,
    pub view: Arc<ViewReading>,
    pub end: Arc<EndReading>,
}

impl ReadingUseCases {
    pub fn new(
        start: Arc<StartReading>,
        choose: Arc<ChooseOption>,
        back: Arc<GoBack>,
        restart: Arc<RestartReading>,
        view: Arc<ViewReading>,
        end: Arc<EndReading>,
    ) -> Self {
        Self {
            start,
            choose,
            back,
            restart,
            view,
            end,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReadingError {
    #[error("Story not found: {0}")]
    StoryNotFound(StoryId),
    #[error("Reading session not found: {0}")]
    SessionNotFound(Uuid),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// A choice as the reader sees it: its label and the index to send back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub index: usize,
    pub text: String,
}

/// What the reader's screen shows after any move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingView {
    pub session_id: Uuid,
    pub story_id: StoryId,
    pub scene_id: SceneId,
    pub text: String,
    pub choices: Vec<ChoiceOption>,
    pub depth: usize,
    pub can_go_back: bool,
    pub is_ending: bool,
}

impl ReadingView {
    pub(crate) fn of(session_id: Uuid, story_id: StoryId, session: &ReadingSession) -> Self {
        let scene = session.current_scene();
        Self {
            session_id,
            story_id,
            scene_id: scene.id().clone(),
            text: scene.text().to_string(),
            choices: session
                .available_choices()
                .iter()
                .enumerate()
                .map(|(index, choice)| ChoiceOption {
                    index,
                    text: choice.text().to_string(),
                })
                .collect(),
            depth: session.depth(),
            can_go_back: session.can_go_back(),
            is_ending: session.is_at_ending(),
        }
    }
}

/// Run `step` against a live session and render the result.
///
/// Corruption errors close the session before they are returned.
fn advance(
    store: &ReadingSessionStore,
    session_id: Uuid,
    step: impl FnOnce(&mut ReadingSession) -> Result<(), DomainError>,
) -> Result<ReadingView, ReadingError> {
    let outcome = store
        .update(session_id, |reading: &mut ActiveReading| {
            step(&mut reading.session)
                .map(|()| ReadingView::of(session_id, reading.story_id, &reading.session))
        })
        .ok_or(ReadingError::SessionNotFound(session_id))?;

    match outcome {
        Ok(view) => Ok(view),
        Err(err) if err.is_corruption() => {
            store.close(session_id);
            tracing::warn!(
                session_id = %session_id,
                error = %err,
                "Closed reading session on corrupt story data"
            );
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

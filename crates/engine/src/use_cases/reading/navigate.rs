//! Moves within an open reading session.

use std::sync::Arc;

use uuid::Uuid;

use crate::stores::ReadingSessionStore;

use super::{advance, ReadingError, ReadingView};

/// Follow one of the current scene's choices.
pub struct ChooseOption {
    sessions: Arc<ReadingSessionStore>,
}

impl ChooseOption {
    pub fn new(sessions: Arc<ReadingSessionStore>) -> Self {
        Self { sessions }
    }

    /// An index outside the current choices leaves the session untouched.
    pub fn execute(&self, session_id: Uuid, index: usize) -> Result<ReadingView, ReadingError> {
        advance(&self.sessions, session_id, |session| {
            session.select_choice(index).map(|_| ())
        })
    }
}

/// Step back to the previous scene. A no-op at the beginning.
pub struct GoBack {
    sessions: Arc<ReadingSessionStore>,
}

impl GoBack {
    pub fn new(sessions: Arc<ReadingSessionStore>) -> Self {
        Self { sessions }
    }

    pub fn execute(&self, session_id: Uuid) -> Result<ReadingView, ReadingError> {
        advance(&self.sessions, session_id, |session| {
            session.go_back();
            Ok(())
        })
    }
}

/// Return to the entry scene and clear history.
pub struct RestartReading {
    sessions: Arc<ReadingSessionStore>,
}

impl RestartReading {
    pub fn new(sessions: Arc<ReadingSessionStore>) -> Self {
        Self { sessions }
    }

    pub fn execute(&self, session_id: Uuid) -> Result<ReadingView, ReadingError> {
        advance(&self.sessions, session_id, |session| {
            session.restart().map(|_| ())
        })
    }
}

pub struct ViewReading {
    sessions: Arc<ReadingSessionStore>,
}

impl ViewReading {
    pub fn new(sessions: Arc<ReadingSessionStore>) -> Self {
        Self { sessions }
    }

    pub fn execute(&self, session_id: Uuid) -> Result<ReadingView, ReadingError> {
        let reading = self
            .sessions
            .get(session_id)
            .ok_or(ReadingError::SessionNotFound(session_id))?;
        Ok(ReadingView::of(session_id, reading.story_id, &reading.session))
    }
}

/// Close a session; the reader navigated away.
pub struct EndReading {
    sessions: Arc<ReadingSessionStore>,
}

impl EndReading {
    pub fn new(sessions: Arc<ReadingSessionStore>) -> Self {
        Self { sessions }
    }

    pub fn execute(&self, session_id: Uuid) -> Result<(), ReadingError> {
        self.sessions
            .close(session_id)
            .ok_or(ReadingError::SessionNotFound(session_id))?;
        tracing::debug!(session_id = %session_id, "Reading ended");
        Ok(())
    }
}

//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, ImageHostPort, StoryRepo};
use crate::stores::ReadingSessionStore;
use crate::use_cases::{
    assets::{AssetUseCases, UploadCoverImage},
    authoring::{
        AuthoringUseCases, DeleteStory, EditStoryGraph, LoadStoryForEditing, PublishStory,
        SaveStory,
    },
    library::{BrowseStories, GetStory, LibraryUseCases, ListAuthorStories},
    reading::{
        ChooseOption, EndReading, GoBack, ReadingUseCases, RestartReading, StartReading,
        ViewReading,
    },
};

/// Main application state.
///
/// Holds the repositories, live stores and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub stores: Stores,
    pub use_cases: UseCases,
}

/// Port traits injected directly.
pub struct Repositories {
    pub stories: Arc<dyn StoryRepo>,
}

pub struct Stores {
    pub reading_sessions: Arc<ReadingSessionStore>,
}

/// Container for all use cases.
pub struct UseCases {
    pub authoring: AuthoringUseCases,
    pub library: LibraryUseCases,
    pub reading: ReadingUseCases,
    pub assets: AssetUseCases,
}

impl App {
    /// Wire every use case to the given adapters.
    pub fn new(
        stories: Arc<dyn StoryRepo>,
        image_host: Arc<dyn ImageHostPort>,
        clock: Arc<dyn ClockPort>,
        max_upload_bytes: usize,
        reading_session_ttl: chrono::Duration,
    ) -> Self {
        let reading_sessions =
            Arc::new(ReadingSessionStore::new(clock.clone()).with_ttl(reading_session_ttl));

        let authoring = AuthoringUseCases::new(
            Arc::new(PublishStory::new(stories.clone(), clock.clone())),
            Arc::new(LoadStoryForEditing::new(stories.clone())),
            Arc::new(SaveStory::new(stories.clone(), clock.clone())),
            Arc::new(EditStoryGraph::new(stories.clone(), clock)),
            Arc::new(DeleteStory::new(stories.clone())),
        );

        let library = LibraryUseCases::new(
            Arc::new(BrowseStories::new(stories.clone())),
            Arc::new(GetStory::new(stories.clone())),
            Arc::new(ListAuthorStories::new(stories.clone())),
        );

        let reading = ReadingUseCases::new(
            Arc::new(StartReading::new(stories.clone(), reading_sessions.clone())),
            Arc::new(ChooseOption::new(reading_sessions.clone())),
            Arc::new(GoBack::new(reading_sessions.clone())),
            Arc::new(RestartReading::new(reading_sessions.clone())),
            Arc::new(ViewReading::new(reading_sessions.clone())),
            Arc::new(EndReading::new(reading_sessions.clone())),
        );

        let assets = AssetUseCases::new(Arc::new(UploadCoverImage::new(
            image_host,
            max_upload_bytes,
        )));

        Self {
            repositories: Repositories { stories },
            stores: Stores { reading_sessions },
            use_cases: UseCases {
                authoring,
                library,
                reading,
                assets,
            },
        }
    }
}

//! SQLite-backed story storage.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use branchtale_domain::{Story, StoryDescription, StoryGraph, StoryId, StoryTitle, UserId};

use crate::infrastructure::ports::{RepoError, StoryOrder, StoryRepo};

const STORY_COLUMNS: &str =
    "id, title, description, cover_image, author_id, scenes, created_at, updated_at";

/// SQLite implementation for story storage.
///
/// The scene graph lives in a single JSON `scenes` column, so every save is a
/// whole-graph replace.
pub struct SqliteStoryRepo {
    pool: SqlitePool,
}

impl SqliteStoryRepo {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("stories.connect", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stories (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                cover_image TEXT,
                author_id TEXT NOT NULL,
                scenes TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("stories.create_table", e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_stories_author ON stories (author_id)")
            .execute(&pool)
            .await
            .map_err(|e| RepoError::database("stories.create_index", e))?;

        Ok(Self { pool })
    }

    async fn fetch_ordered(
        &self,
        author_id: Option<UserId>,
        order: StoryOrder,
    ) -> Result<Vec<Story>, RepoError> {
        let direction = match order {
            StoryOrder::NewestFirst => "DESC",
            StoryOrder::OldestFirst => "ASC",
        };

        let rows = match author_id {
            Some(author_id) => {
                let sql = format!(
                    "SELECT {STORY_COLUMNS} FROM stories WHERE author_id = ? ORDER BY created_at {direction}"
                );
                sqlx::query(&sql)
                    .bind(author_id.to_string())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql =
                    format!("SELECT {STORY_COLUMNS} FROM stories ORDER BY created_at {direction}");
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
        }
        .map_err(|e| RepoError::database("stories.list", e))?;

        // Undecodable rows are skipped, not fatal.
        let stories = rows
            .iter()
            .filter_map(|row| match row_to_story(row) {
                Ok(story) => Some(story),
                Err(e) => {
                    let story_id = row.try_get::<String, _>("id").unwrap_or_default();
                    tracing::warn!(story_id = %story_id, error = %e, "Skipping undecodable story");
                    None
                }
            })
            .collect();
        Ok(stories)
    }
}

#[async_trait]
impl StoryRepo for SqliteStoryRepo {
    async fn insert(&self, story: &Story) -> Result<(), RepoError> {
        let scenes = encode_scenes(story.scenes())?;

        sqlx::query(
            r#"
            INSERT INTO stories
                (id, title, description, cover_image, author_id, scenes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(story.id().to_string())
        .bind(story.title().as_str())
        .bind(story.description().map(|d| d.as_str()))
        .bind(story.cover_image())
        .bind(story.author_id().to_string())
        .bind(scenes)
        .bind(encode_time(story.created_at()))
        .bind(encode_time(story.updated_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                RepoError::constraint(format!("story {} already exists", story.id()))
            } else {
                RepoError::database("stories.insert", e)
            }
        })?;

        Ok(())
    }

    async fn update(&self, story: &Story) -> Result<(), RepoError> {
        let scenes = encode_scenes(story.scenes())?;

        let result = sqlx::query(
            r#"
            UPDATE stories SET
                title = ?,
                description = ?,
                cover_image = ?,
                scenes = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(story.title().as_str())
        .bind(story.description().map(|d| d.as_str()))
        .bind(story.cover_image())
        .bind(scenes)
        .bind(encode_time(story.updated_at()))
        .bind(story.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("stories.update", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Story", story.id()));
        }
        Ok(())
    }

    async fn get(&self, id: StoryId) -> Result<Option<Story>, RepoError> {
        let sql = format!("SELECT {STORY_COLUMNS} FROM stories WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("stories.get", e))?;

        row.as_ref().map(row_to_story).transpose()
    }

    async fn delete(&self, id: StoryId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("stories.delete", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Story", id));
        }
        Ok(())
    }

    async fn list_all(&self, order: StoryOrder) -> Result<Vec<Story>, RepoError> {
        self.fetch_ordered(None, order).await
    }

    async fn list_by_author(
        &self,
        author_id: UserId,
        order: StoryOrder,
    ) -> Result<Vec<Story>, RepoError> {
        self.fetch_ordered(Some(author_id), order).await
    }
}

// =============================================================================
// Row mapping
// =============================================================================

fn encode_scenes(scenes: &StoryGraph) -> Result<String, RepoError> {
    serde_json::to_string(scenes).map_err(RepoError::serialization)
}

/// Fixed-width UTC timestamps so that text ordering matches time ordering.
fn encode_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_time(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(RepoError::serialization)
}

fn decode_uuid(value: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(value).map_err(RepoError::serialization)
}

fn column<T>(row: &SqliteRow, name: &str) -> Result<T, RepoError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepoError::database("stories.decode", e))
}

fn row_to_story(row: &SqliteRow) -> Result<Story, RepoError> {
    let id = StoryId::from_uuid(decode_uuid(&column::<String>(row, "id")?)?);
    let author_id = UserId::from_uuid(decode_uuid(&column::<String>(row, "author_id")?)?);
    let title = StoryTitle::new(column::<String>(row, "title")?).map_err(RepoError::serialization)?;
    let description = column::<Option<String>>(row, "description")?
        .map(StoryDescription::new)
        .transpose()
        .map_err(RepoError::serialization)?;
    let cover_image = column::<Option<String>>(row, "cover_image")?;
    let scenes: StoryGraph = serde_json::from_str(&column::<String>(row, "scenes")?)
        .map_err(RepoError::serialization)?;
    let created_at = decode_time(&column::<String>(row, "created_at")?)?;
    let updated_at = decode_time(&column::<String>(row, "updated_at")?)?;

    let mut story = Story::new(author_id, title, created_at)
        .with_id(id)
        .with_scenes(scenes)
        .with_timestamps(created_at, updated_at);
    if let Some(description) = description {
        story = story.with_description(description);
    }
    if let Some(url) = cover_image {
        story = story.with_cover_image(url);
    }
    Ok(story)
}

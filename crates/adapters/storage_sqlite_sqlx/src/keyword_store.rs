//! `SQLite` implementation of [`KeywordStore`].

use std::future::Future;

use sqlx::SqlitePool;

use autoleave_app::ports::KeywordStore;
use autoleave_domain::error::AutomationError;
use autoleave_domain::keyword::KeywordSet;

use crate::error::StorageError;
use crate::preference_store::SqlitePreferenceStore;

/// Preference key holding the comma-separated keyword list.
pub const KEYWORDS_KEY: &str = "keywords";

/// Keyword store reading the `keywords` preference on every load.
#[derive(Debug, Clone)]
pub struct SqliteKeywordStore {
    preferences: SqlitePreferenceStore,
}

impl SqliteKeywordStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            preferences: SqlitePreferenceStore::new(pool),
        }
    }

    /// Save the raw keyword string, trimmed, and return the parsed set.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the write fails.
    pub async fn set_keywords(&self, raw: &str) -> Result<KeywordSet, StorageError> {
        let raw = raw.trim();
        self.preferences.set(KEYWORDS_KEY, raw).await?;
        let keywords = KeywordSet::parse(raw);
        tracing::info!(%keywords, "keywords updated");
        Ok(keywords)
    }

    /// The raw keyword string as stored, empty when never set.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the read fails.
    pub async fn raw_keywords(&self) -> Result<String, StorageError> {
        Ok(self
            .preferences
            .get(KEYWORDS_KEY)
            .await?
            .unwrap_or_default())
    }
}

impl KeywordStore for SqliteKeywordStore {
    fn load_keywords(&self) -> impl Future<Output = Result<KeywordSet, AutomationError>> + Send {
        let preferences = self.preferences.clone();
        async move {
            let raw = preferences
                .get(KEYWORDS_KEY)
                .await
                .map_err(StorageError::from)?;
            Ok(raw.as_deref().map(KeywordSet::parse).unwrap_or_default())
        }
    }
}

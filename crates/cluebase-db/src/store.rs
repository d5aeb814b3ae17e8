//! The pooled database handle and its query operations.

use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;

use cluebase_core::{Clue, Error, Result, StatEntry};

use crate::config::DbConfig;

/// Fixed cap on clues returned per lookup.
pub const CLUE_BATCH_SIZE: i64 = 20;

const TOPICS_SQL: &str =
    "SELECT DISTINCT canonical_topic FROM category_mappings ORDER BY canonical_topic";

// SQLite accepts `$N` parameters natively, so the same statement text works
// against both supported backends.
const CLUES_BY_TOPIC_SQL: &str = "\
SELECT c.question, c.answer, c.clue_value, c.round, c.game_date, cm.canonical_topic
FROM clues c
JOIN category_mappings cm ON c.category = cm.jeopardy_category
WHERE cm.canonical_topic = $1
ORDER BY RANDOM()
LIMIT $2";

const INSERT_STAT_SQL: &str = "INSERT INTO user_stats (canonical_topic, passed) VALUES ($1, $2)";

/// Pooled handle to the trivia database.
///
/// Cloning is cheap; clones share the underlying pool. Each operation
/// checks a connection out of the pool for exactly one statement and
/// returns it on every exit path.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Connects a new pool using the given configuration.
    ///
    /// There is no retry logic: a connection failure here, or at query
    /// time, surfaces as [`cluebase_core::Error::Database`].
    ///
    /// # Errors
    ///
    /// Returns an error if the connect URL is invalid or the pool cannot
    /// reach the database.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.connect_url()?)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            "Database pool ready"
        );
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    ///
    /// This is the seam tests use to substitute an isolated in-memory
    /// database for the process-scoped pool.
    #[must_use]
    pub fn with_pool(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Checks that a connection can be checked out and used.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot produce a working connection.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Returns every canonical topic, lexicographically ascending, with
    /// no duplicates.
    ///
    /// An empty mapping table yields an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn all_topics(&self) -> Result<Vec<String>> {
        let topics = sqlx::query_scalar(TOPICS_SQL).fetch_all(&self.pool).await?;
        Ok(topics)
    }

    /// Returns a random batch of at most [`CLUE_BATCH_SIZE`] clues for the
    /// given canonical topic.
    ///
    /// Ordering is delegated to the database's `RANDOM()`, so repeated
    /// calls may return a different subset even for identical input —
    /// that is what makes quiz draws work. Clues whose raw category has no
    /// mapping are excluded by the join. An unknown topic yields an empty
    /// batch, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the topic is blank after
    /// trimming (no query is issued), or a database error if the query
    /// fails. The raw, untrimmed value is what gets bound.
    pub async fn clues_by_topic(&self, topic: &str) -> Result<Vec<Clue>> {
        if topic.trim().is_empty() {
            return Err(Error::invalid_input("topic must not be blank"));
        }

        let clues = sqlx::query_as(CLUES_BY_TOPIC_SQL)
            .bind(topic)
            .bind(CLUE_BATCH_SIZE)
            .fetch_all(&self.pool)
            .await?;
        Ok(clues)
    }

    /// Appends one pass/fail event.
    ///
    /// The topic is stored verbatim — it is not validated against the
    /// canonical topic list, and entries are never deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record_stat(&self, entry: &StatEntry) -> Result<()> {
        sqlx::query(INSERT_STAT_SQL)
            .bind(entry.canonical_topic.as_str())
            .bind(entry.passed)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    const SCHEMA: &[&str] = &[
        "CREATE TABLE clues (
            id TEXT PRIMARY KEY,
            category TEXT,
            round TEXT,
            clue_value TEXT,
            question TEXT,
            answer TEXT,
            game_date TEXT
        )",
        "CREATE TABLE category_mappings (
            jeopardy_category TEXT PRIMARY KEY,
            canonical_topic TEXT NOT NULL
        )",
        "CREATE TABLE user_stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            canonical_topic TEXT NOT NULL,
            passed BOOLEAN NOT NULL,
            recorded_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    ];

    // Each SQLite in-memory connection is its own database, so the test
    // pool is capped at a single connection.
    async fn memory_db() -> Database {
        install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&pool).await.expect("schema");
        }
        Database::with_pool(pool)
    }

    async fn seed_mapping(db: &Database, raw: &str, topic: &str) {
        sqlx::query(
            "INSERT INTO category_mappings (jeopardy_category, canonical_topic) VALUES ($1, $2)",
        )
        .bind(raw)
        .bind(topic)
        .execute(&db.pool)
        .await
        .expect("seed mapping");
    }

    async fn seed_clue(db: &Database, id: &str, category: &str, question: &str, answer: &str) {
        sqlx::query(
            "INSERT INTO clues (id, category, round, clue_value, question, answer, game_date)
             VALUES ($1, $2, 'Jeopardy!', '$200', $3, $4, '2020-01-01')",
        )
        .bind(id)
        .bind(category)
        .bind(question)
        .bind(answer)
        .execute(&db.pool)
        .await
        .expect("seed clue");
    }

    async fn seed_scenario(db: &Database) {
        seed_mapping(db, "SCIENCE", "Science & Nature").await;
        seed_mapping(db, "HISTORY", "World History").await;
        seed_clue(db, "c1", "SCIENCE", "It orbits the Sun", "Earth").await;
        seed_clue(db, "c2", "SCIENCE", "Smallest planet", "Mercury").await;
        seed_clue(db, "c3", "HISTORY", "First US president", "Washington").await;
    }

    #[tokio::test]
    async fn test_all_topics_sorted_and_distinct() {
        let db = memory_db().await;
        seed_scenario(&db).await;
        // A second raw category mapping onto an existing topic must not
        // produce a duplicate.
        seed_mapping(&db, "BIOLOGY", "Science & Nature").await;

        let topics = db.all_topics().await.unwrap();
        assert_eq!(topics, vec!["Science & Nature", "World History"]);
    }

    #[tokio::test]
    async fn test_all_topics_empty_table() {
        let db = memory_db().await;
        let topics = db.all_topics().await.unwrap();
        assert!(topics.is_empty());
    }

    #[tokio::test]
    async fn test_clues_by_topic_filters_to_topic() {
        let db = memory_db().await;
        seed_scenario(&db).await;

        let clues = db.clues_by_topic("Science & Nature").await.unwrap();
        assert_eq!(clues.len(), 2);
        for clue in &clues {
            assert_eq!(clue.canonical_topic, "Science & Nature");
            assert!(clue.answer == "Earth" || clue.answer == "Mercury");
        }
    }

    #[tokio::test]
    async fn test_clues_by_topic_rejects_blank_topic() {
        let db = memory_db().await;
        seed_scenario(&db).await;

        for blank in ["", "   ", "\t\n"] {
            let err = db.clues_by_topic(blank).await.unwrap_err();
            assert!(err.is_client_error(), "{blank:?} should be rejected");
        }
    }

    #[tokio::test]
    async fn test_clues_by_topic_unknown_topic_is_empty() {
        let db = memory_db().await;
        seed_scenario(&db).await;

        let clues = db.clues_by_topic("NoSuchTopic").await.unwrap();
        assert!(clues.is_empty());
    }

    #[tokio::test]
    async fn test_clues_by_topic_excludes_unmapped_categories() {
        let db = memory_db().await;
        seed_mapping(&db, "SCIENCE", "Science & Nature").await;
        seed_clue(&db, "c1", "SCIENCE", "It orbits the Sun", "Earth").await;
        seed_clue(&db, "c2", "POTPOURRI", "No mapping for this one", "Nothing").await;

        let clues = db.clues_by_topic("Science & Nature").await.unwrap();
        assert_eq!(clues.len(), 1);
        assert_eq!(clues[0].answer, "Earth");
    }

    #[tokio::test]
    async fn test_clues_by_topic_caps_batch_size() {
        let db = memory_db().await;
        seed_mapping(&db, "SCIENCE", "Science & Nature").await;
        for i in 0..25 {
            let id = format!("c{i}");
            let question = format!("Question {i}");
            seed_clue(&db, &id, "SCIENCE", &question, "Earth").await;
        }

        let clues = db.clues_by_topic("Science & Nature").await.unwrap();
        assert_eq!(clues.len(), CLUE_BATCH_SIZE as usize);
    }

    #[tokio::test]
    async fn test_record_stat_round_trip() {
        let db = memory_db().await;
        let entry = StatEntry {
            canonical_topic: "World History".to_string(),
            passed: false,
        };
        db.record_stat(&entry).await.unwrap();

        let rows = sqlx::query("SELECT canonical_topic, passed FROM user_stats")
            .fetch_all(&db.pool)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].try_get::<String, _>("canonical_topic").unwrap(),
            "World History"
        );
        assert!(!rows[0].try_get::<bool, _>("passed").unwrap());
    }

    #[tokio::test]
    async fn test_record_stat_appends_without_dedup() {
        let db = memory_db().await;
        let entry = StatEntry {
            canonical_topic: "Science & Nature".to_string(),
            passed: true,
        };
        db.record_stat(&entry).await.unwrap();
        db.record_stat(&entry).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_stats")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_ping() {
        let db = memory_db().await;
        db.ping().await.unwrap();
    }
}

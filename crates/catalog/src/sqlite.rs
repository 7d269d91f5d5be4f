//! Read-only relational catalog backed by SQLite.
//!
//! Reads the platform's `courses`, `users` and `departments` tables. Only
//! the columns needed for enrichment are touched:
//!
//! ```sql
//! courses(id, title, description, instructor_id, department_id, thumbnail_url)
//! users(id, first_name, last_name)
//! departments(id, name)
//! ```

use crate::error::Result;
use crate::source::CourseCatalog;
use crate::types::{CatalogEntry, CourseId};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

const ENTRY_QUERY_PREFIX: &str = "SELECT c.id, c.title, c.description, c.thumbnail_url,
        u.first_name, u.last_name,
        d.name AS department_name
 FROM courses c
 LEFT JOIN users u ON c.instructor_id = u.id
 LEFT JOIN departments d ON c.department_id = d.id
 WHERE c.id IN (";

/// Catalog served from a SQLite database opened read-only.
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// Open the database at `url` in read-only mode.
    ///
    /// `url` is a sqlx SQLite URL such as `sqlite://lms.db`.
    pub async fn connect_readonly(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseCatalog for SqliteCatalog {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn fetch_entries(&self, ids: &[CourseId]) -> Result<Vec<CatalogEntry>> {
        let unique: BTreeSet<CourseId> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; unique.len()].join(", ");
        let sql = format!("{}{})", ENTRY_QUERY_PREFIX, placeholders);

        let mut query = sqlx::query(&sql);
        for id in &unique {
            query = query.bind(i64::from(*id));
        }

        let rows = query.fetch_all(&self.pool).await?;
        debug!(
            "Catalog lookup for {} ids returned {} rows",
            unique.len(),
            rows.len()
        );

        rows.iter().map(entry_from_row).collect()
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<CatalogEntry> {
    let id: i64 = row.try_get("id")?;
    Ok(CatalogEntry {
        id: CourseId::try_from(id).ok(),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        instructor_first_name: row.try_get("first_name")?,
        instructor_last_name: row.try_get("last_name")?,
        department_name: row.try_get("department_name")?,
        thumbnail_url: row.try_get("thumbnail_url")?,
    })
}

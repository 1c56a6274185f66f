//! Schema setup and teardown from the bundled SQL scripts.
//!
//! Scripts in `migrations/` run in ascending file-name order, scripts in
//! `cleanup/` in descending order. Migration scripts are idempotent, so
//! running them against an initialized database is harmless.

use sqlx::PgPool;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Direction a script directory is walked in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOrder {
    /// Ascending file names, for `migrations/`
    Apply,
    /// Descending file names, for `cleanup/`
    Revert,
}

/// Create the inspection schema, returning the scripts that ran
///
/// # Example
///
/// ```rust,no_run
/// use sqlx::PgPool;
/// use lifeblood_postgres::repository::db_init::init_database;
///
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let applied = init_database(pool).await?;
/// println!("{} schema scripts applied", applied.len());
/// # Ok(())
/// # }
/// ```
pub async fn init_database(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    run_scripts(pool, &dir, ScriptOrder::Apply).await
}

/// Drop the inspection schema, data included
pub async fn cleanup_database(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cleanup");
    run_scripts(pool, &dir, ScriptOrder::Revert).await
}

/// `.sql` files of `dir` in the order they must run
pub fn schema_scripts(dir: &Path, order: ScriptOrder) -> std::io::Result<Vec<PathBuf>> {
    let mut scripts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("sql") {
            scripts.push(path);
        }
    }
    scripts.sort();
    if order == ScriptOrder::Revert {
        scripts.reverse();
    }
    Ok(scripts)
}

async fn run_scripts(
    pool: &PgPool,
    dir: &Path,
    order: ScriptOrder,
) -> Result<Vec<String>, sqlx::Error> {
    let scripts = schema_scripts(dir, order).map_err(sqlx::Error::Io)?;
    debug!("{} schema scripts found in {}", scripts.len(), dir.display());

    let mut applied = Vec::with_capacity(scripts.len());
    for path in scripts {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sql = fs::read_to_string(&path).map_err(sqlx::Error::Io)?;
        let started = Instant::now();
        sqlx::raw_sql(&sql).execute(pool).await?;
        info!("Schema script {name} ({order:?}) ran in {:?}", started.elapsed());
        applied.push(name);
    }
    Ok(applied)
}

use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;

use super::migration_runner;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// `sqlite://` URL for a file path, with a leading slash for Windows drive letters.
pub fn build_sqlite_url(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Creates the database file if needed, applies migrations and opens the shared connection.
pub async fn initialize_database(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = build_sqlite_url(db_path);
    tracing::info!("Opening database: {}", db_path.display());

    migration_runner::run_migrations(&db_url).await?;

    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database connection already initialized"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Shared database for service tests: one temp file per test process,
/// with tests serialized on a lock.
#[cfg(test)]
pub mod test_support {
    use contracts::domain::a003_equipment::aggregate::EquipmentCreate;
    use contracts::enums::UserRole;
    use contracts::system::auth::UserInfo;
    use once_cell::sync::Lazy;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::{Mutex, MutexGuard, OnceCell};

    use crate::domain::a003_equipment;
    use crate::system::users::repository::{self as users, NewUser};

    static INIT: Lazy<OnceCell<()>> = Lazy::new(OnceCell::new);
    static LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
    static SEQ: AtomicU32 = AtomicU32::new(0);

    pub async fn test_database() -> MutexGuard<'static, ()> {
        INIT.get_or_init(|| async {
            let path = std::env::temp_dir()
                .join(format!("maintenance-test-{}.db", std::process::id()));
            let _ = std::fs::remove_file(&path);
            super::initialize_database(&path)
                .await
                .expect("test database should initialize");
        })
        .await;
        LOCK.lock().await
    }

    /// Name that no other test in this process uses.
    pub fn unique(prefix: &str) -> String {
        format!("{}-{}", prefix, SEQ.fetch_add(1, Ordering::SeqCst))
    }

    pub async fn user(role: UserRole) -> UserInfo {
        let username = unique(role.as_str());
        users::insert(NewUser {
            email: format!("{}@example.test", username),
            username,
            password_hash: String::new(),
            first_name: "Test".into(),
            last_name: role.as_str().into(),
            role,
        })
        .await
        .expect("test user should insert")
    }

    /// Standalone equipment, returns its id.
    pub async fn equipment() -> i32 {
        a003_equipment::service::create(EquipmentCreate {
            name: unique("Machine"),
            ..Default::default()
        })
        .await
        .expect("test equipment should insert")
        .equipment
        .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_url() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/lib/m.db")),
            "sqlite:///var/lib/m.db?mode=rwc"
        );
    }

    #[test]
    fn windows_url_gets_leading_slash() {
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\m.db")),
            "sqlite:///C:/data/m.db?mode=rwc"
        );
    }
}

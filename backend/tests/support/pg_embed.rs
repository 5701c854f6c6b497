//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Every suite in a process shares one cluster from
//! `pg-embed-setup-unpriv`. Each test gets a fresh database cloned from a
//! template that already carries the migrations, keyed by a hash of the
//! `migrations/` directory so schema edits produce a new template.
//!
//! Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start; suites then log
//! a skip marker instead of failing.

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use preguntame::domain::ports::UserRepository;
use preguntame::domain::{DisplayName, Email, PasswordHash, User, UserId};
use preguntame::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use tokio::runtime::Runtime;
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const TEMPLATE_NAME_PREFIX: &str = "preguntame_template";
const SETUP_RETRIES: u32 = 3;
const SETUP_RETRY_DELAY: Duration = Duration::from_millis(500);

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// A pool onto a throwaway database and the runtime that drives it.
pub struct PgContext {
    runtime: Runtime,
    pool: DbPool,
    _database: TemporaryDatabase,
}

impl PgContext {
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Insert an account so posts and questions have a row to reference.
    pub fn seed_user(&self, name: &str, email: &str) -> User {
        let user = User::new(
            UserId::random(),
            DisplayName::new(name).expect("display name"),
            Email::new(email).expect("email"),
        );
        let hash = PasswordHash::generate("Abcd1234").expect("hash");
        let users = DieselUserRepository::new(self.pool());
        self.block_on(users.insert(&user, &hash))
            .expect("seed user insert");
        user
    }
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Build a context, or `None` when setup fails and skipping is allowed.
pub fn pg_context() -> Option<PgContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) if should_skip_test_cluster() => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
        Err(reason) => {
            panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.")
        }
    }
}

fn setup_context() -> Result<PgContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_database(cluster)?;

    let config = PoolConfig::new(database.url().to_string())
        .with_max_size(4)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(PgContext {
        runtime,
        pool,
        _database: database,
    })
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(_) if attempt < SETUP_RETRIES => {
                std::thread::sleep(SETUP_RETRY_DELAY);
                attempt += 1;
            }
            Err(err) => return Err(format!("shared cluster: {err:?}")),
        }
    }
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, String> {
    let hash =
        hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err:?}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        let mut conn =
            PgConnection::establish(&url).map_err(|err| format!("template connect: {err}"))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|err| format!("template migrations: {err}"))?;
    }
    Ok(template_name)
}

fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let template_name = ensure_template_database(cluster)?;
    let db_name = format!("test_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|err| format!("create database from template: {err:?}"))
}

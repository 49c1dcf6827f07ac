//! Embedded PostgreSQL fixtures for the Diesel adapter suites.
//!
//! Each [`PgWorld`] owns a throwaway cluster with one migrated database and
//! a small pool. Suites only run when `RUN_PG_EMBEDDED=1`; otherwise the
//! fixture prints a skip marker and yields `None`. Once opted in, a cluster
//! that fails to start fails the test.
//!
//! `pg-embed-setup-unpriv` installs into `/var/tmp` by default, so the
//! bootstrap points `PG_RUNTIME_DIR` and `PG_DATA_DIR` at the target
//! directory unless the caller already set them.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel_async::RunQueryDsl;
use pg_embedded_setup_unpriv::{TemporaryDatabase, TestCluster};
use tokio::runtime::Runtime;
use uuid::Uuid;

use recipebook::domain::ports::{
    CatalogueImport, CatalogueImportRepository, IngredientRepository, TagRepository,
    UserRepository,
};
use recipebook::domain::{Ingredient, NewIngredient, NewTag, Tag, User};
use recipebook::outbound::persistence::{
    DbPool, DieselCatalogueImportRepository, DieselIngredientRepository, DieselTagRepository,
    DieselUserRepository, PoolConfig, run_pending_migrations,
};

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

fn pg_embed_target_dir() -> PathBuf {
    if let Some(target_dir) = std::env::var_os("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir).join("pg-embed");
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("target")
        .join("pg-embed")
}

fn is_transient_error(err: &str) -> bool {
    let err = err.to_lowercase();
    [
        "error decoding response body",
        "connection reset",
        "connection refused",
        "timed out",
        "timeout",
        "dns error",
    ]
    .iter()
    .any(|pattern| err.contains(pattern))
}

fn start_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let _env = if std::env::var_os("PG_RUNTIME_DIR").is_none()
        || std::env::var_os("PG_DATA_DIR").is_none()
    {
        let base = pg_embed_target_dir().join(format!("run-{}", Uuid::new_v4()));
        let runtime_dir = base.join("install");
        let data_dir = base.join("data");
        std::fs::create_dir_all(&runtime_dir).map_err(|err| err.to_string())?;
        std::fs::create_dir_all(&data_dir).map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir.to_string_lossy().into_owned())),
            ("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt == MAX_RETRIES || !is_transient_error(&last_error) {
                    break;
                }
                std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS << attempt));
            }
        }
    }
    Err(last_error)
}

/// Migrated database plus the runtime its pool lives on.
///
/// Fields drop in declaration order: the pool closes before the database
/// is removed and the cluster stops.
pub struct PgWorld {
    pub pool: DbPool,
    _database: TemporaryDatabase,
    _cluster: TestCluster,
    runtime: Runtime,
}

impl PgWorld {
    fn provision() -> Result<Self, String> {
        let cluster = start_cluster()?;
        let name = format!("recipebook_{}", Uuid::new_v4().simple());
        let database = cluster
            .temporary_database(name.as_str())
            .map_err(|err| format!("{err:?}"))?;
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let url = database.url().to_owned();
        let pool = runtime.block_on(async {
            run_pending_migrations(&url)
                .await
                .map_err(|err| err.to_string())?;
            DbPool::new(PoolConfig::new(url.as_str()).with_max_size(2))
                .await
                .map_err(|err| err.to_string())
        })?;
        Ok(Self {
            pool,
            _database: database,
            _cluster: cluster,
            runtime,
        })
    }

    /// Drive `fut` to completion on the world's runtime.
    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }
}

/// Fixture body: a fresh world, or `None` when the suite is not enabled.
pub fn pg_world() -> Option<PgWorld> {
    if std::env::var("RUN_PG_EMBEDDED").as_deref() != Ok("1") {
        eprintln!("SKIP-TEST-CLUSTER: set RUN_PG_EMBEDDED=1 to run");
        return None;
    }
    match PgWorld::provision() {
        Ok(world) => Some(world),
        Err(reason) => panic!("embedded PostgreSQL setup failed: {reason}"),
    }
}

/// Rows most suites need: two users, three ingredients, two tags.
pub struct Catalogue {
    pub chef: User,
    pub reader: User,
    pub egg: Ingredient,
    pub flour: Ingredient,
    pub sugar: Ingredient,
    pub breakfast: Tag,
    pub dinner: Tag,
}

/// Accounts belong to the authentication service, so they are written
/// with plain SQL and read back through the user adapter.
pub async fn seed_catalogue(pool: &DbPool) -> Catalogue {
    let mut conn = pool.get().await.expect("connection");
    diesel::sql_query(
        "INSERT INTO users (username, email, first_name, last_name) VALUES \
         ('chef', 'chef@example.com', 'Ada', 'Cook'), \
         ('reader', 'reader@example.com', 'Bo', 'Read')",
    )
    .execute(&mut conn)
    .await
    .expect("users inserted");
    drop(conn);

    DieselCatalogueImportRepository::new(pool.clone())
        .import(&CatalogueImport {
            ingredients: vec![
                NewIngredient::try_new("flour", "g").expect("ingredient"),
                NewIngredient::try_new("egg", "pc").expect("ingredient"),
                NewIngredient::try_new("sugar", "g").expect("ingredient"),
            ],
            tags: vec![
                NewTag::try_new("Breakfast", "#E26C2D", "breakfast").expect("tag"),
                NewTag::try_new("Dinner", "#8775D2", "dinner").expect("tag"),
            ],
        })
        .await
        .expect("catalogue imported");

    let mut users = DieselUserRepository::new(pool.clone())
        .list_all()
        .await
        .expect("users")
        .into_iter();
    let chef = users.next().expect("chef");
    let reader = users.next().expect("reader");

    let mut ingredients = DieselIngredientRepository::new(pool.clone())
        .list_all()
        .await
        .expect("ingredients")
        .into_iter();
    let egg = ingredients.next().expect("egg");
    let flour = ingredients.next().expect("flour");
    let sugar = ingredients.next().expect("sugar");

    let mut tags = DieselTagRepository::new(pool.clone())
        .list_all()
        .await
        .expect("tags")
        .into_iter();
    let breakfast = tags.next().expect("breakfast");
    let dinner = tags.next().expect("dinner");

    Catalogue {
        chef,
        reader,
        egg,
        flour,
        sugar,
        breakfast,
        dinner,
    }
}

//! Integration tests for `DieselConfessionRepository` against embedded
//! PostgreSQL.
//!
//! Each test gets its own cluster and database. Async calls run on a Tokio
//! runtime owned by the test context so the tests themselves stay
//! synchronous. Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use confessions::domain::ports::{
    ConfessionCommand, ConfessionQuery, ConfessionRepository, ConfessionRepositoryError,
    SchemaBootstrap,
};
use confessions::domain::{
    Confession, ConfessionId, ConfessionService, DEFAULT_CATEGORY, DEFAULT_RECIPIENT, ListLimit,
    SubmissionDraft,
};
use confessions::outbound::persistence::{DbPool, DieselConfessionRepository, PoolConfig};
use confessions::test_support::clock::FixtureClock;
use pg_embedded_setup_unpriv::{TemporaryDatabase, TestCluster};
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

mod support;

use support::cluster_skip::handle_cluster_setup_failure;
use support::format_postgres_error;
use support::pg_embed::{temporary_database, test_cluster};

// Fields drop in order: the pool before the database before the cluster.
struct TestContext {
    runtime: Runtime,
    repository: DieselConfessionRepository,
    database_url: String,
    _database: TemporaryDatabase,
    _cluster: TestCluster,
}

impl TestContext {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let database = temporary_database(&cluster)?;
    let database_url = database.url().to_string();

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;
    let repository = DieselConfessionRepository::new(pool);
    runtime
        .block_on(repository.ensure_schema())
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        repository,
        database_url,
        _database: database,
        _cluster: cluster,
    })
}

#[fixture]
fn context() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 4, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn confession(id: &str, text: &str, created_at: DateTime<Utc>) -> Confession {
    Confession {
        id: ConfessionId::new(id).expect("valid id"),
        text: text.to_owned(),
        category: "work".to_owned(),
        recipient: "Team".to_owned(),
        created_at,
    }
}

#[rstest]
fn schema_preparation_is_idempotent(context: Option<TestContext>) {
    let Some(context) = context else { return };

    context
        .block_on(context.repository.ensure_schema())
        .expect("second ensure_schema succeeds");
    let listed = context
        .block_on(context.repository.list_recent(ListLimit::default()))
        .expect("list on empty table");

    assert!(listed.is_empty());
}

#[rstest]
fn listings_are_newest_first_and_limited(context: Option<TestContext>) {
    let Some(context) = context else { return };
    let rows = [
        confession("confession_1_aaaaaaaaa", "oldest", base_time()),
        confession(
            "confession_2_bbbbbbbbb",
            "newest",
            base_time() + TimeDelta::hours(2),
        ),
        confession(
            "confession_3_ccccccccc",
            "middle",
            base_time() + TimeDelta::hours(1),
        ),
    ];
    for row in &rows {
        let stored = context
            .block_on(context.repository.insert(row))
            .expect("insert succeeds");
        assert_eq!(&stored, row);
    }

    let all = context
        .block_on(context.repository.list_recent(ListLimit::default()))
        .expect("list all");
    let limited = context
        .block_on(context.repository.list_recent(ListLimit::new(2)))
        .expect("list two");

    let texts = |items: &[Confession]| -> Vec<String> {
        items.iter().map(|item| item.text.clone()).collect()
    };
    assert_eq!(texts(&all), ["newest", "middle", "oldest"]);
    assert_eq!(texts(&limited), ["newest", "middle"]);
}

#[rstest]
fn equal_timestamps_fall_back_to_insertion_order(context: Option<TestContext>) {
    let Some(context) = context else { return };
    for (id, text) in [
        ("confession_5_aaaaaaaaa", "first"),
        ("confession_5_bbbbbbbbb", "second"),
    ] {
        context
            .block_on(context.repository.insert(&confession(id, text, base_time())))
            .expect("insert succeeds");
    }

    let listed = context
        .block_on(context.repository.list_recent(ListLimit::default()))
        .expect("list");

    let texts: Vec<&str> = listed.iter().map(|item| item.text.as_str()).collect();
    assert_eq!(texts, ["second", "first"]);
}

#[rstest]
fn duplicate_identifiers_are_reported(context: Option<TestContext>) {
    let Some(context) = context else { return };
    let original = confession("confession_7_aaaaaaaaa", "original", base_time());
    context
        .block_on(context.repository.insert(&original))
        .expect("first insert succeeds");

    let err = context
        .block_on(context.repository.insert(&confession(
            "confession_7_aaaaaaaaa",
            "copy",
            base_time(),
        )))
        .expect_err("duplicate insert fails");

    assert_eq!(
        err,
        ConfessionRepositoryError::duplicate_id("confession_7_aaaaaaaaa")
    );
}

#[rstest]
fn null_columns_are_read_back_with_defaults(context: Option<TestContext>) {
    let Some(context) = context else { return };
    let mut client = Client::connect(context.database_url.as_str(), NoTls)
        .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)));
    client
        .execute(
            "INSERT INTO confessions (confession_id, confession) VALUES ($1, $2)",
            &[&"confession_9_legacyrow", &"written before categories existed"],
        )
        .unwrap_or_else(|err| panic!("insert: {}", format_postgres_error(&err)));

    let listed = context
        .block_on(context.repository.list_recent(ListLimit::default()))
        .expect("list");

    let [row] = listed.as_slice() else {
        panic!("expected one row, got {}", listed.len());
    };
    assert_eq!(row.category, DEFAULT_CATEGORY);
    assert_eq!(row.recipient, DEFAULT_RECIPIENT);
}

#[rstest]
fn legacy_identifiers_do_not_break_listings(context: Option<TestContext>) {
    let Some(context) = context else { return };
    context
        .block_on(context.repository.insert(&confession(
            "confession_10_aaaaaaaaa",
            "current row",
            base_time(),
        )))
        .expect("insert succeeds");
    let mut client = Client::connect(context.database_url.as_str(), NoTls)
        .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)));
    client
        .execute(
            "INSERT INTO confessions (confession_id, confession, created_at) \
             VALUES ($1, $2, TIMESTAMPTZ '2025-05-03 10:00:00+00')",
            &[&"legacy ", &"stored before ids were checked"],
        )
        .unwrap_or_else(|err| panic!("insert: {}", format_postgres_error(&err)));

    let listed = context
        .block_on(context.repository.list_recent(ListLimit::default()))
        .expect("list");

    let ids: Vec<&str> = listed.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["confession_10_aaaaaaaaa", "legacy "]);
}

#[rstest]
fn service_round_trip_through_postgres(context: Option<TestContext>) {
    let Some(context) = context else { return };
    let clock = Arc::new(FixtureClock::new(base_time()));
    let service = ConfessionService::new(Arc::new(context.repository.clone()), clock);

    context
        .block_on(service.ensure_schema())
        .expect("schema ready");
    let stored = context
        .block_on(service.submit(SubmissionDraft {
            category: Some("  ".to_owned()),
            ..SubmissionDraft::with_text("  I never read the manual  ")
        }))
        .expect("submission stored");
    let listed = context
        .block_on(service.list_recent(ListLimit::default()))
        .expect("listing");

    assert_eq!(stored.text, "I never read the manual");
    assert_eq!(stored.category, DEFAULT_CATEGORY);
    assert_eq!(stored.created_at, base_time());
    assert_eq!(listed, vec![stored]);
}

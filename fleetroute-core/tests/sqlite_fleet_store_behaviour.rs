//! Behavioural tests for `SqliteFleetStore` using rstest-bdd.

use std::{cell::RefCell, path::PathBuf};

use fleetroute_core::{
    Customer, FleetStore, Problem, SolveError, SolveErrorKind, SqliteFleetStore,
    SqliteFleetStoreError, Vehicle, test_support::write_fleet_database,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

/// Shared state for SQLite fleet scenarios.
#[derive(Debug)]
struct FleetStoreWorld {
    temp_dir: TempDir,
    path: RefCell<Option<PathBuf>>,
    store: RefCell<Option<SqliteFleetStore>>,
    open_error: RefCell<Option<SqliteFleetStoreError>>,
    loaded: RefCell<Option<Result<Problem, SolveError>>>,
}

impl FleetStoreWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            path: RefCell::new(None),
            store: RefCell::new(None),
            open_error: RefCell::new(None),
            loaded: RefCell::new(None),
        }
    }

    fn database_path(&self) -> PathBuf {
        self.temp_dir.path().join("fleet.db")
    }

    fn expect_path(&self) -> PathBuf {
        self.path
            .borrow()
            .clone()
            .expect("database should be written before opening the store")
    }
}

#[fixture]
fn world() -> FleetStoreWorld {
    FleetStoreWorld::new()
}

#[given("a SQLite fleet database with a depot, two customers and one vehicle")]
fn given_fleet(world: &FleetStoreWorld) {
    let path = world.database_path();
    write_fleet_database(
        &path,
        &[
            Customer::from_lat_lon(30, 52.52, 13.41, 4),
            Customer::from_lat_lon(10, 52.50, 13.40, 0),
            Customer::from_lat_lon(20, 52.51, 13.39, 3),
        ],
        &[Vehicle::new(1, 10)],
    )
    .expect("persist fleet");
    world.path.replace(Some(path));
}

#[given("an empty SQLite database")]
fn given_empty_database(world: &FleetStoreWorld) {
    let path = world.database_path();
    rusqlite::Connection::open(&path).expect("create database");
    world.path.replace(Some(path));
}

#[given("a SQLite fleet database whose customer has negative demand")]
fn given_negative_demand(world: &FleetStoreWorld) {
    let path = world.database_path();
    write_fleet_database(&path, &[Customer::from_lat_lon(1, 0.0, 0.0, 0)], &[
        Vehicle::new(1, 5),
    ])
    .expect("persist fleet");
    let connection = rusqlite::Connection::open(&path).expect("open database");
    connection
        .execute(
            "INSERT INTO customer (id, name, latitude, longitude, demand) \
             VALUES (2, 'broken', 0.0, 0.0, -1)",
            [],
        )
        .expect("insert broken row");
    world.path.replace(Some(path));
}

#[when("I open the SQLite fleet store")]
fn open_store(world: &FleetStoreWorld) {
    match SqliteFleetStore::open(world.expect_path()) {
        Ok(store) => {
            world.store.replace(Some(store));
        }
        Err(err) => {
            world.open_error.replace(Some(err));
        }
    }
}

#[when("I load the problem")]
fn load_problem(world: &FleetStoreWorld) {
    let outcome = {
        let borrowed = world.store.borrow();
        let store = borrowed.as_ref().expect("store should be open");
        store.load_problem()
    };
    world.loaded.replace(Some(outcome));
}

#[then("the depot is the customer with the lowest id")]
fn then_depot_first(world: &FleetStoreWorld) {
    let loaded = world.loaded.borrow();
    let problem = loaded
        .as_ref()
        .and_then(|outcome| outcome.as_ref().ok())
        .expect("problem should load");
    assert_eq!(problem.depot().map(|depot| depot.id), Some(10));
    let ids: Vec<_> = problem.customers().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
}

#[then("the problem validates")]
fn then_problem_validates(world: &FleetStoreWorld) {
    let loaded = world.loaded.borrow();
    let problem = loaded
        .as_ref()
        .and_then(|outcome| outcome.as_ref().ok())
        .expect("problem should load");
    assert!(problem.validate().is_ok());
}

#[then("opening fails with a missing table error")]
fn then_missing_table(world: &FleetStoreWorld) {
    let binding = world.open_error.borrow();
    let error = binding.as_ref().expect("an error should be recorded");
    assert!(matches!(error, SqliteFleetStoreError::MissingTable { .. }));
}

#[then("loading fails with a store error")]
fn then_store_error(world: &FleetStoreWorld) {
    let loaded = world.loaded.borrow();
    let error = loaded
        .as_ref()
        .and_then(|outcome| outcome.as_ref().err())
        .expect("loading should fail");
    assert_eq!(error.kind(), SolveErrorKind::Store);
}

#[scenario(path = "tests/features/sqlite_fleet_store.feature", index = 0)]
fn problem_loaded(world: FleetStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_fleet_store.feature", index = 1)]
fn missing_tables(world: FleetStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_fleet_store.feature", index = 2)]
fn negative_demand(world: FleetStoreWorld) {
    let _ = world;
}

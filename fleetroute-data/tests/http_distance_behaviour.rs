//! Behavioural tests for [`HttpDistanceProvider`] against a canned OSRM
//! service on a loopback port.

mod support;

use std::cell::RefCell;
use std::time::Duration;

use fleetroute_core::{DistanceError, DistanceMatrix, DistanceProvider};
use fleetroute_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use support::StubOsrmServer;

#[derive(Debug, Default)]
struct ProviderWorld {
    server: RefCell<Option<StubOsrmServer>>,
    max_attempts: RefCell<Option<u32>>,
    max_in_flight: RefCell<Option<usize>>,
    inside_current_thread_runtime: RefCell<bool>,
    result: RefCell<Option<Result<DistanceMatrix, DistanceError>>>,
}

impl ProviderWorld {
    fn start_server(&self, status: u16, body: &str) {
        self.server.replace(Some(StubOsrmServer::start(status, body)));
    }

    fn request(&self, count: usize) {
        let server = self.server.borrow();
        let base_url = server
            .as_ref()
            .map(StubOsrmServer::base_url)
            .expect("server must be started");
        let mut config = HttpDistanceProviderConfig::new(base_url)
            .with_timeout(Duration::from_secs(5))
            .with_retry_backoff(Duration::from_millis(1));
        if let Some(attempts) = *self.max_attempts.borrow() {
            config = config.with_max_attempts(attempts);
        }
        if let Some(window) = *self.max_in_flight.borrow() {
            config = config.with_max_in_flight(window);
        }
        let provider = HttpDistanceProvider::with_config(config).expect("provider should build");
        let locations: Vec<Coord<f64>> = (0..count)
            .map(|i| Coord {
                x: -0.1 + 0.01 * i as f64,
                y: 51.5,
            })
            .collect();
        let result = if *self.inside_current_thread_runtime.borrow() {
            let caller = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("caller runtime should build");
            caller.block_on(async { provider.distance_matrix(&locations) })
        } else {
            provider.distance_matrix(&locations)
        };
        self.result.replace(Some(result));
    }

    fn matrix(&self) -> DistanceMatrix {
        match self.result.borrow().as_ref().expect("result recorded") {
            Ok(matrix) => matrix.clone(),
            Err(err) => panic!("expected a matrix, got {err}"),
        }
    }

    fn error(&self) -> DistanceError {
        match self.result.borrow().as_ref().expect("result recorded") {
            Ok(matrix) => panic!("expected an error, got {matrix:?}"),
            Err(err) => err.clone(),
        }
    }
}

#[fixture]
fn world() -> ProviderWorld {
    ProviderWorld::default()
}

// --- Given steps ---

#[given("a routing service answering {distance} metres")]
fn service_answering(world: &ProviderWorld, distance: f64) {
    let body = format!(r#"{{"code":"Ok","routes":[{{"distance":{distance},"duration":60.0}}]}}"#);
    world.start_server(200, &body);
}

#[given("a routing service reporting no route")]
fn service_without_route(world: &ProviderWorld) {
    world.start_server(200, r#"{"code":"NoRoute","message":"Impossible route between points"}"#);
}

#[given("a routing service that is unavailable")]
fn service_unavailable(world: &ProviderWorld) {
    world.start_server(503, r#"{"code":"Error"}"#);
}

#[given("a routing service rejecting queries")]
fn service_rejecting(world: &ProviderWorld) {
    world.start_server(400, r#"{"code":"InvalidQuery","message":"Query string malformed"}"#);
}

#[given("the provider makes at most {attempts} attempts per pair with {window} query in flight")]
fn provider_limits(world: &ProviderWorld, attempts: u32, window: usize) {
    world.max_attempts.replace(Some(attempts));
    world.max_in_flight.replace(Some(window));
}

#[given("the caller is driven by a single-threaded Tokio runtime")]
fn caller_in_current_thread_runtime(world: &ProviderWorld) {
    world.inside_current_thread_runtime.replace(true);
}

// --- When steps ---

#[when("I request distances for three locations")]
fn request_three(world: &ProviderWorld) {
    world.request(3);
}

#[when("I request distances for two locations")]
fn request_two(world: &ProviderWorld) {
    world.request(2);
}

// --- Then steps ---

#[then("every off-diagonal cell is {metres} metres")]
fn off_diagonal_cells(world: &ProviderWorld, metres: u64) {
    let matrix = world.matrix();
    for from in 0..matrix.size() {
        for to in (0..matrix.size()).filter(|&to| to != from) {
            assert_eq!(matrix.get(from, to), Some(metres), "cell ({from}, {to})");
        }
    }
}

#[then("the diagonal is zero")]
fn diagonal_is_zero(world: &ProviderWorld) {
    let matrix = world.matrix();
    for node in 0..matrix.size() {
        assert_eq!(matrix.get(node, node), Some(0));
    }
}

#[then("the routing service received {count} requests")]
fn request_count(world: &ProviderWorld, count: usize) {
    let server = world.server.borrow();
    let served = server
        .as_ref()
        .map(StubOsrmServer::request_count)
        .expect("server must be started");
    assert_eq!(served, count);
}

#[then("a no route error is returned")]
fn no_route(world: &ProviderWorld) {
    let err = world.error();
    assert!(
        matches!(err, DistanceError::NoRoute { .. }),
        "expected NoRoute, got {err:?}"
    );
}

#[then("an HTTP error with status {status} is returned")]
fn http_error(world: &ProviderWorld, status: u16) {
    let err = world.error();
    assert!(
        matches!(err, DistanceError::HttpError { status: found, .. } if found == status),
        "expected HTTP {status}, got {err:?}"
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/http_distance_provider.feature", name = $title)]
        fn $fn_name(world: ProviderWorld) {
            let _ = world;
        }
    };
}

register_scenario!(route_distances_fill_matrix, "Route distances fill the matrix");
register_scenario!(missing_route_fails, "A missing route fails the matrix");
register_scenario!(
    failing_service_is_retried,
    "A failing service is retried before giving up"
);
register_scenario!(rejected_query_not_retried, "A rejected query is not retried");
register_scenario!(
    current_thread_caller_is_served,
    "A caller inside a single-threaded runtime receives the matrix"
);

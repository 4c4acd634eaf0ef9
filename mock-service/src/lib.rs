//! Mock FHIR conversion service.
//!
//! Serves the health and conversion routes of the real API, plus prefixed variants that
//! misbehave on purpose:
//!
//! - `/api/v1/health/check` and `/api/v1/convert/{hl7v2,ccda,json}-to-fhir`
//! - `/unhealthy/api/v1/health/check` always answers 503
//! - `/flaky/:failures/scenario/:name/api/v1/convert/:route` fails the first `failures`
//!   requests of each scenario name with a 500
//! - `/max/:max_tps/scenario/:name/api/v1/convert/:route` fails with a 500 once the
//!   scenario exceeds `max_tps`
//!
//! Every conversion route takes optional `delay_ms` and `jitter_ms` query parameters.
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use lazy_static::lazy_static;
#[allow(unused)]
use metrics::{counter, gauge, histogram};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::{
    num::NonZeroU32,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, PoisonError, RwLock,
    },
    time::Duration,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const HEALTH_PATH: &str = "/api/v1/health/check";

pub fn router() -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route("/unhealthy/api/v1/health/check", get(unhealthy))
        .route("/api/v1/convert/:route", post(convert))
        .route(
            "/flaky/:failures/scenario/:scenario_name/api/v1/convert/:route",
            post(flaky),
        )
        .route(
            "/max/:max_tps/scenario/:scenario_name/api/v1/convert/:route",
            post(max),
        )
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> anyhow::Result<()> {
    axum::serve(listener, router()).await?;
    Ok(())
}

/// Serves on an ephemeral localhost port in the background and returns its address.
pub async fn spawn() -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = run(listener).await {
            tracing::error!("Mock service stopped: {err}");
        }
    });
    Ok(addr)
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    #[serde(default)]
    pub input_data_format: String,
    #[serde(default)]
    pub input_data_string: String,
    #[serde(default)]
    pub root_template_name: Option<String>,
    #[serde(default)]
    pub include_trace_info: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct Latency {
    pub delay_ms: Option<u64>,
    pub jitter_ms: Option<u64>,
}

impl Latency {
    fn sample(&self) -> Duration {
        let delay = self.delay_ms.unwrap_or(0) as f64;
        let jittered = match self.jitter_ms {
            Some(jitter) if jitter > 0 => Normal::new(delay, jitter as f64)
                .map(|dist| dist.sample(&mut rand::thread_rng()))
                .unwrap_or(delay),
            _ => delay,
        };
        Duration::from_secs_f64(jittered.max(0.) / 1000.)
    }
}

type Problem = (StatusCode, Json<Value>);

fn problem(status: StatusCode, title: &str, detail: impl Into<String>) -> Problem {
    (
        status,
        Json(json!({
            "title": title,
            "detail": detail.into(),
            "status": status.as_u16(),
        })),
    )
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "Healthy" }))
}

pub async fn unhealthy() -> Problem {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "status": "Unhealthy" })),
    )
}

pub async fn convert(
    Path(route): Path<String>,
    Query(latency): Query<Latency>,
    Json(request): Json<ConversionRequest>,
) -> Result<Json<Value>, Problem> {
    TPS_MEASURE.fetch_add(1, Ordering::Relaxed);
    counter!("mock_service.convert", "route" => route.clone()).increment(1);

    tokio::time::sleep(latency.sample()).await;
    respond(&route, &request)
}

/// Checks the request the way the real API's model binding does and returns a stub bundle.
fn respond(route: &str, request: &ConversionRequest) -> Result<Json<Value>, Problem> {
    let expected = match route {
        "hl7v2-to-fhir" => "Hl7v2",
        "ccda-to-fhir" => "Ccda",
        "json-to-fhir" => "Json",
        _ => {
            return Err(problem(
                StatusCode::NOT_FOUND,
                "Unknown conversion",
                format!("No conversion route `{route}`."),
            ))
        }
    };

    if request.input_data_string.is_empty() {
        return Err(problem(
            StatusCode::BAD_REQUEST,
            "Invalid request",
            "InputDataString is required.",
        ));
    }
    if request.input_data_format != expected {
        return Err(problem(
            StatusCode::BAD_REQUEST,
            "Invalid request",
            format!(
                "Expected inputDataFormat {expected}, found `{}`.",
                request.input_data_format
            ),
        ));
    }

    Ok(Json(json!({
        "result": {
            "resourceType": "Bundle",
            "type": "batch",
            "entry": [],
        }
    })))
}

lazy_static! {
    static ref FLAKY_MAP: RwLock<HashMap<String, Arc<AtomicU64>>> = RwLock::new(HashMap::new());
}

pub async fn flaky(
    Path((failures, scenario_name, route)): Path<(u64, String, String)>,
    Query(latency): Query<Latency>,
    Json(request): Json<ConversionRequest>,
) -> Result<Json<Value>, Problem> {
    TPS_MEASURE.fetch_add(1, Ordering::Relaxed);
    tokio::time::sleep(latency.sample()).await;

    let existing = FLAKY_MAP
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&scenario_name)
        .cloned();
    let seen = match existing {
        Some(seen) => seen,
        None => FLAKY_MAP
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(scenario_name.clone())
            .or_default()
            .clone(),
    };

    let idx = seen.fetch_add(1, Ordering::SeqCst);
    if idx < failures {
        debug!("Failing request {idx} of {scenario_name}");
        return Err(problem(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Conversion failed",
            format!("Injected failure {} of {failures}", idx + 1),
        ));
    }

    respond(&route, &request)
}

/// Flaky-route requests received so far for `scenario_name`.
pub fn flaky_calls(scenario_name: &str) -> u64 {
    FLAKY_MAP
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(scenario_name)
        .map_or(0, |seen| seen.load(Ordering::SeqCst))
}

lazy_static! {
    static ref MAX_MAP: RwLock<HashMap<String, Arc<DefaultDirectRateLimiter>>> =
        RwLock::new(HashMap::new());
}

pub async fn max(
    Path((max_tps, scenario_name, route)): Path<(u32, String, String)>,
    Query(latency): Query<Latency>,
    Json(request): Json<ConversionRequest>,
) -> Result<Json<Value>, Problem> {
    TPS_MEASURE.fetch_add(1, Ordering::Relaxed);
    tokio::time::sleep(latency.sample()).await;

    let existing = MAX_MAP
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&scenario_name)
        .cloned();
    let limiter = match existing {
        Some(limiter) => limiter,
        None => MAX_MAP
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(scenario_name)
            .or_insert_with(|| Arc::new(rate_limiter(max_tps)))
            .clone(),
    };

    if limiter.check().is_err() {
        return Err(problem(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Conversion failed",
            "Service is saturated.",
        ));
    }

    respond(&route, &request)
}

/** Utils **/

pub fn rate_limiter(tps: u32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(NonZeroU32::new(tps).unwrap_or(NonZeroU32::MIN)))
}

/** TPS Printer **/

static TPS_MEASURE: AtomicU64 = AtomicU64::new(0);

pub async fn tps_measure_task() {
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let transactions = TPS_MEASURE.swap(0, Ordering::Relaxed);
        if transactions > 0 {
            println!("{transactions} TPS");
        }
        gauge!("mock_service.tps").set(transactions as f64);
    }
}

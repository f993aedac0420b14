use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use claims_engine::claims::{
    claims_router, directory_from_path, ClaimValidationEngine, ClaimValidationService,
    EngineConfig, HashingEmbedder, LogNotifier, MemoryPolicyStore, PolicySnapshot, SegmentedClaim,
};
use claims_engine::config::AppConfig;
use claims_engine::error::AppError;
use claims_engine::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Claims Validation Engine",
    about = "Validate and score insurance claims from the command line or as an HTTP service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate a single claim file against a policy file and print the result
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// JSON file with an array of policy snapshots to preload
    #[arg(long)]
    policies: Option<PathBuf>,
    /// CSV export of network hospitals (Hospital Name column)
    #[arg(long)]
    network_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// JSON file containing the segmented claim
    #[arg(long)]
    claim: PathBuf,
    /// JSON file containing the policy snapshot
    #[arg(long)]
    policy: PathBuf,
    /// CSV export of network hospitals (Hospital Name column)
    #[arg(long)]
    network_csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Validate(args) => run_validate(args),
    }
}

fn build_engine(network_csv: Option<&PathBuf>) -> Result<ClaimValidationEngine, AppError> {
    let engine = ClaimValidationEngine::new(EngineConfig::default());
    match network_csv {
        Some(path) => {
            let directory = directory_from_path(path)
                .map_err(|err| AppError::Input(format!("network csv: {err}")))?;
            Ok(engine.with_network(directory))
        }
        None => Ok(engine),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let policies_file = args.policies.take().or_else(|| config.data.policies_file.clone());
    let network_csv = args.network_csv.take().or_else(|| config.data.network_csv.clone());

    let store = Arc::new(MemoryPolicyStore::new());
    if let Some(path) = &policies_file {
        let raw = std::fs::read_to_string(path)?;
        let policies: Vec<PolicySnapshot> = serde_json::from_str(&raw)
            .map_err(|err| AppError::Input(format!("policies file: {err}")))?;
        let count = policies.len();
        for policy in policies {
            store.insert(policy);
        }
        info!(count, "preloaded policy snapshots");
    }

    let engine = build_engine(network_csv.as_ref())?;
    let service = Arc::new(ClaimValidationService::new(
        store,
        Arc::new(HashingEmbedder::default()),
        Arc::new(LogNotifier),
        engine,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(claims_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(environment = config.environment.as_str(), %addr, "claim validation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let claim_raw = std::fs::read_to_string(&args.claim)?;
    let claim: SegmentedClaim = serde_json::from_str(&claim_raw)
        .map_err(|err| AppError::Input(format!("claim file: {err}")))?;

    let policy_raw = std::fs::read_to_string(&args.policy)?;
    let policy: PolicySnapshot = serde_json::from_str(&policy_raw)
        .map_err(|err| AppError::Input(format!("policy file: {err}")))?;

    let engine = build_engine(args.network_csv.as_ref())?;

    let store = Arc::new(MemoryPolicyStore::new());
    let policy_number = policy.policy_number.clone();
    store.insert(policy);

    let service = ClaimValidationService::new(
        store,
        Arc::new(HashingEmbedder::default()),
        Arc::new(LogNotifier),
        engine,
    );

    let evaluation = service.validate(&claim, &policy_number)?;
    render_evaluation(&evaluation);
    Ok(())
}

fn render_evaluation(evaluation: &claims_engine::claims::ClaimEvaluation) {
    let result = &evaluation.result;
    println!("Claim {}", evaluation.claim_id.0);
    println!("Policy {}", evaluation.policy_number);
    println!("Decision: {}", result.decision.label());
    println!(
        "Score: {:.2} ({}/{} checks passed)",
        result.overall_score, result.passed_checks, result.total_checks
    );

    println!("\nChecks");
    for (kind, passed) in result.checks() {
        println!(
            "- {}: {}",
            kind.label(),
            if passed { "pass" } else { "fail" }
        );
    }

    if result.validation_errors.is_empty() {
        println!("\nValidation errors: none");
    } else {
        println!("\nValidation errors");
        for error in &result.validation_errors {
            println!("- {error}");
        }
    }

    if !evaluation.coverage.reasons.is_empty() {
        println!("\nCoverage rationale");
        for reason in &evaluation.coverage.reasons {
            println!("- {reason}");
        }
    }

    println!("\nExclusion: {}", evaluation.exclusion.reason);

    if let Some(total) = evaluation.pricing.total_amount {
        println!("Claim total considered: {total:.0}");
    }
    if let Some(best) = &evaluation.hospital.best_match {
        println!(
            "Closest network hospital: {} (score {:.2})",
            best, evaluation.hospital.final_score
        );
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

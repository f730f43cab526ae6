use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use vendor_trust::config::AppConfig;
use vendor_trust::error::AppError;
use vendor_trust::telemetry;
use vendor_trust::workflows::trust::{
    trust_router, MemoryProfileStore, ProfileRecord, ProfileStore, RecordingVerificationQueue,
    RecoveryGoal, ScoreBreakdown, ScriptedRecalculation, StampingRecalculator, TrustProfileService,
    TrustProfileView, TrustServiceError, TrustTier, VendorId, VendorTrustProfile,
};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Vendor Trust Service",
    about = "Run the marketplace vendor trust and reputation engine from the command line",
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
    /// Inspect and exercise the trust engine locally
    Trust {
        #[command(subcommand)]
        command: TrustCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum TrustCommand {
    /// Walk a distressed vendor through goal generation, progress, and
    /// recovery completion against an in-memory store
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Vendor identifier used for the walkthrough
    #[arg(long, default_value = "vendor-demo")]
    vendor_id: String,
    /// Stored trust score at the start of the walkthrough
    #[arg(long, default_value_t = 52)]
    trust_score: u8,
    /// Fulfilled order count on the snapshot
    #[arg(long, default_value_t = 1)]
    orders_fulfilled: u32,
    /// Open dispute count on the snapshot
    #[arg(long, default_value_t = 2)]
    disputes_count: u32,
    /// Positive review count on the snapshot
    #[arg(long, default_value_t = 1)]
    positive_reviews: u32,
    /// Warning count on the snapshot
    #[arg(long, default_value_t = 1)]
    warnings_count: u32,
    /// Treat the latest policies as acknowledged
    #[arg(long)]
    acknowledged_policies: bool,
    /// Score the recalculation service reports once recovery completes
    #[arg(long, default_value_t = 78)]
    recovered_score: u8,
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
        Command::Trust {
            command: TrustCommand::Demo(args),
        } => run_trust_demo(args),
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let store = Arc::new(MemoryProfileStore::default());
    let recalculator = Arc::new(StampingRecalculator::new(store.as_ref().clone()));
    let verification = Arc::new(RecordingVerificationQueue::default());
    let service = Arc::new(TrustProfileService::new(store, recalculator, verification));

    let infra = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state);

    let app = trust_router(service).merge(infra).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "vendor trust service ready");

    axum::serve(listener, app).await?;
    Ok(())
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

struct DemoTranscript {
    initial: TrustProfileView,
    breakdown: ScoreBreakdown,
    generated_goals: Vec<RecoveryGoal>,
    progress_after_updates: f32,
    final_record: ProfileRecord,
    verification_queued: bool,
}

fn run_trust_demo(args: DemoArgs) -> Result<(), AppError> {
    let transcript = demo_walkthrough(&args)?;
    render_demo(&args, &transcript);
    Ok(())
}

fn demo_walkthrough(args: &DemoArgs) -> Result<DemoTranscript, TrustServiceError> {
    let store = Arc::new(MemoryProfileStore::default());
    let recalculator = Arc::new(StampingRecalculator::new(store.as_ref().clone()));
    let verification = Arc::new(RecordingVerificationQueue::default());
    let service = TrustProfileService::new(
        store.clone(),
        recalculator.clone(),
        verification.clone(),
    );

    let vendor_id = VendorId(args.vendor_id.clone());
    let mut profile = VendorTrustProfile::provisioned(vendor_id.clone(), Utc::now());
    profile.trust_score = args.trust_score;
    profile.trust_tier = TrustTier::UnderReview;
    profile.orders_fulfilled = args.orders_fulfilled;
    profile.disputes_count = args.disputes_count;
    profile.positive_reviews = args.positive_reviews;
    profile.warnings_count = args.warnings_count;
    profile.acknowledged_latest_policies = args.acknowledged_policies;
    profile.trust_recovery_active = true;
    profile.trust_recovery_start = Some(Utc::now());
    profile.trust_score_last_drop_reason = Some("Dispute volume spike".to_string());
    store.insert(profile)?;

    let initial = service.profile(&vendor_id)?.trust_view();
    let breakdown = service.breakdown(&vendor_id)?;

    let generated = service.generate_goals(&vendor_id)?;
    let generated_goals = generated.profile.trust_recovery_goals.clone();

    let mut progress_after_updates = generated.profile.trust_recovery_progress;
    for (index, goal) in generated_goals.iter().enumerate() {
        let updated = service.update_goal_progress(&vendor_id, index, goal.target_value)?;
        progress_after_updates = updated.profile.trust_recovery_progress;
    }

    recalculator.script(ScriptedRecalculation {
        trust_score: args.recovered_score,
        trust_tier: TrustTier::NewOrImproving,
        drop_reason: None,
        activate_recovery: false,
    });
    let final_record = service.complete_recovery(&vendor_id)?;

    let verification_queued = if vendor_trust::workflows::trust::verification_eligible(
        &final_record.profile,
    ) {
        service.request_verification(&vendor_id)?;
        true
    } else {
        false
    };

    Ok(DemoTranscript {
        initial,
        breakdown,
        generated_goals,
        progress_after_updates,
        final_record,
        verification_queued,
    })
}

fn render_demo(args: &DemoArgs, transcript: &DemoTranscript) {
    println!("Vendor trust recovery demo");
    println!(
        "Vendor {}: score {}, tier {}",
        args.vendor_id, transcript.initial.trust_score, transcript.initial.tier.label
    );
    if let Some(reason) = &transcript.initial.last_drop_reason {
        println!("Last score drop: {reason}");
    }

    println!("\nScore breakdown (display estimate)");
    for component in &transcript.breakdown.components {
        println!(
            "- {}: {}/{} ({})",
            component.factor.label(),
            component.points,
            component.max_points,
            component.notes
        );
    }
    println!("Estimated total: {}/100", transcript.breakdown.total);

    println!("\nGenerated recovery goals");
    if transcript.generated_goals.is_empty() {
        println!("- none; nothing needs remediation");
    }
    for goal in &transcript.generated_goals {
        println!(
            "- [{}] {} ({}/{})",
            goal.kind.label(),
            goal.description,
            goal.current_value,
            goal.target_value
        );
    }

    println!(
        "\nProgress after walking every goal to target: {:.0}%",
        transcript.progress_after_updates
    );

    let profile = &transcript.final_record.profile;
    println!("\nAfter completion");
    println!(
        "- score {}, tier {}, recovery active: {}, recovery completed: {}",
        profile.trust_score,
        profile.trust_tier.label(),
        profile.trust_recovery_active,
        profile.trust_recovery_completed
    );
    if transcript.verification_queued {
        println!("- verification request queued for human review");
    } else {
        println!("- vendor not yet eligible for verification");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_args() -> DemoArgs {
        DemoArgs {
            vendor_id: "vendor-demo".to_string(),
            trust_score: 52,
            orders_fulfilled: 1,
            disputes_count: 2,
            positive_reviews: 1,
            warnings_count: 1,
            acknowledged_policies: false,
            recovered_score: 78,
        }
    }

    #[test]
    fn demo_walkthrough_reaches_completion() {
        let transcript = demo_walkthrough(&demo_args()).expect("walkthrough succeeds");

        assert_eq!(transcript.generated_goals.len(), 6);
        assert_eq!(transcript.progress_after_updates, 100.0);
        assert!(!transcript.final_record.profile.trust_recovery_active);
        assert!(transcript.final_record.profile.trust_recovery_completed);
        assert_eq!(transcript.final_record.profile.trust_score, 78);
        assert!(transcript.verification_queued);
    }

    #[test]
    fn demo_walkthrough_skips_verification_below_floor() {
        let mut args = demo_args();
        args.recovered_score = 60;
        let transcript = demo_walkthrough(&args).expect("walkthrough succeeds");

        assert!(!transcript.verification_queued);
        assert_eq!(transcript.final_record.profile.trust_score, 60);
    }
}

mod agents;
mod cli;
mod config;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod render;
mod routes;
mod sources;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agents::llm::LlmAgentInvoker;
use crate::agents::AgentInvoker;
use crate::cli::{Cli, Command, RunArgs, ServeArgs};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pipeline::driver::PipelineDriver;
use crate::pipeline::StageContext;
use crate::render::sink::FileArtifactSink;
use crate::routes::build_router;
use crate::sources::load_inputs;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    let filter = if cli.verbose {
        EnvFilter::new(format!("{}=debug", env!("CARGO_PKG_NAME")))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        })
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tailor v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Run(args) => run_once(config, args).await,
        Command::Serve(args) => serve(config, args).await,
    }
}

fn build_agent(config: &Config, timeout: Duration) -> Result<Arc<dyn AgentInvoker>> {
    let llm = LlmClient::new(config.anthropic_api_key.clone(), timeout)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    Ok(Arc::new(LlmAgentInvoker::new(llm)))
}

/// One pipeline run over local files.
async fn run_once(config: Config, args: RunArgs) -> Result<()> {
    let timeout = args
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(config.agent_timeout);
    let agent = build_agent(&config, timeout)?;

    let inputs = load_inputs(&args.resume, &args.job).await?;
    let sink = FileArtifactSink::new(
        args.report_path(&config.output_dir),
        args.tailored_path(&config.output_dir),
    );

    let mut driver = PipelineDriver::new(StageContext::new(agent, timeout));
    let outcome = match driver.run(&inputs, &sink).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(
                "Run {} stopped at {:?} after {:?}",
                driver.run_id(),
                driver.failed_at(),
                driver.history()
            );
            if let Some(raw) = e.source.raw_response() {
                error!("Raw agent response:\n{raw}");
            }
            return Err(e.into());
        }
    };

    info!("Run {} finished in state {}", outcome.run_id, driver.state());
    println!("Process completed. Tailored resume and report generated.");
    println!(
        "  Fit score: {} -> {} ({:+})",
        outcome.report.base_match_result.fit_score_overall,
        outcome.report.final_match_result.fit_score_overall,
        outcome.report.score_delta()
    );
    println!("  Report:  {}", outcome.published.report_path.display());
    println!("  Resume:  {}", outcome.published.resume_path.display());
    if !outcome.warnings.is_empty() {
        println!("  {} plan warnings (see log)", outcome.warnings.len());
    }
    Ok(())
}

/// HTTP service mode.
async fn serve(config: Config, args: ServeArgs) -> Result<()> {
    let agent = build_agent(&config, config.agent_timeout)?;
    let port = args.port.unwrap_or(config.port);
    info!(
        "Agent timeout {}s, artifacts under {}",
        config.agent_timeout.as_secs(),
        config.output_dir.display()
    );

    let state = AppState { agent, config };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once a browser client exists

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

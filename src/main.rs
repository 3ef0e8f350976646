use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url_guard::config::{Config, DEFAULT_ENDPOINT};
use url_guard::form::{prompt_for, UrlCheckForm};
use url_guard::server::{self, AppState};
use url_guard::threat::ThreatClient;
use url_guard::types::{CheckReply, CheckStatus};
use url_guard::panels;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// url-guard: check URLs against a threat-intelligence API, with a tiny embedded web UI.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "url-guard",
    version,
    about = "Check URLs against a threat-intelligence API, with a tiny embedded web UI.",
    long_about = None
)]
struct Cli {
    /// URL to check once and print the verdict for.
    #[arg(long)]
    url: Option<String>,

    /// Write the check reply as pretty JSON to this path (optional).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the sample map marker and scam-category bar chart.
    #[arg(long = "show-panels", default_value_t = false)]
    show_panels: bool,

    /// Start the embedded HTTP UI server.
    #[arg(long = "serve-ui", default_value_t = false)]
    serve_ui: bool,

    /// Address for the UI server.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Directory holding the static UI files.
    #[arg(long = "ui-dir", default_value = "ui")]
    ui_dir: PathBuf,

    /// Threat-intelligence API key.
    #[arg(long = "api-key", env = "SAFE_BROWSING_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Threat-intelligence lookup endpoint.
    #[arg(long, env = "SAFE_BROWSING_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Lookup request timeout in milliseconds.
    #[arg(long = "timeout-ms", default_value_t = 10_000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("url_guard=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    println!("url-guard configuration:");
    println!("  url          : {}", cli.url.as_deref().unwrap_or("<none>"));
    println!("  endpoint     : {}", cli.endpoint);
    println!(
        "  api_key      : {}",
        if cli.api_key.is_some() { "<set>" } else { "<missing>" }
    );
    println!("  timeout_ms   : {}", cli.timeout_ms);
    println!(
        "  output       : {}",
        cli.output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string())
    );
    println!("  serve_ui     : {}", cli.serve_ui);

    if cli.show_panels {
        print_panels();
    }

    if cli.url.is_none() && !cli.serve_ui {
        if !cli.show_panels {
            println!("\nNothing to do: pass --url, --show-panels or --serve-ui.");
        }
        return Ok(());
    }

    // Blank input gets the prompt without a lookup, so no key is needed.
    if !cli.serve_ui {
        if let Some(reply) = cli.url.as_deref().and_then(prompt_for) {
            report_reply(&reply, cli.output.as_deref());
            return Ok(());
        }
    }

    let Some(api_key) = cli.api_key.clone() else {
        bail!("an API key is required (--api-key or SAFE_BROWSING_API_KEY)");
    };
    let config = Config::new(api_key)
        .with_endpoint(cli.endpoint.clone())
        .with_timeout(Duration::from_millis(cli.timeout_ms));
    let client = ThreatClient::new(&config)?;
    info!(?config, "configuration loaded");

    let mut form = UrlCheckForm::new(client);
    form.on_submit(|reply| info!(status = ?reply.status, "display updated"));

    let mut one_shot_failed = false;
    if let Some(url) = cli.url.as_deref() {
        let reply = form.submit(url).await;
        report_reply(&reply, cli.output.as_deref());
        one_shot_failed = reply.status == CheckStatus::Failed;
    }

    if cli.serve_ui {
        let state = AppState::new(form);
        println!("UI server starting at http://{} (Ctrl+C to stop)", cli.bind);
        tokio::select! {
            res = server::spawn_server(&cli.bind, state, &cli.ui_dir) => res?,
            _ = tokio::signal::ctrl_c() => info!("shutting down"),
        }
    }

    if one_shot_failed {
        bail!("URL check failed");
    }
    Ok(())
}

fn report_reply(reply: &CheckReply, output: Option<&Path>) {
    print_reply(reply);
    if let Some(path) = output {
        if let Err(e) = write_reply_json(path, reply) {
            eprintln!("Failed to write JSON to {}: {}", path.display(), e);
        } else {
            println!("Wrote JSON reply to {}", path.display());
        }
    }
}

fn print_reply(reply: &CheckReply) {
    println!("\nResult   : {:?}", reply.status);
    println!("Message  : {}", reply.message);
    if let Some(url) = &reply.url {
        println!("URL      : {url}");
    }
    if !reply.threat_types.is_empty() {
        println!("Threats  : {}", reply.threat_types.join(", "));
    }
}

fn print_panels() {
    println!("\nSample map marker:");
    for m in panels::map_markers() {
        println!("  ({}, {})  {}", m.lat, m.lon, m.label);
    }
    println!("\nScam reports by category:");
    print!("{}", panels::render_text_chart(40));
}

fn write_reply_json(path: &Path, reply: &CheckReply) -> anyhow::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, reply)?;
    Ok(())
}

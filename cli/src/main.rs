//! CLI entrypoint for conclave
//!
//! This is the main binary that wires together all layers using
//! dependency injection: configuration into the router, the router into
//! the council seats, and the seats into the use case.

use anyhow::{Context, Result, bail};
use clap::Parser;
use conclave_application::{
    CouncilPhase, ProgressNotifier, RetryPolicy, RunCouncilInput, RunCouncilUseCase,
};
use conclave_domain::{ConsensusRule, Family, UsageLedger};
use conclave_infrastructure::{ConfigLoader, JsonlUsageLog, ProviderRouter};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "conclave", about = "Multi-vendor LLM council with authority approval")]
struct Cli {
    /// The question to put before the council
    question: Option<String>,

    /// Run the delegated flow (sub-agent executes, authority approves)
    #[arg(long)]
    delegate: bool,

    /// Authority family (anthropic, deepseek, mistral, xai)
    #[arg(long)]
    authority: Option<String>,

    /// Consensus rule: unanimous or majority
    #[arg(long)]
    rule: Option<String>,

    /// Config file path (default: ~/.config/conclave/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append usage records to this JSONL file
    #[arg(long)]
    usage_log: Option<PathBuf>,

    /// Write tracing output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the provider catalog and key state, then exit
    #[arg(long)]
    providers: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Console progress: one line per phase event.
struct ConsoleProgress;

impl ProgressNotifier for ConsoleProgress {
    fn on_phase_start(&self, phase: &CouncilPhase, total_tasks: usize) {
        println!("[{}] started ({} tasks)", phase, total_tasks);
    }

    fn on_slot_complete(&self, _phase: &CouncilPhase, slot: u8, family: &Family, success: bool) {
        let mark = if success { "ok" } else { "failed" };
        println!("  seat {} ({}) {}", slot, family, mark);
    }

    fn on_phase_complete(&self, phase: &CouncilPhase) {
        println!("[{}] done", phase);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let _log_guard = match &cli.log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file = path.file_name().map(PathBuf::from).unwrap_or_default();
            let appender = tracing_appender::rolling::never(dir, file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    };

    info!("Starting conclave");

    // === Dependency Injection ===
    let config = ConfigLoader::load(cli.config.as_deref()).context("loading configuration")?;
    let ledger = Arc::new(UsageLedger::default());
    let router = ProviderRouter::new(config.catalog(), RetryPolicy::default(), Arc::clone(&ledger));
    config.apply_keys(&router);

    if cli.providers {
        let summary = router.providers_summary();
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            for entry in summary {
                println!(
                    "{:<10} default={} key={} url={}",
                    entry.family.to_string(),
                    entry.default_model,
                    if entry.key_configured { "set" } else { "missing" },
                    entry.base_url,
                );
            }
        }
        return Ok(());
    }

    let question = match cli.question {
        Some(q) if !q.trim().is_empty() => q,
        _ => bail!("Question is required. Try: conclave \"should we shard the index?\""),
    };

    let authority: Family = cli
        .authority
        .or(config.authority.clone())
        .unwrap_or_else(|| "anthropic".to_string())
        .parse()?;

    let rule: ConsensusRule = match cli.rule.or(config.rule.clone()) {
        Some(s) => s.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => ConsensusRule::default(),
    };

    let seats = router.assemble_council(authority.clone())?;
    let use_case = RunCouncilUseCase::new(seats);

    // Ctrl-C cancels between phases.
    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let input = RunCouncilInput::new(question)
        .with_rule(rule)
        .with_cancellation(cancellation);

    if !cli.quiet {
        println!("Council convened (authority: {}, rule: {})", authority, rule);
        println!();
    }

    let output_json = if cli.delegate {
        let result = if cli.quiet {
            use_case.delegate(input).await?
        } else {
            use_case.delegate_with_progress(input, &ConsoleProgress).await?
        };
        if !cli.quiet {
            print_verdict(result.approved_at, result.consensus.reached_at);
        }
        if !cli.json {
            println!("{}", result.output);
        }
        serde_json::to_value(&result)?
    } else {
        let result = if cli.quiet {
            use_case.decide(input).await?
        } else {
            use_case.decide_with_progress(input, &ConsoleProgress).await?
        };
        if !cli.quiet {
            print_verdict(result.approved_at, result.consensus.reached_at);
        }
        if !cli.json {
            println!("{}", result.output);
        }
        serde_json::to_value(&result)?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output_json)?);
    }

    if let Some(path) = &cli.usage_log
        && let Some(log) = JsonlUsageLog::new(path)
    {
        log.append_all(&ledger.history());
        info!(path = %path.display(), "usage records appended");
    }

    if !cli.quiet {
        print_spend(&ledger);
    }

    Ok(())
}

fn print_verdict(approved_at: Option<u8>, reached_at: Option<u8>) {
    println!();
    match reached_at {
        Some(round) => println!("Consensus reached in round {}", round),
        None => println!("No consensus after 3 rounds; proceeded with final positions"),
    }
    match approved_at {
        Some(exchange) => println!("Approved by the authority (exchange {})", exchange),
        None => println!("Not approved within 3 exchanges"),
    }
    println!();
}

fn print_spend(ledger: &UsageLedger) {
    let totals = ledger.totals_by_family();
    if totals.is_empty() {
        return;
    }
    println!();
    println!("Spend:");
    for (family, t) in &totals {
        println!(
            "  {:<10} {} req, {} in / {} out tokens, ${:.6}",
            family.to_string(),
            t.requests,
            t.input_tokens,
            t.output_tokens,
            t.cost,
        );
    }
    let tokens = ledger.total_tokens();
    println!(
        "  total      {} tokens, ${:.6}",
        tokens.total_tokens,
        ledger.total_cost()
    );
}

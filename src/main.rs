//! money-scanner: replay driver.
//!
//! Loads configuration, initialises structured logging, wires a scanner to
//! console labels and a tracking hub, then replays a session script (a file
//! path argument, or stdin) until it ends or Ctrl+C arrives.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, error, info};

use money_scanner::clock::ManualClock;
use money_scanner::config::{self, AppConfig};
use money_scanner::events::TrackingHub;
use money_scanner::export::{self, HistorySnapshot};
use money_scanner::presenter::{AudioCue, SharedToggle, TextLabel};
use money_scanner::replay::{ReplayRunner, ScriptParser};
use money_scanner::scanner::{MoneyScanner, ScannerBindings};

const BANNER: &str = r#"
  money-scanner: denomination counter
  replay mode: <seconds> status <target> <STATUS> | lost <target> | add | clear | auto on|off
"#;

/// Prints label text to stdout whenever it changes.
struct ConsoleLabel {
    last: String,
}

impl ConsoleLabel {
    fn new() -> Self {
        Self { last: String::new() }
    }
}

impl TextLabel for ConsoleLabel {
    fn set_text(&mut self, text: &str) {
        if self.last != text {
            println!("{text}");
            self.last = text.to_string();
        }
    }
}

/// Terminal bell.
struct BellCue;

impl AudioCue for BellCue {
    fn play(&self) {
        ring_bell(&mut std::io::stdout());
    }
}

/// Write a BEL to `out`. Failures are logged and reported, never fatal.
fn ring_bell(out: &mut impl Write) -> bool {
    match out.write_all(b"\x07").and_then(|()| out.flush()) {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Bell cue not played");
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load_or_default()?;
    init_logging();

    println!("{BANNER}");

    let registry = cfg.registry()?;
    let settings = cfg.settings()?;
    info!(
        denominations = registry.len(),
        cooldown_secs = cfg.scanner.cooldown_secs,
        auto_add = cfg.scanner.auto_add,
        config_env = config::CONFIG_PATH_ENV,
        "money-scanner starting up"
    );

    // -- Wire the scanner ------------------------------------------------

    let clock = ManualClock::new();
    let toggle = SharedToggle::new(cfg.scanner.auto_add);
    let mut bindings = ScannerBindings::new()
        .detected_label(ConsoleLabel::new())
        .total_label(ConsoleLabel::new())
        .auto_add_toggle(toggle.clone());
    if cfg.scanner.play_sound {
        bindings = bindings.add_cue(BellCue);
    }

    let scanner = Rc::new(RefCell::new(MoneyScanner::new(
        registry,
        settings,
        bindings,
        clock.clone(),
    )));
    let hub = TrackingHub::new();
    let subscription = MoneyScanner::attach(&scanner, &hub);

    // -- Replay ------------------------------------------------------------

    let input: Box<dyn AsyncRead + Unpin> = match std::env::args().nth(1) {
        Some(path) => Box::new(
            tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open session script: {path}"))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };
    let mut lines = BufReader::new(input).lines();
    let mut parser = ScriptParser::new();
    let mut runner = ReplayRunner::new(hub, clock, toggle);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let outcome: Result<()> = loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => match parser.feed(&line) {
                        Ok(Some(step)) => runner.apply(&scanner, &step),
                        Ok(None) => {}
                        Err(e) => break Err(e.into()),
                    },
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(anyhow::Error::new(e).context("Failed to read session script")),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break Ok(());
            }
        }
    };

    // Stop receiving tracking events before tearing down.
    subscription.cancel();
    let summary = runner.finish();

    if let Some(path) = cfg.export.history_path.as_deref() {
        let scanner = scanner.borrow();
        let snapshot = HistorySnapshot::new(scanner.total(), scanner.history());
        if let Err(e) = export::save_history(&snapshot, Some(path)) {
            error!(error = %e, "Failed to export history");
        }
    }

    info!(
        steps = summary.steps,
        additions = summary.additions,
        total = %summary.final_total,
        "money-scanner shut down cleanly."
    );

    outcome
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("money_scanner=info"));

    let json_logging = std::env::var("MONEY_SCANNER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

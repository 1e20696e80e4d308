use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use sens_probe::backends;
use sens_probe::config::AppConfig;
use sens_probe::core::{
    RateHint, Registry, Sampler, SelectionState, SensorDescriptor, SensorSession,
};
use sens_probe::sinks::TerminalSink;
use std::time::{Duration, Instant};
use tokio::io::AsyncBufReadExt;

/// sens-probe - An interactive hardware sensor inspector for the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "sens-probe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Sensor directory backend to use (overrides the saved config)
    #[arg(short = 'b', long = "backend", value_name = "ID")]
    backend: Option<String>,

    /// Sampling-rate hint: fastest, game, ui or normal
    #[arg(short = 'r', long = "rate", value_name = "RATE")]
    rate: Option<RateHint>,

    /// Select this sensor index at startup
    #[arg(short = 's', long = "sensor", value_name = "INDEX")]
    sensor: Option<usize>,

    /// List available sensors and exit
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// With --list, print machine-readable JSON descriptors
    #[arg(long = "json")]
    json: bool,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Config file to load instead of the default location
    #[arg(value_name = "CONFIG_FILE")]
    config_file: Option<String>,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger with verbosity based on -d/--debug flag
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting sens-probe v{}", env!("CARGO_PKG_VERSION"));

    // Register all built-in backends
    let mut registry = Registry::new();
    backends::register_all(&mut registry);

    // Load configuration - from the given file if specified, otherwise
    // from the default config location
    let mut config = if let Some(ref config_path) = cli.config_file {
        let path = std::path::PathBuf::from(config_path);
        match AppConfig::load_from_path(&path) {
            Ok(config) => {
                info!("Loaded config from: {}", config_path);
                config
            }
            Err(e) => {
                warn!("Failed to load config file '{}': {}", config_path, e);
                AppConfig::load().unwrap_or_default()
            }
        }
    } else {
        match AppConfig::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config, using defaults: {}", e);
                AppConfig::default()
            }
        }
    };

    // CLI options override the saved config
    if let Some(ref backend) = cli.backend {
        config.backend = backend.clone();
    }
    if let Some(rate) = cli.rate {
        config.rate = rate;
    }

    let mut backend = registry.create_backend(&config.backend).with_context(|| {
        format!(
            "available backends: {}",
            registry.list_backends().join(", ")
        )
    })?;
    if !backend.is_available() {
        bail!(
            "backend '{}' is not available on this system",
            config.backend
        );
    }

    // The directory snapshot is fetched once and never refreshed
    let snapshot = backend
        .enumerate()
        .with_context(|| format!("enumerating sensors via '{}'", config.backend))?;
    info!("{} sensors enumerated", snapshot.len());

    if cli.list {
        list_sensors(&snapshot, cli.json)?;
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli, config, snapshot, backend))
}

/// Print the selection labels, or full descriptors as JSON
fn list_sensors(snapshot: &[SensorDescriptor], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }
    if snapshot.is_empty() {
        println!("No sensors found on this device.");
        return Ok(());
    }
    for (index, sensor) in snapshot.iter().enumerate() {
        println!("  [{}] {}", index, sensor.label());
    }
    Ok(())
}

/// Static header shown above the two display regions
fn build_banner(snapshot: &[SensorDescriptor]) -> String {
    let mut banner = String::from("Sensors:\n");
    for (index, sensor) in snapshot.iter().enumerate() {
        banner.push_str(&format!("  [{}] {}\n", index, sensor.label()));
    }
    banner.push_str("Commands: <index> select, pause, resume, quit");
    banner
}

async fn run(
    cli: Cli,
    mut config: AppConfig,
    snapshot: Vec<SensorDescriptor>,
    backend: sens_probe::core::BoxedBackend,
) -> Result<()> {
    let banner = build_banner(&snapshot);
    let mut session = SensorSession::new(Sampler::new(backend), TerminalSink::new(), config.rate);
    session.initialize(snapshot);

    if session.state() == SelectionState::Empty {
        // Terminal state; the sink already shows the message
        return Ok(());
    }

    // Initial selection: CLI index wins over the remembered sensor
    if let Some(index) = cli.sensor {
        if let Err(e) = session.select_index(index) {
            warn!("ignoring --sensor: {}", e);
        }
    } else if let Some(ref name) = config.last_sensor {
        let remembered = session.sensors().iter().position(|s| &s.name == name);
        match remembered {
            Some(index) => {
                info!("re-selecting remembered sensor '{}'", name);
                let _ = session.select_index(index);
            }
            None => info!("remembered sensor '{}' is gone", name),
        }
    }

    session.display_mut().set_banner(&banner);

    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_ms.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match session.platform_mut().poll(Instant::now()) {
                    Ok(Some(reading)) => session.on_reading(&reading),
                    Ok(None) => {}
                    Err(e) => {
                        warn!("sensor read failed: {:#}", e);
                        session.on_sample_error(&format!("{:#}", e));
                    }
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if !handle_command(&mut session, line.trim()) {
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("stdin closed, continuing without selection input");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!("failed to read stdin: {}", e);
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    session.shutdown();

    // Remember the selection for the next run
    config.last_sensor = session.selected().map(|s| s.name.clone());
    if let Err(e) = config.save() {
        warn!("Failed to save config: {}", e);
    }

    Ok(())
}

/// Apply one stdin command. Returns false when the session should end.
fn handle_command(session: &mut SensorSession<Sampler, TerminalSink>, command: &str) -> bool {
    match command {
        "" => {}
        "q" | "quit" => return false,
        "p" | "pause" => session.on_hidden(),
        "r" | "resume" => session.on_visible(),
        other => match other.parse::<usize>() {
            Ok(index) => {
                if let Err(e) = session.select_index(index) {
                    warn!("{}", e);
                }
            }
            Err(_) => warn!("unknown command '{}'", other),
        },
    }
    true
}

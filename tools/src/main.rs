//! waterworks-runner: headless monitoring run over the synthetic solver.
//!
//! Usage:
//!   waterworks-runner --quality 1.5 --cost 30
//!   waterworks-runner --quality 2.0 --cost 45 --inp network.inp --json

use anyhow::Result;
use std::env;
use std::fs;
use std::time::Duration;
use waterworks_core::{
    EventSink, MonitorEvent, NetworkConfig, Quantity, RunConfig, RunEngine, RunParams,
    SyntheticSolver, TrackingRegistry,
};

/// Logs progress in coarse steps so a full run stays readable.
struct ProgressLogger {
    last_logged: f64,
}

impl EventSink for ProgressLogger {
    fn on_event(&mut self, event: &MonitorEvent) {
        match event {
            MonitorEvent::ProgressUpdated { percent, phase } => {
                if *percent - self.last_logged >= 5.0
                    || (*percent >= 100.0 && self.last_logged < 100.0)
                {
                    self.last_logged = *percent;
                    log::info!("progress {percent:.0}% ({phase})");
                }
            }
            MonitorEvent::PhaseCompleted { phase } => {
                log::info!("{phase} phase completed");
            }
            MonitorEvent::RunFailed { message, .. } => {
                log::error!("run failed: {message}");
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let quality = parse_arg(&args, "--quality", 1.5f64);
    let cost = parse_arg(&args, "--cost", 30.0f64);
    let pause_ms = parse_arg(&args, "--pause-ms", 0u64);
    let json = args.iter().any(|a| a == "--json");
    let inp = args
        .windows(2)
        .find(|w| w[0] == "--inp")
        .map(|w| w[1].as_str());

    if !json {
        println!("waterworks-runner");
        println!("  started:   {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        println!("  quality:   {quality} mg/L");
        println!("  cost:      ${cost} / 4kgal");
        println!("  model:     {}", inp.unwrap_or("(synthetic, unpatched)"));
        println!();
    }

    let mut network = NetworkConfig::martin_county();
    if let Some(path) = inp {
        network.model_template = Some(fs::read_to_string(path)?);
    }

    let solver = Box::new(SyntheticSolver::new(&network));
    let config = RunConfig {
        step_pause: Duration::from_millis(pause_ms),
        ..RunConfig::default()
    };
    let mut engine = RunEngine::new(network, solver, config);
    engine.subscribe(Box::new(ProgressLogger { last_logged: 0.0 }));

    engine.run(RunParams {
        initial_quality: quality,
        water_cost: cost,
    })?;

    if json {
        print_json(engine.registry())?;
    } else {
        print_summary(engine.registry(), engine.run_id());
    }
    Ok(())
}

fn print_summary(registry: &TrackingRegistry, run_id: &str) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id: {run_id}");

    for quantity in Quantity::ALL {
        println!();
        println!("--- {} ({}) ---", quantity.key(), quantity.unit());
        let d = quantity.display_decimals();
        for entity in registry.entities(quantity) {
            let Some(stats) = registry.stats(entity, quantity) else {
                continue;
            };
            let samples = registry.series_len(entity, quantity).unwrap_or(0);
            match registry.compliance(entity, quantity) {
                Some(c) => println!(
                    "  {entity:8} n={samples:3}  mean={:.d$}  median={:.d$}  std={:.d$}  low={}h high={}h  in-compliance={:.1}%",
                    stats.mean, stats.median, stats.std_dev, c.low_count, c.high_count, c.in_compliance_pct,
                ),
                None => println!(
                    "  {entity:8} n={samples:3}  mean={:.d$}  median={:.d$}  std={:.d$}",
                    stats.mean, stats.median, stats.std_dev,
                ),
            }
        }
    }
}

fn print_json(registry: &TrackingRegistry) -> Result<()> {
    let mut quantities = serde_json::Map::new();
    for quantity in Quantity::ALL {
        let mut entities = serde_json::Map::new();
        for entity in registry.entities(quantity) {
            let Some(stats) = registry.stats(entity, quantity) else {
                continue;
            };
            entities.insert(
                entity.clone(),
                serde_json::json!({
                    "samples": registry.series_len(entity, quantity),
                    "stats": stats,
                    "compliance": registry.compliance(entity, quantity),
                }),
            );
        }
        quantities.insert(quantity.key().to_string(), entities.into());
    }
    println!("{}", serde_json::to_string_pretty(&quantities)?);
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

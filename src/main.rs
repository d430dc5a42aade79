//! Smoke simulator CLI - Run a layout headlessly from the command line.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use smoke_sim::{EngineConfig, Session, SimulationStats, schema::Layout};

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <layout.txt> <row> <col> [frames] [--config config.json] [--breakpoint N]",
        program
    );
    eprintln!();
    eprintln!("Run a smoke propagation simulation over an ASCII layout.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  layout.txt   Board layout ('/' wall, '0'-'9' floor, ':' escape)");
    eprintln!("  row col      Emitter coordinates (must be a floor cell)");
    eprintln!("  frames       Number of host frames to run (default: 100)");
    eprintln!("  --config     JSON engine configuration");
    eprintln!("  --breakpoint Stop after this many frames");
    eprintln!();
    eprintln!("Print an example configuration with --example.");
    std::process::exit(1);
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).map(String::as_str) == Some("--example") {
        print_example_config();
        return;
    }

    let mut positional = Vec::new();
    let mut config_path: Option<PathBuf> = None;
    let mut breakpoint: i64 = 0;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => match iter.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => usage(&args[0]),
            },
            "--breakpoint" => match iter.next().and_then(|s| s.parse().ok()) {
                Some(frames) => breakpoint = frames,
                None => usage(&args[0]),
            },
            _ => positional.push(arg.as_str()),
        }
    }

    if positional.len() < 3 {
        usage(&args[0]);
    }

    let layout_path = PathBuf::from(positional[0]);
    let (Ok(row), Ok(col)) = (positional[1].parse::<usize>(), positional[2].parse::<usize>()) else {
        eprintln!("Emitter coordinates must be non-negative integers");
        std::process::exit(1);
    };
    let frames: u64 = positional
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100);

    // Load configuration
    let config: EngineConfig = match &config_path {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => EngineConfig::default(),
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    let layout = Layout::load(&layout_path).unwrap_or_else(|e| {
        eprintln!("Error loading layout: {}", e);
        std::process::exit(1);
    });

    println!("Smoke Propagation Simulation");
    println!("============================");
    println!("Grid: {}x{}", layout.cols, layout.rows);
    println!("Emitter: ({}, {})", row, col);
    println!("Tick rate: {}", config.tick_rate);
    println!(
        "Rates: emitter={}, escape={}",
        config.emitter_rate, config.escape_rate
    );
    println!("Precalculated weights: {}", config.use_precalculated_weights);
    println!("Frames: {}", frames);
    println!();

    let mut session = Session::new();
    if session.new_simulation(&layout, row, col, config).is_err() {
        eprintln!("Error: {}", session.status());
        std::process::exit(1);
    }
    session.set_breakpoint(breakpoint);
    session.start();

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..frames {
        let running = session.frame();

        // Print progress every 10%
        if (i + 1) % (frames / 10).max(1) == 0 {
            if let Some(engine) = session.engine() {
                let stats = SimulationStats::from_grid(engine.grid());
                println!(
                    "  Frame {}/{}: ticks={}, smoke={:.6}, active={}/{}",
                    i + 1,
                    frames,
                    engine.ticks(),
                    stats.total_density,
                    stats.active_cells,
                    stats.floor_cells
                );
            }
        }

        if !running {
            println!("  {}", session.status());
            break;
        }
    }

    let elapsed = start.elapsed();

    if let Some(engine) = session.engine() {
        let stats = SimulationStats::from_grid(engine.grid());
        println!();
        println!("Final state after {} ticks:", engine.ticks());
        println!("  Total smoke: {:.6}", stats.total_density);
        println!(
            "  Active cells: {}/{}",
            stats.active_cells, stats.floor_cells
        );
        println!(
            "  Density range: [{:.6}, {:.6}] (mean {:.6})",
            stats.min_density, stats.max_density, stats.mean_density
        );
        println!(
            "Time: {:.2}s ({:.1} ticks/s)",
            elapsed.as_secs_f32(),
            engine.ticks() as f32 / elapsed.as_secs_f32()
        );
    }
}

fn print_example_config() {
    let config = EngineConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}

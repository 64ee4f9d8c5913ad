/// Match Bench — LC ladder matching-network synthesis CLI.
///
/// Builds a random series-L / shunt-C ladder between a source and a load
/// resistance, anneals its E24 component values against a flat-gain
/// objective, and sweeps the voltage gain of the result.
///
/// Usage:
///   match-bench optimize [--f-min F] [--f-max F] [--max-dev DB] [--iterations N] [--seed S] [--csv FILE]
///   match-bench sweep [--stages N] [--seed S] [--start F1] [--end F2] [--points N] [--csv FILE]

use std::f64::consts::PI;

use ladder_match::{
    AnnealConfig, Filter, Load, MatchingObjective, Objective, anneal, log_sweep,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "optimize" => cmd_optimize(&args[2..]),
        "sweep" => cmd_sweep(&args[2..]),
        "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown subcommand: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Match Bench — LC ladder matching-network synthesis");
    eprintln!();
    eprintln!("Subcommands:");
    eprintln!("  optimize        Anneal a random ladder for flat in-band gain");
    eprintln!("  sweep           Gain sweep of a random (unoptimized) ladder");
    eprintln!();
    eprintln!("Common options:");
    eprintln!("  --r-source R    Source resistance in Ω (default: 50)");
    eprintln!("  --r-load R      Load resistance in Ω (default: 200)");
    eprintln!("  --stages N      Ladder stages, series L first (default: 4)");
    eprintln!("  --l-min/--l-max Inductance range in H (default: 1e-8..1e-4)");
    eprintln!("  --c-min/--c-max Capacitance range in F (default: 1e-12..1e-8)");
    eprintln!("  --seed S        RNG seed (default: 1)");
    eprintln!("  --csv FILE      Write the gain sweep as CSV");
    eprintln!();
    eprintln!("optimize options:");
    eprintln!("  --f-min/--f-max Passband in Hz (default: 1e6..2e6)");
    eprintln!("  --max-dev DB    Allowed in-band ripple (default: 1.0)");
    eprintln!("  --samples N     Objective samples (default: 64)");
    eprintln!("  --temperature T --cooling C --iterations N");
    eprintln!();
    eprintln!("sweep options:");
    eprintln!("  --start F1 --end F2 --points N   Log sweep in Hz (default: 1e5..2e7, 40)");
}

fn parse_flag(args: &[String], flag: &str, default: f64) -> f64 {
    for i in 0..args.len().saturating_sub(1) {
        if args[i] == flag {
            return args[i + 1].parse().unwrap_or(default);
        }
    }
    default
}

fn parse_flag_str<'a>(args: &'a [String], flag: &str, default: &'a str) -> &'a str {
    for i in 0..args.len().saturating_sub(1) {
        if args[i] == flag {
            return &args[i + 1];
        }
    }
    default
}

// ─── Ladder setup ───────────────────────────────────────────────────────────

fn initial_ladder(args: &[String], rng: &mut StdRng) -> ladder_match::Result<Filter> {
    let r_source = parse_flag(args, "--r-source", 50.0);
    let r_load = parse_flag(args, "--r-load", 200.0);
    let stages = parse_flag(args, "--stages", 4.0) as usize;
    let inductance = (
        parse_flag(args, "--l-min", 1e-8),
        parse_flag(args, "--l-max", 1e-4),
    );
    let capacitance = (
        parse_flag(args, "--c-min", 1e-12),
        parse_flag(args, "--c-max", 1e-8),
    );

    Filter::random_ladder(
        Load::resistor(r_source)?,
        Load::resistor(r_load)?,
        stages,
        inductance,
        capacitance,
        rng,
    )
}

// ─── Optimize ───────────────────────────────────────────────────────────────

fn cmd_optimize(args: &[String]) -> ladder_match::Result<()> {
    let f_min = parse_flag(args, "--f-min", 1e6);
    let f_max = parse_flag(args, "--f-max", 2e6);
    let max_dev = parse_flag(args, "--max-dev", 1.0);
    let samples = parse_flag(args, "--samples", 64.0) as usize;
    let seed = parse_flag(args, "--seed", 1.0) as u64;
    let csv_path = parse_flag_str(args, "--csv", "");

    let config = AnnealConfig::new(
        parse_flag(args, "--temperature", 1.0),
        parse_flag(args, "--cooling", 1e-3),
        parse_flag(args, "--iterations", 10_000.0) as usize,
    )?;
    let objective = MatchingObjective::new(f_min, f_max, max_dev, samples)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let initial = initial_ladder(args, &mut rng)?;
    let initial_cost = objective.cost(&initial.network());

    info!(
        iterations = config.iterations,
        temperature = config.initial_temperature,
        cooling = config.cooling_rate,
        seed,
        "annealing"
    );
    let outcome = anneal(initial.clone(), &objective, &config, &mut rng)?;
    let stats = objective.measure(&outcome.filter.network());

    println!("Matching-network optimization");
    println!("  Band:         {f_min:.0} – {f_max:.0} Hz");
    println!("  Ripple limit: {max_dev:.2} dB");
    println!("  Initial cost: {initial_cost:.4}");
    println!("  Final cost:   {:.4}", outcome.cost);
    println!("  Accepted:     {} / {}", outcome.accepted, outcome.iterations);
    println!("  Mean gain:    {:.2} dB", 20.0 * stats.mean.log10());
    println!("  Ripple:       {:.2} dB", stats.deviation_db());
    println!();
    println!("Initial ladder:");
    print!("{initial}");
    println!("Optimized ladder:");
    print!("{}", outcome.filter);
    println!();

    let points = log_sweep(f_min / 4.0, f_max * 4.0, 40);
    print_sweep(&outcome.filter, &points, csv_path)
}

// ─── Sweep ──────────────────────────────────────────────────────────────────

fn cmd_sweep(args: &[String]) -> ladder_match::Result<()> {
    let start = parse_flag(args, "--start", 1e5);
    let end = parse_flag(args, "--end", 2e7);
    let points = parse_flag(args, "--points", 40.0) as usize;
    let seed = parse_flag(args, "--seed", 1.0) as u64;
    let csv_path = parse_flag_str(args, "--csv", "");

    let mut rng = StdRng::seed_from_u64(seed);
    let filter = initial_ladder(args, &mut rng)?;

    println!("Ladder (seed {seed}):");
    print!("{filter}");
    println!();
    print_sweep(&filter, &log_sweep(start, end, points), csv_path)
}

fn print_sweep(filter: &Filter, freqs: &[f64], csv_path: &str) -> ladder_match::Result<()> {
    let network = filter.network();

    let mut csv_lines = Vec::with_capacity(freqs.len() + 1);
    csv_lines.push("freq_hz,gain_db".to_string());

    println!("{:>12}  {:>10}", "Freq (Hz)", "Gain (dB)");
    println!("{:-<12}  {:-<10}", "", "");
    for &freq in freqs {
        let gain_db = network.voltage_gain_db(2.0 * PI * freq)?;
        println!("{freq:>12.0}  {gain_db:>10.2}");
        csv_lines.push(format!("{freq:.1},{gain_db:.3}"));
    }

    if !csv_path.is_empty() {
        if let Err(e) = std::fs::write(csv_path, csv_lines.join("\n") + "\n") {
            eprintln!("Failed to write CSV {csv_path}: {e}");
            std::process::exit(1);
        }
        info!(path = csv_path, "CSV written");
    }
    Ok(())
}

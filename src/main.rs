//! pcp-certify CLI: rigorous positivity certification runs.
//!
//! Modes:
//!   --mode=conservative   Certify [80,000, 90,000] with (A, C) = (3, 5.0)
//!   --mode=optimized      Certify [50,000, 60,000] with (A, C) = (3, 3.0)
//!   --mode=exact          Exact PCp(X) zero-set for small X (ground truth)
//!
//! Options:
//!   --x=<N>          Sanity-check point (default: profile dependent)
//!   --lo=<N> --hi=<N>  Override the certification window
//!   --a=<N>          Override the BV exponent
//!   --c=<decimal>    Override both BV constants
//!   --xmax=<N>       Ceiling for --mode=exact (default: 80,000)
//!   --json=<file>    Write a machine-readable run summary
//!   --verbose        Print the full bound breakdown at the sanity check

use std::time::Instant;

use serde::Serialize;

use pcp_certify::window::{certify_window, WindowOutcome};
use pcp_certify::{pcp_lower, pcp_lower_parts, DecDown, Profile, WORKING_PRECISION};

struct CliConfig {
    mode: Mode,
    x: Option<u64>,
    lo: Option<u64>,
    hi: Option<u64>,
    a: Option<usize>,
    c: Option<String>,
    xmax: u64,
    json: Option<String>,
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Conservative,
    Optimized,
    Exact,
}

/// Machine-readable summary of one certification run.
#[derive(Serialize)]
struct RunSummary {
    profile: String,
    window_lo: u64,
    window_hi: u64,
    certified: bool,
    values_checked: u64,
    first_failure: Option<u64>,
    elapsed_secs: f64,
    spot_checks: Vec<SpotCheck>,
}

#[derive(Serialize)]
struct SpotCheck {
    x: u64,
    lower_bound: String,
    positive: bool,
}

fn parse_flag<T: std::str::FromStr>(args: &[String], prefix: &str) -> Option<T> {
    args.iter()
        .find(|a| a.starts_with(prefix))
        .and_then(|a| a.strip_prefix(prefix)?.parse::<T>().ok())
}

fn parse_args() -> CliConfig {
    let args: Vec<String> = std::env::args().collect();

    let mode = if args.iter().any(|a| a.contains("--mode=exact")) {
        Mode::Exact
    } else if args.iter().any(|a| a.contains("--mode=optimized")) {
        Mode::Optimized
    } else {
        Mode::Conservative
    };

    CliConfig {
        mode,
        x: parse_flag(&args, "--x="),
        lo: parse_flag(&args, "--lo="),
        hi: parse_flag(&args, "--hi="),
        a: parse_flag(&args, "--a="),
        c: args
            .iter()
            .find(|a| a.starts_with("--c="))
            .map(|a| a.strip_prefix("--c=").unwrap().to_string()),
        xmax: parse_flag(&args, "--xmax=").unwrap_or(80_000),
        json: args
            .iter()
            .find(|a| a.starts_with("--json="))
            .map(|a| a.strip_prefix("--json=").unwrap().to_string()),
        verbose: args.iter().any(|a| a == "--verbose" || a == "-v"),
    }
}

fn approx(value: &DecDown) -> f64 {
    value.to_f64().value()
}

fn print_breakdown(x: u64, profile: &Profile) {
    match pcp_lower_parts(x, profile, WORKING_PRECISION) {
        Ok(parts) => {
            println!("-- Breakdown at X={} --", x);
            println!("  z            = {}", parts.z);
            println!("  V(z)         = {}", parts.v_down);
            println!("  f(3)         = {}", parts.f3);
            println!("  li_lower     = {}", parts.li_lower);
            println!("  main         = {}", parts.main);
            println!("  c_main       = {}", parts.leading_ratio);
            println!("  BV_AP        = {}", parts.bv_ap);
            println!("  BV_AGG       = {}", parts.bv_agg);
            println!("  r5           = {}", if parts.r5 { 1 } else { 0 });
            println!("  PCp_lower    = {}", parts.lower);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_certification(mut profile: Profile, config: &CliConfig) {
    if let Some(a) = config.a {
        profile.a = a;
    }
    if let Some(c) = &config.c {
        profile.c_ap = c.clone();
        profile.c_agg = c.clone();
    }

    let (default_lo, default_hi, sanity_x, spots): (u64, u64, u64, &[u64]) = match config.mode {
        Mode::Conservative => (
            80_000,
            90_000,
            100_000,
            &[100_000, 120_000, 150_000, 200_000, 300_000, 500_000, 1_000_000],
        ),
        Mode::Optimized => (50_000, 60_000, 50_000, &[70_000, 80_000, 90_000, 100_000]),
        Mode::Exact => unreachable!(),
    };
    let lo = config.lo.unwrap_or(default_lo);
    let hi = config.hi.unwrap_or(default_hi);
    let sanity_x = config.x.unwrap_or(sanity_x);

    println!(
        "Profile: {} (A={}, C_AP={}, C_AGG={}, X >= {})",
        profile.name, profile.a, profile.c_ap, profile.c_agg, profile.min_x
    );
    println!();

    // Sanity check at one point before committing to the sweep.
    println!("--- Sanity Check ---");
    if config.verbose {
        print_breakdown(sanity_x, &profile);
    } else {
        match pcp_lower(sanity_x, &profile) {
            Ok(value) => {
                let status = if value > DecDown::ZERO { "[OK]" } else { "[FAIL]" };
                println!("PCp_lower({}) = {:.6}  {}", sanity_x, approx(&value), status);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
    println!();

    println!("--- Window Certification ---");
    println!("Certifying [{}, {}] (every even X)...", lo, hi);
    let report = match certify_window(lo, hi, &profile) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut summary = RunSummary {
        profile: profile.name.clone(),
        window_lo: lo,
        window_hi: hi,
        certified: report.outcome.is_certified(),
        values_checked: 0,
        first_failure: None,
        elapsed_secs: report.elapsed.as_secs_f64(),
        spot_checks: Vec::new(),
    };

    match &report.outcome {
        WindowOutcome::Certified { checked } => {
            summary.values_checked = *checked;
            println!(
                "  Window [{}, {}]: all {} even values certified in {:.1}s",
                lo,
                hi,
                checked,
                report.elapsed.as_secs_f64()
            );
            println!("  PCp(X) > 0 rigorously verified for every even X in [{}, {}]", lo, hi);
        }
        WindowOutcome::Refuted {
            first_failure,
            value,
            checked,
        } => {
            summary.values_checked = *checked;
            summary.first_failure = Some(*first_failure);
            println!(
                "  FAILURE at X={}: PCp_lower = {} ({} values passed before it)",
                first_failure, value, checked
            );
        }
    }
    println!();

    if report.outcome.is_certified() {
        println!("--- Spot Checks Beyond the Window ---");
        for &x in spots {
            match pcp_lower(x, &profile) {
                Ok(value) => {
                    let positive = value > DecDown::ZERO;
                    let status = if positive { "[OK]" } else { "[FAIL]" };
                    println!("X = {:>9}  |  PCp_lower >= {:>14.6}  {}", x, approx(&value), status);
                    summary.spot_checks.push(SpotCheck {
                        x,
                        lower_bound: value.to_string(),
                        positive,
                    });
                }
                Err(e) => {
                    eprintln!("Error at X={}: {}", x, e);
                    std::process::exit(1);
                }
            }
        }
        println!();
    }

    if let Some(path) = &config.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(body) => {
                if let Err(e) = std::fs::write(path, body) {
                    log::warn!("failed to write summary to {}: {}", path, e);
                }
            }
            Err(e) => log::warn!("failed to serialize summary: {}", e),
        }
    }
}

fn run_exact(xmax: u64) {
    println!("Exact PCp(X) for even X <= {} (independent ground truth)", xmax);
    let start = Instant::now();
    let zeroes = pcp_certify::exact::zero_set(xmax);
    println!(
        "  zero-set: {:?} ({} values, {:.1}s)",
        zeroes,
        zeroes.len(),
        start.elapsed().as_secs_f64()
    );
}

fn main() {
    env_logger::init();

    let config = parse_args();

    println!("========================================");
    println!("  pcp-certify: PCp(X) > 0 certification");
    println!("========================================");
    println!();

    match config.mode {
        Mode::Conservative => run_certification(Profile::conservative(), &config),
        Mode::Optimized => run_certification(Profile::optimized(), &config),
        Mode::Exact => run_exact(config.xmax),
    }

    println!("Done.");
}

use clap::Parser;
use num_bigint::BigUint;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use regfam_rs::params::{SamplingPlan, SearchParams};
use regfam_rs::search::FamilySearch;

/// Denominator schedules tuned for n = 5, one row per regularity 2..=12.
/// The counts for r = 0 and r = 1 are known exactly (1 and 1344), and the
/// counts above r = 12 mirror the ones below by complement symmetry.
const PRESET_PLANS_N5: [[u64; 5]; 11] = [
    [10, 30, 30, 15, 1],
    [100, 200, 200, 60, 1],
    [350, 2000, 3000, 200, 1],
    [900, 16000, 24000, 600, 1],
    [1900, 80000, 47000, 1000, 1],
    [4500, 390000, 97000, 1500, 1],
    [9300, 1900000, 200000, 2100, 1],
    [22000, 4000000, 400000, 4000, 1],
    [33000, 4900000, 800000, 6700, 1],
    [41000, 6000000, 1560000, 8900, 1],
    [45000, 6500000, 2800000, 10000, 1],
];

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of elements.
    #[arg(value_name = "INT", default_value = "5")]
    n: usize,

    /// Estimate a single regularity instead of sweeping the n = 5 presets.
    #[clap(short, long, value_name = "INT")]
    regularity: Option<usize>,

    /// Per-depth sampling denominators, comma-separated.
    #[clap(long, value_name = "D,D,...", value_delimiter = ',')]
    plan: Option<Vec<u64>>,

    /// Independent trials per regularity; the result is their floor-averaged
    /// mean.
    #[clap(long, value_name = "INT", default_value = "1")]
    trials: u32,

    /// RNG seed (drawn randomly when omitted; always printed).
    #[clap(long, value_name = "INT")]
    seed: Option<u64>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    println!("seed = {}", seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    match args.regularity {
        Some(regularity) => {
            let plan = resolve_plan(args.n, regularity, args.plan.clone())?;
            let search = FamilySearch::new(SearchParams::new(args.n, regularity)?);
            let result = run_trials(&search, &plan, args.trials, &mut rng)?;
            println!("~{} {}-regular families for n = {}", result, regularity, args.n);
        }
        None => {
            if args.n != 5 {
                color_eyre::eyre::bail!(
                    "the preset sweep is tuned for n = 5; pass --regularity (and --plan) for n = {}",
                    args.n
                );
            }

            let mut table = vec![BigUint::from(1u32), BigUint::from(1344u32)];
            for (offset, denominators) in PRESET_PLANS_N5.iter().enumerate() {
                let regularity = offset + 2;
                println!("r = {}", regularity);
                let plan = SamplingPlan::new(5, denominators.to_vec())?;
                let search = FamilySearch::new(SearchParams::new(5, regularity)?);
                let result = run_trials(&search, &plan, args.trials, &mut rng)?;
                println!("{}", result);
                table.push(result);
            }

            let formatted: Vec<String> = table.iter().map(|count| count.to_string()).collect();
            println!();
            println!("counts for r = 0..=12: [{}]", formatted.join(", "));

            // r = 13..=24 mirror r = 11..=0, so the middle value is the only
            // one that must not be doubled.
            let sum: BigUint = table.iter().sum();
            let middle = table.last().cloned().unwrap_or_default();
            println!("total over every regularity: {}", &sum * 2u32 - middle);
        }
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}

fn resolve_plan(n: usize, regularity: usize, plan: Option<Vec<u64>>) -> color_eyre::Result<SamplingPlan> {
    if let Some(denominators) = plan {
        return Ok(SamplingPlan::new(n, denominators)?);
    }
    if n == 5 && (2..=12).contains(&regularity) {
        return Ok(SamplingPlan::new(5, PRESET_PLANS_N5[regularity - 2].to_vec())?);
    }
    color_eyre::eyre::bail!("no preset plan for n = {}, r = {}; pass --plan", n, regularity);
}

/// Runs independent trials, printing each trial's estimate with its kept and
/// reached tallies, and floor-averages the results.
fn run_trials(
    search: &FamilySearch,
    plan: &SamplingPlan,
    trials: u32,
    rng: &mut ChaCha8Rng,
) -> color_eyre::Result<BigUint> {
    let mut sum = BigUint::ZERO;
    for _ in 0..trials {
        let estimate = search.estimate(plan, rng)?;
        println!("{} {:?} {:?}", estimate.count(), estimate.kept(), estimate.reached());
        sum += estimate.count();
    }
    Ok(sum / trials.max(1))
}

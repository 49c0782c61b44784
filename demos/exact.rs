use clap::Parser;

use regfam_rs::params::SearchParams;
use regfam_rs::search::FamilySearch;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of elements.
    #[arg(value_name = "INT", default_value = "4")]
    n: usize,

    /// Target regularity.
    #[arg(value_name = "INT", default_value = "1")]
    regularity: usize,

    /// Print every family instead of only counting.
    #[clap(long)]
    enumerate: bool,

    /// Stop after printing this many families (0 = no limit).
    #[clap(long, value_name = "INT", default_value = "0")]
    limit: usize,
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

    // Note:
    // - n = 4 enumerates instantly for any feasible r.
    // - n = 5, r = 1 counts 1344 families in well under a second.
    // - n = 5, r >= 2 is where exact counting stops being fun.

    let params = SearchParams::new(args.n, args.regularity)?;
    let search = FamilySearch::new(params);
    println!(
        "universe: {} permutations in {} buckets of {}",
        search.universe().len(),
        args.n,
        search.universe().bucket_len()
    );

    if args.enumerate {
        let mut shown = 0usize;
        for family in search.families() {
            println!("{}", family);
            shown += 1;
            if args.limit > 0 && shown == args.limit {
                println!("... stopped after {} families", shown);
                break;
            }
        }
        println!("Enumerated {} families", shown);
    } else {
        let count = search.count_all();
        println!("There are {} {}-regular families for n = {}", count, args.regularity, args.n);
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}

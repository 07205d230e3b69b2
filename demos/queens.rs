use std::collections::BTreeSet;

use clap::Parser;

use hermes_bdd::config::{BddConfig, MIB};
use hermes_bdd::error::Result;
use hermes_bdd::manager::Manager;
use hermes_bdd::reference::Ref;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of queens.
    #[arg(value_name = "INT", default_value = "8")]
    n: usize,

    /// Unique table size in MiB.
    #[arg(long, value_name = "INT", default_value = "256")]
    node_mb: usize,

    /// Computed table size in MiB.
    #[arg(long, value_name = "INT", default_value = "512")]
    cache_mb: usize,
}

/// Constraints of the queen at (`row`, `col`): no other queen in its row, column or diagonals.
fn build(bdd: &Manager, x: &[Vec<Ref>], row: usize, col: usize) -> Result<Ref> {
    let n = x.len();
    let here = x[row][col];
    let mut res = bdd.one();

    let mut forbid = |other: Ref| -> Result<()> {
        let not_other = bdd.apply_not(other)?;
        res = bdd.apply_and(res, bdd.apply_imply(here, not_other)?)?;
        Ok(())
    };

    // Same row
    for c in (0..n).filter(|&c| c != col) {
        forbid(x[row][c])?;
    }
    // Same column
    for r in (0..n).filter(|&r| r != row) {
        forbid(x[r][col])?;
    }
    // Diagonals
    for k in (0..n).filter(|&k| k != row) {
        let ll = k as isize - row as isize + col as isize;
        if (0..n as isize).contains(&ll) {
            forbid(x[k][ll as usize])?;
        }
    }
    for k in (0..n).filter(|&k| k != row) {
        let ll = row as isize + col as isize - k as isize;
        if (0..n as isize).contains(&ll) {
            forbid(x[k][ll as usize])?;
        }
    }

    Ok(res)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    let config = BddConfig::default()
        .with_node_budget(args.node_mb * MIB)
        .with_cache_budget(args.cache_mb * MIB);
    let bdd = hermes_bdd::init(config)?;

    let n = args.n;
    println!("Using a {}x{} chess board", n, n);

    let time_build = std::time::Instant::now();

    let mut x = vec![];
    for row in 0..n {
        let mut cells = vec![];
        for col in 0..n {
            cells.push(bdd.mk_var((row * n + col) as u32)?);
        }
        x.push(cells);
    }

    let mut queen = bdd.one();

    // Place a queen in each row
    for row in &x {
        let e = bdd.apply_or_many(row.iter().copied())?;
        queen = bdd.apply_and(queen, e)?;
    }

    for row in 0..n {
        for col in 0..n {
            let c = build(bdd, &x, row, col)?;
            queen = bdd.apply_and(queen, c)?;
        }
    }

    println!(
        "Elapsed time for BDD construction: {:.3} s",
        time_build.elapsed().as_secs_f64()
    );
    println!("bdd = {:?}", bdd);

    if n <= 2 {
        bdd.print(queen, &format!("N-queens: {}", n))?;
    }

    let vars: BTreeSet<u32> = (0..(n * n) as u32).collect();
    let time_count = std::time::Instant::now();
    println!("There are {} solutions", bdd.count_sat(queen, &vars)?);
    println!(
        "Elapsed time for count_sat: {:.3} s",
        time_count.elapsed().as_secs_f64()
    );

    Ok(())
}

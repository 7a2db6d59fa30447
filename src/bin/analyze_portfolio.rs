//! Run the full analysis for every property in a portfolio CSV
//!
//! Properties are analyzed in parallel; per-property metrics are written to
//! an output CSV for comparison across the portfolio.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use proforma_system::analyze_portfolio;
use proforma_system::property::load_portfolio;

#[derive(Parser)]
#[command(name = "analyze_portfolio", about = "Batch proforma analysis over a portfolio CSV")]
struct Args {
    /// Path to the portfolio CSV file
    input: PathBuf,

    /// Output CSV of per-property metrics
    #[arg(long, default_value = "portfolio_metrics.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading portfolio from {}...", args.input.display());

    let entries = load_portfolio(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    println!("Loaded {} properties in {:?}", entries.len(), start.elapsed());

    println!("Running analyses...");
    let run_start = Instant::now();
    let outcomes = analyze_portfolio(&entries);
    println!("Analyses complete in {:?}", run_start.elapsed());

    let mut file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    writeln!(
        file,
        "Name,GoingInCapRate,LoanConstant,GoingInDSCR,GoingInDebtYield,ExitLTV,UnleveredIRR,LeveredIRR,UnleveredEM,LeveredEM,AvgUnleveredCoC,AvgLeveredCoC,Year1OpExRatio,ProjectedSalePrice,NetSaleProceeds"
    )?;

    let mut failures = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(analysis) => {
                let m = &analysis.metrics;
                writeln!(
                    file,
                    "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                    outcome.name,
                    fmt(m.going_in_cap_rate),
                    fmt(m.loan_constant),
                    fmt(m.going_in_dscr),
                    fmt(m.going_in_debt_yield),
                    fmt(m.exit_ltv),
                    fmt(m.unlevered_irr),
                    fmt(m.levered_irr),
                    fmt(m.unlevered_equity_multiple),
                    fmt(m.levered_equity_multiple),
                    fmt(m.avg_unlevered_coc),
                    fmt(m.avg_levered_coc),
                    fmt(m.year1_op_ex_ratio),
                    fmt(m.projected_sale_price),
                    fmt(m.net_sale_proceeds),
                )?;
            }
            Err(e) => {
                failures += 1;
                eprintln!("  {} failed: {}", outcome.name, e);
            }
        }
    }

    println!("Metrics written to {}", args.output.display());
    println!(
        "\nPortfolio Summary:\n  Properties: {}\n  Succeeded:  {}\n  Failed:     {}",
        outcomes.len(),
        outcomes.len() - failures,
        failures
    );
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}

fn fmt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_default()
}

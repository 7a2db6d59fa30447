//! Proforma System CLI
//!
//! Analyzes a single property JSON file: prints the monthly cash flow
//! preview and return metrics, with optional CSV/JSON output.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use proforma_system::{analyze, PropertyAnalysis};
use proforma_system::property::load_property;

#[derive(Parser)]
#[command(name = "proforma_system", about = "Real estate proforma and return metrics")]
struct Args {
    /// Path to a property JSON file
    input: PathBuf,

    /// Write the full monthly schedule to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the full analysis as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let record = load_property(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let assumptions = record.to_assumptions().context("invalid property record")?;
    let analysis = analyze(&assumptions).context("projection failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_report(&record.name, &analysis);
    }

    if let Some(csv_path) = &args.csv {
        write_monthly_csv(csv_path, &analysis)
            .with_context(|| format!("failed to write {}", csv_path.display()))?;
        println!("\nFull monthly schedule written to: {}", csv_path.display());
    }

    Ok(())
}

fn print_report(name: &str, analysis: &PropertyAnalysis) {
    println!("Proforma System v0.1.0");
    println!("======================\n");
    println!("Property: {}\n", name);

    // Print header
    println!(
        "{:>5} {:>12} {:>12} {:>10} {:>12} {:>12} {:>12} {:>12}",
        "Month", "Date", "GrossRent", "Vacancy", "NOI", "CF pre-DS", "DebtSvc", "CF post-DS"
    );
    println!("{}", "-".repeat(95));

    // Print first 24 months to console
    for row in analysis.monthly.rows.iter().take(24) {
        println!(
            "{:>5} {:>12} {:>12.2} {:>10.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            row.month,
            row.date,
            row.gross_potential_rent,
            row.vacancy_loss,
            row.net_operating_income,
            row.cash_flow_before_debt_service,
            row.debt_service(),
            row.cash_flow_after_debt_service,
        );
    }
    if analysis.monthly.rows.len() > 24 {
        println!("... ({} more months)", analysis.monthly.rows.len() - 24);
    }

    let sale = &analysis.equity.sale;
    println!("\nSale Waterfall:");
    println!("  Trailing 12-mo NOI: ${:.2}", sale.trailing_noi);
    println!("  Sale Price:         ${:.2}", sale.sale_price);
    println!("  Cost of Sale:       ${:.2}", sale.sale_cost);
    println!("  Loan Payoff:        ${:.2}", sale.loan_payoff);
    println!("  Net Proceeds:       ${:.2}", sale.net_proceeds);

    println!("\nReturn Metrics:");
    let m = &analysis.metrics;
    print_metric("going_in_cap_rate", m.going_in_cap_rate);
    print_metric("loan_constant", m.loan_constant);
    print_metric("going_in_dscr", m.going_in_dscr);
    print_metric("going_in_debt_yield", m.going_in_debt_yield);
    print_metric("exit_ltv", m.exit_ltv);
    print_metric("unlevered_irr", m.unlevered_irr);
    print_metric("levered_irr", m.levered_irr);
    print_metric("unlevered_equity_multiple", m.unlevered_equity_multiple);
    print_metric("levered_equity_multiple", m.levered_equity_multiple);
    print_metric("avg_unlevered_coc", m.avg_unlevered_coc);
    print_metric("avg_levered_coc", m.avg_levered_coc);
    print_metric("year1_op_ex_ratio", m.year1_op_ex_ratio);
    print_metric("projected_sale_price", m.projected_sale_price);
    print_metric("net_sale_proceeds", m.net_sale_proceeds);
}

fn print_metric(name: &str, value: Option<f64>) {
    match value {
        Some(v) => println!("  {:<28} {:.6}", name, v),
        None => println!("  {:<28} n/a", name),
    }
}

fn write_monthly_csv(path: &Path, analysis: &PropertyAnalysis) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(
        file,
        "Month,Date,GrossPotentialRent,VacancyLoss,OtherIncome,NetRentalRevenue,OperatingExpenses,NetOperatingIncome,CapitalExpenses,CashFlowBeforeDebtService,InterestPayment,PrincipalPayment,CashFlowAfterDebtService"
    )?;

    for row in &analysis.monthly.rows {
        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.month,
            row.date,
            row.gross_potential_rent,
            row.vacancy_loss,
            row.other_income,
            row.net_rental_revenue,
            row.operating_expenses,
            row.net_operating_income,
            row.capital_expenses,
            row.cash_flow_before_debt_service,
            row.interest_payment,
            row.principal_payment,
            row.cash_flow_after_debt_service,
        )?;
    }

    Ok(())
}

//! Growth Projection CLI
//!
//! Command-line front end for loan, savings and retirement projections.
//! Engine defaults can be overridden through environment variables:
//!   PROJECTION_PAYOFF_MULTIPLIER, PROJECTION_DETAILED_OUTPUT

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde_json::json;

use growth_projection::projection::{RetirementPlan, RetirementProjection};
use growth_projection::scenario::load_scenario_file;
use growth_projection::{
    Frequency, ProjectionConfig, ProjectionEngine, ProjectionMode, ProjectionResult, ScenarioInput, ScenarioRunner,
};

/// Amortization and compound-growth projections for loans, savings and retirement.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a single scenario.
    Project(ProjectArgs),
    /// Project every scenario in a CSV or JSON file in parallel.
    Batch(BatchArgs),
    /// Project a retirement plan: saving until retirement, then drawing down.
    Retire(RetireArgs),
}

#[derive(Args)]
struct ProjectArgs {
    /// accumulation | amortization | drawdown (aliases: savings, loan, mortgage, retirement)
    #[arg(long)]
    mode: ProjectionMode,

    /// Opening balance or loan amount.
    #[arg(long)]
    principal: f64,

    /// Nominal annual rate as a fraction (0.05 = 5%).
    #[arg(long)]
    rate: f64,

    /// Horizon or loan term in years.
    #[arg(long)]
    years: f64,

    #[arg(long, default_value = "monthly", value_parser = Frequency::compounding)]
    compounding: Frequency,

    /// Amount per cash-flow event; negative for withdrawals.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    cash_flow: f64,

    /// Cash-flow cadence (the payment cadence for loans).
    #[arg(long, default_value = "monthly")]
    cash_flow_frequency: Frequency,

    /// Extra principal paid with every loan payment.
    #[arg(long, default_value_t = 0.0)]
    extra_payment: f64,

    #[arg(long)]
    inflation: Option<f64>,

    #[arg(long)]
    start_age: Option<f64>,

    /// Print every period instead of yearly rows.
    #[arg(long)]
    periods: bool,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BatchArgs {
    /// Scenario file (.csv or .json).
    #[arg(long)]
    file: PathBuf,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RetireArgs {
    #[arg(long)]
    current_age: f64,
    #[arg(long)]
    retirement_age: f64,
    #[arg(long)]
    life_expectancy: f64,
    #[arg(long)]
    savings: f64,
    /// Annual return before retirement.
    #[arg(long)]
    rate: f64,
    /// Annual return after retirement (defaults to --rate).
    #[arg(long)]
    retirement_rate: Option<f64>,
    /// Monthly contribution until retirement.
    #[arg(long, default_value_t = 0.0)]
    contribution: f64,
    /// Monthly withdrawal in today's money.
    #[arg(long)]
    withdrawal: f64,
    #[arg(long, default_value_t = 0.0)]
    inflation: f64,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = config_from_env();
    info!("engine config: {:?}", config);

    match cli.command {
        Commands::Project(args) => handle_project(args, config),
        Commands::Batch(args) => handle_batch(args, config),
        Commands::Retire(args) => handle_retire(args, config),
    }
}

/// Read engine overrides from the environment, falling back to defaults
fn config_from_env() -> ProjectionConfig {
    let defaults = ProjectionConfig::default();

    let payoff_period_multiplier: u32 = env::var("PROJECTION_PAYOFF_MULTIPLIER")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.payoff_period_multiplier);

    let detailed_output: bool = env::var("PROJECTION_DETAILED_OUTPUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.detailed_output);

    ProjectionConfig {
        payoff_period_multiplier,
        detailed_output,
    }
}

fn handle_project(args: ProjectArgs, config: ProjectionConfig) -> Result<()> {
    let mut scenario = ScenarioInput::new(args.principal, args.rate, args.years)
        .with_compounding(args.compounding)
        .with_cash_flow(args.cash_flow, args.cash_flow_frequency)
        .with_extra_payment(args.extra_payment);
    scenario.inflation_rate = args.inflation;
    scenario.start_age = args.start_age;

    if args.mode == ProjectionMode::Amortization {
        args.cash_flow_frequency.as_payment()?;
    }

    let engine = ProjectionEngine::new(ProjectionConfig {
        detailed_output: config.detailed_output || args.periods,
        ..config
    });
    let result = engine.project(&scenario, args.mode)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_result(&result, args.periods);
    Ok(())
}

fn handle_batch(args: BatchArgs, config: ProjectionConfig) -> Result<()> {
    let start = Instant::now();
    let scenarios = load_scenario_file(&args.file)
        .with_context(|| format!("loading scenarios from {}", args.file.display()))?;
    info!("loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::with_config(config);
    let outcomes = runner.run_batch(&scenarios);
    info!("projections complete in {:?}", start.elapsed());

    if args.json {
        let rows: Vec<_> = outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(result) => json!({ "name": o.name, "summary": result.summary() }),
                Err(err) => json!({ "name": o.name, "error": err.to_string() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<20} {:<13} {:>6} {:>16} {:>14} {:>14} {:>10}",
        "Scenario", "Mode", "Years", "Final balance", "Interest", "Payment", "Depletes"
    );
    println!("{}", "-".repeat(99));
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => {
                let summary = result.summary();
                println!(
                    "{:<20} {:<13} {:>6.2} {:>16.2} {:>14.2} {:>14} {:>10}",
                    outcome.name,
                    summary.mode,
                    summary.years,
                    summary.terminal_balance,
                    summary.total_interest,
                    summary.level_payment.map(|p| format!("{:.2}", p)).unwrap_or_default(),
                    summary.depletion_age.map(|a| format!("{:.1}", a)).unwrap_or_default(),
                );
            }
            Err(err) => println!("{:<20} error: {}", outcome.name, err),
        }
    }

    if let Some(best) = ScenarioRunner::cheapest(&outcomes) {
        println!("\nLeast total interest: {}", best.name);
    }
    Ok(())
}

fn handle_retire(args: RetireArgs, config: ProjectionConfig) -> Result<()> {
    let plan = RetirementPlan {
        current_age: args.current_age,
        retirement_age: args.retirement_age,
        life_expectancy: args.life_expectancy,
        current_savings: args.savings,
        annual_return: args.rate,
        annual_return_in_retirement: args.retirement_rate,
        compounding_periods_per_year: Frequency::Monthly.periods_per_year(),
        contribution: args.contribution,
        contribution_periods_per_year: Frequency::Monthly.periods_per_year(),
        withdrawal: args.withdrawal,
        withdrawal_periods_per_year: Frequency::Monthly.periods_per_year(),
        inflation_rate: args.inflation,
    };

    let projection = ProjectionEngine::new(config).project_retirement(&plan)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
        return Ok(());
    }

    print_retirement(&plan, &projection);
    Ok(())
}

fn print_result(result: &ProjectionResult, show_periods: bool) {
    println!("{} projection ({} periods, {:.2} years)", result.mode, result.period_count, result.elapsed_years());

    if show_periods {
        println!(
            "{:>6} {:>16} {:>12} {:>14} {:>16} {:>16}",
            "Period", "Opening", "Interest", "Cash flow", "Closing", "Cum. interest"
        );
        println!("{}", "-".repeat(85));
        for row in &result.periods {
            println!(
                "{:>6} {:>16.2} {:>12.2} {:>14.2} {:>16.2} {:>16.2}",
                row.index, row.opening_balance, row.interest, row.cash_flow, row.closing_balance, row.cumulative_interest
            );
        }
    } else {
        println!(
            "{:>4} {:>16} {:>14} {:>14} {:>14} {:>16}",
            "Year", "Start", "Contributed", "Withdrawn", "Interest", "End"
        );
        println!("{}", "-".repeat(84));
        for year in &result.years {
            println!(
                "{:>4} {:>16.2} {:>14.2} {:>14.2} {:>14.2} {:>16.2}",
                year.year, year.start_balance, year.contributions, year.withdrawals, year.interest, year.end_balance
            );
        }
    }

    println!("\nSummary:");
    println!("  Final balance: ${:.2}", result.terminal_balance);
    println!("  Total interest: ${:.2}", result.total_interest);
    println!("  Contributions: ${:.2}", result.total_contributions);
    println!("  Withdrawals/payments: ${:.2}", result.total_withdrawals);
    println!("  Effective annual rate: {:.4}%", result.effective_annual_rate * 100.0);
    if let Some(years) = result.doubling_time_years {
        println!("  Doubling time (rule of 72): {:.1} years", years);
    }
    if let Some(real) = result.inflation_adjusted_value {
        println!("  Inflation-adjusted final balance: ${:.2}", real);
    }
    if let Some(loan) = &result.loan {
        println!("  Level payment: ${:.2}", loan.level_payment);
        println!("  Payments made: {} of {}", loan.payoff_periods, loan.scheduled_periods);
        if loan.extra_payment > 0.0 {
            println!("  Interest saved: ${:.2}", loan.interest_saved);
            println!("  Payments saved: {}", loan.time_saved_periods);
        }
    }
    if let Some(depletion) = &result.depletion {
        match depletion.age {
            Some(age) => println!("  Funds depleted at age {:.1}", age),
            None => println!("  Funds depleted after {:.2} years", depletion.years_elapsed),
        }
    }
}

fn print_retirement(plan: &RetirementPlan, projection: &RetirementProjection) {
    println!("Retirement plan: age {} to {}, planning to {}", plan.current_age, plan.retirement_age, plan.life_expectancy);
    println!("  Balance at retirement: ${:.2}", projection.balance_at_retirement);
    if let Some(real) = projection.accumulation.inflation_adjusted_value {
        println!("  In today's money: ${:.2}", real);
    }
    println!("  First withdrawal: ${:.2}", projection.first_withdrawal);
    println!("  Interest earned while saving: ${:.2}", projection.accumulation.total_interest);
    println!("  Interest earned in retirement: ${:.2}", projection.drawdown.total_interest);
    match projection.depletion_age {
        Some(age) => println!("  Savings run out at age {:.1}", age),
        None => println!(
            "  Savings last to age {} with ${:.2} remaining",
            plan.life_expectancy, projection.drawdown.terminal_balance
        ),
    }
}

use std::env;
use std::process;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use commission_engine::{CommissionResult, MonthKey};
use commission_ledger::sales_loader::{
    build_ledger, load_goals_file, load_sales_file, load_tier_table_file,
};
use commission_ledger::{
    all_time_stats, manager_dashboard, month_history, seller_month_stats, seller_summary,
    store_statistics, AllTimeStats, ManagerDashboard, MonthStats, MonthSummary, SalesLedger,
    SellerSummary, StoreStatistics,
};

const USAGE: &str = "\
Usage: commission-server <sales.csv> [--goals goals.csv] [--tiers tiers.json]
                         [--month YYYY-MM] [--seller ID] [--today YYYY-MM-DD]
                         [--top N] [--json]

Options:
  --goals    CSV of monthly store goals (month,store_goal[,seller])
  --tiers    JSON tier table to use instead of the reference table
  --month    Month to report on (default: the month of --today)
  --seller   Report for one seller instead of the store dashboard
  --today    Date used for remaining business days (default: today, UTC)
  --top      Leaderboard length (default: all sellers)
  --json     Output as JSON instead of formatted text

Example:
  commission-server fixtures/sales.csv --goals fixtures/goals.csv --month 2024-07
  commission-server fixtures/sales.csv --goals fixtures/goals.csv --seller ana --json";

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Options {
    sales_path: String,
    goals_path: Option<String>,
    tiers_path: Option<String>,
    month: Option<MonthKey>,
    seller: Option<String>,
    today: Option<NaiveDate>,
    top: Option<usize>,
    json: bool,
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let sales_path = args
        .get(1)
        .filter(|a| !a.starts_with("--"))
        .ok_or_else(|| "missing sales CSV path".to_string())?
        .clone();

    let mut options = Options {
        sales_path,
        goals_path: None,
        tiers_path: None,
        month: None,
        seller: None,
        today: None,
        top: None,
        json: false,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--goals" => {
                options.goals_path = Some(flag_value(args, i, "--goals")?.to_string());
                i += 2;
            }
            "--tiers" => {
                options.tiers_path = Some(flag_value(args, i, "--tiers")?.to_string());
                i += 2;
            }
            "--month" => {
                let value = flag_value(args, i, "--month")?;
                let month = value.parse::<MonthKey>().map_err(|e| e.to_string())?;
                options.month = Some(month);
                i += 2;
            }
            "--seller" => {
                let value = flag_value(args, i, "--seller")?.trim();
                if value.is_empty() {
                    return Err("--seller requires a non-empty id".to_string());
                }
                options.seller = Some(value.to_string());
                i += 2;
            }
            "--today" => {
                let value = flag_value(args, i, "--today")?;
                let today = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .map_err(|_| format!("--today expects YYYY-MM-DD, got {:?}", value))?;
                options.today = Some(today);
                i += 2;
            }
            "--top" => {
                let value = flag_value(args, i, "--top")?;
                let top = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| "--top requires a positive integer".to_string())?;
                options.top = Some(top);
                i += 2;
            }
            "--json" => {
                options.json = true;
                i += 1;
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }

    Ok(options)
}

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct StoreReportJson<'a> {
    generated_at: String,
    load_ms: u128,
    dashboard: &'a ManagerDashboard,
    statistics: &'a StoreStatistics,
}

#[derive(Serialize)]
struct SellerReportJson<'a> {
    generated_at: String,
    load_ms: u128,
    summary: &'a SellerSummary,
    month_stats: &'a MonthStats,
    all_time: &'a AllTimeStats,
    history: &'a [MonthSummary],
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format an amount with comma thousands separators and two decimals.
fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    let whole = (cents / 100).to_string();

    let mut grouped = String::new();
    for (i, ch) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let grouped: String = grouped.chars().rev().collect();
    format!("{}{}.{:02}", sign, grouped, cents % 100)
}

fn print_banner(title: &str) {
    let rule = "\u{2550}".repeat(64);
    println!();
    println!("  \u{2554}{}\u{2557}", rule);
    println!("  \u{2551}{:^64}\u{2551}", title);
    println!("  \u{255a}{}\u{255d}", rule);
    println!();
}

fn print_commission(commission: &CommissionResult) {
    println!(
        "  Commission  ${}  ({})",
        format_currency(commission.amount),
        commission.status
    );
    if commission.rate > 0.0 {
        println!("  Rate        {:.2}%", commission.rate * 100.0);
    }
    if let Some(perf) = commission.store_performance {
        println!("  Store       {:.1}% of goal", perf * 100.0);
    }
    if !commission.lost_amount.is_zero() {
        println!(
            "  Forfeited   ${}",
            format_currency(commission.lost_amount.amount())
        );
    }
    println!("  {}", commission.reason);
}

fn print_store_report(dashboard: &ManagerDashboard, statistics: &StoreStatistics, load_ms: u128) {
    print_banner(&format!("COMMISSION REPORT \u{00b7} Store \u{00b7} {}", dashboard.month));

    let pace = &dashboard.pace;
    println!(
        "  Store sales ${} of ${} goal ({:.1}%)  \u{00b7}  {} active sellers",
        format_currency(pace.total_store),
        format_currency(pace.store_goal),
        pace.goal_percentage,
        dashboard.active_sellers
    );
    if pace.goal_reached() {
        println!("  Goal reached.");
    } else if pace.remaining_business_days > 0 {
        println!(
            "  {} business days left  \u{00b7}  need ${}/day  \u{00b7}  averaging ${}/day",
            pace.remaining_business_days,
            format_currency(pace.required_daily_average),
            format_currency(pace.actual_daily_average)
        );
    } else {
        println!("  Month closed below goal.");
    }
    println!();

    if dashboard.leaderboard.is_empty() {
        println!("  No sales recorded for {}.", dashboard.month);
    } else {
        println!("  {:\u{2500}<64}", "");
        for entry in &dashboard.leaderboard {
            let marker = if entry.eligible { "\u{2713}" } else { " " };
            println!(
                "  {} {:>2}. {:16} {:>14}  {:>5.1}%  ${:>10}",
                marker,
                entry.rank,
                entry.seller,
                format_currency(entry.total_individual),
                entry.share_of_store,
                format_currency(entry.commission)
            );
        }
        println!("  {:\u{2500}<64}", "");
    }
    println!();

    if !statistics.months.is_empty() {
        println!("  Month      Store sales      Goal            Commission");
        for m in &statistics.months {
            println!(
                "  {}  {:>14}  {:>14}  {:>12}",
                m.month,
                format_currency(m.total_store),
                format_currency(m.store_goal),
                format_currency(m.total_commission)
            );
        }
        println!(
            "  All time   ${} store  \u{00b7}  ${} commission",
            format_currency(statistics.grand_total_store_sales),
            format_currency(statistics.grand_total_commission)
        );
        if let Some(best) = &statistics.best_month {
            println!(
                "  Best month {} (${})",
                best.month,
                format_currency(best.sales)
            );
        }
    }

    print_footer(load_ms);
}

fn print_seller_report(
    summary: &SellerSummary,
    month_stats: &MonthStats,
    all_time: &AllTimeStats,
    history: &[MonthSummary],
    load_ms: u128,
) {
    let s = &summary.summary;
    print_banner(&format!("COMMISSION REPORT \u{00b7} {} \u{00b7} {}", s.seller, s.month));

    println!(
        "  Individual  ${}  over {} entries (avg ${})",
        format_currency(s.totals.total_individual),
        month_stats.sales_days,
        format_currency(month_stats.average_daily_sale)
    );
    println!(
        "  Store       ${} of ${} goal",
        format_currency(s.totals.total_store),
        format_currency(s.store_goal)
    );
    if let Some(best) = &month_stats.best_day {
        println!("  Best day    {} (${})", best.date, format_currency(best.sales));
    }
    println!();
    print_commission(&s.commission);
    println!();

    let insights = &summary.insights;
    if insights.is_on_highest_tier {
        println!("  Above the highest tier.");
    } else if let Some(next) = insights.next_tier {
        println!(
            "  ${} more to reach the {:.2}% tier",
            format_currency(insights.amount_to_next_tier),
            next.rate * 100.0
        );
    }
    if summary.pace.required_daily_average > 0.0 {
        println!(
            "  Store needs ${}/day over {} business days",
            format_currency(summary.pace.required_daily_average),
            summary.pace.remaining_business_days
        );
    }
    println!();

    if !history.is_empty() {
        println!("  {:\u{2500}<64}", "");
        for m in history {
            println!(
                "  {}  {:>14}  {:>5.1}% of goal  ${:>10}  {}",
                m.month,
                format_currency(m.totals.total_individual),
                m.store_goal_percentage,
                format_currency(m.commission.amount),
                m.commission.status
            );
        }
        println!("  {:\u{2500}<64}", "");
    }
    println!(
        "  All time    ${} sales  \u{00b7}  ${} commission  \u{00b7}  {} months",
        format_currency(all_time.total_sales),
        format_currency(all_time.total_commission),
        all_time.total_months
    );

    print_footer(load_ms);
}

fn print_footer(load_ms: u128) {
    println!();
    println!("  \u{23f1}  Data loaded in {}ms", load_ms);
    println!();
}

fn print_json<T: Serialize>(report: &T) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing report: {}", e);
            process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn load(options: &Options) -> Result<SalesLedger, commission_ledger::LedgerError> {
    let sales = load_sales_file(&options.sales_path)?;
    let goals = match &options.goals_path {
        Some(path) => load_goals_file(path)?,
        None => Vec::new(),
    };
    let tiers = match &options.tiers_path {
        Some(path) => Some(load_tier_table_file(path)?),
        None => None,
    };
    build_ledger(&sales, &goals, tiers)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    let load_start = Instant::now();
    let ledger = match load(&options) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error loading data: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();

    let today = options.today.unwrap_or_else(|| Utc::now().date_naive());
    let month = options.month.unwrap_or_else(|| MonthKey::of(today));
    log::info!("reporting on {} as of {}", month, today);

    match &options.seller {
        None => {
            let dashboard = manager_dashboard(&ledger, month, today, options.top);
            let statistics = store_statistics(&ledger);
            if options.json {
                print_json(&StoreReportJson {
                    generated_at: Utc::now().to_rfc3339(),
                    load_ms,
                    dashboard: &dashboard,
                    statistics: &statistics,
                });
            } else {
                print_store_report(&dashboard, &statistics, load_ms);
            }
        }
        Some(seller) => {
            if ledger.history(seller).is_none() {
                eprintln!("Error: no entries for seller {:?}", seller);
                eprintln!("  Available: {:?}", ledger.seller_ids());
                process::exit(1);
            }
            let summary = seller_summary(&ledger, seller, month, today);
            let month_stats = seller_month_stats(&ledger, seller, month);
            let all_time = all_time_stats(&ledger, seller);
            let history = month_history(&ledger, seller);
            if options.json {
                print_json(&SellerReportJson {
                    generated_at: Utc::now().to_rfc3339(),
                    load_ms,
                    summary: &summary,
                    month_stats: &month_stats,
                    all_time: &all_time,
                    history: &history,
                });
            } else {
                print_seller_report(&summary, &month_stats, &all_time, &history, load_ms);
            }
        }
    }
}

mod cli;

use std::path::{Path, PathBuf};

use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use confirmation_verifier::{
    geocode::{AddressLookup, KakaoLocalClient},
    sheet,
    utils,
    verify::{similarity, BatchReport, BatchRunner, CrossValidator, Verdict},
    Config, Result,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("confirmation_verifier=info,confirm_verify=info,warn")
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            threshold,
            concurrency,
            format,
            verbose,
        } => {
            info!("Validating {}", input.display());
            run_validation(config, &input, output, threshold, concurrency, format, verbose).await
        }

        Commands::Score { first, second } => {
            show_score(&first, &second, config.validation.threshold);
            Ok(())
        }

        Commands::Lookup { query, keyword } => lookup(&config, &query, keyword).await,

        Commands::Check => check(&config),
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn run_validation(
    config: Config,
    input: &Path,
    output: Option<PathBuf>,
    threshold: Option<u8>,
    concurrency: Option<usize>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let config = config.with_overrides(threshold, concurrency)?;

    // credential and output problems stop the run before any lookup
    let client = KakaoLocalClient::from_config(&config)?;
    let output = output.unwrap_or_else(|| PathBuf::from(&config.report.output_path));
    sheet::check_output_path(&output)?;

    let table = sheet::load_input(input)?;
    if format == OutputFormat::Table {
        println!(
            "{}",
            format!("분석 준비 완료: {}건", table.records.len()).cyan()
        );
        if table.skipped_rows > 0 {
            println!(
                "{}",
                format!("기업명이 없는 {}개 행은 제외되었습니다", table.skipped_rows).yellow()
            );
        }
    }

    let runner = BatchRunner::new(
        CrossValidator::new(client),
        config.validation.threshold,
        config.validation.concurrency,
    );

    let progress = ProgressBar::new(table.records.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .map_err(anyhow::Error::from)?
            .progress_chars("=>-"),
    );

    let report = runner
        .run(&table.records, &table.eligibility, |done, _total| {
            progress.set_position(done as u64)
        })
        .await;
    progress.finish_and_clear();

    sheet::write_report(&report, &output)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            if verbose {
                print_outcomes(&report);
            }
            report.summary.print_summary();
            println!("Report:            {}", output.display().to_string().cyan());
        }
    }

    Ok(())
}

fn print_outcomes(report: &BatchReport) {
    const WIDTHS: [usize; 8] = [18, 10, 34, 8, 34, 34, 6, 8];

    println!("\n{}", "📊 검증 결과 리포트".yellow());
    utils::print_table_border(170);
    utils::print_table_row(&sheet::REPORT_HEADERS, &WIDTHS);
    utils::print_table_border(170);

    for outcome in &report.outcomes {
        let cells = sheet::report_row(outcome);
        let columns: Vec<&str> = cells.iter().map(String::as_str).collect();
        let line = utils::format_table_row(&columns, &WIDTHS);
        match outcome.verdict {
            Verdict::Match => println!("{}", line),
            Verdict::NeedsReview => println!("{}", line.red()),
        }
    }
    utils::print_table_border(170);
}

fn show_score(first: &str, second: &str, threshold: u8) {
    let score = similarity::score(first, second);
    println!("A: {} -> {}", first, similarity::normalize(first).cyan());
    println!("B: {} -> {}", second, similarity::normalize(second).cyan());
    println!("Similarity: {}", utils::format_score(score, threshold).bold());
}

async fn lookup(config: &Config, query: &str, keyword: bool) -> Result<()> {
    let client = KakaoLocalClient::from_config(config)?;

    let result = if keyword {
        client.lookup_by_keyword(query).await
    } else {
        client.lookup_by_address(query).await
    };

    match result.address() {
        Some(address) => println!("{} {}", "✓".green(), address),
        None => println!("{} {}", "✗".red(), sheet::report::UNRESOLVED_LABEL),
    }
    Ok(())
}

fn check(config: &Config) -> Result<()> {
    let api_key = config.api_key()?;

    println!("{}", "✓ Configuration loaded".green());
    println!("{}", "✓ API key found".green());
    println!("\n{}", "Configuration:".cyan());
    println!("  API key:        {}", utils::mask_secret(&api_key));
    println!("  Base URL:       {}", config.geocoder.base_url);
    println!("  Timeout:        {}s", config.geocoder.timeout_secs);
    println!("  Threshold:      {}%", config.validation.threshold);
    println!("  Concurrency:    {}", config.validation.concurrency);
    println!("  Report path:    {}", config.report.output_path);

    println!("\n{}", "Ready to use! Try running:".cyan());
    println!("  {} to validate a table", "confirm-verify run -i companies.xlsx".yellow());
    println!("  {} to compare two addresses", "confirm-verify score <a> <b>".yellow());
    Ok(())
}

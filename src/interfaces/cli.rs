// ============================================================
// CLI INTERFACE
// ============================================================
// Thin presentation shell: parses arguments, feeds input into the
// core pipeline, renders whatever the core returns

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::application::use_cases::batch_valuation::BatchValuationUseCase;
use crate::application::use_cases::manual_entry::{FormField, PropertyForm};
use crate::application::use_cases::single_valuation::SingleValuationUseCase;
use crate::domain::error::{AppError, Result};
use crate::domain::outcome::{BatchReport, BatchStatus, PredictionOutcome};
use crate::domain::property::PropertyRecord;
use crate::infrastructure::config::Settings;
use crate::infrastructure::csv::RecordParser;
use crate::infrastructure::predictor::{HttpPredictionClient, PredictionClient};

#[derive(Debug, Parser)]
#[command(
    name = "homeworth",
    version,
    about = "Estimate house prices against a remote prediction service"
)]
pub struct Cli {
    /// Path to a TOML settings file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the prediction service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Value every property in a delimited file
    Batch {
        /// CSV file with a header row
        file: PathBuf,

        /// Override the concurrent request limit
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Value a single property from field values
    Single {
        #[arg(long)]
        bedrooms: String,
        #[arg(long)]
        bathrooms: String,
        #[arg(long)]
        sqft_living: String,
        #[arg(long, default_value = "")]
        sqft_lot: String,
        #[arg(long, default_value = "")]
        floors: String,
        #[arg(long)]
        sqft_above: String,
        #[arg(long)]
        sqft_basement: String,
        #[arg(long)]
        yr_built: String,
        #[arg(long)]
        zipcode: String,
    },
    /// Probe the prediction service health endpoint
    Status,
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(base_url) = &cli.base_url {
        settings.service.base_url = base_url.clone();
        settings.validate()?;
    }

    let client: Arc<dyn PredictionClient + Send + Sync> =
        Arc::new(HttpPredictionClient::new(&settings.service)?);

    match cli.command {
        Command::Batch { file, concurrency } => {
            run_batch(
                &file,
                client,
                concurrency.unwrap_or(settings.batch.max_concurrency),
                cli.json,
            )
            .await
        }
        Command::Single {
            bedrooms,
            bathrooms,
            sqft_living,
            sqft_lot,
            floors,
            sqft_above,
            sqft_basement,
            yr_built,
            zipcode,
        } => {
            let mut form = PropertyForm::new();
            for (field, value) in [
                (FormField::Bedrooms, bedrooms),
                (FormField::Bathrooms, bathrooms),
                (FormField::SqftLiving, sqft_living),
                (FormField::SqftLot, sqft_lot),
                (FormField::Floors, floors),
                (FormField::SqftAbove, sqft_above),
                (FormField::SqftBasement, sqft_basement),
                (FormField::YrBuilt, yr_built),
                (FormField::Zipcode, zipcode),
            ] {
                if !form.set(field, &value) {
                    return Err(AppError::ValidationError(format!(
                        "Field {:?} rejects negative value '{}'",
                        field, value
                    )));
                }
            }

            run_single(&form, client, cli.json).await
        }
        Command::Status => {
            let status = client.status().await?;
            println!("Service status: {}", status);
            Ok(())
        }
    }
}

async fn run_batch(
    file: &PathBuf,
    client: Arc<dyn PredictionClient + Send + Sync>,
    max_concurrency: usize,
    json: bool,
) -> Result<()> {
    let batch = RecordParser::new().parse_file(file)?;
    if batch.dropped_count() > 0 {
        warn!(dropped = batch.dropped_count(), "Some rows were ignored");
        for dropped in &batch.dropped {
            eprintln!("Row {} ignored: {:?}", dropped.row, dropped.reason);
        }
    }

    let records: Vec<PropertyRecord> = batch
        .records
        .iter()
        .filter_map(PropertyRecord::from_candidate)
        .collect();
    if records.is_empty() {
        return Err(AppError::ValidationError(
            "No usable records in input file".to_string(),
        ));
    }

    let report = BatchValuationUseCase::new(client, max_concurrency)
        .execute(records)
        .await?;
    print_report(&report, json)
}

async fn run_single(
    form: &PropertyForm,
    client: Arc<dyn PredictionClient + Send + Sync>,
    json: bool,
) -> Result<()> {
    let outcome = SingleValuationUseCase::new(client).execute(form).await?;

    if json {
        println!("{}", to_json(&outcome)?);
        return Ok(());
    }

    match &outcome {
        PredictionOutcome::Success { price, record } => {
            println!(
                "Estimated price for {} sqft in {}: ${:.2}",
                record.sqft_living, record.zipcode, price
            );
            Ok(())
        }
        PredictionOutcome::Failure { reason, .. } => {
            Err(AppError::PredictionError(reason.to_string()))
        }
    }
}

fn print_report(report: &BatchReport, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(report)?);
        return Ok(());
    }

    for (index, outcome) in report.outcomes.iter().enumerate() {
        match outcome {
            PredictionOutcome::Success { price, record } => {
                println!(
                    "#{:<4} {} sqft, zipcode {:<6} ${:.2}",
                    index + 1,
                    record.sqft_living,
                    record.zipcode,
                    price
                );
            }
            PredictionOutcome::Failure { reason, record } => {
                println!(
                    "#{:<4} {} sqft, zipcode {:<6} FAILED: {}",
                    index + 1,
                    record.sqft_living,
                    record.zipcode,
                    reason
                );
            }
        }
    }

    println!();
    println!(
        "Batch {}: {} succeeded, {} failed",
        report.batch_id, report.summary.succeeded, report.summary.failed
    );
    if report.summary.succeeded > 0 {
        println!(
            "Total value: ${:.2}, average: ${:.2}",
            report.summary.total_value, report.summary.average_value
        );
    }
    match report.status {
        BatchStatus::FullSuccess => println!("Status: full success"),
        BatchStatus::PartialSuccess => {
            println!("Status: partial success ({} failed)", report.summary.failed)
        }
        BatchStatus::TotalFailure => println!("Status: total failure"),
        BatchStatus::Empty => println!("Status: empty batch"),
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(format!("Failed to serialize output: {}", e)))
}

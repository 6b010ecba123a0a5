pub mod domain;
pub mod projections;
pub mod shared;
pub mod system;
pub mod usecases;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use contracts::usecases::u601_payroll_upload::{StorageMode, UploadRequest};

use crate::usecases::u601_payroll_upload::{
    MemorySink, PayrollUploadExecutor, RecordSink, SeaOrmSink,
};

/// Import payroll sheets (Excel/CSV) into the payroll database
#[derive(Parser, Debug)]
#[command(name = "payroll-backend", version)]
struct Args {
    /// Workbook file(s): .xlsx, .xlsm, .xlsb, .xls, .ods or .csv
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Path to config.toml
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Storage mode
    #[arg(long, value_enum, default_value = "ledger")]
    mode: ModeArg,

    /// Payroll period date (YYYY-MM-DD), part of the duplicate-detection hash
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    effective_date: Option<NaiveDate>,

    /// Parse and plan without touching the database
    #[arg(long)]
    dry_run: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Append-only history, unique by content hash
    Ledger,
    /// One record per identifier
    Snapshot,
}

impl From<ModeArg> for StorageMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Ledger => StorageMode::Ledger,
            ModeArg::Snapshot => StorageMode::Snapshot,
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("{}: {}", value, e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = shared::config::load_config(args.config.as_deref())?;
    system::tracing::initialize(std::path::Path::new(&config.logging.dir))?;

    let sink: Arc<dyn RecordSink> = if args.dry_run {
        tracing::info!("Dry run: results are kept in memory");
        Arc::new(MemorySink::new())
    } else {
        let db_path = shared::config::get_database_path(&config)?
            .to_string_lossy()
            .into_owned();
        shared::data::db::initialize_database(Some(db_path.as_str())).await?;
        Arc::new(SeaOrmSink::new(shared::data::db::get_connection()?.clone()))
    };

    let mut request = UploadRequest::new(args.mode.into());
    if let Some(date) = args.effective_date {
        request = request.with_effective_date(date);
    }

    let executor = PayrollUploadExecutor::new(sink, config.ingest.clone());
    let outcomes = executor.upload_paths(&request, &args.files).await;

    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(())
}

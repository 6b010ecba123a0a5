use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u601_payroll_upload::{UploadOutcome, UploadRequest};

use crate::shared::excel::{load_workbook, Workbook};

use super::errors::IngestError;
use super::pipeline::parse_workbook;
use super::planner::{self, WriteContext};
use super::record_sink::RecordSink;
use super::settings::IngestSettings;

/// Executor для UseCase загрузки зарплатных ведомостей
pub struct PayrollUploadExecutor {
    sink: Arc<dyn RecordSink>,
    settings: IngestSettings,
}

impl UseCaseMetadata for PayrollUploadExecutor {
    fn usecase_index() -> &'static str {
        "u601"
    }

    fn usecase_name() -> &'static str {
        "payroll_upload"
    }

    fn display_name() -> &'static str {
        "Загрузка зарплатных ведомостей"
    }

    fn description() -> &'static str {
        "Импорт ведомостей из Excel/CSV с нормализацией идентификаторов и конвертацией шрифта Preeti"
    }
}

impl PayrollUploadExecutor {
    pub fn new(sink: Arc<dyn RecordSink>, settings: IngestSettings) -> Self {
        Self { sink, settings }
    }

    /// Файлы обрабатываются строго по очереди; ошибка одного файла не
    /// прерывает остальные
    pub async fn upload_paths(&self, request: &UploadRequest, paths: &[PathBuf]) -> Vec<UploadOutcome> {
        tracing::info!(
            "Starting {} with {} file(s), mode {:?}",
            Self::full_name(),
            paths.len(),
            request.mode
        );

        let mut outcomes = Vec::with_capacity(paths.len());
        for path in paths {
            let filename = display_name(path);
            let outcome = match load_workbook(path) {
                Ok(workbook) => self.upload_workbook(request, &filename, &workbook).await,
                Err(e) => reject(&filename, IngestError::from(e)),
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    pub async fn upload_workbook(
        &self,
        request: &UploadRequest,
        filename: &str,
        workbook: &Workbook,
    ) -> UploadOutcome {
        let effective_date = request.effective_date_key();
        let batch = match parse_workbook(workbook, &self.settings, &effective_date) {
            Ok(batch) => batch,
            Err(e) => return reject(filename, e),
        };

        let mut outcome = UploadOutcome::new(filename);
        outcome.rows_read = batch.rows.len();
        outcome.skipped = batch.skipped;
        outcome.errors = batch.errors;
        outcome.records = batch
            .rows
            .iter()
            .take(self.settings.sample_limit)
            .map(|row| row.to_record())
            .collect();

        let ctx = WriteContext {
            source: filename.to_string(),
            effective_date: (!effective_date.is_empty()).then_some(effective_date),
            uploaded_at: Utc::now(),
        };
        let plan = planner::plan(&batch.rows, request.mode, &ctx);
        let counts = planner::execute(plan, self.sink.as_ref()).await;

        outcome.inserted = counts.inserted;
        outcome.updated = counts.updated;
        outcome.skipped += counts.skipped;
        outcome.errors.extend(counts.errors);

        tracing::info!(
            "{}: read {}, inserted {}, updated {}, skipped {}, errors {}",
            filename,
            outcome.rows_read,
            outcome.inserted,
            outcome.updated,
            outcome.skipped,
            outcome.errors.len()
        );
        outcome
    }
}

fn reject(filename: &str, err: IngestError) -> UploadOutcome {
    tracing::error!("Rejected {}: {}", filename, err);
    UploadOutcome::rejected(filename, err.to_string())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

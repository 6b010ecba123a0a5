//! Дедупликация и план записи: история (уникальность по hash) или снимок
//! (одна запись на идентификатор).
//!
//! Строки идут в порядке листов и строк файла. В режиме снимка при
//! нескольких строках с одним идентификатором изменяемые поля берутся из
//! последней строки, identity-поля из первого непустого значения.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use contracts::usecases::u601_payroll_upload::StorageMode;
use sha2::{Digest, Sha256};

use crate::domain::a001_payroll_record::{IdentityFields, LedgerEntry, MutableFields};
use crate::shared::excel::cell::format_number;

use super::record_sink::RecordSink;
use super::row_parser::ParsedRow;

/// SHA-256 (hex) от "identifier|department|effective_date|amount"
pub fn content_hash(identifier: &str, department: &str, effective_date: &str, amount: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(
        format!(
            "{}|{}|{}|{}",
            identifier,
            department,
            effective_date,
            format_number(amount)
        )
        .as_bytes(),
    );
    format!("{:x}", hasher.finalize())
}

/// Контекст загрузки, общий для всех строк файла
#[derive(Debug, Clone)]
pub struct WriteContext {
    pub source: String,
    pub effective_date: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannedWrite {
    Append(LedgerEntry),
    Upsert {
        identifier: String,
        identity: IdentityFields,
        values: MutableFields,
    },
}

#[derive(Debug, Default)]
pub struct WritePlan {
    pub writes: Vec<PlannedWrite>,
    /// Дубликаты внутри файла и перекрытые более поздними строки
    pub skipped: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteCounts {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

fn mutable_fields(row: &ParsedRow, ctx: &WriteContext) -> MutableFields {
    MutableFields {
        rate: row.rate,
        gross_amount: row.gross_amount,
        tax_amount: row.tax_amount,
        net_amount: row.net_amount,
        duty_days: row.duty_days.clone(),
        content_hash: row.content_hash.clone(),
        source: ctx.source.clone(),
        effective_date: ctx.effective_date.clone(),
        uploaded_at: ctx.uploaded_at,
    }
}

pub fn plan(rows: &[ParsedRow], mode: StorageMode, ctx: &WriteContext) -> WritePlan {
    match mode {
        StorageMode::Ledger => plan_ledger(rows, ctx),
        StorageMode::Snapshot => plan_snapshot(rows, ctx),
    }
}

fn plan_ledger(rows: &[ParsedRow], ctx: &WriteContext) -> WritePlan {
    let mut result = WritePlan::default();
    let mut seen: HashSet<&str> = HashSet::new();
    for row in rows {
        if !seen.insert(row.content_hash.as_str()) {
            result.skipped += 1;
            continue;
        }
        result.writes.push(PlannedWrite::Append(LedgerEntry {
            identifier: row.identifier.value.clone(),
            identity: row.identity(),
            values: mutable_fields(row, ctx),
        }));
    }
    result
}

/// Last-write-wins по идентификатору; запись стоит на месте первого появления
fn plan_snapshot(rows: &[ParsedRow], ctx: &WriteContext) -> WritePlan {
    let mut order: Vec<&str> = Vec::new();
    let mut merged: HashMap<&str, (IdentityFields, &ParsedRow)> = HashMap::new();
    let mut skipped = 0;

    for row in rows {
        let key = row.identifier.value.as_str();
        match merged.get_mut(key) {
            Some((identity, last)) => {
                identity.fill_missing_from(&row.identity());
                *last = row;
                skipped += 1;
            }
            None => {
                order.push(key);
                merged.insert(key, (row.identity(), row));
            }
        }
    }

    let writes = order
        .into_iter()
        .filter_map(|key| merged.remove(key).map(|entry| (key, entry)))
        .map(|(key, (identity, last))| PlannedWrite::Upsert {
            identifier: key.to_string(),
            identity,
            values: mutable_fields(last, ctx),
        })
        .collect();

    WritePlan { writes, skipped }
}

/// Выполняет план. Ошибка записи одной строки не прерывает остальные.
pub async fn execute(plan: WritePlan, sink: &dyn RecordSink) -> WriteCounts {
    let mut counts = WriteCounts {
        skipped: plan.skipped,
        ..Default::default()
    };

    for write in plan.writes {
        match write {
            PlannedWrite::Append(entry) => match append(sink, &entry).await {
                Ok(true) => counts.inserted += 1,
                Ok(false) => counts.skipped += 1,
                Err(e) => {
                    tracing::warn!("Ledger write failed for {}: {}", entry.identifier, e);
                    counts.skipped += 1;
                    counts
                        .errors
                        .push(format!("{}: {}", entry.identifier, e));
                }
            },
            PlannedWrite::Upsert {
                identifier,
                identity,
                values,
            } => match sink.upsert_by_identifier(&identifier, &values, &identity).await {
                Ok(result) if result.inserted => counts.inserted += 1,
                Ok(_) => counts.updated += 1,
                Err(e) => {
                    tracing::warn!("Upsert failed for {}: {}", identifier, e);
                    counts.skipped += 1;
                    counts.errors.push(format!("{}: {}", identifier, e));
                }
            },
        }
    }
    counts
}

async fn append(sink: &dyn RecordSink, entry: &LedgerEntry) -> anyhow::Result<bool> {
    if sink.exists_by_hash(&entry.values.content_hash).await? {
        return Ok(false);
    }
    sink.insert_if_hash_absent(entry).await
}

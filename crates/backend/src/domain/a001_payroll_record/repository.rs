use anyhow::Result;
use contracts::domain::a001_payroll_record::{DutyDays, TransliteratedText};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use super::fields::{IdentityFields, MutableFields, UpsertResult};

/// Актуальный снимок по сотруднику: одна запись на идентификатор
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_payroll_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub identifier: String,

    // identity fields (set on insert only)
    pub name: Option<String>,
    pub name_original: Option<String>,
    pub position: Option<String>,
    pub position_original: Option<String>,
    pub department: Option<String>,
    pub department_original: Option<String>,
    pub account_number: Option<String>,

    // mutable fields
    pub rate: Option<f64>,
    pub gross_amount: Option<f64>,
    pub tax_amount: Option<f64>,
    pub net_amount: f64,
    pub duty_period_1: Option<f64>,
    pub duty_period_2: Option<f64>,
    pub duty_period_3: Option<f64>,
    pub duty_total: Option<f64>,
    pub content_hash: String,
    pub source: String,
    pub effective_date: Option<String>,
    pub uploaded_at: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS a001_payroll_record (
        identifier TEXT PRIMARY KEY NOT NULL,
        name TEXT,
        name_original TEXT,
        position TEXT,
        position_original TEXT,
        department TEXT,
        department_original TEXT,
        account_number TEXT,
        rate REAL,
        gross_amount REAL,
        tax_amount REAL,
        net_amount REAL NOT NULL,
        duty_period_1 REAL,
        duty_period_2 REAL,
        duty_period_3 REAL,
        duty_total REAL,
        content_hash TEXT NOT NULL,
        source TEXT NOT NULL,
        effective_date TEXT,
        uploaded_at TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
"#;

pub(crate) fn split_text(text: &Option<TransliteratedText>) -> (Option<String>, Option<String>) {
    match text {
        Some(t) => (Some(t.converted.clone()), Some(t.original.clone())),
        None => (None, None),
    }
}

pub(crate) fn split_duty(duty: &Option<DutyDays>) -> [Option<f64>; 4] {
    match duty {
        Some(d) => [d.periods[0], d.periods[1], d.periods[2], d.total],
        None => [None; 4],
    }
}

fn to_active_model(identifier: &str, set: &MutableFields, on_insert: &IdentityFields) -> ActiveModel {
    let (name, name_original) = split_text(&on_insert.name);
    let (position, position_original) = split_text(&on_insert.position);
    let (department, department_original) = split_text(&on_insert.department);
    let [p1, p2, p3, total] = split_duty(&set.duty_days);

    ActiveModel {
        identifier: Set(identifier.to_string()),
        name: Set(name),
        name_original: Set(name_original),
        position: Set(position),
        position_original: Set(position_original),
        department: Set(department),
        department_original: Set(department_original),
        account_number: Set(on_insert.account_number.clone()),
        rate: Set(set.rate),
        gross_amount: Set(set.gross_amount),
        tax_amount: Set(set.tax_amount),
        net_amount: Set(set.net_amount),
        duty_period_1: Set(p1),
        duty_period_2: Set(p2),
        duty_period_3: Set(p3),
        duty_total: Set(total),
        content_hash: Set(set.content_hash.clone()),
        source: Set(set.source.clone()),
        effective_date: Set(set.effective_date.clone()),
        uploaded_at: Set(set.uploaded_at.to_rfc3339()),
        created_at: Set(set.uploaded_at.to_rfc3339()),
    }
}

/// Upsert по идентификатору.
///
/// Identity-поля пишутся только при вставке; изменяемые поля, hash, источник
/// и время загрузки перезаписываются. Запись делается одним `INSERT .. ON CONFLICT`,
/// чтение существования и запись в одной транзакции.
pub async fn upsert_by_identifier(
    db: &DatabaseConnection,
    identifier: &str,
    set: &MutableFields,
    on_insert: &IdentityFields,
) -> Result<UpsertResult> {
    let txn = db.begin().await?;

    let existed = Entity::find_by_id(identifier.to_string())
        .one(&txn)
        .await?
        .is_some();

    Entity::insert(to_active_model(identifier, set, on_insert))
        .on_conflict(
            OnConflict::column(Column::Identifier)
                .update_columns([
                    Column::Rate,
                    Column::GrossAmount,
                    Column::TaxAmount,
                    Column::NetAmount,
                    Column::DutyPeriod1,
                    Column::DutyPeriod2,
                    Column::DutyPeriod3,
                    Column::DutyTotal,
                    Column::ContentHash,
                    Column::Source,
                    Column::EffectiveDate,
                    Column::UploadedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    txn.commit().await?;

    Ok(UpsertResult {
        inserted: !existed,
        modified: existed,
    })
}

pub async fn get_by_identifier<C: ConnectionTrait>(db: &C, identifier: &str) -> Result<Option<Model>> {
    Ok(Entity::find_by_id(identifier.to_string()).one(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use chrono::Utc;

    fn values(net: f64, hash: &str) -> MutableFields {
        MutableFields {
            rate: Some(1000.0),
            gross_amount: None,
            tax_amount: None,
            net_amount: net,
            duty_days: Some(DutyDays {
                periods: [Some(10.0), Some(10.0), None],
                total: Some(20.0),
            }),
            content_hash: hash.to_string(),
            source: "test.xlsx".to_string(),
            effective_date: None,
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_identity_fields() {
        let db = connect_in_memory().await.unwrap();

        let first = IdentityFields {
            name: Some(TransliteratedText {
                original: "/fd".to_string(),
                converted: "राम".to_string(),
            }),
            ..Default::default()
        };
        let result = upsert_by_identifier(&db, "123456789", &values(30000.0, "h1"), &first)
            .await
            .unwrap();
        assert!(result.inserted);
        assert!(!result.modified);

        let second = IdentityFields {
            name: Some(TransliteratedText::unchanged("Shyam")),
            account_number: Some("1234567890123".to_string()),
            ..Default::default()
        };
        let result = upsert_by_identifier(&db, "123456789", &values(35000.0, "h2"), &second)
            .await
            .unwrap();
        assert!(!result.inserted);
        assert!(result.modified);

        let stored = get_by_identifier(&db, "123456789").await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("राम"));
        assert_eq!(stored.name_original.as_deref(), Some("/fd"));
        assert_eq!(stored.account_number, None);
        assert_eq!(stored.net_amount, 35000.0);
        assert_eq!(stored.content_hash, "h2");
        assert_eq!(stored.duty_total, Some(20.0));
    }
}

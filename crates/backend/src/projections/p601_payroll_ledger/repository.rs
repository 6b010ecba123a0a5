use anyhow::Result;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::a001_payroll_record::repository::{split_duty, split_text};
use crate::domain::a001_payroll_record::LedgerEntry;

/// История загрузок ведомостей: каждая уникальная строка хранится один раз
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "p601_payroll_ledger")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub identifier: String,
    pub name: Option<String>,
    pub name_original: Option<String>,
    pub position: Option<String>,
    pub position_original: Option<String>,
    pub department: Option<String>,
    pub department_original: Option<String>,
    pub account_number: Option<String>,

    pub rate: Option<f64>,
    pub gross_amount: Option<f64>,
    pub tax_amount: Option<f64>,
    pub net_amount: f64,
    pub duty_period_1: Option<f64>,
    pub duty_period_2: Option<f64>,
    pub duty_period_3: Option<f64>,
    pub duty_total: Option<f64>,

    /// Натуральный ключ строки (sha256)
    pub content_hash: String,
    pub source: String,
    pub effective_date: Option<String>,
    pub uploaded_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS p601_payroll_ledger (
        id TEXT PRIMARY KEY NOT NULL,
        identifier TEXT NOT NULL,
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
        content_hash TEXT NOT NULL UNIQUE,
        source TEXT NOT NULL,
        effective_date TEXT,
        uploaded_at TEXT NOT NULL
    );
"#;

pub const CREATE_INDEX_SQL: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_p601_payroll_ledger_identifier
        ON p601_payroll_ledger (identifier);
"#;

fn to_active_model(entry: &LedgerEntry) -> ActiveModel {
    let (name, name_original) = split_text(&entry.identity.name);
    let (position, position_original) = split_text(&entry.identity.position);
    let (department, department_original) = split_text(&entry.identity.department);
    let [p1, p2, p3, total] = split_duty(&entry.values.duty_days);

    ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        identifier: Set(entry.identifier.clone()),
        name: Set(name),
        name_original: Set(name_original),
        position: Set(position),
        position_original: Set(position_original),
        department: Set(department),
        department_original: Set(department_original),
        account_number: Set(entry.identity.account_number.clone()),
        rate: Set(entry.values.rate),
        gross_amount: Set(entry.values.gross_amount),
        tax_amount: Set(entry.values.tax_amount),
        net_amount: Set(entry.values.net_amount),
        duty_period_1: Set(p1),
        duty_period_2: Set(p2),
        duty_period_3: Set(p3),
        duty_total: Set(total),
        content_hash: Set(entry.values.content_hash.clone()),
        source: Set(entry.values.source.clone()),
        effective_date: Set(entry.values.effective_date.clone()),
        uploaded_at: Set(entry.values.uploaded_at.to_rfc3339()),
    }
}

pub async fn exists_by_hash<C: ConnectionTrait>(db: &C, content_hash: &str) -> Result<bool> {
    let found = Entity::find()
        .filter(Column::ContentHash.eq(content_hash))
        .one(db)
        .await?;
    Ok(found.is_some())
}

/// Вставка, только если такого content hash ещё нет.
/// Возвращает `false` для дубликата (ON CONFLICT DO NOTHING).
pub async fn insert_if_absent<C: ConnectionTrait>(db: &C, entry: &LedgerEntry) -> Result<bool> {
    let rows = Entity::insert(to_active_model(entry))
        .on_conflict(
            OnConflict::column(Column::ContentHash)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(rows > 0)
}

/// Все строки истории по сотруднику, по времени загрузки
pub async fn list_by_identifier<C: ConnectionTrait>(db: &C, identifier: &str) -> Result<Vec<Model>> {
    Ok(Entity::find()
        .filter(Column::Identifier.eq(identifier))
        .order_by_asc(Column::UploadedAt)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_payroll_record::{IdentityFields, MutableFields};
    use crate::shared::data::db::connect_in_memory;
    use chrono::Utc;

    fn entry(identifier: &str, hash: &str) -> LedgerEntry {
        LedgerEntry {
            identifier: identifier.to_string(),
            identity: IdentityFields::default(),
            values: MutableFields {
                rate: None,
                gross_amount: Some(40000.0),
                tax_amount: Some(5000.0),
                net_amount: 35000.0,
                duty_days: None,
                content_hash: hash.to_string(),
                source: "ledger.xlsx".to_string(),
                effective_date: Some("2024-07-16".to_string()),
                uploaded_at: Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn test_insert_if_absent_rejects_duplicate_hash() {
        let db = connect_in_memory().await.unwrap();

        assert!(!exists_by_hash(&db, "h1").await.unwrap());
        assert!(insert_if_absent(&db, &entry("000012345", "h1")).await.unwrap());
        assert!(exists_by_hash(&db, "h1").await.unwrap());
        assert!(!insert_if_absent(&db, &entry("000012345", "h1")).await.unwrap());
        assert!(insert_if_absent(&db, &entry("000012345", "h2")).await.unwrap());

        let rows = list_by_identifier(&db, "000012345").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].effective_date.as_deref(), Some("2024-07-16"));
    }
}

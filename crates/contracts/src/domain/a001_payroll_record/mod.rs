pub mod aggregate;

pub use aggregate::{DutyDays, IdentifierKind, PayrollRecord, TransliteratedText};

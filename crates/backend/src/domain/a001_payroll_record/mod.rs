pub mod fields;
pub mod identifier;
pub mod repository;

pub use fields::{IdentityFields, LedgerEntry, MutableFields, UpsertResult};
pub use identifier::NormalizedIdentifier;

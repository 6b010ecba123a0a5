pub mod column_classifier;
pub mod errors;
pub mod executor;
pub mod header_locator;
pub mod pipeline;
pub mod planner;
pub mod record_sink;
pub mod row_parser;
pub mod settings;

pub use executor::PayrollUploadExecutor;
pub use record_sink::{MemorySink, RecordSink, SeaOrmSink};
pub use settings::IngestSettings;

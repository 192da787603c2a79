//! Core data types for the fleet import pipeline.
//!
//! Every stage of the import flow exchanges the types defined here:
//!
//! - **Records** (`record`): one parsed spreadsheet row, header → cell value
//! - **Target fields** (`field`): the destination schema of an entity type
//! - **Mappings** (`mapping`): column mappings, fixed values, and saved profiles
//! - **Preview** (`preview`): dry-run classification returned by the server
//! - **Runs** (`run`): accumulated outcome of a chunked submission
//! - **Batches** (`batch`): bounded slices of the record set
//! - **Parsing** (`parse`): the outcome of reading an uploaded file
//!
//! All wire types serialize with camelCase field names.

pub mod batch;
pub mod error;
pub mod field;
pub mod mapping;
pub mod params;
pub mod parse;
pub mod preview;
pub mod record;
pub mod run;

pub use batch::{Batch, DEFAULT_BATCH_SIZE, partition};
pub use error::{ModelError, Result};
pub use field::{FieldType, TargetField};
pub use mapping::{ColumnMapping, FixedValues, MappingProfile, deserialize_id};
pub use params::ImportParams;
pub use parse::{ParseOutcome, ParseSummary, RowParseError};
pub use preview::{PreviewResult, RowRef, RowWarning};
pub use record::Record;
pub use run::{BatchOutcome, BatchStatus, ImportRunResult, RowError};

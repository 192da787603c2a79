//! Mapping validation for the fleet import pipeline.
//!
//! Decides whether a column mapping plus fixed values covers every required
//! target field, collects advisory findings, and computes the per-type
//! default literals the user may choose to apply.

pub mod defaults;
pub mod error;
pub mod finding;
pub mod validate;

pub use defaults::{TEXT_DEFAULT, default_value, fill_required_defaults, use_default};
pub use error::{Result, ValidateError};
pub use finding::{Finding, Severity};
pub use validate::{MappingValidation, is_satisfied, validate};

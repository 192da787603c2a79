//! The import pipeline as an explicit state machine.
//!
//! [`PipelineState`] is immutable from the outside: every transition takes
//! the state by value and returns the next one, or an error that leaves the
//! caller's copy untouched. Large parts (parsed file, preview, run result)
//! sit behind `Arc`, so cloning a state before a fallible transition costs a
//! handful of reference count bumps.
//!
//! ```text
//! Upload ─load_file─▶ Mapping ─begin_preview─▶ Preview ─approve─▶ Submit ─record_run─▶ Results
//!    ▲                   ▲                        ▲                  ▲
//!    └───────────────────┴──────── back_to ───────┴──────────────────┘
//! ```
//!
//! Going back to an earlier stage discards everything produced after it.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fleet_map::{MappingEngine, MappingError, MappingSummary};
use fleet_model::{
    ColumnMapping, FixedValues, ImportParams, ImportRunResult, MappingProfile, ParseOutcome,
    PreviewResult, Record, TargetField,
};
use fleet_validate::{MappingValidation, validate};

use crate::error::{PipelineError, Result};
use crate::logging::redact_cell;

// =============================================================================
// STAGE
// =============================================================================

/// Pipeline stages in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Waiting for a file.
    Upload,
    /// Columns are being matched to target fields.
    Mapping,
    /// Mapping frozen; dry run requested or shown.
    Preview,
    /// Preview approved; the run may start.
    Submit,
    /// Run finished.
    Results,
}

impl Stage {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Mapping => "mapping",
            Self::Preview => "preview",
            Self::Submit => "submit",
            Self::Results => "results",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Everything one import session knows, tagged with its stage.
#[derive(Debug, Clone)]
pub struct PipelineState {
    stage: Stage,
    params: Arc<ImportParams>,
    engine: Arc<MappingEngine>,
    upload: Option<Arc<ParseOutcome>>,
    mapping: Arc<ColumnMapping>,
    fixed: Arc<FixedValues>,
    preview: Option<Arc<PreviewResult>>,
    run: Option<Arc<ImportRunResult>>,
}

impl PipelineState {
    /// Fresh state in the upload stage. The catalog is deduplicated here.
    pub fn new(params: ImportParams, fields: &[TargetField]) -> Self {
        Self::with_engine(Arc::new(params), Arc::new(MappingEngine::new(fields)))
    }

    fn with_engine(params: Arc<ImportParams>, engine: Arc<MappingEngine>) -> Self {
        Self {
            stage: Stage::Upload,
            params,
            engine,
            upload: None,
            mapping: Arc::default(),
            fixed: Arc::default(),
            preview: None,
            run: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn params(&self) -> &ImportParams {
        &self.params
    }

    pub fn engine(&self) -> &MappingEngine {
        &self.engine
    }

    /// Deduplicated target fields.
    pub fn fields(&self) -> &[TargetField] {
        self.engine.fields()
    }

    pub fn upload(&self) -> Option<&ParseOutcome> {
        self.upload.as_deref()
    }

    /// Headers of the uploaded file, empty before upload.
    pub fn headers(&self) -> &[String] {
        self.upload
            .as_deref()
            .map(|u| u.headers.as_slice())
            .unwrap_or_default()
    }

    pub fn records(&self) -> &[Record] {
        self.upload
            .as_deref()
            .map(|u| u.data.as_slice())
            .unwrap_or_default()
    }

    /// First record; the validator's sample.
    pub fn sample(&self) -> Option<&Record> {
        self.records().first()
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn fixed_values(&self) -> &FixedValues {
        &self.fixed
    }

    pub fn preview(&self) -> Option<&PreviewResult> {
        self.preview.as_deref()
    }

    pub fn run(&self) -> Option<&ImportRunResult> {
        self.run.as_deref()
    }

    /// Coverage of the current mapping. Pure; cheap enough to call after
    /// every edit.
    pub fn validation(&self) -> MappingValidation {
        validate(self.fields(), &self.mapping, &self.fixed, self.sample())
    }

    pub fn mapping_summary(&self) -> MappingSummary {
        MappingSummary::compute(self.headers(), self.fields(), &self.mapping, &self.fixed)
    }

    fn require(&self, allowed: &[Stage], action: &'static str) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(PipelineError::InvalidTransition {
                from: self.stage,
                action,
            })
        }
    }

    // -------------------------------------------------------------------------
    // Upload
    // -------------------------------------------------------------------------

    /// Accepts a parsed file and computes the local mapping.
    ///
    /// A file with any row error is rejected whole. Selecting a new file
    /// while mapping starts over with a fresh mapping and no fixed values.
    pub fn load_file(mut self, outcome: ParseOutcome) -> Result<Self> {
        self.require(&[Stage::Upload, Stage::Mapping], "load a file")?;
        if !outcome.is_usable() {
            return Err(PipelineError::ParseFailed {
                messages: outcome.error_messages(),
            });
        }
        if outcome.data.is_empty() {
            return Err(PipelineError::NoRecords);
        }

        let mapping = self.engine.compute(&outcome.headers);
        tracing::info!(
            rows = outcome.data.len(),
            headers = outcome.headers.len(),
            mapped = mapping.len(),
            "file loaded"
        );
        if let Some(sample) = outcome.data.first() {
            for (header, value) in sample.cells() {
                tracing::trace!(header = %header, value = redact_cell(value), "sample cell");
            }
        }
        self.upload = Some(Arc::new(outcome));
        self.mapping = Arc::new(mapping);
        self.fixed = Arc::default();
        self.preview = None;
        self.run = None;
        self.stage = Stage::Mapping;
        Ok(self)
    }

    /// Replaces the import parameters (scope, update policy).
    pub fn with_params(mut self, params: ImportParams) -> Result<Self> {
        self.require(&[Stage::Upload, Stage::Mapping], "change import options")?;
        if params.entity_type != self.params.entity_type {
            return Err(PipelineError::Config(format!(
                "entity type is fixed for a session ({} != {})",
                params.entity_type, self.params.entity_type
            )));
        }
        self.params = Arc::new(params);
        Ok(self)
    }

    // -------------------------------------------------------------------------
    // Mapping
    // -------------------------------------------------------------------------

    /// Replaces the whole mapping, e.g. with the result of a suggestion round.
    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Result<Self> {
        self.require(&[Stage::Mapping], "change the mapping")?;
        self.mapping = Arc::new(mapping);
        Ok(self)
    }

    /// Sets (`Some`) or clears (`None`) the target of one header.
    pub fn set_mapping(mut self, header: &str, key: Option<&str>) -> Result<Self> {
        self.require(&[Stage::Mapping], "change the mapping")?;
        let headers = self
            .upload
            .as_deref()
            .map(|u| u.headers.as_slice())
            .unwrap_or_default();
        let previous = self
            .engine
            .assign(Arc::make_mut(&mut self.mapping), headers, header, key)?;
        tracing::debug!(header, ?previous, target = ?key, "mapping changed");
        Ok(self)
    }

    /// Replaces the mapping with a saved profile. Nothing is merged.
    pub fn load_profile(mut self, profile: &MappingProfile) -> Result<Self> {
        self.require(&[Stage::Mapping], "load a mapping profile")?;
        if !profile.entity_type.is_empty() && profile.entity_type != self.params.entity_type {
            tracing::warn!(
                profile = %profile.name,
                profile_entity = %profile.entity_type,
                entity_type = %self.params.entity_type,
                "profile was saved for another entity type"
            );
        }
        let absent = profile
            .mapping
            .iter()
            .filter(|(header, _)| !self.headers().iter().any(|h| h == header))
            .count();
        if absent > 0 {
            tracing::debug!(absent, "profile maps headers this file does not have");
        }
        tracing::info!(profile = %profile.name, entries = profile.mapping.len(), "loaded profile");
        self.mapping = Arc::new(profile.mapping.clone());
        Ok(self)
    }

    /// Sets a literal for a target field. A blank value clears it.
    pub fn set_fixed_value(mut self, key: &str, value: &str) -> Result<Self> {
        self.require(&[Stage::Mapping], "change fixed values")?;
        if !self.engine.contains_key(key) {
            return Err(MappingError::UnknownTarget(key.to_string()).into());
        }
        Arc::make_mut(&mut self.fixed).set(key, value);
        Ok(self)
    }

    pub fn clear_fixed_value(mut self, key: &str) -> Result<Self> {
        self.require(&[Stage::Mapping], "change fixed values")?;
        Arc::make_mut(&mut self.fixed).remove(key);
        Ok(self)
    }

    /// Explicit "use default" action for one field.
    pub fn use_default(mut self, key: &str, now: DateTime<Utc>) -> Result<Self> {
        self.require(&[Stage::Mapping], "apply a default")?;
        let fields = self.engine.fields();
        fleet_validate::use_default(Arc::make_mut(&mut self.fixed), fields, key, now)?;
        Ok(self)
    }

    /// Explicit "fill all" action over the uncovered required fields.
    pub fn fill_required_defaults(mut self, now: DateTime<Utc>) -> Result<Self> {
        self.require(&[Stage::Mapping], "apply defaults")?;
        fleet_validate::fill_required_defaults(
            Arc::make_mut(&mut self.fixed),
            self.engine.fields(),
            &self.mapping,
            now,
        );
        Ok(self)
    }

    // -------------------------------------------------------------------------
    // Preview, submit, results
    // -------------------------------------------------------------------------

    /// Freezes the mapping and enters the preview stage.
    ///
    /// Refused while a required field has neither a column nor a fixed value.
    pub fn begin_preview(mut self) -> Result<Self> {
        self.require(&[Stage::Mapping], "start a preview")?;
        let validation = self.validation();
        if validation.is_blocked() {
            return Err(PipelineError::MissingRequired {
                keys: validation
                    .missing_required_keys()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            });
        }
        self.stage = Stage::Preview;
        self.preview = None;
        tracing::info!(
            mapped = self.mapping.len(),
            fixed = self.fixed.len(),
            "mapping frozen for preview"
        );
        Ok(self)
    }

    /// Stores a preview, replacing any earlier one.
    pub fn record_preview(mut self, preview: PreviewResult) -> Result<Self> {
        self.require(&[Stage::Preview], "record a preview")?;
        self.preview = Some(Arc::new(preview));
        Ok(self)
    }

    /// Approves the current preview for submission.
    pub fn approve(mut self) -> Result<Self> {
        self.require(&[Stage::Preview], "approve the preview")?;
        if self.preview.is_none() {
            return Err(PipelineError::NoPreview);
        }
        self.stage = Stage::Submit;
        tracing::info!(rows = self.records().len(), "preview approved");
        Ok(self)
    }

    /// Stores the finished run. Terminal until `back_to` or `reset`.
    pub fn record_run(mut self, run: ImportRunResult) -> Result<Self> {
        self.require(&[Stage::Submit], "record an import run")?;
        self.run = Some(Arc::new(run));
        self.stage = Stage::Results;
        Ok(self)
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Moves to an earlier stage, discarding what later stages produced.
    pub fn back_to(mut self, stage: Stage) -> Result<Self> {
        if stage >= self.stage {
            return Err(PipelineError::InvalidTransition {
                from: self.stage,
                action: "go back",
            });
        }
        if stage < Stage::Results {
            self.run = None;
        }
        if stage < Stage::Preview {
            self.preview = None;
        }
        if stage == Stage::Upload {
            self.upload = None;
            self.mapping = Arc::default();
            self.fixed = Arc::default();
        }
        tracing::info!(from = %self.stage, to = %stage, "moved back");
        self.stage = stage;
        Ok(self)
    }

    /// Back to an empty upload stage, keeping the catalog and parameters.
    #[must_use]
    pub fn reset(self) -> Self {
        tracing::info!(from = %self.stage, "pipeline reset");
        Self::with_engine(self.params, self.engine)
    }
}

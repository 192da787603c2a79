//! One import from file selection to results.
//!
//! [`ImportSession`] owns a [`PipelineState`] and performs the I/O around
//! each transition: parsing, suggestion requests, profile storage, the
//! preview round trip and the batched run. Transitions are applied to a
//! clone of the state, so a failed action leaves the session where it was.

use std::path::Path;

use chrono::{DateTime, Utc};
use fleet_ingest::RecordParser;
use fleet_map::{
    Candidate, FieldCatalog, MappingSummary, ProfileStore, ScoringEngine, SuggestScope,
    SuggestionService, apply_suggestions, auto_map,
};
use fleet_model::{ImportParams, ImportRunResult, MappingProfile, PreviewResult};
use fleet_report::{ImportSummary, summarize, write_errors_csv_file};
use fleet_submit::{HttpClient, ImportEndpoint, SubmitProgress, preview, submit};
use fleet_validate::MappingValidation;

use crate::error::{PipelineError, Result};
use crate::pipeline::{PipelineState, Stage};
use crate::settings::ImportSettings;

/// External collaborators of a session.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub parser: &'a dyn RecordParser,
    pub catalog: &'a dyn FieldCatalog,
    pub endpoint: &'a dyn ImportEndpoint,
    pub suggestions: &'a dyn SuggestionService,
    pub profiles: &'a dyn ProfileStore,
}

impl<'a> Services<'a> {
    /// Every remote collaborator served by one HTTP client.
    pub fn remote(client: &'a HttpClient, parser: &'a dyn RecordParser) -> Self {
        Self {
            parser,
            catalog: client,
            endpoint: client,
            suggestions: client,
            profiles: client,
        }
    }
}

type Clock<'a> = Box<dyn Fn() -> DateTime<Utc> + 'a>;

/// Drives one import through its stages.
pub struct ImportSession<'a> {
    settings: ImportSettings,
    services: Services<'a>,
    clock: Clock<'a>,
    state: PipelineState,
}

impl<'a> ImportSession<'a> {
    /// Loads the field catalog for `params.entity_type` and starts in the
    /// upload stage.
    pub fn open(
        settings: ImportSettings,
        params: ImportParams,
        services: Services<'a>,
    ) -> Result<Self> {
        let fields = services.catalog.fields(&params.entity_type)?;
        tracing::info!(
            entity_type = %params.entity_type,
            fields = fields.len(),
            "import session opened"
        );
        Ok(Self {
            settings,
            services,
            clock: Box::new(Utc::now),
            state: PipelineState::new(params, &fields),
        })
    }

    /// Replaces the clock used for date-time defaults.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'a) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    fn apply(
        &mut self,
        transition: impl FnOnce(PipelineState) -> Result<PipelineState>,
    ) -> Result<()> {
        self.state = transition(self.state.clone())?;
        Ok(())
    }

    fn require_stage(&self, stage: Stage, action: &'static str) -> Result<()> {
        if self.state.stage() != stage {
            return Err(PipelineError::InvalidTransition {
                from: self.state.stage(),
                action,
            });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Upload and mapping
    // -------------------------------------------------------------------------

    /// Parses an upload, computes the local mapping and, when enabled, asks
    /// for suggestions on the headers left unmapped.
    pub fn upload_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let outcome = self.services.parser.parse(bytes)?;
        self.apply(|state| state.load_file(outcome))?;
        if self.settings.suggest.enabled {
            self.suggest(SuggestScope::UnmappedOnly)?;
        }
        Ok(())
    }

    pub fn upload_file(&mut self, path: &Path) -> Result<()> {
        let outcome = self.services.parser.parse_file(path)?;
        self.apply(|state| state.load_file(outcome))?;
        if self.settings.suggest.enabled {
            self.suggest(SuggestScope::UnmappedOnly)?;
        }
        Ok(())
    }

    /// The explicit auto-map action: local pass plus suggestions for every
    /// header. Manual edits are replaced; local matches are kept.
    pub fn auto_map(&mut self) -> Result<()> {
        self.require_stage(Stage::Mapping, "auto-map")?;
        let state = &self.state;
        let mapping = auto_map(
            self.services.suggestions,
            state.headers(),
            state.engine(),
            &state.params().entity_type,
            state.records(),
            self.settings.suggest.options(SuggestScope::AllHeaders),
        );
        self.apply(|state| state.with_mapping(mapping))
    }

    fn suggest(&mut self, scope: SuggestScope) -> Result<()> {
        self.require_stage(Stage::Mapping, "suggest a mapping")?;
        let state = &self.state;
        let mapping = apply_suggestions(
            self.services.suggestions,
            state.mapping(),
            state.headers(),
            state.engine(),
            &state.params().entity_type,
            state.records(),
            self.settings.suggest.options(scope),
        );
        self.apply(|state| state.with_mapping(mapping))
    }

    pub fn set_mapping(&mut self, header: &str, key: Option<&str>) -> Result<()> {
        self.apply(|state| state.set_mapping(header, key))
    }

    pub fn set_fixed_value(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(|state| state.set_fixed_value(key, value))
    }

    /// "Use default" for one field, stamped with the session clock.
    pub fn use_default(&mut self, key: &str) -> Result<()> {
        let now = (self.clock)();
        self.apply(|state| state.use_default(key, now))
    }

    pub fn fill_required_defaults(&mut self) -> Result<()> {
        let now = (self.clock)();
        self.apply(|state| state.fill_required_defaults(now))
    }

    pub fn set_params(&mut self, params: ImportParams) -> Result<()> {
        self.apply(|state| state.with_params(params))
    }

    pub fn validation(&self) -> MappingValidation {
        self.state.validation()
    }

    pub fn mapping_summary(&self) -> MappingSummary {
        self.state.mapping_summary()
    }

    /// Ranked targets for the manual picker of one header.
    pub fn candidates(&self, header: &str, min_score: f32) -> Vec<Candidate> {
        ScoringEngine::new(self.state.engine()).rank(header, min_score)
    }

    // -------------------------------------------------------------------------
    // Profiles
    // -------------------------------------------------------------------------

    pub fn list_profiles(&self) -> Result<Vec<MappingProfile>> {
        Ok(self
            .services
            .profiles
            .list(&self.state.params().entity_type)?)
    }

    /// Saves the current mapping under `name` and returns the new id.
    pub fn save_profile(&self, name: &str) -> Result<String> {
        let id = self.services.profiles.save(
            name,
            &self.state.params().entity_type,
            self.state.mapping(),
        )?;
        tracing::info!(id = %id, name, "saved mapping profile");
        Ok(id)
    }

    /// Replaces the current mapping with a saved profile.
    pub fn load_profile(&mut self, id: &str) -> Result<()> {
        let profile = self
            .services
            .profiles
            .load(&self.state.params().entity_type, id)?;
        self.apply(|state| state.load_profile(&profile))
    }

    // -------------------------------------------------------------------------
    // Preview and submission
    // -------------------------------------------------------------------------

    /// Freezes the mapping (if still mapping) and runs one dry run.
    ///
    /// On failure the session stays in the preview stage without a preview;
    /// the caller may try again or go back to mapping.
    pub fn run_preview(&mut self) -> Result<&PreviewResult> {
        if self.state.stage() != Stage::Preview {
            self.apply(PipelineState::begin_preview)?;
        }
        let state = &self.state;
        let result = preview(
            self.services.endpoint,
            state.records(),
            state.mapping(),
            state.fixed_values(),
            state.params(),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "preview request failed");
            PipelineError::PreviewFailed(e)
        })?;
        self.apply(|state| state.record_preview(result))?;
        self.state.preview().ok_or(PipelineError::NoPreview)
    }

    pub fn approve(&mut self) -> Result<()> {
        self.apply(PipelineState::approve)
    }

    /// Sends every record in sequential batches and moves to results.
    ///
    /// Batch failures are part of the returned result, not errors.
    pub fn submit(&mut self, progress: impl FnMut(SubmitProgress)) -> Result<&ImportRunResult> {
        self.require_stage(Stage::Submit, "submit")?;
        let state = &self.state;
        let run = submit(
            self.services.endpoint,
            state.records(),
            state.mapping(),
            state.fixed_values(),
            state.params(),
            &self.settings.submit,
            progress,
        );
        self.apply(|state| state.record_run(run))?;
        self.state.run().ok_or(PipelineError::InvalidTransition {
            from: Stage::Submit,
            action: "read the run result",
        })
    }

    // -------------------------------------------------------------------------
    // Results and navigation
    // -------------------------------------------------------------------------

    pub fn summary(&self) -> Option<ImportSummary> {
        self.state.run().map(summarize)
    }

    /// Writes every run error as CSV. Fails before a run has finished.
    pub fn export_errors(&self, path: &Path) -> Result<()> {
        let run = self.state.run().ok_or(PipelineError::InvalidTransition {
            from: self.state.stage(),
            action: "export errors",
        })?;
        Ok(write_errors_csv_file(run, path)?)
    }

    pub fn back_to(&mut self, stage: Stage) -> Result<()> {
        self.apply(|state| state.back_to(stage))
    }

    pub fn reset(&mut self) {
        self.state = self.state.clone().reset();
    }
}

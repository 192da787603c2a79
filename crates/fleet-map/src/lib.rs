//! Column mapping for the fleet import pipeline.
//!
//! Maps spreadsheet headers onto the target fields of an entity type:
//!
//! - **Local pass** (`engine`): deterministic header/key matching
//! - **AI pass** (`suggest`): optional, advisory suggestions merged on top
//! - **Ranking** (`score`): fuzzy candidates for manual overrides
//! - **Profiles** (`profile`): named mappings saved and loaded whole
//! - **Catalog** (`catalog`): target fields per entity type, deduplicated

pub mod catalog;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod profile;
pub mod score;
pub mod suggest;
pub mod summary;

pub use catalog::{FieldCatalog, StaticCatalog, dedupe_fields};
pub use engine::{MappingEngine, MatchRule, compute_mapping};
pub use error::{MappingError, Result, SuggestError};
pub use normalize::{normalize_identifier, normalize_simple, tokenize};
pub use profile::{MemoryProfileStore, ProfileStore, validate_profile_name};
pub use score::{Candidate, ColumnScore, ScoreComponent, ScoringEngine};
pub use suggest::{
    NoSuggestions, SuggestMode, SuggestOptions, SuggestRequest, SuggestScope, SuggestionService,
    apply_suggestions, auto_map, build_request, merge_suggestions,
};
pub use summary::MappingSummary;

//! Fuzzy ranking of target fields for the manual mapping picker.
//!
//! Uses Jaro-Winkler similarity as the base algorithm with a boost when
//! one of the local matching rules also applies.

use std::cmp::Ordering;

use fleet_model::TargetField;
use rapidfuzz::distance::jaro_winkler;

use crate::engine::{MappingEngine, MatchRule};
use crate::normalize::{normalize_identifier, normalize_simple};

/// Score for a single header-field pair.
#[derive(Debug, Clone)]
pub struct ColumnScore {
    /// Final score (0.0 to 1.0).
    pub score: f32,
    /// Breakdown of score components for explainability.
    pub explanation: Vec<ScoreComponent>,
}

impl ColumnScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.explanation
            .iter()
            .map(|c| format!("{}: {:.0}%", c.name, c.value * 100.0))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A component contributing to the final score.
#[derive(Debug, Clone)]
pub struct ScoreComponent {
    /// Component name (e.g., "Key similarity").
    pub name: &'static str,
    pub value: f32,
    pub description: String,
}

/// A ranked target field for one header.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub key: String,
    pub label: String,
    pub required: bool,
    /// Local rule that also matches, if any.
    pub rule: Option<MatchRule>,
    pub score: ColumnScore,
}

/// Scores headers against the fields of a [`MappingEngine`].
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine<'a> {
    engine: &'a MappingEngine,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(engine: &'a MappingEngine) -> Self {
        Self { engine }
    }

    /// Score one header against one field key.
    ///
    /// Returns `None` if the key is not in the catalog.
    pub fn score(&self, header: &str, key: &str) -> Option<ColumnScore> {
        let field = self.engine.field(key)?;
        Some(self.compute_score(header, field))
    }

    /// All catalog fields for `header`, best first.
    ///
    /// Fields scoring below `min_score` are dropped. Equal scores keep
    /// catalog order.
    pub fn rank(&self, header: &str, min_score: f32) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .engine
            .fields()
            .iter()
            .map(|field| Candidate {
                key: field.key.clone(),
                label: field.display_name().to_string(),
                required: field.required,
                rule: self.engine.rule_for(header, &field.key),
                score: self.compute_score(header, field),
            })
            .filter(|c| c.score.score >= min_score)
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .score
                .partial_cmp(&a.score.score)
                .unwrap_or(Ordering::Equal)
        });
        candidates
    }

    fn compute_score(&self, header: &str, field: &TargetField) -> ColumnScore {
        let mut components = Vec::new();

        // 1. Base: best of key and label similarity on normalized names
        let header_simple = normalize_simple(header);
        let key_sim = similarity(&header_simple, &normalize_simple(&field.key));
        let label_sim = similarity(&header_simple, &normalize_simple(field.display_name()));
        let ident_sim = similarity(
            &normalize_identifier(header),
            &normalize_identifier(&field.key),
        );

        components.push(ScoreComponent {
            name: "Key similarity",
            value: key_sim.max(ident_sim),
            description: format!("'{header}' vs '{}'", field.key),
        });
        if label_sim > key_sim.max(ident_sim) {
            components.push(ScoreComponent {
                name: "Label similarity",
                value: label_sim,
                description: format!("'{header}' vs '{}'", field.display_name()),
            });
        }

        let mut score = key_sim.max(ident_sim).max(label_sim);

        // 2. Rule boost: a local rule match pins the score near the top
        if let Some(rule) = self.engine.rule_for(header, &field.key) {
            let floor = match rule {
                MatchRule::Exact => 1.0,
                MatchRule::Identifier => 0.98,
                MatchRule::SuggestedHeader => 0.95,
                MatchRule::Substring => 0.85,
            };
            if floor > score {
                components.push(ScoreComponent {
                    name: "Rule match",
                    value: floor - score,
                    description: rule.label().to_string(),
                });
                score = floor;
            }
        }

        ColumnScore {
            score: score.min(1.0),
            explanation: components,
        }
    }
}

fn similarity(a: &str, b: &str) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    jaro_winkler::similarity(a.chars(), b.chars()) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_model::FieldType;

    fn engine() -> MappingEngine {
        MappingEngine::new(&[
            TargetField::new("customer", "Customer", FieldType::String),
            TargetField::new("pickupDate", "Pickup Date", FieldType::DateTime)
                .with_suggested_headers(["PU date"]),
            TargetField::new("deliveryDate", "Delivery Date", FieldType::DateTime),
        ])
    }

    #[test]
    fn suggested_header_ranks_first() {
        let engine = engine();
        let ranked = ScoringEngine::new(&engine).rank("PU date", 0.0);
        assert_eq!(ranked[0].key, "pickupDate");
        assert_eq!(ranked[0].rule, Some(MatchRule::SuggestedHeader));
        assert!(ranked[0].score.score >= 0.95);
    }

    #[test]
    fn typo_still_ranks_close_field_first() {
        let engine = engine();
        let ranked = ScoringEngine::new(&engine).rank("Custmer", 0.5);
        assert_eq!(ranked[0].key, "customer");
        assert!(ranked[0].rule.is_none());
        assert!(ranked.iter().all(|c| c.score.score >= 0.5));
    }

    #[test]
    fn unknown_key_has_no_score() {
        let engine = engine();
        let scoring = ScoringEngine::new(&engine);
        assert!(scoring.score("Customer", "rate").is_none());
        let exact = scoring.score("Customer", "customer").unwrap();
        assert!((exact.score - 1.0).abs() < f32::EPSILON);
        assert!(exact.explain().contains("Key similarity"));
    }
}

use std::collections::BTreeSet;

use crate::foundation::error::{GeoquizError, GeoquizResult};

/// Named subset of entities with an associated zoom configuration.
///
/// Tags are free-form strings so the crate stays usable for any map; the
/// reserved [`RegionTag::all`] sentinel restores the unpadded original window
/// instead of zooming.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RegionTag(String);

impl RegionTag {
    /// The sentinel tag naming the whole map.
    pub const ALL: &'static str = "all";

    /// Construct a tag from any string-like value.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The sentinel tag that restores the original full window.
    pub fn all() -> Self {
        Self(Self::ALL.to_string())
    }

    /// Whether this is the whole-map sentinel.
    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }

    /// Tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single selectable geographic unit the learner can be asked to locate.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Entity {
    /// Unique, stable identifier matched against the map document.
    pub id: String,
    /// Human-readable name used in prompts and labels.
    pub display_name: String,
    /// Region membership tag.
    pub region: RegionTag,
}

/// Zoom padding configuration for one region tag.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegionDefinition {
    /// Region this entry configures.
    pub tag: RegionTag,
    /// Fraction of the union box added as padding on each axis.
    #[serde(default = "default_padding_fraction")]
    pub padding_fraction: f64,
}

fn default_padding_fraction() -> f64 {
    RegionTable::DEFAULT_PADDING_FRACTION
}

/// Static table mapping region tags to their zoom padding.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RegionTable {
    defs: Vec<RegionDefinition>,
}

impl RegionTable {
    /// Padding used for regions with no explicit definition.
    pub const DEFAULT_PADDING_FRACTION: f64 = 0.08;

    /// Build a table from explicit definitions.
    pub fn new(defs: Vec<RegionDefinition>) -> Self {
        Self { defs }
    }

    /// Configured definitions in declaration order.
    pub fn definitions(&self) -> &[RegionDefinition] {
        &self.defs
    }

    /// Padding fraction for `tag`, falling back to the default.
    pub fn padding_for(&self, tag: &RegionTag) -> f64 {
        self.defs
            .iter()
            .find(|d| d.tag == *tag)
            .map(|d| d.padding_fraction)
            .unwrap_or(Self::DEFAULT_PADDING_FRACTION)
    }

    /// Validate tag uniqueness and padding ranges.
    pub fn validate(&self) -> GeoquizResult<()> {
        let mut seen = BTreeSet::new();
        for def in &self.defs {
            if def.tag.as_str().trim().is_empty() {
                return Err(GeoquizError::validation("region tag must be non-empty"));
            }
            if !seen.insert(def.tag.clone()) {
                return Err(GeoquizError::validation(format!(
                    "duplicate region definition for tag '{}'",
                    def.tag
                )));
            }
            if !def.padding_fraction.is_finite() || def.padding_fraction < 0.0 {
                return Err(GeoquizError::validation(format!(
                    "region '{}' padding_fraction must be finite and >= 0",
                    def.tag
                )));
            }
        }
        Ok(())
    }
}

/// Synthetic hit-target rule for an entity too small for reliable pointing.
///
/// `radius` is in root coordinate units, like the injected helper rings of the
/// source map.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HitTargetRule {
    /// Entity receiving the helper target.
    pub entity_id: String,
    /// Circle radius in root coordinate units.
    pub radius: f64,
}

/// Scoring policy for a session.
///
/// Two policies were observed across the source's iterations; both are kept
/// and the simpler, monotonic one is the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScoringPolicy {
    /// Score increments exactly once per prompt the moment it is answered
    /// correctly, regardless of prior wrong attempts.
    #[default]
    PerPrompt,
    /// Only the first click on a prompt can ever earn a point; the prompt
    /// still completes on the eventual correct click.
    FirstClickOnly,
}

/// Complete quiz configuration.
///
/// A pure data model that can be built programmatically or loaded from JSON;
/// [`MapConfig::validate`] is called before an engine is constructed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapConfig {
    /// Selectable entities, keyed into the map document by `id`.
    pub entities: Vec<Entity>,
    /// Region zoom table.
    #[serde(default)]
    pub regions: RegionTable,
    /// Synthetic hit-target rules.
    #[serde(default)]
    pub hit_targets: Vec<HitTargetRule>,
    /// Session scoring policy.
    #[serde(default)]
    pub scoring: ScoringPolicy,
}

impl MapConfig {
    /// Validate configuration invariants.
    pub fn validate(&self) -> GeoquizResult<()> {
        let mut ids = BTreeSet::new();
        for entity in &self.entities {
            if entity.id.trim().is_empty() {
                return Err(GeoquizError::validation("entity id must be non-empty"));
            }
            if entity.display_name.trim().is_empty() {
                return Err(GeoquizError::validation(format!(
                    "entity '{}' display_name must be non-empty",
                    entity.id
                )));
            }
            if !ids.insert(entity.id.as_str()) {
                return Err(GeoquizError::validation(format!(
                    "duplicate entity id '{}'",
                    entity.id
                )));
            }
        }

        self.regions.validate()?;

        for rule in &self.hit_targets {
            if !ids.contains(rule.entity_id.as_str()) {
                return Err(GeoquizError::validation(format!(
                    "hit target references unknown entity '{}'",
                    rule.entity_id
                )));
            }
            if !rule.radius.is_finite() || rule.radius <= 0.0 {
                return Err(GeoquizError::validation(format!(
                    "hit target '{}' radius must be finite and > 0",
                    rule.entity_id
                )));
            }
        }

        Ok(())
    }

    /// Entities belonging to `tag` (everything for the "all" sentinel).
    pub fn pool_for(&self, tag: &RegionTag) -> Vec<Entity> {
        if tag.is_all() {
            return self.entities.clone();
        }
        self.entities
            .iter()
            .filter(|e| e.region == *tag)
            .cloned()
            .collect()
    }

    /// Deserialize and validate a configuration from JSON.
    pub fn from_json(json: &str) -> GeoquizResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GeoquizError::serde(format!("parse map config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> GeoquizResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GeoquizError::serde(format!("serialize map config: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/map/model.rs"]
mod tests;

//! Lineage configuration
//!
//! Handles loading and validation of lineage configuration from environment
//! variables. The set of collapsible node kinds is policy, so the namespace
//! prefixes used to classify LSIDs live here rather than in the resolver.

use crate::node::NodeKind;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Hop limit used when a request does not specify a depth
pub const DEFAULT_MAX_DEPTH: u32 = 100;

const LSID_AUTHORITY: &str = "urn:lsid:labkey.com:";

/// Maps identifiers starting with `prefix` to `kind`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRule {
    pub prefix: String,
    pub kind: NodeKind,
}

impl ClassifierRule {
    pub fn new(prefix: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            prefix: prefix.into(),
            kind,
        }
    }

    /// Parse a `prefix=kind` rule
    pub fn parse(text: &str) -> crate::Result<Self> {
        let (prefix, kind) = text.rsplit_once('=').ok_or_else(|| {
            crate::Error::InvalidArgument(format!(
                "classifier rule must look like prefix=kind: {}",
                text
            ))
        })?;
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(crate::Error::InvalidArgument(format!(
                "classifier rule has an empty prefix: {}",
                text
            )));
        }
        Ok(Self::new(prefix, kind.trim().parse()?))
    }
}

/// Lineage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageConfig {
    /// Hop limit applied when options leave the depth at 0
    pub default_max_depth: u32,

    /// Classification rules, evaluated in order
    pub rules: Vec<ClassifierRule>,

    /// Kind for identifiers that match no rule; `None` makes them an error
    pub fallback_kind: Option<NodeKind>,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            default_max_depth: DEFAULT_MAX_DEPTH,
            rules: default_rules(),
            fallback_kind: Some(NodeKind::Material),
        }
    }
}

fn default_rules() -> Vec<ClassifierRule> {
    [
        ("Run.Folder", NodeKind::Run),
        ("ProtocolApplication.Folder", NodeKind::ProtocolApplication),
        ("Data.Folder", NodeKind::Data),
        ("Sample.Folder", NodeKind::Material),
        ("Material.Folder", NodeKind::Material),
    ]
    .into_iter()
    .map(|(namespace, kind)| {
        ClassifierRule::new(format!("{}{}", LSID_AUTHORITY, namespace), kind)
    })
    .collect()
}

impl LineageConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `EXP_LINEAGE_DEFAULT_MAX_DEPTH`: hop limit for unbounded requests (default: 100)
    /// - `EXP_LINEAGE_COLLAPSE_PREFIXES`: comma separated `prefix=kind` rules
    /// - `EXP_LINEAGE_FALLBACK_KIND`: kind for unmatched identifiers, or `none` (default: material)
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(depth) = lookup("EXP_LINEAGE_DEFAULT_MAX_DEPTH") {
            config.default_max_depth = depth.trim().parse().map_err(|_| {
                crate::Error::InvalidArgument(format!(
                    "EXP_LINEAGE_DEFAULT_MAX_DEPTH must be a non-negative integer: {}",
                    depth
                ))
            })?;
        }

        if let Some(rules) = lookup("EXP_LINEAGE_COLLAPSE_PREFIXES") {
            config.rules = rules
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(ClassifierRule::parse)
                .collect::<crate::Result<_>>()?;
        }

        if let Some(fallback) = lookup("EXP_LINEAGE_FALLBACK_KIND") {
            config.fallback_kind = match fallback.trim() {
                "" | "none" => None,
                kind => Some(kind.parse()?),
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.default_max_depth == 0 {
            return Err(crate::Error::InvalidArgument(
                "default_max_depth must be greater than zero".to_string(),
            ));
        }
        if !self.rules.iter().any(|rule| !rule.kind.is_displayable()) {
            warn!("No classifier rule collapses runs or protocol applications");
        }
        if self.rules.is_empty() && self.fallback_kind.is_none() {
            return Err(crate::Error::InvalidArgument(
                "classifier needs at least one rule or a fallback kind".to_string(),
            ));
        }
        Ok(())
    }
}

//! Which makeup types and patterns a session may use.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{MakeoverError, MakeoverResult};
use crate::makeup::MakeupType;

/// Types enabled when no payload names any, in menu order.
pub const DEFAULT_FEATURES: [MakeupType; 9] = [
    MakeupType::Lips,
    MakeupType::Eyeshadow,
    MakeupType::Eyepencil,
    MakeupType::Eyelashes,
    MakeupType::Blush,
    MakeupType::Concealer,
    MakeupType::Foundation,
    MakeupType::Brows,
    MakeupType::Eyeliner,
];

/// Pattern list used when the payload has none for a type.
pub fn default_patterns(kind: MakeupType) -> &'static [&'static str] {
    match kind {
        MakeupType::Lips => &["normal", "matte", "glossy", "glitter"],
        MakeupType::Eyeliner => &["normal", "lashed"],
        MakeupType::Eyelashes => &["long-lash"],
        MakeupType::Lens => &[],
        _ => &["normal"],
    }
}

/// License payload as delivered by the entitlement source.
///
/// Type and pattern names stay as strings; names this build does not know are
/// ignored rather than rejected.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitlementPayload {
    pub allowed_features: Option<Vec<String>>,
    pub allowed_patterns: Option<BTreeMap<String, Vec<String>>>,
}

impl EntitlementPayload {
    pub fn from_json(json: &str) -> MakeoverResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MakeoverError::validation(format!("parse entitlements JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> MakeoverResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MakeoverError::validation(format!("open entitlements '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| MakeoverError::validation(format!("parse entitlements JSON: {e}")))
    }
}

/// Read-only answers about enabled types and their patterns.
#[derive(Clone, Debug, Default)]
pub struct FeatureManager {
    payload: Option<EntitlementPayload>,
}

impl FeatureManager {
    pub fn new(payload: Option<EntitlementPayload>) -> Self {
        Self { payload }
    }

    fn features(&self) -> Option<&[String]> {
        self.payload.as_ref()?.allowed_features.as_deref()
    }

    pub fn is_enabled(&self, kind: MakeupType) -> bool {
        match self.features() {
            Some(list) => list.iter().any(|f| f == kind.name()),
            None => DEFAULT_FEATURES.contains(&kind),
        }
    }

    /// Same as [`is_enabled`](Self::is_enabled) for a raw type name; unknown names
    /// are never enabled.
    pub fn is_enabled_name(&self, name: &str) -> bool {
        name.parse::<MakeupType>().is_ok_and(|kind| self.is_enabled(kind))
    }

    /// Allowed patterns for `kind`, payload first, then the defaults.
    pub fn allowed_patterns(&self, kind: MakeupType) -> Vec<String> {
        let configured = self
            .payload
            .as_ref()
            .and_then(|p| p.allowed_patterns.as_ref())
            .and_then(|m| m.get(kind.name()));
        match configured {
            Some(list) => list.clone(),
            None => default_patterns(kind)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Enabled types in payload order (defaults otherwise). Unknown names are skipped.
    pub fn enabled_features(&self) -> Vec<MakeupType> {
        match self.features() {
            Some(list) => list
                .iter()
                .filter_map(|name| match name.parse::<MakeupType>() {
                    Ok(kind) => Some(kind),
                    Err(_) => {
                        tracing::debug!(name, "unknown feature in entitlements");
                        None
                    }
                })
                .collect(),
            None => DEFAULT_FEATURES.to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/entitlements.rs"]
mod tests;

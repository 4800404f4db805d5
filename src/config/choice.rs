use anyhow::Result;
use schemars::{JsonSchema, Schema};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use strum::{EnumMessage, IntoEnumIterator};

/// Contract for the serde-tagged configuration enums (`{"type": .., "params": ..}`).
pub trait Choice: Sized + Serialize + DeserializeOwned + JsonSchema {
    type Kind: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator;

    /// JSON Schema for the whole tagged enum.
    fn schema() -> Schema;

    /// Default `params` JSON for a given kind.
    fn default_params(kind: Self::Kind) -> Value;

    /// Builds the typed enum from kind + params.
    fn from_parts(kind: Self::Kind, params: Value) -> Result<Self> {
        let key: &'static str = kind.into();
        let v = json!({ "type": key, "params": params });
        Ok(serde_json::from_value(v)?)
    }

    /// Every kind with its short description.
    fn catalog() -> Vec<(&'static str, &'static str)> {
        Self::Kind::iter()
            .map(|k| (k.into(), k.get_message().unwrap_or_default()))
            .collect()
    }
}

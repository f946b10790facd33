// Named bags of typed values shared across scenes

use super::{Deletable, Document, WrappedValue};
use crate::assets::{AssetType, GameStateMetadata, TypeMetadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, WrappedValue>,
}

impl GameState {
    pub fn field(&self, name: &str) -> Option<&WrappedValue> {
        self.fields.get(name)
    }

    /// Overwrite a field only if the new value keeps its type
    pub fn set_field(&mut self, name: &str, value: WrappedValue) -> bool {
        match self.fields.get_mut(name) {
            Some(current) if current.var_type() == value.var_type() => {
                *current = value;
                true
            }
            _ => false,
        }
    }
}

impl Document for GameState {
    const ASSET_TYPE: AssetType = AssetType::GameState;

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: BTreeMap::new(),
        }
    }

    fn metadata(name: &str) -> TypeMetadata {
        TypeMetadata::GameState(GameStateMetadata {
            name: name.to_string(),
        })
    }
}

impl Deletable for GameState {}

// Input modes: keyboard polling slots and key-to-function bindings

use super::Document;
use crate::assets::{AssetType, InputModeMetadata, TypeMetadata};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollingSlot {
    pub slot: u16,
    pub key_code: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum BindingKind {
    Keyboard { key_code: u16 },
}

/// Calls `function_binding` when `kind` fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBinding {
    pub kind: BindingKind,
    pub function_binding: String,
}

/// Bindings run on update for every entity of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBindings {
    pub class_name: String,
    #[serde(default)]
    pub bindings: Vec<InputBinding>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputMode {
    pub keyboard_polling: Vec<PollingSlot>,
    pub custom_calls_on_update: Vec<InputBinding>,
    pub custom_calls_on_key_pressed: Vec<InputBinding>,
    pub script_class_on_update: Vec<ClassBindings>,
}

impl InputMode {
    /// Key bound to a polling slot
    pub fn polled_key(&self, slot: u16) -> Option<u16> {
        self.keyboard_polling
            .iter()
            .find(|polling| polling.slot == slot)
            .map(|polling| polling.key_code)
    }
}

impl Document for InputMode {
    const ASSET_TYPE: AssetType = AssetType::InputMode;

    fn named(_name: &str) -> Self {
        Self::default()
    }

    fn metadata(_name: &str) -> TypeMetadata {
        TypeMetadata::InputMode(InputModeMetadata {})
    }
}

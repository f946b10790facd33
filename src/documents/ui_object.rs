// Runtime user interface documents: windows holding navigable widgets

use super::Document;
use crate::assets::{AssetHandle, AssetType, TypeMetadata, UiObjectMetadata};
use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiObject {
    pub select_color: Vec4,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_move: Option<String>,
    pub font: AssetHandle,
    pub windows: Vec<Window>,
}

impl Default for UiObject {
    fn default() -> Self {
        Self {
            select_color: Vec4::ONE,
            on_move: None,
            font: AssetHandle::EMPTY,
            windows: Vec::new(),
        }
    }
}

impl Document for UiObject {
    const ASSET_TYPE: AssetType = AssetType::UiObject;

    fn named(_name: &str) -> Self {
        Self::default()
    }

    fn metadata(_name: &str) -> TypeMetadata {
        TypeMetadata::UiObject(UiObjectMetadata {})
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Window {
    pub tag: String,
    pub screen_position: Vec3,
    pub size: Vec2,
    pub background_color: Vec4,
    /// Index of the parent window, if nested
    pub parent_index: Option<usize>,
    pub default_active_widget: Option<usize>,
    pub widgets: Vec<Widget>,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            tag: "None".to_string(),
            screen_position: Vec3::ZERO,
            size: Vec2::ONE,
            background_color: Vec4::new(0.3, 0.3, 0.3, 1.0),
            parent_index: None,
            default_active_widget: None,
            widgets: Vec::new(),
        }
    }
}

/// Widget indices reached by directional navigation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetDirections {
    pub up: Option<usize>,
    pub down: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub tag: String,
    pub window_position: Vec2,
    pub size: Vec2,
    pub default_background_color: Vec4,
    #[serde(default)]
    pub selectable: bool,
    #[serde(default)]
    pub directions: WidgetDirections,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_press: Option<String>,
    pub kind: WidgetKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum WidgetKind {
    Text {
        text: String,
        text_size: f32,
        text_color: Vec4,
        text_centered: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{from_yaml, to_yaml};
    use std::path::Path;

    #[test]
    fn test_round_trip() {
        let ui = UiObject {
            select_color: Vec4::new(1.0, 1.0, 0.0, 1.0),
            on_move: Some("PlayMoveSound".into()),
            font: AssetHandle::from_u64(300),
            windows: vec![Window {
                tag: "MainMenu".into(),
                default_active_widget: Some(0),
                widgets: vec![
                    Widget {
                        tag: "Start".into(),
                        window_position: Vec2::new(0.25, 0.5),
                        size: Vec2::new(0.5, 0.125),
                        default_background_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
                        selectable: true,
                        directions: WidgetDirections {
                            down: Some(1),
                            ..Default::default()
                        },
                        on_press: Some("StartGame".into()),
                        kind: WidgetKind::Text {
                            text: "Start".into(),
                            text_size: 0.25,
                            text_color: Vec4::ONE,
                            text_centered: true,
                        },
                    },
                    Widget {
                        tag: "Quit".into(),
                        window_position: Vec2::new(0.25, 0.25),
                        size: Vec2::new(0.5, 0.125),
                        default_background_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
                        selectable: true,
                        directions: WidgetDirections {
                            up: Some(0),
                            ..Default::default()
                        },
                        on_press: None,
                        kind: WidgetKind::Text {
                            text: "Quit".into(),
                            text_size: 0.25,
                            text_color: Vec4::ONE,
                            text_centered: false,
                        },
                    },
                ],
                ..Default::default()
            }],
        };

        let path = Path::new("UserInterface/Menu.kgui");
        let yaml = to_yaml(&ui, path).unwrap();
        assert!(yaml.contains("type: Text"));
        assert!(yaml.contains("textCentered"));
        assert_eq!(from_yaml::<UiObject>(&yaml, path).unwrap(), ui);
    }
}

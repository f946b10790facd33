// Scene documents: physics settings plus entities with optional components

use super::{base64_bytes, Document, WrappedValue};
use crate::assets::{AssetHandle, AssetType, SceneMetadata, TypeMetadata};
use crate::compile::shader::ShaderSpecification;
use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: Vec2,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.8),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub physics: PhysicsSettings,
    pub entities: Vec<SceneEntity>,
}

impl Scene {
    pub fn entity(&self, id: u64) -> Option<&SceneEntity> {
        self.entities.iter().find(|entity| entity.id == id)
    }
}

impl Document for Scene {
    const ASSET_TYPE: AssetType = AssetType::Scene;

    fn named(_name: &str) -> Self {
        Self::default()
    }

    fn metadata(_name: &str) -> TypeMetadata {
        TypeMetadata::Scene(SceneMetadata {})
    }
}

/// An entity and whichever components it carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEntity {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_audio: Option<BTreeMap<String, AudioComponent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rigid_body_2d: Option<RigidBody2dComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_collider_2d: Option<BoxCollider2dComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle_collider_2d: Option<CircleCollider2dComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<ScriptComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagComponent {
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformComponent {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionType {
    Perspective,
    #[default]
    Orthographic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraComponent {
    pub projection: ProjectionType,
    pub perspective_fov: f32,
    pub perspective_near: f32,
    pub perspective_far: f32,
    pub orthographic_size: f32,
    pub orthographic_near: f32,
    pub orthographic_far: f32,
    pub primary: bool,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            projection: ProjectionType::Orthographic,
            perspective_fov: 45f32.to_radians(),
            perspective_near: 0.01,
            perspective_far: 1000.0,
            orthographic_size: 10.0,
            orthographic_near: -1.0,
            orthographic_far: 1.0,
            primary: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioComponent {
    pub name: String,
    pub audio_handle: AssetHandle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    #[default]
    None,
    Quad,
    Circle,
    Triangle,
    Pyramid,
    Cube,
}

/// A renderable shape and the per-instance data its shader reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeComponent {
    pub current_shape: ShapeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_colors: Option<Vec<Vec4>>,
    #[serde(default)]
    pub texture_handle: AssetHandle,
    pub shader_handle: AssetHandle,
    pub shader_specification: ShaderSpecification,
    /// Uniform buffer bytes laid out per the shader's uniform list
    #[serde(with = "base64_bytes", default)]
    pub buffer: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    #[default]
    Static,
    Dynamic,
    Kinematic,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RigidBody2dComponent {
    pub body_type: BodyType,
    pub fixed_rotation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxCollider2dComponent {
    pub offset: Vec2,
    pub size: Vec2,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub restitution_threshold: f32,
}

impl Default for BoxCollider2dComponent {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            size: Vec2::splat(0.5),
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            restitution_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleCollider2dComponent {
    pub offset: Vec2,
    pub radius: f32,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub restitution_threshold: f32,
}

impl Default for CircleCollider2dComponent {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            radius: 0.5,
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            restitution_threshold: 0.5,
        }
    }
}

/// Entity class instance with its per-field values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptComponent {
    pub class_name: String,
    #[serde(default)]
    pub class_handle: AssetHandle,
    #[serde(default)]
    pub fields: Vec<ScriptField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptField {
    pub name: String,
    #[serde(flatten)]
    pub value: WrappedValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::shader::{ColorInputType, RenderingType};
    use crate::documents::{from_yaml, to_yaml};
    use std::path::Path;

    fn sample_scene() -> Scene {
        let specification = ShaderSpecification {
            color_input: ColorInputType::FlatColor,
            add_projection_matrix: true,
            rendering_type: RenderingType::DrawIndex,
            ..Default::default()
        };

        let mut multi_audio = BTreeMap::new();
        multi_audio.insert(
            "bounce".to_string(),
            AudioComponent {
                name: "bounce".into(),
                audio_handle: AssetHandle::from_u64(77),
            },
        );

        Scene {
            physics: PhysicsSettings {
                gravity: Vec2::new(0.0, -4.5),
            },
            entities: vec![
                SceneEntity {
                    id: 1,
                    tag: Some(TagComponent { tag: "Camera".into() }),
                    transform: Some(TransformComponent::default()),
                    camera: Some(CameraComponent::default()),
                    ..Default::default()
                },
                SceneEntity {
                    id: 2,
                    tag: Some(TagComponent { tag: "Ball".into() }),
                    multi_audio: Some(multi_audio),
                    shape: Some(ShapeComponent {
                        current_shape: ShapeType::Circle,
                        vertex_colors: Some(vec![Vec4::ONE, Vec4::new(1.0, 0.0, 0.0, 1.0)]),
                        texture_handle: AssetHandle::EMPTY,
                        shader_handle: AssetHandle::from_u64(5),
                        shader_specification: specification,
                        buffer: vec![0, 0, 128, 63, 255, 1, 2],
                    }),
                    rigid_body_2d: Some(RigidBody2dComponent {
                        body_type: BodyType::Dynamic,
                        fixed_rotation: true,
                    }),
                    circle_collider_2d: Some(CircleCollider2dComponent::default()),
                    script: Some(ScriptComponent {
                        class_name: "Ball".into(),
                        class_handle: AssetHandle::from_u64(9),
                        fields: vec![
                            ScriptField {
                                name: "speed".into(),
                                value: WrappedValue::Float(2.5),
                            },
                            ScriptField {
                                name: "owner".into(),
                                value: WrappedValue::Entity(1),
                            },
                            ScriptField {
                                name: "direction".into(),
                                value: WrappedValue::Vector2(Vec2::new(-1.0, 0.5)),
                            },
                        ],
                    }),
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn test_round_trip() {
        let scene = sample_scene();
        let path = Path::new("Scenes/Pong.kgscene");

        let yaml = to_yaml(&scene, path).unwrap();
        assert!(yaml.contains("rigidBody2d"));
        assert!(yaml.contains("circleCollider2d"));
        assert!(!yaml.contains("boxCollider2d"));

        let back: Scene = from_yaml(&yaml, path).unwrap();
        assert_eq!(back, scene);
    }

    #[test]
    fn test_buffer_is_base64() {
        let scene = sample_scene();
        let yaml = to_yaml(&scene, Path::new("Scenes/Pong.kgscene")).unwrap();
        assert!(yaml.contains("AACAP/8BAg=="));
    }

    #[test]
    fn test_default_scene() {
        let scene = Scene::named("Empty");
        assert_eq!(scene.physics.gravity, Vec2::new(0.0, -9.8));
        assert!(scene.entities.is_empty());

        let back: Scene = serde_yaml::from_str("{}").unwrap();
        assert_eq!(back, scene);
    }

    #[test]
    fn test_entity_lookup() {
        let scene = sample_scene();
        assert_eq!(scene.entity(2).and_then(|e| e.tag.as_ref()).map(|t| t.tag.as_str()), Some("Ball"));
        assert!(scene.entity(3).is_none());
    }
}

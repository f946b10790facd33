// Scriptable entity class definitions

use super::{Deletable, Document, WrappedVarType};
use crate::assets::{AssetHandle, AssetType, EntityClassMetadata, TypeMetadata};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassField {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: WrappedVarType,
}

/// Field layout and script hooks shared by every instance of a class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityClass {
    pub name: String,
    pub field_types: Vec<ClassField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_physics_collision_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_physics_collision_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_create: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    /// Script assets referenced by any hook
    pub all_scripts: Vec<AssetHandle>,
}

impl EntityClass {
    pub fn field_type(&self, name: &str) -> Option<WrappedVarType> {
        self.field_types
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.var_type)
    }
}

impl Document for EntityClass {
    const ASSET_TYPE: AssetType = AssetType::EntityClass;

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn metadata(name: &str) -> TypeMetadata {
        TypeMetadata::EntityClass(EntityClassMetadata {
            name: name.to_string(),
        })
    }
}

impl Deletable for EntityClass {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{from_yaml, to_yaml};
    use std::path::Path;

    #[test]
    fn test_round_trip() {
        let class = EntityClass {
            name: "Ball".into(),
            field_types: vec![
                ClassField {
                    name: "speed".into(),
                    var_type: WrappedVarType::Float,
                },
                ClassField {
                    name: "owner".into(),
                    var_type: WrappedVarType::Entity,
                },
            ],
            on_physics_collision_start: Some("Ball_OnCollision".into()),
            on_physics_collision_end: None,
            on_create: Some("Ball_OnCreate".into()),
            on_update: None,
            all_scripts: vec![AssetHandle::from_u64(11), AssetHandle::from_u64(12)],
        };

        let path = Path::new("EntityClass/Ball.kgclass");
        let yaml = to_yaml(&class, path).unwrap();
        assert!(yaml.contains("fieldTypes"));
        assert!(!yaml.contains("onUpdate"));
        assert_eq!(from_yaml::<EntityClass>(&yaml, path).unwrap(), class);
        assert_eq!(class.field_type("owner"), Some(WrappedVarType::Entity));
    }
}

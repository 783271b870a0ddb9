use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::element::SceneObject;
use crate::error::PersistenceError;

pub const DESIGN_VERSION: u32 = 1;

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A saved design: the canvas size and the object list in paint order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDocument {
    pub version: u32,
    pub canvas_size: [f32; 2],
    pub objects: Vec<SceneObject>,
}

impl DesignDocument {
    pub fn new(canvas_size: [f32; 2], objects: Vec<SceneObject>) -> Self {
        Self {
            version: DESIGN_VERSION,
            canvas_size,
            objects,
        }
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        let document: Self = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }

    /// Rejects documents that would break the object list invariants
    pub fn validate(&self) -> PersistenceResult<()> {
        if self.version > DESIGN_VERSION {
            return Err(PersistenceError::Invalid(format!(
                "design version {} is newer than supported version {DESIGN_VERSION}",
                self.version
            )));
        }
        let mut seen = HashSet::new();
        for object in &self.objects {
            if !seen.insert(object.id()) {
                return Err(PersistenceError::Invalid(format!(
                    "duplicate object id {}",
                    object.id()
                )));
            }
        }
        let templates = self.objects.iter().filter(|o| o.is_template()).count();
        if templates > 1 {
            return Err(PersistenceError::Invalid(format!(
                "{templates} template objects, at most one allowed"
            )));
        }
        Ok(())
    }
}

pub fn save_design(path: &Path, document: &DesignDocument) -> PersistenceResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, document.to_json()?)?;
    log::info!("Saved design with {} objects to {}", document.objects.len(), path.display());
    Ok(())
}

pub fn load_design(path: &Path) -> PersistenceResult<DesignDocument> {
    let json = fs::read_to_string(path)?;
    let document = DesignDocument::from_json(&json)?;
    log::info!("Loaded design with {} objects from {}", document.objects.len(), path.display());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Pos2, Vec2};

    #[test]
    fn json_round_trip_preserves_order_and_ids() {
        let objects = vec![
            SceneObject::template("/templates/polo.svg", Vec2::new(800.0, 600.0), None),
            SceneObject::text("Edit me", Pos2::new(100.0, 100.0)),
            SceneObject::rect(Pos2::new(150.0, 150.0), Vec2::splat(100.0)),
        ];
        let document = DesignDocument::new([800.0, 600.0], objects);
        let back = DesignDocument::from_json(&document.to_json().unwrap()).unwrap();
        assert_eq!(back, document);
    }

    #[test]
    fn rejects_duplicate_ids_and_extra_templates() {
        let text = SceneObject::text("a", Pos2::ZERO);
        let dup = DesignDocument::new([800.0, 600.0], vec![text.clone(), text]);
        assert!(matches!(
            DesignDocument::from_json(&dup.to_json().unwrap()),
            Err(PersistenceError::Invalid(_))
        ));

        let two = DesignDocument::new(
            [800.0, 600.0],
            vec![
                SceneObject::template("/a.svg", Vec2::new(800.0, 600.0), None),
                SceneObject::template("/b.svg", Vec2::new(800.0, 600.0), None),
            ],
        );
        assert!(two.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            DesignDocument::from_json("{ not json"),
            Err(PersistenceError::Serialization(_))
        ));
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("studio-design-{}", uuid::Uuid::new_v4()));
        let path = dir.join("design.json");
        let document = DesignDocument::new(
            [800.0, 600.0],
            vec![SceneObject::text("saved", Pos2::new(1.0, 2.0))],
        );
        save_design(&path, &document).unwrap();
        assert_eq!(load_design(&path).unwrap(), document);
        std::fs::remove_dir_all(dir).unwrap();
    }
}

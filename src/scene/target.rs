use crate::content::ImageEntry;
use crate::core::vector::Vec3;
use serde::{Deserialize, Serialize};

/// Identifier handed out by a scene adapter
pub type TargetId = u64;

/// What a scene node is, instead of ad hoc marker flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Card,
    Label,
    LinkIndicator,
}

/// Animatable fields of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetProperty {
    Position,
    Rotation,
    Scale,
    Opacity,
}

/// A bag of numeric properties owned by the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatableTarget {
    pub kind: TargetKind,
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    pub scale: Vec3,
    pub opacity: f64,
    pub image: Option<ImageEntry>,
}

impl AnimatableTarget {
    /// Cards start visible, labels and link indicators start transparent
    pub fn new(kind: TargetKind) -> Self {
        let opacity = match kind {
            TargetKind::Card => 1.0,
            TargetKind::Label | TargetKind::LinkIndicator => 0.0,
        };
        Self {
            kind,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            opacity,
            image: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Write a vector property. Returns `false` for [`TargetProperty::Opacity`].
    pub fn set_vec3(&mut self, property: TargetProperty, value: Vec3) -> bool {
        match property {
            TargetProperty::Position => self.position = value,
            TargetProperty::Rotation => self.rotation = value,
            TargetProperty::Scale => self.scale = value,
            TargetProperty::Opacity => return false,
        }
        true
    }

    /// Opacity is kept inside [0, 1] whatever the easing produced
    pub fn set_opacity(&mut self, value: f64) {
        self.opacity = value.clamp(0.0, 1.0);
    }

    pub fn vec3(&self, property: TargetProperty) -> Option<Vec3> {
        match property {
            TargetProperty::Position => Some(self.position),
            TargetProperty::Rotation => Some(self.rotation),
            TargetProperty::Scale => Some(self.scale),
            TargetProperty::Opacity => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_by_kind() {
        assert_eq!(AnimatableTarget::new(TargetKind::Card).opacity, 1.0);
        assert_eq!(AnimatableTarget::new(TargetKind::Label).opacity, 0.0);
        assert_eq!(AnimatableTarget::new(TargetKind::LinkIndicator).scale, Vec3::ONE);
    }

    #[test]
    fn test_property_writes() {
        let mut target = AnimatableTarget::new(TargetKind::Card);
        assert!(target.set_vec3(TargetProperty::Rotation, Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(target.vec3(TargetProperty::Rotation), Some(Vec3::new(0.0, 1.0, 0.0)));
        assert!(!target.set_vec3(TargetProperty::Opacity, Vec3::ONE));

        target.set_opacity(1.3);
        assert_eq!(target.opacity, 1.0);
        target.set_opacity(-0.2);
        assert_eq!(target.opacity, 0.0);
    }
}

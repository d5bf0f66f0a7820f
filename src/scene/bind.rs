//! Glue between tweens and scene targets
//!
//! A tween only knows its `on_update` callback. The binder builds those
//! callbacks so that they write one property of one target, and tracks a single
//! writer per `(target, property)`: claiming a property again silences every
//! earlier writer for it. Writes to a despawned target are dropped.

use super::graph::SceneAdapter;
use super::target::{AnimatableTarget, TargetId, TargetProperty};
use crate::animation::easing::EasingFunction;
use crate::animation::tween::Tween;
use crate::content::ImageEntry;
use crate::core::vector::Vec3;
use crate::Result;
use fxhash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Permission to write one property of one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteTicket {
    pub id: TargetId,
    pub property: TargetProperty,
    generation: u64,
}

pub struct PropertyBinder<S: SceneAdapter> {
    scene: Rc<RefCell<S>>,
    owners: Rc<RefCell<FxHashMap<(TargetId, TargetProperty), u64>>>,
    next_generation: Rc<Cell<u64>>,
}

impl<S: SceneAdapter> Clone for PropertyBinder<S> {
    fn clone(&self) -> Self {
        Self {
            scene: self.scene.clone(),
            owners: self.owners.clone(),
            next_generation: self.next_generation.clone(),
        }
    }
}

impl<S: SceneAdapter + 'static> PropertyBinder<S> {
    pub fn new(scene: Rc<RefCell<S>>) -> Self {
        Self {
            scene,
            owners: Rc::new(RefCell::new(FxHashMap::default())),
            next_generation: Rc::new(Cell::new(0)),
        }
    }

    pub fn scene(&self) -> &Rc<RefCell<S>> {
        &self.scene
    }

    /// Become the only writer of `property` on `id`
    pub fn claim(&self, id: TargetId, property: TargetProperty) -> WriteTicket {
        let generation = self.next_generation.get() + 1;
        self.next_generation.set(generation);
        self.owners.borrow_mut().insert((id, property), generation);
        WriteTicket {
            id,
            property,
            generation,
        }
    }

    pub fn is_current(&self, ticket: &WriteTicket) -> bool {
        self.owners.borrow().get(&(ticket.id, ticket.property)) == Some(&ticket.generation)
    }

    fn with_target<F>(&self, ticket: &WriteTicket, write: F) -> bool
    where
        F: FnOnce(&mut AnimatableTarget),
    {
        if !self.is_current(ticket) {
            return false;
        }
        let mut scene = self.scene.borrow_mut();
        match scene.target_mut(ticket.id) {
            Some(target) => {
                write(target);
                true
            }
            None => false,
        }
    }

    pub fn write_vec3(&self, ticket: &WriteTicket, value: Vec3) -> bool {
        self.with_target(ticket, |target| {
            target.set_vec3(ticket.property, value);
        })
    }

    /// Clamped to [0, 1]
    pub fn write_opacity(&self, ticket: &WriteTicket, value: f64) -> bool {
        self.with_target(ticket, |target| target.set_opacity(value))
    }

    /// Callback writing a vector property
    pub fn vec3_writer(&self, id: TargetId, property: TargetProperty) -> impl FnMut(Vec3) + 'static {
        let ticket = self.claim(id, property);
        let binder = self.clone();
        move |value| {
            binder.write_vec3(&ticket, value);
        }
    }

    /// Callback writing opacity
    pub fn opacity_writer(&self, id: TargetId) -> impl FnMut(f64) + 'static {
        let ticket = self.claim(id, TargetProperty::Opacity);
        let binder = self.clone();
        move |value| {
            binder.write_opacity(&ticket, value);
        }
    }

    /// Tween a vector property of one target
    pub fn tween_vec3(
        &self,
        id: TargetId,
        property: TargetProperty,
        from: Vec3,
        to: Vec3,
        duration_ms: f64,
        easing: EasingFunction,
    ) -> Result<Tween<Vec3>> {
        Tween::new(from, to, duration_ms, easing, self.vec3_writer(id, property))
    }

    /// Tween the opacity of one target; overshooting easings are clamped on write
    pub fn tween_opacity(
        &self,
        id: TargetId,
        from: f64,
        to: f64,
        duration_ms: f64,
        easing: EasingFunction,
    ) -> Result<Tween<f64>> {
        Tween::new(from, to, duration_ms, easing, self.opacity_writer(id))
    }

    pub fn set_image(&self, id: TargetId, image: &ImageEntry) -> bool {
        self.scene.borrow_mut().set_image(id, image)
    }

    pub fn spawn(&self, target: AnimatableTarget) -> TargetId {
        self.scene.borrow_mut().spawn(target)
    }

    /// Remove a target and forget its writers
    pub fn despawn(&self, id: TargetId) -> bool {
        self.owners.borrow_mut().retain(|(owner, _), _| *owner != id);
        self.scene.borrow_mut().despawn(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::graph::SceneGraph;
    use crate::scene::target::TargetKind;
    use crate::traits::Animation;

    fn setup() -> (Rc<RefCell<SceneGraph>>, PropertyBinder<SceneGraph>, TargetId) {
        let scene = Rc::new(RefCell::new(SceneGraph::new()));
        let binder = PropertyBinder::new(scene.clone());
        let id = binder.spawn(AnimatableTarget::new(TargetKind::Card));
        (scene, binder, id)
    }

    #[test]
    fn test_tween_writes_into_scene() {
        let (scene, binder, id) = setup();
        let mut tween = binder
            .tween_vec3(
                id,
                TargetProperty::Position,
                Vec3::ZERO,
                Vec3::new(4.0, 0.0, 0.0),
                100.0,
                EasingFunction::Linear,
            )
            .unwrap();
        tween.advance(50.0);
        assert_eq!(scene.borrow().target(id).unwrap().position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_newer_tween_replaces_older_writer() {
        let (scene, binder, id) = setup();
        let mut old = binder
            .tween_vec3(id, TargetProperty::Scale, Vec3::ONE, Vec3::splat(3.0), 100.0, EasingFunction::Linear)
            .unwrap();
        let mut new = binder
            .tween_vec3(id, TargetProperty::Scale, Vec3::ONE, Vec3::ZERO, 100.0, EasingFunction::Linear)
            .unwrap();

        new.advance(100.0);
        old.advance(100.0);
        assert_eq!(scene.borrow().target(id).unwrap().scale, Vec3::ZERO);

        // Other properties are unaffected
        let mut rotation = binder
            .tween_vec3(id, TargetProperty::Rotation, Vec3::ZERO, Vec3::ONE, 10.0, EasingFunction::Linear)
            .unwrap();
        rotation.advance(10.0);
        assert_eq!(scene.borrow().target(id).unwrap().rotation, Vec3::ONE);
    }

    #[test]
    fn test_opacity_is_clamped_but_easing_is_not() {
        let (scene, binder, id) = setup();
        let seen = Rc::new(Cell::new(0.0));
        let sink = seen.clone();
        let mut writer = binder.opacity_writer(id);
        let mut tween = Tween::new(0.0, 1.0, 100.0, EasingFunction::EaseOutBack, move |v| {
            sink.set(v);
            writer(v);
        })
        .unwrap();

        tween.advance(60.0);
        assert!(seen.get() > 1.0);
        assert_eq!(scene.borrow().target(id).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_writes_to_despawned_target_are_no_ops() {
        let (scene, binder, id) = setup();
        let mut tween = binder
            .tween_vec3(id, TargetProperty::Position, Vec3::ZERO, Vec3::ONE, 100.0, EasingFunction::Linear)
            .unwrap();
        assert!(binder.despawn(id));
        assert!(tween.advance(50.0));
        assert!(!tween.advance(50.0));
        assert!(scene.borrow().is_empty());
    }
}

use super::target::{AnimatableTarget, TargetId, TargetKind};
use crate::content::ImageEntry;
use fxhash::FxHashMap;

/// The scene side of the engine.
///
/// The animation core only ever writes through this: it creates and removes
/// targets and pushes new values and images into them.
pub trait SceneAdapter {
    /// Add a target and return its id
    fn spawn(&mut self, target: AnimatableTarget) -> TargetId;

    /// Remove a target. Returns `false` if it was already gone.
    fn despawn(&mut self, id: TargetId) -> bool;

    /// Mutable access for property writes; `None` once the target is gone
    fn target_mut(&mut self, id: TargetId) -> Option<&mut AnimatableTarget>;

    /// Swap the displayed image of a target
    fn set_image(&mut self, id: TargetId, image: &ImageEntry) -> bool {
        match self.target_mut(id) {
            Some(target) => {
                target.image = Some(image.clone());
                true
            }
            None => false,
        }
    }
}

/// In-memory scene used headless and in tests
#[derive(Debug, Default)]
pub struct SceneGraph {
    targets: FxHashMap<TargetId, AnimatableTarget>,
    next_id: TargetId,
    image_swaps: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self, id: TargetId) -> Option<&AnimatableTarget> {
        self.targets.get(&id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn count_of(&self, kind: TargetKind) -> usize {
        self.targets.values().filter(|t| t.kind == kind).count()
    }

    /// Ids of every target of `kind`, sorted
    pub fn ids_of(&self, kind: TargetKind) -> Vec<TargetId> {
        let mut ids: Vec<TargetId> = self
            .targets
            .iter()
            .filter(|(_, t)| t.kind == kind)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// How many times an image was swapped onto a target
    pub fn image_swaps(&self) -> usize {
        self.image_swaps
    }
}

impl SceneAdapter for SceneGraph {
    fn spawn(&mut self, target: AnimatableTarget) -> TargetId {
        self.next_id += 1;
        let id = self.next_id;
        self.targets.insert(id, target);
        id
    }

    fn despawn(&mut self, id: TargetId) -> bool {
        self.targets.remove(&id).is_some()
    }

    fn target_mut(&mut self, id: TargetId) -> Option<&mut AnimatableTarget> {
        self.targets.get_mut(&id)
    }

    fn set_image(&mut self, id: TargetId, image: &ImageEntry) -> bool {
        match self.targets.get_mut(&id) {
            Some(target) => {
                target.image = Some(image.clone());
                self.image_swaps += 1;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vector::Vec3;

    #[test]
    fn test_spawn_and_despawn() {
        let mut scene = SceneGraph::new();
        let card = scene.spawn(AnimatableTarget::new(TargetKind::Card).at(Vec3::new(1.0, 2.0, 3.0)));
        let label = scene.spawn(AnimatableTarget::new(TargetKind::Label));

        assert_ne!(card, label);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.count_of(TargetKind::Card), 1);
        assert_eq!(scene.target(card).unwrap().position, Vec3::new(1.0, 2.0, 3.0));

        assert!(scene.despawn(card));
        assert!(!scene.despawn(card));
        assert!(scene.target_mut(card).is_none());
        assert_eq!(scene.ids_of(TargetKind::Label), vec![label]);
    }

    #[test]
    fn test_image_swaps() {
        let mut scene = SceneGraph::new();
        let card = scene.spawn(AnimatableTarget::new(TargetKind::Card));
        let image = ImageEntry::new("abc", "https://example.com/abc.jpg");

        assert!(scene.set_image(card, &image));
        assert_eq!(scene.target(card).unwrap().image.as_ref(), Some(&image));
        assert_eq!(scene.image_swaps(), 1);

        scene.despawn(card);
        assert!(!scene.set_image(card, &image));
        assert_eq!(scene.image_swaps(), 1);
    }
}

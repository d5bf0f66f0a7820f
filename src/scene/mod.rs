pub mod bind;
pub mod graph;
pub mod target;

pub use bind::{PropertyBinder, WriteTicket};
pub use graph::{SceneAdapter, SceneGraph};
pub use target::{AnimatableTarget, TargetId, TargetKind, TargetProperty};

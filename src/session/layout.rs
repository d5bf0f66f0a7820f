//! Where things go on the table

use crate::core::vector::Vec3;
use std::f64::consts::PI;

/// How far below its slot a card starts when dealt
pub const DEAL_RISE: f64 = 5.0;

/// Label offset under a card
pub const LABEL_DROP: f64 = 1.9;

/// Link indicators float slightly above the row
pub const LINK_LIFT: f64 = 0.35;

/// Rotation of a card showing its face
pub const FACE_UP: Vec3 = Vec3 {
    x: 0.0,
    y: PI,
    z: 0.0,
};

/// `count` points spread evenly over a sphere of `radius` around the origin.
///
/// Golden-angle spiral: point `i` sits at height `1 - 2(i + 0.5)/count`.
pub fn fibonacci_sphere(count: usize, radius: f64) -> Vec<Vec3> {
    let golden_angle = PI * (3.0 - 5f64.sqrt());
    (0..count)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f64 + 0.5) / count as f64;
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f64;
            Vec3::new(theta.cos() * ring, y, theta.sin() * ring) * radius
        })
        .collect()
}

/// Slot `slot` of a centred row of `count` slots
pub fn slot_position(slot: usize, count: usize, spacing: f64) -> Vec3 {
    let centre = (count.max(1) - 1) as f64 / 2.0;
    Vec3::new((slot as f64 - centre) * spacing, 0.0, 0.0)
}

pub fn spread_slots(count: usize, spacing: f64) -> Vec<Vec3> {
    (0..count)
        .map(|slot| slot_position(slot, count, spacing))
        .collect()
}

pub fn deal_start(slot: Vec3) -> Vec3 {
    slot - Vec3::new(0.0, DEAL_RISE, 0.0)
}

pub fn label_position(card: Vec3) -> Vec3 {
    card - Vec3::new(0.0, LABEL_DROP, 0.0)
}

/// Between two neighbouring cards
pub fn link_position(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) * 0.5 + Vec3::new(0.0, LINK_LIFT, 0.0)
}

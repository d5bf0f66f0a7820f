use crate::core::vector::Vec3;
use crate::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An item taken out of a pool, remembering where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Picked<T> {
    pub pool_index: usize,
    pub item: T,
}

/// Result of drawing K items out of a pool of N
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    /// Drawn items in draw order; position `i` is slot `i`
    pub kept: Vec<Picked<T>>,
    /// Everything else, in pool order
    pub discarded: Vec<Picked<T>>,
}

impl<T> Selection<T> {
    pub fn kept_indices(&self) -> Vec<usize> {
        self.kept.iter().map(|p| p.pool_index).collect()
    }

    pub fn discarded_indices(&self) -> Vec<usize> {
        self.discarded.iter().map(|p| p.pool_index).collect()
    }
}

/// Draw `k` distinct items uniformly at random without replacement.
///
/// Uses a partial Fisher-Yates pass, so the same seed gives the same partition
/// and the same draw order.
pub fn select_without_replacement<T, R>(pool: Vec<T>, k: usize, rng: &mut R) -> Result<Selection<T>>
where
    R: Rng,
{
    let n = pool.len();
    if k > n {
        return Err(Error::InvalidSelection {
            requested: k,
            available: n,
        });
    }

    let mut order: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.random_range(i..n);
        order.swap(i, j);
    }

    let mut discarded_order = order.split_off(k);
    discarded_order.sort_unstable();

    let mut slots: Vec<Option<T>> = pool.into_iter().map(Some).collect();
    let mut take = |indices: Vec<usize>| -> Vec<Picked<T>> {
        indices
            .into_iter()
            .filter_map(|pool_index| {
                slots[pool_index]
                    .take()
                    .map(|item| Picked { pool_index, item })
            })
            .collect()
    };

    let kept = take(order);
    let discarded = take(discarded_order);
    Ok(Selection { kept, discarded })
}

/// Box below and around the origin that discarded cards fly off into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyAwayBox {
    pub half_width: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub half_depth: f64,
}

impl FlyAwayBox {
    /// Random point inside the box; every card gets its own jitter
    pub fn target<R: Rng>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            rng.random_range(-self.half_width..=self.half_width),
            rng.random_range(self.min_y..=self.max_y),
            rng.random_range(-self.half_depth..=self.half_depth),
        )
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        point.x.abs() <= self.half_width
            && point.y >= self.min_y
            && point.y <= self.max_y
            && point.z.abs() <= self.half_depth
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.half_width, self.min_y, self.max_y, self.half_depth]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.half_width < 0.0 || self.half_depth < 0.0 {
            return Err(Error::InvalidConfig(
                "fly-away box extents must be finite and non-negative".into(),
            ));
        }
        if self.min_y > self.max_y || self.max_y > 0.0 {
            return Err(Error::InvalidConfig(
                "fly-away box must sit below the origin with min_y <= max_y".into(),
            ));
        }
        Ok(())
    }
}

impl Default for FlyAwayBox {
    fn default() -> Self {
        Self {
            half_width: 14.0,
            min_y: -18.0,
            max_y: -9.0,
            half_depth: 8.0,
        }
    }
}

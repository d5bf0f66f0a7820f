use rand::seq::IndexedRandom;
use rand::Rng;

/// Themed search words a reading draws its images from
#[derive(Debug, Clone)]
pub struct QueryPool {
    words: Vec<String>,
}

impl QueryPool {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// A random query, different from `previous` whenever the pool allows it
    pub fn pick<R: Rng>(&self, rng: &mut R, previous: Option<&str>) -> String {
        let candidates: Vec<&String> = self
            .words
            .iter()
            .filter(|word| Some(word.as_str()) != previous)
            .collect();

        candidates
            .choose(rng)
            .map(|word| (*word).clone())
            .or_else(|| self.words.first().cloned())
            .unwrap_or_else(|| "stars".to_string())
    }
}

impl Default for QueryPool {
    fn default() -> Self {
        Self::new([
            "nebula", "moon", "aurora", "forest", "ocean", "desert", "raven", "tower", "lantern",
            "comet", "garden", "mountain",
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_pick_avoids_previous() {
        let pool = QueryPool::new(["sun", "moon"]);
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(pool.pick(&mut rng, Some("sun")), "moon");
        }
    }

    #[test]
    fn test_single_word_pool_repeats() {
        let pool = QueryPool::new(["sun"]);
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        assert_eq!(pool.pick(&mut rng, Some("sun")), "sun");
    }

    #[test]
    fn test_empty_pool_has_fallback() {
        let pool = QueryPool::new(Vec::<String>::new());
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        assert_eq!(pool.pick(&mut rng, None), "stars");
    }

    #[test]
    fn test_default_pool_is_seeded_deterministic() {
        let pool = QueryPool::default();
        let mut a = Xoshiro256StarStar::seed_from_u64(11);
        let mut b = Xoshiro256StarStar::seed_from_u64(11);
        let run_a: Vec<String> = (0..5).map(|_| pool.pick(&mut a, None)).collect();
        let run_b: Vec<String> = (0..5).map(|_| pool.pick(&mut b, None)).collect();
        assert_eq!(run_a, run_b);
    }
}

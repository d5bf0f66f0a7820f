use super::query::QueryPool;
use super::source::{ContentSource, ImageEntry};
use crate::core::config::ContentConfig;
use crate::{Error, Result};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use std::time::Duration;

/// Bounded retry around a [`ContentSource`].
///
/// An empty answer triggers a fresh query, at most `max_query_attempts` times.
/// A transport failure restarts the whole initialisation after a fixed delay,
/// at most `max_init_attempts` times.
pub struct ContentLoader<C: ContentSource> {
    source: C,
    queries: QueryPool,
    config: ContentConfig,
    rng: Xoshiro256StarStar,
}

impl<C: ContentSource> ContentLoader<C> {
    pub fn new(source: C, config: ContentConfig, seed: u64) -> Self {
        Self {
            source,
            queries: QueryPool::default(),
            config,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    pub fn with_queries(mut self, queries: QueryPool) -> Self {
        self.queries = queries;
        self
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    /// Fetch a non-empty set of images, retrying as configured
    pub async fn load(&mut self) -> Result<Vec<ImageEntry>> {
        let max_attempts = self.config.max_init_attempts.max(1);
        let delay = Duration::from_millis(self.config.init_retry_delay_ms);

        let mut attempt = 1;
        loop {
            match self.load_once().await {
                Ok(images) => {
                    log::info!("loaded {} images on attempt {}", images.len(), attempt);
                    return Ok(images);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    log::warn!(
                        "content load failed on attempt {}: {}; retrying in {:?}",
                        attempt,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    log::error!("giving up on content after {} attempts: {}", attempt, e);
                    return Err(e);
                }
            }
        }
    }

    /// One initialisation: query until something comes back
    async fn load_once(&mut self) -> Result<Vec<ImageEntry>> {
        let max_queries = self.config.max_query_attempts.max(1);
        let mut previous: Option<String> = None;

        for attempt in 1..=max_queries {
            let query = self.queries.pick(&mut self.rng, previous.as_deref());
            log::debug!("query attempt {attempt}: {query:?}");

            match self.source.fetch_images(&query).await {
                Ok(images) if !images.is_empty() => return Ok(images),
                Ok(_) | Err(Error::NoResults { .. }) => {
                    log::debug!("no results for {query:?}");
                    previous = Some(query);
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::NoResults {
            attempts: max_queries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a script of answers, one per call
    struct Scripted {
        answers: Mutex<Vec<Result<Vec<ImageEntry>>>>,
        queries: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(mut answers: Vec<Result<Vec<ImageEntry>>>) -> Self {
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
                queries: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentSource for Scripted {
        async fn fetch_images(&self, query: &str) -> Result<Vec<ImageEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            self.answers
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(Error::NoResults { attempts: 1 }))
        }
    }

    fn fast_config() -> ContentConfig {
        ContentConfig {
            init_retry_delay_ms: 0,
            ..ContentConfig::default()
        }
    }

    fn image(id: &str) -> ImageEntry {
        ImageEntry::new(id, format!("https://img.example/{id}.jpg"))
    }

    #[tokio::test]
    async fn test_first_answer_wins() {
        let source = Scripted::new(vec![Ok(vec![image("a"), image("b")])]);
        let mut loader = ContentLoader::new(source, fast_config(), 1);
        let images = loader.load().await.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(loader.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_results_retry_with_new_query() {
        let source = Scripted::new(vec![
            Err(Error::NoResults { attempts: 1 }),
            Ok(vec![]),
            Ok(vec![image("c")]),
        ]);
        let mut loader = ContentLoader::new(source, fast_config(), 1);
        let images = loader.load().await.unwrap();
        assert_eq!(images, vec![image("c")]);

        let queries = loader.source().queries.lock().unwrap().clone();
        assert_eq!(queries.len(), 3);
        assert!(queries.windows(2).all(|w| w[0] != w[1]));
    }

    #[tokio::test]
    async fn test_empty_results_are_bounded() {
        let source = Scripted::new(vec![]);
        let config = ContentConfig {
            max_query_attempts: 5,
            ..fast_config()
        };
        let mut loader = ContentLoader::new(source, config, 1);
        let result = loader.load().await;
        assert!(matches!(result, Err(Error::NoResults { attempts: 5 })));
        // NoResults is terminal: no second initialisation round
        assert_eq!(loader.source().calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_transport_failures_restart_initialisation() {
        let source = Scripted::new(vec![
            Err(Error::Http(503)),
            Err(Error::Parse("truncated".into())),
            Ok(vec![image("d")]),
        ]);
        let config = ContentConfig {
            max_init_attempts: 3,
            ..fast_config()
        };
        let mut loader = ContentLoader::new(source, config, 1);
        assert_eq!(loader.load().await.unwrap(), vec![image("d")]);
        assert_eq!(loader.source().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transport_failures_are_bounded() {
        let source = Scripted::new(vec![
            Err(Error::Http(500)),
            Err(Error::Http(502)),
            Ok(vec![image("too-late")]),
        ]);
        let config = ContentConfig {
            max_init_attempts: 2,
            ..fast_config()
        };
        let mut loader = ContentLoader::new(source, config, 1);
        assert!(matches!(loader.load().await, Err(Error::Http(502))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_the_configured_delay() {
        let source = Scripted::new(vec![Err(Error::Http(503)), Ok(vec![image("e")])]);
        let mut loader = ContentLoader::new(source, ContentConfig::default(), 1);
        let started = tokio::time::Instant::now();
        loader.load().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}

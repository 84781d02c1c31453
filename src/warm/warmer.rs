// src/warm/warmer.rs
// =============================================================================
// The entry point: warm the cache for one page.
//
// `warm` spawns the whole pipeline and returns at once:
//
//   fetch lead + remaining (joined) -> extract image URLs -> dispatch prefetches
//
// If the join fails we log it and stop; no image is prefetched for a page
// that could not be fetched. Nothing is ever reported back to the caller.
//
// The runtime is captured once in `new`; `warm` may then be called from
// any thread, runtime or not.
// =============================================================================

use super::joiner::fetch_and_extract_image_urls;
use crate::config::WarmerConfig;
use crate::error::WarmerError;
use crate::http::HttpClient;
use crate::page::{lead_image_width, PageTitle};
use crate::prefetch::PrefetchDispatcher;
use crate::source::DocumentSource;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Clone)]
pub struct CacheWarmer {
    source: Arc<dyn DocumentSource>,
    dispatcher: PrefetchDispatcher,
    lead_image_width: u32,
}

impl CacheWarmer {
    /// `http` should be the same client `source` uses, so page parts and
    /// images share one cache.
    ///
    /// Fails with [`WarmerError::NoRuntime`] outside a tokio runtime.
    pub fn new(
        source: Arc<dyn DocumentSource>,
        http: Arc<dyn HttpClient>,
        config: &WarmerConfig,
    ) -> Result<Self, WarmerError> {
        Ok(Self {
            source,
            dispatcher: PrefetchDispatcher::new(http)?,
            lead_image_width: lead_image_width(config.lead_image_width),
        })
    }

    /// Starts warming the cache for `title` in the background.
    ///
    /// Returns immediately.
    pub fn warm(&self, title: PageTitle) {
        let guard = self.dispatcher.in_flight().enter();
        let warmer = self.clone();

        self.dispatcher.runtime().spawn(async move {
            warmer.run(title).await;
            drop(guard);
        });
    }

    /// Resolves once every pipeline and every image fetch started so far
    /// has finished. Only for shutdown and tests; `warm` itself never waits.
    pub async fn wait_idle(&self) {
        self.dispatcher.in_flight().wait_idle().await;
    }

    async fn run(&self, title: PageTitle) {
        debug!(page = %title, "loading page into cache");

        let urls = match fetch_and_extract_image_urls(self.source.as_ref(), &title, self.lead_image_width).await {
            Ok(urls) => urls,
            Err(e) => {
                error!(page = %title, error = %e, "could not fetch page, skipping image prefetch");
                return;
            }
        };

        debug!(page = %title, images = urls.len(), "page fetched");
        self.dispatcher.dispatch(title.site(), urls);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FetchResult, RestPageSource};
    use crate::test_support::{title, FakeHttp, FakeSource, Part};
    use std::time::Duration;

    async fn settle(warmer: &CacheWarmer) {
        tokio::time::timeout(Duration::from_secs(5), warmer.wait_idle())
            .await
            .unwrap();
    }

    fn warmer(source: FakeSource, http: Arc<FakeHttp>) -> CacheWarmer {
        CacheWarmer::new(Arc::new(source), http, &WarmerConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_warm_prefetches_union_of_both_parts() {
        let http = FakeHttp::new();
        let source = FakeSource::with_bodies(
            r#"<img src="//up.org/img1.png">"#,
            r#"<img src="//up.org/img1.png"><img src="//up.org/img2.jpg">"#,
        );
        let warmer = warmer(source, http.clone());

        warmer.warm(title("Cat"));
        settle(&warmer).await;

        let expected = vec![
            "https://up.org/img1.png".to_string(),
            "https://up.org/img2.jpg".to_string(),
        ];
        assert_eq!(http.requests(), expected);
        assert_eq!(http.drained(), expected);
    }

    #[tokio::test]
    async fn test_lead_failure_prefetches_nothing() {
        let http = FakeHttp::new();
        let source = FakeSource::new(
            Part::Fail,
            Part::Ok(FetchResult::with_body(200, r#"<img src="//up.org/img2.jpg">"#)),
        );
        let warmer = warmer(source, http.clone());

        warmer.warm(title("Cat"));
        settle(&warmer).await;

        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_images_prefetches_nothing() {
        let http = FakeHttp::new();
        let warmer = warmer(FakeSource::with_bodies("<p>a</p>", "<p>b</p>"), http.clone());

        warmer.warm(title("Cat"));
        settle(&warmer).await;

        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_warm_returns_before_pipeline_runs() {
        let http = FakeHttp::new();
        let source = FakeSource::with_bodies(r#"<img src="//up.org/a.png">"#, "")
            .delays(Duration::from_millis(30), Duration::ZERO);
        let warmer = warmer(source, http.clone());

        warmer.warm(title("Cat"));
        assert!(http.requests().is_empty());

        settle(&warmer).await;
        assert_eq!(http.requests(), vec!["https://up.org/a.png"]);
    }

    #[test]
    fn test_new_without_runtime_is_an_error() {
        let source = Arc::new(FakeSource::with_bodies("", ""));
        let result = CacheWarmer::new(source, FakeHttp::new(), &WarmerConfig::default());
        assert!(matches!(result, Err(WarmerError::NoRuntime(_))));
    }

    #[test]
    fn test_warm_from_thread_without_runtime() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let http = FakeHttp::new();
        let source = FakeSource::with_bodies(r#"<img src="//up.org/a.png">"#, "");
        let warmer = {
            let _entered = rt.enter();
            warmer(source, http.clone())
        };

        // A plain OS thread: no runtime context, warm must not panic
        let caller = warmer.clone();
        std::thread::spawn(move || caller.warm(title("Cat"))).join().unwrap();
        rt.block_on(settle(&warmer));

        assert_eq!(http.requests(), vec!["https://up.org/a.png"]);
        assert_eq!(http.drained(), vec!["https://up.org/a.png"]);
    }

    #[tokio::test]
    async fn test_lead_width_is_bucketed() {
        let http = FakeHttp::new();
        let source = Arc::new(FakeSource::with_bodies("", ""));
        let config = WarmerConfig {
            lead_image_width: 700,
            ..WarmerConfig::default()
        };
        let warmer = CacheWarmer::new(source.clone(), http, &config).unwrap();

        warmer.warm(title("Cat"));
        settle(&warmer).await;

        assert_eq!(source.lead_widths(), vec![800]);
    }

    #[tokio::test]
    async fn test_end_to_end_through_rest_source() {
        let http = FakeHttp::new();
        http.respond(
            "https://en.wikipedia.org/api/rest_v1/page/mobile-sections-lead/Cat?thumbsize=640",
            200,
            Some(r#"{"sections": [{"id": 0, "text": "<img src=\"//up.org/img1.png\">"}]}"#),
        );
        http.respond(
            "https://en.wikipedia.org/api/rest_v1/page/mobile-sections-remaining/Cat",
            200,
            Some(r#"{"sections": [{"id": 1, "text": "<img src=\"//up.org/img2.jpg\">"}]}"#),
        );

        let source = Arc::new(RestPageSource::new(http.clone()));
        let warmer = CacheWarmer::new(source, http.clone(), &WarmerConfig::default()).unwrap();

        warmer.warm(title("Cat"));
        settle(&warmer).await;

        // Two page parts plus two images, every one of them read to the end
        assert_eq!(http.requests().len(), 4);
        assert_eq!(http.drained().len(), 4);
        assert!(http.drained().contains(&"https://up.org/img2.jpg".to_string()));
    }
}

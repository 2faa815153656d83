//! Weather retrieval for display code.
//!
//! `watch` hands back a handle whose state moves from loading to either data
//! or an error message. Each handle owns the lifetime of its resolution: when
//! the handle is dropped the in-flight request is abandoned and its outcome is
//! neither cached nor published.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::cache::WeatherCache;
use crate::error::WeatherError;
use crate::provider::WeatherProvider;
use crate::types::{EventWeatherRequest, WeatherData, WeatherState};

#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<WeatherProvider>,
    cache: Arc<WeatherCache>,
}

impl WeatherService {
    pub fn new(provider: WeatherProvider) -> Self {
        Self::with_cache(provider, Arc::new(WeatherCache::new()))
    }

    pub fn with_cache(provider: WeatherProvider, cache: Arc<WeatherCache>) -> Self {
        Self {
            provider: Arc::new(provider),
            cache,
        }
    }

    pub fn provider(&self) -> &WeatherProvider {
        &self.provider
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Cached weather, else resolve and cache it. Failures are not cached.
    pub async fn weather_for_event(
        &self,
        request: &EventWeatherRequest,
    ) -> Result<WeatherData, WeatherError> {
        if let Some(data) = self.cache.get(request) {
            return Ok(data);
        }

        let data = self.provider.fetch(request).await?;
        Ok(self.cache.insert(request, data))
    }

    /// Start tracking weather for a trip.
    ///
    /// A cached trip is returned ready, without a loading state or a request.
    /// Otherwise resolution runs on the tokio runtime, so this must be called
    /// from within one.
    pub fn watch(&self, request: EventWeatherRequest) -> WeatherHandle {
        let token = CancellationToken::new();

        if let Some(data) = self.cache.get(&request) {
            let (_tx, rx) = watch::channel(WeatherState::ready(data));
            return WeatherHandle { state: rx, token };
        }

        let (tx, rx) = watch::channel(WeatherState::loading());
        let task_token = token.clone();
        let provider = Arc::clone(&self.provider);
        let cache = Arc::clone(&self.cache);

        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = task_token.cancelled() => {
                    tracing::debug!("Weather lookup for {} abandoned", request.event_id);
                    return;
                }
                result = provider.fetch(&request) => result,
            };

            if task_token.is_cancelled() {
                return;
            }

            let state = match outcome {
                Ok(data) => WeatherState::ready(cache.insert(&request, data)),
                Err(e) => {
                    tracing::warn!("Weather lookup for {} failed: {}", request.event_id, e);
                    WeatherState::failed(e.to_string())
                }
            };
            let _ = tx.send(state);
        });

        WeatherHandle { state: rx, token }
    }
}

/// Live view of one trip's weather lookup.
#[derive(Debug)]
pub struct WeatherHandle {
    state: watch::Receiver<WeatherState>,
    token: CancellationToken,
}

impl WeatherHandle {
    /// Current state snapshot
    pub fn state(&self) -> WeatherState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Wait until the lookup leaves the loading state.
    ///
    /// Returns the loading state unchanged if the lookup was cancelled.
    pub async fn settled(&mut self) -> WeatherState {
        let _ = self.state.wait_for(|s| !s.is_loading).await;
        self.state()
    }

    /// Abandon the lookup; its result will be discarded.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for WeatherHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

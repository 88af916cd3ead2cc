use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Delay used for search-as-you-type
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs only the most recent of a burst of calls, once the delay has passed
/// without a newer call.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `work`, cancelling whatever was still waiting
    pub async fn call<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work.await;
        });

        if let Some(previous) = self.pending.lock().await.replace(handle) {
            previous.abort();
        }
    }

    pub async fn cancel(&self) {
        if let Some(pending) = self.pending.lock().await.take() {
            pending.abort();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.get_mut().take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_only_last_call_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let seen = Arc::new(Mutex::new(Vec::new()));

        for query in ["w", "we", "web"] {
            let seen = seen.clone();
            debouncer
                .call(async move { seen.lock().await.push(query) })
                .await;
        }

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(*seen.lock().await, vec!["web"]);
    }

    #[tokio::test]
    async fn test_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let seen = Arc::new(Mutex::new(false));

        let flag = seen.clone();
        debouncer.call(async move { *flag.lock().await = true }).await;
        debouncer.cancel().await;

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!*seen.lock().await);
    }
}

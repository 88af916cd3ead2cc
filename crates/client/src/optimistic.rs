use std::future::Future;

/// Apply a change locally, confirm it with the server, and undo it on failure.
///
/// `apply` returns whatever `compensate` needs to restore the previous state,
/// or `None` when there was nothing to change. In that case nothing is sent and
/// `Ok(None)` is returned. A failed `confirm` runs `compensate` before the
/// error is handed back.
pub async fn optimistic<C, T, E, A, F, FFut, K, KFut>(
    apply: A,
    confirm: F,
    compensate: K,
) -> Result<Option<T>, E>
where
    A: Future<Output = Option<C>>,
    F: FnOnce() -> FFut,
    FFut: Future<Output = Result<T, E>>,
    K: FnOnce(C) -> KFut,
    KFut: Future<Output = ()>,
{
    let Some(captured) = apply.await else {
        return Ok(None);
    };

    match confirm().await {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            compensate(captured).await;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Mutex;

    async fn swap(value: &Mutex<&'static str>, next: &'static str) -> Option<&'static str> {
        let mut v = value.lock().await;
        Some(std::mem::replace(&mut *v, next))
    }

    #[tokio::test]
    async fn test_confirmed_change_sticks() {
        let value = Mutex::new("Todo");
        let v = &value;

        let result: Result<Option<u64>, String> = optimistic(
            swap(v, "Done"),
            || async { Ok(1) },
            move |prev| async move { *v.lock().await = prev },
        )
        .await;

        assert_eq!(result, Ok(Some(1)));
        assert_eq!(*value.lock().await, "Done");
    }

    #[tokio::test]
    async fn test_failed_change_rolled_back() {
        let value = Mutex::new("Todo");
        let v = &value;

        let result: Result<Option<u64>, String> = optimistic(
            swap(v, "Done"),
            || async { Err("Server update failed".to_string()) },
            move |prev| async move { *v.lock().await = prev },
        )
        .await;

        assert_eq!(result, Err("Server update failed".to_string()));
        assert_eq!(*value.lock().await, "Todo");
    }

    #[tokio::test]
    async fn test_nothing_applied_skips_confirm() {
        let confirmed = AtomicBool::new(false);

        let result: Result<Option<u64>, String> = optimistic(
            async { None::<()> },
            || async {
                confirmed.store(true, Ordering::SeqCst);
                Ok(1)
            },
            |_| async {},
        )
        .await;

        assert_eq!(result, Ok(None));
        assert!(!confirmed.load(Ordering::SeqCst));
    }
}

use std::cell::Cell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::block_on;
use futures::join;

use super::*;
use crate::http::ErrorKind;

fn fetch_error() -> ApiError {
    ApiError {
        kind: ErrorKind::Network,
        status: None,
        message: "fetch failed".to_string(),
    }
}

#[test]
fn fetch_populates_the_cache() {
    let cache = CsrfCache::new();
    assert_eq!(cache.cached(), None);

    let token = block_on(cache.get_or_fetch(|| async { Ok("tok-1".to_string()) }));
    assert_eq!(token, Ok("tok-1".to_string()));
    assert_eq!(cache.cached(), Some("tok-1".to_string()));
}

#[test]
fn cached_token_short_circuits_the_fetch() {
    let cache = CsrfCache::new();
    cache.set(Some("cached".to_string()));

    let calls = Rc::new(Cell::new(0u32));
    let calls_probe = calls.clone();
    let token = block_on(cache.get_or_fetch(move || {
        calls_probe.set(calls_probe.get() + 1);
        async { Ok("fresh".to_string()) }
    }));

    assert_eq!(token, Ok("cached".to_string()));
    assert_eq!(calls.get(), 0, "cached value must not trigger a fetch");
}

#[test]
fn concurrent_callers_share_one_fetch() {
    let cache = CsrfCache::new();
    let calls = Rc::new(Cell::new(0u32));

    let (a, b) = block_on(async {
        let first = cache.get_or_fetch({
            let calls = calls.clone();
            move || {
                calls.set(calls.get() + 1);
                async { Ok("shared".to_string()) }
            }
        });
        let second = cache.get_or_fetch({
            let calls = calls.clone();
            move || {
                calls.set(calls.get() + 1);
                async { Ok("shared".to_string()) }
            }
        });
        join!(first, second)
    });

    assert_eq!(a, Ok("shared".to_string()));
    assert_eq!(b, Ok("shared".to_string()));
    assert_eq!(calls.get(), 1, "concurrent callers must coalesce");
}

#[test]
fn callers_arriving_mid_fetch_wait_for_its_result() {
    let cache = CsrfCache::new();
    let calls = Rc::new(Cell::new(0u32));
    let (release, gate) = oneshot::channel::<()>();

    block_on(async {
        // the first fetch stays pending until the gate opens
        let first = cache.get_or_fetch({
            let calls = calls.clone();
            move || {
                calls.set(calls.get() + 1);
                async move {
                    let _ = gate.await;
                    Ok("gated".to_string())
                }
            }
        });
        let second = cache.get_or_fetch({
            let calls = calls.clone();
            move || {
                calls.set(calls.get() + 1);
                async { Ok("other".to_string()) }
            }
        });
        let open_gate = async move {
            let _ = release.send(());
        };

        let (a, b, _) = join!(first, second, open_gate);
        assert_eq!(a, Ok("gated".to_string()));
        assert_eq!(b, Ok("gated".to_string()), "waiter gets the in-flight result");
    });

    assert_eq!(calls.get(), 1, "the second caller must not fetch");
    assert_eq!(cache.cached(), Some("gated".to_string()));
}

#[test]
fn failed_fetch_leaves_the_cache_empty_and_allows_retry() {
    let cache = CsrfCache::new();
    let calls = Rc::new(Cell::new(0u32));

    let first = block_on(cache.get_or_fetch({
        let calls = calls.clone();
        move || {
            calls.set(calls.get() + 1);
            async { Err(fetch_error()) }
        }
    }));
    assert_eq!(first, Err(fetch_error()));
    assert_eq!(cache.cached(), None, "failure must not populate the cache");

    let second = block_on(cache.get_or_fetch({
        let calls = calls.clone();
        move || {
            calls.set(calls.get() + 1);
            async { Ok("recovered".to_string()) }
        }
    }));
    assert_eq!(second, Ok("recovered".to_string()));
    assert_eq!(calls.get(), 2, "a failed fetch must not stick as pending");
    assert_eq!(cache.cached(), Some("recovered".to_string()));
}

#[test]
fn set_none_clears_the_cache() {
    let cache = CsrfCache::new();
    cache.set(Some("tok".to_string()));
    cache.set(None);
    assert_eq!(cache.cached(), None);
}

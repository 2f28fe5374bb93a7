// src/services/watch.rs
//! Periodic refresh for `--watch` modes.

use log::{debug, info, warn};
use std::future::Future;
use std::time::Duration;

/// Runs `tick` immediately and then every `period` until Ctrl-C.
///
/// A zero period is bumped to one second.
pub async fn watch<F, Fut>(period: Duration, tick: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    watch_until(period, tick, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // no handler installed, so SIGINT keeps its default action
            warn!("cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Like [`watch`], stopping when `shutdown` completes.
///
/// The shutdown future is polled for the whole run, including while a tick
/// is in flight; a tick that is interrupted is dropped.
pub async fn watch_until<F, Fut, S>(period: Duration, mut tick: F, shutdown: S)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
    S: Future<Output = ()>,
{
    let period = period.max(Duration::from_secs(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut shutdown = Box::pin(shutdown);
    info!("refreshing every {}s, press Ctrl-C to stop", period.as_secs());

    loop {
        tokio::select! {
            _ = interval.tick() => {
                debug!("refresh tick");
                tokio::select! {
                    _ = tick() => {}
                    _ = &mut shutdown => break,
                }
            }
            _ = &mut shutdown => break,
        }
    }
    info!("watch stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn ticks_until_shutdown() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();

        watch_until(
            Duration::from_secs(60),
            move || {
                let seen = seen.clone();
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
            },
            tokio::time::sleep(Duration::from_secs(150)),
        )
        .await;

        // immediate tick plus two refreshes
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_during_slow_tick_stops_the_loop() {
        let started = tokio::time::Instant::now();
        let finished = Arc::new(AtomicUsize::new(0));
        let done = finished.clone();

        watch_until(
            Duration::from_secs(1),
            move || {
                let done = done.clone();
                async move {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                }
            },
            tokio::time::sleep(Duration::from_secs(1)),
        )
        .await;

        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_clamped() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();

        watch_until(
            Duration::ZERO,
            move || {
                let seen = seen.clone();
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
            },
            tokio::time::sleep(Duration::from_millis(2500)),
        )
        .await;

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}

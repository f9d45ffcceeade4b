mod common;

use keycache_core::{CacheConfig, KeyCache};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WORKERS: usize = 16;
const KEYS_PER_WORKER: usize = 500;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn disjoint_key_ranges_under_contention() {
    common::init_tracing();

    // Short sweep so the background task competes for the lock during the run
    let config = CacheConfig::default()
        .with_default_ttl(Duration::from_secs(60))
        .with_sweep_interval(Duration::from_millis(5))
        .with_jitter(false);
    let cache: KeyCache<usize> = KeyCache::with_config(config);

    let successful_reads = Arc::new(AtomicUsize::new(0));

    thread::scope(|scope| {
        for worker in 0..WORKERS {
            let cache = cache.clone();
            let successful_reads = Arc::clone(&successful_reads);
            scope.spawn(move || {
                let base = worker * KEYS_PER_WORKER;
                for i in 0..KEYS_PER_WORKER {
                    let key = format!("w{}:{}", worker, i);
                    cache.set(key.as_str(), base + i);
                    if cache.get(&key) == Some(base + i) {
                        successful_reads.fetch_add(1, Ordering::SeqCst);
                    }
                }
                // Drop every other key again
                for i in (0..KEYS_PER_WORKER).step_by(2) {
                    cache.delete(&format!("w{}:{}", worker, i));
                }
            });
        }
    });

    // No lost updates: every write was visible to its own writer
    assert_eq!(successful_reads.load(Ordering::SeqCst), WORKERS * KEYS_PER_WORKER);

    assert_eq!(cache.len(), WORKERS * KEYS_PER_WORKER / 2);
    for worker in 0..WORKERS {
        let base = worker * KEYS_PER_WORKER;
        for i in 0..KEYS_PER_WORKER {
            let expected = if i % 2 == 0 { None } else { Some(base + i) };
            assert_eq!(cache.get(&format!("w{}:{}", worker, i)), expected);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn readers_and_writers_share_one_cache() {
    common::init_tracing();

    let cache: KeyCache<String> = KeyCache::new();
    for i in 0..100 {
        cache.set(format!("key{}", i), format!("value{}", i));
    }

    let successful_reads = Arc::new(AtomicUsize::new(0));

    thread::scope(|scope| {
        for _ in 0..5 {
            let cache = cache.clone();
            let successful_reads = Arc::clone(&successful_reads);
            scope.spawn(move || {
                for i in 0..100 {
                    if cache.get(&format!("key{}", i)).is_some() {
                        successful_reads.fetch_add(1, Ordering::SeqCst);
                    }
                }
            });
        }

        for thread_id in 0..5 {
            let cache = cache.clone();
            scope.spawn(move || {
                for i in 0..100 {
                    cache.set(format!("new_thread{}:key{}", thread_id, i), "new_value".to_string());
                }
            });
        }
    });

    // 5 readers * 100 pre-populated keys
    assert_eq!(successful_reads.load(Ordering::SeqCst), 500);
    assert_eq!(cache.len(), 600);
}

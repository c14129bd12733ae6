//! End-to-end behavior of a whole [`ThreadPool`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskloom::{JoinError, Priority, ThreadPool};

#[test]
fn square_of_every_index_round_trips_through_its_handle() {
    let pool = ThreadPool::new(4).unwrap();

    let handles: Vec<_> = (0..100i64)
        .map(|i| pool.submit(move || i * i).unwrap())
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), (i as i64) * (i as i64));
    }

    let stats = pool.get_stats();
    assert_eq!(stats.completed, 100);
    assert_eq!(stats.submitted, 100);
}

#[test]
fn a_panicking_task_surfaces_its_message_and_the_pool_keeps_working() {
    let pool = ThreadPool::new(4).unwrap();

    let handle = pool.submit(|| -> i32 { panic!("boom") }).unwrap();
    let err = handle.join().unwrap_err();
    match &err {
        JoinError::Panicked(_) => {
            assert_eq!(err.panic_message(), Some("boom"));
        }
        JoinError::Cancelled => panic!("expected a panic, got a cancellation"),
    }

    let handle = pool.submit(|| 100).unwrap();
    assert_eq!(handle.join().unwrap(), 100);
}

#[test]
fn a_high_priority_task_overtakes_most_already_queued_low_priority_work() {
    let pool = ThreadPool::new(2).unwrap();

    let order: Arc<std::sync::Mutex<Vec<&'static str>>> = Arc::default();

    let low_handles: Vec<_> = (0..5)
        .map(|_| {
            let order = order.clone();
            pool.submit_priority(Priority::Low, move || {
                std::thread::sleep(Duration::from_millis(100));
                order.lock().unwrap().push("low");
            })
            .unwrap()
        })
        .collect();

    let high_order = order.clone();
    let high_handle = pool
        .submit_priority(Priority::High, move || {
            high_order.lock().unwrap().push("high");
        })
        .unwrap();

    high_handle.join().unwrap();
    for handle in low_handles {
        handle.join().unwrap();
    }

    let order = order.lock().unwrap();
    let high_pos = order.iter().position(|&s| s == "high").unwrap();
    let lows_before_high = order[..high_pos].iter().filter(|&&s| s == "low").count();
    // Two workers, so at most two LOWs are already running when the HIGH
    // task is submitted; it must finish before at least three of the five.
    assert!(lows_before_high <= 2, "order was {order:?}");
}

#[test]
fn fifty_tasks_incrementing_a_shared_counter_all_land_before_wait_all_returns() {
    let pool = ThreadPool::new(4).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..50 {
        let counter = Arc::clone(&counter);
        pool.submit(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    }

    pool.wait_all();
    assert_eq!(counter.load(Ordering::Relaxed), 50);
}

#[test]
fn graceful_shutdown_drains_every_sleeping_task_before_returning() {
    let pool = ThreadPool::new(2).unwrap();
    let completed = Arc::new(AtomicUsize::new(0));

    for _ in 0..10 {
        let completed = Arc::clone(&completed);
        pool.submit(move || {
            std::thread::sleep(Duration::from_millis(10));
            completed.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    }

    pool.shutdown_graceful();
    assert_eq!(completed.load(Ordering::Relaxed), 10);
}

#[test]
fn immediate_shutdown_bounds_completions_and_then_rejects_submissions() {
    let pool = ThreadPool::new(2).unwrap();
    let completed = Arc::new(AtomicUsize::new(0));

    for _ in 0..100 {
        let completed = Arc::clone(&completed);
        pool.submit(move || {
            std::thread::sleep(Duration::from_millis(50));
            completed.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    }

    std::thread::sleep(Duration::from_millis(100));
    pool.shutdown_immediate();

    let n = completed.load(Ordering::Relaxed);
    assert!((1..=100).contains(&n), "completed count was {n}");

    assert!(pool.submit(|| ()).is_err());
}

#[test]
fn shutdown_is_idempotent() {
    let pool = ThreadPool::new(2).unwrap();
    pool.submit(|| ()).unwrap();
    pool.shutdown_graceful();
    pool.shutdown_graceful();
    pool.shutdown_immediate();
}

#[test]
fn construction_with_zero_workers_fails() {
    assert!(ThreadPool::new(0).is_err());
}

#[test]
fn num_threads_reflects_construction_argument() {
    let pool = ThreadPool::new(6).unwrap();
    assert_eq!(pool.num_threads(), 6);
}

//! Stress tests for concurrent use of one logger
//!
//! These tests verify:
//! - Concurrent first use of a call site creates exactly one limiter
//! - Concurrent vmodule updates leave one of the submitted specs in force
//! - Lines are never torn or lost while the output is being swapped
//! - Readers see consistent decisions while the configuration changes

use rust_vlog_system::prelude::*;
use rust_vlog_system::{call_site, info, vlog};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_first_use_creates_one_limiter() {
    let logger = Arc::new(Logger::builder().output(Box::new(std::io::sink())).build().unwrap());
    let site: &'static CallSite = call_site!();
    let limit = Limit::every(Duration::from_secs(3600));
    let threads = 32;
    let barrier = Arc::new(Barrier::new(threads));
    let allowed = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            let allowed = Arc::clone(&allowed);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..10 {
                    if logger.allow(site, limit, 3) {
                        allowed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(logger.limiter_count(), 1);
    assert_eq!(allowed.load(Ordering::Relaxed), 3);
}

#[test]
fn test_many_call_sites_get_independent_limiters() {
    let logger = Arc::new(Logger::builder().output(Box::new(std::io::sink())).build().unwrap());
    let limit = Limit::every(Duration::from_secs(3600));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for _ in 0..100 {
                    logger.log_every(LogLevel::Info, call_site!(), limit, 1, "a");
                    logger.log_every(LogLevel::Info, call_site!(), limit, 1, "b");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(logger.limiter_count(), 2);
    assert_eq!(logger.metrics().emitted(), 2);
    assert_eq!(logger.metrics().rate_limited(), 1598);
}

#[test]
fn test_concurrent_set_vmodule_leaves_one_submitted_spec() {
    let logger = Arc::new(Logger::new());
    let specs: Vec<String> = (0..16).map(|i| format!("conn={},server*={}", i, i + 1)).collect();
    let barrier = Arc::new(Barrier::new(specs.len()));

    let handles: Vec<_> = specs
        .iter()
        .cloned()
        .map(|spec| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..50 {
                    logger.set_vmodule(&spec).expect("valid spec rejected");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let final_spec = logger.vmodule();
    let index = specs
        .iter()
        .position(|s| *s == final_spec)
        .expect("final spec is not one that was submitted");

    // The rules in force belong to the same spec as the text
    let level = i32::try_from(index).unwrap();
    assert!(logger.should_log("conn", level));
    assert!(!logger.should_log("conn", level + 1));
    assert!(logger.should_log("server_main", level + 1));
    assert!(!logger.should_log("server_main", level + 2));
}

#[test]
fn test_no_torn_lines_while_swapping_output() {
    let logger = Arc::new(Logger::builder().output(Box::new(SharedBuffer::new())).build().unwrap());
    let buffers: Vec<SharedBuffer> = (0..4).map(|_| SharedBuffer::new()).collect();
    let writers = 4;
    let per_writer = 500;
    let done = Arc::new(AtomicBool::new(false));

    let handles: Vec<_> = (0..writers)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..per_writer {
                    info!(logger, "writer={} seq={} payload=abcdefghijklmnopqrstuvwxyz", t, i);
                }
            })
        })
        .collect();

    let swapper = {
        let logger = Arc::clone(&logger);
        let buffers = buffers.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut retired = Vec::new();
            let mut i = 0;
            while !done.load(Ordering::Relaxed) {
                let next = buffers[i % buffers.len()].clone();
                retired.push(logger.set_output(Box::new(next)));
                i += 1;
                thread::yield_now();
            }
            retired
        })
    };

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    done.store(true, Ordering::Relaxed);
    let retired = swapper.join().expect("Swapper panicked");
    drop(retired);

    // Everything after the initial writer landed in one of the buffers, so
    // count what we can see and check every visible line is whole
    let mut seen = HashSet::new();
    for buffer in &buffers {
        for line in buffer.contents().lines() {
            assert!(line.starts_with('I'), "torn line: {:?}", line);
            assert!(line.ends_with("payload=abcdefghijklmnopqrstuvwxyz"), "torn line: {:?}", line);
            assert!(seen.insert(line.split("] ").nth(1).unwrap().to_string()), "duplicate line");
        }
    }
    assert!(seen.len() <= writers * per_writer);
    assert_eq!(logger.metrics().emitted(), (writers * per_writer) as u64);
}

#[test]
fn test_readers_during_reconfiguration() {
    let logger = Arc::new(Logger::builder().output(Box::new(std::io::sink())).build().unwrap());
    logger.set_vmodule("stress_tests=0").unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let reconfigure = {
        let logger = Arc::clone(&logger);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut round = 0;
            while !done.load(Ordering::Relaxed) {
                let spec = if round % 2 == 0 { "stress_tests=0" } else { "stress_tests=5" };
                logger.set_vmodule(spec).unwrap();
                logger.set_verbosity(round % 7);
                round += 1;
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for _ in 0..5_000 {
                    // Only the two installed specs are ever visible
                    let spec = logger.vmodule();
                    assert!(spec == "stress_tests=0" || spec == "stress_tests=5");
                    // A module rule always decides for this file, never the global level
                    assert!(!logger.should_log("stress_tests", 6));
                    vlog!(logger, 3, "maybe");
                }
            })
        })
        .collect();

    for reader in readers {
        reader.join().expect("Reader panicked");
    }
    done.store(true, Ordering::Relaxed);
    reconfigure.join().expect("Reconfigure thread panicked");

    assert_eq!(logger.metrics().write_failures(), 0);
}

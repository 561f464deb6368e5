//! Basic logger usage example
//!
//! Demonstrates the V-level, vmodule overrides, rate-limited statements and
//! output redirection.
//!
//! Run with: cargo run --example basic_usage

use rust_vlog_system::prelude::*;
use rust_vlog_system::{error, info, vlog, vlog_enabled, vlog_every, warning};
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust VLog System - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .verbosity(1)
        .colors(true)
        .build()?;

    println!("1. Severity levels are always on:");
    info!(logger, "This is an info message");
    warning!(logger, "This is a warning message");
    error!(logger, "This is an error message");

    println!("\n2. V-gated statements follow the global level (V=1):");
    vlog!(logger, 1, "V(1) message (visible)");
    vlog!(logger, 2, "V(2) message (hidden)");

    println!("\n3. vmodule overrides the global level for this file:");
    let previous = logger.set_vmodule("basic_usage=3")?;
    vlog!(logger, 3, "V(3) message (visible through vmodule)");
    if vlog_enabled!(logger, 4) {
        println!("   never printed: V(4) is above the module level");
    }
    logger.set_vmodule(&previous)?;

    println!("\n4. Malformed vmodule specs are rejected and change nothing:");
    if let Err(e) = logger.set_vmodule("basic_usage") {
        println!("   rejected: {}", e);
    }
    println!("   vmodule is still {:?}", logger.vmodule());

    println!("\n5. Rate-limited statement (burst 2, then one per second):");
    for i in 0..10 {
        vlog_every!(logger, 1, Limit::every(Duration::from_secs(1)), 2, "poll {}", i);
    }
    println!(
        "   interval {:?}, dropped {}",
        limit_to_duration(Limit::every(Duration::from_secs(1))),
        logger.metrics().rate_limited()
    );

    println!("\n6. Redirecting output:");
    let capture = SharedBuffer::new();
    let stderr = logger.set_output(Box::new(capture.clone()));
    info!(logger, "captured line");
    logger.set_output(stderr);
    print!("   captured: {}", capture.contents());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

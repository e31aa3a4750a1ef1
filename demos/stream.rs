// In demos/stream.rs
use dmxp_dispatch::Dispatch::{DispatcherBuilder, Message};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

const KIND_TICK: u32 = 1;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dmxp_dispatch::logging::init_logging();

    let dispatcher = DispatcherBuilder::from_env().build()?;
    let keep_alive = Arc::new(AtomicBool::new(true));
    let keep_alive_for_handler = Arc::clone(&keep_alive);

    // Handle Ctrl+C to stop producing and drain
    ctrlc::set_handler(move || {
        keep_alive_for_handler.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let completed = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&completed);
    dispatcher.register_callback(KIND_TICK, move |_message: &Message, _result: i32| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    println!("Stream: Submitting messages, press Ctrl+C to drain and exit...");
    let mut sent: u64 = 0;
    while keep_alive.load(Ordering::SeqCst) {
        for _ in 0..1000 {
            dispatcher.submit(Message::new(KIND_TICK))?;
            sent += 1;
        }
        println!(
            "Sent {} messages, {} completed",
            sent,
            completed.load(Ordering::Relaxed)
        );
        std::thread::sleep(Duration::from_millis(500));
    }

    println!("Stream: Draining...");
    dispatcher.exit();
    println!(
        "Stream: Sent {} messages, {} completed",
        sent,
        completed.load(Ordering::Relaxed)
    );
    Ok(())
}

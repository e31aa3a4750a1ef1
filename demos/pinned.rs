// In demos/pinned.rs
use dmxp_dispatch::Dispatch::{Dispatcher, Message, Task};
use std::sync::Arc;

const KIND_PINNED: u32 = 1;
const KIND_INLINE: u32 = 2;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dmxp_dispatch::logging::init_logging();

    let dispatcher = Dispatcher::builder()
        .with_workers(3)
        .with_dedicated_pool()
        .build()?;

    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen = Arc::clone(&order);
    dispatcher.register_callback(KIND_PINNED, move |_message: &Message, result: i32| {
        let worker = std::thread::current().name().unwrap_or("?").to_string();
        seen.lock().push((result, worker));
    });

    // Everything pinned to worker 1 runs there, in submission order.
    for step in 0..10 {
        dispatcher.submit(Message::with_body(KIND_PINNED, Task::new(move || step).pinned(1)))?;
    }

    let inline = dispatcher.submit(Message::with_body(KIND_INLINE, Task::new(|| 7).sync()))?;
    println!("Pinned: inline message returned {}", inline.code());

    dispatcher.exit();

    for (step, worker) in order.lock().iter() {
        println!("Pinned: step {step} ran on {worker}");
    }
    Ok(())
}

// In demos/demo.rs
use dmxp_dispatch::Dispatch::{Dispatcher, Message};
use dmxp_dispatch::Core::counters;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dmxp_dispatch::logging::init_logging();

    let args: Vec<String> = env::args().collect();
    let workers: usize = match args.get(1) {
        Some(arg) => arg.parse()?,
        None => 4,
    };

    let dispatcher = Dispatcher::new(workers)?;
    println!(
        "Demo: Dispatcher running on {} workers",
        dispatcher.pool().worker_count()
    );

    for kind in 1..100 {
        dispatcher.register_callback(kind, |message: &Message, result: i32| {
            println!("{}[on_test]ret={}", message.id(), result);
        });
    }

    let start = std::time::Instant::now();
    for kind in 1..100 {
        dispatcher.submit(Message::new(kind))?;
    }
    dispatcher.exit();

    println!("Demo: Drained in {:.2?}", start.elapsed());
    println!("{}", counters::created());
    println!("{}", counters::executed());
    Ok(())
}

use std::{sync::Arc, time::Duration};

use gc_scheduler::{GcScheduler, SchedulerConfig};

const MUTATORS: usize = 4;
const ITERATIONS: usize = 200_000;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let aggressive = std::env::args().any(|arg| arg == "--aggressive");
    let scheduler = Arc::new(GcScheduler::with_config(SchedulerConfig::for_mode(
        aggressive,
    )));

    let orchestrator = {
        let scheduler = scheduler.clone();
        std::thread::spawn(move || {
            while scheduler.collection_barrier().wait_for_request() {
                // stand-in for stopping the world and running the collector.
                std::thread::sleep(Duration::from_millis(1));
                scheduler.on_full_gc_completed();
                scheduler.collection_barrier().clear_request();
            }
        })
    };

    let mutators = (0..MUTATORS)
        .map(|i| {
            let scheduler = scheduler.clone();
            std::thread::spawn(move || {
                let mut data = scheduler.register_thread();
                for n in 0..ITERATIONS {
                    let size = 16 + (n * (i + 1)) % 512;
                    let mut request = data.on_safe_point_allocation(size);
                    request |= data.on_safe_point_regular(1);
                    if request {
                        scheduler.collection_barrier().request_gc();
                    }
                }
            })
        })
        .collect::<Vec<_>>();

    for mutator in mutators {
        if mutator.join().is_err() {
            log::error!("[gc] mutator thread panicked");
        }
    }
    scheduler.collection_barrier().notify_shutdown_requested();
    if orchestrator.join().is_err() {
        log::error!("[gc] orchestrator thread panicked");
    }

    println!("{}", scheduler.statistics());
}

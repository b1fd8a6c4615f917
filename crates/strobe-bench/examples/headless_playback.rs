//! Headless autoplay over a generated automaton.
//!
//! Demonstrates: generate input → trace → background fetch thread →
//! autoplay with stop-on-report → heat mode → report log.
//!
//! Pass a trace file path to play that instead of the generated input.
//! Log verbosity follows `RUST_LOG` (e.g. `RUST_LOG=strobe_engine=debug`).

use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

use strobe_bench::{build_graph, trace_source, Profile};
use strobe_engine::{
    Direction, DrawMode, FetchThread, PlaybackConfig, PlaybackController, PlaybackSession,
    TickEvent,
};
use strobe_trace::TraceSource;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let profile = Profile::small(42);
    let graph = build_graph(&profile)?;
    let source = match std::env::args().nth(1) {
        Some(path) => TraceSource::open(path)?,
        None => trace_source(&profile)?,
    };
    tracing::info!(nodes = profile.nodes, cycles = source.len(), "input ready");

    let config = PlaybackConfig {
        batch_size: 64,
        stop_on_report: true,
        ..PlaybackConfig::default()
    };
    let mut session = PlaybackSession::new(graph, FetchThread::spawn(source)?, config)?;
    session.prime()?;

    let mut controller = PlaybackController::new(session.config());
    controller.play(Instant::now(), Direction::Forward)?;

    println!("=== Strobe headless playback ===\n");
    let mut halts = 0;
    loop {
        match controller.tick(Instant::now(), &mut session) {
            TickEvent::Stepped(_) | TickEvent::NotDue => {}
            TickEvent::Waiting => thread::sleep(Duration::from_millis(1)),
            TickEvent::HaltedOnReport(cycle) => {
                halts += 1;
                println!("halted on report at cycle {cycle}");
                if halts == 3 {
                    println!("switching to heat mode and disabling report stops");
                    session.set_mode(DrawMode::Heat);
                    session.set_stop_on_report(false);
                }
                controller.play(Instant::now(), Direction::Forward)?;
            }
            TickEvent::EndOfInput(err) => {
                println!("end of input: {err}");
                break;
            }
            TickEvent::Idle => break,
        }
    }

    let m = session.metrics();
    println!(
        "\nsteps={} refills={}/{} misses={} last_apply={}us",
        m.steps_applied, m.refills_landed, m.refills_requested, m.cache_misses, m.last_apply_us
    );
    println!("\n--- report log ---");
    session.reports().write_to(std::io::stdout().lock())?;
    Ok(())
}

//! Shared helpers for the emission tests.

use person_events::{
    EmissionEngine, ReportStyle, RunConfig, ShutdownCoordinator, SignalSource, StatsReporter,
};
use person_generator::RecordFactory;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Cloneable writer that keeps everything written to it.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Engine with plain statistics captured in memory and no signal handlers.
pub fn quiet_engine<F: RecordFactory>(config: RunConfig, factory: F) -> (EmissionEngine<F>, Capture) {
    let capture = Capture::default();
    let reporter =
        StatsReporter::with_output(&config, ReportStyle::plain(), Box::new(capture.clone()));
    let engine = EmissionEngine::new(config, factory)
        .with_reporter(reporter)
        .with_shutdown(ShutdownCoordinator::new(SignalSource::Disabled));
    (engine, capture)
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("person_events=debug,event_sinks=debug")
        .with_test_writer()
        .try_init()
        .ok();
}

/// Route log output of the current thread into memory until the guard drops.
pub fn capture_logs() -> (tracing::subscriber::DefaultGuard, Capture) {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter("person_events=debug,event_sinks=debug")
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (tracing::subscriber::set_default(subscriber), capture)
}

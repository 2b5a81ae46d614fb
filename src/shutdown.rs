//! Run-scoped cancellation.
//!
//! A [`StopFlag`] is created per run and raised at most once. The
//! [`ShutdownCoordinator`] handles SIGINT/SIGTERM only while its
//! [`ShutdownGuard`] is alive. Uninstalling the last guard unregisters the
//! handlers and puts the default disposition back, so a signal after the
//! run terminates the process as it would have before the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Cooperative cancellation flag shared between the engine and its signal listener.
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    raised: Arc<AtomicBool>,
    token: CancellationToken,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Returns `true` only for the call that actually raised it.
    pub fn set(&self) -> bool {
        let first = !self.raised.swap(true, Ordering::SeqCst);
        self.token.cancel();
        first
    }

    pub fn is_set(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Resolve once the flag is raised.
    pub async fn wait(&self) {
        self.token.cancelled().await;
    }
}

/// Where stop requests come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalSource {
    /// Process signals (SIGINT and SIGTERM, or Ctrl-C off unix).
    #[default]
    Os,
    /// No signal handling; the flag is only raised programmatically.
    Disabled,
}

/// Installs run-scoped signal listeners that raise a [`StopFlag`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShutdownCoordinator {
    source: SignalSource,
}

impl ShutdownCoordinator {
    pub fn new(source: SignalSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> SignalSource {
        self.source
    }

    /// Start listening. Must be called from within a tokio runtime.
    pub fn install(&self, flag: StopFlag) -> ShutdownGuard {
        let listener = match self.source {
            SignalSource::Disabled => None,
            SignalSource::Os => match os::listen(flag) {
                Ok(listener) => Some(listener),
                Err(e) => {
                    warn!("Failed to install signal handlers: {}", e);
                    None
                }
            },
        };

        debug!(installed = listener.is_some(), "Shutdown coordinator installed");
        ShutdownGuard { listener }
    }
}

/// Keeps the signal handlers registered. Uninstalls on drop.
#[derive(Debug)]
pub struct ShutdownGuard {
    listener: Option<os::Listener>,
}

impl ShutdownGuard {
    /// Whether a listener is active for this guard.
    pub fn is_listening(&self) -> bool {
        self.listener.as_ref().is_some_and(|l| l.is_running())
    }

    /// Unregister the handlers and restore default signal handling.
    pub fn uninstall(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.remove();
            debug!("Shutdown coordinator uninstalled");
        }
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        self.stop();
    }
}

fn notify(flag: &StopFlag, signal: &str) {
    if flag.set() {
        info!("Received {}, stopping event generation...", signal);
    } else {
        debug!("Received {} again, already stopping", signal);
    }
}

#[cfg(unix)]
mod os {
    use super::{notify, StopFlag};
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::low_level::{self, pipe};
    use signal_hook::SigId;
    use std::io;
    use std::os::raw::c_int;
    use std::os::unix::net::UnixStream as StdUnixStream;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use tokio::net::UnixStream;
    use tokio::task::JoinHandle;
    use tracing::warn;

    const SIGNALS: [(c_int, &str); 2] = [(SIGINT, "SIGINT"), (SIGTERM, "SIGTERM")];

    /// Process-wide bookkeeping for the default-disposition fallback.
    ///
    /// signal-hook keeps its own handler installed after the last action is
    /// unregistered, so a conditional-default action is registered once and
    /// armed whenever no guard is active.
    struct DefaultFallback {
        active: usize,
        restore_default: Arc<AtomicBool>,
    }

    static FALLBACK: Mutex<Option<DefaultFallback>> = Mutex::new(None);

    fn acquire() -> io::Result<()> {
        let mut state = FALLBACK.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_none() {
            let restore_default = Arc::new(AtomicBool::new(false));
            for (signal, _) in SIGNALS {
                signal_hook::flag::register_conditional_default(signal, restore_default.clone())?;
            }
            *state = Some(DefaultFallback {
                active: 0,
                restore_default,
            });
        }
        if let Some(fallback) = state.as_mut() {
            fallback.active += 1;
            fallback.restore_default.store(false, Ordering::SeqCst);
        }
        Ok(())
    }

    fn release() {
        let mut state = FALLBACK.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(fallback) = state.as_mut() {
            fallback.active = fallback.active.saturating_sub(1);
            if fallback.active == 0 {
                fallback.restore_default.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Registered signal actions and the tasks draining their wake-up pipes.
    #[derive(Debug)]
    pub(super) struct Listener {
        ids: Vec<SigId>,
        tasks: Vec<JoinHandle<()>>,
    }

    impl Listener {
        pub(super) fn is_running(&self) -> bool {
            self.tasks.iter().any(|t| !t.is_finished())
        }

        pub(super) fn remove(self) {
            for id in self.ids {
                low_level::unregister(id);
            }
            for task in self.tasks {
                task.abort();
            }
            release();
        }
    }

    // The handler only writes a byte to a socket; the flag is raised from
    // the reading task, outside signal context.
    fn register_pipe(signal: c_int) -> io::Result<(SigId, UnixStream)> {
        let (reader, writer) = StdUnixStream::pair()?;
        reader.set_nonblocking(true)?;
        writer.set_nonblocking(true)?;
        let id = pipe::register(signal, writer)?;
        match UnixStream::from_std(reader) {
            Ok(reader) => Ok((id, reader)),
            Err(e) => {
                low_level::unregister(id);
                Err(e)
            }
        }
    }

    async fn watch(reader: UnixStream, flag: StopFlag, name: &'static str) {
        let mut buf = [0u8; 16];
        loop {
            if reader.readable().await.is_err() {
                break;
            }
            match reader.try_read(&mut buf) {
                Ok(0) => break,
                Ok(_) => notify(&flag, name),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => continue,
                Err(e) => {
                    warn!("Signal pipe for {} failed: {}", name, e);
                    break;
                }
            }
        }
    }

    pub(super) fn listen(flag: StopFlag) -> io::Result<Listener> {
        acquire()?;

        let mut listener = Listener {
            ids: Vec::new(),
            tasks: Vec::new(),
        };
        for (signal, name) in SIGNALS {
            match register_pipe(signal) {
                Ok((id, reader)) => {
                    listener.ids.push(id);
                    listener.tasks.push(tokio::spawn(watch(reader, flag.clone(), name)));
                }
                Err(e) => {
                    listener.remove();
                    return Err(e);
                }
            }
        }
        Ok(listener)
    }
}

#[cfg(not(unix))]
mod os {
    use super::{notify, StopFlag};
    use std::io;
    use tokio::task::JoinHandle;

    #[derive(Debug)]
    pub(super) struct Listener {
        task: JoinHandle<()>,
    }

    impl Listener {
        pub(super) fn is_running(&self) -> bool {
            !self.task.is_finished()
        }

        pub(super) fn remove(self) {
            self.task.abort();
        }
    }

    pub(super) fn listen(flag: StopFlag) -> io::Result<Listener> {
        let task = tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                notify(&flag, "Ctrl-C");
            }
        });
        Ok(Listener { task })
    }
}

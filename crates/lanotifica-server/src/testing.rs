//! In-memory doubles for the backend, icon resolver and discovery transport.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use lanotifica_core::{IconResolver, Presentation};

use crate::backend::{BackendError, NotificationBackend, NotificationId};
use crate::discovery::{DiscoveryTransport, Publication, ServiceRecord};
use crate::error::{ServerError, ServerResult};

/// Backend that records every call.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: AtomicU32,
    shown: Mutex<Vec<Presentation>>,
    closed: Mutex<Vec<NotificationId>>,
    fail_show: AtomicBool,
    fail_close: AtomicBool,
    show_delay: Mutex<Duration>,
    close_delay: Mutex<Duration>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_show(&self, fail: bool) {
        self.fail_show.store(fail, Ordering::SeqCst);
    }

    pub fn fail_close(&self, fail: bool) {
        self.fail_close.store(fail, Ordering::SeqCst);
    }

    /// Makes `show` block the calling thread for `delay`.
    pub fn delay_show(&self, delay: Duration) {
        *self.show_delay.lock() = delay;
    }

    /// Makes `close` block the calling thread for `delay`.
    pub fn delay_close(&self, delay: Duration) {
        *self.close_delay.lock() = delay;
    }

    pub fn shown(&self) -> Vec<Presentation> {
        self.shown.lock().clone()
    }

    pub fn closed(&self) -> Vec<NotificationId> {
        self.closed.lock().clone()
    }
}

impl NotificationBackend for RecordingBackend {
    fn show(&self, presentation: &Presentation) -> Result<NotificationId, BackendError> {
        std::thread::sleep(*self.show_delay.lock());
        if self.fail_show.load(Ordering::SeqCst) {
            return Err(BackendError::Show("no notification server".to_string()));
        }
        let id = NotificationId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.shown.lock().push(presentation.clone());
        Ok(id)
    }

    fn close(&self, id: NotificationId) -> Result<(), BackendError> {
        std::thread::sleep(*self.close_delay.lock());
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(BackendError::Close {
                id,
                message: "connection lost".to_string(),
            });
        }
        self.closed.lock().push(id);
        Ok(())
    }
}

/// Resolver that knows exactly one package.
pub struct StaticIcons {
    package: String,
    path: PathBuf,
}

impl StaticIcons {
    pub fn new(package: &str, path: &str) -> Self {
        Self {
            package: package.to_string(),
            path: PathBuf::from(path),
        }
    }
}

impl IconResolver for StaticIcons {
    fn resolve(&self, package: &str) -> Option<PathBuf> {
        (package == self.package).then(|| self.path.clone())
    }
}

/// Discovery transport that counts publications and withdrawals.
#[derive(Debug, Default)]
pub struct FakeTransport {
    pub published: Mutex<Vec<ServiceRecord>>,
    pub withdrawn: Arc<AtomicUsize>,
    pub fail_publish: AtomicBool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn withdrawn(&self) -> usize {
        self.withdrawn.load(Ordering::SeqCst)
    }
}

struct FakePublication {
    withdrawn: Arc<AtomicUsize>,
}

impl Publication for FakePublication {
    fn withdraw(self: Box<Self>) -> ServerResult<()> {
        self.withdrawn.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl DiscoveryTransport for FakeTransport {
    fn publish(&self, record: &ServiceRecord) -> ServerResult<Box<dyn Publication>> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(ServerError::discovery("multicast unavailable"));
        }
        self.published.lock().push(record.clone());
        Ok(Box::new(FakePublication {
            withdrawn: self.withdrawn.clone(),
        }))
    }
}

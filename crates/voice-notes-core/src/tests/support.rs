//! In-memory stand-ins for the audio and persistence collaborators.

use crate::{AudioBackend, CaptureHandle, CoreResult, KeyValueStore, NotesError, RecordingEntry};

use std::{
    collections::HashMap,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use error_location::ErrorLocation;

/// Key-value store backed by a shared map. Clones see the same data, which
/// models a restart against the same durable storage.
#[derive(Clone, Default)]
pub(crate) struct MemoryKeyValueStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryKeyValueStore {
    pub(crate) fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.set_raw(key, value);
        store
    }

    /// Overwrite a value behind the store's back.
    pub(crate) fn set_raw(&self, key: &str, value: &str) {
        self.inner
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn raw(&self, key: &str) -> Option<String> {
        self.inner.values.lock().unwrap().get(key).cloned()
    }

    pub(crate) fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: String) -> CoreResult<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(NotesError::PersistFailed {
                reason: "disk full".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        self.inner
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// Audio backend that records calls instead of touching devices.
#[derive(Clone)]
pub(crate) struct ScriptedAudioBackend {
    inner: Arc<ScriptedInner>,
}

struct ScriptedInner {
    grant_permission: AtomicBool,
    fail_begin: AtomicBool,
    fail_end: AtomicBool,
    permission_requests: AtomicUsize,
    captures_begun: AtomicUsize,
    active: Mutex<Option<CaptureHandle>>,
    played: Mutex<Vec<String>>,
}

impl Default for ScriptedAudioBackend {
    fn default() -> Self {
        Self {
            inner: Arc::new(ScriptedInner {
                grant_permission: AtomicBool::new(true),
                fail_begin: AtomicBool::new(false),
                fail_end: AtomicBool::new(false),
                permission_requests: AtomicUsize::new(0),
                captures_begun: AtomicUsize::new(0),
                active: Mutex::new(None),
                played: Mutex::new(Vec::new()),
            }),
        }
    }
}

impl ScriptedAudioBackend {
    pub(crate) fn deny_permission() -> Self {
        let backend = Self::default();
        backend.inner.grant_permission.store(false, Ordering::SeqCst);
        backend
    }

    pub(crate) fn grant_permission(&self, grant: bool) {
        self.inner.grant_permission.store(grant, Ordering::SeqCst);
    }

    pub(crate) fn fail_begin(&self, fail: bool) {
        self.inner.fail_begin.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_end(&self, fail: bool) {
        self.inner.fail_end.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn permission_requests(&self) -> usize {
        self.inner.permission_requests.load(Ordering::SeqCst)
    }

    pub(crate) fn captures_begun(&self) -> usize {
        self.inner.captures_begun.load(Ordering::SeqCst)
    }

    pub(crate) fn is_capturing(&self) -> bool {
        self.inner.active.lock().unwrap().is_some()
    }

    pub(crate) fn played(&self) -> Vec<String> {
        self.inner.played.lock().unwrap().clone()
    }
}

impl AudioBackend for ScriptedAudioBackend {
    async fn request_permission(&self) -> CoreResult<bool> {
        self.inner.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.inner.grant_permission.load(Ordering::SeqCst))
    }

    async fn begin_capture(&self) -> CoreResult<CaptureHandle> {
        if self.inner.fail_begin.load(Ordering::SeqCst) {
            return Err(NotesError::CaptureFailed {
                reason: "microphone busy".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut active = self.inner.active.lock().unwrap();
        assert!(active.is_none(), "second capture begun while one is active");

        let handle = CaptureHandle::new();
        *active = Some(handle);
        self.inner.captures_begun.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }

    async fn end_capture(&self, handle: CaptureHandle) -> CoreResult<String> {
        let active = self.inner.active.lock().unwrap().take();
        assert_eq!(active, Some(handle), "ended a capture that was not active");

        if self.inner.fail_end.load(Ordering::SeqCst) {
            return Err(NotesError::CaptureFailed {
                reason: "encoder crashed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(format!("file:///notes/{}.wav", handle.session_id()))
    }

    async fn play(&self, uri: &str) -> CoreResult<()> {
        self.inner.played.lock().unwrap().push(uri.to_string());
        Ok(())
    }
}

pub(crate) fn entry(id: &str, uri: &str, date: &str) -> RecordingEntry {
    RecordingEntry::new(id, uri, date)
}

// Shared test doubles for the capability traits and the store.
//
// Hand-rolled mocks: queued responses, call counters, and captured inputs
// are all that the pipeline tests need.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use voxnotes::error::{Error, Result};
use voxnotes::store::{
    Chunk, NewChunk, NewNote, NewSession, Note, Session, SessionPatch, SessionStore,
};
use voxnotes::{Completer, Transcriber};

/// Transcriber double. Pops queued responses in order, falling back to the
/// last one; counts every call.
pub struct MockTranscriber {
    queue: Mutex<VecDeque<String>>,
    fallback: String,
    fail: bool,
    calls: AtomicUsize,
}

impl MockTranscriber {
    /// Always returns the same text.
    pub fn fixed(text: &str) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: text.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the given texts in order, then repeats the last one.
    pub fn sequence(texts: &[&str]) -> Self {
        let queue: VecDeque<String> = texts.iter().map(|t| t.to_string()).collect();
        let fallback = texts.last().map(|t| t.to_string()).unwrap_or_default();
        Self {
            queue: Mutex::new(queue),
            fallback,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call errors.
    pub fn failing() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &[u8], _filename: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::TranscriptionFailed("mock failure".to_string()));
        }
        let mut queue = self.queue.lock().unwrap();
        Ok(queue.pop_front().unwrap_or_else(|| self.fallback.clone()))
    }
}

/// A captured completion request.
#[derive(Debug, Clone)]
pub struct CompletionCall {
    pub system: String,
    pub user: String,
    pub json_mode: bool,
}

/// Completer double. Pops queued responses in order, falling back to the
/// last one; captures every request.
pub struct MockCompleter {
    queue: Mutex<VecDeque<String>>,
    fallback: String,
    fail: bool,
    calls: AtomicUsize,
    captured: Mutex<Vec<CompletionCall>>,
}

impl MockCompleter {
    pub fn fixed(response: &str) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: response.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
            captured: Mutex::new(Vec::new()),
        }
    }

    pub fn sequence(responses: &[&str]) -> Self {
        let queue: VecDeque<String> = responses.iter().map(|r| r.to_string()).collect();
        let fallback = responses.last().map(|r| r.to_string()).unwrap_or_default();
        Self {
            queue: Mutex::new(queue),
            fallback,
            fail: false,
            calls: AtomicUsize::new(0),
            captured: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
            captured: Mutex::new(Vec::new()),
        }
    }

    /// A well-formed notes response for the happy path.
    pub fn notes_json() -> &'static str {
        r#"{"notes": ["Point one", "Point two"], "rollingSummary": "Summary so far"}"#
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<CompletionCall> {
        self.captured.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<CompletionCall> {
        self.captured.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl Completer for MockCompleter {
    async fn complete(&self, system: &str, user: &str, json_mode: bool) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.captured.lock().unwrap().push(CompletionCall {
            system: system.to_string(),
            user: user.to_string(),
            json_mode,
        });
        if self.fail {
            return Err(Error::SummarizationFailed("mock failure".to_string()));
        }
        let mut queue = self.queue.lock().unwrap();
        Ok(queue.pop_front().unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Store wrapper whose note reads start failing after a set number of
/// successes. Used to verify the live feed closes on store errors.
pub struct FlakyStore<S> {
    inner: S,
    note_reads_before_failure: AtomicUsize,
}

impl<S> FlakyStore<S> {
    pub fn new(inner: S, note_reads_before_failure: usize) -> Self {
        Self {
            inner,
            note_reads_before_failure: AtomicUsize::new(note_reads_before_failure),
        }
    }
}

#[async_trait::async_trait]
impl<S: SessionStore> SessionStore for FlakyStore<S> {
    async fn create_session(&self, new: NewSession) -> Result<Session> {
        self.inner.create_session(new).await
    }

    async fn session(&self, id: &str) -> Result<Option<Session>> {
        self.inner.session(id).await
    }

    async fn sessions_for_owner(&self, owner_id: &str) -> Result<Vec<Session>> {
        self.inner.sessions_for_owner(owner_id).await
    }

    async fn update_session(&self, id: &str, patch: SessionPatch) -> Result<Session> {
        self.inner.update_session(id, patch).await
    }

    async fn create_chunk(&self, new: NewChunk) -> Result<Chunk> {
        self.inner.create_chunk(new).await
    }

    async fn create_note(&self, new: NewNote) -> Result<Note> {
        self.inner.create_note(new).await
    }

    async fn chunks_for_session(&self, session_id: &str) -> Result<Vec<Chunk>> {
        self.inner.chunks_for_session(session_id).await
    }

    async fn notes_for_session(&self, session_id: &str) -> Result<Vec<Note>> {
        let remaining = self.note_reads_before_failure.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err(Error::Store("simulated read failure".to_string()));
        }
        self.note_reads_before_failure
            .store(remaining - 1, Ordering::SeqCst);
        self.inner.notes_for_session(session_id).await
    }
}

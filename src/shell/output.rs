//! Output Sinks
//!
//! Handlers never print directly. They emit lines through [`Output`], which
//! forwards to the visible view unless a capture is active. Captures form a
//! stack: each pipeline stage or redirect pushes one through a guard, and the
//! guard pops it again when it goes out of scope, whatever the outcome.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

use super::error::ShellError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

/// The visible line-output view.
pub trait OutputSink: Send {
    fn emit(&mut self, stream: Stream, line: &str);

    /// The prompt text changed (for example after `cd`).
    fn prompt_changed(&mut self, _prompt: &str) {}

    /// Erase what the view shows.
    fn clear(&mut self) {}
}

/// View that writes to the process's stdout and stderr.
#[derive(Debug, Default)]
pub struct ConsoleView;

impl OutputSink for ConsoleView {
    fn emit(&mut self, stream: Stream, line: &str) {
        match stream {
            Stream::Out => println!("{}", line),
            Stream::Err => eprintln!("{}", line),
        }
    }

    fn clear(&mut self) {
        print!("\x1b[2J\x1b[H");
    }
}

#[derive(Debug, Default)]
struct TranscriptInner {
    lines: Vec<(Stream, String)>,
    prompts: Vec<String>,
    clears: usize,
}

/// Recording view. Clones share the same record, so one handle can be given
/// to the shell and another kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    inner: Arc<Mutex<TranscriptInner>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect(&self, stream: Stream) -> String {
        let Ok(inner) = self.inner.lock() else {
            return String::new();
        };
        inner
            .lines
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| format!("{}\n", line))
            .collect()
    }

    /// Everything emitted to standard output, one line per `\n`.
    pub fn stdout(&self) -> String {
        self.collect(Stream::Out)
    }

    pub fn stderr(&self) -> String {
        self.collect(Stream::Err)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.prompts.clone())
            .unwrap_or_default()
    }

    pub fn clears(&self) -> usize {
        self.inner.lock().map(|inner| inner.clears).unwrap_or(0)
    }

    /// Forget everything recorded so far.
    pub fn reset(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            *inner = TranscriptInner::default();
        }
    }
}

impl OutputSink for Transcript {
    fn emit(&mut self, stream: Stream, line: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.lines.push((stream, line.to_string()));
        }
    }

    fn prompt_changed(&mut self, prompt: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.prompts.push(prompt.to_string());
        }
    }

    fn clear(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.clears += 1;
        }
    }
}

/// Bounded in-memory buffer standing in for the view.
#[derive(Debug)]
struct Capture {
    buf: String,
    limit: usize,
}

impl Capture {
    fn push_line(&mut self, line: &str) -> Result<(), ShellError> {
        if self.buf.len() + line.len() + 1 > self.limit {
            return Err(ShellError::CapacityExceeded { limit: self.limit });
        }
        self.buf.push_str(line);
        self.buf.push('\n');
        Ok(())
    }

    fn push_str(&mut self, text: &str) -> Result<(), ShellError> {
        if self.buf.len() + text.len() > self.limit {
            return Err(ShellError::CapacityExceeded { limit: self.limit });
        }
        self.buf.push_str(text);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureKind {
    Out,
    Err,
}

/// The shell's single emit primitive plus its capture stacks.
pub struct Output {
    view: Box<dyn OutputSink>,
    out_captures: Vec<Capture>,
    err_captures: Vec<Capture>,
}

impl Output {
    pub fn new(view: Box<dyn OutputSink>) -> Self {
        Self {
            view,
            out_captures: Vec::new(),
            err_captures: Vec::new(),
        }
    }

    /// Emit one line of normal output.
    pub fn line(&mut self, line: &str) -> Result<(), ShellError> {
        match self.out_captures.last_mut() {
            Some(capture) => capture.push_line(line),
            None => {
                self.view.emit(Stream::Out, line);
                Ok(())
            }
        }
    }

    /// Emit a block of text line by line. A trailing newline does not
    /// produce an extra empty line.
    pub fn text(&mut self, text: &str) -> Result<(), ShellError> {
        let body = text.strip_suffix('\n').unwrap_or(text);
        if body.is_empty() && text.is_empty() {
            return Ok(());
        }
        for line in body.split('\n') {
            self.line(line)?;
        }
        Ok(())
    }

    /// Emit text without a line terminator. The view is line-based and still
    /// shows it as a line; a capture keeps the bytes as given.
    pub fn fragment(&mut self, text: &str) -> Result<(), ShellError> {
        match self.out_captures.last_mut() {
            Some(capture) => capture.push_str(text),
            None if text.is_empty() => Ok(()),
            None => {
                self.view.emit(Stream::Out, text);
                Ok(())
            }
        }
    }

    /// Emit one line to the active error sink.
    pub fn error_line(&mut self, line: &str) -> Result<(), ShellError> {
        match self.err_captures.last_mut() {
            Some(capture) => capture.push_line(line),
            None => {
                self.view.emit(Stream::Err, line);
                Ok(())
            }
        }
    }

    /// Bypass every capture and write straight to the view.
    pub fn view_error(&mut self, line: &str) {
        self.view.emit(Stream::Err, line);
    }

    pub fn prompt_changed(&mut self, prompt: &str) {
        self.view.prompt_changed(prompt);
    }

    /// Clear the view; a no-op while output is captured.
    pub fn clear(&mut self) {
        if self.out_captures.is_empty() {
            self.view.clear();
        }
    }

    pub fn is_capturing(&self) -> bool {
        !self.out_captures.is_empty()
    }

    /// Divert normal output into a buffer of at most `limit` bytes until the
    /// returned guard is finished or dropped.
    pub fn capture(&mut self, limit: usize) -> CaptureGuard<'_> {
        self.push(CaptureKind::Out, limit)
    }

    /// Divert error output into a buffer of at most `limit` bytes.
    pub fn capture_errors(&mut self, limit: usize) -> CaptureGuard<'_> {
        self.push(CaptureKind::Err, limit)
    }

    fn stack(&mut self, kind: CaptureKind) -> &mut Vec<Capture> {
        match kind {
            CaptureKind::Out => &mut self.out_captures,
            CaptureKind::Err => &mut self.err_captures,
        }
    }

    fn push(&mut self, kind: CaptureKind, limit: usize) -> CaptureGuard<'_> {
        let stack = self.stack(kind);
        let depth = stack.len();
        stack.push(Capture {
            buf: String::new(),
            limit,
        });
        CaptureGuard {
            output: self,
            kind,
            depth,
        }
    }
}

/// Active capture. Dereferences to [`Output`] so it can be handed to code
/// that emits; dropping it restores the previous sink.
pub struct CaptureGuard<'a> {
    output: &'a mut Output,
    kind: CaptureKind,
    depth: usize,
}

impl CaptureGuard<'_> {
    /// Stop capturing and return what was captured.
    pub fn finish(mut self) -> String {
        let kind = self.kind;
        let depth = self.depth;
        self.output
            .stack(kind)
            .get_mut(depth)
            .map(|capture| std::mem::take(&mut capture.buf))
            .unwrap_or_default()
    }
}

impl Deref for CaptureGuard<'_> {
    type Target = Output;

    fn deref(&self) -> &Output {
        self.output
    }
}

impl DerefMut for CaptureGuard<'_> {
    fn deref_mut(&mut self) -> &mut Output {
        self.output
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        let (kind, depth) = (self.kind, self.depth);
        self.output.stack(kind).truncate(depth);
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Stand-ins for the terminal, the keyboard and the process, so that complete prompts
//! can be driven from tests without a TTY.

use std::{collections::VecDeque,
          io::{self, Read, Result, Write},
          sync::{atomic::{AtomicBool, AtomicUsize, Ordering},
                 Arc,
                 Mutex as StdMutex,
                 MutexGuard,
                 PoisonError}};

use strip_ansi_escapes::strip;

use crate::{InterruptForwarder, KeyPress, KeyPressReader, Size, TerminalCapability};

/// You can safely clone this struct, since it only contains an `Arc<StdMutex<Vec<u8>>>`.
/// The inner `buffer` will not be cloned, just the [Arc] will be cloned.
#[derive(Debug, Clone, Default)]
pub struct StdoutMock {
    pub buffer: Arc<StdMutex<Vec<u8>>>,
}

impl StdoutMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn get_copy_of_buffer(&self) -> Vec<u8> { self.lock().clone() }

    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    #[must_use]
    pub fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        let buffer_data = strip(self.lock().as_slice());
        String::from_utf8_lossy(&buffer_data).into_owned()
    }

    /// Forget everything written so far, so a test can look at one redraw at a time.
    pub fn clear(&self) { self.lock().clear(); }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}

/// Plays back a fixed sequence of keys, then fails with
/// [`io::ErrorKind::UnexpectedEof`] like a closed stdin would.
#[derive(Debug, Default)]
pub struct TestVecKeyPressReader {
    pub key_press_vec: Vec<KeyPress>,
    pub index: usize,
}

impl TestVecKeyPressReader {
    #[must_use]
    pub fn new(key_press_vec: Vec<KeyPress>) -> Self {
        Self {
            key_press_vec,
            index: 0,
        }
    }

    /// Keys that haven't been read yet.
    #[must_use]
    pub fn remaining(&self) -> usize { self.key_press_vec.len().saturating_sub(self.index) }
}

impl KeyPressReader for TestVecKeyPressReader {
    fn read_key_press(&mut self) -> Result<KeyPress> {
        let key_press = self.key_press_vec.get(self.index).copied().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted key presses")
        })?;
        self.index += 1;
        Ok(key_press)
    }
}

/// Each call to `read` returns exactly one scripted chunk, which is how bytes arrive
/// from a terminal. Reports end of stream once the chunks run out.
#[derive(Debug, Default)]
pub struct ChunkedReader {
    chunks: VecDeque<Vec<u8>>,
    is_failing: bool,
}

impl ChunkedReader {
    #[must_use]
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into(),
            is_failing: false,
        }
    }

    #[must_use]
    pub fn from_strs(chunks: &[&str]) -> Self {
        Self::new(chunks.iter().map(|it| it.as_bytes().to_vec()).collect())
    }

    /// Every read fails with [`io::ErrorKind::BrokenPipe`].
    #[must_use]
    pub fn failing() -> Self {
        Self {
            chunks: VecDeque::new(),
            is_failing: true,
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.is_failing {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin went away"));
        }
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        let count = chunk.len().min(buf.len());
        buf[..count].copy_from_slice(&chunk[..count]);
        if count < chunk.len() {
            self.chunks.push_front(chunk.split_off(count));
        }
        Ok(count)
    }
}

/// Records what a prompt did to the terminal modes.
#[derive(Debug)]
pub struct TerminalMock {
    size: Option<Size>,
    is_raw: AtomicBool,
    enable_count: AtomicUsize,
    disable_count: AtomicUsize,
}

impl Default for TerminalMock {
    fn default() -> Self { Self::with_size(Size::default()) }
}

impl TerminalMock {
    #[must_use]
    pub fn with_size(size: Size) -> Self {
        Self {
            size: Some(size),
            is_raw: AtomicBool::new(false),
            enable_count: AtomicUsize::new(0),
            disable_count: AtomicUsize::new(0),
        }
    }

    /// The size query always fails.
    #[must_use]
    pub fn failing_size() -> Self {
        Self {
            size: None,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_raw(&self) -> bool { self.is_raw.load(Ordering::SeqCst) }

    #[must_use]
    pub fn enable_count(&self) -> usize { self.enable_count.load(Ordering::SeqCst) }

    #[must_use]
    pub fn disable_count(&self) -> usize { self.disable_count.load(Ordering::SeqCst) }
}

impl TerminalCapability for TerminalMock {
    fn enable_raw_mode(&self) -> Result<()> {
        self.is_raw.store(true, Ordering::SeqCst);
        self.enable_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn disable_raw_mode(&self) -> Result<()> {
        self.is_raw.store(false, Ordering::SeqCst);
        self.disable_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn size(&self) -> Result<Size> {
        self.size
            .ok_or_else(|| io::Error::other("terminal size is not available"))
    }
}

/// Counts interrupts instead of raising `SIGINT`. Clones share the count.
#[derive(Debug, Clone, Default)]
pub struct InterruptForwarderMock {
    count: Arc<AtomicUsize>,
}

impl InterruptForwarderMock {
    #[must_use]
    pub fn count(&self) -> usize { self.count.load(Ordering::SeqCst) }
}

impl InterruptForwarder for InterruptForwarderMock {
    fn forward_interrupt(&self) -> Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[must_use]
pub fn contains_ansi_escape_sequence(text: &str) -> bool {
    text.chars().any(|it| it == '\x1b')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_is_ansi_escape_sequence() {
        assert!(contains_ansi_escape_sequence(
            "\x1b[31mThis is red text.\x1b[0m And this is normal text."
        ));
        assert!(!contains_ansi_escape_sequence("This is normal text."));
    }

    #[test]
    fn test_stdout_mock_strip_ansi() {
        let mut stdout_mock = StdoutMock::default();
        let stdout_mock_clone = stdout_mock.clone(); // Points to the same inner value as `stdout_mock`.

        let normal_text = "hello world";
        let red_text = format!("\x1b[31m{normal_text}\x1b[0m"); // Resets color after.

        stdout_mock.write_all(red_text.as_bytes()).unwrap();
        stdout_mock.flush().unwrap();

        assert_eq!(stdout_mock_clone.get_copy_of_buffer_as_string_strip_ansi(), normal_text);
        assert_eq!(stdout_mock_clone.get_copy_of_buffer_as_string(), red_text);

        stdout_mock_clone.clear();
        assert_eq!(stdout_mock.get_copy_of_buffer(), Vec::<u8>::new());
    }

    #[test]
    fn test_key_press_reader_runs_dry() {
        let mut reader = TestVecKeyPressReader::new(vec![KeyPress::Up, KeyPress::Enter]);
        assert_eq!(reader.read_key_press().unwrap(), KeyPress::Up);
        assert_eq!(reader.read_key_press().unwrap(), KeyPress::Enter);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(
            reader.read_key_press().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_chunked_reader_returns_one_chunk_per_read() {
        let mut reader = ChunkedReader::from_strs(&["ab", "c"]);
        let mut buf = [0_u8; 8];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(reader.read(&mut buf).unwrap(), 1);
        assert_eq!(&buf[..1], b"c");
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Turns the raw stdin byte stream into [`KeyPress`]es.
//!
//! In raw mode the terminal sends a key either as a single code point, or as an
//! escape sequence that starts with `ESC` (`0x1B`):
//!
//! ```text
//! ESC                 -> Esc (nothing else buffered)
//! ESC [ A|B|C|D       -> Up, Down, Right, Left
//! ESC [ H|F           -> Home, End
//! ESC [ Z             -> BackTab (Shift+Tab)
//! ESC [ 1|7 ~         -> Home
//! ESC [ 3 ~           -> Delete
//! ESC [ 4|8 ~         -> End
//! ESC [ 5|6 ~         -> PageUp, PageDown
//! ESC O H|F|A|B|C|D   -> SS3 variants of the above
//! ```
//!
//! A lone `ESC` and the first byte of a sequence look the same. The terminal writes a
//! whole sequence at once, so its bytes arrive in the same `read()`. When nothing else is
//! buffered after `ESC` (or after a partial sequence), the decoder resolves what it has
//! instead of blocking for more input.

use std::{collections::VecDeque,
          io::{self, Read}};

#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub enum KeyPress {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
    Backspace,
    Tab,
    BackTab,
    Enter,
    Esc,
    /// `Ctrl+C`.
    Interrupt,
    /// `Ctrl+D` or `Ctrl+Z`.
    EndOfInput,
    /// Unrecognized function and meta keys.
    #[default]
    Noop,
}

pub trait KeyPressReader {
    /// # Errors
    ///
    /// Returns the underlying read error. The end of the input stream is reported as
    /// [`io::ErrorKind::UnexpectedEof`].
    fn read_key_press(&mut self) -> io::Result<KeyPress>;
}

impl<T: KeyPressReader + ?Sized> KeyPressReader for &mut T {
    fn read_key_press(&mut self) -> io::Result<KeyPress> { (**self).read_key_press() }
}

/// A blocking stream of code points that can tell whether more are already buffered.
pub trait CodePointSource {
    /// Blocks until a code point is available. Returns `Ok(None)` at the end of the
    /// stream.
    ///
    /// # Errors
    ///
    /// Returns the underlying read error.
    fn next_code_point(&mut self) -> io::Result<Option<char>>;

    /// Whether [`CodePointSource::next_code_point`] can return without blocking.
    fn has_buffered_input(&self) -> bool;
}

const READ_BUFFER_SIZE: usize = 1024;

/// Decodes UTF-8 incrementally from any [`Read`]. Each `read()` is decoded in full, and
/// the decoded code points are what [`CodePointSource::has_buffered_input`] reports on.
/// A multi-byte character split across two reads is completed by the next read. Invalid
/// bytes become `U+FFFD`.
#[derive(Debug)]
pub struct ReaderCodePointSource<R: Read> {
    reader: R,
    pending_bytes: Vec<u8>,
    decoded: VecDeque<char>,
    is_eof: bool,
}

impl<R: Read> ReaderCodePointSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending_bytes: Vec::new(),
            decoded: VecDeque::new(),
            is_eof: false,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let mut buffer = [0_u8; READ_BUFFER_SIZE];
        while self.decoded.is_empty() && !self.is_eof {
            let count = match self.reader.read(&mut buffer) {
                Ok(count) => count,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };
            if count == 0 {
                self.is_eof = true;
                // A truncated multi-byte character at the end of the stream.
                if !self.pending_bytes.is_empty() {
                    self.pending_bytes.clear();
                    self.decoded.push_back(char::REPLACEMENT_CHARACTER);
                }
                break;
            }
            self.pending_bytes.extend_from_slice(&buffer[..count]);
            self.decode_pending();
        }
        Ok(())
    }

    fn decode_pending(&mut self) {
        loop {
            match std::str::from_utf8(&self.pending_bytes) {
                Ok(text) => {
                    self.decoded.extend(text.chars());
                    self.pending_bytes.clear();
                    return;
                }
                Err(error) => {
                    let valid_up_to = error.valid_up_to();
                    let (valid, rest) = self.pending_bytes.split_at(valid_up_to);
                    // The prefix up to `valid_up_to` is valid UTF-8.
                    self.decoded
                        .extend(String::from_utf8_lossy(valid).chars());
                    match error.error_len() {
                        Some(invalid_len) => {
                            self.decoded.push_back(char::REPLACEMENT_CHARACTER);
                            self.pending_bytes = rest[invalid_len..].to_vec();
                        }
                        None => {
                            // Incomplete character, wait for the next read.
                            self.pending_bytes = rest.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }
}

impl<R: Read> CodePointSource for ReaderCodePointSource<R> {
    fn next_code_point(&mut self) -> io::Result<Option<char>> {
        if self.decoded.is_empty() {
            self.fill()?;
        }
        Ok(self.decoded.pop_front())
    }

    fn has_buffered_input(&self) -> bool { !self.decoded.is_empty() }
}

/// Reads one logical key per call from a [`CodePointSource`].
#[derive(Debug)]
pub struct KeyDecoder<S: CodePointSource> {
    source: S,
}

pub type StdinKeyDecoder = KeyDecoder<ReaderCodePointSource<io::Stdin>>;

impl StdinKeyDecoder {
    #[must_use]
    pub fn new_stdin() -> Self { KeyDecoder::new(ReaderCodePointSource::new(io::stdin())) }
}

impl<S: CodePointSource> KeyDecoder<S> {
    pub fn new(source: S) -> Self { Self { source } }

    fn next_or_eof(&mut self) -> io::Result<char> {
        self.source.next_code_point()?.ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "end of input stream")
        })
    }

    /// Reads the code point that continues a sequence, or `None` if nothing is buffered.
    fn next_buffered(&mut self) -> io::Result<Option<char>> {
        if self.source.has_buffered_input() {
            self.source.next_code_point()
        } else {
            Ok(None)
        }
    }

    fn decode_escape(&mut self) -> io::Result<KeyPress> {
        let Some(code_point) = self.next_buffered()? else {
            return Ok(KeyPress::Esc);
        };
        if let Some(key) = decode_unconditional(code_point) {
            return Ok(key);
        }
        match code_point {
            '[' => self.decode_csi(),
            'O' => self.decode_ss3(),
            // Alt / meta chord.
            _ => Ok(KeyPress::Noop),
        }
    }

    fn decode_csi(&mut self) -> io::Result<KeyPress> {
        let mut params = String::new();
        loop {
            let Some(code_point) = self.next_buffered()? else {
                return Ok(resolve_incomplete_csi(&params));
            };
            if let Some(key) = decode_unconditional(code_point) {
                return Ok(key);
            }
            match code_point {
                '0'..='9' | ';' => params.push(code_point),
                final_char => return Ok(resolve_csi(&params, final_char)),
            }
        }
    }

    fn decode_ss3(&mut self) -> io::Result<KeyPress> {
        let Some(code_point) = self.next_buffered()? else {
            return Ok(KeyPress::Noop);
        };
        Ok(decode_unconditional(code_point).unwrap_or(match code_point {
            'A' => KeyPress::Up,
            'B' => KeyPress::Down,
            'C' => KeyPress::Right,
            'D' => KeyPress::Left,
            'H' => KeyPress::Home,
            'F' => KeyPress::End,
            _ => KeyPress::Noop,
        }))
    }
}

impl<S: CodePointSource> KeyPressReader for KeyDecoder<S> {
    fn read_key_press(&mut self) -> io::Result<KeyPress> {
        let code_point = self.next_or_eof()?;
        let key = match code_point {
            '\x1b' => self.decode_escape()?,
            '\t' => KeyPress::Tab,
            '\x7f' | '\x08' => KeyPress::Backspace,
            // Emacs bindings.
            '\x01' => KeyPress::Home,
            '\x05' => KeyPress::End,
            other => decode_unconditional(other).unwrap_or(if other.is_control() {
                KeyPress::Noop
            } else {
                KeyPress::Char(other)
            }),
        };
        tracing::trace!(message = "key decoded", ?key);
        Ok(key)
    }
}

/// Interrupt, Enter and end-of-input are recognized anywhere, even in the middle of an
/// escape sequence.
fn decode_unconditional(code_point: char) -> Option<KeyPress> {
    match code_point {
        '\x03' => Some(KeyPress::Interrupt),
        // Ctrl+D, and Ctrl+Z which ends input on Windows consoles.
        '\x04' | '\x1a' => Some(KeyPress::EndOfInput),
        '\r' | '\n' => Some(KeyPress::Enter),
        _ => None,
    }
}

fn resolve_csi(params: &str, final_char: char) -> KeyPress {
    match (params, final_char) {
        ("" | "1", 'A') => KeyPress::Up,
        ("" | "1", 'B') => KeyPress::Down,
        ("" | "1", 'C') => KeyPress::Right,
        ("" | "1", 'D') => KeyPress::Left,
        ("" | "1", 'H') => KeyPress::Home,
        ("" | "1", 'F') => KeyPress::End,
        ("", 'Z') => KeyPress::BackTab,
        (digits, '~') => resolve_tilde_param(digits),
        // Modifier parameters and unknown finals.
        _ => KeyPress::Noop,
    }
}

fn resolve_tilde_param(digits: &str) -> KeyPress {
    match digits {
        "1" | "7" => KeyPress::Home,
        "3" => KeyPress::Delete,
        "4" | "8" => KeyPress::End,
        "5" => KeyPress::PageUp,
        "6" => KeyPress::PageDown,
        _ => KeyPress::Noop,
    }
}

/// `ESC [` alone is treated as `Esc`, `ESC [ 3` as the key `3` names.
fn resolve_incomplete_csi(params: &str) -> KeyPress {
    if params.is_empty() {
        KeyPress::Esc
    } else {
        resolve_tilde_param(params)
    }
}

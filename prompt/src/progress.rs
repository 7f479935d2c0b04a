// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Progress bars drawn on rows that were scrolled into view beneath the cursor.
//!
//! Every bar owns one row. The cursor always rests on the line below the last
//! allocated row, so updating a bar means moving up to its row, rewriting it, and
//! moving back down. Several bars can share one [`TerminalRows`] behind a single
//! lock (see [`MultiProgress`]); the lock is held for exactly one row write.
//!
//! ```text
//! dl-a [#######-----]   1.2 MB,   300.0 kB/s,  58%
//! dl-b [##----------] 200.0 kB,    50.0 kB/s,  17%
//! ▌                        <- cursor rests here
//! ```
//!
//! While a bar is active an interrupt watcher thread listens for `SIGINT`. When one
//! arrives it stops the bar, shows the cursor again, and re-raises the signal with
//! its default action.

use std::{fmt::{Debug, Formatter},
          io::{self, Read, Stdout, Write},
          sync::{atomic::{AtomicBool, Ordering},
                 Arc,
                 Mutex as StdMutex,
                 MutexGuard,
                 PoisonError},
          time::Instant};

use crossterm::{cursor::{Hide, MoveToColumn, Show},
                queue,
                style::Print,
                terminal::{Clear, ClearType}};

use crate::{queue_move_rows_down,
            queue_move_rows_up,
            CrosstermTerminal,
            TerminalCapability};

/// Fills `width` columns with a bar for `fraction`, which is in `0.0..=1.0` or NaN
/// when the amount of work is unknown.
pub type ProgressStyle = fn(usize, f64) -> String;

/// `[######------]`. NaN draws an empty frame.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn default_progress_style(width: usize, fraction: f64) -> String {
    if width < 3 {
        return " ".repeat(width);
    }
    let inner = width - 2;
    if fraction.is_nan() {
        return format!("[{}]", " ".repeat(inner));
    }
    let filled = (fraction.clamp(0.0, 1.0) * inner as f64 + 0.5) as usize;
    let filled = filled.min(inner);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(inner - filled))
}

/// Lays out `prefix`, bar and `suffix` across `width` columns. When the prefix and
/// suffix don't leave room for a bar, only the prefix is shown, clipped to `width`.
#[must_use]
pub fn render_progress_line(
    prefix: &str,
    suffix: &str,
    width: usize,
    style: ProgressStyle,
    fraction: f64,
) -> String {
    let prefix_len = prefix.chars().count();
    let suffix_len = suffix.chars().count();
    if prefix_len + suffix_len < width {
        let bar = style(width - prefix_len - suffix_len, fraction);
        format!("{prefix}{bar}{suffix}")
    } else {
        prefix.chars().take(width).collect()
    }
}

/// Formats a byte count with a decimal unit: `0.0 B`, `512.0 B`, `1.5 kB`, `2.3 MB`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(count: u64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (1_000_000_000, "GB"),
        (1_000_000, "MB"),
        (1_000, "kB"),
        (1, "B"),
    ];
    UNITS
        .iter()
        .find(|(factor, _)| count >= *factor)
        .map_or_else(
            || "0.0 B".to_string(),
            |(factor, unit)| format!("{:.1} {unit}", count as f64 / *factor as f64),
        )
}

/// The rows that progress bars draw on.
pub struct TerminalRows<W: Write> {
    output: W,
    terminal: Arc<dyn TerminalCapability>,
    row_count: usize,
}

impl<W: Write> Debug for TerminalRows<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalRows")
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

pub type SharedTerminalRows<W> = Arc<StdMutex<TerminalRows<W>>>;

impl<W: Write> TerminalRows<W> {
    pub fn new(output: W, terminal: Arc<dyn TerminalCapability>) -> Self {
        Self {
            output,
            terminal,
            row_count: 0,
        }
    }

    pub fn new_shared(output: W, terminal: Arc<dyn TerminalCapability>) -> SharedTerminalRows<W> {
        Arc::new(StdMutex::new(Self::new(output, terminal)))
    }

    #[must_use]
    pub fn row_count(&self) -> usize { self.row_count }

    #[must_use]
    pub fn width(&self) -> usize { self.terminal.size_or_default().col_count }

    #[must_use]
    pub fn get_output(&self) -> &W { &self.output }

    /// Scrolls a fresh row into view and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn allocate_row(&mut self) -> io::Result<usize> {
        queue!(self.output, Print("\n"))?;
        self.output.flush()?;
        let row = self.row_count;
        self.row_count += 1;
        Ok(row)
    }

    /// Replaces the contents of `row` and returns the cursor to its resting place.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn write_row(&mut self, row: usize, line: &str) -> io::Result<()> {
        let rows_up = self.row_count.saturating_sub(row);
        queue!(self.output, MoveToColumn(0))?;
        queue_move_rows_up(&mut self.output, rows_up)?;
        queue!(
            self.output,
            Print(line),
            Clear(ClearType::UntilNewLine),
        )?;
        queue_move_rows_down(&mut self.output, rows_up)?;
        queue!(self.output, MoveToColumn(0))?;
        self.output.flush()
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        queue!(self.output, Hide)?;
        self.output.flush()
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        queue!(self.output, Show)?;
        self.output.flush()
    }
}

fn lock_rows<W: Write>(rows: &SharedTerminalRows<W>) -> MutexGuard<'_, TerminalRows<W>> {
    rows.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A single progress bar.
pub struct ProgressBar<W: Write + Send + 'static> {
    prefix: String,
    suffix: String,
    style: ProgressStyle,
    rows: SharedTerminalRows<W>,
    row: Option<usize>,
    is_active: Arc<AtomicBool>,
    watches_interrupts: bool,
    watcher: Option<InterruptWatcher>,
}

impl<W: Write + Send + 'static> Debug for ProgressBar<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressBar")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("row", &self.row)
            .field("is_active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl ProgressBar<Stdout> {
    #[must_use]
    pub fn new_stdout(prefix: impl Into<String>) -> Self {
        Self::new(prefix, io::stdout(), Arc::new(CrosstermTerminal))
    }
}

impl<W: Write + Send + 'static> ProgressBar<W> {
    pub fn new(
        prefix: impl Into<String>,
        output: W,
        terminal: Arc<dyn TerminalCapability>,
    ) -> Self {
        Self::with_rows(prefix, TerminalRows::new_shared(output, terminal))
    }

    /// A bar that draws on rows shared with other bars.
    pub fn with_rows(prefix: impl Into<String>, rows: SharedTerminalRows<W>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: String::new(),
            style: default_progress_style,
            rows,
            row: None,
            is_active: Arc::new(AtomicBool::new(false)),
            watches_interrupts: true,
            watcher: None,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: ProgressStyle) -> Self {
        self.style = style;
        self
    }

    /// Leaves `SIGINT` alone while the bar is active.
    #[must_use]
    pub fn without_interrupt_watcher(mut self) -> Self {
        self.watches_interrupts = false;
        self
    }

    #[must_use]
    pub fn is_active(&self) -> bool { self.is_active.load(Ordering::SeqCst) }

    #[must_use]
    pub fn prefix(&self) -> &str { &self.prefix }

    #[must_use]
    pub fn suffix(&self) -> &str { &self.suffix }

    pub fn set_suffix(&mut self, suffix: impl Into<String>) { self.suffix = suffix.into(); }

    #[must_use]
    pub fn rows(&self) -> &SharedTerminalRows<W> { &self.rows }

    /// Allocates the bar's row (once) and hides the cursor. Starting an active bar
    /// does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written, or the interrupt watcher
    /// can't be installed.
    pub fn start(&mut self) -> io::Result<()> {
        if self.is_active.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        {
            let mut rows = lock_rows(&self.rows);
            if self.row.is_none() {
                self.row = Some(rows.allocate_row()?);
            }
            rows.hide_cursor()?;
        }
        if self.watches_interrupts {
            let rows = Arc::clone(&self.rows);
            self.watcher = Some(InterruptWatcher::spawn(
                Arc::clone(&self.is_active),
                move || drop(lock_rows(&rows).show_cursor()),
            )?);
        }
        tracing::debug!(message = "progress started", prefix = %self.prefix, row = ?self.row);
        Ok(())
    }

    /// Shows the cursor and stops listening for interrupts. Stopping an inactive
    /// bar does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn stop(&mut self) -> io::Result<()> {
        if !self.is_active.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(watcher) = self.watcher.take() {
            watcher.close();
        }
        tracing::debug!(message = "progress stopped", prefix = %self.prefix);
        lock_rows(&self.rows).show_cursor()
    }

    /// Redraws the bar for `fraction`. Does nothing while the bar is inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn print(&mut self, fraction: f64) -> io::Result<()> {
        let Some(row) = self.row.filter(|_| self.is_active()) else {
            return Ok(());
        };
        let mut rows = lock_rows(&self.rows);
        let line =
            render_progress_line(&self.prefix, &self.suffix, rows.width(), self.style, fraction);
        rows.write_row(row, &line)
    }
}

impl<W: Write + Send + 'static> Drop for ProgressBar<W> {
    fn drop(&mut self) { drop(self.stop()); }
}

/// A bar with a `" NNN%"` suffix tracking `value` out of `maximum`.
#[derive(Debug)]
pub struct PercentProgress<W: Write + Send + 'static> {
    bar: ProgressBar<W>,
    value: f64,
    maximum: f64,
}

impl<W: Write + Send + 'static> PercentProgress<W> {
    #[must_use]
    pub fn new(bar: ProgressBar<W>, maximum: f64) -> Self {
        Self {
            bar,
            value: 0.0,
            maximum,
        }
    }

    #[must_use]
    pub fn bar(&self) -> &ProgressBar<W> { &self.bar }

    #[must_use]
    pub fn value(&self) -> f64 { self.value }

    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn start(&mut self) -> io::Result<()> {
        self.bar.start()?;
        self.update()
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn stop(&mut self) -> io::Result<()> { self.bar.stop() }

    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn set(&mut self, value: f64) -> io::Result<()> {
        self.value = value;
        self.update()
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn add(&mut self, delta: f64) -> io::Result<()> {
        self.value += delta;
        self.update()
    }

    fn update(&mut self) -> io::Result<()> {
        let fraction = if self.maximum > 0.0 {
            self.value / self.maximum
        } else {
            f64::NAN
        };
        self.bar.set_suffix(percent_suffix(fraction));
        self.bar.print(fraction)
    }
}

fn percent_suffix(fraction: f64) -> String {
    if fraction.is_nan() {
        "   ?%".to_string()
    } else {
        format!(" {:>3.0}%", fraction * 100.0)
    }
}

/// Wraps a reader and reports the bytes that pass through it. The bar stops at the
/// end of the stream, on a read error, or when `total` bytes have been read.
#[derive(Debug)]
pub struct TransferProgress<R: Read, W: Write + Send + 'static> {
    reader: R,
    bar: ProgressBar<W>,
    total: Option<u64>,
    transferred: u64,
    started_at: Instant,
}

impl<R: Read, W: Write + Send + 'static> TransferProgress<R, W> {
    /// Starts `bar` right away. A `total` of `None` (or zero) means the size is
    /// unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn start(reader: R, bar: ProgressBar<W>, total: Option<u64>) -> io::Result<Self> {
        let mut it = Self {
            reader,
            bar,
            total: total.filter(|total| *total > 0),
            transferred: 0,
            started_at: Instant::now(),
        };
        it.bar.start()?;
        it.update()?;
        Ok(it)
    }

    #[must_use]
    pub fn transferred(&self) -> u64 { self.transferred }

    #[must_use]
    pub fn bar(&self) -> &ProgressBar<W> { &self.bar }

    #[must_use]
    pub fn into_inner(self) -> R { self.reader }

    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn add(&mut self, count: u64) -> io::Result<()> {
        self.transferred += count;
        self.update()
    }

    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn stop(&mut self) -> io::Result<()> { self.bar.stop() }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn update(&mut self) -> io::Result<()> {
        let seconds = self.started_at.elapsed().as_secs_f64();
        let rate = if seconds > 0.0 {
            (self.transferred as f64 / seconds + 0.5) as u64
        } else {
            0
        };
        let size = format_bytes(self.transferred);
        let rate = format!("{}/s", format_bytes(rate));
        let fraction = self
            .total
            .map_or(f64::NAN, |total| self.transferred as f64 / total as f64);
        self.bar
            .set_suffix(format!(" {size:>8}, {rate:>10},{}", percent_suffix(fraction)));
        self.bar.print(fraction)
    }

    fn is_complete(&self) -> bool {
        self.total.is_some_and(|total| self.transferred >= total)
    }
}

impl<R: Read, W: Write + Send + 'static> Read for TransferProgress<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reader.read(buf) {
            // The bytes are already consumed from the source, so a failed redraw only
            // takes the bar down. The caller still gets every byte.
            Ok(count) => {
                let redrawn = self.add(count as u64).and_then(|()| {
                    if count == 0 || self.is_complete() {
                        self.bar.stop()
                    } else {
                        Ok(())
                    }
                });
                if let Err(error) = redrawn {
                    tracing::warn!(message = "progress redraw failed", error = %error);
                    drop(self.bar.stop());
                }
                Ok(count)
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => Err(error),
            Err(error) => {
                tracing::debug!(message = "transfer failed", error = %error);
                drop(self.bar.stop());
                Err(error)
            }
        }
    }
}

/// Several transfers, one row each, sharing a single [`TerminalRows`].
pub struct MultiProgress<W: Write + Send + 'static> {
    rows: SharedTerminalRows<W>,
    style: ProgressStyle,
    watches_interrupts: bool,
    is_active_flags: Vec<Arc<AtomicBool>>,
}

impl<W: Write + Send + 'static> Debug for MultiProgress<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiProgress")
            .field("item_count", &self.is_active_flags.len())
            .finish_non_exhaustive()
    }
}

impl MultiProgress<Stdout> {
    #[must_use]
    pub fn new_stdout() -> Self { Self::new(io::stdout(), Arc::new(CrosstermTerminal)) }
}

impl<W: Write + Send + 'static> MultiProgress<W> {
    pub fn new(output: W, terminal: Arc<dyn TerminalCapability>) -> Self {
        Self {
            rows: TerminalRows::new_shared(output, terminal),
            style: default_progress_style,
            watches_interrupts: true,
            is_active_flags: vec![],
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: ProgressStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn without_interrupt_watcher(mut self) -> Self {
        self.watches_interrupts = false;
        self
    }

    #[must_use]
    pub fn rows(&self) -> &SharedTerminalRows<W> { &self.rows }

    /// Starts a transfer on the next free row. The returned reader can be moved to
    /// another thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn add<R: Read>(
        &mut self,
        prefix: impl Into<String>,
        reader: R,
        total: Option<u64>,
    ) -> io::Result<TransferProgress<R, W>> {
        let mut bar =
            ProgressBar::with_rows(prefix, Arc::clone(&self.rows)).with_style(self.style);
        if !self.watches_interrupts {
            bar = bar.without_interrupt_watcher();
        }
        self.is_active_flags.push(Arc::clone(&bar.is_active));
        TransferProgress::start(reader, bar, total)
    }

    /// Marks every transfer as stopped and shows the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written.
    pub fn stop(&mut self) -> io::Result<()> {
        for is_active in &self.is_active_flags {
            is_active.store(false, Ordering::SeqCst);
        }
        lock_rows(&self.rows).show_cursor()
    }
}

#[cfg(unix)]
struct InterruptWatcher {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl InterruptWatcher {
    fn spawn(
        is_active: Arc<AtomicBool>,
        on_interrupt: impl FnOnce() + Send + 'static,
    ) -> io::Result<Self> {
        use signal_hook::{consts::SIGINT, iterator::Signals, low_level};

        let mut signals = Signals::new([SIGINT])?;
        crate::signal::mark_sigint_hooked();
        let handle = signals.handle();
        let thread = std::thread::Builder::new()
            .name("progress-interrupt-watcher".into())
            .spawn(move || {
                let is_interrupted = signals.forever().next().is_some();
                // Unregister before re-raising so the default action applies.
                drop(signals);
                if !is_interrupted {
                    return;
                }
                if is_active.swap(false, Ordering::SeqCst) {
                    on_interrupt();
                }
                tracing::debug!(message = "progress interrupted, re-raising SIGINT");
                drop(low_level::emulate_default_handler(SIGINT));
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    fn close(mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            drop(thread.join());
        }
    }
}

#[cfg(not(unix))]
struct InterruptWatcher;

#[cfg(not(unix))]
impl InterruptWatcher {
    #[allow(clippy::unnecessary_wraps)]
    fn spawn(
        _is_active: Arc<AtomicBool>,
        _on_interrupt: impl FnOnce() + Send + 'static,
    ) -> io::Result<Self> {
        Ok(Self)
    }

    fn close(self) {}
}

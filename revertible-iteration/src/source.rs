use std::fmt;
use std::io::{BufRead, BufReader, Read};

use log::trace;
use pivot_collections::SourcePosition;

use crate::error::{IterationError, Result};
use crate::stack::SaveStack;
use crate::traits::RevertibleIterator;

/// One line pulled from the source, separator stripped.
#[derive(Debug)]
struct BufferedLine {
    chars: Vec<char>,
    /// Whether the line ended with a separator in the raw source. A
    /// terminated line contributes one normalized `'\n'` element at
    /// column `chars.len()`; a final unterminated line contributes none.
    terminated: bool,
}

/// A revertible iterator over the characters of a source read one line
/// at a time. Position is a [`SourcePosition`] (line, column) pair.
///
/// Lines already read are retained for the iterator's lifetime, so any
/// previously visited position stays revertible, including across line
/// boundaries. The source may be arbitrarily large; a line is pulled
/// only when the cursor's column runs past the end of the last buffered
/// line. Any raw separator (`\n`, `\r\n`, or a lone `\r`) normalizes
/// to a single `'\n'` element, so re-iterating the sequence is stable
/// regardless of the separator conventions the source used, even mixed
/// within one source.
///
/// The source is wrapped in an internal [`BufReader`]; buffering it
/// yourself provides no benefit. After [`close`](Self::close), every
/// fallible operation fails with
/// [`ClosedSource`](crate::IterationError::ClosedSource).
pub struct SourceIterator<R: Read> {
    source: Option<BufReader<R>>,
    closed: bool,
    /// The source reported end-of-input.
    finished: bool,
    lines: Vec<BufferedLine>,
    line: usize,
    column: usize,
    saved: SaveStack<SourcePosition>,
}

impl<R: Read> SourceIterator<R> {
    /// Creates an iterator over the given readable source.
    ///
    /// The source must stay open for the iterator's usable lifetime.
    pub fn new(source: R) -> Self {
        Self {
            source: Some(BufReader::new(source)),
            closed: false,
            finished: false,
            lines: Vec::new(),
            line: 0,
            column: 0,
            saved: SaveStack::new(),
        }
    }

    /// Drops the underlying source. Every subsequent fallible operation
    /// on this iterator fails with
    /// [`ClosedSource`](crate::IterationError::ClosedSource).
    ///
    /// [`save`](RevertibleIterator::save) is infallible by signature
    /// and still records the raw cursor after closing; the recorded
    /// position is only reachable through
    /// [`revert`](RevertibleIterator::revert), which fails once closed.
    pub fn close(&mut self) {
        self.source = None;
        self.closed = true;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(IterationError::closed());
        }
        Ok(())
    }

    /// Pulls at least one more line from the source into the buffer.
    /// Returns false when the source has nothing further.
    fn pull(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        let source = self.source.as_mut().ok_or_else(IterationError::closed)?;
        let mut raw = String::new();
        let read = source
            .read_line(&mut raw)
            .map_err(|cause| IterationError::ClosedSource(Some(cause)))?;
        if read == 0 {
            self.finished = true;
            return Ok(false);
        }
        let terminated = if raw.ends_with('\n') {
            raw.pop();
            if raw.ends_with('\r') {
                raw.pop();
            }
            true
        } else {
            // Data without a trailing `\n` means the source ran dry;
            // a bare final `\r` still delimits the line.
            self.finished = true;
            if raw.ends_with('\r') {
                raw.pop();
                true
            } else {
                false
            }
        };
        // `read_line` only splits on `\n`, so any `\r` left inside the
        // pulled text is a lone separator delimiting a line of its own.
        let mut segments = raw.split('\r').peekable();
        while let Some(segment) = segments.next() {
            let last = segments.peek().is_none();
            let terminated = !last || terminated;
            trace!(
                "pulled line {} ({} chars, terminated: {})",
                self.lines.len(),
                segment.chars().count(),
                terminated
            );
            self.lines.push(BufferedLine {
                chars: segment.chars().collect(),
                terminated,
            });
        }
        Ok(true)
    }

    /// Rebases the raw (line, column) counters onto a buffered line and
    /// reports whether an element exists at the cursor. Crossing a
    /// finished line subtracts its char count plus the one-element
    /// normalized separator; pulling is deferred until the column
    /// actually runs past the last buffered line.
    fn normalize(&mut self) -> Result<bool> {
        loop {
            if self.line >= self.lines.len() {
                if !self.pull()? {
                    return Ok(false);
                }
                continue;
            }
            let len = self.lines[self.line].chars.len();
            if self.column < len {
                return Ok(true);
            }
            let terminated = self.lines[self.line].terminated;
            if self.column == len {
                // The newline slot, unless the final line never ended.
                return Ok(terminated);
            }
            if !terminated {
                return Ok(false);
            }
            self.column -= len + 1;
            self.line += 1;
        }
    }

    fn normalize_or_exhausted(&mut self) -> Result<()> {
        if !self.normalize()? {
            return Err(IterationError::Exhausted);
        }
        Ok(())
    }
}

impl<R: Read> RevertibleIterator for SourceIterator<R> {
    type Item = char;
    type Position = SourcePosition;

    fn advance(&mut self, places: isize) -> Result<()> {
        self.ensure_open()?;
        if places < 0 {
            return Err(IterationError::NegativeAdvance);
        }
        // Only the column moves; the next query normalizes across lines.
        self.column += places as usize;
        Ok(())
    }

    fn save(&mut self) {
        // Raw counters, so saving works even at exhaustion; reverting
        // re-normalizes to the identical sequence.
        self.saved.push(SourcePosition::new(self.line, self.column));
    }

    fn revert(&mut self) -> Result<()> {
        self.ensure_open()?;
        let position = self.saved.pop()?;
        self.line = position.line;
        self.column = position.column;
        Ok(())
    }

    fn remove_save(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.saved.pop()?;
        Ok(())
    }

    fn peek(&mut self) -> Result<char> {
        self.ensure_open()?;
        self.normalize_or_exhausted()?;
        let line = &self.lines[self.line];
        Ok(if self.column == line.chars.len() {
            '\n'
        } else {
            line.chars[self.column]
        })
    }

    fn position(&mut self) -> Result<SourcePosition> {
        self.ensure_open()?;
        self.normalize()?;
        Ok(SourcePosition::new(self.line, self.column))
    }

    fn has_next(&mut self) -> bool {
        !self.closed && self.normalize().unwrap_or(false)
    }
}

impl<R: Read> Iterator for SourceIterator<R> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Result<char>> {
        match self.next_item() {
            Ok(ch) => Some(Ok(ch)),
            Err(IterationError::Exhausted) => None,
            Err(error) => Some(Err(error)),
        }
    }
}

impl<R: Read> PartialEq for SourceIterator<R> {
    /// A source iterator exclusively owns its source, so only the same
    /// instance wraps the identical underlying sequence.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<R: Read> Eq for SourceIterator<R> {}

impl<R: Read> fmt::Display for SourceIterator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Best-effort peek into already-buffered lines; no pulling here.
        let peeked = self.lines.get(self.line).and_then(|line| {
            if self.column < line.chars.len() {
                Some(line.chars[self.column])
            } else if self.column == line.chars.len() && line.terminated {
                Some('\n')
            } else {
                None
            }
        });
        match peeked {
            Some(ch) => write!(f, "{} (line = {}, column = {})", ch, self.line, self.column),
            None => write!(
                f,
                "<past final position> (line = {}, column = {})",
                self.line, self.column
            ),
        }
    }
}

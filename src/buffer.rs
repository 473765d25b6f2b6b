//! Growable byte string with a terminator and saturating capacity arithmetic.
//!
//! The [`Buffer`] type owns at most one allocation, sized in multiples of [`GROWTH_QUANTUM`], and
//! always keeps a zero byte just past its content. A buffer that has never been written to owns
//! nothing and reads as a static empty string.
//!
//! # Example
//!
//! ```
//! use dstr::Buffer;
//!
//! let mut buffer = Buffer::new();
//! buffer.set(b"Hello").unwrap();
//! buffer.append(b", World!").unwrap();
//! assert_eq!(buffer.as_bytes(), b"Hello, World!");
//!
//! // Positional writes truncate whatever follows them
//! buffer.write_at(b"p!", 3).unwrap();
//! assert_eq!(buffer.as_bytes(), b"Help!");
//!
//! buffer.release();
//! assert_eq!(buffer.capacity(), 0);
//! ```

use crate::constants::{CAPACITY_OVERFLOW, GROWTH_QUANTUM};
use crate::error::Error;
use std::{fmt, io};
use tracing::{debug, trace};

/// What an unowned buffer reads as: no content, just the terminator.
const EMPTY: &[u8] = b"\0";

/// Clears the low bits of a length when rounding it to a [`GROWTH_QUANTUM`] multiple.
const QUANTUM_MASK: usize = !(GROWTH_QUANTUM - 1);

/// A growable byte string with explicit lifecycle control.
///
/// # Storage
///
/// A buffer is either *unowned*, reading as a static empty string and holding no memory at all,
/// or *owned*, holding a single allocation of exactly [`capacity()`](Self::capacity) bytes. The
/// first write that needs storage moves it from unowned to owned, and [`release()`](Self::release)
/// moves it back.
///
/// # Invariants
///
/// - Unowned: `capacity() == 0` and `len() == 0`.
/// - Owned: `0 <= len() < capacity()`, `capacity()` is a multiple of [`GROWTH_QUANTUM`], and the
///   byte at index `len()` is a zero terminator.
///
/// Cloning an owned buffer copies the allocation, so two buffers never share storage.
#[derive(Clone, Default)]
pub struct Buffer {
    /// `None` while the buffer reads from [`EMPTY`].
    owned: Option<Owned>,
}

/// The allocation held by an owned [`Buffer`].
#[derive(Clone)]
struct Owned {
    /// Backing storage, `buf.len()` is the buffer capacity.
    buf: Vec<u8>,
    /// Number of content bytes, the terminator lives at `buf[len]`.
    len: usize,
}

impl Owned {
    /// Allocates `cap` zeroed bytes without aborting on allocation failure.
    fn zeroed(cap: usize) -> Result<Self, Error> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(cap)?;
        buf.resize(cap, 0);

        trace!(cap, "allocated buffer storage");
        Ok(Self { buf, len: 0 })
    }

    /// Grows the allocation in place to `cap` bytes, keeping the current content.
    ///
    /// Does nothing if the allocation is already large enough. On failure the allocation is left
    /// untouched.
    #[expect(clippy::arithmetic_side_effects, reason = "Safe by bounds check")]
    fn grow(&mut self, cap: usize) -> Result<(), Error> {
        let old_cap = self.buf.len();
        if old_cap >= cap {
            return Ok(());
        }

        self.buf.try_reserve_exact(cap - old_cap)?;
        self.buf.resize(cap, 0);

        trace!(old_cap, new_cap = cap, "grew buffer storage");
        Ok(())
    }

    /// Copies `src` to `offset` and terminates the content at `new_len`.
    ///
    /// The caller guarantees `offset + src.len() == new_len < self.buf.len()`.
    #[expect(clippy::indexing_slicing, reason = "Safe by invariant")]
    fn write(&mut self, src: &[u8], offset: usize, new_len: usize) {
        if !src.is_empty() {
            self.buf[offset..new_len].copy_from_slice(src);
        }
        self.buf[new_len] = 0;
        self.len = new_len;
    }
}

impl Buffer {
    /// Creates an empty buffer.
    ///
    /// This never allocates. Storage is obtained by the first write.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dstr::Buffer;
    /// let buffer = Buffer::new();
    /// assert_eq!(buffer.len(), 0);
    /// assert_eq!(buffer.capacity(), 0);
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self { owned: None }
    }

    /// Creates an empty buffer with room for at least `len` bytes of content.
    ///
    /// The capacity is [`required_capacity(len)`](Self::required_capacity) and every byte of the
    /// allocation starts out zeroed.
    ///
    /// **This never fails.** If `len` is too large to represent, or the allocation can't be made,
    /// the result is the same unowned buffer [`new()`](Self::new) returns. Check
    /// [`capacity()`](Self::capacity) if the reservation matters, or use
    /// [`try_with_reserve()`](Self::try_with_reserve) to get the error instead.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dstr::Buffer;
    /// let buffer = Buffer::with_reserve(100);
    /// assert_eq!(buffer.len(), 0);
    /// assert_eq!(buffer.capacity(), 128);
    ///
    /// // Unrepresentable reservations degrade to an unowned buffer
    /// let buffer = Buffer::with_reserve(usize::MAX);
    /// assert_eq!(buffer.capacity(), 0);
    /// ```
    pub fn with_reserve(len: usize) -> Self {
        Self::try_with_reserve(len).unwrap_or_else(|err| {
            debug!(len, %err, "reservation failed, using an unowned buffer");
            Self::new()
        })
    }

    /// Creates an empty buffer with room for at least `len` bytes of content.
    ///
    /// Like [`with_reserve()`](Self::with_reserve), but reports failure instead of falling back
    /// to an unowned buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dstr::{Buffer, Error};
    /// let buffer = Buffer::try_with_reserve(64).unwrap();
    /// assert_eq!(buffer.capacity(), 128);
    ///
    /// assert_eq!(
    ///     Buffer::try_with_reserve(usize::MAX).unwrap_err(),
    ///     Error::CapacityOverflow
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if `len` leaves no room for a terminator and
    /// [`Error::Alloc`] if the allocation fails.
    pub fn try_with_reserve(len: usize) -> Result<Self, Error> {
        let cap = Self::required_capacity(len);
        if cap == CAPACITY_OVERFLOW {
            return Err(Error::CapacityOverflow);
        }

        Ok(Self {
            owned: Some(Owned::zeroed(cap)?),
        })
    }

    /// Frees the owned allocation, if any, and resets to the unowned empty state.
    ///
    /// Calling this on a buffer that owns nothing, including one that was already released, is a
    /// no-op. Dropping a buffer frees its allocation as well, this is for when the buffer itself
    /// is kept around for reuse.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dstr::Buffer;
    /// let mut buffer = Buffer::new();
    /// buffer.set(b"data").unwrap();
    ///
    /// buffer.release();
    /// buffer.release();
    /// assert_eq!(buffer.as_bytes(), b"");
    /// assert_eq!(buffer.capacity(), 0);
    /// ```
    #[inline]
    pub fn release(&mut self) {
        if let Some(owned) = self.owned.take() {
            trace!(cap = owned.buf.len(), "released buffer storage");
        }
    }

    /// Returns the content, without the terminator.
    #[expect(clippy::indexing_slicing, reason = "Safe by invariant")]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.owned {
            Some(owned) => &owned.buf[..owned.len],
            None => &[],
        }
    }

    /// Returns the content followed by its zero terminator.
    ///
    /// The returned slice is never empty. For an unowned buffer it's a static `b"\0"`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dstr::Buffer;
    /// let mut buffer = Buffer::new();
    /// assert_eq!(buffer.as_bytes_with_nul(), b"\0");
    ///
    /// buffer.set(b"abc").unwrap();
    /// assert_eq!(buffer.as_bytes_with_nul(), b"abc\0");
    /// ```
    #[expect(clippy::indexing_slicing, reason = "Safe by invariant")]
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        match &self.owned {
            Some(owned) => &owned.buf[..=owned.len],
            None => EMPTY,
        }
    }

    /// Returns the number of content bytes, not counting the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.owned.as_ref().map_or(0, |owned| owned.len)
    }

    /// Returns `true` if the buffer has no content.
    ///
    /// An owned buffer can be empty too, so this says nothing about [`capacity()`](Self::capacity).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the size of the owned allocation in bytes, or 0 if the buffer owns nothing.
    ///
    /// This counts the terminator, so an owned buffer always has `capacity() > len()`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.owned.as_ref().map_or(0, |owned| owned.buf.len())
    }

    /// Returns `true` if the buffer holds an allocation.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.owned.is_some()
    }

    /// Computes the capacity needed for `len` bytes of content plus a terminator.
    ///
    /// The result is the smallest [`GROWTH_QUANTUM`] multiple strictly greater than `len`, so it
    /// is never 0 (not even for `len == 0`). If `len` is greater than
    /// [`MAX_LENGTH`](crate::constants::MAX_LENGTH), the result is [`CAPACITY_OVERFLOW`], which
    /// no valid capacity is ever equal to.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dstr::Buffer;
    /// # use dstr::constants::{CAPACITY_OVERFLOW, GROWTH_QUANTUM, MAX_LENGTH};
    /// assert_eq!(Buffer::required_capacity(0), GROWTH_QUANTUM);
    /// assert_eq!(Buffer::required_capacity(63), 64);
    /// assert_eq!(Buffer::required_capacity(64), 128);
    ///
    /// // Saturates right past the largest representable length
    /// assert!(Buffer::required_capacity(MAX_LENGTH) > MAX_LENGTH);
    /// assert_eq!(Buffer::required_capacity(MAX_LENGTH + 1), CAPACITY_OVERFLOW);
    /// ```
    #[inline]
    pub const fn required_capacity(len: usize) -> usize {
        // `len + GROWTH_QUANTUM` only overflows when `len > MAX_LENGTH`, and rounding down a sum
        // that did fit can't take it back to or below `len`.
        match len.checked_add(GROWTH_QUANTUM) {
            Some(padded) => padded & QUANTUM_MASK,
            None => CAPACITY_OVERFLOW,
        }
    }

    /// Adds two sizes, saturating at [`CAPACITY_OVERFLOW`].
    ///
    /// A true sum of exactly `usize::MAX` can't be told apart from an overflow. That's fine for
    /// string lengths since a string that long would have no room for its terminator anyway.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dstr::Buffer;
    /// # use dstr::constants::CAPACITY_OVERFLOW;
    /// assert_eq!(Buffer::saturating_add(2, 3), 5);
    /// assert_eq!(Buffer::saturating_add(usize::MAX, 1), CAPACITY_OVERFLOW);
    /// ```
    #[inline]
    pub const fn saturating_add(a: usize, b: usize) -> usize {
        a.saturating_add(b)
    }

    /// Replaces the content with `src`.
    ///
    /// Equivalent to [`write_at(src, 0)`](Self::write_at).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if the buffer needed to grow and couldn't. The buffer is unchanged
    /// on error.
    #[inline]
    pub fn set(&mut self, src: &[u8]) -> Result<(), Error> {
        self.write_internal(src, 0)
    }

    /// Appends `src` to the content.
    ///
    /// Equivalent to [`write_at(src, self.len())`](Self::write_at).
    ///
    /// # Examples
    ///
    /// ```
    /// # use dstr::Buffer;
    /// let mut buffer = Buffer::new();
    /// for word in ["one", "two", "three"] {
    ///     buffer.append(word.as_bytes()).unwrap();
    /// }
    /// assert_eq!(buffer.as_bytes(), b"onetwothree");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the combined length is unrepresentable and
    /// [`Error::Alloc`] if the buffer needed to grow and couldn't. The buffer is unchanged on
    /// error.
    #[inline]
    pub fn append(&mut self, src: &[u8]) -> Result<(), Error> {
        self.write_internal(src, self.len())
    }

    /// Writes `src` at `offset`, then terminates the content right after it.
    ///
    /// The greatest valid offset is [`len()`](Self::len), anything larger would leave a gap
    /// between the end of the current content and the start of the new content.
    ///
    /// This is not a substring replacement. If `offset + src.len()` is less than the current
    /// length, everything after the written bytes is dropped and the length shrinks to match.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dstr::{Buffer, Error};
    /// let mut buffer = Buffer::new();
    /// buffer.set(b"abcdef").unwrap();
    ///
    /// buffer.write_at(b"X", 2).unwrap();
    /// assert_eq!(buffer.as_bytes(), b"abX");
    ///
    /// assert_eq!(
    ///     buffer.write_at(b"y", 5),
    ///     Err(Error::OffsetGap { offset: 5, len: 3 })
    /// );
    /// assert_eq!(buffer.as_bytes(), b"abX");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::OffsetGap`] if `offset > self.len()`, [`Error::CapacityOverflow`] if the
    /// resulting length is unrepresentable and [`Error::Alloc`] if the buffer needed to grow and
    /// couldn't. The buffer is unchanged on error.
    pub fn write_at(&mut self, src: &[u8], offset: usize) -> Result<(), Error> {
        let len = self.len();
        if offset > len {
            debug!(offset, len, "rejected write past the end of the content");
            return Err(Error::OffsetGap { offset, len });
        }

        self.write_internal(src, offset)
    }

    /// The single mutation path behind [`set`](Self::set), [`append`](Self::append) and
    /// [`write_at`](Self::write_at).
    ///
    /// Nothing is modified until both the capacity arithmetic and the allocation have succeeded.
    fn write_internal(&mut self, src: &[u8], offset: usize) -> Result<(), Error> {
        let new_len = Self::saturating_add(offset, src.len());
        let new_cap = Self::required_capacity(new_len);

        // The sentinel is the only capacity `new_len` can reach, and it's never allocatable
        if new_cap == CAPACITY_OVERFLOW {
            debug!(
                offset,
                src_len = src.len(),
                "write leaves no room for the terminator"
            );
            return Err(Error::CapacityOverflow);
        }

        let owned = match &mut self.owned {
            Some(owned) => {
                owned.grow(new_cap).inspect_err(|err| {
                    debug!(new_cap, %err, "failed to grow buffer storage");
                })?;
                owned
            }
            None => self.owned.insert(Owned::zeroed(new_cap).inspect_err(|err| {
                debug!(new_cap, %err, "failed to allocate buffer storage");
            })?),
        };

        owned.write(src, offset, new_len);
        Ok(())
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field(
                "content",
                &format_args!("\"{}\"", self.as_bytes().escape_ascii()),
            )
            .finish()
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Buffer {}

impl PartialEq<[u8]> for Buffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for Buffer {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<&[u8]> for Buffer {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        let mut buffer = Self::new();
        buffer.set(src)?;
        Ok(buffer)
    }
}

impl TryFrom<&str> for Buffer {
    type Error = Error;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        Self::try_from(src.as_bytes())
    }
}

/// Appends everything written. A failed write leaves the buffer unchanged.
impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

//! A growable, always-terminated byte string with explicit lifecycle control.
//!
//! [`Buffer`] holds a byte string of any length and keeps a zero byte right after its content, so
//! the content can be handed out either as a plain slice or as a terminated one. Storage grows in
//! steps of [`GROWTH_QUANTUM`](constants::GROWTH_QUANTUM) bytes and all size arithmetic
//! saturates, so a request that can't be represented is reported as an error instead of wrapping
//! around.
//!
//! # When to use this
//!
//! This crate is a good fit when you need a terminated byte string for an interface that expects
//! one, want allocation failure to come back as an error instead of aborting, or want the buffer
//! to own no memory at all until the first write. For everything else, prefer [`Vec<u8>`].
//!
//! # Quick start
//!
//! ```
//! use dstr::Buffer;
//!
//! let args = ["prog", "--verbose", "input.txt"];
//!
//! // Join the arguments with spaces
//! let mut cmdline = Buffer::new();
//! for (i, arg) in args.iter().enumerate() {
//!     if i > 0 {
//!         cmdline.append(b" ").unwrap();
//!     }
//!     cmdline.append(arg.as_bytes()).unwrap();
//! }
//!
//! assert_eq!(cmdline.as_bytes(), b"prog --verbose input.txt");
//! assert_eq!(cmdline.as_bytes_with_nul().last(), Some(&0));
//!
//! // Free the storage but keep the buffer around for reuse
//! cmdline.release();
//! assert!(cmdline.is_empty());
//! ```
//!
//! # Errors
//!
//! Every write returns a [`Result`] with an [`Error`] describing why it failed. A failed write
//! leaves the buffer exactly as it was. Reserving constructors come in two flavours:
//! [`Buffer::with_reserve`] quietly falls back to an empty buffer, while
//! [`Buffer::try_with_reserve`] reports the error.
//!
//! # Logging
//!
//! Reallocations are reported through [`tracing`] at the `trace` level and failures at the
//! `debug` level. The crate never installs a subscriber.
//!
//! # Crate organisation
//!
//! - [`Buffer`] — the byte string itself.
//! - [`Error`] — why a write or reservation failed.
//! - [`constants`] — the growth quantum and overflow sentinel used by the capacity arithmetic.

mod buffer;
pub mod constants;
mod error;

pub use buffer::Buffer;
pub use error::Error;

//! Joins command-line style arguments through the public buffer API only.
//!
//! Each argument is set into both an unowned and a reserved buffer, the two are compared and
//! released, and the argument is appended to a space-joined command line.

#![expect(clippy::unwrap_used, reason = "Okay in tests")]

use dstr::Buffer;
use rstest::rstest;

fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Joins `args` with single spaces, checking each one along the way.
fn join_args(args: &[&str]) -> Buffer {
    let mut cmdline = Buffer::new();

    for (i, arg) in args.iter().enumerate() {
        let mut plain = Buffer::new();
        let mut reserved = Buffer::with_reserve(arg.len());
        assert!(reserved.capacity() > arg.len());

        plain.set(arg.as_bytes()).unwrap();
        reserved.set(arg.as_bytes()).unwrap();

        // The reservation never needed to grow
        assert_eq!(reserved.capacity(), Buffer::required_capacity(arg.len()));
        assert_eq!(plain, reserved);
        assert_eq!(plain.as_bytes(), arg.as_bytes());

        plain.release();
        reserved.release();
        assert!(!plain.is_owned());
        assert!(!reserved.is_owned());

        if i > 0 {
            cmdline.append(b" ").unwrap();
        }
        cmdline.append(arg.as_bytes()).unwrap();
    }

    cmdline
}

#[rstest]
#[case(&["prog"], "prog")]
#[case(&["prog", "a", "b"], "prog a b")]
#[case(&["prog", "", "x"], "prog  x")]
#[case(&["tëst", "ünïcode"], "tëst ünïcode")]
fn test_join_args(#[case] args: &[&str], #[case] expected: &str) {
    init_test_logging();

    let mut cmdline = join_args(args);
    assert_eq!(cmdline.as_bytes(), expected.as_bytes());
    assert_eq!(cmdline.len(), expected.len());
    assert_eq!(cmdline.as_bytes_with_nul().last(), Some(&0));

    cmdline.release();
    cmdline.release();
    assert!(cmdline.is_empty());
}

#[test]
fn test_join_no_args() {
    let cmdline = join_args(&[]);

    // Nothing was ever written, so nothing was ever allocated
    assert!(!cmdline.is_owned());
    assert_eq!(cmdline.as_bytes_with_nul(), b"\0");
}

#[test]
fn test_join_long_args() {
    let long = "x".repeat(1000);
    let args = ["prog", long.as_str(), "end"];

    let cmdline = join_args(&args);
    assert_eq!(cmdline.as_bytes(), args.join(" ").as_bytes());
    assert_eq!(cmdline.capacity() % 64, 0);
    assert!(cmdline.capacity() > cmdline.len());
}

//! General utility methods.
use anyhow::Error;
use std::io;

/// Check whether any error in `err`'s chain is a broken pipe, as when stdout is closed early by
/// something like `head`.
pub fn is_broken_pipe(err: &Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .map_or(false, |io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
    })
}

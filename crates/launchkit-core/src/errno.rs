//! Errno classification.
//!
//! launchctl reports failures as raw errno values whose numbering belongs to
//! the host OS. This module maps them onto a fixed table of symbolic codes and
//! messages so callers can match on something stable.

use serde::Serialize;

/// A stabilized `{code, message, errno}` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    pub code: &'static str,
    pub message: &'static str,
    pub errno: i32,
}

impl ClassifiedError {
    /// Sentinel for errno `0` and for values missing from the table.
    pub const NONE: ClassifiedError = ClassifiedError {
        code: "",
        message: "",
        errno: 0,
    };

    /// Whether this classification should be raised.
    pub fn is_error(&self) -> bool {
        self.errno != 0
    }
}

const fn entry(errno: i32, code: &'static str, message: &'static str) -> ClassifiedError {
    ClassifiedError {
        code,
        message,
        errno,
    }
}

// BSD numbering, as reported by launchd on macOS.
static TABLE: &[ClassifiedError] = &[
    entry(-1, "EUNKNO", "Launchctl returned unexpected response"),
    entry(1, "EPERM", "Operation not permitted"),
    entry(2, "ENOENT", "No such file or directory"),
    entry(3, "ESRCH", "No such process"),
    entry(4, "EINTR", "Interrupted system call"),
    entry(5, "EIO", "Input/output error"),
    entry(7, "E2BIG", "Argument list too long"),
    entry(9, "EBADF", "Bad file descriptor"),
    entry(12, "ENOMEM", "Cannot allocate memory"),
    entry(13, "EACCES", "Permission denied"),
    entry(14, "EFAULT", "Bad address"),
    entry(16, "EBUSY", "Resource busy"),
    entry(17, "EEXIST", "File exists"),
    entry(20, "ENOTDIR", "Not a directory"),
    entry(21, "EISDIR", "Is a directory"),
    entry(22, "EINVAL", "Invalid argument"),
    entry(23, "ENFILE", "Too many open files in system"),
    entry(24, "EMFILE", "Too many open files"),
    entry(28, "ENOSPC", "No space left on device"),
    entry(30, "EROFS", "Read-only file system"),
    entry(37, "EALREADY", "Operation already in progress"),
    entry(45, "ENOTSUP", "Operation not supported"),
    entry(60, "ETIMEDOUT", "Operation timed out"),
];

/// Classify a raw errno. `0` and unknown values yield [`ClassifiedError::NONE`].
pub fn classify(errno: i32) -> ClassifiedError {
    if errno == 0 {
        return ClassifiedError::NONE;
    }
    TABLE
        .iter()
        .find(|e| e.errno == errno)
        .copied()
        .unwrap_or(ClassifiedError::NONE)
}

/// Look up a classification by its symbolic code (e.g. `"ESRCH"`).
pub fn classify_code(code: &str) -> Option<ClassifiedError> {
    TABLE.iter().find(|e| e.code == code).copied()
}

/// Message for a raw errno, or `None` when the table has no entry.
pub fn strerror(errno: i32) -> Option<&'static str> {
    let classified = classify(errno);
    classified.is_error().then_some(classified.message)
}

//! Cursor guard.

use super::{ForwardCursor, KvError, KvResult};

/// Owns a [`ForwardCursor`] and closes it when dropped.
///
/// Iterates as `(key, value)` pairs. After iteration stops, [`err`] reports
/// whether the cursor ran out or failed.
///
/// [`err`]: ScopedCursor::err
pub struct ScopedCursor<'a> {
    inner: Box<dyn ForwardCursor + 'a>,
    closed: bool,
}

impl<'a> ScopedCursor<'a> {
    pub fn new(inner: Box<dyn ForwardCursor + 'a>) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    /// Terminal error of the underlying cursor.
    pub fn err(&mut self) -> Option<KvError> {
        self.inner.err()
    }

    /// Close now and report the outcome instead of logging it on drop.
    pub fn close(mut self) -> KvResult<()> {
        self.closed = true;
        self.inner.close()
    }
}

impl Iterator for ScopedCursor<'_> {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.inner.next()
    }
}

impl Drop for ScopedCursor<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.inner.close() {
            tracing::warn!(error = %e, "failed to release cursor");
        }
    }
}

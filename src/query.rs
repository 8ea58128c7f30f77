//! Streaming iteration over the records selected by an indexed region query.
//!
//! Sources hand out cursors holding engine-side resources. [`RegionQuery`]
//! drives a cursor through a single reusable buffer and guarantees the
//! cursor is released exactly once, whether iteration runs to exhaustion,
//! is closed early, or the query is simply dropped.

use std::io;

use log::warn;

use crate::errors::{HtsViewError, Result};
use crate::record::AlignmentRecord;
use crate::region::Region;

/// An engine-side cursor positioned over the records of one region.
pub trait RecordCursor {
    /// Reads the next record into `buf`, replacing its contents.
    ///
    /// Returns the number of bytes read, with 0 meaning the region is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Any I/O failure from the underlying source.
    fn read_record(&mut self, buf: &mut Vec<u8>) -> io::Result<usize>;

    /// Releases the engine-side resources behind this cursor.
    ///
    /// [`RegionQuery`] calls this at most once; implementations need not
    /// guard against repeated calls.
    ///
    /// # Errors
    ///
    /// Any failure while tearing down the resources.
    fn release(&mut self) -> io::Result<()>;
}

/// A source that can be queried by region through an index.
pub trait IndexedSource {
    /// Cursor type produced by [`Self::query_region`].
    type Cursor: RecordCursor;

    /// Opens a cursor over the records overlapping `region`.
    ///
    /// # Errors
    ///
    /// Any failure resolving the region against the index.
    fn query_region(&mut self, region: &Region) -> io::Result<Self::Cursor>;

    /// Opens a [`RegionQuery`] over the records overlapping `region`.
    ///
    /// # Errors
    ///
    /// See [`Self::query_region`].
    fn query(&mut self, region: &Region) -> io::Result<RegionQuery<Self::Cursor>> {
        Ok(RegionQuery::new(self.query_region(region)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    Exhausted,
    Closed,
}

/// Iteration state over one region query.
///
/// Not an [`Iterator`]: each yielded [`RecordView`] borrows the query's
/// internal buffer and is invalidated by the next call to
/// [`RegionQuery::advance`]. Callers needing a record to outlive the step
/// copy it out with [`RecordView::duplicate`].
#[derive(Debug)]
pub struct RegionQuery<C: RecordCursor> {
    cursor: C,
    buf: Vec<u8>,
    state: State,
    released: bool,
}

impl<C: RecordCursor> RegionQuery<C> {
    /// Wraps a freshly opened cursor.
    pub fn new(cursor: C) -> Self {
        Self { cursor, buf: Vec::new(), state: State::Active, released: false }
    }

    /// Reads the next record, or `None` once the region is exhausted.
    ///
    /// Exhaustion releases the cursor immediately rather than waiting for
    /// drop, so engine resources are not held across further caller work.
    /// Advancing an exhausted query keeps returning `None`.
    ///
    /// # Errors
    ///
    /// [`HtsViewError::IteratorClosed`] after [`Self::close`];
    /// [`HtsViewError::Io`] on read or release failure.
    pub fn advance(&mut self) -> Result<Option<RecordView<'_>>> {
        match self.state {
            State::Closed => Err(HtsViewError::IteratorClosed),
            State::Exhausted => Ok(None),
            State::Active => {
                self.buf.clear();
                if self.cursor.read_record(&mut self.buf)? == 0 {
                    self.state = State::Exhausted;
                    self.release_once()?;
                    return Ok(None);
                }
                Ok(Some(RecordView { bytes: &self.buf }))
            }
        }
    }

    /// Ends iteration early and releases the cursor.
    ///
    /// Idempotent; subsequent [`Self::advance`] calls fail with
    /// [`HtsViewError::IteratorClosed`].
    ///
    /// # Errors
    ///
    /// [`HtsViewError::Io`] on release failure.
    pub fn close(&mut self) -> Result<()> {
        self.state = State::Closed;
        self.release_once()
    }

    fn release_once(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.cursor.release().map_err(HtsViewError::from)
    }
}

impl<C: RecordCursor> Drop for RegionQuery<C> {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            if let Err(error) = self.cursor.release() {
                warn!("failed to release region query cursor: {error}");
            }
        }
    }
}

/// A borrowed view of the record most recently read by a [`RegionQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordView<'a> {
    bytes: &'a [u8],
}

impl<'a> RecordView<'a> {
    /// The raw record bytes.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Length of the record in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Copies the record out of the shared buffer so it survives the next
    /// advance.
    #[must_use]
    pub fn duplicate(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Interprets the view as an alignment record.
    ///
    /// # Errors
    ///
    /// See [`AlignmentRecord::from_raw_bam`].
    pub fn as_alignment(&self) -> Result<AlignmentRecord> {
        AlignmentRecord::from_raw_bam(self.bytes)
    }
}

//! Lazy per-row MERGE.

use kestrel_pattern::{BindingRow, CompiledPattern};
use std::collections::VecDeque;

use crate::error::MutationResult;
use crate::executor::MutationExecutor;

/// Rows produced by merging a pattern against each upstream row in turn.
///
/// An upstream row is only merged once every row produced for the
/// previous one has been pulled, so updates applied through
/// [`MergeStream::executor`] between pulls are visible to later merges.
/// The stream stops after the first error.
pub struct MergeStream<'e, 'g, I> {
    executor: &'e mut MutationExecutor<'g>,
    pattern: &'e CompiledPattern,
    upstream: I,
    pending: VecDeque<BindingRow>,
    failed: bool,
}

impl<'e, 'g, I> MergeStream<'e, 'g, I>
where
    I: Iterator<Item = BindingRow>,
{
    pub(crate) fn new(
        executor: &'e mut MutationExecutor<'g>,
        pattern: &'e CompiledPattern,
        upstream: I,
    ) -> Self {
        Self {
            executor,
            pattern,
            upstream,
            pending: VecDeque::new(),
            failed: false,
        }
    }

    /// The executor, for applying updates to a pulled row.
    pub fn executor(&mut self) -> &mut MutationExecutor<'g> {
        self.executor
    }
}

impl<I> Iterator for MergeStream<'_, '_, I>
where
    I: Iterator<Item = BindingRow>,
{
    type Item = MutationResult<BindingRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.pop_front() {
                return Some(Ok(row));
            }
            if self.failed {
                return None;
            }
            let upstream = self.upstream.next()?;
            match self.executor.merge(self.pattern, &upstream) {
                Ok(rows) => self.pending.extend(rows),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

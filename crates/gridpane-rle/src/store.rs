// ABOUTME: RunStore, a run-length encoded sequence of a fixed logical size.
// ABOUTME: Implements lookup, sub-range copies and the run merge used by every mutator.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

use crate::RleError;

type RunList<T> = SmallVec<[Run<T>; 1]>;

/// `length` consecutive positions holding `value`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Run<T> {
    pub value: T,
    pub length: usize,
}

impl<T> Run<T> {
    pub const fn new(value: T, length: usize) -> Self {
        Self { value, length }
    }
}

/// A sequence of `len()` values stored as runs of equal values.
///
/// Every run has a non-zero length and no two neighbouring runs hold equal
/// values. Equality is structural: two stores are equal when they have the
/// same size and the same run list.
///
/// There is no internal locking; a store is meant to be owned and mutated by
/// one thread at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStore<T> {
    runs: RunList<T>,
    size: usize,
}

impl<T> Default for RunStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RunStore<T> {
    /// Count argument meaning "through the end of the store".
    pub const UNTIL_END: usize = usize::MAX;

    pub fn new() -> Self {
        Self {
            runs: SmallVec::new(),
            size: 0,
        }
    }

    /// Total number of logical positions.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn runs(&self) -> &[Run<T>] {
        &self.runs
    }

    /// Value at `position`.
    ///
    /// Panics if `position >= len()`.
    pub fn at(&self, position: usize) -> &T {
        self.at_with_span(position).0
    }

    /// Value at `position`, together with how many positions starting at
    /// `position` (inclusive) hold that same run.
    ///
    /// Panics if `position >= len()`.
    pub fn at_with_span(&self, position: usize) -> (&T, usize) {
        assert!(
            position < self.size,
            "position {position} out of range for run store of size {}",
            self.size
        );
        let (index, span) = self.locate(position);
        (&self.runs[index].value, span)
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        (position < self.size).then(|| &self.runs[self.locate(position).0].value)
    }

    /// Decompressed values, front to back.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.runs
            .iter()
            .flat_map(|run| std::iter::repeat(&run.value).take(run.length))
    }

    /// Index of the run covering `position` and how many positions from
    /// `position` onward that run still covers.
    fn locate(&self, position: usize) -> (usize, usize) {
        let mut covered = 0;
        for (index, run) in self.runs.iter().enumerate() {
            covered += run.length;
            if covered > position {
                return (index, covered - position);
            }
        }
        panic!(
            "runs cover {covered} positions but store size is {}",
            self.size
        );
    }
}

impl<T: Clone + PartialEq> RunStore<T> {
    /// A store of `size` copies of `value`.
    pub fn with_value(size: usize, value: T) -> Self {
        let mut store = Self::new();
        if size > 0 {
            store.runs.push(Run::new(value, size));
            store.size = size;
        }
        store
    }

    /// Build a store from explicit runs. Neighbouring runs with equal values
    /// are fused.
    pub fn from_runs<I>(runs: I) -> Result<Self, RleError>
    where
        I: IntoIterator<Item = Run<T>>,
    {
        let mut store = Self::new();
        for (index, run) in runs.into_iter().enumerate() {
            if run.length == 0 {
                return Err(RleError::EmptyRun { index });
            }
            store.size += run.length;
            push_run(&mut store.runs, run);
        }
        Ok(store)
    }

    /// Independent copy of `[offset, offset + count)`. `count` is clamped to
    /// the end of the store, so `UNTIL_END` copies the remainder.
    ///
    /// Panics if `offset > len()`.
    pub fn substr(&self, offset: usize, count: usize) -> Self {
        assert!(
            offset <= self.size,
            "substring offset {offset} beyond store size {}",
            self.size
        );
        let end = offset + count.min(self.size - offset);
        if end == offset {
            return Self::new();
        }

        let (first, start_span) = self.locate(offset);
        let (last, end_span) = self.locate(end - 1);
        let mut runs: RunList<T> = self.runs[first..=last].iter().cloned().collect();
        runs[0].length = start_span;
        let back = runs.len() - 1;
        runs[back].length = runs[back].length - end_span + 1;

        Self {
            runs,
            size: end - offset,
        }
    }

    /// Swap every occurrence of `old` for `new` without moving any positions.
    pub fn replace_value(&mut self, old: &T, new: T) {
        if !self.runs.iter().any(|run| run.value == *old) {
            return;
        }
        let runs = std::mem::take(&mut self.runs);
        for mut run in runs {
            if run.value == *old {
                run.value = new.clone();
            }
            push_run(&mut self.runs, run);
        }
    }

    /// Overwrite `[pos, pos + length)` with `value`.
    pub fn replace(&mut self, pos: usize, length: usize, value: T) {
        let length = if length == Self::UNTIL_END {
            self.size.saturating_sub(pos)
        } else {
            length
        };
        let mut incoming = RunList::new();
        push_run(&mut incoming, Run::new(value, length));
        self.merge(incoming, pos, length);
    }

    /// Replace `[pos, pos + length)` with the contents of `other`. The store
    /// grows or shrinks by `other.len() - length`.
    pub fn splice(&mut self, pos: usize, length: usize, other: &RunStore<T>) {
        self.merge(other.runs.clone(), pos, length);
    }

    /// Replace `[pos, pos + length)` with `other.substr(subpos, sublen)`.
    pub fn splice_from(
        &mut self,
        pos: usize,
        length: usize,
        other: &RunStore<T>,
        subpos: usize,
        sublen: usize,
    ) {
        let piece = other.substr(subpos, sublen);
        self.merge(piece.runs, pos, length);
    }

    /// Replace `[pos, pos + length)` with arbitrary runs. Zero-length runs
    /// are skipped and equal neighbours fused before merging.
    pub fn splice_runs<I>(&mut self, pos: usize, length: usize, runs: I)
    where
        I: IntoIterator<Item = Run<T>>,
    {
        let mut incoming = RunList::new();
        for run in runs {
            push_run(&mut incoming, run);
        }
        self.merge(incoming, pos, length);
    }

    /// Grow by extending the final run, or shrink by cutting the run that
    /// covers the new last position and dropping everything after it.
    ///
    /// Panics if `new_size` is zero, or when growing an empty store.
    pub fn resize(&mut self, new_size: usize) {
        assert!(new_size != 0, "cannot resize a run store to zero");

        if new_size > self.size {
            let delta = new_size - self.size;
            let Some(last) = self.runs.last_mut() else {
                panic!("cannot grow an empty run store: no value to extend");
            };
            last.length += delta;
        } else {
            let (index, span) = self.locate(new_size - 1);
            self.runs[index].length -= span - 1;
            self.runs.truncate(index + 1);
        }
        self.size = new_size;
    }

    /// Place `value` in every position from `start` to the end.
    pub fn fill(&mut self, value: T, start: usize) {
        assert!(
            start <= self.size,
            "fill start {start} beyond store size {}",
            self.size
        );
        let length = self.size - start;
        self.replace(start, length, value);
    }

    /// Merge `incoming` over `[start, start + cover)`.
    fn merge(&mut self, incoming: RunList<T>, start: usize, cover: usize) {
        assert!(
            start <= self.size,
            "splice start {start} beyond store size {}",
            self.size
        );
        let cover = if cover == Self::UNTIL_END {
            self.size - start
        } else {
            cover
        };
        assert!(
            cover <= self.size - start,
            "splice of {cover} at {start} runs past store size {}",
            self.size
        );

        let coverage: usize = incoming.iter().map(|run| run.length).sum();

        if coverage == cover {
            if let [single] = incoming.as_slice() {
                if self.runs.len() == 1 && self.runs[0].value == single.value {
                    return;
                }
                if coverage == 1 && self.replace_cell(start, &single.value) {
                    return;
                }
            }
            if start == 0 && coverage == self.size {
                self.runs = incoming;
                return;
            }
        }

        self.merge_runs(incoming, start, cover, coverage);
    }

    /// Overwrite one position in place when that can be done by editing the
    /// owning run or a neighbour. Returns false if a full merge is needed.
    fn replace_cell(&mut self, position: usize, value: &T) -> bool {
        let (index, span) = self.locate(position);
        let run_end = position + span;
        let run_start = run_end - self.runs[index].length;

        if self.runs[index].value == *value {
            return true;
        }

        let prev_matches = index > 0 && self.runs[index - 1].value == *value;
        let next_matches = index + 1 < self.runs.len() && self.runs[index + 1].value == *value;

        if self.runs[index].length == 1 {
            match (prev_matches, next_matches) {
                (true, true) => {
                    let next_length = self.runs[index + 1].length;
                    self.runs[index - 1].length += 1 + next_length;
                    self.runs.drain(index..=index + 1);
                }
                (true, false) => {
                    self.runs[index - 1].length += 1;
                    self.runs.remove(index);
                }
                (false, true) => {
                    self.runs[index + 1].length += 1;
                    self.runs.remove(index);
                }
                (false, false) => self.runs[index].value = value.clone(),
            }
            return true;
        }

        if position == run_start && prev_matches {
            self.runs[index - 1].length += 1;
            self.runs[index].length -= 1;
            return true;
        }

        if position == run_end - 1 && next_matches {
            self.runs[index].length -= 1;
            self.runs[index + 1].length += 1;
            return true;
        }

        false
    }

    /// General splice: rebuild the run list around the incoming runs.
    fn merge_runs(&mut self, incoming: RunList<T>, start: usize, cover: usize, coverage: usize) {
        let existing = std::mem::take(&mut self.runs);
        let mut merged: RunList<T> = SmallVec::with_capacity(existing.len() + incoming.len() + 1);
        let mut existing = existing.into_iter();
        let mut covered = 0;
        // Value of the last existing run consumed; part of it may lie past the covered region.
        let mut straddling: Option<T> = None;

        while covered < start {
            let Some(run) = existing.next() else { break };
            covered += run.length;
            straddling = Some(run.value.clone());
            merged.push(run);
        }
        if covered > start {
            if let Some(last) = merged.last_mut() {
                last.length -= covered - start;
            }
        }

        for run in incoming {
            push_run(&mut merged, run);
        }

        let end = start + cover;
        while covered < end {
            let Some(run) = existing.next() else { break };
            covered += run.length;
            straddling = Some(run.value);
        }
        if covered > end {
            if let Some(value) = straddling {
                push_run(&mut merged, Run::new(value, covered - end));
            }
        }

        for run in existing {
            push_run(&mut merged, run);
        }

        self.size = self.size - cover + coverage;
        self.runs = merged;
    }
}

/// Append `run`, fusing it into the last run when the values match.
fn push_run<T: PartialEq>(runs: &mut RunList<T>, run: Run<T>) {
    if run.length == 0 {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.value == run.value => last.length += run.length,
        _ => runs.push(run),
    }
}

impl<T: fmt::Debug> fmt::Display for RunStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Run of size {} contains:", self.size)?;
        for run in &self.runs {
            write!(f, " [{:?} for {}]", run.value, run.length)?;
        }
        Ok(())
    }
}

impl<T: Serialize> Serialize for RunStore<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.runs.as_slice().serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for RunStore<T>
where
    T: Deserialize<'de> + Clone + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let runs = Vec::<Run<T>>::deserialize(deserializer)?;
        RunStore::from_runs(runs).map_err(serde::de::Error::custom)
    }
}

impl<T: Clone + PartialEq> From<Run<T>> for RunStore<T> {
    fn from(run: Run<T>) -> Self {
        Self::with_value(run.length, run.value)
    }
}

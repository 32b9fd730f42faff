//! Sorting algorithms as explicit step machines
//!
//! A [`Stepper`] owns the array being sorted and the cursor state of one
//! algorithm. Each call to [`Stepper::step`] performs one comparison, swap or
//! write and reports which indices it touched, so a front end can redraw the
//! array once per frame. Positions known to be in their final place are
//! collected in [`Stepper::finalized`].

use crate::sorting::{SortAlgorithm, MIN_RUN};
use serde::Serialize;
use std::collections::BTreeSet;

/// What a single step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Indices read or written by this step
    pub highlighted: Vec<usize>,
    /// Number of finalized positions after this step
    pub finalized_len: usize,
    /// No further steps will change the array
    pub done: bool,
}

pub struct Stepper {
    algorithm: SortAlgorithm,
    values: Vec<f64>,
    finalized: BTreeSet<usize>,
    machine: Machine,
    steps: usize,
    done: bool,
}

impl Stepper {
    pub fn new(algorithm: SortAlgorithm, values: Vec<f64>) -> Self {
        let machine = Machine::new(algorithm, values.len());
        Self {
            algorithm,
            values,
            finalized: BTreeSet::new(),
            machine,
            steps: 0,
            done: false,
        }
    }

    /// Start over on new values with the same algorithm
    pub fn restart(&mut self, values: Vec<f64>) {
        *self = Self::new(self.algorithm, values);
    }

    pub fn algorithm(&self) -> SortAlgorithm {
        self.algorithm
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn finalized(&self) -> &BTreeSet<usize> {
        &self.finalized
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Steps taken since the last (re)start
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Advance by one operation
    ///
    /// Once the array is sorted every index is finalized and further calls
    /// return the same finished frame.
    pub fn step(&mut self) -> Frame {
        if !self.done {
            match self.machine.step(&mut self.values, &mut self.finalized) {
                Some(highlighted) => {
                    self.steps += 1;
                    return Frame {
                        highlighted,
                        finalized_len: self.finalized.len(),
                        done: false,
                    };
                }
                None => {
                    self.finalized.extend(0..self.values.len());
                    self.done = true;
                }
            }
        }
        Frame {
            highlighted: Vec::new(),
            finalized_len: self.finalized.len(),
            done: true,
        }
    }
}

/// Frames until (and including) the finished one
impl Iterator for Stepper {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.done {
            None
        } else {
            Some(self.step())
        }
    }
}

enum Machine {
    Insertion(Insertion),
    Quick(Quick),
    Heap(Heap),
    Merge(Merge),
    Tim(Tim),
}

impl Machine {
    fn new(algorithm: SortAlgorithm, len: usize) -> Self {
        match algorithm {
            SortAlgorithm::Insertion => Machine::Insertion(Insertion::new(0, len, true)),
            SortAlgorithm::Quick => Machine::Quick(Quick::new(len)),
            SortAlgorithm::Heap => Machine::Heap(Heap::new(len)),
            SortAlgorithm::Merge => Machine::Merge(Merge::new(len, 1, true)),
            SortAlgorithm::Tim => Machine::Tim(Tim::new(len)),
        }
    }

    /// `None` once the array is sorted
    fn step(&mut self, v: &mut [f64], finalized: &mut BTreeSet<usize>) -> Option<Vec<usize>> {
        match self {
            Machine::Insertion(m) => m.step(v, finalized),
            Machine::Quick(m) => m.step(v, finalized),
            Machine::Heap(m) => m.step(v, finalized),
            Machine::Merge(m) => m.step(v, finalized),
            Machine::Tim(m) => m.step(v, finalized),
        }
    }
}

/// Insertion sort over `v[left..end]`, one shift or placement per step
struct Insertion {
    left: usize,
    end: usize,
    i: usize,
    hole: usize,
    key: f64,
    shifting: bool,
    /// Finalize the sorted prefix as it grows (whole-array sorts only)
    track: bool,
}

impl Insertion {
    fn new(left: usize, end: usize, track: bool) -> Self {
        Self {
            left,
            end,
            i: left + 1,
            hole: left,
            key: 0.0,
            shifting: false,
            track,
        }
    }

    fn step(&mut self, v: &mut [f64], finalized: &mut BTreeSet<usize>) -> Option<Vec<usize>> {
        if !self.shifting {
            if self.i >= self.end {
                return None;
            }
            self.key = v[self.i];
            self.hole = self.i;
            self.shifting = true;
            if self.track {
                finalized.insert(self.i - 1);
            }
        }

        if self.hole > self.left && v[self.hole - 1] > self.key {
            v[self.hole] = v[self.hole - 1];
            self.hole -= 1;
            return Some(vec![self.hole, self.hole + 1]);
        }

        v[self.hole] = self.key;
        self.shifting = false;
        let placed = self.i;
        self.i += 1;
        if self.track {
            finalized.insert(placed);
        }
        Some(vec![self.hole, placed])
    }
}

/// Lomuto partition with an explicit stack of inclusive ranges
struct Quick {
    stack: Vec<(usize, usize)>,
    partition: Option<Partition>,
}

struct Partition {
    low: usize,
    high: usize,
    store: usize,
    j: usize,
}

impl Quick {
    fn new(len: usize) -> Self {
        Self {
            stack: if len > 0 { vec![(0, len - 1)] } else { Vec::new() },
            partition: None,
        }
    }

    fn step(&mut self, v: &mut [f64], finalized: &mut BTreeSet<usize>) -> Option<Vec<usize>> {
        loop {
            if let Some(p) = &mut self.partition {
                if p.j < p.high {
                    let j = p.j;
                    p.j += 1;
                    if v[j] <= v[p.high] {
                        v.swap(p.store, j);
                        let store = p.store;
                        p.store += 1;
                        return Some(vec![store, j]);
                    }
                    continue;
                }

                let (low, high, pivot) = (p.low, p.high, p.store);
                self.partition = None;
                v.swap(pivot, high);
                finalized.insert(pivot);
                if pivot > low {
                    self.stack.push((low, pivot - 1));
                }
                if pivot < high {
                    self.stack.push((pivot + 1, high));
                }
                return Some(vec![pivot, high]);
            }

            let (low, high) = self.stack.pop()?;
            if low < high {
                self.partition = Some(Partition {
                    low,
                    high,
                    store: low,
                    j: low,
                });
            } else {
                finalized.insert(low);
                return Some(Vec::new());
            }
        }
    }
}

/// Heap sort: sift-downs while building, then one extraction per root swap
struct Heap {
    len: usize,
    phase: HeapPhase,
    sift: Option<(usize, usize)>,
}

enum HeapPhase {
    /// Roots still to sift, counting down to 0
    Build(usize),
    /// Elements still inside the heap
    Extract(usize),
}

impl Heap {
    fn new(len: usize) -> Self {
        Self {
            len,
            phase: HeapPhase::Build(len / 2),
            sift: None,
        }
    }

    fn step(&mut self, v: &mut [f64], finalized: &mut BTreeSet<usize>) -> Option<Vec<usize>> {
        loop {
            if let Some((root, size)) = self.sift {
                let left = 2 * root + 1;
                let right = left + 1;
                let mut largest = root;
                if left < size && v[left] > v[largest] {
                    largest = left;
                }
                if right < size && v[right] > v[largest] {
                    largest = right;
                }
                if largest != root {
                    v.swap(root, largest);
                    self.sift = Some((largest, size));
                    return Some(vec![root, largest]);
                }
                self.sift = None;
                continue;
            }

            match self.phase {
                HeapPhase::Build(0) => self.phase = HeapPhase::Extract(self.len),
                HeapPhase::Build(roots) => {
                    self.sift = Some((roots - 1, self.len));
                    self.phase = HeapPhase::Build(roots - 1);
                }
                HeapPhase::Extract(remaining) if remaining > 1 => {
                    let end = remaining - 1;
                    v.swap(0, end);
                    finalized.insert(end);
                    self.sift = Some((0, end));
                    self.phase = HeapPhase::Extract(end);
                    return Some(vec![0, end]);
                }
                HeapPhase::Extract(_) => return None,
            }
        }
    }
}

/// Bottom-up merge sort, one comparison or write per step
struct Merge {
    len: usize,
    width: usize,
    left: usize,
    task: Option<MergeTask>,
    /// Finalize each range written during the last pass
    finalize_last_pass: bool,
}

struct MergeTask {
    left: usize,
    mid: usize,
    right: usize,
    i: usize,
    j: usize,
    merged: Vec<f64>,
    write: Option<usize>,
}

impl Merge {
    fn new(len: usize, width: usize, finalize_last_pass: bool) -> Self {
        Self {
            len,
            width,
            left: 0,
            task: None,
            finalize_last_pass,
        }
    }

    fn step(&mut self, v: &mut [f64], finalized: &mut BTreeSet<usize>) -> Option<Vec<usize>> {
        loop {
            if let Some(task) = &mut self.task {
                if let Some(k) = task.write {
                    if k < task.merged.len() {
                        v[task.left + k] = task.merged[k];
                        task.write = Some(k + 1);
                        return Some(vec![task.left + k]);
                    }
                    if self.finalize_last_pass && self.width * 2 >= self.len {
                        finalized.extend(task.left..task.right);
                    }
                    self.task = None;
                    self.left += 2 * self.width;
                    continue;
                }

                if task.i < task.mid && task.j < task.right {
                    let touched = vec![task.i, task.j];
                    if v[task.i] <= v[task.j] {
                        task.merged.push(v[task.i]);
                        task.i += 1;
                    } else {
                        task.merged.push(v[task.j]);
                        task.j += 1;
                    }
                    return Some(touched);
                }

                task.merged.extend_from_slice(&v[task.i..task.mid]);
                task.merged.extend_from_slice(&v[task.j..task.right]);
                task.i = task.mid;
                task.j = task.right;
                task.write = Some(0);
                continue;
            }

            if self.width >= self.len {
                return None;
            }
            if self.left >= self.len {
                self.width *= 2;
                self.left = 0;
                continue;
            }

            let mid = (self.left + self.width).min(self.len);
            let right = (self.left + 2 * self.width).min(self.len);
            if mid >= right {
                // lone trailing run, nothing to merge it with on this pass
                self.left += 2 * self.width;
                continue;
            }
            self.task = Some(MergeTask {
                left: self.left,
                mid,
                right,
                i: self.left,
                j: mid,
                merged: Vec::with_capacity(right - self.left),
                write: None,
            });
        }
    }
}

/// Insertion-sorted runs of [`MIN_RUN`], then bottom-up merging from that width
struct Tim {
    len: usize,
    run_start: usize,
    run: Option<Insertion>,
    merge: Merge,
}

impl Tim {
    fn new(len: usize) -> Self {
        Self {
            len,
            run_start: 0,
            run: (len > 0).then(|| Insertion::new(0, MIN_RUN.min(len), false)),
            merge: Merge::new(len, MIN_RUN, false),
        }
    }

    fn step(&mut self, v: &mut [f64], finalized: &mut BTreeSet<usize>) -> Option<Vec<usize>> {
        while let Some(run) = &mut self.run {
            if let Some(touched) = run.step(v, finalized) {
                return Some(touched);
            }
            self.run_start += MIN_RUN;
            self.run = (self.run_start < self.len).then(|| {
                Insertion::new(self.run_start, (self.run_start + MIN_RUN).min(self.len), false)
            });
        }
        self.merge.step(v, finalized)
    }
}

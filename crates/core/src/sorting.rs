//! In-place comparison sorts over any `PartialOrd + Clone` element type

use crate::error::{Error, Failure};
use crate::harness::Algorithm;
use std::fmt;
use std::str::FromStr;

/// Length of the insertion-sorted runs the hybrid sort starts from
pub const MIN_RUN: usize = 32;

/// Build a max-heap, then repeatedly move the root behind the heap
pub fn heap_sort<T: PartialOrd>(v: &mut [T]) {
    let len = v.len();
    for root in (0..len / 2).rev() {
        sift_down(v, root, len);
    }
    for end in (1..len).rev() {
        v.swap(0, end);
        sift_down(v, 0, end);
    }
}

fn sift_down<T: PartialOrd>(v: &mut [T], mut root: usize, len: usize) {
    loop {
        let left = 2 * root + 1;
        let right = left + 1;
        let mut largest = root;
        if left < len && v[left] > v[largest] {
            largest = left;
        }
        if right < len && v[right] > v[largest] {
            largest = right;
        }
        if largest == root {
            return;
        }
        v.swap(root, largest);
        root = largest;
    }
}

pub fn insertion_sort<T: PartialOrd + Clone>(v: &mut [T]) {
    for i in 1..v.len() {
        let key = v[i].clone();
        let mut hole = i;
        while hole > 0 && v[hole - 1] > key {
            v[hole] = v[hole - 1].clone();
            hole -= 1;
        }
        v[hole] = key;
    }
}

/// Top-down merge sort through a single scratch buffer
pub fn merge_sort<T: PartialOrd + Clone>(v: &mut [T]) {
    if v.len() < 2 {
        return;
    }
    let mut buffer = Vec::with_capacity(v.len());
    split_merge(v, &mut buffer);
}

fn split_merge<T: PartialOrd + Clone>(v: &mut [T], buffer: &mut Vec<T>) {
    let len = v.len();
    if len < 2 {
        return;
    }
    let mid = len / 2;
    split_merge(&mut v[..mid], buffer);
    split_merge(&mut v[mid..], buffer);
    merge(v, mid, buffer);
}

/// Stable merge of the sorted halves `v[..mid]` and `v[mid..]`
///
/// Only the left half is copied out, so `buffer` needs at most `mid` slots.
fn merge<T: PartialOrd + Clone>(v: &mut [T], mid: usize, buffer: &mut Vec<T>) {
    if mid == 0 || mid >= v.len() || v[mid - 1] <= v[mid] {
        return;
    }

    buffer.clear();
    buffer.extend_from_slice(&v[..mid]);

    let (mut i, mut j, mut k) = (0, mid, 0);
    while i < buffer.len() && j < v.len() {
        if v[j] < buffer[i] {
            v[k] = v[j].clone();
            j += 1;
        } else {
            v[k] = buffer[i].clone();
            i += 1;
        }
        k += 1;
    }
    while i < buffer.len() {
        v[k] = buffer[i].clone();
        i += 1;
        k += 1;
    }
}

/// Lomuto partition around the last element, recursing into the smaller side
pub fn quick_sort<T: PartialOrd>(v: &mut [T]) {
    let mut v = v;
    while v.len() > 1 {
        let pivot = partition(v);
        let (left, right) = std::mem::take(&mut v).split_at_mut(pivot);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quick_sort(left);
            v = right;
        } else {
            quick_sort(right);
            v = left;
        }
    }
}

fn partition<T: PartialOrd>(v: &mut [T]) -> usize {
    let high = v.len() - 1;
    let mut store = 0;
    for j in 0..high {
        if v[j] <= v[high] {
            v.swap(store, j);
            store += 1;
        }
    }
    v.swap(store, high);
    store
}

/// Hybrid sort: binary-insertion-sorted runs of [`MIN_RUN`] merged pairwise
/// with doubling width
pub fn tim_sort<T: PartialOrd + Clone>(v: &mut [T]) {
    let len = v.len();
    if len < 2 {
        return;
    }

    for start in (0..len).step_by(MIN_RUN) {
        let end = (start + MIN_RUN).min(len);
        binary_insertion_sort(&mut v[start..end]);
    }

    let mut buffer = Vec::with_capacity(len / 2 + 1);
    let mut width = MIN_RUN;
    while width < len {
        let mut left = 0;
        while left + width < len {
            let right = (left + 2 * width).min(len);
            merge(&mut v[left..right], width, &mut buffer);
            left += 2 * width;
        }
        width *= 2;
    }
}

/// Insertion sort that finds each slot by binary search (stable)
fn binary_insertion_sort<T: PartialOrd + Clone>(v: &mut [T]) {
    for i in 1..v.len() {
        let key = v[i].clone();
        let (mut lo, mut hi) = (0, i);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if key < v[mid] {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        if lo < i {
            v[lo..=i].rotate_right(1);
        }
    }
}

/// The sorting algorithms compared by the lab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortAlgorithm {
    Heap,
    Insertion,
    Merge,
    Quick,
    Tim,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 5] = [
        SortAlgorithm::Heap,
        SortAlgorithm::Insertion,
        SortAlgorithm::Merge,
        SortAlgorithm::Quick,
        SortAlgorithm::Tim,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Heap => "Heap Sort",
            Self::Insertion => "Insertion Sort",
            Self::Merge => "Merge Sort",
            Self::Quick => "Quick Sort",
            Self::Tim => "Tim Sort",
        }
    }

    pub fn sort<T: PartialOrd + Clone>(&self, v: &mut [T]) {
        match self {
            Self::Heap => heap_sort(v),
            Self::Insertion => insertion_sort(v),
            Self::Merge => merge_sort(v),
            Self::Quick => quick_sort(v),
            Self::Tim => tim_sort(v),
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortAlgorithm {
    type Err = Error;

    /// Accepts the full label ("Quick Sort") or the short name ("quick")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortAlgorithm::ALL
            .into_iter()
            .find(|a| {
                a.label().eq_ignore_ascii_case(wanted)
                    || a.label()
                        .split_whitespace()
                        .next()
                        .is_some_and(|short| short.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

impl Algorithm<Vec<f64>> for SortAlgorithm {
    fn name(&self) -> &str {
        self.label()
    }

    fn run(&mut self, input: &mut Vec<f64>) -> Result<(), Failure> {
        self.sort(input);
        std::hint::black_box(input);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn is_sorted<T: PartialOrd>(v: &[T]) -> bool {
        v.windows(2).all(|w| w[0] <= w[1])
    }

    fn random_vec(rng: &mut StdRng, len: usize) -> Vec<i64> {
        (0..len).map(|_| rng.gen_range(-50..50)).collect()
    }

    #[test]
    fn test_all_algorithms_sort_random_input() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [0, 1, 2, 3, 31, 32, 33, 64, 65, 100, 257] {
            let input = random_vec(&mut rng, len);
            let mut expected = input.clone();
            expected.sort();

            for algorithm in SortAlgorithm::ALL {
                let mut v = input.clone();
                algorithm.sort(&mut v);
                assert_eq!(v, expected, "{} on {} elements", algorithm, len);
            }
        }
    }

    #[test]
    fn test_sorted_and_reversed_inputs() {
        let sorted: Vec<i32> = (0..200).collect();
        let reversed: Vec<i32> = (0..200).rev().collect();

        for algorithm in SortAlgorithm::ALL {
            let mut a = sorted.clone();
            algorithm.sort(&mut a);
            assert_eq!(a, sorted);

            let mut b = reversed.clone();
            algorithm.sort(&mut b);
            assert_eq!(b, sorted);
        }
    }

    #[test]
    fn test_floats() {
        let mut v = vec![3.5, -1.25, 0.0, 2.0, -100.0, 99.9];
        tim_sort(&mut v);
        assert!(is_sorted(&v));
    }

    #[test]
    fn test_merge_based_sorts_are_stable() {
        #[derive(Debug, Clone)]
        struct Keyed(u8, usize);

        impl PartialEq for Keyed {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl PartialOrd for Keyed {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                self.0.partial_cmp(&other.0)
            }
        }

        let mut rng = StdRng::seed_from_u64(3);
        let input: Vec<Keyed> = (0..300).map(|i| Keyed(rng.gen_range(0..5), i)).collect();

        for sort in [merge_sort::<Keyed>, tim_sort::<Keyed>, insertion_sort::<Keyed>] {
            let mut v = input.clone();
            sort(&mut v);
            assert!(v.windows(2).all(|w| w[0].0 < w[1].0 || (w[0].0 == w[1].0 && w[0].1 < w[1].1)));
        }
    }

    #[test]
    fn test_quick_sort_on_sorted_input_keeps_stack_shallow() {
        let mut v: Vec<u32> = (0..20_000).collect();
        quick_sort(&mut v);
        assert!(is_sorted(&v));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("Quick Sort".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Quick);
        assert_eq!("tim".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Tim);
        assert!(matches!(
            "bogo".parse::<SortAlgorithm>(),
            Err(Error::UnknownAlgorithm(name)) if name == "bogo"
        ));
    }
}

//! Fibonacci numbers, seven ways
//!
//! All methods return exact arbitrary-precision results. The recursive ones
//! count their frames against a [`RecursionBudget`] and fail with
//! [`Failure::StackDepthExceeded`] instead of overflowing the stack.

use crate::error::{Error, Failure};
use crate::harness::Algorithm;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Maximum recursion depth the labs allow by default
pub const DEFAULT_RECURSION_LIMIT: usize = 99_999;

/// Upper bound on the bytes the dynamic-programming table may hold
pub const DEFAULT_TABLE_LIMIT: usize = 2 * 1024 * 1024 * 1024;

/// Largest n the naive recursion accepts; its result must fit a u128
const NAIVE_MAX_N: u64 = 186;

/// Extra fractional bits carried by the Binet computation
const BINET_GUARD_BITS: u64 = 64;

/// How deep a recursive method may go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursionBudget {
    limit: usize,
}

impl RecursionBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn enter(&self, depth: usize) -> Result<(), Failure> {
        if depth >= self.limit {
            Err(Failure::StackDepthExceeded { limit: self.limit })
        } else {
            Ok(())
        }
    }
}

impl Default for RecursionBudget {
    fn default() -> Self {
        Self::new(DEFAULT_RECURSION_LIMIT)
    }
}

/// Naive two-branch recursion, exponential time
pub fn recursive(n: u64, budget: RecursionBudget) -> Result<BigUint, Failure> {
    if n > NAIVE_MAX_N {
        return Err(Failure::Unsupported(format!(
            "naive recursion is limited to n <= {}",
            NAIVE_MAX_N
        )));
    }
    naive(n, 0, budget).map(BigUint::from)
}

fn naive(n: u64, depth: usize, budget: RecursionBudget) -> Result<u128, Failure> {
    budget.enter(depth)?;
    if n < 2 {
        return Ok(n as u128);
    }
    Ok(naive(n - 1, depth + 1, budget)? + naive(n - 2, depth + 1, budget)?)
}

/// Bottom-up table of every value up to n
///
/// The table is reserved up front; if its estimated size exceeds `table_limit`
/// bytes or the reservation fails, the run fails with
/// [`Failure::AllocationFailed`].
pub fn dynamic_programming(n: u64, table_limit: usize) -> Result<BigUint, Failure> {
    let len = usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or(Failure::AllocationFailed { bytes: usize::MAX })?;

    let estimate = table_bytes(n);
    if estimate > table_limit {
        return Err(Failure::AllocationFailed { bytes: estimate });
    }

    let mut table: Vec<BigUint> = Vec::new();
    table
        .try_reserve_exact(len)
        .map_err(|_| Failure::AllocationFailed {
            bytes: len.saturating_mul(std::mem::size_of::<BigUint>()),
        })?;

    table.push(BigUint::zero());
    if n >= 1 {
        table.push(BigUint::one());
    }
    for i in 2..len {
        let next = &table[i - 1] + &table[i - 2];
        table.push(next);
    }

    table.pop().ok_or(Failure::AllocationFailed { bytes: 0 })
}

/// Rough byte count of a table holding F(0)..=F(n)
///
/// F(i) has about 0.694 * i bits, so the digits sum to about 0.0434 * n^2
/// bytes, plus one `BigUint` header per entry.
fn table_bytes(n: u64) -> usize {
    let n = n as f64;
    let digits = 0.0434 * n * n;
    let headers = n * std::mem::size_of::<BigUint>() as f64;
    let total = digits + headers;
    if total >= usize::MAX as f64 {
        usize::MAX
    } else {
        total as usize
    }
}

/// [[a, b], [c, d]]
#[derive(Debug, Clone, PartialEq)]
struct Matrix2 {
    a: BigUint,
    b: BigUint,
    c: BigUint,
    d: BigUint,
}

impl Matrix2 {
    fn identity() -> Self {
        Self {
            a: BigUint::one(),
            b: BigUint::zero(),
            c: BigUint::zero(),
            d: BigUint::one(),
        }
    }

    fn fibonacci() -> Self {
        Self {
            a: BigUint::one(),
            b: BigUint::one(),
            c: BigUint::one(),
            d: BigUint::zero(),
        }
    }

    fn mul(&self, other: &Matrix2) -> Matrix2 {
        Matrix2 {
            a: &self.a * &other.a + &self.b * &other.c,
            b: &self.a * &other.b + &self.b * &other.d,
            c: &self.c * &other.a + &self.d * &other.c,
            d: &self.c * &other.b + &self.d * &other.d,
        }
    }
}

/// [[1, 1], [1, 0]]^(n-1) by repeated squaring
pub fn matrix_power(n: u64) -> BigUint {
    if n == 0 {
        return BigUint::zero();
    }

    let mut result = Matrix2::identity();
    let mut base = Matrix2::fibonacci();
    let mut exponent = n - 1;
    while exponent > 0 {
        if exponent.is_odd() {
            result = result.mul(&base);
        }
        exponent >>= 1;
        if exponent > 0 {
            base = base.mul(&base);
        }
    }
    result.a
}

/// Closed form round(phi^n / sqrt(5)) in fixed-point big-integer arithmetic
///
/// Values are scaled by 2^k where k grows with n (phi^n has about 0.694 * n
/// bits), so the rounding is exact for every n.
pub fn binet(n: u64) -> BigUint {
    if n == 0 {
        return BigUint::zero();
    }

    let k = precision_bits(n);
    let one = BigUint::one() << k;
    let sqrt5 = (BigUint::from(5u32) << (2 * k)).sqrt();
    let phi = (&one + &sqrt5) >> 1;

    let mut power = one;
    let mut base = phi;
    let mut exponent = n;
    while exponent > 0 {
        if exponent.is_odd() {
            power = (&power * &base) >> k;
        }
        exponent >>= 1;
        if exponent > 0 {
            base = (&base * &base) >> k;
        }
    }

    let scaled = (power << k) / &sqrt5;
    let half = BigUint::one() << (k - 1);
    (scaled + half) >> k
}

fn precision_bits(n: u64) -> usize {
    (n - n / 4 + BINET_GUARD_BITS) as usize
}

/// Cache for [`memoized`], seeded with F(0) and F(1)
#[derive(Debug, Clone)]
pub struct MemoCache {
    values: HashMap<u64, BigUint>,
}

impl MemoCache {
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert(0, BigUint::zero());
        values.insert(1, BigUint::one());
        Self { values }
    }

    /// Forget everything except the two seeds
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for MemoCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-down recursion that stores every value it computes in `cache`
pub fn memoized(
    n: u64,
    cache: &mut MemoCache,
    budget: RecursionBudget,
) -> Result<BigUint, Failure> {
    memo_step(n, 0, cache, budget)
}

fn memo_step(
    n: u64,
    depth: usize,
    cache: &mut MemoCache,
    budget: RecursionBudget,
) -> Result<BigUint, Failure> {
    if let Some(value) = cache.values.get(&n) {
        return Ok(value.clone());
    }
    budget.enter(depth)?;

    let previous = memo_step(n - 1, depth + 1, cache, budget)?;
    let before = memo_step(n - 2, depth + 1, cache, budget)?;
    let value = previous + before;
    cache.values.insert(n, value.clone());
    Ok(value)
}

/// Iteration keeping only the last two values
pub fn space_optimized(n: u64) -> BigUint {
    let mut a = BigUint::zero();
    let mut b = BigUint::one();
    for _ in 0..n {
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }
    a
}

/// F(2k) = F(k) * (2F(k+1) - F(k)), F(2k+1) = F(k)^2 + F(k+1)^2
pub fn fast_doubling(n: u64, budget: RecursionBudget) -> Result<BigUint, Failure> {
    doubling(n, 0, budget).map(|(f, _)| f)
}

fn doubling(n: u64, depth: usize, budget: RecursionBudget) -> Result<(BigUint, BigUint), Failure> {
    budget.enter(depth)?;
    if n == 0 {
        return Ok((BigUint::zero(), BigUint::one()));
    }

    let (a, b) = doubling(n / 2, depth + 1, budget)?;
    let c = &a * ((&b << 1) - &a);
    let d = &a * &a + &b * &b;
    if n.is_even() {
        Ok((c, d))
    } else {
        let sum = &c + &d;
        Ok((d, sum))
    }
}

/// The seven methods, in the order the lab reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Recursive,
    DynamicProgramming,
    MatrixPower,
    Binet,
    Memoization,
    SpaceOptimized,
    FastDoubling,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Recursive,
        Method::DynamicProgramming,
        Method::MatrixPower,
        Method::Binet,
        Method::Memoization,
        Method::SpaceOptimized,
        Method::FastDoubling,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Recursive => "Recursive",
            Self::DynamicProgramming => "Dynamic Programming",
            Self::MatrixPower => "Matrix Power",
            Self::Binet => "Binet Formula",
            Self::Memoization => "Memoization",
            Self::SpaceOptimized => "Space Optimized",
            Self::FastDoubling => "Fast Doubling",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}

/// A Fibonacci method ready to be measured, owning whatever state it needs
#[derive(Debug, Clone)]
pub struct FibonacciAlgorithm {
    method: Method,
    budget: RecursionBudget,
    table_limit: usize,
    cache: MemoCache,
}

impl FibonacciAlgorithm {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            budget: RecursionBudget::default(),
            table_limit: DEFAULT_TABLE_LIMIT,
            cache: MemoCache::new(),
        }
    }

    pub fn with_budget(mut self, budget: RecursionBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_table_limit(mut self, bytes: usize) -> Self {
        self.table_limit = bytes;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Compute F(n) with this method
    pub fn compute(&mut self, n: u64) -> Result<BigUint, Failure> {
        match self.method {
            Method::Recursive => recursive(n, self.budget),
            Method::DynamicProgramming => dynamic_programming(n, self.table_limit),
            Method::MatrixPower => Ok(matrix_power(n)),
            Method::Binet => Ok(binet(n)),
            Method::Memoization => memoized(n, &mut self.cache, self.budget),
            Method::SpaceOptimized => Ok(space_optimized(n)),
            Method::FastDoubling => fast_doubling(n, self.budget),
        }
    }
}

impl Algorithm<u64> for FibonacciAlgorithm {
    fn name(&self) -> &str {
        self.method.label()
    }

    fn run(&mut self, n: &mut u64) -> Result<(), Failure> {
        let value = self.compute(*n)?;
        std::hint::black_box(value);
        Ok(())
    }

    fn reset(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: [u64; 13] = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144];

    #[test]
    fn test_small_values() {
        let budget = RecursionBudget::default();
        for (n, expected) in FIRST.iter().enumerate() {
            let n = n as u64;
            let expected = BigUint::from(*expected);
            assert_eq!(recursive(n, budget).unwrap(), expected, "recursive({})", n);
            assert_eq!(dynamic_programming(n, DEFAULT_TABLE_LIMIT).unwrap(), expected);
            assert_eq!(matrix_power(n), expected, "matrix_power({})", n);
            assert_eq!(binet(n), expected, "binet({})", n);
            assert_eq!(space_optimized(n), expected);
            assert_eq!(fast_doubling(n, budget).unwrap(), expected);
        }
    }

    #[test]
    fn test_known_large_value() {
        let expected: BigUint = "354224848179261915075".parse().unwrap();
        assert_eq!(space_optimized(100), expected);
        assert_eq!(matrix_power(100), expected);
        assert_eq!(binet(100), expected);
        assert_eq!(fast_doubling(100, RecursionBudget::default()).unwrap(), expected);
    }

    #[test]
    fn test_binet_stays_exact() {
        for n in [70, 71, 500, 1000, 1259, 4000] {
            assert_eq!(binet(n), space_optimized(n), "binet({})", n);
        }
    }

    #[test]
    fn test_recursion_budget_exceeded() {
        let budget = RecursionBudget::new(10);
        assert_eq!(
            recursive(20, budget),
            Err(Failure::StackDepthExceeded { limit: 10 })
        );

        let mut cache = MemoCache::new();
        assert_eq!(
            memoized(50, &mut cache, budget),
            Err(Failure::StackDepthExceeded { limit: 10 })
        );
    }

    #[test]
    fn test_naive_recursion_rejects_huge_n() {
        assert!(matches!(
            recursive(1_000, RecursionBudget::default()),
            Err(Failure::Unsupported(_))
        ));
    }

    #[test]
    fn test_memoized_fills_cache() {
        let mut cache = MemoCache::new();
        let value = memoized(30, &mut cache, RecursionBudget::default()).unwrap();
        assert_eq!(value, BigUint::from(832_040u32));
        assert_eq!(cache.len(), 31);

        cache.clear();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_dynamic_programming_table_limit() {
        let outcome = dynamic_programming(500_000, DEFAULT_TABLE_LIMIT);
        assert!(matches!(outcome, Err(Failure::AllocationFailed { .. })));
        assert!(outcome.unwrap_err().is_resource_exhaustion());
    }

    #[test]
    fn test_algorithm_reset_clears_cache() {
        let mut algorithm = FibonacciAlgorithm::new(Method::Memoization);
        algorithm.run(&mut 25).unwrap();
        assert_eq!(algorithm.cache.len(), 26);

        algorithm.reset();
        assert_eq!(algorithm.cache.len(), 2);
    }

    #[test]
    fn test_method_labels() {
        assert_eq!(Method::ALL.len(), 7);
        assert_eq!(Method::Binet.to_string(), "Binet Formula");
        assert_eq!("fast doubling".parse::<Method>().unwrap(), Method::FastDoubling);
        assert!(matches!(
            "bogus".parse::<Method>(),
            Err(Error::UnknownMethod(name)) if name == "bogus"
        ));
    }
}

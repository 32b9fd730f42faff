//! Input generators for the sorting lab and the visualizer

use crate::error::Error;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// A named way to build a sorting input of a given size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    Reversed,
    AlmostSorted,
    FewUnique,
    RandomIntegers,
    Sorted,
    Sawtooth,
    AllEqualExceptOne,
    RandomFloats,
    CloseFloats,
}

impl Pattern {
    pub const ALL: [Pattern; 9] = [
        Pattern::Reversed,
        Pattern::AlmostSorted,
        Pattern::FewUnique,
        Pattern::RandomIntegers,
        Pattern::Sorted,
        Pattern::Sawtooth,
        Pattern::AllEqualExceptOne,
        Pattern::RandomFloats,
        Pattern::CloseFloats,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Reversed => "Reversed Sorted Integers",
            Self::AlmostSorted => "Almost Sorted Integers",
            Self::FewUnique => "Few Unique Integers",
            Self::RandomIntegers => "Random Integers",
            Self::Sorted => "Already Sorted Integers",
            Self::Sawtooth => "Sawtooth Pattern Integers",
            Self::AllEqualExceptOne => "All Elements Equal Except One Integer",
            Self::RandomFloats => "Random Floating-Point Numbers",
            Self::CloseFloats => "Elements Very Close in Value Floats",
        }
    }

    /// Build an input of `n` elements
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        match self {
            Self::Reversed => (1..=n).rev().map(|v| v as f64).collect(),
            Self::AlmostSorted => {
                let mut v: Vec<f64> = (1..=n).map(|v| v as f64).collect();
                if n >= 2 {
                    for _ in 0..(n / 20).max(1) {
                        let i = rng.gen_range(0..n);
                        let mut j = rng.gen_range(0..n - 1);
                        if j >= i {
                            j += 1;
                        }
                        v.swap(i, j);
                    }
                }
                v
            }
            Self::FewUnique => {
                if n == 0 {
                    return Vec::new();
                }
                let distinct = ((n as f64).sqrt() as usize).max(1);
                let values: Vec<f64> = (0..distinct)
                    .map(|_| rng.gen_range(1..=n) as f64)
                    .collect();
                (0..n)
                    .map(|_| values[rng.gen_range(0..values.len())])
                    .collect()
            }
            Self::RandomIntegers => (0..n).map(|_| rng.gen_range(1..=n) as f64).collect(),
            Self::Sorted => (1..=n).map(|v| v as f64).collect(),
            Self::Sawtooth => {
                let mut v = Vec::with_capacity(n);
                for i in 1..=n / 2 {
                    v.push(i as f64);
                    v.push((n - i + 1) as f64);
                }
                if n % 2 == 1 {
                    v.push((n / 2 + 1) as f64);
                }
                v
            }
            Self::AllEqualExceptOne => {
                let mut v = vec![5.0; n];
                if n > 0 {
                    let outlier = rng.gen_range(0..n);
                    v[outlier] = if rng.gen_bool(0.5) { 100.0 } else { -100.0 };
                }
                v
            }
            Self::RandomFloats => (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect(),
            Self::CloseFloats => (0..n)
                .map(|_| 1.0 + rng.gen_range(-0.001..0.001))
                .collect(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownPattern(s.to_string()))
    }
}

/// Starting arrangements offered by the visualizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Random,
    NearlySorted,
    Reversed,
    FewUnique,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Random,
        Preset::NearlySorted,
        Preset::Reversed,
        Preset::FewUnique,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "Random",
            Self::NearlySorted => "Nearly Sorted",
            Self::Reversed => "Reversed",
            Self::FewUnique => "Few Unique",
        }
    }

    /// Build `n` values drawn from `[min, max]`
    pub fn generate<R: Rng + ?Sized>(
        &self,
        n: usize,
        min: i64,
        max: i64,
        rng: &mut R,
    ) -> Result<Vec<f64>, Error> {
        if min > max {
            return Err(Error::ConfigError(format!(
                "range minimum {} is greater than maximum {}",
                min, max
            )));
        }

        let values = match self {
            Self::Random => (0..n).map(|_| rng.gen_range(min..=max) as f64).collect(),
            Self::NearlySorted => {
                let mut v: Vec<f64> = (0..n as i64).map(|i| (min + i) as f64).collect();
                if n >= 2 {
                    for _ in 0..(n / 10).max(1) {
                        let i = rng.gen_range(0..n);
                        let j = rng.gen_range(0..n);
                        v.swap(i, j);
                    }
                }
                v
            }
            Self::Reversed => (0..n as i64).map(|i| (min + n as i64 - i) as f64).collect(),
            Self::FewUnique => {
                let distinct: Vec<f64> = (0..5).map(|_| rng.gen_range(min..=max) as f64).collect();
                (0..n).map(|_| distinct[rng.gen_range(0..distinct.len())]).collect()
            }
        };
        Ok(values)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::UnknownPattern(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted_copy(v: &[f64]) -> Vec<f64> {
        let mut v = v.to_vec();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    #[test]
    fn test_every_pattern_has_requested_length() {
        let mut rng = StdRng::seed_from_u64(1);
        for pattern in Pattern::ALL {
            for n in [0, 1, 2, 10, 101] {
                assert_eq!(pattern.generate(n, &mut rng).len(), n, "{} with n = {}", pattern, n);
            }
        }
    }

    #[test]
    fn test_deterministic_patterns() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Pattern::Sorted.generate(4, &mut rng), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(Pattern::Reversed.generate(4, &mut rng), vec![4.0, 3.0, 2.0, 1.0]);
        assert_eq!(
            Pattern::Sawtooth.generate(5, &mut rng),
            vec![1.0, 5.0, 2.0, 4.0, 3.0]
        );
    }

    #[test]
    fn test_almost_sorted_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(9);
        let v = Pattern::AlmostSorted.generate(100, &mut rng);
        let expected: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        assert_ne!(v, expected);
        assert_eq!(sorted_copy(&v), expected);
    }

    #[test]
    fn test_value_ranges() {
        let mut rng = StdRng::seed_from_u64(5);

        let few = Pattern::FewUnique.generate(100, &mut rng);
        let mut distinct = sorted_copy(&few);
        distinct.dedup();
        assert!(distinct.len() <= 10);

        let floats = Pattern::RandomFloats.generate(500, &mut rng);
        assert!(floats.iter().all(|v| (-100.0..100.0).contains(v)));

        let close = Pattern::CloseFloats.generate(500, &mut rng);
        assert!(close.iter().all(|v| (v - 1.0).abs() <= 0.001));

        let equal = Pattern::AllEqualExceptOne.generate(50, &mut rng);
        assert_eq!(equal.iter().filter(|v| **v != 5.0).count(), 1);
    }

    #[test]
    fn test_outlier_is_plus_or_minus_one_hundred() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let v = Pattern::AllEqualExceptOne.generate(30, &mut rng);
            let outliers: Vec<f64> = v.into_iter().filter(|v| *v != 5.0).collect();
            assert_eq!(outliers.len(), 1);
            assert_eq!(outliers[0].abs(), 100.0);
        }
    }

    #[test]
    fn test_pattern_names_round_trip() {
        for pattern in Pattern::ALL {
            assert_eq!(pattern.name().parse::<Pattern>().unwrap(), pattern);
        }
        assert!(matches!("Zigzag".parse::<Pattern>(), Err(Error::UnknownPattern(_))));
    }

    #[test]
    fn test_presets() {
        let mut rng = StdRng::seed_from_u64(2);

        let reversed = Preset::Reversed.generate(5, -10, 100, &mut rng).unwrap();
        assert_eq!(reversed, vec![-5.0, -6.0, -7.0, -8.0, -9.0]);

        let few = Preset::FewUnique.generate(50, -10, 100, &mut rng).unwrap();
        let mut distinct = sorted_copy(&few);
        distinct.dedup();
        assert!(distinct.len() <= 5);
        assert!(few.iter().all(|v| (-10.0..=100.0).contains(v)));

        assert!(Preset::Random.generate(5, 10, 0, &mut rng).is_err());
        assert_eq!("nearly-sorted".parse::<Preset>().unwrap(), Preset::NearlySorted);
    }
}

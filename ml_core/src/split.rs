use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{Dataset, MlError};

/// Splits `dataset` into shuffled train and test parts.
///
/// The test part holds `ceil(test_size * n)` samples and the train part the rest. The shuffle
/// is driven by `seed`, so the same inputs always produce the same split.
///
/// # Args
/// * `dataset` - The samples to split.
/// * `test_size` - Fraction of samples for the test part, in `(0, 1)`.
/// * `seed` - Seed for the shuffle.
///
/// # Returns
/// `(train, test)`.
///
/// # Errors
/// Returns `MlError::InvalidInput` if `test_size` is outside `(0, 1)` or either part would be
/// empty.
pub fn train_test_split(
    dataset: &Dataset,
    test_size: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), MlError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MlError::InvalidInput("test_size must be in (0, 1)"));
    }

    let n = dataset.n_samples();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(MlError::InvalidInput(
            "not enough samples to produce non-empty train and test parts",
        ));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok((dataset.select(train_idx), dataset.select(test_idx)))
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;

    fn dataset(n: usize) -> Dataset {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| (i * 10 + j) as f64);
        let y = Array2::from_shape_fn((n, 1), |(i, _)| i as f64);
        Dataset::new(x, y).unwrap()
    }

    #[test]
    fn eighty_twenty() {
        let (train, test) = train_test_split(&dataset(300), 0.2, 42).unwrap();
        assert_eq!(train.n_samples(), 240);
        assert_eq!(test.n_samples(), 60);
    }

    #[test]
    fn test_size_rounds_up() {
        let (train, test) = train_test_split(&dataset(11), 0.2, 42).unwrap();
        assert_eq!(train.n_samples(), 8);
        assert_eq!(test.n_samples(), 3);
    }

    #[test]
    fn parts_are_disjoint_and_cover_everything() {
        let (train, test) = train_test_split(&dataset(50), 0.2, 7).unwrap();

        let mut seen: Vec<usize> = train
            .target(0)
            .unwrap()
            .iter()
            .chain(test.target(0).unwrap().iter())
            .map(|v| *v as usize)
            .collect();
        seen.sort_unstable();

        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        let ds = dataset(40);
        let a = train_test_split(&ds, 0.25, 42).unwrap();
        let b = train_test_split(&ds, 0.25, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rows_stay_paired() {
        let (train, _) = train_test_split(&dataset(30), 0.2, 3).unwrap();
        for (x, y) in train.features().rows().into_iter().zip(train.target(0).unwrap()) {
            assert_eq!(x[0], y * 10.0);
        }
    }

    #[test]
    fn invalid_inputs() {
        assert!(train_test_split(&dataset(10), 0.0, 42).is_err());
        assert!(train_test_split(&dataset(10), 1.0, 42).is_err());
        assert!(train_test_split(&dataset(10), f64::NAN, 42).is_err());
        assert!(train_test_split(&dataset(1), 0.2, 42).is_err());
        assert!(train_test_split(&dataset(0), 0.2, 42).is_err());
    }
}

use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

/// InputValueError is used if some simulation option or parameter does not fulfill the posed
/// requirements, e.g., a skill coefficient outside of [0.0, 1.0].
#[derive(Debug, Clone)]
pub struct InputValueError;

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value")
    }
}

impl Error for InputValueError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// argmin returns the index of the minimum value in the array x (first occurrence), or None if x
/// is empty.
pub fn argmin<T: std::cmp::PartialOrd>(x: &[T]) -> Option<usize> {
    if x.is_empty() {
        return None;
    }

    let (min_idx, _min_val) =
        x.iter()
            .enumerate()
            .fold((0, &x[0]), |(idx_min, val_min), (idx, val)| {
                if val < val_min {
                    (idx, val)
                } else {
                    (idx_min, val_min)
                }
            });
    Some(min_idx)
}

/// argsort returns the indices that sort the array x. The sort is stable, i.e. equal values keep
/// their relative order in x. Incomparable values (NaN) are treated as equal.
pub fn argsort<T: std::cmp::PartialOrd>(x: &[T], order: SortOrder) -> Vec<usize> {
    let mut idxs: Vec<usize> = (0..x.len()).collect();

    match order {
        SortOrder::Ascending => {
            idxs.sort_by(|&a, &b| x[a].partial_cmp(&x[b]).unwrap_or(Ordering::Equal))
        }
        SortOrder::Descending => {
            idxs.sort_by(|&a, &b| x[b].partial_cmp(&x[a]).unwrap_or(Ordering::Equal))
        }
    };

    idxs
}

/// mean returns the arithmetic mean of x, or None if x is empty.
pub fn mean(x: &[f64]) -> Option<f64> {
    if x.is_empty() {
        return None;
    }
    Some(x.iter().sum::<f64>() / x.len() as f64)
}

/// std_dev returns the sample standard deviation of x (n - 1 in the denominator), or None if x
/// contains less than two values.
pub fn std_dev(x: &[f64]) -> Option<f64> {
    if x.len() < 2 {
        return None;
    }
    let avg = mean(x)?;
    let sum_sq: f64 = x.iter().map(|val| (val - avg).powi(2)).sum();
    Some((sum_sq / (x.len() - 1) as f64).sqrt())
}

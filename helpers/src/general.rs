use std::error::Error;
use std::fmt;

/// ValidationError is used if a user-supplied value does not fulfill the posed requirements,
/// e.g., an empty participant identifier on race start.
#[derive(Debug, Clone)]
pub struct ValidationError(pub String);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for ValidationError {}

#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// argsort returns the indices that would sort an array. The underlying sort is stable, so
/// equal values keep their original order.
pub fn argsort<T: std::cmp::PartialOrd>(x: &[T], order: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..x.len()).collect();
    match order {
        SortOrder::Ascending => indices.sort_by(|&a, &b| x[a].partial_cmp(&x[b]).unwrap()),
        SortOrder::Descending => indices.sort_by(|&a, &b| x[b].partial_cmp(&x[a]).unwrap()),
    }
    indices
}

/// format_race_clock returns the MM:SS representation of an elapsed time used by the live
/// race display.
pub fn format_race_clock(elapsed_s: f64) -> String {
    let total_secs = elapsed_s.max(0.0) as u64;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// format_finish_time returns the seconds-with-fraction representation shown once a run
/// crosses the finish line.
pub fn format_finish_time(elapsed_s: f64) -> String {
    format!("{:.2}s", elapsed_s)
}

//! Static work partitioning for the texture worker pool.

use std::ops::Range;

/// Split `count` items into `workers` contiguous, near-equal ranges.
///
/// The remainder is spread over the first ranges, so sizes differ by at
/// most one. Empty ranges are omitted when there are more workers than
/// items.
pub fn partition_ranges(count: usize, workers: usize) -> Vec<Range<usize>> {
  let workers = workers.max(1);
  let base = count / workers;
  let remainder = count % workers;
  let mut ranges = Vec::with_capacity(workers.min(count));
  let mut start = 0;
  for w in 0..workers {
    let len = base + usize::from(w < remainder);
    if len == 0 {
      break;
    }
    ranges.push(start..start + len);
    start += len;
  }
  ranges
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_covers(count: usize, workers: usize) {
    let ranges = partition_ranges(count, workers);
    let mut next = 0;
    for r in &ranges {
      assert_eq!(r.start, next, "ranges must be contiguous");
      assert!(!r.is_empty());
      next = r.end;
    }
    assert_eq!(next, count, "ranges must cover every item");
    if count > 0 {
      let min = ranges.iter().map(|r| r.len()).min().unwrap();
      let max = ranges.iter().map(|r| r.len()).max().unwrap();
      assert!(max - min <= 1, "sizes may differ by at most one");
    }
  }

  #[test]
  fn more_items_than_workers() {
    assert_covers(4000, 8);
    assert_covers(4001, 8);
    assert_covers(17, 4);
  }

  #[test]
  fn fewer_items_than_workers() {
    assert_covers(3, 8);
    let ranges = partition_ranges(3, 8);
    assert_eq!(ranges.len(), 3);
  }

  #[test]
  fn zero_items() {
    assert!(partition_ranges(0, 4).is_empty());
  }

  #[test]
  fn zero_workers_is_clamped() {
    assert_covers(10, 0);
  }
}

//! The tile grid result envelope exchanged between shards and coordinator.

use super::bucket::{AggregationMerger, Bucket};
use super::reduce::BucketReducer;
use crate::error::{Result, TileGridError};
use crate::tile::TileKey;
use serde::{Deserialize, Serialize};
use tilegrid_types::Level;

/// An ordered bucket list together with the parameters that produced it.
///
/// All buckets share `level`. The list is kept in ranking order: highest
/// `doc_count` first, ties by ascending key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid<A = ()> {
    level: Level,
    required_size: usize,
    buckets: Vec<Bucket<A>>,
}

impl<A> TileGrid<A> {
    /// Wrap an already ordered bucket list.
    ///
    /// Fails with `InvalidInput` if any bucket's key is not at `level`.
    pub fn new(level: Level, required_size: usize, buckets: Vec<Bucket<A>>) -> Result<Self> {
        if let Some(stray) = buckets.iter().find(|b| b.key.level() != level) {
            return Err(TileGridError::InvalidInput(format!(
                "bucket '{}' is at level {}, grid is at level {}",
                stray.key,
                stray.key.level(),
                level
            )));
        }
        Ok(Self {
            level,
            required_size,
            buckets,
        })
    }

    pub(crate) fn from_parts(level: Level, required_size: usize, buckets: Vec<Bucket<A>>) -> Self {
        Self {
            level,
            required_size,
            buckets,
        }
    }

    /// An empty grid.
    pub fn empty(level: Level, required_size: usize) -> Self {
        Self::from_parts(level, required_size, Vec::new())
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn required_size(&self) -> usize {
        self.required_size
    }

    pub fn buckets(&self) -> &[Bucket<A>] {
        &self.buckets
    }

    pub fn into_buckets(self) -> Vec<Bucket<A>> {
        self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Bucket for `key`, if it made the cut.
    pub fn get(&self, key: &TileKey) -> Option<&Bucket<A>> {
        self.buckets.iter().find(|b| b.key == *key)
    }

    /// Sum of `doc_count` over the retained buckets.
    pub fn total_doc_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.doc_count).sum()
    }

    /// Reduce partial grids into one.
    ///
    /// `required_size` is taken from the first partial. Partials must share a
    /// level; an empty list is rejected since it carries no level.
    pub fn reduce<M>(partials: Vec<TileGrid<A>>, reducer: &BucketReducer<M>) -> Result<Self>
    where
        M: AggregationMerger<A>,
    {
        let (level, required_size) = match partials.first() {
            Some(first) => (first.level, first.required_size),
            None => {
                return Err(TileGridError::InvalidInput(
                    "no partial grids to reduce".to_string(),
                ));
            }
        };

        if let Some(other) = partials.iter().find(|g| g.level != level) {
            return Err(TileGridError::InvalidInput(format!(
                "cannot reduce grids of level {} and {}",
                level, other.level
            )));
        }

        let buckets = reducer.reduce(partials.into_iter().map(|g| g.buckets), required_size);
        Ok(Self::from_parts(level, required_size, buckets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::bucket::NoSubAggregations;

    fn level(l: u8) -> Level {
        Level::new(l).unwrap()
    }

    fn grid(l: u8, size: usize, buckets: &[(&str, u64)]) -> TileGrid {
        let buckets = buckets
            .iter()
            .map(|(k, c)| Bucket::count_only(k.parse().unwrap(), *c))
            .collect();
        TileGrid::new(level(l), size, buckets).unwrap()
    }

    #[test]
    fn test_new_rejects_mixed_levels() {
        let buckets = vec![
            Bucket::count_only("01".parse().unwrap(), 1),
            Bucket::count_only("012".parse().unwrap(), 1),
        ];
        assert!(TileGrid::new(level(2), 10, buckets).is_err());
    }

    #[test]
    fn test_reduce_takes_first_required_size() {
        let reducer = BucketReducer::new(NoSubAggregations);
        let a = grid(2, 2, &[("01", 3), ("02", 1)]);
        let b = grid(2, 50, &[("02", 5), ("03", 1), ("00", 2)]);

        let merged = TileGrid::reduce(vec![a, b], &reducer).unwrap();
        assert_eq!(merged.required_size(), 2);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.buckets()[0].key_as_string(), "02");
        assert_eq!(merged.buckets()[0].doc_count, 6);
        assert_eq!(merged.buckets()[1].key_as_string(), "01");
        assert_eq!(merged.total_doc_count(), 9);
    }

    #[test]
    fn test_reduce_rejects_level_mismatch() {
        let reducer = BucketReducer::new(NoSubAggregations);
        let a = grid(2, 5, &[("01", 3)]);
        let b = grid(3, 5, &[("011", 3)]);
        assert!(matches!(
            TileGrid::reduce(vec![a, b], &reducer),
            Err(TileGridError::InvalidInput(_))
        ));
        assert!(TileGrid::<()>::reduce(vec![], &reducer).is_err());
    }

    #[test]
    fn test_lookup() {
        let g = grid(1, 4, &[("3", 2), ("0", 1)]);
        assert_eq!(g.get(&"3".parse().unwrap()).map(|b| b.doc_count), Some(2));
        assert!(g.get(&"1".parse().unwrap()).is_none());
        assert!(TileGrid::<()>::empty(level(1), 4).is_empty());
    }
}

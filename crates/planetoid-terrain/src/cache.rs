//! Terrain record cache grouped by coarse angular buckets.

use std::f64::consts::{PI, TAU};

use hashbrown::HashMap;
use planetoid_geometry::{ParamCoord, VertexKey};

use crate::{TerrainError, TerrainRecord};

/// Coarse angular cell a record is filed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    /// `floor(theta / bucket_size)`.
    pub theta: i32,
    /// `floor(phi / bucket_size)`.
    pub phi: i32,
}

/// Records keyed by exact canonical position, grouped into coarse buckets.
///
/// Records are never shared between positions within a bucket and never
/// evicted, so a committed tier survives until [`TerrainCache::clear`]. The
/// bucket limit is checked once against the finite angular grid.
#[derive(Debug)]
pub struct TerrainCache {
    bucket_size: f64,
    buckets: HashMap<BucketKey, HashMap<VertexKey, TerrainRecord>>,
    records: usize,
}

impl TerrainCache {
    /// Create an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidBucketSize`] unless `bucket_size` is a
    /// positive finite angle, and [`TerrainError::BucketLimitTooSmall`] if
    /// `max_buckets` cannot hold every cell of the grid.
    pub fn try_new(bucket_size: f64, max_buckets: usize) -> Result<Self, TerrainError> {
        if !bucket_size.is_finite() || bucket_size <= 0.0 {
            return Err(TerrainError::InvalidBucketSize(bucket_size));
        }
        let required = Self::grid_cells(bucket_size);
        if required > max_buckets as f64 {
            return Err(TerrainError::BucketLimitTooSmall {
                max_buckets,
                required,
            });
        }
        Ok(Self {
            bucket_size,
            buckets: HashMap::new(),
            records: 0,
        })
    }

    /// Upper bound on the number of distinct buckets for a bucket size.
    pub fn grid_cells(bucket_size: f64) -> f64 {
        (PI / bucket_size + 1.0).ceil() * (TAU / bucket_size + 1.0).ceil()
    }

    /// Bucket of a canonical position.
    pub fn bucket_key(&self, key: VertexKey) -> BucketKey {
        let ParamCoord { theta, phi } = key.coord();
        BucketKey {
            theta: (theta / self.bucket_size).floor() as i32,
            phi: (phi / self.bucket_size).floor() as i32,
        }
    }

    /// Cached record of a position.
    pub fn get(&self, key: VertexKey) -> Option<&TerrainRecord> {
        self.buckets.get(&self.bucket_key(key))?.get(&key)
    }

    /// Take a record out for refinement.
    pub fn take(&mut self, key: VertexKey) -> Option<TerrainRecord> {
        let bucket = self.bucket_key(key);
        let record = self.buckets.get_mut(&bucket)?.remove(&key)?;
        self.records -= 1;
        Some(record)
    }

    /// Store a record, replacing any previous one at the same position.
    pub fn insert(&mut self, key: VertexKey, record: TerrainRecord) {
        let bucket = self.bucket_key(key);
        if self
            .buckets
            .entry(bucket)
            .or_default()
            .insert(key, record)
            .is_none()
        {
            self.records += 1;
        }
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.records = 0;
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.records
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Number of buckets in use.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Angular bucket size in radians.
    pub fn bucket_size(&self) -> f64 {
        self.bucket_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BiomeKind;

    fn record(height: f64) -> TerrainRecord {
        TerrainRecord {
            height,
            features: Vec::new(),
            temperature: 10.0,
            biome: BiomeKind::Temperate,
            tier_heights: vec![height],
        }
    }

    fn key(theta: f64, phi: f64) -> VertexKey {
        VertexKey::new(ParamCoord::new(theta, phi))
    }

    #[test]
    fn test_nearby_positions_share_bucket_not_record() {
        let mut cache = TerrainCache::try_new(0.1, 16).unwrap();
        let a = key(1.01, 2.01);
        let b = key(1.02, 2.03);
        assert_eq!(cache.bucket_key(a), cache.bucket_key(b));

        cache.insert(a, record(0.1));
        cache.insert(b, record(0.2));
        assert_eq!(cache.bucket_count(), 1);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(a).map(|r| r.height), Some(0.1));
        assert_eq!(cache.get(b).map(|r| r.height), Some(0.2));
    }

    #[test]
    fn test_take_and_reinsert() {
        let mut cache = TerrainCache::try_new(0.1, 16).unwrap();
        let k = key(0.5, 0.5);
        cache.insert(k, record(0.3));
        let r = cache.take(k).unwrap();
        assert!(cache.is_empty());
        assert!(cache.get(k).is_none());
        cache.insert(k, r);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_bucket_limit_must_cover_grid() {
        let cells = TerrainCache::grid_cells(0.1);
        assert_eq!(cells, 33.0 * 64.0);
        assert!(TerrainCache::try_new(0.1, cells as usize).is_ok());
        assert_eq!(
            TerrainCache::try_new(0.1, 2).err(),
            Some(TerrainError::BucketLimitTooSmall {
                max_buckets: 2,
                required: cells,
            })
        );
        assert!(TerrainCache::try_new(1e-12, usize::MAX).is_err());
    }

    #[test]
    fn test_every_bucket_keeps_its_records() {
        let mut cache = TerrainCache::try_new(0.5, 128).unwrap();
        let mut keys = Vec::new();
        for i in 0..7 {
            for j in 0..13 {
                let k = key(i as f64 * 0.5 + 0.01, j as f64 * 0.5 + 0.01);
                cache.insert(k, record(i as f64 + j as f64 * 0.01));
                keys.push(k);
            }
        }
        assert!(cache.bucket_count() as f64 <= TerrainCache::grid_cells(0.5));
        assert_eq!(cache.len(), keys.len());
        assert!(keys.iter().all(|k| cache.get(*k).is_some()));
    }

    #[test]
    fn test_rejects_bad_bucket_size() {
        assert_eq!(
            TerrainCache::try_new(0.0, 4).err(),
            Some(TerrainError::InvalidBucketSize(0.0))
        );
        assert!(TerrainCache::try_new(f64::NAN, 4).is_err());
    }

    #[test]
    fn test_clear() {
        let mut cache = TerrainCache::try_new(0.1, 16).unwrap();
        cache.insert(key(0.5, 0.5), record(0.0));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.bucket_count(), 0);
    }
}

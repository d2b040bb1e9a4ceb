use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use log::{debug, trace};

use crate::path::{PathTransform, TransformedPath};
#[cfg(feature = "serde")]
use crate::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    text: String,
    scale: u64,
    rotate_angle: u64,
    rotate_pivot: (u64, u64),
    mirror: bool,
    center: bool,
}

impl CacheKey {
    pub fn new(text: &str, params: &PathTransform) -> Self {
        Self {
            text: text.to_string(),
            scale: params.scale.to_bits(),
            rotate_angle: params.rotate_angle.to_bits(),
            rotate_pivot: (params.rotate_pivot.x.to_bits(), params.rotate_pivot.y.to_bits()),
            mirror: params.mirror,
            center: params.center,
        }
    }

    #[cfg(feature = "serde")]
    fn params(&self) -> PathTransform {
        PathTransform {
            scale: f64::from_bits(self.scale),
            rotate_angle: f64::from_bits(self.rotate_angle),
            rotate_pivot: crate::spacial::Point::new(
                f64::from_bits(self.rotate_pivot.0),
                f64::from_bits(self.rotate_pivot.1),
            ),
            mirror: self.mirror,
            center: self.center,
        }
    }
}

#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: Mutex<HashMap<CacheKey, TransformedPath>>,
}

impl GeometryCache {
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, TransformedPath>> {
        // entries are only ever inserted whole, a poisoned map is still consistent
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &CacheKey) -> Option<TransformedPath> {
        self.entries().get(key).cloned()
    }

    pub fn get_or_insert_with<F>(&self, key: CacheKey, compute: F) -> TransformedPath
    where
        F: FnOnce() -> TransformedPath,
    {
        if let Some(hit) = self.get(&key) {
            trace!("geometry cache hit. path: '{}'", key.text);
            return hit;
        }

        debug!("geometry cache miss. path: '{}'", key.text);
        let value = compute();
        self.entries()
            .entry(key)
            .or_insert(value)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

#[cfg(feature = "serde")]
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CacheRecord {
    path: String,
    scale: f64,
    rotate_angle: f64,
    rotate_pivot: [f64; 2],
    mirror: bool,
    center: bool,
    transformed: String,
    mirrored: String,
}

#[cfg(feature = "serde")]
impl GeometryCache {
    /// Load a cache written by [`GeometryCache::save`].
    pub fn load(file_path: impl AsRef<std::path::Path>) -> Result<Self, crate::Error> {
        let file = std::fs::File::open(file_path.as_ref())?;
        let records: Vec<CacheRecord> = serde_json::from_reader(std::io::BufReader::new(file))?;

        let mut entries = HashMap::with_capacity(records.len());
        for record in records {
            let params = PathTransform {
                scale: record.scale,
                rotate_angle: record.rotate_angle,
                rotate_pivot: crate::spacial::Point::new(record.rotate_pivot[0], record.rotate_pivot[1]),
                mirror: record.mirror,
                center: record.center,
            };
            let parse = |text: &str| {
                Path::parse(text).map_err(|source| crate::Error::Path {
                    text: text.to_string(),
                    source,
                })
            };
            let value = TransformedPath {
                path: parse(&record.transformed)?,
                mirrored: parse(&record.mirrored)?,
            };
            entries.insert(CacheKey::new(&record.path, &params), value);
        }
        debug!("loaded {} geometry cache entries", entries.len());

        Ok(Self {
            entries: Mutex::new(entries),
        })
    }

    pub fn save(&self, file_path: impl AsRef<std::path::Path>) -> Result<(), crate::Error> {
        let mut records = self
            .entries()
            .iter()
            .map(|(key, value)| {
                let params = key.params();
                CacheRecord {
                    path: key.text.clone(),
                    scale: params.scale,
                    rotate_angle: params.rotate_angle,
                    rotate_pivot: [params.rotate_pivot.x, params.rotate_pivot.y],
                    mirror: params.mirror,
                    center: params.center,
                    transformed: value.path.to_string(),
                    mirrored: value.mirrored.to_string(),
                }
            })
            .collect::<Vec<_>>();
        records.sort_by(|a, b| a.path.cmp(&b.path));

        let file = std::fs::File::create(file_path.as_ref())?;
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(std::io::BufWriter::new(file), formatter);
        serde::Serialize::serialize(&records, &mut serializer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;

    #[test]
    fn test_insert_if_absent() {
        // given
        let cache = GeometryCache::default();
        let path = Path::parse("m 0,0 h 2 v 2 z").unwrap();
        let params = PathTransform::default();
        let key = CacheKey::new(path.original(), &params);

        // when
        let first = cache.get_or_insert_with(key.clone(), || path.transform(&params));
        let second = cache.get_or_insert_with(key.clone(), || panic!("must not recompute"));

        // then
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_distinguish_parameters() {
        // given
        let params = PathTransform::default();
        let mirrored = PathTransform {
            mirror: true,
            ..params
        };

        // expect
        assert_ne!(CacheKey::new("m 0,0 h 1", &params), CacheKey::new("m 0,0 h 1", &mirrored));
        assert_ne!(CacheKey::new("m 0,0 h 1", &params), CacheKey::new("m 0,0 h 2", &params));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_save_and_load() {
        // given
        let directory = tempfile::tempdir().unwrap();
        let file_path = directory.path().join("geometry.json");
        let cache = GeometryCache::default();
        let path = Path::parse("m 1,1 c 1,-1 2,-1 3,0 l 0.1,0.7 z").unwrap();
        let params = PathTransform {
            rotate_angle: 33.3,
            scale: 1.7,
            mirror: true,
            ..PathTransform::default()
        };
        let expected = cache.get_or_insert_with(CacheKey::new(path.original(), &params), || path.transform(&params));

        // when
        cache.save(&file_path).unwrap();
        let loaded = GeometryCache::load(&file_path).unwrap();

        // then
        assert_eq!(loaded.get(&CacheKey::new(path.original(), &params)), Some(expected));
    }
}

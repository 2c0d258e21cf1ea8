//! Broad-phase bounding-box index over polygons.
//!
//! Entries are sorted by `min_lon` so a query can stop scanning as soon as
//! an entry starts east of the query box. Hits are candidates only: a
//! reported index means the bounding boxes overlap, not the polygons.

use std::collections::BTreeSet;

use sortie_core::types::{BoundingBox, Polygon};

#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    entries: Vec<(BoundingBox, usize)>,
}

impl SpatialIndex {
    /// Index `(id, polygon)` pairs. Empty polygons are skipped.
    pub fn build<'a>(polygons: impl IntoIterator<Item = (usize, &'a Polygon)>) -> Self {
        let mut entries: Vec<(BoundingBox, usize)> = polygons
            .into_iter()
            .filter_map(|(id, polygon)| polygon.bbox().map(|bbox| (bbox, id)))
            .collect();
        entries.sort_by(|a, b| a.0.min_lon.total_cmp(&b.0.min_lon));
        Self { entries }
    }

    /// Ids whose bounding box overlaps `query`, ascending.
    pub fn query(&self, query: &BoundingBox) -> BTreeSet<usize> {
        self.entries
            .iter()
            .take_while(|(bbox, _)| bbox.min_lon <= query.max_lon)
            .filter(|(bbox, _)| bbox.intersects(query))
            .map(|(_, id)| *id)
            .collect()
    }

    /// Candidates for a polygon footprint. Empty footprints hit nothing.
    pub fn query_polygon(&self, footprint: &Polygon) -> BTreeSet<usize> {
        match footprint.bbox() {
            Some(bbox) => self.query(&bbox),
            None => BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

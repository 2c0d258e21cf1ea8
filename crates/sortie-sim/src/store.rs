//! Index-stable arena of objects of interest.
//!
//! Objects are never added or removed after initialization. Geometry and
//! state change in place, so an index stays valid for the whole mission.

use sortie_core::enums::ObjectState;
use sortie_core::types::Polygon;
use sortie_geo::shrink;

/// A fire perimeter or a survivor marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectOfInterest {
    pub index: usize,
    pub polygon: Polygon,
    pub state: ObjectState,
}

impl ObjectOfInterest {
    pub fn is_alive_fire(&self) -> bool {
        matches!(self.state, ObjectState::Fire { alive: true })
    }

    pub fn is_survivor(&self) -> bool {
        matches!(self.state, ObjectState::Survivor { .. })
    }
}

/// Result of a shrink request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkOutcome {
    /// Nothing to do: not an alive fire, bad index or bad factor.
    Unchanged,
    Shrunk,
    /// The polygon collapsed and the fire is out.
    Extinguished,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectOfInterestStore {
    objects: Vec<ObjectOfInterest>,
}

impl ObjectOfInterestStore {
    /// Store of alive fires, indexed in the given order.
    pub fn with_fires(polygons: Vec<Polygon>) -> Self {
        Self::from_states(polygons, ObjectState::Fire { alive: true })
    }

    /// Store of unfound survivor markers, indexed in the given order.
    pub fn with_survivors(markers: Vec<Polygon>) -> Self {
        Self::from_states(markers, ObjectState::Survivor { found: false })
    }

    fn from_states(polygons: Vec<Polygon>, state: ObjectState) -> Self {
        let objects = polygons
            .into_iter()
            .enumerate()
            .map(|(index, polygon)| ObjectOfInterest {
                index,
                polygon,
                state,
            })
            .collect();
        Self { objects }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ObjectOfInterest> {
        self.objects.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectOfInterest> {
        self.objects.iter()
    }

    /// Erode fire `index` by `factor` of its bounding-box half diagonal.
    pub fn shrink(&mut self, index: usize, factor: f64) -> ShrinkOutcome {
        let Some(object) = self.objects.get_mut(index) else {
            return ShrinkOutcome::Unchanged;
        };
        if !object.is_alive_fire() || !factor.is_finite() || factor <= 0.0 {
            return ShrinkOutcome::Unchanged;
        }

        let shrunk = shrink(&object.polygon, factor);
        if shrunk.is_empty() {
            object.polygon = Polygon::Empty;
            object.state = ObjectState::Fire { alive: false };
            ShrinkOutcome::Extinguished
        } else {
            object.polygon = shrunk;
            ShrinkOutcome::Shrunk
        }
    }

    /// Flag survivor `index` as found. True only on the first call.
    pub fn mark_found(&mut self, index: usize) -> bool {
        match self.objects.get_mut(index) {
            Some(object) if object.state == (ObjectState::Survivor { found: false }) => {
                object.state = ObjectState::Survivor { found: true };
                true
            }
            _ => false,
        }
    }

    /// `(index, polygon)` of every fire still burning.
    pub fn alive_fire_entries(&self) -> impl Iterator<Item = (usize, &Polygon)> {
        self.objects
            .iter()
            .filter(|o| o.is_alive_fire())
            .map(|o| (o.index, &o.polygon))
    }

    /// `(index, marker)` of every survivor, found or not.
    pub fn survivor_entries(&self) -> impl Iterator<Item = (usize, &Polygon)> {
        self.objects
            .iter()
            .filter(|o| o.is_survivor())
            .map(|o| (o.index, &o.polygon))
    }

    /// Remaining fire area in km² (constant-radius scaling).
    pub fn total_fire_area_km2(&self) -> f64 {
        self.alive_fire_entries().map(|(_, p)| p.area_km2()).sum()
    }
}

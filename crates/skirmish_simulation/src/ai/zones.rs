//! Zones: ограниченные области для wander/relocate
//!
//! Zone collaborator в минимальном виде: AABB + contains + random point.
//! Membership определяется первой зоной (по порядку регистрации), содержащей позицию.

use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub name: String,
    pub min: Vec3,
    pub max: Vec3,
}

impl Zone {
    /// Углы в любом порядке — нормализуем в min/max
    pub fn from_corners(name: impl Into<String>, a: Vec3, b: Vec3) -> Self {
        Self {
            name: name.into(),
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center(name: impl Into<String>, center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self::from_corners(name, center - half, center + half)
    }

    /// Границы включительно
    pub fn contains(&self, position: Vec3) -> bool {
        position.cmpge(self.min).all() && position.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Равномерная точка внутри AABB (вырожденные оси → min)
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let t = Vec3::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>());
        self.min + (self.max - self.min) * t
    }
}

/// Все известные зоны уровня (Resource)
#[derive(Resource, Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, zone: Zone) -> ZoneId {
        self.zones.push(zone);
        ZoneId(self.zones.len() - 1)
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, &Zone)> {
        self.zones.iter().enumerate().map(|(index, zone)| (ZoneId(index), zone))
    }

    /// Первая зона, содержащая позицию; иначе None
    pub fn zone_at(&self, position: Vec3) -> Option<ZoneId> {
        self.iter()
            .find(|(_, zone)| zone.contains(position))
            .map(|(id, _)| id)
    }

    /// Случайная зона, отличная от `current`
    pub fn pick_other<R: Rng + ?Sized>(&self, current: Option<ZoneId>, rng: &mut R) -> Option<ZoneId> {
        let candidates: Vec<ZoneId> = self
            .iter()
            .map(|(id, _)| id)
            .filter(|id| Some(*id) != current)
            .collect();

        if candidates.is_empty() {
            return None;
        }

        Some(candidates[rng.gen_range(0..candidates.len())])
    }
}

//! Spatial query collaborator: AABB и регионы запросов (box / ray)

use bevy::prelude::*;

/// Axis-aligned box (center + half extents)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Пересечение с другим box (касание гранями не считается)
    pub fn intersects(&self, other: &Aabb) -> bool {
        let gap = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        gap.x < reach.x && gap.y < reach.y
    }

    /// Пересечение с отрезком `from → to` (slab test)
    pub fn intersects_segment(&self, from: Vec2, to: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        let direction = to - from;

        let mut t_enter = 0.0f32;
        let mut t_exit = 1.0f32;

        for axis in 0..2 {
            let origin = from[axis];
            let step = direction[axis];

            if step.abs() < f32::EPSILON {
                if origin < min[axis] || origin > max[axis] {
                    return false;
                }
                continue;
            }

            let inverse = 1.0 / step;
            let mut t_near = (min[axis] - origin) * inverse;
            let mut t_far = (max[axis] - origin) * inverse;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }

            t_enter = t_enter.max(t_near);
            t_exit = t_exit.min(t_far);
            if t_enter > t_exit {
                return false;
            }
        }

        true
    }
}

/// Регион spatial query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryRegion {
    Box(Aabb),
    Ray { from: Vec2, to: Vec2 },
}

impl QueryRegion {
    pub fn hits(&self, bounds: &Aabb) -> bool {
        match self {
            QueryRegion::Box(area) => area.intersects(bounds),
            QueryRegion::Ray { from, to } => bounds.intersects_segment(*from, *to),
        }
    }
}

/// Все тела, попавшие в регион (порядок входа сохраняется)
pub fn intersect_region<I>(region: &QueryRegion, bodies: I) -> Vec<Entity>
where
    I: IntoIterator<Item = (Entity, Aabb)>,
{
    bodies
        .into_iter()
        .filter(|(_, bounds)| region.hits(bounds))
        .map(|(entity, _)| entity)
        .collect()
}

// src/clustering.rs - Grouping boundary hits into intercepts

use serde::Serialize;

use crate::path_algorithms::calculate_straight_path_length;

/// Consecutive boundary hits counted as one grain boundary intercept
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterceptGroup {
    pub pixels: Vec<(u32, u32)>,
}

impl InterceptGroup {
    fn starting_at(pixel: (u32, u32)) -> Self {
        Self { pixels: vec![pixel] }
    }

    /// Upper-left and lower-right corners of the group
    pub fn bounding_box(&self) -> Option<((u32, u32), (u32, u32))> {
        let first = *self.pixels.first()?;
        let bbox = self.pixels.iter().fold((first, first), |(min, max), &(x, y)| {
            ((min.0.min(x), min.1.min(y)), (max.0.max(x), max.1.max(y)))
        });
        Some(bbox)
    }
}

/// Split scan-ordered boundary hits into intercept groups
///
/// Each point is compared with the point scanned immediately before it: at a
/// distance of at most `cutoff` it joins the current group, otherwise it opens
/// a new one. This is a chain rule, not connected components, so the result
/// depends on the input order.
pub fn group_intercepts(points: &[(u32, u32)], cutoff: f64) -> Vec<InterceptGroup> {
    let mut groups: Vec<InterceptGroup> = Vec::new();
    let mut previous: Option<(u32, u32)> = None;

    for &point in points {
        let joins = previous
            .is_some_and(|prev| calculate_straight_path_length(prev, point) <= cutoff);

        match groups.last_mut() {
            Some(group) if joins => group.pixels.push(point),
            _ => groups.push(InterceptGroup::starting_at(point)),
        }

        previous = Some(point);
    }

    groups
}

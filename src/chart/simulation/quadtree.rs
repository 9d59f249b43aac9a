use std::ops::Range;

use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 4;
const MAX_DEPTH: u8 = 16;

/// Square region of the layout plane, `min` being its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Cell {
    pub(super) min: Vec2,
    pub(super) size: f32,
}

impl Cell {
    fn covering(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for point in rest {
            min = min.min(*point);
            max = max.max(*point);
        }
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        Some(Self {
            min,
            size: (max - min).max_elem().max(1.0),
        })
    }

    fn mid(self) -> Vec2 {
        self.min + Vec2::splat(self.size * 0.5)
    }

    fn quarter(self, quadrant: usize) -> Self {
        let half = self.size * 0.5;
        let step = vec2((quadrant & 1) as f32, (quadrant >> 1) as f32) * half;
        Self {
            min: self.min + step,
            size: half,
        }
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let max = self.min + Vec2::splat(self.size);
        point.x >= self.min.x && point.y >= self.min.y && point.x <= max.x && point.y <= max.y
    }

    /// Squared distance from `point` to the nearest edge; zero inside.
    pub(super) fn gap_sq(self, point: Vec2) -> f32 {
        let max = self.min + Vec2::splat(self.size);
        (self.min - point).max(point - max).max(Vec2::ZERO).length_sq()
    }
}

fn quadrant_of(mid: Vec2, point: Vec2) -> usize {
    usize::from(point.x >= mid.x) | (usize::from(point.y >= mid.y) << 1)
}

pub(super) struct Branch {
    pub(super) cell: Cell,
    /// Largest radius of any point under this branch.
    pub(super) max_radius: f32,
    pub(super) weight: f32,
    pub(super) centroid: Vec2,
    children: [Option<usize>; 4],
    members: Range<usize>,
}

impl Branch {
    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// Arena quadtree over one snapshot of points. Every branch owns a
/// contiguous run of `order`, so aggregates come straight from that run.
pub(super) struct QuadTree {
    branches: Vec<Branch>,
    order: Vec<usize>,
}

impl QuadTree {
    /// `radii` may be shorter than `points`; missing radii count as zero.
    pub(super) fn build(points: &[Vec2], radii: &[f32]) -> Option<Self> {
        let cell = Cell::covering(points)?;
        let mut tree = Self {
            branches: Vec::new(),
            order: (0..points.len()).collect(),
        };
        tree.grow(cell, 0..points.len(), 0, points, radii);
        Some(tree)
    }

    fn grow(
        &mut self,
        cell: Cell,
        members: Range<usize>,
        depth: u8,
        points: &[Vec2],
        radii: &[f32],
    ) -> usize {
        let id = self.branches.len();
        self.branches.push(Branch {
            cell,
            max_radius: 0.0,
            weight: 0.0,
            centroid: Vec2::ZERO,
            children: [None; 4],
            members: members.clone(),
        });

        if members.len() > LEAF_CAPACITY && depth < MAX_DEPTH {
            let mid = cell.mid();
            self.order[members.clone()]
                .sort_unstable_by_key(|&index| quadrant_of(mid, points[index]));

            let mut start = members.start;
            for quadrant in 0..4 {
                let end = start
                    + self.order[start..members.end]
                        .iter()
                        .take_while(|&&index| quadrant_of(mid, points[index]) == quadrant)
                        .count();
                if end > start {
                    let child =
                        self.grow(cell.quarter(quadrant), start..end, depth + 1, points, radii);
                    self.branches[id].children[quadrant] = Some(child);
                }
                start = end;
            }
        }

        let mut max_radius = 0.0_f32;
        let mut sum = Vec2::ZERO;
        for &index in &self.order[members.clone()] {
            max_radius = max_radius.max(radii.get(index).copied().unwrap_or(0.0));
            sum += points[index];
        }
        let weight = members.len() as f32;

        let branch = &mut self.branches[id];
        branch.max_radius = max_radius;
        branch.weight = weight;
        branch.centroid = sum / weight;
        id
    }

    pub(super) fn root(&self) -> Option<&Branch> {
        self.branches.first()
    }

    pub(super) fn children<'a>(
        &'a self,
        branch: &'a Branch,
    ) -> impl Iterator<Item = &'a Branch> + 'a {
        branch.children.iter().flatten().map(|&id| &self.branches[id])
    }

    pub(super) fn members(&self, branch: &Branch) -> &[usize] {
        &self.order[branch.members.clone()]
    }

    /// Calls `visit` for every point of every leaf whose cell comes within
    /// `radius + max_radius` of `point`.
    pub(super) fn for_each_near(&self, point: Vec2, radius: f32, mut visit: impl FnMut(usize)) {
        if let Some(root) = self.root() {
            self.near(root, point, radius, &mut visit);
        }
    }

    fn near(&self, branch: &Branch, point: Vec2, radius: f32, visit: &mut impl FnMut(usize)) {
        let reach = radius + branch.max_radius;
        if branch.cell.gap_sq(point) > reach * reach {
            return;
        }

        if branch.is_leaf() {
            for &index in self.members(branch) {
                visit(index);
            }
            return;
        }
        for child in self.children(branch) {
            self.near(child, point, radius, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_members(tree: &QuadTree, branch: &Branch, out: &mut Vec<usize>) {
        if branch.is_leaf() {
            out.extend_from_slice(tree.members(branch));
            return;
        }
        for child in tree.children(branch) {
            leaf_members(tree, child, out);
        }
    }

    fn grid(count: usize) -> Vec<Vec2> {
        (0..count)
            .map(|index| vec2((index % 8) as f32 * 30.0, (index / 8) as f32 * 30.0))
            .collect()
    }

    #[test]
    fn every_point_lands_in_exactly_one_leaf() {
        let points = grid(64);
        let tree = QuadTree::build(&points, &[]).expect("finite points build");
        let root = tree.root().expect("root exists");

        assert!(!root.is_leaf());
        assert_eq!(root.weight, 64.0);

        let mut members = Vec::new();
        leaf_members(&tree, root, &mut members);
        members.sort_unstable();
        assert_eq!(members, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn leaves_hold_their_own_points() {
        let points = grid(40);
        let tree = QuadTree::build(&points, &[]).expect("finite points build");

        let mut stack = vec![tree.root().expect("root exists")];
        while let Some(branch) = stack.pop() {
            for &index in tree.members(branch) {
                assert!(branch.cell.contains(points[index]));
            }
            stack.extend(tree.children(branch));
        }
    }

    #[test]
    fn branches_track_largest_radius_and_centroid() {
        let points = vec![
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(0.0, 10.0),
            vec2(10.0, 10.0),
            vec2(100.0, 100.0),
        ];
        let radii = [3.0, 4.0, 5.0, 6.0, 40.0];
        let tree = QuadTree::build(&points, &radii).expect("finite points build");
        let root = tree.root().expect("root exists");

        assert_eq!(root.max_radius, 40.0);
        assert_eq!(root.centroid, vec2(24.0, 24.0));

        let near_origin = tree
            .children(root)
            .find(|child| child.cell.contains(Vec2::ZERO))
            .expect("origin quadrant");
        assert_eq!(near_origin.max_radius, 6.0);
        assert_eq!(near_origin.weight, 4.0);
    }

    #[test]
    fn coincident_points_stop_at_depth_limit() {
        let points = vec![Vec2::ZERO; 20];
        let tree = QuadTree::build(&points, &[]).expect("finite points build");

        let mut members = Vec::new();
        leaf_members(&tree, tree.root().expect("root exists"), &mut members);
        assert_eq!(members.len(), 20);
    }

    #[test]
    fn non_finite_points_build_nothing() {
        assert!(QuadTree::build(&[Vec2::ZERO, vec2(f32::NAN, 0.0)], &[]).is_none());
        assert!(QuadTree::build(&[], &[]).is_none());
    }

    #[test]
    fn near_search_reaches_large_neighbours_in_distant_cells() {
        let mut points = grid(16);
        points.push(vec2(400.0, 400.0));
        let mut radii = vec![5.0; 16];
        radii.push(500.0);
        let tree = QuadTree::build(&points, &radii).expect("finite points build");

        let mut seen = Vec::new();
        tree.for_each_near(vec2(-50.0, -50.0), 5.0, |index| seen.push(index));
        assert!(seen.contains(&16));

        radii[16] = 5.0;
        let tree = QuadTree::build(&points, &radii).expect("finite points build");
        seen.clear();
        tree.for_each_near(vec2(-50.0, -50.0), 5.0, |index| seen.push(index));
        assert!(seen.is_empty());
    }

    #[test]
    fn gap_is_zero_inside_cell() {
        let cell = Cell {
            min: vec2(-10.0, -10.0),
            size: 20.0,
        };
        assert_eq!(cell.gap_sq(vec2(5.0, -5.0)), 0.0);
        assert_eq!(cell.gap_sq(vec2(13.0, 14.0)), 25.0);
        assert!(cell.contains(vec2(10.0, 10.0)));
        assert!(!cell.contains(vec2(10.5, 0.0)));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Indexed-vertex (CityJSON) form of the geometry model
//!
//! A geometry converts to a local vertex list plus a nested boundary
//! index tree. Nesting depth encodes topology:
//!
//! - Point: flat one-index list
//! - LineString: `[[i, j]]`
//! - Polygon: flat ring `[i0..in]`
//! - CompositePolygon: one `[[ring]]` per member (one level deeper, so
//!   interior rings stay representable even though they are unused)
//! - Solid: `[surface]` (wraps the composite boundary one level)
//! - CompositeSolid: list of per-solid boundary lists
//!
//! When children are aggregated, their vertex lists are concatenated in
//! traversal order and every child index is offset by the number of
//! vertices contributed by earlier children. The offset is applied
//! bottom-up, exactly once per aggregation step.

use crate::geometry::{CompositePolygon, CompositeSolid, Geometry, Polygon, Solid};
use crate::types::Point3;

/// Strongly typed nested boundary index list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTree {
    Leaf(usize),
    Group(Vec<IndexTree>),
}

impl IndexTree {
    /// Pure index shift: every leaf moved up by `n`
    pub fn offset(&self, n: usize) -> IndexTree {
        match self {
            IndexTree::Leaf(i) => IndexTree::Leaf(i + n),
            IndexTree::Group(children) => {
                IndexTree::Group(children.iter().map(|c| c.offset(n)).collect())
            }
        }
    }

    /// Largest index referenced anywhere in the tree
    pub fn max_index(&self) -> Option<usize> {
        match self {
            IndexTree::Leaf(i) => Some(*i),
            IndexTree::Group(children) => children.iter().filter_map(IndexTree::max_index).max(),
        }
    }

    /// Rewrite every occurrence of `from` to `to`, recursively
    fn rewrite(&mut self, from: usize, to: usize) {
        match self {
            IndexTree::Leaf(i) => {
                if *i == from {
                    *i = to;
                }
            }
            IndexTree::Group(children) => {
                children.iter_mut().for_each(|c| c.rewrite(from, to));
            }
        }
    }

    /// Decrement every index greater than `removed` by one, recursively
    fn shift_down_above(&mut self, removed: usize) {
        match self {
            IndexTree::Leaf(i) => {
                if *i > removed {
                    *i -= 1;
                }
            }
            IndexTree::Group(children) => {
                children.iter_mut().for_each(|c| c.shift_down_above(removed));
            }
        }
    }
}

/// One geometry in indexed-vertex form, still with a local vertex list
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedGeometry {
    /// CityJSON geometry type name
    pub semantic_type: &'static str,
    /// Local vertices in traversal order
    pub vertices: Vec<Point3>,
    /// Nested boundary indices into `vertices`
    pub boundaries: IndexTree,
}

impl IndexedGeometry {
    /// Remove duplicate vertices and repair all boundary indices.
    ///
    /// For every later duplicate of an earlier vertex (coordinate-triple
    /// equality), every occurrence of the later index is rewritten to the
    /// earlier one; the now-unused vertex is then removed and all larger
    /// indices are decremented. Removals are processed in descending
    /// index order so earlier removals do not invalidate later index
    /// arithmetic. O(V^2), acceptable at per-tree vertex counts.
    ///
    /// Idempotent: a second pass finds no duplicates.
    pub fn cleanup(&mut self) {
        let mut removals: Vec<usize> = Vec::new();
        for later in 1..self.vertices.len() {
            if removals.contains(&later) {
                continue;
            }
            let earlier = (0..later)
                .find(|&e| !removals.contains(&e) && self.vertices[e].same_position(&self.vertices[later]));
            if let Some(earlier) = earlier {
                self.boundaries.rewrite(later, earlier);
                removals.push(later);
            }
        }
        removals.sort_unstable();
        for &removed in removals.iter().rev() {
            self.vertices.remove(removed);
            self.boundaries.shift_down_above(removed);
        }
    }
}

/// Convert a geometry to its local indexed-vertex form.
///
/// Composite variants run the dedup pass after aggregation; simple
/// variants keep their authored vertex lists (including ring-closing
/// duplicates) untouched.
pub fn to_indexed(geometry: &Geometry) -> IndexedGeometry {
    match geometry {
        Geometry::Point(g) => IndexedGeometry {
            semantic_type: "MultiPoint",
            vertices: vec![g.pos],
            boundaries: IndexTree::Group(vec![IndexTree::Leaf(0)]),
        },
        Geometry::LineString(g) => IndexedGeometry {
            semantic_type: "MultiLineString",
            vertices: g.points.clone(),
            boundaries: IndexTree::Group(vec![IndexTree::Group(
                (0..g.points.len()).map(IndexTree::Leaf).collect(),
            )]),
        },
        Geometry::Polygon(g) => polygon_to_indexed(g),
        Geometry::CompositePolygon(g) => {
            let mut indexed = composite_polygon_to_indexed(g);
            indexed.cleanup();
            indexed
        }
        Geometry::Solid(g) => solid_to_indexed(g),
        Geometry::CompositeSolid(g) => {
            let mut indexed = composite_solid_to_indexed(g);
            indexed.cleanup();
            indexed
        }
    }
}

/// Flat ring, closing duplicate included
fn polygon_to_indexed(polygon: &Polygon) -> IndexedGeometry {
    IndexedGeometry {
        semantic_type: "MultiSurface",
        vertices: polygon.ring.clone(),
        boundaries: IndexTree::Group((0..polygon.ring.len()).map(IndexTree::Leaf).collect()),
    }
}

/// Members wrapped one level deeper (`[[ring]]`), offset bottom-up
fn composite_polygon_to_indexed(composite: &CompositePolygon) -> IndexedGeometry {
    let mut vertices = Vec::new();
    let mut members = Vec::with_capacity(composite.members.len());
    for polygon in &composite.members {
        let local = polygon_to_indexed(polygon);
        members.push(IndexTree::Group(vec![local.boundaries.offset(vertices.len())]));
        vertices.extend(local.vertices);
    }
    IndexedGeometry {
        semantic_type: "CompositeSurface",
        vertices,
        boundaries: IndexTree::Group(members),
    }
}

/// Composite boundary wrapped one level (the single exterior shell)
fn solid_to_indexed(solid: &Solid) -> IndexedGeometry {
    let mut shell = composite_polygon_to_indexed(&solid.exterior);
    shell.cleanup();
    IndexedGeometry {
        semantic_type: "Solid",
        vertices: shell.vertices,
        boundaries: IndexTree::Group(vec![shell.boundaries]),
    }
}

/// Per-solid boundary lists, one level deeper again
fn composite_solid_to_indexed(composite: &CompositeSolid) -> IndexedGeometry {
    let mut vertices: Vec<Point3> = Vec::new();
    let mut members = Vec::with_capacity(composite.members.len());
    for solid in &composite.members {
        let local = solid_to_indexed(solid);
        members.push(local.boundaries.offset(vertices.len()));
        vertices.extend(local.vertices);
    }
    IndexedGeometry {
        semantic_type: "CompositeSolid",
        vertices,
        boundaries: IndexTree::Group(members),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeoPoint;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(25832, x, y, z)
    }

    fn closed_square(z: f64) -> Polygon {
        Polygon::new(
            None,
            vec![
                p(0.0, 0.0, z),
                p(1.0, 0.0, z),
                p(1.0, 1.0, z),
                p(0.0, 1.0, z),
                p(0.0, 0.0, z),
            ],
        )
    }

    #[test]
    fn test_point_and_line_nesting() {
        let point = Geometry::Point(GeoPoint {
            id: None,
            pos: p(1.0, 2.0, 3.0),
        });
        let indexed = to_indexed(&point);
        assert_eq!(indexed.semantic_type, "MultiPoint");
        assert_eq!(indexed.boundaries, IndexTree::Group(vec![IndexTree::Leaf(0)]));

        let line = Geometry::LineString(crate::geometry::LineString {
            id: None,
            points: vec![p(0.0, 0.0, 0.0), p(0.0, 0.0, 10.0)],
        });
        let indexed = to_indexed(&line);
        assert_eq!(
            indexed.boundaries,
            IndexTree::Group(vec![IndexTree::Group(vec![
                IndexTree::Leaf(0),
                IndexTree::Leaf(1)
            ])])
        );
    }

    #[test]
    fn test_offset_is_pure_and_recursive() {
        let tree = IndexTree::Group(vec![
            IndexTree::Leaf(0),
            IndexTree::Group(vec![IndexTree::Leaf(1), IndexTree::Leaf(2)]),
        ]);
        let shifted = tree.offset(10);
        assert_eq!(tree.max_index(), Some(2));
        assert_eq!(shifted.max_index(), Some(12));
    }

    #[test]
    fn test_every_referenced_index_exists() {
        let composite = Geometry::CompositePolygon(CompositePolygon {
            id: None,
            members: vec![closed_square(0.0), closed_square(1.0)],
        });
        let indexed = to_indexed(&composite);
        let max = indexed.boundaries.max_index().unwrap();
        assert!(indexed.vertices.len() >= max + 1);
    }

    #[test]
    fn test_cleanup_collapses_ring_closure() {
        // A single closed square: 5 authored points, 4 after dedup,
        // closing index rewritten to 0.
        let composite = Geometry::CompositePolygon(CompositePolygon {
            id: None,
            members: vec![closed_square(0.0)],
        });
        let indexed = to_indexed(&composite);
        assert_eq!(indexed.vertices.len(), 4);
        match &indexed.boundaries {
            IndexTree::Group(members) => match &members[0] {
                IndexTree::Group(rings) => match &rings[0] {
                    IndexTree::Group(ring) => {
                        assert_eq!(ring.first(), Some(&IndexTree::Leaf(0)));
                        assert_eq!(ring.last(), Some(&IndexTree::Leaf(0)));
                    }
                    _ => panic!("expected ring group"),
                },
                _ => panic!("expected member wrapper"),
            },
            _ => panic!("expected member list"),
        }
    }

    #[test]
    fn test_cleanup_shares_vertices_across_members() {
        // Two squares stacked edge to edge share two corners.
        let lower = closed_square(0.0);
        let upper = Polygon::new(
            None,
            vec![
                p(0.0, 1.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(1.0, 2.0, 0.0),
                p(0.0, 2.0, 0.0),
                p(0.0, 1.0, 0.0),
            ],
        );
        let composite = Geometry::CompositePolygon(CompositePolygon {
            id: None,
            members: vec![lower, upper],
        });
        let indexed = to_indexed(&composite);
        // 4 + 4 unique corners minus the 2 shared ones
        assert_eq!(indexed.vertices.len(), 6);
        assert!(indexed.vertices.len() >= indexed.boundaries.max_index().unwrap() + 1);
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let composite = CompositeSolid {
            id: None,
            members: vec![
                Solid {
                    id: None,
                    exterior: CompositePolygon {
                        id: None,
                        members: vec![closed_square(0.0), closed_square(1.0)],
                    },
                },
                Solid {
                    id: None,
                    exterior: CompositePolygon {
                        id: None,
                        members: vec![closed_square(1.0)],
                    },
                },
            ],
        };
        let once = to_indexed(&Geometry::CompositeSolid(composite));
        let mut twice = once.clone();
        twice.cleanup();
        assert_eq!(once, twice);
    }
}

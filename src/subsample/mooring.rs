//! Mooring arrays: chains of face-sharing tracer cells through given positions.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use super::{Subsampling, check_positions, cumulative_distance, nearest_cell};
use crate::dataset::OceanDataset;
use crate::error::{ComputeError, Result};
use crate::grid::{Attrs, Dim, Field};

/// Chain of tracer cells approximating a mooring array.
#[derive(Clone, Debug, PartialEq)]
pub struct MooringPath {
    /// `(j, i)` of each cell; consecutive cells share a face and no cell
    /// appears twice.
    pub cells: Vec<(usize, usize)>,
    /// Requested mooring longitudes.
    pub xmoor: Vec<f64>,
    /// Requested mooring latitudes.
    pub ymoor: Vec<f64>,
}

/// Cells visited going from `from` to `to` in unit steps, excluding `from`.
///
/// Each step moves along x or y, whichever stays closer to the straight line
/// between the two cells; ties move along x.
pub(crate) fn grid_walk(from: (usize, usize), to: (usize, usize)) -> Vec<(usize, usize)> {
    let (j0, i0) = (from.0 as f64, from.1 as f64);
    let (dj, di) = (to.0 as f64 - j0, to.1 as f64 - i0);
    let norm = dj.hypot(di);
    let cross_track = |(j, i): (usize, usize)| -> f64 {
        if norm == 0.0 {
            return 0.0;
        }
        ((i as f64 - i0) * dj - (j as f64 - j0) * di).abs() / norm
    };
    let toward = |a: usize, b: usize| if b > a { a + 1 } else { a - 1 };

    let mut out = Vec::new();
    let mut cur = from;
    while cur != to {
        let step_x = (cur.1 != to.1).then(|| (cur.0, toward(cur.1, to.1)));
        let step_y = (cur.0 != to.0).then(|| (toward(cur.0, to.0), cur.1));
        cur = match (step_x, step_y) {
            (Some(x), Some(y)) => {
                if cross_track(y) < cross_track(x) {
                    y
                } else {
                    x
                }
            }
            (Some(x), None) => x,
            (None, Some(y)) => y,
            (None, None) => break,
        };
        out.push(cur);
    }
    out
}

fn adjacent(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

/// Shortest 4-connected route from `from` to `to` through cells not in
/// `visited`, excluding `from`. `shape` is `(ny, nx)`.
fn bridge(
    from: (usize, usize),
    to: (usize, usize),
    visited: &HashSet<(usize, usize)>,
    shape: (usize, usize),
) -> Option<Vec<(usize, usize)>> {
    let (ny, nx) = shape;
    let mut parent: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    let mut queue = VecDeque::from([from]);
    while let Some(cur) = queue.pop_front() {
        if cur == to {
            let mut route = vec![cur];
            let mut node = cur;
            while let Some(&prev) = parent.get(&node) {
                if prev == from {
                    break;
                }
                route.push(prev);
                node = prev;
            }
            route.reverse();
            return Some(route);
        }
        let (j, i) = cur;
        let neighbours = [
            (j.checked_sub(1), Some(i)),
            ((j + 1 < ny).then_some(j + 1), Some(i)),
            (Some(j), i.checked_sub(1)),
            (Some(j), (i + 1 < nx).then_some(i + 1)),
        ];
        for next in neighbours.into_iter().filter_map(|(j, i)| Some((j?, i?))) {
            if next == from || visited.contains(&next) || parent.contains_key(&next) {
                continue;
            }
            parent.insert(next, cur);
            queue.push_back(next);
        }
    }
    None
}

/// Appends `cell` unless the path already visits it. When skipped cells
/// leave a gap, the path is bridged through unvisited cells.
fn extend_path(
    path: &mut Vec<(usize, usize)>,
    visited: &mut HashSet<(usize, usize)>,
    cell: (usize, usize),
    shape: (usize, usize),
) -> Result<()> {
    if visited.contains(&cell) {
        return Ok(());
    }
    let route = match path.last() {
        None => vec![cell],
        Some(&last) if adjacent(last, cell) => vec![cell],
        Some(&last) => bridge(last, cell, visited, shape).ok_or_else(|| {
            ComputeError::InvalidInput(format!(
                "mooring path cannot reach cell {cell:?} without revisiting cells"
            ))
        })?,
    };
    for c in route {
        visited.insert(c);
        path.push(c);
    }
    Ok(())
}

/// Subsample along a mooring array.
///
/// Each (`xmoor`, `ymoor`) position is snapped to its nearest tracer cell and
/// consecutive cells are joined by a 4-connected walk. Cells the walk
/// revisits are dropped, so a path that doubles back keeps only its first
/// pass. The full dataset is kept and gains `XC_moor`, `YC_moor` and `mooring_dist` (km) along
/// `mooring`.
pub fn mooring_array(od: &OceanDataset, xmoor: &[f64], ymoor: &[f64]) -> Result<OceanDataset> {
    check_positions(xmoor, ymoor, 1)?;
    let ds = od.dataset();

    let shape = (ds.size_of(Dim::Y).unwrap_or(0), ds.size_of(Dim::X).unwrap_or(0));

    let mut cells: Vec<(usize, usize)> = Vec::new();
    let mut visited = HashSet::new();
    let mut anchor: Option<(usize, usize)> = None;
    for (&lon, &lat) in xmoor.iter().zip(ymoor) {
        let cell = nearest_cell(ds, lon, lat)?;
        let steps = match anchor {
            None => vec![cell],
            Some(prev) => grid_walk(prev, cell),
        };
        for step in steps {
            extend_path(&mut cells, &mut visited, step, shape)?;
        }
        anchor = Some(cell);
    }

    let xc = ds.get("XC")?;
    let yc = ds.get("YC")?;
    let lons: Vec<f64> = cells.iter().map(|&(j, i)| xc.at([0, 0, j, i])).collect();
    let lats: Vec<f64> = cells.iter().map(|&(j, i)| yc.at([0, 0, j, i])).collect();
    let dist = cumulative_distance(&lons, &lats);

    let mut out = od.dataset().clone();
    out.insert(
        "XC_moor",
        Field::from_vec(Dim::Mooring, lons).with_attrs(
            Attrs::new()
                .with_units("degrees_east")
                .with_long_name("longitude of mooring cells"),
        ),
    )?;
    out.insert(
        "YC_moor",
        Field::from_vec(Dim::Mooring, lats).with_attrs(
            Attrs::new()
                .with_units("degrees_north")
                .with_long_name("latitude of mooring cells"),
        ),
    )?;
    out.insert(
        "mooring_dist",
        Field::from_vec(Dim::Mooring, dist).with_attrs(
            Attrs::new()
                .with_units("km")
                .with_long_name("distance from first mooring"),
        ),
    )?;

    debug!(moorings = xmoor.len(), cells = cells.len(), "subsampled mooring array");
    let path = MooringPath {
        cells,
        xmoor: xmoor.to_vec(),
        ymoor: ymoor.to_vec(),
    };
    Ok(OceanDataset::new(out)
        .with_name(od.name.clone())
        .with_parameters(od.parameters().clone())?
        .with_subsampling(Subsampling::Mooring(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_connected(path: &[(usize, usize)]) -> bool {
        path.windows(2).all(|w| {
            let dj = w[0].0.abs_diff(w[1].0);
            let di = w[0].1.abs_diff(w[1].1);
            dj + di == 1
        })
    }

    #[test]
    fn test_walk_straight_line() {
        let walk = grid_walk((2, 1), (2, 4));
        assert_eq!(walk, vec![(2, 2), (2, 3), (2, 4)]);
    }

    #[test]
    fn test_walk_diagonal_is_staircase() {
        let mut path = vec![(0, 0)];
        path.extend(grid_walk((0, 0), (3, 3)));
        assert_eq!(path.len(), 7);
        assert_eq!(path[1], (0, 1));
        assert!(is_connected(&path));
        assert_eq!(*path.last().unwrap(), (3, 3));
    }

    #[test]
    fn test_walk_backwards() {
        let mut path = vec![(4, 5)];
        path.extend(grid_walk((4, 5), (1, 0)));
        assert!(is_connected(&path));
        assert_eq!(path.len(), 1 + 3 + 5);
    }

    #[test]
    fn test_walk_to_self_is_empty() {
        assert!(grid_walk((1, 1), (1, 1)).is_empty());
    }

    #[test]
    fn test_revisited_cells_are_skipped() {
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        for cell in [(2, 0), (2, 1), (2, 2), (2, 3), (2, 2), (2, 1), (2, 0)] {
            extend_path(&mut path, &mut visited, cell, (5, 5)).unwrap();
        }
        assert_eq!(path, vec![(2, 0), (2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_gap_after_revisit_is_bridged() {
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        // Out along row 1, back along it, then off to a new cell below the start
        for cell in [(1, 0), (1, 1), (1, 2), (1, 1), (1, 0), (0, 0)] {
            extend_path(&mut path, &mut visited, cell, (3, 3)).unwrap();
        }
        assert!(is_connected(&path));
        assert_eq!(path[..3], [(1, 0), (1, 1), (1, 2)]);
        assert_eq!(*path.last().unwrap(), (0, 0));
        let unique: HashSet<_> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
    }

    #[test]
    fn test_walled_off_cell_is_an_error() {
        // A single row where the middle cell is already on the path
        let mut path = vec![(0, 0)];
        let mut visited: HashSet<_> = [(0, 0), (0, 1)].into_iter().collect();
        assert!(bridge((0, 0), (0, 2), &visited, (1, 3)).is_none());
        let err = extend_path(&mut path, &mut visited, (0, 2), (1, 3)).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidInput(_)));
    }
}

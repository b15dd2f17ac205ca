//! Tests for the cyclic grid

use super::*;

fn numbered(columns: usize, rows: usize) -> Grid<usize> {
    let cols = (0..columns)
        .map(|c| (0..rows).map(|r| c * 100 + r).collect())
        .collect();
    Grid::from_columns(cols).unwrap()
}

// ========================================================================
// Construction
// ========================================================================

#[test]
fn test_from_columns_dimensions() {
    let grid = numbered(4, 3);
    assert_eq!(grid.columns(), 4);
    assert_eq!(grid.rows(), 3);
    assert_eq!(grid.len(), 12);
    assert_eq!(grid[GridKey::new(2, 1)], 201);
    assert_eq!(grid.get(GridKey::new(4, 0)), None);
    assert_eq!(grid.get(GridKey::new(0, 3)), None);
}

#[test]
fn test_from_columns_rejects_ragged() {
    let err = Grid::from_columns(vec![vec![1, 2, 3], vec![4, 5]]).unwrap_err();
    assert!(matches!(err, RigError::MalformedMeshTopology(_)));
}

#[test]
fn test_from_columns_rejects_empty() {
    assert!(Grid::<u32>::from_columns(Vec::new()).is_err());
    assert!(Grid::<u32>::from_columns(vec![Vec::new()]).is_err());
}

// ========================================================================
// Ring wrap-around
// ========================================================================

#[test]
fn test_ring_next_wraps_at_last() {
    let grid = numbered(4, 1);
    assert_eq!(grid.ring_next(0), 1);
    assert_eq!(grid.ring_next(2), 3);
    assert_eq!(grid.ring_next(3), 0);
}

#[test]
fn test_ring_prev_wraps_at_zero() {
    let grid = numbered(4, 1);
    assert_eq!(grid.ring_prev(0), 3);
    assert_eq!(grid.ring_prev(1), 0);
    assert_eq!(grid.ring_prev(3), 2);
}

#[test]
fn test_ring_single_column_is_its_own_neighbour() {
    let grid = numbered(1, 2);
    assert_eq!(grid.ring_next(0), 0);
    assert_eq!(grid.ring_prev(0), 0);
}

// ========================================================================
// Iteration
// ========================================================================

#[test]
fn test_keys_are_column_major() {
    let grid = numbered(2, 2);
    let keys: Vec<_> = grid.keys().collect();
    assert_eq!(
        keys,
        vec![
            GridKey::new(0, 0),
            GridKey::new(0, 1),
            GridKey::new(1, 0),
            GridKey::new(1, 1)
        ]
    );
    for (key, value) in grid.iter() {
        assert_eq!(*value, key.column * 100 + key.row);
    }
}

#[test]
fn test_column_and_ring_views() {
    let grid = numbered(3, 2);
    assert_eq!(grid.column(1), &[100, 101]);
    let ring: Vec<_> = grid.ring(1).copied().collect();
    assert_eq!(ring, vec![1, 101, 201]);
}

#[test]
#[should_panic(expected = "grid column 3 out of bounds")]
fn test_column_out_of_range_panics() {
    let grid = numbered(3, 2);
    let _ = grid.column(3);
}

#[test]
fn test_map_keeps_shape() {
    let grid = numbered(3, 2).map(|key, v| (key, *v * 2));
    assert_eq!(grid.columns(), 3);
    assert_eq!(grid.rows(), 2);
    assert_eq!(grid[GridKey::new(2, 1)], (GridKey::new(2, 1), 402));
}

#[test]
fn test_grid_key_display() {
    assert_eq!(GridKey::new(3, 7).to_string(), "(3, 7)");
}

#[test]
fn test_try_map_stops_at_first_error() {
    let grid = numbered(3, 2);
    let doubled: Grid<usize> = grid.try_map(|_, v| Ok::<_, String>(v * 2)).unwrap();
    assert_eq!(doubled[GridKey::new(1, 1)], 202);

    let err = grid
        .try_map(|key, v| {
            if key.column == 1 {
                Err(format!("bad {}", key))
            } else {
                Ok(*v)
            }
        })
        .unwrap_err();
    assert_eq!(err, "bad (1, 0)");
}

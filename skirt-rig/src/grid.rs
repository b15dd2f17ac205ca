//! Cyclic column/row grid
//!
//! A skirt is a closed tube: column `columns() - 1` sits next to column 0.
//! Rows run from the waist (row 0) down to the hem.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RigError};

#[cfg(test)]
mod tests;

/// Typed (column, row) identity of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridKey {
    pub column: usize,
    pub row: usize,
}

impl GridKey {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Dense grid, stored column-major
///
/// Every column has the same number of rows. Construction fails otherwise,
/// so indexing by any key inside `columns() x rows()` never misses.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    columns: usize,
    rows: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid from a list of columns, each ordered top to bottom
    pub fn from_columns(columns: Vec<Vec<T>>) -> Result<Self> {
        let rows = columns
            .first()
            .map(Vec::len)
            .ok_or_else(|| RigError::topology("grid has no columns"))?;
        if rows == 0 {
            return Err(RigError::topology("grid columns are empty"));
        }

        let column_count = columns.len();
        let mut cells = Vec::with_capacity(column_count * rows);
        for (i, column) in columns.into_iter().enumerate() {
            if column.len() != rows {
                return Err(RigError::topology(format!(
                    "column {} has {} rows, expected {}",
                    i,
                    column.len(),
                    rows
                )));
            }
            cells.extend(column);
        }

        Ok(Self {
            columns: column_count,
            rows,
            cells,
        })
    }

    /// Number of columns (cells per ring)
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows (cells per column)
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, key: GridKey) -> bool {
        key.column < self.columns && key.row < self.rows
    }

    pub fn get(&self, key: GridKey) -> Option<&T> {
        if self.contains(key) {
            self.cells.get(key.column * self.rows + key.row)
        } else {
            None
        }
    }

    /// Column after `column` around the ring (last wraps to 0)
    pub fn ring_next(&self, column: usize) -> usize {
        (column + 1) % self.columns
    }

    /// Column before `column` around the ring (0 wraps to last)
    pub fn ring_prev(&self, column: usize) -> usize {
        (column + self.columns - 1) % self.columns
    }

    /// Cells of one column, top to bottom
    ///
    /// # Panics
    ///
    /// Panics if `column >= self.columns()`.
    pub fn column(&self, column: usize) -> &[T] {
        assert!(
            column < self.columns,
            "grid column {} out of bounds ({} columns)",
            column,
            self.columns
        );
        let start = column * self.rows;
        &self.cells[start..start + self.rows]
    }

    /// Cells of one ring, in column order
    pub fn ring(&self, row: usize) -> impl Iterator<Item = &T> + '_ {
        (0..self.columns).map(move |i| &self.cells[i * self.rows + row])
    }

    /// All keys, column-major
    pub fn keys(&self) -> impl Iterator<Item = GridKey> {
        let rows = self.rows;
        (0..self.columns).flat_map(move |c| (0..rows).map(move |r| GridKey::new(c, r)))
    }

    /// All cells with their keys, column-major
    pub fn iter(&self) -> impl Iterator<Item = (GridKey, &T)> + '_ {
        self.keys().zip(self.cells.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(GridKey, &T) -> U) -> Grid<U> {
        Grid {
            columns: self.columns,
            rows: self.rows,
            cells: self.iter().map(|(key, cell)| f(key, cell)).collect(),
        }
    }

    /// Like [`Grid::map`], stopping at the first error in column-major order
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(GridKey, &T) -> std::result::Result<U, E>,
    ) -> std::result::Result<Grid<U>, E> {
        let cells = self
            .iter()
            .map(|(key, cell)| f(key, cell))
            .collect::<std::result::Result<Vec<_>, E>>()?;
        Ok(Grid {
            columns: self.columns,
            rows: self.rows,
            cells,
        })
    }
}

impl<T> std::ops::Index<GridKey> for Grid<T> {
    type Output = T;

    fn index(&self, key: GridKey) -> &T {
        assert!(self.contains(key), "grid key {} out of bounds", key);
        &self.cells[key.column * self.rows + key.row]
    }
}

//! Per-cell data for a rectangular map.
//!
//! `CellFlags` carries the boolean cell state the searches consume; edifices,
//! zones and danger are small enums stored alongside in `GridArray`s.

use crate::location::*;
use bitflags::*;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        const NONE = 0;
        /// Terrain a pawn can walk on.
        const WALKABLE = 1;
        const ON_FIRE = 2;
        /// An active mining designation targets this cell.
        const MINE_DESIGNATED = 4;
    }
}

/// Building occupying a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdificeKind {
    Door,
    /// Benches and crafting spots; spots can be stood on.
    WorkTable { standable: bool },
    Trap,
    Other { standable: bool },
}

impl EdificeKind {
    pub fn is_standable(self) -> bool {
        match self {
            EdificeKind::Door => false,
            EdificeKind::Trap => true,
            EdificeKind::WorkTable { standable } | EdificeKind::Other { standable } => standable,
        }
    }

    /// Whether pawns can path through the cell. Doors are passable without
    /// being standable.
    pub fn is_passable(self) -> bool {
        match self {
            EdificeKind::Door => true,
            other => other.is_standable(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Growing,
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Danger {
    None,
    Some,
    Deadly,
}

impl Default for Danger {
    fn default() -> Self {
        Danger::None
    }
}

/// A width x height array of per-cell data.
#[derive(Clone, Debug)]
pub struct GridArray<T: Copy> {
    width: u16,
    height: u16,
    data: Vec<T>,
}

impl<T: Copy> GridArray<T> {
    pub fn new(width: u16, height: u16, initial: T) -> Self {
        GridArray {
            width,
            height,
            data: vec![initial; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, loc: Location) -> bool {
        loc.x() < self.width && loc.y() < self.height
    }

    #[inline]
    fn index(&self, loc: Location) -> usize {
        loc.y() as usize * (self.width as usize) + loc.x() as usize
    }

    /// Returns `None` for out-of-bounds locations.
    #[inline]
    pub fn get(&self, loc: Location) -> Option<&T> {
        if self.in_bounds(loc) {
            self.data.get(self.index(loc))
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, loc: Location) -> Option<&mut T> {
        if self.in_bounds(loc) {
            let index = self.index(loc);
            self.data.get_mut(index)
        } else {
            None
        }
    }

    /// Writes are ignored for out-of-bounds locations.
    #[inline]
    pub fn set(&mut self, loc: Location, value: T) {
        if let Some(slot) = self.get_mut(loc) {
            *slot = value;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Location, &T)> {
        let width = self.width as usize;
        self.data.iter().enumerate().map(move |(i, v)| {
            let x = i % width;
            let y = i / width;
            (Location::from_coords(x as u32, y as u32), v)
        })
    }
}

impl<T: Copy + Serialize> Serialize for GridArray<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (self.width, self.height, &self.data).serialize(serializer)
    }
}

impl<'de, T: Copy + Deserialize<'de>> Deserialize<'de> for GridArray<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (width, height, data) = <(u16, u16, Vec<T>)>::deserialize(deserializer)?;
        if data.len() != (width as usize) * (height as usize) {
            return Err(serde::de::Error::custom("Invalid grid array size"));
        }
        Ok(GridArray {
            width,
            height,
            data,
        })
    }
}

/// In-bounds neighbors of `loc` for the given offsets, in offset order.
pub fn neighbors<'a>(
    width: u16,
    height: u16,
    loc: Location,
    offsets: &'a [(i32, i32)],
) -> impl Iterator<Item = Location> + 'a {
    offsets.iter().filter_map(move |&(dx, dy)| {
        loc.offset(dx, dy)
            .filter(|n| n.x() < width && n.y() < height)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_are_none() {
        let mut grid = GridArray::new(4, 3, 0u8);
        grid.set(Location::from_coords(3, 2), 7);
        grid.set(Location::from_coords(4, 0), 9);
        assert_eq!(grid.get(Location::from_coords(3, 2)), Some(&7));
        assert_eq!(grid.get(Location::from_coords(4, 0)), None);
        assert_eq!(grid.iter().filter(|(_, v)| **v != 0).count(), 1);
    }

    #[test]
    fn neighbors_clip_to_bounds() {
        let corner = Location::from_coords(0, 0);
        let found: Vec<_> = neighbors(5, 5, corner, &NEIGHBORS_8).collect();
        assert_eq!(found.len(), 3);
        let inside: Vec<_> = neighbors(5, 5, corner, &CARDINALS_AND_INSIDE).collect();
        assert_eq!(inside.last(), Some(&corner));
    }

    #[test]
    fn door_is_passable_but_not_standable() {
        assert!(EdificeKind::Door.is_passable());
        assert!(!EdificeKind::Door.is_standable());
        assert!(EdificeKind::Trap.is_standable());
        assert!(!EdificeKind::Other { standable: false }.is_passable());
        assert!(EdificeKind::WorkTable { standable: true }.is_standable());
    }
}

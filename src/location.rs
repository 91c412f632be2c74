use serde::*;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Location {
    packed: u32,
}

impl Location {
    pub fn from_coords(x: u32, y: u32) -> Self {
        Location {
            packed: ((x & 0xFFFF) << 16) | (y & 0xFFFF),
        }
    }

    #[inline]
    pub fn x(self) -> u16 {
        ((self.packed >> 16) & 0xFFFF) as u16
    }

    #[inline]
    pub fn y(self) -> u16 {
        (self.packed & 0xFFFF) as u16
    }

    #[inline]
    pub fn packed_repr(self) -> u32 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u32) -> Self {
        Location { packed }
    }

    /// Offset this location, returning `None` if either coordinate would go negative.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.x() as i32 + dx;
        let y = self.y() as i32 + dy;
        if x < 0 || y < 0 || x > u16::MAX as i32 || y > u16::MAX as i32 {
            return None;
        }
        Some(Location::from_coords(x as u32, y as u32))
    }

    /// Squared planar distance, the metric every search in this crate ranks by.
    pub fn distance_squared_to(self, other: Self) -> i64 {
        let dx = i64::from(self.x()) - i64::from(other.x());
        let dy = i64::from(self.y()) - i64::from(other.y());

        dx * dx + dy * dy
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u32::deserialize(deserializer).map(Location::from_packed)
    }
}

/// Neighbor offsets for the 8-neighborhood.
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// Cardinal offsets: north, east, south, west.
pub const NEIGHBORS_4: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Cardinal offsets followed by the cell itself.
pub const CARDINALS_AND_INSIDE: [(i32, i32); 5] = [(0, 1), (1, 0), (0, -1), (-1, 0), (0, 0)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_keeps_both_coordinates() {
        let loc = Location::from_coords(300, 17);
        assert_eq!(loc.x(), 300);
        assert_eq!(loc.y(), 17);
        assert_eq!(Location::from_packed(loc.packed_repr()), loc);
    }

    #[test]
    fn offset_refuses_negative_coordinates() {
        let origin = Location::from_coords(0, 5);
        assert_eq!(origin.offset(-1, 0), None);
        assert_eq!(origin.offset(2, -5), Some(Location::from_coords(2, 0)));
    }

    #[test]
    fn distances() {
        let a = Location::from_coords(3, 4);
        let b = Location::from_coords(6, 8);
        assert_eq!(a.distance_squared_to(b), 25);
        assert_eq!(b.distance_squared_to(a), 25);
        assert_eq!(a.distance_squared_to(a), 0);
    }

    #[test]
    fn distance_across_the_full_coordinate_range() {
        let origin = Location::from_coords(0, 0);
        let far = Location::from_coords(65535, 65535);
        assert_eq!(origin.distance_squared_to(far), 2 * 65535 * 65535);
        assert_eq!(far.distance_squared_to(origin), 8_589_672_450);
    }
}

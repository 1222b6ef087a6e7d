use serde::Serialize;

/// Horizontal flip flag.
pub const FLIP_H: u32 = 0x8000_0000; // bit 31
/// Vertical flip flag.
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
/// Diagonal (anti-diagonal on hexagonal maps) flip flag.
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
/// 120 degree rotation flag.
pub const ROTATE_HEX_120: u32 = 0x1000_0000; // bit 28, hexagonal maps only
/// Bits that hold the tile id itself.
pub const GID_MASK: u32 = 0x0FFF_FFFF;

/// Global tile id as stored in layer data, flip flags included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Gid(pub u32);

impl Gid {
    /// Value as stored, flags included.
    #[inline] pub fn raw(self) -> u32 { self.0 }
    /// Tile id without the flag bits.
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    /// [`FLIP_H`] is set.
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    /// [`FLIP_V`] is set.
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    /// [`FLIP_D`] is set.
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }
    /// [`ROTATE_HEX_120`] is set.
    #[inline] pub fn rotate_hex_120(self) -> bool { (self.0 & ROTATE_HEX_120) != 0 }

    /// `0` marks an empty cell.
    #[inline] pub fn is_empty(self) -> bool { self.clean() == 0 }
}

impl From<u32> for Gid {
    fn from(raw: u32) -> Self {
        Gid(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_flip_flags() {
        let gid = Gid(FLIP_H | FLIP_D | 42);
        assert!(gid.flip_h());
        assert!(!gid.flip_v());
        assert!(gid.flip_d());
        assert_eq!(gid.clean(), 42);
        assert!(!gid.is_empty());
        assert!(Gid(FLIP_V).is_empty());
    }
}

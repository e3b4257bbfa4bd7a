//! Player stances and the hexagonal track layout
//!
//! Three fixed stances, each opening a pair of opposite tracks out of the six
//! around the tunnel cross-section. Cycling runs TOP -> MID -> LOW -> TOP
//! going down and the reverse going up. Stances are static configuration and
//! never mutated.

use std::f32::consts::PI;

/// One of the three paddle postures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    Top,
    #[default]
    Mid,
    Low,
}

/// Static description of a stance
#[derive(Debug)]
pub struct StanceDef {
    pub name: &'static str,
    /// Feedback color (0xRRGGBB), used for paddle tint, wall tint and hit bursts
    pub color: u32,
    /// Tracks passable while this stance is held
    pub open_tracks: [usize; 2],
    /// Left paddle target angle (radians)
    pub left_angle: f32,
    /// Right paddle target angle (radians)
    pub right_angle: f32,
}

/// Stance table, indexed by [`Stance::index`]
pub const STANCE_DEFS: [StanceDef; 3] = [
    StanceDef {
        name: "TOP",
        color: 0xffff00,
        open_tracks: [1, 4],
        left_angle: 5.0 * PI / 6.0,
        right_angle: PI / 6.0,
    },
    StanceDef {
        name: "MID",
        color: 0x00ffff,
        open_tracks: [0, 3],
        left_angle: PI,
        right_angle: 0.0,
    },
    StanceDef {
        name: "LOW",
        color: 0xff00aa,
        open_tracks: [2, 5],
        left_angle: 7.0 * PI / 6.0,
        right_angle: 11.0 * PI / 6.0,
    },
];

impl Stance {
    pub const COUNT: usize = 3;

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Stance::Top => 0,
            Stance::Mid => 1,
            Stance::Low => 2,
        }
    }

    /// Stance for a pattern value; wraps mod 3
    pub fn from_index(i: usize) -> Self {
        match i % Self::COUNT {
            0 => Stance::Top,
            1 => Stance::Mid,
            _ => Stance::Low,
        }
    }

    /// `stance-up` input: previous stance in the rotational order
    pub fn up(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// `stance-down` input: next stance in the rotational order
    pub fn down(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn def(self) -> &'static StanceDef {
        &STANCE_DEFS[self.index()]
    }

    /// Whether `track` is passable while this stance is held
    pub fn is_open(self, track: usize) -> bool {
        self.def().open_tracks.contains(&track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TRACK_COUNT;
    use proptest::prelude::*;

    #[test]
    fn test_cycling_order() {
        assert_eq!(Stance::Top.down(), Stance::Mid);
        assert_eq!(Stance::Mid.down(), Stance::Low);
        assert_eq!(Stance::Low.down(), Stance::Top);
        assert_eq!(Stance::Top.up(), Stance::Low);
        assert_eq!(Stance::Low.up(), Stance::Mid);
        assert_eq!(Stance::Mid.up(), Stance::Top);
    }

    #[test]
    fn test_every_track_open_in_exactly_one_stance() {
        for track in 0..TRACK_COUNT {
            let open_in = [Stance::Top, Stance::Mid, Stance::Low]
                .iter()
                .filter(|s| s.is_open(track))
                .count();
            assert_eq!(open_in, 1, "track {} open in {} stances", track, open_in);
        }
    }

    #[test]
    fn test_from_index_wraps() {
        assert_eq!(Stance::from_index(0), Stance::Top);
        assert_eq!(Stance::from_index(4), Stance::Mid);
        assert_eq!(Stance::from_index(5), Stance::Low);
    }

    proptest! {
        /// Three downs (or three ups) always return to the original stance
        #[test]
        fn prop_cycle_is_closed(i in 0usize..3) {
            let s = Stance::from_index(i);
            prop_assert_eq!(s.down().down().down(), s);
            prop_assert_eq!(s.up().up().up(), s);
        }
    }
}

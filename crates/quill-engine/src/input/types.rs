use core::cmp::Ordering;
use std::fmt;

use crate::coords::Vec2;
use crate::time::InputTimeS;

/// Kind of device that produced an input sample.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum InputType {
    #[default]
    Touch,
    Mouse,
    Pen,
    Wheel,
}

/// Individual input flag. The discriminant is the bit index inside [`Flags`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum Flag {
    /// Pointer is touching the surface (or a button is held).
    InContact = 0,
    /// Sample belongs to the primary pointer.
    Primary = 1,
    /// Left button / default contact.
    Left = 2,
    Right = 3,
    /// First sample of a contact.
    TDown = 4,
    /// Last sample of a contact.
    TUp = 5,
    /// Platform cancelled all contacts.
    Cancel = 6,
    Wheel = 7,
    Shift = 8,
    Control = 9,
    Alt = 10,
    Meta = 11,
}

impl Flag {
    #[inline]
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Bitset of [`Flag`]s.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Flags(pub u32);

impl Flags {
    pub const NONE: Flags = Flags(0);

    /// Builds a bitset from a list of flags. Usable in constants.
    pub const fn of(flags: &[Flag]) -> Flags {
        let mut bits = 0;
        let mut i = 0;
        while i < flags.len() {
            bits |= flags[i].bit();
            i += 1;
        }
        Flags(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn has(self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[inline]
    pub const fn with(self, flag: Flag) -> Flags {
        Flags(self.0 | flag.bit())
    }

    #[inline]
    pub const fn without(self, flag: Flag) -> Flags {
        Flags(self.0 & !flag.bit())
    }

    #[inline]
    pub fn set(&mut self, flag: Flag, on: bool) {
        *self = if on { self.with(flag) } else { self.without(flag) };
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const ALL: [Flag; 12] = [
            Flag::InContact,
            Flag::Primary,
            Flag::Left,
            Flag::Right,
            Flag::TDown,
            Flag::TUp,
            Flag::Cancel,
            Flag::Wheel,
            Flag::Shift,
            Flag::Control,
            Flag::Alt,
            Flag::Meta,
        ];
        f.debug_set()
            .entries(ALL.iter().filter(|fl| self.has(**fl)))
            .finish()
    }
}

pub const FLAGS_BEGIN_STROKE: Flags =
    Flags::of(&[Flag::InContact, Flag::Primary, Flag::Left, Flag::TDown]);
pub const FLAGS_END_STROKE: Flags = Flags::of(&[Flag::Primary, Flag::Left, Flag::TUp]);
pub const FLAGS_MOVE_WHILE_DOWN: Flags = Flags::of(&[Flag::InContact, Flag::Primary, Flag::Left]);
pub const FLAGS_MOVE_WHILE_UP: Flags = Flags::of(&[Flag::Primary, Flag::Left]);

/// Pressure value meaning "device did not report pressure".
pub const PRESSURE_UNKNOWN: f32 = -1.0;

/// One sampled input point.
///
/// Immutable once built; consumed by the input state tracker and the stroke
/// builder.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SInput {
    pub input_type: InputType,
    /// Stable per-contact id, used to track fingers across samples.
    pub id: u32,
    pub flags: Flags,
    pub time_s: InputTimeS,
    /// Screen position in pixels (top-left origin).
    pub screen_pos: Vec2,
    /// Normalized pressure, or [`PRESSURE_UNKNOWN`].
    pub pressure: f32,
    pub wheel_delta: Vec2,
    pub tilt: f32,
    pub orientation: f32,
}

impl Default for SInput {
    fn default() -> Self {
        Self {
            input_type: InputType::Touch,
            id: 0,
            flags: Flags::NONE,
            time_s: 0.0,
            screen_pos: Vec2::zero(),
            pressure: PRESSURE_UNKNOWN,
            wheel_delta: Vec2::zero(),
            tilt: 0.0,
            orientation: 0.0,
        }
    }
}

impl SInput {
    #[inline]
    pub fn is_down(&self) -> bool {
        self.flags.has(Flag::TDown)
    }

    #[inline]
    pub fn is_up(&self) -> bool {
        self.flags.has(Flag::TUp)
    }

    #[inline]
    pub fn in_contact(&self) -> bool {
        self.flags.has(Flag::InContact)
    }

    #[inline]
    pub fn has_pressure(&self) -> bool {
        self.pressure >= 0.0
    }

    /// 0 for down, 1 for move/hover, 2 for up, so equal-time samples of one
    /// contact keep their lifecycle order.
    fn phase(&self) -> u8 {
        if self.is_down() {
            0
        } else if self.is_up() {
            2
        } else {
            1
        }
    }

    /// Stream ordering: by time, then by id, then down < move < up.
    pub fn stream_cmp(&self, other: &SInput) -> Ordering {
        self.time_s
            .total_cmp(&other.time_s)
            .then(self.id.cmp(&other.id))
            .then(self.phase().cmp(&other.phase()))
    }

    #[inline]
    pub fn less_than(&self, other: &SInput) -> bool {
        self.stream_cmp(other) == Ordering::Less
    }
}

/// Sorts samples into stream order (stable).
pub fn sort_stream(inputs: &mut [SInput]) {
    inputs.sort_by(SInput::stream_cmp);
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

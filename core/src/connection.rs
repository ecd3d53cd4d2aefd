//! Four-way passability codes describing how a maze cell opens to its
//! neighbours.

use std::{fmt, str::FromStr};

/// Cardinal direction on the maze grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward increasing rows.
    North,
    /// Toward increasing columns.
    East,
    /// Toward decreasing rows.
    South,
    /// Toward decreasing columns.
    West,
}

impl Direction {
    /// All directions in `NESW` order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Bit used by [`ConnectionCode`] for this direction.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::North => 0b1000,
            Self::East => 0b0100,
            Self::South => 0b0010,
            Self::West => 0b0001,
        }
    }

    /// Column and row delta of a single step.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Direction pointing back the way this one came.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Passability of a maze cell, rendered as a four character `NESW` string
/// such as `"1010"`.
///
/// Each slot is either closed or open; opening an already open slot leaves it
/// open, so the code can never hold anything but ones and zeros.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionCode(u8);

impl ConnectionCode {
    /// A cell with no open sides.
    pub const CLOSED: ConnectionCode = ConnectionCode(0);

    /// Creates a code from its bit representation, ignoring unknown bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// Bit representation of the code.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns a copy of the code with `direction` opened.
    #[must_use]
    pub const fn with_open(self, direction: Direction) -> Self {
        Self(self.0 | direction.bit())
    }

    /// Reports whether the cell is open toward `direction`.
    #[must_use]
    pub const fn is_open(&self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Reports whether every side of the cell is closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.0 == 0
    }

    /// Iterates over the directions the cell is open toward.
    pub fn open_directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.is_open(*direction))
    }
}

impl fmt::Display for ConnectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for direction in Direction::ALL {
            f.write_str(if self.is_open(direction) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Error returned when a string is not a four character `NESW` code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a four character connection code")]
pub struct ParseConnectionCodeError(String);

impl FromStr for ConnectionCode {
    type Err = ParseConnectionCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.len() != Direction::ALL.len() {
            return Err(ParseConnectionCodeError(value.to_owned()));
        }
        let mut code = Self::CLOSED;
        for (direction, symbol) in Direction::ALL.into_iter().zip(value.chars()) {
            match symbol {
                '1' => code = code.with_open(direction),
                '0' => {}
                _ => return Err(ParseConnectionCodeError(value.to_owned())),
            }
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nesw_order() {
        let code = ConnectionCode::CLOSED
            .with_open(Direction::North)
            .with_open(Direction::South);
        assert_eq!(code.to_string(), "1010");
        assert_eq!("1010".parse::<ConnectionCode>(), Ok(code));
    }

    #[test]
    fn opening_twice_saturates() {
        let code = ConnectionCode::CLOSED
            .with_open(Direction::West)
            .with_open(Direction::West);
        assert_eq!(code.to_string(), "0001");
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!("10".parse::<ConnectionCode>().is_err());
        assert!("1020".parse::<ConnectionCode>().is_err());
    }
}

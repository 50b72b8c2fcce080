//! Single-byte command channel for forcing runs on or off.

use crate::types::Direction;

/// Byte that force-starts an Up run.
pub const START_BYTE: u8 = b'A';

/// Byte that force-clears the whole strip.
pub const CLEAR_BYTE: u8 = b'B';

/// Actions for controlling the sequencer outside of sensor triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StairAction {
    /// Drop everything on the strip and start one run in this direction,
    /// bypassing debounce and arbitration.
    Start(Direction),

    /// Turn every zone off and drop all runs.
    Clear,
}

impl StairAction {
    /// Decodes a command byte.
    ///
    /// # Errors
    /// Returns `UnknownCommand` for any byte other than [`START_BYTE`] or
    /// [`CLEAR_BYTE`].
    pub fn from_byte(byte: u8) -> Result<Self, CommandError> {
        match byte {
            START_BYTE => Ok(StairAction::Start(Direction::Up)),
            CLEAR_BYTE => Ok(StairAction::Clear),
            other => Err(CommandError::UnknownCommand(other)),
        }
    }
}

impl TryFrom<u8> for StairAction {
    type Error = CommandError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        StairAction::from_byte(byte)
    }
}

/// Command decoding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Byte does not name a command.
    UnknownCommand(u8),
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::UnknownCommand(byte) => {
                write!(f, "unknown command byte 0x{:02x}", byte)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

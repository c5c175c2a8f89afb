//! Session constants.

/// Channel buffer size for background session events.
pub const SESSION_CHANNEL_SIZE: usize = 100;

//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (the dashboard's
//! inbound virtual channel) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCommand {
    /// Drive the status LED. Decoded from channel 0: nonzero = on.
    SetStatusLed(bool),
}

impl DashboardCommand {
    /// Decode a raw inbound channel write. Returns `None` for channels
    /// that carry no inbound meaning.
    pub fn from_channel_write(channel: u8, value: i32) -> Option<Self> {
        match channel {
            0 => Some(Self::SetStatusLed(value != 0)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_zero_nonzero_is_led_on() {
        assert_eq!(
            DashboardCommand::from_channel_write(0, 1),
            Some(DashboardCommand::SetStatusLed(true))
        );
        assert_eq!(
            DashboardCommand::from_channel_write(0, 7),
            Some(DashboardCommand::SetStatusLed(true))
        );
    }

    #[test]
    fn channel_zero_zero_is_led_off() {
        assert_eq!(
            DashboardCommand::from_channel_write(0, 0),
            Some(DashboardCommand::SetStatusLed(false))
        );
    }

    #[test]
    fn outbound_channels_carry_no_commands() {
        for ch in 1..=5 {
            assert_eq!(DashboardCommand::from_channel_write(ch, 1), None);
        }
    }
}

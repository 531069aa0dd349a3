//! SSD1306 command sequences
//!
//! Every command byte is preceded by the control byte [`control::COMMAND`]
//! (continuation bit set, D/C# low), so each sequence can be sent as a
//! transaction prefix on its own. Frame data goes out after the single
//! [`DATA_PREFIX`] control byte.

/// Control bytes
pub mod control {
    /// One command byte follows
    pub const COMMAND: u8 = 0x80;
    /// Display data follows until stop
    pub const DATA: u8 = 0x40;
}

/// SSD1306 commands
pub mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const CHARGE_PUMP_ON: u8 = 0x14;
}

use control::COMMAND;

/// Power-on sequence: charge pump on, display on, full brightness, inverted
pub const INIT: [u8; 12] = [
    COMMAND,
    cmd::SET_CHARGE_PUMP,
    COMMAND,
    cmd::CHARGE_PUMP_ON,
    COMMAND,
    cmd::DISPLAY_ON,
    COMMAND,
    cmd::SET_CONTRAST,
    COMMAND,
    0xFF,
    COMMAND,
    cmd::SET_INVERSE,
];

/// Prefix of a page data transfer
pub const DATA_PREFIX: [u8; 1] = [control::DATA];

/// Move the write cursor to column 0 of `page`
///
/// The page index occupies the low nibble of the last command byte.
pub const fn select_page(page: u8) -> [u8; 6] {
    [
        COMMAND,
        cmd::SET_LOW_COLUMN,
        COMMAND,
        cmd::SET_HIGH_COLUMN,
        COMMAND,
        cmd::SET_PAGE_ADDR | (page & 0x0F),
    ]
}

/// Set contrast to `level`
pub const fn set_brightness(level: u8) -> [u8; 4] {
    [COMMAND, cmd::SET_CONTRAST, COMMAND, level]
}

/// Turn the panel on or off
pub const fn display_on(on: bool) -> [u8; 2] {
    [
        COMMAND,
        if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF },
    ]
}

/// Inverted or normal pixel polarity
pub const fn inverted(inverted: bool) -> [u8; 2] {
    [
        COMMAND,
        if inverted {
            cmd::SET_INVERSE
        } else {
            cmd::SET_NORMAL
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_sequence_bytes() {
        assert_eq!(
            INIT,
            [0x80, 0x8D, 0x80, 0x14, 0x80, 0xAF, 0x80, 0x81, 0x80, 0xFF, 0x80, 0xA7]
        );
    }

    #[test]
    fn test_select_page_encodes_low_nibble() {
        assert_eq!(select_page(0), [0x80, 0x00, 0x80, 0x10, 0x80, 0xB0]);
        assert_eq!(select_page(7), [0x80, 0x00, 0x80, 0x10, 0x80, 0xB7]);
    }

    #[test]
    fn test_brightness() {
        assert_eq!(set_brightness(0x42), [0x80, 0x81, 0x80, 0x42]);
    }

    #[test]
    fn test_toggles() {
        assert_eq!(display_on(true), [0x80, 0xAF]);
        assert_eq!(display_on(false), [0x80, 0xAE]);
        assert_eq!(inverted(true), [0x80, 0xA7]);
        assert_eq!(inverted(false), [0x80, 0xA6]);
        assert_eq!(DATA_PREFIX, [0x40]);
    }
}

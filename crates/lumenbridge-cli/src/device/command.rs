//! Byte frames understood by the LED controllers.

use lumenbridge_core::Rgb;

pub const POWER_ON: [u8; 3] = [0xcc, 0x23, 0x33];

const SET_COLOR_HEAD: u8 = 0x56;
const SET_COLOR_WHITE: u8 = 0x00;
const SET_COLOR_MODE_RGB: u8 = 0xf0;
const SET_COLOR_TAIL: u8 = 0xaa;

pub fn set_color(color: Rgb) -> [u8; 7] {
    [
        SET_COLOR_HEAD,
        color.red,
        color.green,
        color.blue,
        SET_COLOR_WHITE,
        SET_COLOR_MODE_RGB,
        SET_COLOR_TAIL,
    ]
}

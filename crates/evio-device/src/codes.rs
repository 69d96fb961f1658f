//! Numeric constants of the Linux input protocol (`<linux/input-event-codes.h>`).
//!
//! Only the values this crate and its tools consume are listed. Each
//! capability domain is described by its `*_MAX` code; masks are sized to
//! `MAX + 1` bits.

#![expect(missing_docs, reason = "constants carry their kernel header names")]

// Event types
pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_REL: u16 = 0x02;
pub const EV_ABS: u16 = 0x03;
pub const EV_MSC: u16 = 0x04;
pub const EV_SW: u16 = 0x05;
pub const EV_LED: u16 = 0x11;
pub const EV_SND: u16 = 0x12;
pub const EV_REP: u16 = 0x14;
pub const EV_FF: u16 = 0x15;
pub const EV_PWR: u16 = 0x16;
pub const EV_FF_STATUS: u16 = 0x17;

// Domain maxima
pub const EV_MAX: u16 = 0x1f;
pub const KEY_MAX: u16 = 0x2ff;
pub const REL_MAX: u16 = 0x0f;
pub const ABS_MAX: u16 = 0x3f;
pub const SW_MAX: u16 = 0x0f;
pub const MSC_MAX: u16 = 0x07;
pub const LED_MAX: u16 = 0x0f;
pub const SND_MAX: u16 = 0x07;
pub const FF_MAX: u16 = 0x7f;
pub const INPUT_PROP_MAX: u16 = 0x1f;

// Synchronization
pub const SYN_REPORT: u16 = 0;
pub const SYN_CONFIG: u16 = 1;
pub const SYN_MT_REPORT: u16 = 2;
pub const SYN_DROPPED: u16 = 3;

// Force-feedback effect kinds
pub const FF_RUMBLE: u16 = 0x50;
pub const FF_PERIODIC: u16 = 0x51;
pub const FF_CONSTANT: u16 = 0x52;
pub const FF_SPRING: u16 = 0x53;
pub const FF_FRICTION: u16 = 0x54;
pub const FF_DAMPER: u16 = 0x55;
pub const FF_INERTIA: u16 = 0x56;
pub const FF_RAMP: u16 = 0x57;

// Periodic waveforms
pub const FF_SQUARE: u16 = 0x58;
pub const FF_TRIANGLE: u16 = 0x59;
pub const FF_SINE: u16 = 0x5a;
pub const FF_SAW_UP: u16 = 0x5b;
pub const FF_SAW_DOWN: u16 = 0x5c;
pub const FF_CUSTOM: u16 = 0x5d;

// Force-feedback device properties
pub const FF_GAIN: u16 = 0x60;
pub const FF_AUTOCENTER: u16 = 0x61;

/// Full scale of `FF_GAIN` / `FF_AUTOCENTER` values.
pub const FF_FULL_SCALE: i32 = 0xffff;

// Effect directions
pub const DIR_DOWN: u16 = 0x0000;
pub const DIR_LEFT: u16 = 0x4000;
pub const DIR_UP: u16 = 0x8000;
pub const DIR_RIGHT: u16 = 0xc000;

// Bus types reported in the identity record
pub const BUS_PCI: u16 = 0x01;
pub const BUS_ISAPNP: u16 = 0x02;
pub const BUS_USB: u16 = 0x03;
pub const BUS_HIL: u16 = 0x04;
pub const BUS_BLUETOOTH: u16 = 0x05;
pub const BUS_VIRTUAL: u16 = 0x06;
pub const BUS_ISA: u16 = 0x10;
pub const BUS_I8042: u16 = 0x11;
pub const BUS_XTKBD: u16 = 0x12;
pub const BUS_RS232: u16 = 0x13;
pub const BUS_GAMEPORT: u16 = 0x14;
pub const BUS_PARPORT: u16 = 0x15;
pub const BUS_AMIGA: u16 = 0x16;
pub const BUS_ADB: u16 = 0x17;
pub const BUS_I2C: u16 = 0x18;
pub const BUS_HOST: u16 = 0x19;
pub const BUS_GSC: u16 = 0x1a;
pub const BUS_ATARI: u16 = 0x1b;
pub const BUS_SPI: u16 = 0x1c;

/// Human-readable name of an event type, if it is a known one.
pub fn event_type_name(kind: u16) -> Option<&'static str> {
    let name = match kind {
        EV_SYN => "SYN",
        EV_KEY => "KEY",
        EV_REL => "REL",
        EV_ABS => "ABS",
        EV_MSC => "MSC",
        EV_SW => "SW",
        EV_LED => "LED",
        EV_SND => "SND",
        EV_REP => "REP",
        EV_FF => "FF",
        EV_PWR => "PWR",
        EV_FF_STATUS => "FF_STATUS",
        _ => return None,
    };
    Some(name)
}

/// Human-readable name of a bus type, if it is a known one.
pub fn bus_name(bus: u16) -> Option<&'static str> {
    let name = match bus {
        BUS_PCI => "pci",
        BUS_ISAPNP => "isapnp",
        BUS_USB => "usb",
        BUS_HIL => "hil",
        BUS_BLUETOOTH => "bluetooth",
        BUS_VIRTUAL => "virtual",
        BUS_ISA => "isa",
        BUS_I8042 => "i8042",
        BUS_XTKBD => "xtkbd",
        BUS_RS232 => "rs232",
        BUS_GAMEPORT => "gameport",
        BUS_PARPORT => "parport",
        BUS_AMIGA => "amiga",
        BUS_ADB => "adb",
        BUS_I2C => "i2c",
        BUS_HOST => "host",
        BUS_GSC => "gsc",
        BUS_ATARI => "atari",
        BUS_SPI => "spi",
        _ => return None,
    };
    Some(name)
}

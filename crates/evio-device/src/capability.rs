//! Capability domains and mask predicates.

use crate::codes::{
    ABS_MAX, EV_ABS, EV_FF, EV_KEY, EV_LED, EV_MAX, EV_MSC, EV_REL, EV_SND, EV_SW, FF_MAX,
    INPUT_PROP_MAX, KEY_MAX, LED_MAX, MSC_MAX, REL_MAX, SND_MAX, SW_MAX,
};
use evio_bitset::Bitset;
use evio_ioctl::ControlCode;
use evio_ioctl::requests::{eviocgbit, eviocgprop};
use serde::{Deserialize, Serialize};

/// A closed numbering space queried as one capability mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Supported event types (`EV_*`)
    EventTypes,
    /// Keys and buttons (`KEY_*`, `BTN_*`)
    Keys,
    /// Relative axes (`REL_*`)
    Relative,
    /// Absolute axes (`ABS_*`)
    Absolute,
    /// Miscellaneous events (`MSC_*`)
    Misc,
    /// Switches (`SW_*`)
    Switches,
    /// LEDs (`LED_*`)
    Leds,
    /// Sounds (`SND_*`)
    Sounds,
    /// Force-feedback effect kinds and properties (`FF_*`)
    ForceFeedback,
    /// Input properties (`INPUT_PROP_*`)
    Properties,
}

impl Domain {
    /// Every domain, in query order.
    pub const ALL: [Domain; 10] = [
        Domain::EventTypes,
        Domain::Keys,
        Domain::Relative,
        Domain::Absolute,
        Domain::Misc,
        Domain::Switches,
        Domain::Leds,
        Domain::Sounds,
        Domain::ForceFeedback,
        Domain::Properties,
    ];

    /// Largest code in the domain.
    pub const fn max_code(self) -> u16 {
        match self {
            Domain::EventTypes => EV_MAX,
            Domain::Keys => KEY_MAX,
            Domain::Relative => REL_MAX,
            Domain::Absolute => ABS_MAX,
            Domain::Misc => MSC_MAX,
            Domain::Switches => SW_MAX,
            Domain::Leds => LED_MAX,
            Domain::Sounds => SND_MAX,
            Domain::ForceFeedback => FF_MAX,
            Domain::Properties => INPUT_PROP_MAX,
        }
    }

    /// Event type whose codes the domain enumerates.
    pub const fn event_type(self) -> Option<u16> {
        match self {
            Domain::EventTypes | Domain::Properties => None,
            Domain::Keys => Some(EV_KEY),
            Domain::Relative => Some(EV_REL),
            Domain::Absolute => Some(EV_ABS),
            Domain::Misc => Some(EV_MSC),
            Domain::Switches => Some(EV_SW),
            Domain::Leds => Some(EV_LED),
            Domain::Sounds => Some(EV_SND),
            Domain::ForceFeedback => Some(EV_FF),
        }
    }

    /// Zeroed mask sized to the domain.
    pub fn empty_mask(self) -> Bitset {
        Bitset::new(usize::from(self.max_code()) + 1)
    }

    /// Request filling a mask of `len` bytes.
    pub fn request(self, len: usize) -> ControlCode {
        match self {
            Domain::Properties => eviocgprop(len),
            // Event types are queried as the bits of type 0.
            Domain::EventTypes => eviocgbit(0, len),
            other => {
                let ev = other.event_type().unwrap_or_default();
                eviocgbit(u8::try_from(ev).unwrap_or_default(), len)
            }
        }
    }

    /// Short lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Domain::EventTypes => "event_types",
            Domain::Keys => "keys",
            Domain::Relative => "relative",
            Domain::Absolute => "absolute",
            Domain::Misc => "misc",
            Domain::Switches => "switches",
            Domain::Leds => "leds",
            Domain::Sounds => "sounds",
            Domain::ForceFeedback => "force_feedback",
            Domain::Properties => "properties",
        }
    }
}

/// Returns `true` if every code in `codes` is set in `mask`.
///
/// An empty `codes` list is vacuously supported. Codes beyond the mask read
/// as unsupported.
pub fn supports(mask: &Bitset, codes: &[u16]) -> bool {
    codes.iter().all(|&code| mask.test(usize::from(code)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_cover_domain() {
        for domain in Domain::ALL {
            let mask = domain.empty_mask();
            assert!(mask.len() > usize::from(domain.max_code()), "{domain:?}");
            assert!(mask.is_empty());
        }
    }

    #[test]
    fn test_force_feedback_mask_covers_properties() {
        let mask = Domain::ForceFeedback.empty_mask();
        assert_eq!(mask.len(), 128);
    }

    #[test]
    fn test_request_numbers() {
        assert_eq!(Domain::EventTypes.request(8).number(), 0x20);
        assert_eq!(Domain::Keys.request(96).number(), 0x21);
        assert_eq!(Domain::Keys.request(96).size(), 96);
        assert_eq!(Domain::ForceFeedback.request(16).number(), 0x35);
        assert_eq!(Domain::Properties.request(8).number(), 0x09);
    }

    #[test]
    fn test_supports() {
        let mask = Bitset::with_bits(32, [EV_KEY as usize, EV_LED as usize]);
        assert!(supports(&mask, &[EV_KEY, EV_LED]));
        assert!(!supports(&mask, &[EV_KEY, EV_REL]));
        assert!(supports(&mask, &[]));
        assert!(!supports(&mask, &[0x300]));
    }
}

//! Board status outputs.

/// The two status LEDs. Each is lit while its subsystem is not ready.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusLeds {
    /// Serializer not ready.
    pub led0: bool,
    /// Link not ready.
    pub led1: bool,
}

impl StatusLeds {
    /// Packs the LEDs into the `leds` status register: bit 0 is `led0`.
    pub fn bits(self) -> u32 {
        u32::from(self.led0) | u32::from(self.led1) << 1
    }
}

/// Derives the LED levels from subsystem readiness.
pub fn status_outputs(serializer_ready: bool, link_ready: bool) -> StatusLeds {
    StatusLeds {
        led0: !serializer_ready,
        led1: !link_ready,
    }
}

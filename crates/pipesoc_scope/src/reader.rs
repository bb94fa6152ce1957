//! Host-side access to a capture endpoint over the control bus.

use crate::buffer::CaptureState;
use crate::csr;
use crate::error::CaptureError;
use crate::signal::{Sample, SignalRegistry};
use pipesoc_common::ControlBus;

/// Drives a capture endpoint mapped at `base` and decodes its samples.
#[derive(Clone, Debug)]
pub struct CaptureReader {
    base: u32,
    registry: SignalRegistry,
}

impl CaptureReader {
    /// Creates a reader for the endpoint at byte address `base`, decoding
    /// samples with `registry`.
    pub fn new(base: u32, registry: SignalRegistry) -> Self {
        Self { base, registry }
    }

    fn addr(&self, offset: u32) -> u32 {
        self.base + offset * 4
    }

    /// Returns the registry used for decoding.
    pub fn registry(&self) -> &SignalRegistry {
        &self.registry
    }

    /// Reads the capture state.
    pub fn state(&self, bus: &mut impl ControlBus) -> Result<CaptureState, CaptureError> {
        let code = bus.read(self.addr(csr::STATE))?;
        CaptureState::from_code(code).ok_or(CaptureError::InvalidState(code))
    }

    /// Arms the capture.
    pub fn arm(&self, bus: &mut impl ControlBus) -> Result<(), CaptureError> {
        bus.write(self.addr(csr::ARM), 1)?;
        Ok(())
    }

    /// Requests a manual trigger.
    pub fn trigger(&self, bus: &mut impl ControlBus) -> Result<(), CaptureError> {
        bus.write(self.addr(csr::TRIGGER), 1)?;
        Ok(())
    }

    /// Drains every stored sample. The capture must be `Full`.
    pub fn read_samples(&self, bus: &mut impl ControlBus) -> Result<Vec<Sample>, CaptureError> {
        let state = self.state(bus)?;
        if state != CaptureState::Full {
            return Err(CaptureError::NotReady(state.to_string()));
        }
        let per_sample = bus.read(self.addr(csr::SAMPLE_WORDS))? as usize;

        let mut words = Vec::new();
        while bus.read(self.addr(csr::READ_VALID))? == 1 {
            words.push(bus.read(self.addr(csr::READ_DATA))?);
            bus.write(self.addr(csr::READ_NEXT), 1)?;
        }
        if per_sample == 0 || words.len() % per_sample != 0 {
            return Err(CaptureError::Truncated {
                words: words.len(),
                per_sample,
            });
        }
        tracing::debug!(
            samples = words.len() / per_sample,
            base = self.base,
            "capture read back"
        );
        Ok(words
            .chunks(per_sample)
            .map(|chunk| self.registry.unpack(chunk))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{CaptureBuffer, CaptureSettings, Trigger};
    use crate::csr::CaptureCsr;
    use crate::signal::{ProbeSignal, SignalGroup};
    use pipesoc_common::BusError;

    /// A bus with one capture endpoint at 0x1000.
    struct Bench {
        csr: CaptureCsr,
    }

    impl ControlBus for Bench {
        fn read(&mut self, addr: u32) -> Result<u32, BusError> {
            addr.checked_sub(0x1000)
                .and_then(|off| self.csr.read(off / 4))
                .ok_or(BusError::Unmapped { addr })
        }

        fn write(&mut self, addr: u32, value: u32) -> Result<(), BusError> {
            match addr.checked_sub(0x1000) {
                Some(off) if self.csr.write(off / 4, value) => Ok(()),
                _ => Err(BusError::Unmapped { addr }),
            }
        }
    }

    fn registry() -> SignalRegistry {
        SignalRegistry::new(&[SignalGroup::new(
            "bench",
            vec![ProbeSignal::new("count", 8), ProbeSignal::new("odd", 1)],
        )])
        .unwrap()
    }

    fn bench(depth: usize) -> Bench {
        let buffer = CaptureBuffer::new(
            registry(),
            CaptureSettings {
                depth,
                pre_trigger: 0,
                trigger: Trigger::Manual,
            },
        )
        .unwrap();
        Bench {
            csr: CaptureCsr::new(buffer),
        }
    }

    fn run(bench: &mut Bench, cycles: u64) {
        for i in 0..cycles {
            let sample = registry().sample(|name| match name {
                "count" => Some(i),
                "odd" => Some(i & 1),
                _ => None,
            });
            bench.csr.buffer_mut().clock(&sample);
        }
    }

    #[test]
    fn arm_trigger_drain() {
        let mut bus = bench(5);
        let reader = CaptureReader::new(0x1000, registry());
        reader.arm(&mut bus).unwrap();
        reader.trigger(&mut bus).unwrap();
        run(&mut bus, 20);
        assert_eq!(reader.state(&mut bus).unwrap(), CaptureState::Full);

        let samples = reader.read_samples(&mut bus).unwrap();
        let counts: Vec<_> = samples
            .iter()
            .map(|s| reader.registry().value(s, "count").unwrap())
            .collect();
        assert_eq!(counts, [0, 1, 2, 3, 4]);
        assert_eq!(reader.registry().value(&samples[3], "odd"), Some(1));
    }

    #[test]
    fn drain_before_full_fails() {
        let mut bus = bench(5);
        let reader = CaptureReader::new(0x1000, registry());
        reader.arm(&mut bus).unwrap();
        let err = reader.read_samples(&mut bus).unwrap_err();
        assert!(matches!(err, CaptureError::NotReady(ref s) if s == "armed"));
    }

    /// A bus whose every register reads the same value.
    struct Stuck(u32);

    impl ControlBus for Stuck {
        fn read(&mut self, _addr: u32) -> Result<u32, BusError> {
            Ok(self.0)
        }

        fn write(&mut self, _addr: u32, _value: u32) -> Result<(), BusError> {
            Ok(())
        }
    }

    #[test]
    fn unknown_state_code_rejected() {
        let reader = CaptureReader::new(0x1000, registry());
        let err = reader.state(&mut Stuck(7)).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidState(7)));
        assert_eq!(err.to_string(), "unknown capture state code 7");
        assert!(matches!(
            reader.read_samples(&mut Stuck(0xffff)).unwrap_err(),
            CaptureError::InvalidState(0xffff)
        ));
    }

    #[test]
    fn wrong_base_surfaces_bus_error() {
        let mut bus = bench(5);
        let reader = CaptureReader::new(0x0800, registry());
        assert!(matches!(
            reader.state(&mut bus).unwrap_err(),
            CaptureError::Bus(BusError::Unmapped { addr: 0x0800 })
        ));
    }
}

//! End-to-end data flow: cable -> serializer -> link -> core and back.

use pipesoc_config::load_config_from_str;
use pipesoc_soc::{SimError, SocBuilder, Subsystem, Symbol, System};
use pipesoc_stream::{frame, Backward, Beat, Forward, PortIo, StreamError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn system() -> System {
    let config = load_config_from_str("[reset]\npor_cycles = 16\npll_lock_cycles = 4\n").unwrap();
    SocBuilder::new(config).build().unwrap()
}

fn bring_up(system: &mut System) {
    assert!(system.run_until(10_000, |s| s.link().ready()).unwrap());
}

fn exchange(system: &mut System, sent: &[Beat<Symbol>]) -> Vec<Beat<Symbol>> {
    system.serializer_mut().receive(sent.to_vec());
    let mut received = Vec::new();
    let budget = sent.len() as u64 * 8 + 200;
    for _ in 0..budget {
        system.run(1).unwrap();
        received.extend(system.serializer_mut().take_transmitted());
        if received.len() >= sent.len() {
            break;
        }
    }
    received
}

#[test]
fn echoes_random_frames() {
    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut system = system();
        bring_up(&mut system);

        let mut sent = Vec::new();
        for _ in 0..rng.gen_range(1..6) {
            let len = rng.gen_range(1..12);
            sent.extend(frame((0..len).map(|_| rng.gen::<u32>())));
        }
        let received = exchange(&mut system, &sent);
        assert_eq!(received, sent, "seed {seed}");
    }
}

#[test]
fn nothing_flows_before_link_ready() {
    let mut system = system();
    system.serializer_mut().receive(frame::<Symbol>([1, 2, 3]));
    assert!(system.run_until(10_000, |s| s.serializer().ready()).unwrap());
    system.run(4).unwrap();
    assert!(!system.link().ready());
    assert!(system.serializer_mut().take_transmitted().is_empty());

    bring_up(&mut system);
    system.run(50).unwrap();
    assert_eq!(
        system.serializer_mut().take_transmitted(),
        frame::<Symbol>([1, 2, 3])
    );
}

#[test]
fn traffic_resumes_after_soft_reset() {
    use pipesoc_soc::ControlBus;

    let mut system = system();
    bring_up(&mut system);
    let reset = system
        .csr_map()
        .endpoint("ctrl")
        .and_then(|e| e.address_of("reset"))
        .unwrap();
    system.write(reset, 1).unwrap();
    system.run(1).unwrap();
    assert!(!system.link().ready());
    assert!(system.core_in_reset());

    bring_up(&mut system);
    let sent = frame([0xdead_beef, 0x0bad_f00d]);
    assert_eq!(exchange(&mut system, &sent), sent);
}

#[test]
fn soft_reset_mid_frame_discards_the_frame() {
    use pipesoc_soc::ControlBus;

    let mut system = system();
    bring_up(&mut system);
    let reset = system
        .csr_map()
        .endpoint("ctrl")
        .and_then(|e| e.address_of("reset"))
        .unwrap();

    system.serializer_mut().receive(frame(0..20u32));
    system.run(6).unwrap();
    assert!(system.serializer_mut().take_transmitted().len() < 20);

    system.write(reset, 1).unwrap();
    system.run(1).unwrap();
    assert!(!system.link().ready());
    bring_up(&mut system);
    system.run(50).unwrap();
    assert!(system.serializer_mut().take_transmitted().is_empty());

    let sent = frame([0x600d_f00d, 0x0000_0001, 0x0000_0002]);
    assert_eq!(exchange(&mut system, &sent), sent);
}

/// A core that emits a continuation beat outside any frame.
struct OrphanCore;

impl Subsystem for OrphanCore {
    fn name(&self) -> &str {
        "orphan"
    }

    fn ready(&self) -> bool {
        true
    }

    fn source(&self) -> Forward<Symbol> {
        Forward::present(Beat::new(7, false, false))
    }

    fn sink(&self) -> Backward {
        Backward::new(true)
    }

    fn clock(&mut self, _io: PortIo<Symbol>, _reset: bool) {}
}

#[test]
fn framing_violation_stops_simulation() {
    let config = load_config_from_str("[reset]\npor_cycles = 16\npll_lock_cycles = 4\n").unwrap();
    let mut system = SocBuilder::new(config).with_core(OrphanCore).build().unwrap();
    let err = system.run(10_000).unwrap_err();
    match err {
        SimError::Stream { time_fs, source } => {
            assert!(time_fs > 0);
            assert!(matches!(
                source,
                StreamError::Orphan { ref link } if link == "core.source -> link.core_sink"
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

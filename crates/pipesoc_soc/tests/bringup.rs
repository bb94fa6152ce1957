//! Power-on reset, PLL lock, reset release and status LEDs of an assembled
//! system.

use pipesoc_config::load_config_from_str;
use pipesoc_soc::{AssembleError, ControlBus, SocBuilder, StatusLeds, System};

fn system(extra: &str) -> System {
    let toml = format!("[reset]\npor_cycles = 32\npll_lock_cycles = 8\n{extra}");
    SocBuilder::new(load_config_from_str(&toml).unwrap())
        .build()
        .unwrap()
}

fn bring_up(system: &mut System) {
    assert!(system.run_until(10_000, |s| s.link().ready()).unwrap());
}

// -- reset sequencing --

#[test]
fn por_counts_reference_cycles() {
    let mut system = system("");
    while !system.por().done() {
        system.step().unwrap();
    }
    assert_eq!(system.cycles("por"), Some(32));
    assert!(system.pll_locked());
}

#[test]
fn domains_wait_for_pll_lock() {
    let config = load_config_from_str("[reset]\npor_cycles = 32\npll_lock_cycles = 20\n").unwrap();
    let mut system = SocBuilder::new(config).build().unwrap();
    loop {
        system.step().unwrap();
        if system.pll_locked() {
            break;
        }
        assert_eq!(system.cycles("sys"), Some(0));
        assert_eq!(system.cycles("clk250"), Some(0));
    }
    assert_eq!(system.cycles("por"), Some(20));
    // An edge coinciding with the locking reference edge already counts.
    let locked_at = system.cycles("sys").unwrap();
    assert!(locked_at <= 1);
    system.run(4).unwrap();
    assert_eq!(system.cycles("sys"), Some(locked_at + 4));
}

#[test]
fn sys_reset_released_after_sync_stages() {
    let mut system = system("");
    while !system.por().done() {
        system.step().unwrap();
        assert_eq!(system.domain_reset("sys"), Some(true));
    }
    assert_eq!(system.domain_reset("sys"), Some(true));
    system.run(2).unwrap();
    assert_eq!(system.domain_reset("sys"), Some(false));
    assert_eq!(system.domain_reset("clk250"), Some(false));
}

#[test]
fn system_reset_holds_everything() {
    let mut system = system("");
    bring_up(&mut system);

    // Versa reset pin is active low.
    system.set_reset_pin(false);
    system.run(500).unwrap();
    assert_eq!(system.por().count(), system.por().initial());
    assert_eq!(system.domain_reset("sys"), Some(true));
    assert!(!system.serializer().ready());
    assert!(!system.link().ready());
    assert!(system.core_in_reset());

    system.set_reset_pin(true);
    bring_up(&mut system);
    system.run(1).unwrap();
    assert!(!system.core_in_reset());
}

#[test]
fn kc705_reset_pin_is_active_high() {
    let mut system = system("[soc]\nboard = \"kc705\"\n");
    bring_up(&mut system);
    system.set_reset_pin(true);
    system.run(10).unwrap();
    assert!(!system.link().ready());
    system.set_reset_pin(false);
    bring_up(&mut system);
}

// -- status LEDs --

#[test]
fn leds_follow_bring_up() {
    let mut system = system("");
    let both = StatusLeds {
        led0: true,
        led1: true,
    };
    assert_eq!(system.leds(), both);

    assert!(system.run_until(10_000, |s| s.serializer().ready()).unwrap());
    assert_eq!(
        system.leds(),
        StatusLeds {
            led0: false,
            led1: true
        }
    );

    bring_up(&mut system);
    assert_eq!(system.leds(), StatusLeds::default());

    system.set_system_reset(true);
    system.run(4).unwrap();
    assert_eq!(system.leds(), both);
}

#[test]
fn status_registers_synchronized() {
    let mut system = system("");
    bring_up(&mut system);
    let status = system.csr_map().endpoint("status").unwrap().clone();
    let leds = status.address_of("leds").unwrap();
    let link_ready = status.address_of("link_ready").unwrap();

    // Two synchronizer stages behind the link.
    assert_eq!(system.read(link_ready), Ok(0));
    system.run(2).unwrap();
    assert_eq!(system.read(link_ready), Ok(1));
    assert_eq!(system.read(leds), Ok(0));
}

// -- clock planning --

#[test]
fn unachievable_clock_fails_assembly() {
    let config = load_config_from_str("[clocks.sys]\nfrequency = \"900MHz\"\n").unwrap();
    let err = SocBuilder::new(config).build().err().unwrap();
    assert!(matches!(err, AssembleError::Clock(_)), "{err}");
}

#[test]
fn por_domain_runs_on_reference() {
    let system = system("[soc]\nboard = \"kc705\"\n");
    let por = system.plan().por_domain();
    assert_eq!(por.name, "por");
    assert_eq!(por.frequency.mhz(), 200.0);
    assert_eq!(system.plan().domain("oob").unwrap().frequency.hz(), 15.625e6);
}

//! Control-bus layout, register access and build artifacts.

use pipesoc_config::load_config_from_str;
use pipesoc_soc::{BusError, ControlBus, SocBuilder, System, IDENT, REGION_SIZE};
use std::net::Ipv4Addr;

fn system(extra: &str) -> System {
    let toml = format!("[reset]\npor_cycles = 16\npll_lock_cycles = 4\n{extra}");
    SocBuilder::new(load_config_from_str(&toml).unwrap())
        .build()
        .unwrap()
}

fn address(system: &System, endpoint: &str, register: &str) -> u32 {
    system
        .csr_map()
        .endpoint(endpoint)
        .and_then(|e| e.address_of(register))
        .unwrap()
}

// -- layout --

#[test]
fn endpoint_count_tracks_options() {
    let plain = system("");
    assert_eq!(plain.csr_map().endpoints().len(), 3);
    assert_eq!(plain.csr_map().endpoint("core").unwrap().base, 2 * REGION_SIZE);

    let ether = system("[soc]\nethernet_control = true\n");
    assert_eq!(ether.csr_map().endpoints().len(), 4);
    assert_eq!(ether.csr_map().endpoint("etherbone").unwrap().base, 2 * REGION_SIZE);
    assert_eq!(ether.csr_map().endpoint("core").unwrap().base, 3 * REGION_SIZE);

    let both = system("[soc]\nethernet_control = true\ndebug_capture = true\n");
    assert_eq!(both.csr_map().endpoints().len(), 5);
}

// -- registers --

#[test]
fn scratch_round_trip() {
    let mut system = system("");
    let scratch = address(&system, "ctrl", "scratch");
    assert_eq!(system.read(scratch), Ok(0x1234_5678));
    system.write(scratch, 0xcafe_f00d).unwrap();
    assert_eq!(system.read(scratch), Ok(0xcafe_f00d));
}

#[test]
fn identifier_reads_back() {
    let mut system = system("");
    let length = address(&system, "ctrl", "ident_length");
    let cursor = address(&system, "ctrl", "ident_address");
    let data = address(&system, "ctrl", "ident_data");

    let len = system.read(length).unwrap();
    assert_eq!(len as usize, IDENT.len());
    let mut bytes = Vec::new();
    for i in 0..len {
        system.write(cursor, i).unwrap();
        bytes.push(system.read(data).unwrap() as u8);
    }
    let ident = String::from_utf8(bytes).unwrap();
    assert!(ident.starts_with("USB3SoC "));
    assert_eq!(ident, IDENT);

    system.write(cursor, len).unwrap();
    assert_eq!(system.read(data), Ok(0));
}

#[test]
fn core_status_registers() {
    let mut system = system("");
    let ready = address(&system, "core", "ready");
    let in_reset = address(&system, "core", "in_reset");
    let sent = address(&system, "core", "beats_sent");
    assert_eq!(system.read(ready), Ok(0));
    assert_eq!(system.read(in_reset), Ok(1));

    assert!(system.run_until(10_000, |s| s.link().ready()).unwrap());
    system.serializer_mut().receive(pipesoc_stream::frame([1u32, 2, 3]));
    system.run(50).unwrap();
    assert_eq!(system.read(ready), Ok(1));
    assert_eq!(system.read(in_reset), Ok(0));
    assert_eq!(system.read(sent), Ok(3));
}

#[test]
fn bus_errors_are_counted() {
    let mut system = system("");
    let errors = address(&system, "ctrl", "bus_errors");
    assert_eq!(system.read(0x3000), Err(BusError::Unmapped { addr: 0x3000 }));
    assert_eq!(system.write(0x0806, 1), Err(BusError::Misaligned { addr: 0x0806 }));
    assert_eq!(system.read(0x0800 + 0x40), Err(BusError::Unmapped { addr: 0x0840 }));
    assert_eq!(system.read(errors), Ok(3));
}

#[test]
fn etherbone_identity() {
    let mut system = system(
        "[soc]\nethernet_control = true\n[ethernet]\nip_address = \"10.0.0.2\"\nmac_address = 0x0012_3456_789a\n",
    );
    let ip = address(&system, "etherbone", "ip_address");
    let mac_high = address(&system, "etherbone", "mac_high");
    let mac_low = address(&system, "etherbone", "mac_low");
    let ready = address(&system, "etherbone", "ready");

    assert_eq!(system.ethernet().unwrap().ip_address(), Ipv4Addr::new(10, 0, 0, 2));
    assert_eq!(system.read(ip), Ok(u32::from(Ipv4Addr::new(10, 0, 0, 2))));
    assert_eq!(system.read(mac_high), Ok(0x0012));
    assert_eq!(system.read(mac_low), Ok(0x3456_789a));
    assert_eq!(system.read(ready), Ok(0));
    system.run(40).unwrap();
    assert_eq!(system.read(ready), Ok(1));
}

#[test]
fn cycle_counter_register() {
    let mut system = system("");
    let cycles = address(&system, "status", "sys_cycles");
    system.run(25).unwrap();
    assert_eq!(system.read(cycles), Ok(25));
}

// -- artifacts --

#[test]
fn artifacts_written_to_directory() {
    let system = system("[soc]\nboard = \"kc705\"\nconnector = \"sma\"\ndebug_capture = true\n");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("build");
    let written = system.artifacts().unwrap().write_to(&out).unwrap();
    assert_eq!(written.len(), 5);

    let csr = std::fs::read_to_string(out.join("csr.csv")).unwrap();
    assert!(csr.starts_with("csr_base,ctrl,0x00000000\n"));
    assert!(csr.contains("csr_base,core,0x00001000\n"));
    assert!(csr.contains("csr_base,analyzer,0x00001800\n"));
    assert!(csr.contains("csr_register,analyzer_read_data,"));

    let sdc = std::fs::read_to_string(out.join("constraints.sdc")).unwrap();
    assert!(sdc.contains("create_clock -name clk200 -period 5.000 [get_ports {clk200}]"));
    assert!(sdc.contains("create_clock -name sys -period 8.000 [get_nets {sys_clk}]"));
    assert!(sdc.contains("create_clock -name oob -period 64.000 [get_nets {oob_clk}]"));

    let pins = std::fs::read_to_string(out.join("pins.csv")).unwrap();
    assert!(pins.contains("serdes,tx_p,K2\n"));

    let json = std::fs::read_to_string(out.join("analyzer.json")).unwrap();
    assert!(json.contains("\"depth\""));
}

#[test]
fn no_analyzer_artifacts_without_capture() {
    let system = system("");
    let dir = tempfile::tempdir().unwrap();
    let written = system.artifacts().unwrap().write_to(dir.path()).unwrap();
    let names: Vec<_> = written
        .iter()
        .filter_map(|p| p.file_name()?.to_str().map(str::to_owned))
        .collect();
    assert_eq!(names, vec!["csr.csv", "constraints.sdc", "pins.csv"]);
}

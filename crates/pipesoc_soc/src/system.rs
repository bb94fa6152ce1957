//! The assembled system and its cycle-level simulation.
//!
//! [`System::step`] advances to the next rising edge. The `por` domain runs
//! the power-on counter and PLL lock; it drives every derived domain's reset
//! synchronizer with `!por_done || !pll_locked || system_reset`. PLL outputs
//! only toggle once the PLL has locked. On each `sys` edge the handshakes of
//! all four links are resolved from registered model outputs, the capture
//! samples the resolved cycle, and then every model is clocked.

use crate::artifacts::Artifacts;
use crate::bus::CsrMap;
use crate::error::SimError;
use crate::ethernet::EthernetControl;
use crate::probe::{CycleView, StreamView};
use crate::status::{status_outputs, StatusLeds};
use crate::subsystem::{LinkLayer, Serializer, Subsystem, Symbol};
use pipesoc_clock::{
    BitSynchronizer, ClockPlan, EdgeScheduler, EdgeSet, PllLock, PowerOnReset, ResetSynchronizer,
};
use pipesoc_common::{BusError, ControlBus, DomainId};
use pipesoc_config::ValidatedConfig;
use pipesoc_scope::{CaptureCsr, CaptureError, CaptureReader};
use pipesoc_stream::{PortIo, StreamLink};

/// Name of the control endpoint.
pub const CTRL: &str = "ctrl";
/// Name of the status endpoint.
pub const STATUS: &str = "status";
/// Name of the Ethernet bridge endpoint.
pub const ETHERBONE: &str = "etherbone";
/// Name of the protocol core endpoint.
pub const CORE: &str = "core";
/// Name of the debug capture endpoint.
pub const ANALYZER: &str = "analyzer";

/// Registers of the `ctrl` endpoint.
pub const CTRL_REGISTERS: [&str; 6] = [
    "reset",
    "scratch",
    "bus_errors",
    "ident_length",
    "ident_address",
    "ident_data",
];
/// Registers of the `status` endpoint.
pub const STATUS_REGISTERS: [&str; 4] = ["serializer_ready", "link_ready", "leds", "sys_cycles"];
/// Registers of the `core` endpoint.
pub const CORE_REGISTERS: [&str; 3] = ["ready", "in_reset", "beats_sent"];

/// Identification string read back through `ctrl.ident_data`, one byte per
/// address.
pub const IDENT: &str = concat!("USB3SoC ", env!("CARGO_PKG_VERSION"));

/// Power-on value of the `ctrl` scratch register.
pub const SCRATCH_RESET: u32 = 0x1234_5678;

/// The four links of the serializer, link layer and core chain.
#[derive(Clone, Debug)]
pub(crate) struct Links {
    /// Serializer receive lane into the link layer.
    pub rx: StreamLink<Symbol>,
    /// Link layer into the serializer transmit lane.
    pub tx: StreamLink<Symbol>,
    /// Link layer into the core.
    pub up: StreamLink<Symbol>,
    /// Core into the link layer.
    pub down: StreamLink<Symbol>,
}

impl Links {
    fn reset(&mut self) {
        self.rx.reset();
        self.tx.reset();
        self.up.reset();
        self.down.reset();
    }
}

/// A fully assembled system. Owns every component.
pub struct System {
    pub(crate) config: ValidatedConfig,
    pub(crate) plan: ClockPlan,
    pub(crate) scheduler: EdgeScheduler,
    pub(crate) sys: DomainId,
    pub(crate) por: PowerOnReset,
    pub(crate) pll_lock: PllLock,
    pub(crate) domain_resets: Vec<Option<ResetSynchronizer>>,
    pub(crate) edges: Vec<u64>,
    pub(crate) system_reset: bool,
    pub(crate) serializer: Box<dyn Serializer>,
    pub(crate) link: Box<dyn LinkLayer>,
    pub(crate) core: Box<dyn Subsystem>,
    pub(crate) ethernet: Option<EthernetControl>,
    pub(crate) capture: Option<CaptureCsr>,
    pub(crate) links: Links,
    pub(crate) csr: CsrMap,
    pub(crate) status_sync: [BitSynchronizer; 2],
    pub(crate) scratch: u32,
    pub(crate) bus_errors: u32,
    pub(crate) ident_address: u32,
    pub(crate) core_reset: bool,
}

impl System {
    /// Returns the configuration the system was built from.
    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Returns the solved clock plan.
    pub fn plan(&self) -> &ClockPlan {
        &self.plan
    }

    /// Returns the control-bus map.
    pub fn csr_map(&self) -> &CsrMap {
        &self.csr
    }

    /// Returns the current simulation time in femtoseconds.
    pub fn now_fs(&self) -> u64 {
        self.scheduler.now_fs()
    }

    /// Returns the number of rising edges the named domain has seen.
    pub fn cycles(&self, domain: &str) -> Option<u64> {
        self.plan
            .domain(domain)
            .and_then(|d| self.edges.get(d.id.index()).copied())
    }

    /// Returns the number of `sys` edges so far.
    pub fn sys_cycles(&self) -> u64 {
        self.edges[self.sys.index()]
    }

    /// Returns the power-on reset sequencer.
    pub fn por(&self) -> &PowerOnReset {
        &self.por
    }

    /// Returns true once the PLL has locked.
    pub fn pll_locked(&self) -> bool {
        self.pll_lock.locked()
    }

    /// Returns the synchronized reset of the named domain. Reset-less
    /// domains report `false`.
    pub fn domain_reset(&self, domain: &str) -> Option<bool> {
        let id = self.plan.domain(domain)?.id;
        Some(
            self.domain_resets[id.index()]
                .as_ref()
                .is_some_and(|sync| sync.output()),
        )
    }

    /// Returns the serializer.
    pub fn serializer(&self) -> &dyn Serializer {
        self.serializer.as_ref()
    }

    /// Returns the serializer, for driving its cable side.
    pub fn serializer_mut(&mut self) -> &mut dyn Serializer {
        self.serializer.as_mut()
    }

    /// Returns the link layer.
    pub fn link(&self) -> &dyn LinkLayer {
        self.link.as_ref()
    }

    /// Returns the protocol core.
    pub fn core(&self) -> &dyn Subsystem {
        self.core.as_ref()
    }

    /// Returns true if the core is held in reset.
    pub fn core_in_reset(&self) -> bool {
        self.core_reset
    }

    /// Returns the Ethernet bridge, if assembled.
    pub fn ethernet(&self) -> Option<&EthernetControl> {
        self.ethernet.as_ref()
    }

    /// Returns the debug capture, if assembled.
    pub fn capture(&self) -> Option<&CaptureCsr> {
        self.capture.as_ref()
    }

    /// Returns a host-side reader for the capture endpoint.
    pub fn capture_reader(&self) -> Option<CaptureReader> {
        let capture = self.capture.as_ref()?;
        let endpoint = self.csr.endpoint(ANALYZER)?;
        Some(CaptureReader::new(
            endpoint.base,
            capture.buffer().registry().clone(),
        ))
    }

    /// Renders the build artifacts of this system.
    pub fn artifacts(&self) -> Result<Artifacts, CaptureError> {
        Artifacts::collect(self)
    }

    /// Returns the `sys` clock period in femtoseconds.
    pub fn sys_period_fs(&self) -> u64 {
        self.scheduler.period_fs(self.sys).unwrap_or(1)
    }

    /// Returns the status LED levels.
    pub fn leds(&self) -> StatusLeds {
        status_outputs(self.serializer.ready(), self.link.ready())
    }

    /// Drives the system reset input. Assertion re-activates power-on reset
    /// and asserts every domain reset immediately; the counter is held at
    /// its initial value while the input stays asserted.
    pub fn set_system_reset(&mut self, asserted: bool) {
        if asserted && !self.system_reset {
            tracing::info!("system reset asserted");
        }
        self.system_reset = asserted;
        if asserted {
            self.restart_por();
        }
    }

    /// Drives the board reset pin at electrical `level`, honoring its
    /// polarity.
    pub fn set_reset_pin(&mut self, level: bool) {
        let active_low = self.config.board().reset_pin.active_low;
        self.set_system_reset(level != active_low);
    }

    fn restart_por(&mut self) {
        self.por.reactivate();
        for sync in self.domain_resets.iter_mut().flatten() {
            sync.drive(true);
        }
    }

    /// Advances to the next rising edge and clocks every domain that has one.
    pub fn step(&mut self) -> Result<EdgeSet, SimError> {
        let edges = self.scheduler.advance().ok_or(SimError::NoClocks)?;
        for &id in &edges.domains {
            if id == self.plan.por_domain().id {
                self.edges[id.index()] += 1;
                self.clock_por();
            } else {
                self.clock_derived(id, edges.time_fs)?;
            }
        }
        Ok(edges)
    }

    /// Runs until the `sys` domain has seen `cycles` more edges.
    pub fn run(&mut self, cycles: u64) -> Result<(), SimError> {
        let target = self.sys_cycles() + cycles;
        while self.sys_cycles() < target {
            self.step()?;
        }
        Ok(())
    }

    /// Runs until `done` holds, checking after every edge, for at most
    /// `max_cycles` `sys` edges. Returns whether `done` was reached.
    pub fn run_until(
        &mut self,
        max_cycles: u64,
        mut done: impl FnMut(&System) -> bool,
    ) -> Result<bool, SimError> {
        let limit = self.sys_cycles() + max_cycles;
        while !done(self) {
            if self.sys_cycles() >= limit {
                return Ok(false);
            }
            self.step()?;
        }
        Ok(true)
    }

    fn clock_por(&mut self) {
        if self.system_reset {
            self.por.reactivate();
        } else {
            self.por.tick();
        }
        let was_locked = self.pll_lock.locked();
        self.pll_lock.tick();
        if !was_locked && self.pll_lock.locked() {
            tracing::info!(vco = %self.plan.pll.vco, "pll locked");
        }
        let async_reset = !self.por.done() || !self.pll_lock.locked() || self.system_reset;
        for sync in self.domain_resets.iter_mut().flatten() {
            sync.drive(async_reset);
        }
    }

    fn clock_derived(&mut self, id: DomainId, time_fs: u64) -> Result<(), SimError> {
        if !self.pll_lock.locked() {
            return Ok(());
        }
        self.edges[id.index()] += 1;
        let reset = match self.domain_resets[id.index()].as_mut() {
            Some(sync) => {
                let reset = sync.output();
                sync.clock();
                reset
            }
            None => false,
        };
        if id == self.sys {
            self.clock_sys(reset, time_fs)?;
        }
        Ok(())
    }

    fn clock_sys(&mut self, reset: bool, time_fs: u64) -> Result<(), SimError> {
        let serdes_fwd = self.serializer.source();
        let serdes_bwd = self.serializer.sink();
        let phy_fwd = self.link.phy_source();
        let phy_bwd = self.link.phy_sink();
        let up_fwd = self.link.core_source();
        let down_bwd = self.link.core_sink();
        let core_fwd = self.core.source();
        let core_bwd = self.core.sink();

        let stream = |source| SimError::Stream { time_fs, source };
        let rx = self.links.rx.handshake(&serdes_fwd, phy_bwd).map_err(stream)?;
        let tx = self.links.tx.handshake(&phy_fwd, serdes_bwd).map_err(stream)?;
        let up = self.links.up.handshake(&up_fwd, core_bwd).map_err(stream)?;
        let down = self.links.down.handshake(&core_fwd, down_bwd).map_err(stream)?;

        let serializer_ready = self.serializer.ready();
        let link_ready = self.link.ready();
        let core_reset = reset || !link_ready;

        if let Some(capture) = self.capture.as_mut() {
            let view = CycleView {
                serializer_ready,
                link_ready,
                sys_reset: reset,
                core_reset,
                streams: [
                    StreamView {
                        forward: &serdes_fwd,
                        backward: phy_bwd,
                    },
                    StreamView {
                        forward: &phy_fwd,
                        backward: serdes_bwd,
                    },
                    StreamView {
                        forward: &up_fwd,
                        backward: core_bwd,
                    },
                    StreamView {
                        forward: &core_fwd,
                        backward: down_bwd,
                    },
                ],
            };
            let sample = capture.buffer().registry().sample(|name| view.value(name));
            capture.buffer_mut().clock(&sample);
        }

        self.serializer.clock(
            PortIo {
                inbound: tx.delivered,
                outbound_accepted: rx.accepted,
            },
            reset,
        );
        self.link.clock(
            PortIo {
                inbound: rx.delivered,
                outbound_accepted: tx.accepted,
            },
            PortIo {
                inbound: down.delivered,
                outbound_accepted: up.accepted,
            },
            reset,
            serializer_ready,
        );
        self.core.clock(
            PortIo {
                inbound: up.delivered,
                outbound_accepted: down.accepted,
            },
            core_reset,
        );
        if let Some(ethernet) = self.ethernet.as_mut() {
            ethernet.clock(PortIo::quiet(), reset);
        }
        self.core_reset = core_reset;

        self.status_sync[0].clock(self.serializer.ready());
        self.status_sync[1].clock(self.link.ready());
        if !self.link.ready() {
            self.links.reset();
        }
        Ok(())
    }

    fn read_register(&mut self, endpoint: &str, offset: u32) -> Option<u32> {
        match (endpoint, offset) {
            (CTRL, 0) => Some(0),
            (CTRL, 1) => Some(self.scratch),
            (CTRL, 2) => Some(self.bus_errors),
            (CTRL, 3) => Some(IDENT.len() as u32),
            (CTRL, 4) => Some(self.ident_address),
            (CTRL, 5) => Some(
                IDENT
                    .as_bytes()
                    .get(self.ident_address as usize)
                    .map_or(0, |&b| u32::from(b)),
            ),
            (STATUS, 0) => Some(u32::from(self.status_sync[0].output())),
            (STATUS, 1) => Some(u32::from(self.status_sync[1].output())),
            (STATUS, 2) => Some(
                status_outputs(self.status_sync[0].output(), self.status_sync[1].output()).bits(),
            ),
            (STATUS, 3) => Some(self.sys_cycles() as u32),
            (ETHERBONE, _) => self.ethernet.as_ref()?.read(offset),
            (CORE, 0) => Some(u32::from(self.core.ready())),
            (CORE, 1) => Some(u32::from(self.core_reset)),
            (CORE, 2) => Some(self.core.beats_sent() as u32),
            (ANALYZER, _) => self.capture.as_mut()?.read(offset),
            _ => None,
        }
    }

    fn write_register(&mut self, endpoint: &str, offset: u32, value: u32) -> bool {
        match (endpoint, offset) {
            (CTRL, 0) => {
                if value & 1 == 1 {
                    tracing::info!("soft reset requested");
                    self.restart_por();
                }
                true
            }
            (CTRL, 1) => {
                self.scratch = value;
                true
            }
            (CTRL, 4) => {
                self.ident_address = value;
                true
            }
            (CTRL, _) | (STATUS, _) | (ETHERBONE, _) | (CORE, _) => true,
            (ANALYZER, _) => self
                .capture
                .as_mut()
                .is_some_and(|capture| capture.write(offset, value)),
            _ => false,
        }
    }

    fn bus_error<T>(&mut self, err: BusError) -> Result<T, BusError> {
        self.bus_errors = self.bus_errors.wrapping_add(1);
        tracing::warn!(error = %err, count = self.bus_errors, "control bus error");
        Err(err)
    }
}

impl ControlBus for System {
    fn read(&mut self, addr: u32) -> Result<u32, BusError> {
        let (id, offset) = match self.csr.decode(addr) {
            Ok(decoded) => decoded,
            Err(err) => return self.bus_error(err),
        };
        let endpoint = self.csr.endpoints()[id.index()].name;
        match self.read_register(endpoint, offset) {
            Some(value) => Ok(value),
            None => self.bus_error(BusError::Unmapped { addr }),
        }
    }

    fn write(&mut self, addr: u32, value: u32) -> Result<(), BusError> {
        let (id, offset) = match self.csr.decode(addr) {
            Ok(decoded) => decoded,
            Err(err) => return self.bus_error(err),
        };
        let endpoint = self.csr.endpoints()[id.index()].name;
        if self.write_register(endpoint, offset, value) {
            Ok(())
        } else {
            self.bus_error(BusError::Unmapped { addr })
        }
    }
}

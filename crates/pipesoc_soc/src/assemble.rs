//! System assembly.
//!
//! Everything that can fail (clock planning, capture layout) runs before any
//! subsystem is instantiated, so a rejected configuration leaves nothing
//! half-built.

use crate::bus::CsrMap;
use crate::echo::EchoCore;
use crate::error::AssembleError;
use crate::ethernet::{EthernetControl, REGISTERS as ETHERBONE_REGISTERS};
use crate::link::LinkModel;
use crate::probe::probe_groups;
use crate::serdes::SerdesModel;
use crate::subsystem::{LinkLayer, Serializer, Subsystem};
use crate::system::{
    Links, System, ANALYZER, CORE, CORE_REGISTERS, CTRL, CTRL_REGISTERS, ETHERBONE,
    SCRATCH_RESET, STATUS, STATUS_REGISTERS,
};
use pipesoc_clock::{
    BitSynchronizer, ClockPlan, EdgeScheduler, PllLock, PowerOnReset, ResetSynchronizer,
};
use pipesoc_config::{CaptureConfig, ValidatedConfig};
use pipesoc_scope::csr::REGISTER_NAMES as ANALYZER_REGISTERS;
use pipesoc_scope::{CaptureBuffer, CaptureCsr, CaptureSettings, SignalRegistry, Trigger};
use pipesoc_stream::{connect, SinkPort, SourcePort};

/// Domain every stream subsystem is clocked in.
pub const SYS_DOMAIN: &str = "sys";

/// Builds a [`System`] from a validated configuration.
///
/// The serializer, link layer and core default to the reference models;
/// any of them can be replaced before [`build`](Self::build).
pub struct SocBuilder {
    config: ValidatedConfig,
    serializer: Option<Box<dyn Serializer>>,
    link: Option<Box<dyn LinkLayer>>,
    core: Option<Box<dyn Subsystem>>,
}

impl SocBuilder {
    /// Starts assembling for `config`.
    pub fn new(config: ValidatedConfig) -> Self {
        Self {
            config,
            serializer: None,
            link: None,
            core: None,
        }
    }

    /// Replaces the serializer model.
    pub fn with_serializer(mut self, serializer: impl Serializer + 'static) -> Self {
        self.serializer = Some(Box::new(serializer));
        self
    }

    /// Replaces the link-layer model.
    pub fn with_link(mut self, link: impl LinkLayer + 'static) -> Self {
        self.link = Some(Box::new(link));
        self
    }

    /// Replaces the protocol core.
    pub fn with_core(mut self, core: impl Subsystem + 'static) -> Self {
        self.core = Some(Box::new(core));
        self
    }

    /// Solves the clock plan, instantiates and connects every subsystem, and
    /// lays out the control bus.
    pub fn build(self) -> Result<System, AssembleError> {
        let config = self.config;
        let plan = ClockPlan::from_config(&config)?;
        let sys = plan
            .domain(SYS_DOMAIN)
            .ok_or_else(|| AssembleError::MissingDomain(SYS_DOMAIN.to_string()))?
            .id;
        let capture = if config.debug_capture() {
            Some(capture_endpoint(config.capture())?)
        } else {
            None
        };

        let mut serializer = self
            .serializer
            .unwrap_or_else(|| Box::new(SerdesModel::default()));
        serializer.bind(*config.connector_pins());
        let link = self.link.unwrap_or_else(|| Box::new(LinkModel::default()));
        let core = self.core.unwrap_or_else(|| Box::new(EchoCore::new()));
        let ethernet = config
            .ethernet_control()
            .then(|| EthernetControl::new(config.ethernet()));

        let links = Links {
            rx: connect(
                SourcePort::new("serdes", "source"),
                SinkPort::new("link", "phy_sink"),
            ),
            tx: connect(
                SourcePort::new("link", "phy_source"),
                SinkPort::new("serdes", "sink"),
            ),
            up: connect(
                SourcePort::new("link", "core_source"),
                SinkPort::new("core", "sink"),
            ),
            down: connect(
                SourcePort::new("core", "source"),
                SinkPort::new("link", "core_sink"),
            ),
        };

        let mut csr = CsrMap::new();
        csr.register(CTRL, &CTRL_REGISTERS);
        csr.register(STATUS, &STATUS_REGISTERS);
        if ethernet.is_some() {
            csr.register(ETHERBONE, &ETHERBONE_REGISTERS);
        }
        csr.register(CORE, &CORE_REGISTERS);
        if capture.is_some() {
            csr.register(ANALYZER, &ANALYZER_REGISTERS);
        }

        let mut scheduler = EdgeScheduler::new();
        for domain in &plan.domains {
            scheduler.register(domain.id, domain.frequency.period_fs());
        }
        let stages = config.reset().sync_stages as usize;
        let domain_resets = plan
            .domains
            .iter()
            .map(|d| {
                (d.is_derived() && d.reset.has_reset()).then(|| ResetSynchronizer::new(stages))
            })
            .collect();

        tracing::info!(
            board = config.board().name,
            connector = %config.connector(),
            domains = plan.domains.len(),
            endpoints = csr.endpoints().len(),
            "system assembled"
        );

        Ok(System {
            por: PowerOnReset::new(config.reset().por_cycles),
            pll_lock: PllLock::new(config.reset().pll_lock_cycles),
            edges: vec![0; plan.domains.len()],
            config,
            plan,
            scheduler,
            sys,
            domain_resets,
            system_reset: false,
            serializer,
            link,
            core,
            ethernet,
            capture,
            links,
            csr,
            status_sync: [BitSynchronizer::default(), BitSynchronizer::default()],
            scratch: SCRATCH_RESET,
            bus_errors: 0,
            ident_address: 0,
            core_reset: true,
        })
    }
}

fn capture_endpoint(config: &CaptureConfig) -> Result<CaptureCsr, AssembleError> {
    let registry = SignalRegistry::select(&probe_groups(), &config.groups)?;
    let trigger = match &config.trigger {
        Some(def) => Trigger::Match {
            signal: def.signal.clone(),
            value: def.value,
        },
        None => Trigger::Manual,
    };
    let buffer = CaptureBuffer::new(
        registry,
        CaptureSettings {
            depth: config.depth,
            pre_trigger: config.pre_trigger,
            trigger,
        },
    )?;
    Ok(CaptureCsr::new(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipesoc_config::load_config_from_str;

    fn builder(toml: &str) -> SocBuilder {
        SocBuilder::new(load_config_from_str(toml).unwrap())
    }

    #[test]
    fn minimal_endpoints() {
        let system = builder("[soc]\nboard = \"versa_ecp5\"\n").build().unwrap();
        let names: Vec<_> = system.csr_map().endpoints().iter().map(|e| e.name).collect();
        assert_eq!(names, vec![CTRL, STATUS, CORE]);
        assert!(system.ethernet().is_none());
        assert!(system.capture().is_none());
    }

    #[test]
    fn optional_endpoints_in_order() {
        let system = builder(
            "[soc]\nboard = \"kc705\"\nethernet_control = true\ndebug_capture = true\n",
        )
        .build()
        .unwrap();
        let names: Vec<_> = system.csr_map().endpoints().iter().map(|e| e.name).collect();
        assert_eq!(names, vec![CTRL, STATUS, ETHERBONE, CORE, ANALYZER]);
        assert_eq!(system.csr_map().endpoint(ANALYZER).unwrap().base, 0x2000);
    }

    #[test]
    fn serializer_bound_to_connector() {
        let system = builder("[soc]\nboard = \"versa_ecp5\"\nconnector = \"sma\"\n")
            .build()
            .unwrap();
        let pins = system.serializer().pins().unwrap();
        assert_eq!(pins.channel, 1);
        assert_eq!(pins.tx.p, "W8");
    }

    #[test]
    fn bad_capture_group_fails_assembly() {
        let err = builder(
            "[soc]\ndebug_capture = true\n[capture]\ngroups = [\"nope\"]\n",
        )
        .build()
        .err()
        .unwrap();
        assert!(matches!(err, AssembleError::Capture(_)));
    }

    #[test]
    fn reset_less_domains_have_no_synchronizer() {
        let system = builder(
            "[clocks.aux]\nfrequency = \"sys/5\"\nreset = \"reset_less\"\n",
        )
        .build()
        .unwrap();
        assert_eq!(system.domain_reset("aux"), Some(false));
        assert_eq!(system.domain_reset("sys"), Some(true));
    }
}

//! Signals the debug capture can observe.
//!
//! Groups: `status` plus one group per stream, named after the port that
//! drives it. Each stream group carries `<group>_valid`, `_ready`, `_first`,
//! `_last` and the 32-bit `_data`.

use crate::subsystem::Symbol;
use pipesoc_scope::{ProbeSignal, SignalGroup};
use pipesoc_stream::{Backward, Forward};

/// Stream groups in probe order: serializer receive lane, serializer
/// transmit lane, link to core, core to link.
pub const STREAM_GROUPS: [&str; 4] = ["serdes_source", "serdes_sink", "link_source", "link_sink"];

/// Every group the system offers, in default capture order.
pub fn probe_groups() -> Vec<SignalGroup> {
    let mut groups = vec![SignalGroup::new(
        "status",
        vec![
            ProbeSignal::new("serializer_ready", 1),
            ProbeSignal::new("link_ready", 1),
            ProbeSignal::new("sys_reset", 1),
            ProbeSignal::new("core_reset", 1),
        ],
    )];
    for group in STREAM_GROUPS {
        groups.push(SignalGroup::new(
            group,
            vec![
                ProbeSignal::new(format!("{group}_valid"), 1),
                ProbeSignal::new(format!("{group}_ready"), 1),
                ProbeSignal::new(format!("{group}_first"), 1),
                ProbeSignal::new(format!("{group}_last"), 1),
                ProbeSignal::new(format!("{group}_data"), 32),
            ],
        ));
    }
    groups
}

/// The handshake of one stream in the observed cycle.
#[derive(Clone, Copy, Debug)]
pub struct StreamView<'a> {
    /// Forward channel as presented.
    pub forward: &'a Forward<Symbol>,
    /// Backward channel as presented.
    pub backward: Backward,
}

/// Read-only view of one `sys` cycle after its handshakes are resolved.
#[derive(Clone, Copy, Debug)]
pub struct CycleView<'a> {
    /// Serializer readiness.
    pub serializer_ready: bool,
    /// Link readiness.
    pub link_ready: bool,
    /// Synchronized `sys` reset.
    pub sys_reset: bool,
    /// Core reset.
    pub core_reset: bool,
    /// Streams in [`STREAM_GROUPS`] order.
    pub streams: [StreamView<'a>; 4],
}

impl CycleView<'_> {
    /// Returns the value of a probe signal.
    pub fn value(&self, name: &str) -> Option<u64> {
        match name {
            "serializer_ready" => return Some(u64::from(self.serializer_ready)),
            "link_ready" => return Some(u64::from(self.link_ready)),
            "sys_reset" => return Some(u64::from(self.sys_reset)),
            "core_reset" => return Some(u64::from(self.core_reset)),
            _ => {}
        }
        let (group, field) = name.rsplit_once('_')?;
        let index = STREAM_GROUPS.iter().position(|g| *g == group)?;
        let stream = &self.streams[index];
        let beat = stream.forward.beat();
        let value = match field {
            "valid" => u64::from(stream.forward.valid()),
            "ready" => u64::from(stream.backward.ready),
            "first" => u64::from(beat.is_some_and(|b| b.first)),
            "last" => u64::from(beat.is_some_and(|b| b.last)),
            "data" => beat.map_or(0, |b| u64::from(b.payload)),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipesoc_scope::SignalRegistry;
    use pipesoc_stream::Beat;

    #[test]
    fn default_layout() {
        let registry = SignalRegistry::new(&probe_groups()).unwrap();
        assert_eq!(registry.sample_width(), 4 + 4 * 36);
        assert_eq!(registry.find("link_source_data").unwrap().1.width, 32);
    }

    #[test]
    fn view_values() {
        let idle = Forward::idle();
        let busy = Forward::present(Beat::new(0xabcd, true, false));
        let quiet = StreamView {
            forward: &idle,
            backward: Backward::new(false),
        };
        let view = CycleView {
            serializer_ready: true,
            link_ready: false,
            sys_reset: false,
            core_reset: true,
            streams: [
                StreamView {
                    forward: &busy,
                    backward: Backward::new(true),
                },
                quiet,
                quiet,
                quiet,
            ],
        };
        assert_eq!(view.value("serializer_ready"), Some(1));
        assert_eq!(view.value("core_reset"), Some(1));
        assert_eq!(view.value("serdes_source_valid"), Some(1));
        assert_eq!(view.value("serdes_source_ready"), Some(1));
        assert_eq!(view.value("serdes_source_first"), Some(1));
        assert_eq!(view.value("serdes_source_last"), Some(0));
        assert_eq!(view.value("serdes_source_data"), Some(0xabcd));
        assert_eq!(view.value("link_sink_valid"), Some(0));
        assert_eq!(view.value("link_sink_bogus"), None);
        assert_eq!(view.value("nothing"), None);
    }
}

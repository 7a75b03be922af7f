//! CPU/counter metadata and event-validity checking.
//!
//! The registry of known CPU types ships embedded in the binary as JSON. One
//! entry is the default; the `--cpu-type` flag selects another by name. A
//! `CpuInfo` is resolved once per invocation and threaded explicitly into
//! every component that needs it.

use serde::Deserialize;
use thiserror::Error;

/// Default location of the on-disk sample store.
pub const DEFAULT_SAMPLE_DIR: &str = "/var/lib/profview/samples";

/// Error type for CPU metadata operations.
#[derive(Debug, Error)]
pub enum CpuError {
    /// The requested CPU type is not in the registry.
    #[error("cpu \"{0}\" not recognized")]
    UnknownCpuType(String),

    /// The embedded registry failed to parse.
    #[error("cpu registry is malformed: {0}")]
    Registry(#[from] serde_json::Error),
}

/// Convenience result type for CPU metadata operations.
pub type CpuResult<T> = Result<T, CpuError>;

/// One hardware event a CPU type can count.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventSpec {
    /// Numeric event id, as the presentation layer passes it back to us.
    pub id: u32,
    /// Symbolic event name.
    pub name: String,
    /// Counters this event may be programmed on.
    pub counters: Vec<u32>,
    /// Valid unit-mask values for this event.
    pub unit_masks: Vec<u32>,
    /// Unit mask used when the caller does not pick one.
    #[serde(default)]
    pub default_unit_mask: u32,
}

/// Immutable snapshot of one CPU type's counter metadata.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CpuInfo {
    /// CPU type name (registry key and `--cpu-type` value).
    pub cpu_type: String,
    /// Number of programmable counters.
    pub nr_counters: u32,
    /// Events this CPU type can count.
    pub events: Vec<EventSpec>,
}

impl CpuInfo {
    /// Look up an event by its numeric id.
    pub fn event(&self, id: u32) -> Option<&EventSpec> {
        self.events.iter().find(|e| e.id == id)
    }
}

#[derive(Debug, Deserialize)]
struct RawRegistry {
    default: String,
    cpus: Vec<CpuInfo>,
}

const REGISTRY_JSON: &str = include_str!("registry.json");

/// Registry of CPU types this build knows about.
pub struct CpuRegistry {
    default: String,
    cpus: Vec<CpuInfo>,
}

impl CpuRegistry {
    /// Parse the registry embedded at compile time.
    pub fn embedded() -> CpuResult<Self> {
        let raw: RawRegistry = serde_json::from_str(REGISTRY_JSON)?;
        Ok(Self { default: raw.default, cpus: raw.cpus })
    }

    /// Resolve the CPU to run against: an explicit `--cpu-type` override when
    /// given, the registry default otherwise.
    pub fn resolve(&self, requested: Option<&str>) -> CpuResult<CpuInfo> {
        let name = requested.unwrap_or(&self.default);
        self.cpus
            .iter()
            .find(|c| c.cpu_type == name)
            .cloned()
            .ok_or_else(|| CpuError::UnknownCpuType(name.to_string()))
    }
}

/// Bit-set of independently raised event-validity failures.
///
/// This is a diagnostic bitmask, not an error: a query that finds problems
/// still succeeds at the process level, and a single result can carry every
/// simultaneous problem at once. An empty bit-set means valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCheck(u32);

impl EventCheck {
    /// Event id unknown, or not programmable on the requested counter.
    pub const INVALID_EVENT: u32 = 1;
    /// Unit mask not among the event's valid values.
    pub const INVALID_UMASK: u32 = 1 << 1;
    /// Counter index outside the CPU's counter range.
    pub const INVALID_COUNTER: u32 = 1 << 2;

    /// True when no failure bit is set.
    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// True when the given failure bit is set.
    pub fn has(self, bit: u32) -> bool {
        self.0 & bit != 0
    }

    /// Raw bit value, mainly for tests and logging.
    pub fn bits(self) -> u32 {
        self.0
    }

    fn set(&mut self, bit: u32) {
        self.0 |= bit;
    }
}

/// Check a (counter, event, unit mask) triple against the CPU's metadata.
///
/// All three predicates are always evaluated; failure of one does not
/// short-circuit the others. A counter out of range therefore still gets the
/// event and unit-mask checks run against the event table, and an unknown
/// event id raises both the event and the unit-mask bits (a mask cannot be
/// valid for an event that does not exist).
pub fn check_event(cpu: &CpuInfo, counter: u32, event: u32, umask: u32) -> EventCheck {
    let mut result = EventCheck::default();

    if counter >= cpu.nr_counters {
        result.set(EventCheck::INVALID_COUNTER);
    }

    let spec = cpu.event(event);

    match spec {
        Some(spec) if spec.counters.contains(&counter) => {}
        _ => result.set(EventCheck::INVALID_EVENT),
    }

    match spec {
        Some(spec) if spec.unit_masks.contains(&umask) => {}
        _ => result.set(EventCheck::INVALID_UMASK),
    }

    result
}

//! Host MIDI access abstraction.
//!
//! A host exposes an ordered set of input ports, one state-change hook slot,
//! and one message hook slot per input. Setting a slot replaces whatever was
//! there before; `None` clears it.

use std::fmt;
use std::sync::Arc;

/// Called with the raw bytes of every message an input receives.
pub type MessageHook = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Called with the port whose state changed.
pub type StateChangeHook = Arc<dyn Fn(&PortInfo) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortType {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Open,
    Closed,
    Pending,
}

/// Descriptor of one port as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub id: String,
    pub manufacturer: String,
    pub name: String,
    pub port_type: PortType,
    pub version: String,
    pub state: DeviceState,
    pub connection: ConnectionState,
}

impl PortInfo {
    /// A connected, open input with no manufacturer or version information.
    pub fn input(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            manufacturer: String::new(),
            name: name.into(),
            port_type: PortType::Input,
            version: String::new(),
            state: DeviceState::Connected,
            connection: ConnectionState::Open,
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_state(mut self, state: DeviceState) -> Self {
        self.state = state;
        self
    }

    pub fn with_connection(mut self, connection: ConnectionState) -> Self {
        self.connection = connection;
        self
    }

    /// Connected and open: the only ports counted as live.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == DeviceState::Connected && self.connection == ConnectionState::Open
    }
}

/// MIDI capability provided by the host platform.
///
/// Acquiring an implementation (permissions, device backends) is up to the
/// caller. Implementations must not hold internal locks while invoking hooks,
/// since hooks may call back into the access object.
pub trait MidiAccess: Send + Sync {
    /// Input ports in host order.
    fn inputs(&self) -> Vec<PortInfo>;

    fn set_state_change_hook(&self, hook: Option<StateChangeHook>);

    /// Ignored if no input with `input_id` exists.
    fn set_message_hook(&self, input_id: &str, hook: Option<MessageHook>);

    /// Empty the state-change slot only if it still holds `hook`.
    ///
    /// Returns `true` if the slot was cleared.
    fn clear_state_change_hook_if(&self, hook: &StateChangeHook) -> bool;

    /// Empty the message slot of `input_id` only if it still holds `hook`.
    ///
    /// Returns `true` if the slot was cleared.
    fn clear_message_hook_if(&self, input_id: &str, hook: &MessageHook) -> bool;
}

impl fmt::Debug for dyn MidiAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidiAccess")
            .field("inputs", &self.inputs().len())
            .finish()
    }
}

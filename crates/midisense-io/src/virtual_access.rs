//! In-memory MIDI host.
//!
//! Lets tests, sequencers and headless setups plug inputs in and out and inject
//! raw messages without hardware. Hooks are always invoked after internal locks
//! are released, so they may call back into the access object.

use crate::access::{
    ConnectionState, DeviceState, MessageHook, MidiAccess, PortInfo, StateChangeHook,
};
use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

pub struct VirtualMidiAccess {
    ports: RwLock<Vec<PortInfo>>,
    message_hooks: DashMap<String, MessageHook>,
    hook_installs: DashMap<String, usize>,
    state_hook: ArcSwap<Option<StateChangeHook>>,
}

impl VirtualMidiAccess {
    pub fn new() -> Self {
        Self {
            ports: RwLock::new(Vec::new()),
            message_hooks: DashMap::new(),
            hook_installs: DashMap::new(),
            state_hook: ArcSwap::new(Arc::new(None)),
        }
    }

    /// Start with `ports` already present, without firing any notification.
    pub fn with_inputs(ports: impl IntoIterator<Item = PortInfo>) -> Self {
        let access = Self::new();
        *access.ports.write() = ports.into_iter().collect();
        access
    }

    /// Add an input, or replace the descriptor of an input with the same id.
    pub fn add_input(&self, port: PortInfo) {
        {
            let mut ports = self.ports.write();
            match ports.iter_mut().find(|p| p.id == port.id) {
                Some(existing) => *existing = port.clone(),
                None => ports.push(port.clone()),
            }
        }
        tracing::debug!("Virtual MIDI input {} ({}) added", port.id, port.name);
        self.notify(&port);
    }

    /// Add a connected, open input.
    pub fn connect_input(&self, id: impl Into<String>, name: impl Into<String>) {
        self.add_input(PortInfo::input(id, name));
    }

    /// Apply `f` to the input with `id` and fire a state change.
    ///
    /// Returns `false` if no such input exists.
    pub fn update_input(&self, id: &str, f: impl FnOnce(&mut PortInfo)) -> bool {
        let updated = {
            let mut ports = self.ports.write();
            ports.iter_mut().find(|p| p.id == id).map(|port| {
                f(port);
                port.clone()
            })
        };
        match updated {
            Some(port) => {
                self.notify(&port);
                true
            }
            None => false,
        }
    }

    /// Mark an input disconnected and closed. It stays in the input list.
    pub fn disconnect_input(&self, id: &str) -> bool {
        self.update_input(id, |port| {
            port.state = DeviceState::Disconnected;
            port.connection = ConnectionState::Closed;
        })
    }

    pub fn set_connection(&self, id: &str, connection: ConnectionState) -> bool {
        self.update_input(id, |port| port.connection = connection)
    }

    pub fn rename_input(&self, id: &str, name: impl Into<String>) -> bool {
        let name = name.into();
        self.update_input(id, |port| port.name = name)
    }

    /// Remove an input and its message hook entirely.
    pub fn remove_input(&self, id: &str) -> bool {
        let removed = {
            let mut ports = self.ports.write();
            let index = ports.iter().position(|p| p.id == id);
            index.map(|index| ports.remove(index))
        };
        let Some(mut port) = removed else {
            return false;
        };
        self.message_hooks.remove(id);
        port.state = DeviceState::Disconnected;
        port.connection = ConnectionState::Closed;
        tracing::debug!("Virtual MIDI input {} removed", id);
        self.notify(&port);
        true
    }

    /// Deliver a raw message as if `id` had received it.
    ///
    /// Returns `false` if the input has no message hook.
    pub fn send(&self, id: &str, bytes: &[u8]) -> bool {
        // Clone out so the shard lock is not held while the hook runs
        let hook = self.message_hooks.get(id).map(|entry| Arc::clone(entry.value()));
        match hook {
            Some(hook) => {
                hook(bytes);
                true
            }
            None => false,
        }
    }

    pub fn has_message_hook(&self, id: &str) -> bool {
        self.message_hooks.contains_key(id)
    }

    /// How many times a message hook has been installed on `id`.
    pub fn message_hook_installs(&self, id: &str) -> usize {
        self.hook_installs.get(id).map(|n| *n).unwrap_or(0)
    }

    pub fn has_state_change_hook(&self) -> bool {
        self.state_hook.load().is_some()
    }

    fn notify(&self, port: &PortInfo) {
        if let Some(hook) = &*self.state_hook.load_full() {
            hook(port);
        }
    }
}

impl Default for VirtualMidiAccess {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiAccess for VirtualMidiAccess {
    fn inputs(&self) -> Vec<PortInfo> {
        self.ports.read().clone()
    }

    fn set_state_change_hook(&self, hook: Option<StateChangeHook>) {
        self.state_hook.store(Arc::new(hook));
    }

    fn set_message_hook(&self, input_id: &str, hook: Option<MessageHook>) {
        if !self.ports.read().iter().any(|p| p.id == input_id) {
            return;
        }
        match hook {
            Some(hook) => {
                self.message_hooks.insert(input_id.to_string(), hook);
                *self.hook_installs.entry(input_id.to_string()).or_insert(0) += 1;
            }
            None => {
                self.message_hooks.remove(input_id);
            }
        }
    }

    fn clear_state_change_hook_if(&self, hook: &StateChangeHook) -> bool {
        let previous = self.state_hook.rcu(|current| match &**current {
            Some(installed) if Arc::ptr_eq(installed, hook) => None,
            other => other.clone(),
        });
        matches!(&*previous, Some(installed) if Arc::ptr_eq(installed, hook))
    }

    fn clear_message_hook_if(&self, input_id: &str, hook: &MessageHook) -> bool {
        self.message_hooks
            .remove_if(input_id, |_, installed| Arc::ptr_eq(installed, hook))
            .is_some()
    }
}

impl std::fmt::Debug for VirtualMidiAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualMidiAccess")
            .field("inputs", &self.ports.read().len())
            .field("message_hooks", &self.message_hooks.len())
            .field("state_hook", &self.has_state_change_hook())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_inputs_keep_insertion_order() {
        let access = VirtualMidiAccess::new();
        access.connect_input("b", "Second");
        access.connect_input("a", "First");
        let names: Vec<_> = access.inputs().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[test]
    fn test_add_existing_id_replaces_descriptor() {
        let access = VirtualMidiAccess::new();
        access.connect_input("kbd", "Keyboard");
        access.add_input(PortInfo::input("kbd", "Keyboard").with_version("2"));
        let inputs = access.inputs();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].version, "2");
    }

    #[test]
    fn test_state_hook_sees_each_change() {
        let access = VirtualMidiAccess::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        access.set_state_change_hook(Some(Arc::new(move |port: &PortInfo| {
            s.lock().push((port.id.clone(), port.state, port.connection));
        })));

        access.connect_input("kbd", "Keyboard");
        access.set_connection("kbd", ConnectionState::Pending);
        access.disconnect_input("kbd");
        access.remove_input("kbd");
        assert!(!access.disconnect_input("kbd"));

        assert_eq!(
            *seen.lock(),
            vec![
                ("kbd".to_string(), DeviceState::Connected, ConnectionState::Open),
                ("kbd".to_string(), DeviceState::Connected, ConnectionState::Pending),
                ("kbd".to_string(), DeviceState::Disconnected, ConnectionState::Closed),
                ("kbd".to_string(), DeviceState::Disconnected, ConnectionState::Closed),
            ]
        );
    }

    #[test]
    fn test_message_hooks() {
        let access = VirtualMidiAccess::new();
        access.connect_input("kbd", "Keyboard");

        // Unknown inputs are ignored
        access.set_message_hook("ghost", Some(Arc::new(|_: &[u8]| {})));
        assert!(!access.has_message_hook("ghost"));
        assert!(!access.send("kbd", &[0x90, 60, 100]));

        let received = Arc::new(Mutex::new(Vec::new()));
        let r = Arc::clone(&received);
        access.set_message_hook(
            "kbd",
            Some(Arc::new(move |bytes: &[u8]| r.lock().push(bytes.to_vec()))),
        );
        assert!(access.send("kbd", &[0x90, 60, 100]));
        assert_eq!(*received.lock(), vec![vec![0x90, 60, 100]]);
        assert_eq!(access.message_hook_installs("kbd"), 1);

        access.set_message_hook("kbd", None);
        assert!(!access.send("kbd", &[0x80, 60, 0]));
        assert_eq!(received.lock().len(), 1);
    }

    #[test]
    fn test_remove_drops_message_hook() {
        let access = VirtualMidiAccess::with_inputs([PortInfo::input("pads", "Pads")]);
        access.set_message_hook("pads", Some(Arc::new(|_: &[u8]| {})));
        assert!(access.remove_input("pads"));
        assert!(!access.has_message_hook("pads"));
        assert!(access.inputs().is_empty());
    }

    #[test]
    fn test_clear_if_only_clears_matching_hook() {
        let access = VirtualMidiAccess::new();
        access.connect_input("kbd", "Keyboard");

        let old_state: StateChangeHook = Arc::new(|_: &PortInfo| {});
        let new_state: StateChangeHook = Arc::new(|_: &PortInfo| {});
        access.set_state_change_hook(Some(old_state.clone()));
        access.set_state_change_hook(Some(new_state.clone()));
        assert!(!access.clear_state_change_hook_if(&old_state));
        assert!(access.has_state_change_hook());
        assert!(access.clear_state_change_hook_if(&new_state));
        assert!(!access.has_state_change_hook());

        let old_message: MessageHook = Arc::new(|_: &[u8]| {});
        let new_message: MessageHook = Arc::new(|_: &[u8]| {});
        access.set_message_hook("kbd", Some(old_message.clone()));
        access.set_message_hook("kbd", Some(new_message.clone()));
        assert!(!access.clear_message_hook_if("kbd", &old_message));
        assert!(access.has_message_hook("kbd"));
        assert!(access.clear_message_hook_if("kbd", &new_message));
        assert!(!access.has_message_hook("kbd"));
        assert!(!access.clear_message_hook_if("ghost", &new_message));
    }

    #[test]
    fn test_hook_may_reenter_access() {
        let access = Arc::new(VirtualMidiAccess::new());
        let weak = Arc::downgrade(&access);
        let counts = Arc::new(Mutex::new(Vec::new()));
        let c = Arc::clone(&counts);
        access.set_state_change_hook(Some(Arc::new(move |_: &PortInfo| {
            if let Some(access) = weak.upgrade() {
                c.lock().push(access.inputs().len());
            }
        })));

        access.connect_input("a", "A");
        access.connect_input("b", "B");
        assert_eq!(*counts.lock(), vec![1, 2]);
    }
}

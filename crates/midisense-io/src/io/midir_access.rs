//! Hardware MIDI host backed by midir.
//!
//! midir has no hot-plug notifications, so a watcher thread rescans the
//! available ports every poll interval, opens new ones, drops vanished ones
//! and fires the state-change hook for each port that changed. Port ids are
//! port names; repeated names get a `#n` suffix in enumeration order.

use crate::access::{
    ConnectionState, DeviceState, MessageHook, MidiAccess, PortInfo, StateChangeHook,
};
use crate::error::{Error, Result};
use arc_swap::ArcSwap;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use dashmap::DashMap;
use midir::{Ignore, MidiInput, MidiInputConnection};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace, warn};

pub const DEFAULT_CLIENT_NAME: &str = "midisense-input";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

enum WatcherCommand {
    Rescan,
    Shutdown,
}

struct Shared {
    client_name: String,
    ports: RwLock<Vec<PortInfo>>,
    message_hooks: DashMap<String, MessageHook>,
    state_hook: ArcSwap<Option<StateChangeHook>>,
}

impl Shared {
    fn notify(&self, port: &PortInfo) {
        if let Some(hook) = &*self.state_hook.load_full() {
            hook(port);
        }
    }

    fn dispatch(&self, port_id: &str, message: &[u8]) {
        // Clone out so the shard lock is not held while the hook runs
        let hook = self
            .message_hooks
            .get(port_id)
            .map(|entry| Arc::clone(entry.value()));
        if let Some(hook) = hook {
            hook(message);
        }
    }
}

/// All hardware MIDI inputs visible to midir, kept open while present.
pub struct MidirAccess {
    shared: Arc<Shared>,
    command_sender: Sender<WatcherCommand>,
}

impl MidirAccess {
    /// Open every input currently present and start watching for changes.
    ///
    /// Returns once the initial scan has finished, so [`MidiAccess::inputs`]
    /// is populated immediately.
    pub fn new(client_name: impl Into<String>, poll_interval: Duration) -> Result<Self> {
        let client_name = client_name.into();

        // Surface backend init failures to the caller instead of the watcher thread
        drop(MidiInput::new(&client_name)?);

        let shared = Arc::new(Shared {
            client_name,
            ports: RwLock::new(Vec::new()),
            message_hooks: DashMap::new(),
            state_hook: ArcSwap::new(Arc::new(None)),
        });

        let (command_sender, command_receiver) = bounded(16);
        let (ready_sender, ready_receiver) = bounded(1);
        let shared_clone = Arc::clone(&shared);

        thread::Builder::new()
            .name("midi-input-watcher".to_string())
            .spawn(move || {
                Self::watcher_thread(command_receiver, shared_clone, poll_interval, ready_sender);
            })
            .map_err(|e| Error::MidiDevice(format!("Failed to spawn MIDI watcher thread: {e}")))?;

        ready_receiver
            .recv()
            .map_err(|_| Error::MidiDevice("MIDI watcher thread exited during startup".into()))?;

        Ok(Self {
            shared,
            command_sender,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_CLIENT_NAME, DEFAULT_POLL_INTERVAL)
    }

    /// Ask the watcher to rescan now instead of waiting for the next poll.
    ///
    /// Never blocks; returns `false` if the request was not queued because a
    /// rescan is already pending or the watcher has stopped.
    pub fn rescan(&self) -> bool {
        queue_command(&self.command_sender, WatcherCommand::Rescan)
    }

    pub fn client_name(&self) -> &str {
        &self.shared.client_name
    }

    fn watcher_thread(
        command_receiver: Receiver<WatcherCommand>,
        shared: Arc<Shared>,
        poll_interval: Duration,
        ready: Sender<()>,
    ) {
        let mut connections: HashMap<String, MidiInputConnection<()>> = HashMap::new();

        Self::scan(&shared, &mut connections);
        let _ = ready.send(());

        loop {
            match command_receiver.recv_timeout(poll_interval) {
                Ok(WatcherCommand::Rescan) | Err(RecvTimeoutError::Timeout) => {
                    for port in Self::scan(&shared, &mut connections) {
                        shared.notify(&port);
                    }
                }
                Ok(WatcherCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        debug!("MIDI watcher closing {} input(s)", connections.len());
    }

    /// Reconcile the open connections with the ports midir reports.
    ///
    /// Returns the ports whose descriptor changed, vanished ports last.
    fn scan(
        shared: &Arc<Shared>,
        connections: &mut HashMap<String, MidiInputConnection<()>>,
    ) -> Vec<PortInfo> {
        let discovered = match Self::enumerate(&shared.client_name) {
            Ok(discovered) => discovered,
            Err(e) => {
                warn!("MIDI input scan failed: {}", e);
                return Vec::new();
            }
        };

        let previous = shared.ports.read().clone();
        let mut next = Vec::with_capacity(discovered.len());
        let mut changed = Vec::new();

        for (index, id, name) in discovered {
            if let Some(known) = previous.iter().find(|p| p.id == id) {
                next.push(known.clone());
                continue;
            }

            let port = match Self::open(shared, index, &id) {
                Ok(connection) => {
                    connections.insert(id.clone(), connection);
                    debug!("Opened MIDI input {}", id);
                    PortInfo::input(id, name)
                }
                Err(e) => {
                    warn!("Failed to open MIDI input {}: {}", id, e);
                    PortInfo::input(id, name).with_connection(ConnectionState::Closed)
                }
            };
            changed.push(port.clone());
            next.push(port);
        }

        for gone in previous
            .into_iter()
            .filter(|p| !next.iter().any(|n| n.id == p.id))
        {
            connections.remove(&gone.id);
            shared.message_hooks.remove(&gone.id);
            debug!("MIDI input {} disappeared", gone.id);
            changed.push(
                gone.with_state(DeviceState::Disconnected)
                    .with_connection(ConnectionState::Closed),
            );
        }

        *shared.ports.write() = next;
        changed
    }

    /// `(midir index, id, name)` for every input port.
    fn enumerate(client_name: &str) -> Result<Vec<(usize, String, String)>> {
        let input = MidiInput::new(client_name)?;
        let ports = input.ports();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut discovered = Vec::with_capacity(ports.len());

        for (index, port) in ports.iter().enumerate() {
            let name = input
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index));
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            let id = if *count == 1 {
                name.clone()
            } else {
                format!("{}#{}", name, count)
            };
            discovered.push((index, id, name));
        }
        Ok(discovered)
    }

    fn open(shared: &Arc<Shared>, index: usize, id: &str) -> Result<MidiInputConnection<()>> {
        let mut input = MidiInput::new(&shared.client_name)?;
        input.ignore(Ignore::SysexAndActiveSense);

        let ports = input.ports();
        let port = ports
            .get(index)
            .ok_or_else(|| Error::MidiPort(format!("MIDI input {} not found", id)))?;

        let shared = Arc::clone(shared);
        let port_id = id.to_string();
        let connection = input.connect(
            port,
            id,
            move |_timestamp, message, _| shared.dispatch(&port_id, message),
            (),
        )?;
        Ok(connection)
    }
}

impl MidiAccess for MidirAccess {
    fn inputs(&self) -> Vec<PortInfo> {
        self.shared.ports.read().clone()
    }

    fn set_state_change_hook(&self, hook: Option<StateChangeHook>) {
        self.shared.state_hook.store(Arc::new(hook));
    }

    fn set_message_hook(&self, input_id: &str, hook: Option<MessageHook>) {
        if !self.shared.ports.read().iter().any(|p| p.id == input_id) {
            return;
        }
        match hook {
            Some(hook) => {
                self.shared.message_hooks.insert(input_id.to_string(), hook);
            }
            None => {
                self.shared.message_hooks.remove(input_id);
            }
        }
    }

    fn clear_state_change_hook_if(&self, hook: &StateChangeHook) -> bool {
        let previous = self.shared.state_hook.rcu(|current| match &**current {
            Some(installed) if Arc::ptr_eq(installed, hook) => None,
            other => other.clone(),
        });
        matches!(&*previous, Some(installed) if Arc::ptr_eq(installed, hook))
    }

    fn clear_message_hook_if(&self, input_id: &str, hook: &MessageHook) -> bool {
        self.shared
            .message_hooks
            .remove_if(input_id, |_, installed| Arc::ptr_eq(installed, hook))
            .is_some()
    }
}

impl Drop for MidirAccess {
    fn drop(&mut self) {
        // A full queue is fine: dropping the sender disconnects the watcher too
        queue_command(&self.command_sender, WatcherCommand::Shutdown);
    }
}

/// Enqueue without blocking. A full queue already holds a pending command,
/// and this may run on the watcher thread itself (from a state-change hook).
fn queue_command(sender: &Sender<WatcherCommand>, command: WatcherCommand) -> bool {
    match sender.try_send(command) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            trace!("MIDI watcher queue full, command dropped");
            false
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

impl std::fmt::Debug for MidirAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidirAccess")
            .field("client_name", &self.shared.client_name)
            .field("inputs", &self.shared.ports.read().len())
            .finish()
    }
}

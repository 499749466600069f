//! Semantic MIDI input listener.
//!
//! ## Quick Start
//!
//! ```ignore
//! use midisense_io::{MidiHandlers, MidiListener};
//!
//! // Listen to every hardware input
//! let listener = MidiListener::builder()
//!     .io()
//!     .on_input_change(|change| println!("inputs: {:?}", change.input_names))
//!     .on_note(|note| println!("note {:?} velocity {:?}", note.code, note.velocity))
//!     .build()?;
//!
//! // Add more subscribers later, remove them again
//! let sub = listener.subscribe(MidiHandlers::new().on_pad(|pad| println!("{:?}", pad)));
//! sub.unsubscribe();
//!
//! // Drop every subscriber
//! listener.clear();
//! ```

mod builder;

pub use builder::MidiListenerBuilder;

use crate::access::{MessageHook, MidiAccess, PortInfo, StateChangeHook};
use crate::curator::{CurationOutcome, InputCurator};
use midisense_core::{EventBus, InputChange, MidiHandlers, MidiInputEvent, Subscription};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use tracing::debug;

// ============================================================================
// MidiListener - Main Entry Point
// ============================================================================

/// Turns a host's MIDI inputs into semantic events.
///
/// On construction and on every host state change the listener re-curates:
/// it installs a fresh message hook on every input and emits
/// [`InputChange`] when the number of connected, open inputs changed.
/// Clone is cheap (Arc internally). Dropping the last clone detaches every
/// hook the listener installed.
///
/// The host has a single state-change slot, so only the most recently built
/// listener on a given access object follows hot-plug changes. Dropping a
/// listener only clears the slots that still hold its own hooks.
#[derive(Clone)]
pub struct MidiListener {
    inner: Arc<MidiListenerInner>,
}

pub(crate) struct MidiListenerInner {
    access: Arc<dyn MidiAccess>,
    bus: Arc<EventBus>,
    curator: InputCurator,
    /// The hook this listener installs in the host's state-change slot.
    state_hook: StateChangeHook,
    /// Message hook installed on each input by the latest curation pass.
    attached: Mutex<BTreeMap<String, MessageHook>>,
}

impl MidiListener {
    pub fn builder() -> MidiListenerBuilder {
        MidiListenerBuilder::default()
    }

    /// Wire `handlers` to every input of `access` and run the first curation
    /// pass, which always emits [`InputChange`].
    ///
    /// Handlers given here stay registered until [`clear`](Self::clear).
    pub fn new(access: Arc<dyn MidiAccess>, handlers: MidiHandlers) -> Self {
        let bus = Arc::new(EventBus::new());
        // Permanent: only clear() removes constructor handlers
        let _ = bus.subscribe(handlers);

        let inner = Arc::new_cyclic(|weak: &Weak<MidiListenerInner>| {
            let weak = weak.clone();
            MidiListenerInner {
                access,
                bus,
                curator: InputCurator::new(),
                state_hook: Arc::new(move |port: &PortInfo| {
                    if let Some(inner) = weak.upgrade() {
                        debug!(
                            "MIDI port {} changed: {:?}/{:?}",
                            port.id, port.state, port.connection
                        );
                        inner.curate();
                    }
                }),
                attached: Mutex::new(BTreeMap::new()),
            }
        });

        inner
            .access
            .set_state_change_hook(Some(Arc::clone(&inner.state_hook)));
        inner.curate();
        Self { inner }
    }

    // ==================== Subscriptions ====================

    /// Register additional callbacks. The returned handle removes exactly these.
    pub fn subscribe(&self, handlers: MidiHandlers) -> Subscription {
        self.inner.bus.subscribe(handlers)
    }

    /// Remove every subscriber of every event kind, constructor handlers included.
    pub fn clear(&self) {
        self.inner.bus.clear();
    }

    // ==================== Curation ====================

    /// Re-scan inputs, re-attach message hooks, emit [`InputChange`] if the
    /// open count changed. Runs automatically on host state changes.
    pub fn curate(&self) -> CurationOutcome {
        self.inner.curate()
    }

    pub fn inputs(&self) -> Vec<PortInfo> {
        self.inner.access.inputs()
    }

    pub fn input_names(&self) -> Vec<String> {
        self.inputs().into_iter().map(|port| port.name).collect()
    }

    /// Open input count recorded by the last curation pass.
    pub fn open_count(&self) -> Option<usize> {
        self.inner.curator.last_open_count()
    }

    // ==================== Programmatic Input ====================

    /// Classify and emit a raw message as if an input had delivered it.
    pub fn handle_message(&self, raw: &[u8]) {
        self.inner.bus.handle_bytes(raw);
    }

    // ==================== Advanced: Direct Access ====================

    pub fn access(&self) -> Arc<dyn MidiAccess> {
        Arc::clone(&self.inner.access)
    }

    pub fn bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.inner.bus)
    }
}

impl MidiListenerInner {
    fn curate(&self) -> CurationOutcome {
        let inputs = self.access.inputs();

        // Unconditional: every pass replaces every input's hook
        {
            let mut attached = self.attached.lock();
            let mut installed = BTreeMap::new();
            for port in &inputs {
                let hook = self.message_hook();
                self.access
                    .set_message_hook(&port.id, Some(Arc::clone(&hook)));
                installed.insert(port.id.clone(), hook);
            }
            *attached = installed;
        }

        let outcome = self.curator.observe(&inputs);
        if outcome.changed {
            self.bus.emit(&MidiInputEvent::InputChange(InputChange {
                input_names: outcome.names.clone(),
            }));
        }
        outcome
    }

    fn message_hook(&self) -> MessageHook {
        let bus = Arc::clone(&self.bus);
        Arc::new(move |raw: &[u8]| bus.handle_bytes(raw))
    }
}

impl Drop for MidiListenerInner {
    fn drop(&mut self) {
        // Slots another listener has taken over since are left alone
        self.access.clear_state_change_hook_if(&self.state_hook);
        let attached = std::mem::take(&mut *self.attached.lock());
        let detached = attached
            .iter()
            .filter(|(id, hook)| self.access.clear_message_hook_if(id, hook))
            .count();
        debug!(
            "MIDI listener detached from {} of {} input(s)",
            detached,
            attached.len()
        );
    }
}

impl std::fmt::Debug for MidiListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiListener")
            .field("open_count", &self.open_count())
            .field("subscribers", &self.inner.bus.subscriber_count())
            .finish()
    }
}

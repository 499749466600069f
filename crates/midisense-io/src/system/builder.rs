//! MidiListener builder for choosing a host and initial handlers.

use std::sync::Arc;

use midisense_core::{
    InputChange, MidiHandlers, ModWheelEvent, NoteEvent, PadEvent, ParsedMessage, PitchBendEvent,
};

use crate::access::MidiAccess;
use crate::error::{Error, Result};

#[cfg(feature = "midi-io")]
use crate::io::{MidirAccess, DEFAULT_CLIENT_NAME, DEFAULT_POLL_INTERVAL};
#[cfg(feature = "midi-io")]
use std::time::Duration;

use super::MidiListener;

pub struct MidiListenerBuilder {
    pub(super) access: Option<Arc<dyn MidiAccess>>,
    pub(super) handlers: MidiHandlers,
    #[cfg(feature = "midi-io")]
    pub(super) enable_io: bool,
    #[cfg(feature = "midi-io")]
    pub(super) client_name: String,
    #[cfg(feature = "midi-io")]
    pub(super) poll_interval: Duration,
}

impl Default for MidiListenerBuilder {
    fn default() -> Self {
        Self {
            access: None,
            handlers: MidiHandlers::new(),
            #[cfg(feature = "midi-io")]
            enable_io: false,
            #[cfg(feature = "midi-io")]
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            #[cfg(feature = "midi-io")]
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl MidiListenerBuilder {
    /// Listen on an explicit host. Takes precedence over [`io`](Self::io).
    pub fn access(mut self, access: Arc<dyn MidiAccess>) -> Self {
        self.access = Some(access);
        self
    }

    /// Listen on every hardware input through midir.
    #[cfg(feature = "midi-io")]
    pub fn io(mut self) -> Self {
        self.enable_io = true;
        self
    }

    #[cfg(feature = "midi-io")]
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// How often the hardware watcher rescans ports.
    #[cfg(feature = "midi-io")]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Replace every handler set so far.
    pub fn handlers(mut self, handlers: MidiHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn on_input_change(mut self, f: impl Fn(&InputChange) + Send + Sync + 'static) -> Self {
        self.handlers = self.handlers.on_input_change(f);
        self
    }

    pub fn on_message(mut self, f: impl Fn(&ParsedMessage) + Send + Sync + 'static) -> Self {
        self.handlers = self.handlers.on_message(f);
        self
    }

    pub fn on_note(mut self, f: impl Fn(&NoteEvent) + Send + Sync + 'static) -> Self {
        self.handlers = self.handlers.on_note(f);
        self
    }

    pub fn on_pad(mut self, f: impl Fn(&PadEvent) + Send + Sync + 'static) -> Self {
        self.handlers = self.handlers.on_pad(f);
        self
    }

    pub fn on_pitch_bend(mut self, f: impl Fn(&PitchBendEvent) + Send + Sync + 'static) -> Self {
        self.handlers = self.handlers.on_pitch_bend(f);
        self
    }

    pub fn on_mod_wheel(mut self, f: impl Fn(&ModWheelEvent) + Send + Sync + 'static) -> Self {
        self.handlers = self.handlers.on_mod_wheel(f);
        self
    }

    pub fn build(self) -> Result<MidiListener> {
        if let Some(access) = self.access {
            return Ok(MidiListener::new(access, self.handlers));
        }

        #[cfg(feature = "midi-io")]
        if self.enable_io {
            if self.client_name.is_empty() {
                return Err(Error::InvalidConfig("client name must not be empty".into()));
            }
            if self.poll_interval.is_zero() {
                return Err(Error::InvalidConfig("poll interval must be non-zero".into()));
            }
            let access = MidirAccess::new(self.client_name, self.poll_interval)?;
            return Ok(MidiListener::new(Arc::new(access), self.handlers));
        }

        Err(Error::InvalidConfig(
            "no MIDI access: call access() or io()".into(),
        ))
    }
}

//! Global virtual channels saved in NI MAX.

use crate::driver::NamedCall;
use crate::Result;

impl PersistedChannel {
    /// Deletes the global channel from NI MAX.
    pub fn delete(&self) -> Result<()> {
        self.interpreter
            .named_call(NamedCall::DeleteSavedGlobalChan, &self.name)
    }
}

include!(concat!(env!("OUT_DIR"), "/persisted_channel.rs"));

//! Custom scales saved in NI MAX.

use std::sync::Arc;

use crate::driver::NamedCall;
use crate::scale::Scale;
use crate::Result;

impl PersistedScale {
    /// The saved scale as a [`Scale`]. No driver call is made.
    #[must_use]
    pub fn load(&self) -> Scale {
        Scale::new(Arc::clone(&self.interpreter), self.name.clone())
    }

    /// Deletes the scale from NI MAX.
    pub fn delete(&self) -> Result<()> {
        self.interpreter
            .named_call(NamedCall::DeleteSavedScale, &self.name)
    }
}

include!(concat!(env!("OUT_DIR"), "/persisted_scale.rs"));

//! Opaque task handle.

/// Driver-issued identifier of a task.
///
/// Copying a handle does not copy the task; [`crate::Task`] owns the
/// lifetime of the driver object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TaskHandle(usize);

impl TaskHandle {
    /// The handle the driver never issues.
    pub const NULL: Self = Self(0);

    /// Wraps a raw handle value.
    #[must_use]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[must_use]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    /// Whether this is [`TaskHandle::NULL`].
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

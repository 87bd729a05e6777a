/// Load state of a resource that arrives once at startup (font, texture, camera parameters).
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    Pending,
    Ready(T),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    AlreadySettled { name: &'static str },
}

impl std::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceError::AlreadySettled { name } => {
                write!(f, "resource {name} was already settled")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// Single-assignment slot for an asynchronously loaded resource.
///
/// A slot settles exactly once, either to a value or to a failure reason.
/// There is no cancellation and no retry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSlot<T> {
    name: &'static str,
    state: ResourceState<T>,
}

impl<T> ResourceSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: ResourceState::Pending,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> &ResourceState<T> {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ResourceState::Pending)
    }

    pub fn get(&self) -> Option<&T> {
        match &self.state {
            ResourceState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            ResourceState::Failed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn resolve(&mut self, value: T) -> Result<(), ResourceError> {
        self.ensure_pending()?;
        self.state = ResourceState::Ready(value);
        Ok(())
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), ResourceError> {
        self.ensure_pending()?;
        self.state = ResourceState::Failed(reason.into());
        Ok(())
    }

    /// Settles from a loader result; `Ok(true)` when the value is now available.
    pub fn settle<E: std::fmt::Display>(
        &mut self,
        result: Result<T, E>,
    ) -> Result<bool, ResourceError> {
        match result {
            Ok(value) => self.resolve(value).map(|()| true),
            Err(e) => self.fail(e.to_string()).map(|()| false),
        }
    }

    fn ensure_pending(&self) -> Result<(), ResourceError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(ResourceError::AlreadySettled { name: self.name })
        }
    }
}

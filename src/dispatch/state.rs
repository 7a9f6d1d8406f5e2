//! Dispatch task lifecycle state

/// State of an application's dispatch task
///
/// `Stopped -> Running -> StopRequested -> Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// No dispatch task
    Stopped,
    /// Dispatch task is routing items
    Running,
    /// Stop was requested, waiting for the task to exit
    StopRequested,
}

impl DispatchState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            DispatchState::Stopped => 0,
            DispatchState::Running => 1,
            DispatchState::StopRequested => 2,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => DispatchState::Running,
            2 => DispatchState::StopRequested,
            _ => DispatchState::Stopped,
        }
    }
}

impl std::fmt::Display for DispatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchState::Stopped => write!(f, "stopped"),
            DispatchState::Running => write!(f, "running"),
            DispatchState::StopRequested => write!(f, "stop requested"),
        }
    }
}

/// The block provider's running state. `stop()` sets this to `Stopped`;
/// the streaming loop observes it between emissions and exits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ProviderStatus {
    Stopped = 0,
    Running = 1,
}

impl ProviderStatus {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            _ => Self::Stopped,
        }
    }
}

use device::DeviceError;
use thiserror::Error;
use vision::VisionError;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("environment setup failed: {0}")]
    Setup(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("action has shape {actual:?}, expected {expected:?}")]
    ActionShape {
        expected: [usize; 2],
        actual: Vec<usize>,
    },
    #[error("action component {index} is {value}, expected a finite value in [-1, 1]")]
    ActionValue { index: usize, value: f32 },
    #[error("deathmatch mode not found (confidence {confidence:.3} after retry)")]
    ModeUnavailable { confidence: f32 },
    #[error("step called before a successful reset")]
    NeedsReset,
    #[error("environment is closed")]
    Closed,
    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl From<VisionError> for EnvError {
    fn from(err: VisionError) -> Self {
        EnvError::Setup(Box::new(err))
    }
}

impl EnvError {
    pub(crate) fn setup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        EnvError::Setup(Box::new(err))
    }
}

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::preview::keypath::PathError;
use crate::wizard::step::WizardStep;

/// Wizard-level error type.
/// Everything except `Validation`, `InvalidTransition` and `Path` is routed to
/// the session's error slot by the controller before being returned.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Network request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("{0}")]
    OperationFailed(String),

    #[error("Received an unknown response from the server (status '{status}').")]
    UnknownResponse { status: String },

    #[error("Resume data not found.")]
    MissingDocument,

    #[error("{0}")]
    Validation(String),

    #[error("Cannot {operation} while the wizard is on the {step:?} step")]
    InvalidTransition {
        operation: &'static str,
        step: WizardStep,
    },

    #[error("Invalid key-path: {0}")]
    Path(#[from] PathError),

    #[error("Failed to save the downloaded file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<GatewayError> for WizardError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Transport(e) => WizardError::Transport(e),
            GatewayError::OperationFailed(message) => WizardError::OperationFailed(message),
        }
    }
}

impl WizardError {
    /// Whether the controller shows this error in the error slot.
    /// Form validation and misuse of the controller leave the current step alone.
    pub fn is_surfaced(&self) -> bool {
        !matches!(
            self,
            WizardError::Validation(_) | WizardError::InvalidTransition { .. } | WizardError::Path(_)
        )
    }
}

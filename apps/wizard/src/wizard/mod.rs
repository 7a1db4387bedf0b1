// Wizard state controller: step sequencing, session state and downloads.
// All remote calls go through the gateway trait; nothing here talks HTTP.

pub mod controller;
pub mod download;
pub mod session;
pub mod step;

pub use controller::WizardController;
pub use download::{DownloadFormat, DownloadTarget};
pub use step::WizardStep;

use serde::Serialize;

/// Screens the wizard can show. `Results` is only ever shown underneath
/// `Confirmation` or `Download`, never on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WizardStep {
    Form,
    Loading,
    Results,
    Confirmation,
    Download,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepState {
    Pending,
    Active,
    Completed,
}

/// The three-step progress indicator (upload, analyze, download).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stepper {
    current: usize,
}

impl Stepper {
    pub const LABELS: [&'static str; 3] = ["Upload", "Analyze", "Download"];

    pub fn current(&self) -> usize {
        self.current
    }

    /// Moves to a 1-based step, clamped to the labelled range.
    pub fn advance_to(&mut self, step: usize) {
        self.current = step.clamp(1, Self::LABELS.len());
    }

    pub fn states(&self) -> [StepState; 3] {
        std::array::from_fn(|i| match (i + 1).cmp(&self.current) {
            std::cmp::Ordering::Less => StepState::Completed,
            std::cmp::Ordering::Equal => StepState::Active,
            std::cmp::Ordering::Greater => StepState::Pending,
        })
    }
}

impl Default for Stepper {
    fn default() -> Self {
        Self { current: 1 }
    }
}

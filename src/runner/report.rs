//! What a run produced: per-step results and the reason a run stopped early.

use std::fmt;
use thiserror::Error;

use super::stage::RunStage;
use crate::error::CodeInputError;
use crate::session::BearerToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    HealthCheck,
    SendCode,
    VerifyCode,
    Register,
    Login,
    Profile,
    Activities,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::HealthCheck => "health check",
            Step::SendCode => "send verification code",
            Step::VerifyCode => "verification code input",
            Step::Register => "register",
            Step::Login => "login",
            Step::Profile => "user profile",
            Step::Activities => "activity list",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    Failed(String),
    Skipped(String),
}

impl StepStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub status: StepStatus,
}

/// Summary of a run that reached the end of the sequence.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub email: String,
    pub password: String,
    pub nickname: String,
    /// Token held when the run finished (login token if login returned one).
    pub token: BearerToken,
    pub steps: Vec<StepRecord>,
    /// Number of activities listed, if the listing succeeded.
    pub activity_count: Option<usize>,
    pub stage: RunStage,
}

impl RunReport {
    pub fn status_of(&self, step: Step) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| &record.status)
    }

    /// Steps that failed without stopping the run.
    pub fn soft_failures(&self) -> Vec<Step> {
        self.steps
            .iter()
            .filter(|record| record.status.is_failed())
            .map(|record| record.step)
            .collect()
    }
}

/// Why a run stopped before registration completed. Always exit code 1.
#[derive(Debug, Error)]
pub enum AbortReason {
    #[error("health check failed, aborting test run")]
    HealthCheck,

    #[error("failed to send verification code, aborting test run")]
    SendCode,

    #[error("invalid verification code (expected 6 digits): {0}")]
    InvalidCode(#[source] CodeInputError),

    #[error("registration failed, aborting test run")]
    Registration,
}

impl AbortReason {
    pub fn exit_code(&self) -> u8 {
        1
    }

    pub fn step(&self) -> Step {
        match self {
            AbortReason::HealthCheck => Step::HealthCheck,
            AbortReason::SendCode => Step::SendCode,
            AbortReason::InvalidCode(_) => Step::VerifyCode,
            AbortReason::Registration => Step::Register,
        }
    }
}

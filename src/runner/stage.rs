use std::fmt;

/// Progress of a run through the registration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Init,
    HealthOk,
    CodeSent,
    AwaitUserCode,
    Registered,
    LoginOk,
    LoginSkipped,
    ProfileChecked,
    ActivitiesChecked,
    Done,
    Aborted,
}

impl RunStage {
    /// Check if moving from the current stage to `next` is allowed.
    ///
    /// The flow is strictly linear. Only the stages before registration may
    /// move to `Aborted`; once registered the run always reaches `Done`.
    /// `Done` and `Aborted` are terminal.
    pub fn can_transition_to(&self, next: &RunStage) -> bool {
        match self {
            RunStage::Init => matches!(next, RunStage::HealthOk | RunStage::Aborted),
            RunStage::HealthOk => matches!(next, RunStage::CodeSent | RunStage::Aborted),
            RunStage::CodeSent => matches!(next, RunStage::AwaitUserCode | RunStage::Aborted),
            RunStage::AwaitUserCode => {
                matches!(next, RunStage::Registered | RunStage::Aborted)
            }
            RunStage::Registered => matches!(next, RunStage::LoginOk | RunStage::LoginSkipped),
            RunStage::LoginOk | RunStage::LoginSkipped => {
                matches!(next, RunStage::ProfileChecked)
            }
            RunStage::ProfileChecked => matches!(next, RunStage::ActivitiesChecked),
            RunStage::ActivitiesChecked => matches!(next, RunStage::Done),
            RunStage::Done | RunStage::Aborted => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStage::Done | RunStage::Aborted)
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Init => "INIT",
            RunStage::HealthOk => "HEALTH_OK",
            RunStage::CodeSent => "CODE_SENT",
            RunStage::AwaitUserCode => "AWAIT_USER_CODE",
            RunStage::Registered => "REGISTERED",
            RunStage::LoginOk => "LOGIN_OK",
            RunStage::LoginSkipped => "LOGIN_SKIPPED",
            RunStage::ProfileChecked => "PROFILE_CHECKED",
            RunStage::ActivitiesChecked => "ACTIVITIES_CHECKED",
            RunStage::Done => "DONE",
            RunStage::Aborted => "ABORTED",
        };
        write!(f, "{name}")
    }
}

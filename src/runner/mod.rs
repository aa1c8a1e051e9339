//! The registration-flow smoke test.
//!
//! Six API checks run strictly in order, with one pause for the operator to
//! type the emailed verification code:
//!
//! 1. health check (fatal)
//! 2. send verification code (fatal)
//! 3. register with the typed code (fatal)
//! 4. login (soft)
//! 5. fetch profile with the bearer token (soft, skipped without a token)
//! 6. list activities (soft)
//!
//! Fatal failures end the run with an [`AbortReason`]; soft failures are
//! recorded in the [`RunReport`] and the run continues.

mod report;
mod stage;
mod steps;


pub use report::{AbortReason, RunReport, Step, StepRecord, StepStatus};
pub use stage::RunStage;

use colored::Color;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

use crate::api::Transport;
use crate::console::Console;
use crate::session::{BearerToken, TestSession};

pub struct SmokeRunner<T: Transport, R: BufRead, W: Write> {
    transport: T,
    input: R,
    console: Console<W>,
    stage: RunStage,
    steps: Vec<StepRecord>,
}

impl<T: Transport, R: BufRead, W: Write> SmokeRunner<T, R, W> {
    pub fn new(transport: T, input: R, console: Console<W>) -> Self {
        Self {
            transport,
            input,
            console,
            stage: RunStage::Init,
            steps: Vec::new(),
        }
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    pub fn into_console(self) -> Console<W> {
        self.console
    }

    /// Drive the whole sequence for `session`.
    ///
    /// Returns the report when the sequence completes (soft failures
    /// included) or the reason it was aborted.
    pub fn run(&mut self, mut session: TestSession) -> Result<RunReport, AbortReason> {
        self.console.banner("IEClub registration smoke test", Color::Blue);

        if !self.health_check() {
            return Err(self.abort(AbortReason::HealthCheck));
        }
        self.advance(RunStage::HealthOk);

        if !self.send_code(&session.email) {
            return Err(self.abort(AbortReason::SendCode));
        }
        self.advance(RunStage::CodeSent);

        self.advance(RunStage::AwaitUserCode);
        let code = match self.prompt_code(&session.email) {
            Ok(code) => code,
            Err(e) => return Err(self.abort(AbortReason::InvalidCode(e))),
        };

        session.token = match self.register(&session, &code) {
            Some(token) => token,
            None => return Err(self.abort(AbortReason::Registration)),
        };
        self.advance(RunStage::Registered);

        match self.login(&session) {
            Some(token) => {
                session.token = BearerToken::Issued(token);
                self.advance(RunStage::LoginOk);
            }
            None => self.advance(RunStage::LoginSkipped),
        }

        self.profile(&session.token);
        self.advance(RunStage::ProfileChecked);

        let activity_count = self.activities();
        self.advance(RunStage::ActivitiesChecked);

        self.summary(&session);
        self.advance(RunStage::Done);

        Ok(RunReport {
            email: session.email,
            password: session.password,
            nickname: session.nickname,
            token: session.token,
            steps: std::mem::take(&mut self.steps),
            activity_count,
            stage: self.stage,
        })
    }

    fn advance(&mut self, next: RunStage) {
        if self.stage.can_transition_to(&next) {
            debug!(from = %self.stage, to = %next, "stage transition");
        } else {
            warn!(from = %self.stage, to = %next, "unexpected stage transition");
        }
        self.stage = next;
    }

    fn abort(&mut self, reason: AbortReason) -> AbortReason {
        self.console.error(&reason.to_string());
        self.advance(RunStage::Aborted);
        reason
    }

    fn record(&mut self, step: Step, status: StepStatus) {
        debug!(%step, ?status, "step finished");
        self.steps.push(StepRecord { step, status });
    }

    fn summary(&mut self, session: &TestSession) {
        self.console
            .banner("✅ All core checks completed", Color::Green);

        self.console.colored("Test account:", Color::Blue);
        self.console.plain(&format!("   Email:    {}", session.email));
        self.console
            .plain(&format!("   Password: {}", session.password));
        self.console
            .plain(&format!("   Nickname: {}", session.nickname));
        self.console.plain("");

        let failed: Vec<String> = self
            .steps
            .iter()
            .filter(|record| record.status.is_failed())
            .map(|record| record.step.to_string())
            .collect();
        if failed.is_empty() {
            self.console
                .colored("🎉 Smoke test finished, the system looks healthy!", Color::Green);
        } else {
            self.console.warning(&format!(
                "Smoke test finished with soft failures: {}",
                failed.join(", ")
            ));
        }
        self.console.plain("");
    }
}

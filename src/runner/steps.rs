use colored::Color;
use serde_json::json;
use std::io::{BufRead, Write};
use tracing::info;

use super::{SmokeRunner, Step, StepStatus};
use crate::api::fields::{self, display};
use crate::api::{
    activities_path, ApiRequest, ApiResponse, Transport, HEALTH_PATH, LOGIN_PATH, PROFILE_PATH,
    REGISTER_PATH, SEND_CODE_PATH,
};
use crate::error::CodeInputError;
use crate::session::{BearerToken, TestSession};
use crate::verify_code::{self, CODE_LENGTH};

const TOTAL_STEPS: usize = 6;
const TOKEN_PREVIEW_CHARS: usize = 50;
const ACTIVITY_PAGE: u32 = 1;
const ACTIVITY_PAGE_SIZE: u32 = 10;
/// Gender value sent with every registration.
const REGISTER_GENDER: u8 = 1;
const CODE_EXPIRY_MINUTES: u32 = 10;

/// True when an API failure message points at the verification code.
pub(crate) fn mentions_code_problem(message: &str) -> bool {
    message.contains("验证码") || message.to_lowercase().contains("verification code")
}

fn failure_reason(response: &ApiResponse) -> String {
    format!("HTTP {}: {}", response.status, response.message())
}

impl<T: Transport, R: BufRead, W: Write> SmokeRunner<T, R, W> {
    fn step_header(&mut self, number: usize, title: &str) {
        self.console
            .header(&format!("Step {number}/{TOTAL_STEPS}: {title}"));
    }

    pub(super) fn health_check(&mut self) -> bool {
        self.step_header(1, "Health check");

        match self.transport.send(&ApiRequest::get(HEALTH_PATH)) {
            Ok(resp)
                if resp.status == 200
                    && resp.body.get("status").and_then(|s| s.as_str()) == Some("ok") =>
            {
                self.console.success("Health check passed");
                self.console
                    .info(&format!("Service: {}", display(resp.body.get("service"))));
                self.console
                    .info(&format!("Version: {}", display(resp.body.get("version"))));
                self.console
                    .info(&format!("Uptime: {}s", display(resp.body.get("uptime"))));
                self.record(Step::HealthCheck, StepStatus::Passed);
                true
            }
            Ok(resp) => {
                self.console
                    .error(&format!("Health check failed: {}", resp.body));
                self.record(Step::HealthCheck, StepStatus::Failed(failure_reason(&resp)));
                false
            }
            Err(e) => {
                self.console.error(&format!("Health check error: {e}"));
                self.record(Step::HealthCheck, StepStatus::Failed(e.to_string()));
                false
            }
        }
    }

    pub(super) fn send_code(&mut self, email: &str) -> bool {
        self.step_header(2, "Send verification code");
        self.console.info(&format!("Test email: {email}"));

        let request = ApiRequest::post(
            SEND_CODE_PATH,
            json!({ "email": email, "type": "register" }),
        );

        match self.transport.send(&request) {
            Ok(resp) if resp.status == 200 && fields::code_is(&resp.body, 200) => {
                self.console.success("Verification code sent");
                self.console.info(&format!(
                    "Expires in: {}s",
                    display(fields::data_field(&resp.body, "expiresIn"))
                ));
                self.record(Step::SendCode, StepStatus::Passed);
                true
            }
            Ok(resp) => {
                self.console.error(&format!(
                    "Failed to send verification code: {}",
                    resp.message()
                ));
                self.console
                    .info(&format!("Response: {}", resp.pretty_body()));
                self.record(Step::SendCode, StepStatus::Failed(failure_reason(&resp)));
                false
            }
            Err(e) => {
                self.console
                    .error(&format!("Verification code request error: {e}"));
                self.record(Step::SendCode, StepStatus::Failed(e.to_string()));
                false
            }
        }
    }

    /// Ask the operator for the code. Blocks until a line is entered.
    pub(super) fn prompt_code(&mut self, email: &str) -> Result<String, CodeInputError> {
        self.console.plain("");
        self.console.rule(Color::Yellow);
        self.console
            .colored(&format!("📧 Check the mailbox {email}"), Color::Yellow);
        self.console.colored(
            &format!("   and enter the {CODE_LENGTH}-digit verification code:"),
            Color::Yellow,
        );
        self.console.prompt("Verification code: ");

        let result = verify_code::read_code(&mut self.input);

        self.console.plain("");
        self.console.rule(Color::Yellow);
        self.console.plain("");

        match &result {
            Ok(_) => self.record(Step::VerifyCode, StepStatus::Passed),
            Err(e) => {
                self.console.error(&format!(
                    "Malformed verification code (expected {CODE_LENGTH} digits)"
                ));
                self.record(Step::VerifyCode, StepStatus::Failed(e.to_string()));
            }
        }
        result
    }

    /// Register the session's account. `None` means registration failed.
    pub(super) fn register(&mut self, session: &TestSession, code: &str) -> Option<BearerToken> {
        self.step_header(3, "Register");
        self.console.info(&format!("Email: {}", session.email));
        self.console
            .info(&format!("Nickname: {}", session.nickname));
        self.console.info(&format!("Verification code: {code}"));

        let request = ApiRequest::post(
            REGISTER_PATH,
            json!({
                "email": session.email,
                "password": session.password,
                "verifyCode": code,
                "nickname": session.nickname,
                "gender": REGISTER_GENDER,
            }),
        );

        match self.transport.send(&request) {
            Ok(resp)
                if matches!(resp.status, 200 | 201) && fields::indicates_success(&resp.body) =>
            {
                self.console.success("Registration succeeded");
                self.record(Step::Register, StepStatus::Passed);

                let token = BearerToken::from_response(fields::token(&resp.body));
                match &token {
                    BearerToken::Issued(t) => self.console.info(&format!(
                        "Token: {}",
                        fields::preview(t, TOKEN_PREVIEW_CHARS)
                    )),
                    BearerToken::NotIssued => self
                        .console
                        .warning("Registration succeeded but no token was returned"),
                }
                Some(token)
            }
            Ok(resp) => {
                let message = resp.message();
                self.console
                    .error(&format!("Registration failed: {message}"));
                self.console
                    .info(&format!("Response: {}", resp.pretty_body()));

                if mentions_code_problem(&message) {
                    self.console
                        .warning("The verification code may be wrong. Check that:");
                    self.console
                        .warning("1. the code was typed correctly");
                    self.console.warning(&format!(
                        "2. the code has not expired ({CODE_EXPIRY_MINUTES} minutes)"
                    ));
                    self.console.warning("3. the email address is correct");
                }

                self.record(Step::Register, StepStatus::Failed(failure_reason(&resp)));
                None
            }
            Err(e) => {
                self.console.error(&format!("Registration error: {e}"));
                self.record(Step::Register, StepStatus::Failed(e.to_string()));
                None
            }
        }
    }

    /// Log in with the session's credentials. Returns a fresh token, if any.
    pub(super) fn login(&mut self, session: &TestSession) -> Option<String> {
        self.step_header(4, "Login");
        self.console.info(&format!("Email: {}", session.email));

        let request = ApiRequest::post(
            LOGIN_PATH,
            json!({ "email": session.email, "password": session.password }),
        );

        match self.transport.send(&request) {
            Ok(resp) if resp.status == 200 && fields::indicates_success(&resp.body) => {
                self.console.success("Login succeeded");
                self.record(Step::Login, StepStatus::Passed);

                let token = fields::token(&resp.body);
                match &token {
                    Some(t) => self.console.info(&format!(
                        "Token: {}",
                        fields::preview(t, TOKEN_PREVIEW_CHARS)
                    )),
                    None => {
                        info!("login returned no token, keeping the registration token");
                        self.console.warning("No token returned");
                    }
                }
                token
            }
            Ok(resp) => {
                self.console
                    .error(&format!("Login failed: {}", resp.message()));
                self.console
                    .info(&format!("Response: {}", resp.pretty_body()));
                self.record(Step::Login, StepStatus::Failed(failure_reason(&resp)));
                None
            }
            Err(e) => {
                self.console.error(&format!("Login error: {e}"));
                self.record(Step::Login, StepStatus::Failed(e.to_string()));
                None
            }
        }
    }

    pub(super) fn profile(&mut self, token: &BearerToken) {
        self.step_header(5, "Fetch user profile");

        let Some(token) = token.usable() else {
            self.console.warning("Skipped (no token)");
            self.record(Step::Profile, StepStatus::Skipped("no token".to_string()));
            return;
        };

        let request = ApiRequest::get(PROFILE_PATH).with_bearer(token);

        match self.transport.send(&request) {
            Ok(resp) if resp.status == 200 => {
                self.console.success("Fetched user profile");
                let user = fields::data_or_body(&resp.body);
                self.console
                    .info(&format!("Nickname: {}", display(user.get("nickname"))));
                self.console
                    .info(&format!("Email: {}", display(user.get("email"))));
                self.console
                    .info(&format!("Level: {}", display(user.get("level"))));
                self.record(Step::Profile, StepStatus::Passed);
            }
            Ok(resp) => {
                self.console.error(&format!(
                    "Failed to fetch user profile: {}",
                    resp.message()
                ));
                self.record(Step::Profile, StepStatus::Failed(failure_reason(&resp)));
            }
            Err(e) => {
                self.console.error(&format!("User profile error: {e}"));
                self.record(Step::Profile, StepStatus::Failed(e.to_string()));
            }
        }
    }

    /// List the first page of activities. Returns the count on success.
    pub(super) fn activities(&mut self) -> Option<usize> {
        self.step_header(6, "List activities");

        let request = ApiRequest::get(activities_path(ACTIVITY_PAGE, ACTIVITY_PAGE_SIZE));

        match self.transport.send(&request) {
            Ok(resp) if resp.status == 200 => {
                self.console.success("Fetched activity list");

                let activities = fields::list(&resp.body);
                self.console
                    .info(&format!("Activity count: {}", activities.len()));
                if let Some(first) = activities.first() {
                    self.console.info(&format!(
                        "First activity: {}",
                        display(first.get("title"))
                    ));
                }

                self.record(Step::Activities, StepStatus::Passed);
                Some(activities.len())
            }
            Ok(resp) => {
                self.console.warning(&format!(
                    "Failed to fetch activity list: {}",
                    resp.message()
                ));
                self.record(
                    Step::Activities,
                    StepStatus::Failed(failure_reason(&resp)),
                );
                None
            }
            Err(e) => {
                self.console.error(&format!("Activity list error: {e}"));
                self.record(Step::Activities, StepStatus::Failed(e.to_string()));
                None
            }
        }
    }
}

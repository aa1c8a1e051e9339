//! Library-level runs over the real HTTP transport.

use crate::helpers::FakeApi;
use ieclub_smoke::api::HttpTransport;
use ieclub_smoke::config::Config;
use ieclub_smoke::console::Console;
use ieclub_smoke::error::CodeInputError;
use ieclub_smoke::runner::{AbortReason, RunReport, RunStage, SmokeRunner, Step, StepStatus};
use ieclub_smoke::session::TestSession;
use serde_json::json;
use std::io::Cursor;
use std::time::Duration;

const ACTIVITIES: &str = "/activities?page=1&pageSize=10";

fn healthy_api() -> crate::helpers::FakeApiBuilder {
    FakeApi::builder()
        .json(
            "GET",
            "/health",
            200,
            json!({"status": "ok", "service": "ieclub", "version": "1.0.0", "uptime": 5}),
        )
        .json(
            "POST",
            "/auth/send-verify-code",
            200,
            json!({"code": 200, "data": {"expiresIn": 600}}),
        )
}

fn run_against(
    api: &FakeApi,
    timeout: Duration,
    input: &str,
) -> (Result<RunReport, AbortReason>, String) {
    let transport = HttpTransport::new(&api.base_url, timeout).expect("Failed to build transport");
    let session = TestSession::at_timestamp(1_700_000_001, &Config::default());
    let mut runner = SmokeRunner::new(
        transport,
        Cursor::new(input.to_string()),
        Console::new(Vec::new()),
    );
    let result = runner.run(session);
    let output = String::from_utf8(runner.into_console().into_inner()).unwrap();
    (result, output)
}

#[test]
fn test_end_to_end_happy_path() {
    let api = healthy_api()
        .json(
            "POST",
            "/auth/register",
            201,
            json!({"success": true, "data": {"token": "abc.register.token"}}),
        )
        .json(
            "POST",
            "/auth/login",
            200,
            json!({"code": 200, "data": {"token": "xyz.login.token"}}),
        )
        .json(
            "GET",
            "/user/profile",
            200,
            json!({"data": {"nickname": "测试用户_1", "email": "test_1700000001@qq.com", "level": 1}}),
        )
        .json("GET", ACTIVITIES, 200, json!({"data": {"list": []}}))
        .start();

    let (result, output) = run_against(&api, Duration::from_secs(10), "123456\n");

    let report = result.expect("run should complete");
    assert_eq!(report.stage, RunStage::Done);
    assert_eq!(report.activity_count, Some(0));
    assert!(report.soft_failures().is_empty());
    assert!(output.contains("Nickname: 测试用户_1"));
    assert!(output.contains("Activity count: 0"));

    let register = api.request_to("/auth/register").expect("register was called");
    assert_eq!(register.method, "POST");
    assert!(register
        .header("content-type")
        .is_some_and(|v| v.starts_with("application/json")));
    assert_eq!(register.json()["verifyCode"], "123456");
    assert_eq!(register.json()["gender"], 1);

    let profile = api.request_to("/user/profile").expect("profile was called");
    assert_eq!(profile.header("authorization"), Some("Bearer xyz.login.token"));

    let activities = api.request_to(ACTIVITIES).expect("activities were listed");
    assert_eq!(activities.header("authorization"), None);
}

#[test]
fn test_registration_token_reaches_profile_header_when_login_fails() {
    let api = healthy_api()
        .json(
            "POST",
            "/auth/register",
            200,
            json!({"code": 200, "token": "top.level.token"}),
        )
        .json(
            "POST",
            "/auth/login",
            401,
            json!({"success": false, "message": "invalid credentials"}),
        )
        .json("GET", "/user/profile", 200, json!({"nickname": "n"}))
        .json("GET", ACTIVITIES, 200, json!({"list": []}))
        .start();

    let (result, _) = run_against(&api, Duration::from_secs(10), "123456\n");

    let report = result.expect("login failure is not fatal");
    assert_eq!(report.soft_failures(), vec![Step::Login]);
    let profile = api.request_to("/user/profile").expect("profile was called");
    assert_eq!(profile.header("authorization"), Some("Bearer top.level.token"));
}

#[test]
fn test_non_json_health_response_aborts() {
    let api = FakeApi::builder()
        .raw("GET", "/health", 200, "<html>maintenance</html>")
        .start();

    let (result, output) = run_against(&api, Duration::from_secs(10), "123456\n");

    assert!(matches!(result, Err(AbortReason::HealthCheck)));
    assert!(output.contains("not valid JSON"));
    assert_eq!(api.requests().len(), 1);
}

#[test]
fn test_health_timeout_aborts() {
    let api = FakeApi::builder()
        .json("GET", "/health", 200, json!({"status": "ok"}))
        .delayed("GET", "/health", Duration::from_secs(3))
        .start();

    let (result, _) = run_against(&api, Duration::from_secs(1), "123456\n");

    assert!(matches!(result, Err(AbortReason::HealthCheck)));
}

#[test]
fn test_malformed_code_never_registers() {
    let api = healthy_api().start();

    let (result, _) = run_against(&api, Duration::from_secs(10), "12 456\n");

    assert!(matches!(
        result,
        Err(AbortReason::InvalidCode(CodeInputError::Malformed(_)))
    ));
    assert!(api.request_to("/auth/register").is_none());
}

#[test]
fn test_activities_outage_is_soft() {
    let api = healthy_api()
        .json(
            "POST",
            "/auth/register",
            201,
            json!({"success": true, "data": {"token": "t"}}),
        )
        .json("POST", "/auth/login", 200, json!({"success": true, "data": {"token": "t2"}}))
        .json("GET", "/user/profile", 200, json!({"data": {"nickname": "n"}}))
        .json("GET", ACTIVITIES, 500, json!({"message": "db down"}))
        .start();

    let (result, output) = run_against(&api, Duration::from_secs(10), "123456\n");

    let report = result.expect("activity failure is not fatal");
    assert_eq!(report.activity_count, None);
    assert!(matches!(
        report.status_of(Step::Activities),
        Some(StepStatus::Failed(_))
    ));
    assert!(output.contains("Failed to fetch activity list: db down"));
}

//! `ClientAuthorizer` against the scripted engine.

use tokio_test::{assert_err, assert_ok};

use td_authorizer::config::SessionParameters;
use td_authorizer::engine::scripted::Submission;
use td_authorizer::engine::{EncryptionKey, EngineCall, PhoneNumberSettings, ScriptedEngine};
use td_authorizer::error::{AuthorizeError, EngineError};
use td_authorizer::{
    AuthorizationHandler, AuthorizationPhase, ClientAuthorizer, SessionEngine, authorize,
};

fn authorizer() -> ClientAuthorizer {
    ClientAuthorizer::new(SessionParameters::new(
        94575,
        "a3406de8d171bb422bb6ddf3bbd800e2",
    ))
}

fn queries(engine: &ScriptedEngine) -> usize {
    engine.count(|call| matches!(call, EngineCall::GetAuthorizationPhase))
}

fn submissions(engine: &ScriptedEngine) -> usize {
    engine.count(EngineCall::is_submission)
}

/// Scripted engine whose phase queries fail once anything was submitted.
struct LosesConnectionAfterSubmit(ScriptedEngine);

#[async_trait::async_trait]
impl SessionEngine for LosesConnectionAfterSubmit {
    async fn get_authorization_phase(&self) -> Result<AuthorizationPhase, EngineError> {
        if submissions(&self.0) > 0 {
            return Err(EngineError::new(500, "connection lost"));
        }
        self.0.get_authorization_phase().await
    }

    async fn set_session_parameters(
        &self,
        parameters: &SessionParameters,
    ) -> Result<(), EngineError> {
        self.0.set_session_parameters(parameters).await
    }

    async fn check_encryption_key(&self, key: &EncryptionKey) -> Result<(), EngineError> {
        self.0.check_encryption_key(key).await
    }

    async fn set_phone_number(
        &self,
        phone: &str,
        settings: &PhoneNumberSettings,
    ) -> Result<(), EngineError> {
        self.0.set_phone_number(phone, settings).await
    }

    async fn check_authentication_code(&self, code: &str) -> Result<(), EngineError> {
        self.0.check_authentication_code(code).await
    }

    async fn check_password(&self, password: &str) -> Result<(), EngineError> {
        self.0.check_password(password).await
    }
}

// ============================================================================
// Mechanical phases
// ============================================================================

#[tokio::test]
async fn submits_parameters_and_reports_next_phase() {
    let engine = ScriptedEngine::new();
    let authorizer = authorizer();

    let phase = assert_ok!(authorizer.handle(&engine).await);

    assert_eq!(
        phase,
        AuthorizationPhase::WaitEncryptionKey {
            is_encrypted: false
        }
    );
    assert_eq!(
        engine.calls(),
        vec![
            EngineCall::GetAuthorizationPhase,
            EngineCall::SetSessionParameters,
            EngineCall::GetAuthorizationPhase,
        ]
    );
    let accepted = engine.parameters().expect("parameters were not submitted");
    assert_eq!(accepted, *authorizer.parameters());
}

#[tokio::test]
async fn submits_empty_encryption_key() {
    let engine = ScriptedEngine::new().starting_at(AuthorizationPhase::WaitEncryptionKey {
        is_encrypted: true,
    });

    let phase = assert_ok!(authorizer().handle(&engine).await);

    assert_eq!(phase, AuthorizationPhase::WaitPhoneNumber);
    assert_eq!(
        engine.calls(),
        vec![
            EngineCall::GetAuthorizationPhase,
            EngineCall::CheckEncryptionKey { key_len: 0 },
            EngineCall::GetAuthorizationPhase,
        ]
    );
}

#[tokio::test]
async fn rejected_parameters_skip_the_requery() {
    let engine = ScriptedEngine::new();
    engine.fail_next(Submission::Parameters, EngineError::new(400, "API_ID_INVALID"));

    let err = assert_err!(authorizer().handle(&engine).await);

    match &err {
        AuthorizeError::Submit { request, source } => {
            assert_eq!(*request, "setTdlibParameters");
            assert_eq!(source.message, "API_ID_INVALID");
        }
        other => panic!("expected a submit error, got {other:?}"),
    }
    assert_eq!(queries(&engine), 1);
    assert_eq!(engine.phase(), AuthorizationPhase::WaitParameters);
}

#[tokio::test]
async fn rejected_encryption_key_skips_the_requery() {
    let engine = ScriptedEngine::new().starting_at(AuthorizationPhase::WaitEncryptionKey {
        is_encrypted: false,
    });
    engine.fail_next(
        Submission::EncryptionKey,
        EngineError::new(401, "DATABASE_KEY_INVALID"),
    );

    let result = authorizer().handle(&engine).await;

    assert_eq!(
        AuthorizationPhase::from_outcome(&result),
        AuthorizationPhase::Unknown
    );
    assert!(result.unwrap_err().to_string().contains("checkDatabaseEncryptionKey"));
    assert_eq!(queries(&engine), 1);
}

#[tokio::test]
async fn failed_requery_after_submission_is_reported() {
    let engine = LosesConnectionAfterSubmit(ScriptedEngine::new());

    let result = authorizer().handle(&engine).await;

    let err = assert_err!(result);
    assert!(matches!(err, AuthorizeError::Query(_)));
    assert_eq!(submissions(&engine.0), 1);
    // The submission itself went through.
    assert_eq!(
        engine.0.phase(),
        AuthorizationPhase::WaitEncryptionKey {
            is_encrypted: false
        }
    );
}

#[tokio::test]
async fn handler_query_failure_is_unknown() {
    let engine = ScriptedEngine::new();
    engine.fail_next_query(EngineError::new(503, "network unreachable"));

    let result = authorizer().handle(&engine).await;

    assert_eq!(
        AuthorizationPhase::from_outcome(&result),
        AuthorizationPhase::Unknown
    );
    assert_eq!(submissions(&engine), 0);

    // The failure is consumed; the next attempt proceeds.
    assert_ok!(authorize(&engine, &authorizer()).await);
    assert_eq!(submissions(&engine), 1);
}

// ============================================================================
// Interactive phases
// ============================================================================

#[tokio::test]
async fn interactive_phases_are_left_alone() {
    let phases = [
        AuthorizationPhase::WaitPhoneNumber,
        AuthorizationPhase::WaitCode {
            phone_number: "+15551234".to_string(),
        },
        AuthorizationPhase::WaitPassword {
            password_hint: "pet".to_string(),
        },
        AuthorizationPhase::WaitRegistration,
        AuthorizationPhase::WaitOtherDeviceConfirmation {
            link: "tg://login?token=abc".to_string(),
        },
        AuthorizationPhase::WaitEmailAddress,
        AuthorizationPhase::WaitEmailCode,
        AuthorizationPhase::LoggingOut,
        AuthorizationPhase::Closing,
    ];

    for expected in phases {
        let engine = ScriptedEngine::new().starting_at(expected.clone());
        let phase = assert_ok!(authorize(&engine, &authorizer()).await);
        assert_eq!(phase, expected);
        assert_eq!(submissions(&engine), 0, "unexpected submission at {expected}");
    }
}

#[tokio::test]
async fn phone_number_advances_to_code() {
    let engine = ScriptedEngine::new().starting_at(AuthorizationPhase::WaitPhoneNumber);
    let authorizer = authorizer();

    assert_ok!(authorizer.send_phone_number(&engine, "+15551234").await);
    assert_eq!(queries(&engine), 0);

    let phase = assert_ok!(authorize(&engine, &authorizer).await);
    assert_eq!(
        phase,
        AuthorizationPhase::WaitCode {
            phone_number: "+15551234".to_string()
        }
    );
    assert_eq!(
        engine.calls()[0],
        EngineCall::SetPhoneNumber {
            phone: "+15551234".to_string(),
            settings: PhoneNumberSettings {
                allow_flash_call: false,
                is_current_phone_number: false,
                allow_sms_retriever_api: false,
            },
        }
    );
}

#[tokio::test]
async fn code_and_password_reach_ready() {
    let engine = ScriptedEngine::new()
        .with_password("hunter2", "usual")
        .with_persistence_delay(std::time::Duration::ZERO)
        .starting_at(AuthorizationPhase::WaitCode {
            phone_number: "+15551234".to_string(),
        });
    let authorizer = authorizer();

    assert_ok!(authorizer.send_authentication_code(&engine, "12345").await);
    assert_eq!(
        engine.phase(),
        AuthorizationPhase::WaitPassword {
            password_hint: "usual".to_string()
        }
    );

    assert_ok!(authorizer.send_password(&engine, "hunter2").await);
    let phase = assert_ok!(authorize(&engine, &authorizer).await);
    assert_eq!(phase, AuthorizationPhase::Ready);
    assert_eq!(
        engine.count(|call| matches!(call, EngineCall::WaitForPersistence)),
        1
    );
}

#[tokio::test]
async fn rejected_credentials_keep_the_phase() {
    let engine = ScriptedEngine::new().starting_at(AuthorizationPhase::WaitPhoneNumber);
    let authorizer = authorizer();

    let err = assert_err!(authorizer.send_phone_number(&engine, "").await);
    assert_eq!(err.engine_error().unwrap().message, "PHONE_NUMBER_INVALID");
    assert_eq!(engine.phase(), AuthorizationPhase::WaitPhoneNumber);

    assert_ok!(authorizer.send_phone_number(&engine, "+15551234").await);
    let err = assert_err!(authorizer.send_authentication_code(&engine, "00000").await);
    match err {
        AuthorizeError::Submit { request, source } => {
            assert_eq!(request, "checkAuthenticationCode");
            assert_eq!(source.message, "PHONE_CODE_INVALID");
        }
        other => panic!("expected a submit error, got {other:?}"),
    }
    assert!(matches!(engine.phase(), AuthorizationPhase::WaitCode { .. }));
    assert_eq!(queries(&engine), 0);
}

#[tokio::test]
async fn entry_points_outside_their_phase_are_rejected() {
    let engine = ScriptedEngine::new();
    let authorizer = authorizer();

    let err = assert_err!(authorizer.send_password(&engine, "hunter2").await);
    assert_eq!(err.engine_error().unwrap().code, 400);
    assert!(err.to_string().starts_with("checkAuthenticationPassword rejected"));
    assert_eq!(engine.phase(), AuthorizationPhase::WaitParameters);
}

#[tokio::test]
async fn rate_limit_is_passed_through() {
    let engine = ScriptedEngine::new().starting_at(AuthorizationPhase::WaitPhoneNumber);
    engine.fail_next(Submission::PhoneNumber, EngineError::new(429, "FLOOD_WAIT_30"));

    let err = assert_err!(authorizer().send_phone_number(&engine, "+15551234").await);
    assert_eq!(
        err.engine_error(),
        Some(&EngineError::new(429, "FLOOD_WAIT_30"))
    );
}

// domain-lookup-lib/tests/integration.rs

//! Integration tests for the public lookup API.

use async_trait::async_trait;
use domain_lookup_lib::{
    DomainLookupError, DomainLookupService, DomainStatus, LookupConfig, SourceResponse,
    WhoisSource,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const TAKEN_RECORD: &str = "Domain Name: KWIKAWEB.COM\nRegistry Domain ID: 123_DOMAIN_COM-VRSN\nRegistrar: Example Registrar, LLC\nCreation Date: 2019-03-02T00:00:00Z\n";

/// Test double that counts queries and simulates one registry behavior.
#[derive(Clone)]
enum Behavior {
    Registered(&'static str),
    Unregistered,
    Hang(Duration),
    Refused,
    Garbled,
}

struct SimulatedRegistry {
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl SimulatedRegistry {
    fn service(behavior: Behavior) -> (DomainLookupService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = SimulatedRegistry {
            behavior,
            calls: calls.clone(),
        };
        (
            DomainLookupService::with_source(source, Duration::from_millis(200)),
            calls,
        )
    }
}

#[async_trait]
impl WhoisSource for SimulatedRegistry {
    async fn query(&self, domain: &str) -> Result<SourceResponse, DomainLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Registered(text) => Ok(SourceResponse::Record(text.to_string())),
            Behavior::Unregistered => Ok(SourceResponse::NotFound),
            Behavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(SourceResponse::NotFound)
            }
            Behavior::Refused => Err(DomainLookupError::transport_with_source(
                "Connection failed",
                "connection refused",
            )),
            Behavior::Garbled => Err(DomainLookupError::unrecognized(domain, "garbled")),
        }
    }
}

#[tokio::test]
async fn test_unregistered_domain_is_available_and_has_no_record() {
    let (service, calls) = SimulatedRegistry::service(Behavior::Unregistered);

    let result = service.check_availability("kwikaweb-free.com").await.unwrap();
    assert!(result.available);
    assert_eq!(result.domain, "kwikaweb-free.com");

    let err = service.fetch_record("kwikaweb-free.com").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_registered_domain_is_taken_and_record_passes_through() {
    let (service, _) = SimulatedRegistry::service(Behavior::Registered(TAKEN_RECORD));

    let result = service.check_availability("kwikaweb.com").await.unwrap();
    assert!(!result.available);

    let record = service.fetch_record("kwikaweb.com").await.unwrap();
    assert_eq!(record.domain, "kwikaweb.com");
    assert_eq!(record.raw_text, TAKEN_RECORD);
}

#[tokio::test]
async fn test_empty_input_never_reaches_source() {
    let (service, calls) = SimulatedRegistry::service(Behavior::Unregistered);

    let err = service.check_availability("").await.unwrap_err();
    assert!(matches!(err, DomainLookupError::InvalidInput { .. }));
    let err = service.fetch_record("   ").await.unwrap_err();
    assert!(matches!(err, DomainLookupError::InvalidInput { .. }));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_timeout_is_not_available() {
    let (service, _) = SimulatedRegistry::service(Behavior::Hang(Duration::from_secs(5)));

    let err = service
        .check_availability_within("slow.com", Duration::from_millis(20))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainLookupError::Timeout { .. }));

    let err = service.fetch_record("slow.com").await.unwrap_err();
    assert!(matches!(err, DomainLookupError::Timeout { duration, .. } if duration == Duration::from_millis(200)));
}

#[tokio::test]
async fn test_transport_failure_is_not_available() {
    let (service, _) = SimulatedRegistry::service(Behavior::Refused);

    let err = service.check_availability("example.com").await.unwrap_err();
    assert!(matches!(err, DomainLookupError::TransportError { .. }));
    assert!(err.is_retryable());

    let err = service.fetch_record("example.com").await.unwrap_err();
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_unrecognized_response_is_surfaced() {
    let (service, _) = SimulatedRegistry::service(Behavior::Garbled);
    let err = service.check_availability("example.com").await.unwrap_err();
    assert_eq!(err.kind(), "unrecognized_response");
}

#[tokio::test]
async fn test_availability_never_returns_not_found() {
    for behavior in [
        Behavior::Registered(TAKEN_RECORD),
        Behavior::Unregistered,
        Behavior::Refused,
        Behavior::Garbled,
    ] {
        let (service, _) = SimulatedRegistry::service(behavior);
        if let Err(e) = service.check_availability("example.com").await {
            assert!(!e.is_not_found());
        }
    }
}

#[tokio::test]
async fn test_lookup_matches_individual_operations() {
    let (service, calls) = SimulatedRegistry::service(Behavior::Registered(TAKEN_RECORD));
    let status = service.lookup("KWIKAWEB.com.").await.unwrap();
    assert_eq!(status.domain(), "kwikaweb.com");
    assert!(matches!(status, DomainStatus::Registered(ref r) if r.raw_text == TAKEN_RECORD));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_service_clones_share_source() {
    let (service, calls) = SimulatedRegistry::service(Behavior::Unregistered);
    let clone = service.clone();

    let (a, b) = tokio::join!(
        service.check_availability("one.com"),
        clone.check_availability("two.com")
    );
    assert!(a.unwrap().available);
    assert!(b.unwrap().available);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================
// System whois client, simulated with `sh -c`
// ============================================================

#[cfg(unix)]
mod command_source {
    use super::*;

    /// Service whose "whois client" is a shell script; the domain arrives as `$1`.
    fn scripted_service(script: &str, timeout: Duration) -> DomainLookupService {
        let config = LookupConfig::default()
            .with_timeout(timeout)
            .with_whois_command("sh")
            .with_whois_args(vec!["-c".to_string(), script.to_string(), "sh".to_string()]);
        DomainLookupService::with_config(config)
    }

    #[tokio::test]
    async fn test_registered_output() {
        let service = scripted_service(
            r#"printf 'Domain Name: %s\nRegistrar: Example Registrar\n' "$1""#,
            Duration::from_secs(5),
        );

        let result = service.check_availability("kwikaweb.com").await.unwrap();
        assert!(!result.available);

        let record = service.fetch_record("kwikaweb.com").await.unwrap();
        assert_eq!(
            record.raw_text,
            "Domain Name: kwikaweb.com\nRegistrar: Example Registrar\n"
        );
    }

    #[tokio::test]
    async fn test_registry_record_with_registrar_no_match_is_taken() {
        let service = scripted_service(
            r#"printf 'Domain Name: %s\nRegistry Domain ID: 123_DOMAIN_COM-VRSN\nCreation Date: 2019-03-02T00:00:00Z\n\nNo match for "%s".\n' "$1" "$1""#,
            Duration::from_secs(5),
        );

        let result = service.check_availability("kwikaweb.com").await.unwrap();
        assert!(!result.available);
    }

    #[tokio::test]
    async fn test_no_match_output() {
        let service = scripted_service(
            r#"printf 'No match for "%s".\n' "$1""#,
            Duration::from_secs(5),
        );

        assert!(service.check_availability("free.com").await.unwrap().available);
        assert!(service.fetch_record("free.com").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let service = scripted_service(
            "echo 'connect: Connection refused' >&2; exit 2",
            Duration::from_secs(5),
        );

        let err = service.check_availability("example.com").await.unwrap_err();
        match err {
            DomainLookupError::TransportError { source, .. } => {
                assert_eq!(source.as_deref(), Some("connect: Connection refused"));
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_hanging_client_times_out() {
        let service = scripted_service("sleep 5", Duration::from_millis(300));
        let err = service.check_availability("example.com").await.unwrap_err();
        assert!(matches!(err, DomainLookupError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_silent_success_is_unrecognized() {
        let service = scripted_service("exit 0", Duration::from_secs(5));
        let err = service.check_availability("example.com").await.unwrap_err();
        assert_eq!(err.kind(), "unrecognized_response");
    }
}

/// Smoke test against the real registry: google.com must be reported as taken.
/// Needs a whois client and network access, so it only runs on request.
#[tokio::test]
#[ignore]
async fn test_known_taken_domain_google_com() {
    let service = DomainLookupService::new();
    let result = service.check_availability("google.com").await.unwrap();
    assert!(!result.available, "google.com must be reported as TAKEN");
}

// Test code is allowed to panic on failure
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Unit tests for route-timeout-webhook.
//!
//! These tests run without a Kubernetes cluster and exercise the admission
//! decision pipeline end-to-end through the public API.

mod fixtures {
    use route_timeout_webhook::config::TIMEOUT_ANNOTATION;
    use route_timeout_webhook::crd::{Route, RouteSpec, RouteTargetReference, TlsConfig};

    /// Build a Route in namespace `default` with the given annotation/TLS.
    pub fn route(timeout: Option<&str>, tls: Option<TlsConfig>) -> Route {
        let mut route = Route::new(
            "test-route",
            RouteSpec {
                host: "app.example.com".to_string(),
                path: None,
                to: RouteTargetReference {
                    kind: "Service".to_string(),
                    name: "my-service".to_string(),
                    weight: Some(100),
                },
                port: None,
                tls,
            },
        );
        route.metadata.namespace = Some("default".to_string());
        if let Some(timeout) = timeout {
            use kube::ResourceExt;
            route
                .annotations_mut()
                .insert(TIMEOUT_ANNOTATION.to_string(), timeout.to_string());
        }
        route
    }

    /// Self-signed certificate and PKCS#8 key DER for round-trip tests.
    pub fn self_signed_pair() -> (String, Vec<u8>) {
        let key_pair = rcgen::KeyPair::generate().expect("key generation should succeed");
        let cert = rcgen::CertificateParams::new(vec!["app.example.com".to_string()])
            .expect("params should build")
            .self_signed(&key_pair)
            .expect("self-signing should succeed");
        (cert.pem(), key_pair.serialize_der())
    }
}

mod scenario_tests {
    use super::fixtures::route;
    use route_timeout_webhook::crd::{TerminationType, TlsConfig};
    use route_timeout_webhook::{AdmissionConfig, Verdict, validate_route};

    fn ceiling_660() -> AdmissionConfig {
        AdmissionConfig::new(Some("660".to_string()))
    }

    #[test]
    fn test_timeout_under_ceiling_allowed() {
        let verdict = validate_route(&route(Some("50s"), None), false, &ceiling_660()).unwrap();
        assert!(verdict.is_allowed());
    }

    #[test]
    fn test_timeout_over_ceiling_denied() {
        let verdict = validate_route(&route(Some("1000s"), None), false, &ceiling_660()).unwrap();
        assert!(matches!(verdict, Verdict::Deny(reason) if reason.contains("maximum")));
    }

    #[test]
    fn test_timeout_over_ceiling_with_bypass_allowed() {
        let verdict = validate_route(&route(Some("3000s"), None), true, &ceiling_660()).unwrap();
        assert!(verdict.is_allowed());
    }

    #[test]
    fn test_compound_timeout_denied_on_syntax() {
        let verdict = validate_route(&route(Some("1s1s"), None), false, &ceiling_660()).unwrap();
        assert!(matches!(verdict, Verdict::Deny(reason) if reason.contains("invalid")));
    }

    #[test]
    fn test_absent_annotation_allowed() {
        let verdict = validate_route(&route(None, None), false, &ceiling_660()).unwrap();
        assert!(verdict.is_allowed());
    }

    #[test]
    fn test_non_pem_certificate_denied() {
        let mut tls = TlsConfig::with_termination(TerminationType::Edge);
        tls.certificate = Some("BadCertificate".to_string());

        // "BadCertificate" is not PEM armor at all, so the validator takes
        // the decode-error path; the orchestrator still denies.
        let verdict = validate_route(&route(Some("50s"), Some(tls)), false, &ceiling_660()).unwrap();
        assert!(matches!(verdict, Verdict::Deny(reason) if reason.contains("not valid PEM")));
    }

    #[test]
    fn test_passthrough_ignores_garbage_artifacts() {
        let mut tls = TlsConfig::with_termination(TerminationType::Passthrough);
        tls.certificate = Some("garbage".to_string());
        tls.key = Some("garbage".to_string());

        let verdict = validate_route(&route(Some("50s"), Some(tls)), false, &ceiling_660()).unwrap();
        assert!(verdict.is_allowed());
    }

    #[test]
    fn test_malformed_ceiling_surfaces_as_error() {
        let config = AdmissionConfig::new(Some("six hundred".to_string()));
        assert!(validate_route(&route(Some("50s"), None), false, &config).is_err());
    }
}

mod round_trip_tests {
    use super::fixtures::{route, self_signed_pair};
    use route_timeout_webhook::crd::{TerminationType, TlsConfig};
    use route_timeout_webhook::validation::tls::PRIVATE_KEY_BLOCK_TYPE;
    use route_timeout_webhook::{AdmissionConfig, validate_route};

    #[test]
    fn test_fresh_self_signed_pair_validates_end_to_end() {
        let (cert_pem, key_der) = self_signed_pair();
        let key_pem = pem::encode(&pem::Pem::new(PRIVATE_KEY_BLOCK_TYPE, key_der));

        let mut tls = TlsConfig::with_termination(TerminationType::Edge);
        tls.certificate = Some(cert_pem);
        tls.key = Some(key_pem);

        let config = AdmissionConfig::new(None);
        let verdict = validate_route(&route(Some("30s"), Some(tls)), false, &config).unwrap();
        assert!(verdict.is_allowed());
    }

    #[test]
    fn test_reencrypt_round_trip() {
        let (cert_pem, key_der) = self_signed_pair();
        let key_pem = pem::encode(&pem::Pem::new(PRIVATE_KEY_BLOCK_TYPE, key_der));

        let mut tls = TlsConfig::with_termination(TerminationType::Reencrypt);
        tls.certificate = Some(cert_pem);
        tls.key = Some(key_pem);

        let config = AdmissionConfig::new(None);
        let verdict = validate_route(&route(Some("30s"), Some(tls)), false, &config).unwrap();
        assert!(verdict.is_allowed());
    }
}

mod admission_review_tests {
    use route_timeout_webhook::crd::Route;
    use route_timeout_webhook::webhooks::{AdmissionRequest, AdmissionReview, Operation};

    /// A Route AdmissionReview as the API server would send it must decode
    /// into a typed request with the object populated.
    #[test]
    fn test_admission_review_decodes() {
        let review_json = serde_json::json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "request": {
                "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
                "kind": { "group": "route.openshift.io", "version": "v1", "kind": "Route" },
                "resource": { "group": "route.openshift.io", "version": "v1", "resource": "routes" },
                "operation": "CREATE",
                "namespace": "default",
                "name": "my-route",
                "userInfo": {},
                "object": {
                    "apiVersion": "route.openshift.io/v1",
                    "kind": "Route",
                    "metadata": {
                        "name": "my-route",
                        "namespace": "default",
                        "annotations": { "haproxy.router.openshift.io/timeout": "30s" }
                    },
                    "spec": {
                        "to": { "kind": "Service", "name": "my-service" },
                        "tls": { "termination": "edge" }
                    }
                }
            }
        });

        let review: AdmissionReview<Route> = serde_json::from_value(review_json).unwrap();
        let request: AdmissionRequest<Route> = review.try_into().unwrap();

        assert_eq!(request.operation, Operation::Create);
        assert_eq!(request.namespace.as_deref(), Some("default"));
        let route = request.object.expect("object should be populated");
        assert_eq!(route.spec.to.name, "my-service");
    }
}

use std::collections::HashMap;

use log::{debug, info, warn};

use super::{Authenticator, PluginError};
use crate::{
    config::{AuthenticatorConfig, CleanupStrategy, HETZNER_API_ENDPOINT, TTL},
    domain,
    hetzner::{HetznerClient, RecordType, ReqwestTransport, Transport},
};

/// An [`Authenticator`] that completes DNS-01 challenges with TXT records in Hetzner DNS.
///
/// Validation names are always sent to the API in fully-qualified form.
/// Ids of created records are remembered per validation name and value until the challenge is cleaned up,
/// but are only used for deletion with [`CleanupStrategy::RetainedId`].
/// Both strategies only ever delete the record carrying the challenge's own value,
/// so challenges sharing a validation name (e.g. `example.com` and `*.example.com`) can be cleaned up independently.
///
/// To create an authenticator for the public API, use [`HetznerAuthenticator::from_config()`].
pub struct HetznerAuthenticator<T: Transport = ReqwestTransport> {
    client: HetznerClient<T>,
    ttl: TTL,
    strategy: CleanupStrategy,
    // Challenges that have been performed but not cleaned up yet, (validation name, validation) -> record id
    active: HashMap<(String, String), String>,
}

impl HetznerAuthenticator<ReqwestTransport> {
    pub fn from_config(config: &AuthenticatorConfig) -> Result<Box<dyn Authenticator>, PluginError> {
        let client = HetznerClient::with_base_url(
            config.api_token,
            config.base_url.unwrap_or(HETZNER_API_ENDPOINT),
            config.timeout,
        )?;
        Ok(Box::new(HetznerAuthenticator::new(
            client,
            config.ttl,
            config.cleanup_strategy,
        )))
    }
}

impl<T: Transport> HetznerAuthenticator<T> {
    pub fn new(client: HetznerClient<T>, ttl: TTL, strategy: CleanupStrategy) -> Self {
        HetznerAuthenticator {
            client,
            ttl,
            strategy,
            active: HashMap::new(),
        }
    }

    /// Returns the record id retained for a performed challenge, if any
    pub fn retained_record_id(&self, validation_name: &str, validation: &str) -> Option<&str> {
        self.active
            .get(&(domain::to_fqdn(validation_name), validation.to_owned()))
            .map(String::as_str)
    }
}

impl<T: Transport> Authenticator for HetznerAuthenticator<T> {
    fn perform(
        &mut self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), PluginError> {
        let name = domain::to_fqdn(validation_name);
        let record = self
            .client
            .add_record(domain, RecordType::Txt, &name, validation, self.ttl)?;
        info!("Created TXT record {} for domain {}", name, domain);
        debug!("Record id for {}: {}", name, record.id);

        self.active.insert((name, validation.to_owned()), record.id);
        Ok(())
    }

    fn cleanup(
        &mut self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), PluginError> {
        let name = domain::to_fqdn(validation_name);
        // The challenge is done regardless of the outcome, never keep its context around
        let retained = self.active.remove(&(name.clone(), validation.to_owned()));

        let res = match (self.strategy, retained) {
            (CleanupStrategy::RetainedId, Some(record_id)) => {
                debug!("Deleting retained record {} for {}", record_id, name);
                self.client.delete_record(&record_id)
            }
            (CleanupStrategy::RetainedId, None) => {
                warn!(
                    "No record id retained for {}, falling back to lookup by name",
                    name
                );
                self.client.del_txt_record(domain, &name, validation)
            }
            (CleanupStrategy::ByName, _) => self.client.del_txt_record(domain, &name, validation),
        };
        res?;
        info!("Deleted TXT record {} for domain {}", name, domain);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use totems::assert_ok;

    use super::*;
    use crate::hetzner::{ApiRequest, ApiResponse, MockTransport, TransportError};

    const ZONES: &str = r#"{"zones":[{"id":"xyz","name":"example.com"}]}"#;

    fn expect_zones(transport: &mut MockTransport, times: usize) {
        transport
            .expect_send()
            .withf(|req| req.method == Method::GET && req.path == "/zones")
            .times(times)
            .returning(|_| Ok(ApiResponse::new(StatusCode::OK, ZONES)));
    }

    fn is_create(req: &ApiRequest, name: &str) -> bool {
        req.method == Method::POST
            && req.body.as_ref().is_some_and(|b| {
                b["name"] == name && b["type"] == "TXT" && b["ttl"] == 60 && b["zone_id"] == "xyz"
            })
    }

    fn expect_create(transport: &mut MockTransport) {
        transport
            .expect_send()
            .withf(|req| is_create(req, "_acme-challenge.example.com."))
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::OK, r#"{"record":{"id":"zzz"}}"#)));
    }

    fn expect_delete(transport: &mut MockTransport) {
        transport
            .expect_send()
            .withf(|req| req.method == Method::DELETE && req.path == "/records/zzz")
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::OK, "")));
    }

    fn authenticator(
        transport: MockTransport,
        strategy: CleanupStrategy,
    ) -> HetznerAuthenticator<MockTransport> {
        HetznerAuthenticator::new(HetznerClient::from_transport(transport), 60, strategy)
    }

    #[test]
    fn should_send_same_name_with_or_without_trailing_dot() {
        for validation_name in ["_acme-challenge.example.com", "_acme-challenge.example.com."] {
            let mut transport = MockTransport::new();
            expect_zones(&mut transport, 1);
            expect_create(&mut transport);
            let mut auth = authenticator(transport, CleanupStrategy::ByName);

            assert_ok!(auth.perform("example.com", validation_name, "tok123"));
            assert_eq!(auth.retained_record_id(validation_name, "tok123"), Some("zzz"));
        }
    }

    #[test]
    fn should_clean_up_by_name() {
        let mut transport = MockTransport::new();
        expect_zones(&mut transport, 2);
        expect_create(&mut transport);
        transport
            .expect_send()
            .withf(|req| req.method == Method::GET && req.path == "/records")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    StatusCode::OK,
                    r#"{"records":[{"id":"zzz","name":"_acme-challenge.example.com.","value":"tok123"}]}"#,
                ))
            });
        expect_delete(&mut transport);
        let mut auth = authenticator(transport, CleanupStrategy::ByName);

        assert_ok!(auth.perform("example.com", "_acme-challenge.example.com", "tok123"));
        assert_ok!(auth.cleanup("example.com", "_acme-challenge.example.com", "tok123"));
        assert_eq!(
            auth.retained_record_id("_acme-challenge.example.com", "tok123"),
            None
        );
    }

    #[test]
    fn should_clean_up_by_retained_id() {
        let mut transport = MockTransport::new();
        expect_zones(&mut transport, 1);
        expect_create(&mut transport);
        expect_delete(&mut transport);
        let mut auth = authenticator(transport, CleanupStrategy::RetainedId);

        assert_ok!(auth.perform("example.com", "_acme-challenge.example.com.", "tok123"));
        assert_ok!(auth.cleanup("example.com", "_acme-challenge.example.com", "tok123"));
    }

    #[test]
    fn should_fall_back_to_lookup_without_retained_id() {
        let mut transport = MockTransport::new();
        expect_zones(&mut transport, 1);
        transport
            .expect_send()
            .withf(|req| req.method == Method::GET && req.path == "/records")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    StatusCode::OK,
                    r#"{"records":[{"id":"zzz","name":"_acme-challenge"}]}"#,
                ))
            });
        expect_delete(&mut transport);
        let mut auth = authenticator(transport, CleanupStrategy::RetainedId);

        assert_ok!(auth.cleanup("example.com", "_acme-challenge.example.com", "tok123"));
    }

    #[test]
    fn should_turn_api_failures_into_plugin_errors() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::UNAUTHORIZED, "")));
        let mut auth = authenticator(transport, CleanupStrategy::ByName);

        assert_eq!(
            auth.perform("example.com", "_acme-challenge.example.com", "tok123"),
            Err(PluginError::from(
                "Malformed authorization or invalid API token".to_owned()
            ))
        );
        assert_eq!(
            auth.retained_record_id("_acme-challenge.example.com", "tok123"),
            None
        );
    }

    #[test]
    fn should_turn_connection_failures_into_plugin_errors() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(TransportError::Connect("connection refused".into())));
        let mut auth = authenticator(transport, CleanupStrategy::ByName);

        let err = auth
            .cleanup("example.com", "_acme-challenge.example.com", "tok123")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not connect to Hetzner API: connection refused"
        );
    }

    #[test]
    fn should_report_missing_record_on_cleanup() {
        let mut transport = MockTransport::new();
        expect_zones(&mut transport, 1);
        transport
            .expect_send()
            .withf(|req| req.method == Method::GET && req.path == "/records")
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::OK, r#"{"records":[]}"#)));
        let mut auth = authenticator(transport, CleanupStrategy::ByName);

        assert_eq!(
            auth.cleanup("example.com", "_acme-challenge.example.com", "tok123"),
            Err(PluginError::from(
                "Record with name _acme-challenge.example.com. not found".to_owned()
            ))
        );
    }

    fn expect_create_returning(transport: &mut MockTransport, value: &'static str, id: &'static str) {
        let body = format!(r#"{{"record":{{"id":"{}"}}}}"#, id);
        transport
            .expect_send()
            .withf(move |req| {
                is_create(req, "_acme-challenge.example.com.")
                    && req.body.as_ref().is_some_and(|b| b["value"] == value)
            })
            .times(1)
            .returning(move |_| Ok(ApiResponse::new(StatusCode::OK, body.clone())));
    }

    fn expect_delete_of(transport: &mut MockTransport, id: &'static str) {
        transport
            .expect_send()
            .withf(move |req| req.method == Method::DELETE && req.path == format!("/records/{}", id))
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::OK, "")));
    }

    #[test]
    fn should_keep_retained_ids_of_challenges_sharing_a_name() {
        let mut transport = MockTransport::new();
        expect_zones(&mut transport, 2);
        expect_create_returning(&mut transport, "A", "idA");
        expect_create_returning(&mut transport, "B", "idB");
        expect_delete_of(&mut transport, "idA");
        let mut auth = authenticator(transport, CleanupStrategy::RetainedId);

        assert_ok!(auth.perform("example.com", "_acme-challenge.example.com", "A"));
        assert_ok!(auth.perform("example.com", "_acme-challenge.example.com", "B"));
        assert_ok!(auth.cleanup("example.com", "_acme-challenge.example.com", "A"));

        assert_eq!(auth.retained_record_id("_acme-challenge.example.com", "A"), None);
        assert_eq!(
            auth.retained_record_id("_acme-challenge.example.com", "B"),
            Some("idB")
        );
    }

    #[test]
    fn should_clean_up_only_the_record_with_own_value() {
        let mut transport = MockTransport::new();
        expect_zones(&mut transport, 1);
        transport
            .expect_send()
            .withf(|req| req.method == Method::GET && req.path == "/records")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    StatusCode::OK,
                    r#"{"records":[
                        {"id":"idB","name":"_acme-challenge","type":"TXT","value":"B"},
                        {"id":"idA","name":"_acme-challenge","type":"TXT","value":"A"}
                    ]}"#,
                ))
            });
        expect_delete_of(&mut transport, "idA");
        let mut auth = authenticator(transport, CleanupStrategy::ByName);

        assert_ok!(auth.cleanup("example.com", "_acme-challenge.example.com", "A"));
    }
}

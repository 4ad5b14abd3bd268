use motorchain_storage::SessionStore;

use crate::FederatedSession;

/// Storage key of the persisted federated session record.
pub const SESSION_KEY: &str = "demo_zk_session";

/// Storage key of the gas-sponsorship token cached alongside the session.
pub const SPONSOR_TOKEN_KEY: &str = "shinami_jwt";

/// Every key [`crate::IdentityResolver::logout`] clears.
pub const PERSISTED_KEYS: [&str; 2] = [SESSION_KEY, SPONSOR_TOKEN_KEY];

/// Outcome of reading the persisted federated session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistedSession {
    /// No record is stored, or storage could not be read
    Absent,
    /// The record decoded into a usable session
    Valid(FederatedSession),
    /// A record is stored but does not have the expected shape
    Malformed {
        /// Why decoding failed
        reason: String,
    },
}

impl PersistedSession {
    /// Validates a raw stored record.
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<FederatedSession>(raw) {
            Ok(session) if session.material.jwt.trim().is_empty() => PersistedSession::Malformed {
                reason: "identity token is empty".to_owned(),
            },
            Ok(session) => PersistedSession::Valid(session),
            Err(error) => PersistedSession::Malformed {
                reason: error.to_string(),
            },
        }
    }

    /// Reads and validates the record held by `store`. A failing store reads
    /// as [`PersistedSession::Absent`].
    pub fn load<S>(store: &S) -> Self
    where
        S: SessionStore + ?Sized,
    {
        match store.get(SESSION_KEY) {
            Ok(Some(raw)) => Self::decode(&raw),
            Ok(None) => PersistedSession::Absent,
            Err(error) => {
                tracing::warn!(%error, "Could not read persisted session");
                PersistedSession::Absent
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use motorchain_common::Address;
    use motorchain_storage::{MemorySessionStore, SessionStore};
    use pretty_assertions::assert_eq;

    use super::*;

    const VALID: &str = r#"{
        "address": "0xa11ce",
        "jwt": "a.b.c",
        "ephemeralKeyPair": "c2VjcmV0",
        "maxEpoch": 10,
        "randomness": "77"
    }"#;

    #[test]
    fn it_classifies_records() {
        assert!(matches!(
            PersistedSession::decode(VALID),
            PersistedSession::Valid(_)
        ));

        let malformed = vec![
            String::new(),
            "null".to_owned(),
            "not json".to_owned(),
            "{}".to_owned(),
            r#"{"address": "0xa11ce"}"#.to_owned(),
            r#"{"address": 5, "jwt": "a.b.c"}"#.to_owned(),
            VALID.replace("0xa11ce", "0xnothex"),
            VALID.replace("a.b.c", "  "),
            VALID.replace("10", "\"ten\""),
        ];

        for raw in malformed {
            assert!(
                matches!(
                    PersistedSession::decode(&raw),
                    PersistedSession::Malformed { .. }
                ),
                "expected {raw:?} to be malformed"
            );
        }
    }

    #[test]
    fn it_decodes_records_written_by_the_login_callback() {
        let raw = r#"{"address":"0xa11ce","jwt":"a.b.c","ephemeralKeyPair":"c2VjcmV0","maxEpoch":10,"randomness":"77"}"#;

        let PersistedSession::Valid(session) = PersistedSession::decode(raw) else {
            panic!("expected {raw:?} to decode");
        };

        assert_eq!(session.address, Address::from_literal("0xa11ce"));
        assert_eq!(session.material.ephemeral_key_pair, "c2VjcmV0");
        assert_eq!(session.material.max_epoch, 10);
        assert_eq!(session.material.randomness, "77");
    }

    #[test]
    fn it_rejects_records_without_a_key_pair() {
        let raw = r#"{"address":"0xa11ce","jwt":"a.b.c","ephemeralPublicKey":"cHVi","maxEpoch":10,"randomness":"77"}"#;

        assert!(matches!(
            PersistedSession::decode(raw),
            PersistedSession::Malformed { .. }
        ));
    }

    #[test]
    fn it_loads_from_a_store() {
        let store = MemorySessionStore::new();
        assert_eq!(PersistedSession::load(&store), PersistedSession::Absent);

        store.set(SESSION_KEY, VALID).unwrap();
        assert!(matches!(
            PersistedSession::load(&store),
            PersistedSession::Valid(_)
        ));
    }
}

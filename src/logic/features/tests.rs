//! Integration Tests for Feature Encoding
//!
//! Encoder + scaler + preprocessor working together.

#[cfg(test)]
mod integration_tests {
    use crate::logic::events::Event;
    use crate::logic::features::{CategoricalEncoder, Preprocessor, StandardScaler};

    fn event(event_id: &str, protocol: &str, algos: &str) -> Event {
        Event {
            event_id: event_id.to_string(),
            protocol: protocol.to_string(),
            hash_algorithms: algos.to_string(),
            message: "irrelevant to the vector".to_string(),
            ..Default::default()
        }
    }

    fn training_events() -> Vec<Event> {
        vec![
            event("cowrie.session.connect", "ssh", ""),
            event("cowrie.client.kex", "ssh", "curve25519-sha256"),
            event("cowrie.login.failed", "ssh", ""),
            event("cowrie.command.input", "telnet", ""),
        ]
    }

    fn fitted() -> Preprocessor {
        let events = training_events();
        let encoder = CategoricalEncoder::fit(&events);
        let raw: Vec<_> = events.iter().map(|e| encoder.encode(e)).collect();
        let scaler = StandardScaler::fit(&raw).unwrap();
        Preprocessor::new(encoder, scaler)
    }

    #[test]
    fn test_transform_deterministic() {
        let pre = fitted();
        let target = &training_events()[2];
        assert_eq!(pre.transform(target).to_bits(), pre.transform(target).to_bits());
    }

    #[test]
    fn test_message_does_not_affect_vector() {
        let pre = fitted();
        let mut a = training_events()[0].clone();
        let b = a.clone();
        a.message = "whoami; cat /etc/passwd".to_string();
        assert_eq!(pre.transform(&a), pre.transform(&b));
    }

    #[test]
    fn test_batch_counts_unknown_bucket_hits() {
        let pre = fitted();
        let batch = vec![
            event("cowrie.session.connect", "ssh", ""),
            event("cowrie.direct-tcpip.request", "ssh", ""),
            event("cowrie.session.closed", "http", "weird"),
        ];
        let (vectors, unseen) = pre.transform_batch(&batch);
        assert_eq!(vectors.len(), 3);
        assert_eq!(unseen, 2);
    }

    #[test]
    fn test_inference_batch_does_not_shift_mapping() {
        // the same event must encode identically no matter what else is in the batch
        let pre = fitted();
        let sample = event("cowrie.login.failed", "ssh", "");
        let alone = pre.transform_batch(&[sample.clone()]).0[0];
        let crowded = pre
            .transform_batch(&[event("a.new.event", "tcp", "x"), sample.clone()])
            .0[1];
        assert_eq!(alone, crowded);
    }
}

//! Logging init when the host application already installed a subscriber.
//!
//! Lives in its own test binary so no other test can set the global subscriber first.

#[test]
fn test_init_logging_keeps_existing_subscriber() {
    tracing::subscriber::set_global_default(tracing_subscriber::fmt().finish())
        .expect("first global subscriber");

    assert!(toponym::init_logging(tracing::Level::INFO).is_ok());
    assert!(toponym::init_logging(tracing::Level::DEBUG).is_ok());
}

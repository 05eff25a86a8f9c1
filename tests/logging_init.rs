use odbc_install_host::logging::Logging;

// Kept in its own binary: installing the global subscriber twice in a
// process shared with other tests would poison their log capture.
#[test]
fn the_global_subscriber_installs_once() {
    assert!(Logging::try_init().is_ok());
    assert!(Logging::try_init().is_err());
}

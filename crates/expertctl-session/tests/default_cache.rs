//! Runs in its own process so clearing the environment cannot race other tests.

#![cfg(unix)]

use expertctl_session::IpCache;

#[test]
fn default_location_survives_missing_home_variable() {
    std::env::remove_var("HOME");
    std::env::remove_var("USERPROFILE");

    let cache = IpCache::default_location().expect("home resolved from the user database");
    assert!(cache.path().ends_with(expertctl_session::CACHE_FILE_NAME));
    assert!(cache.path().is_absolute());
}

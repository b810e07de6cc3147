//! Environment variable overrides.
//!
//! Kept in its own test binary: the variables are process-wide.

use std::env;

use inorder_viz::config::Settings;
use inorder_viz::domain::Theme;

#[test]
fn given_env_vars_when_load_then_override_defaults() {
    env::set_var("INORDER_THEME", "dark");
    env::set_var("INORDER_STEP_DELAY_MS", "120");
    env::set_var("INORDER_LAYOUT__SPACING", "90");
    env::set_var("INORDER_RANDOM__POOL", "3,1,2");
    env::set_var("INORDER_RANDOM__SEED", "8");

    let settings = Settings::load(None).expect("load settings");

    assert_eq!(settings.theme, Theme::Dark);
    assert_eq!(settings.step_delay_ms, 120);
    assert_eq!(settings.layout.spacing, 90.0);
    assert_eq!(settings.random.pool, vec![3, 1, 2]);
    assert_eq!(settings.random.seed, Some(8));

    env::set_var("INORDER_THEME", "sepia");
    assert!(Settings::load(None).is_err());
    env::set_var("INORDER_THEME", "dark");

    // Unparsable numbers are reported, not skipped
    env::set_var("INORDER_STEP_DELAY_MS", "abc");
    let err = Settings::load(None).expect_err("non-numeric delay");
    assert!(err.to_string().contains("step_delay_ms"), "got: {err}");
    env::set_var("INORDER_STEP_DELAY_MS", "120");

    env::set_var("INORDER_LAYOUT__SPACING", "wide");
    assert!(Settings::load(None).is_err());

    for key in [
        "INORDER_THEME",
        "INORDER_STEP_DELAY_MS",
        "INORDER_LAYOUT__SPACING",
        "INORDER_RANDOM__POOL",
        "INORDER_RANDOM__SEED",
    ] {
        env::remove_var(key);
    }
}

//! Property-test run profile shared by every suite in the workspace.
//!
//! CI raises case counts for nightly jobs and may fork each case into a
//! subprocess; local runs keep the suite defaults.

use std::{env, fmt};

use proptest::test_runner::Config;

/// Environment variable overriding proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable enabling proptest process forking.
pub const SHATTER_PBT_FORK_ENV_KEY: &str = "SHATTER_PBT_FORK";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads a profile from the environment, falling back to the suite's
    /// defaults for unset or malformed overrides.
    ///
    /// # Examples
    ///
    /// ```
    /// use shatter_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: override_or(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: override_or(SHATTER_PBT_FORK_ENV_KEY, default_fork, parse_switch),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether each case runs in a forked subprocess.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }

    /// Builds a proptest configuration carrying this profile.
    ///
    /// # Examples
    ///
    /// ```
    /// use shatter_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let config = ProptestRunProfile::load(32, false).config();
    /// assert!(config.cases > 0);
    /// ```
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            cases: self.cases,
            fork: self.fork,
            ..Config::default()
        }
    }
}

/// Reason an override was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OverrideError {
    NotANumber(String),
    ZeroCases,
    NotASwitch,
}

impl fmt::Display for OverrideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber(detail) => write!(f, "parse error: {detail}"),
            Self::ZeroCases => f.write_str("cases must be > 0"),
            Self::NotASwitch => f.write_str("expected one of: true/false/1/0/yes/no/on/off"),
        }
    }
}

fn override_or<T: Copy>(
    key: &'static str,
    default: T,
    parse: fn(&str) -> Result<T, OverrideError>,
) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|reason| {
        tracing::warn!(
            env = key,
            raw = %raw,
            reason = %reason,
            "ignoring malformed property-test override",
        );
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, OverrideError> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(OverrideError::ZeroCases),
        Ok(cases) => Ok(cases),
        Err(error) => Err(OverrideError::NotANumber(error.to_string())),
    }
}

fn parse_switch(raw: &str) -> Result<bool, OverrideError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(OverrideError::NotASwitch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Holds the environment lock and restores both keys on drop.
    struct ScopedEnv {
        saved: [(&'static str, Option<String>); 2],
        _lock: MutexGuard<'static, ()>,
    }

    impl ScopedEnv {
        fn new(cases: Option<&str>, fork: Option<&str>) -> Self {
            let lock = ENV_LOCK.lock().expect("env lock");
            let saved = [
                (PROGTEST_CASES_ENV_KEY, env::var(PROGTEST_CASES_ENV_KEY).ok()),
                (SHATTER_PBT_FORK_ENV_KEY, env::var(SHATTER_PBT_FORK_ENV_KEY).ok()),
            ];
            apply(PROGTEST_CASES_ENV_KEY, cases);
            apply(SHATTER_PBT_FORK_ENV_KEY, fork);
            Self { saved, _lock: lock }
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            for (key, value) in &self.saved {
                apply(key, value.as_deref());
            }
        }
    }

    fn apply(key: &str, value: Option<&str>) {
        match value {
            // SAFETY: tests serialize access with ENV_LOCK.
            Some(value) => unsafe { env::set_var(key, value) },
            // SAFETY: tests serialize access with ENV_LOCK.
            None => unsafe { env::remove_var(key) },
        }
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let _env = ScopedEnv::new(None, None);
        let profile = ProptestRunProfile::load(64, false);
        assert_eq!(profile.cases(), 64);
        assert!(!profile.fork());
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 250 ", 250)]
    #[case("25000", 25_000)]
    fn case_overrides_are_honoured(#[case] raw: &str, #[case] expected: u32) {
        let _env = ScopedEnv::new(Some(raw), None);
        assert_eq!(ProptestRunProfile::load(64, false).cases(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("abc")]
    fn malformed_case_overrides_fall_back(#[case] raw: &str) {
        let _env = ScopedEnv::new(Some(raw), None);
        assert_eq!(ProptestRunProfile::load(64, false).cases(), 64);
    }

    #[rstest]
    #[case("true", true)]
    #[case("ON", true)]
    #[case("1", true)]
    #[case("no", false)]
    #[case("0", false)]
    fn fork_overrides_are_honoured(#[case] raw: &str, #[case] expected: bool) {
        let _env = ScopedEnv::new(None, Some(raw));
        assert_eq!(ProptestRunProfile::load(64, !expected).fork(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("maybe")]
    fn malformed_fork_overrides_fall_back(#[case] raw: &str) {
        let _env = ScopedEnv::new(None, Some(raw));
        assert!(ProptestRunProfile::load(64, true).fork());
    }

    #[test]
    fn config_carries_the_profile() {
        let _env = ScopedEnv::new(Some("12"), Some("false"));
        let config = ProptestRunProfile::load(64, true).config();
        assert_eq!(config.cases, 12);
        assert!(!config.fork);
    }

    #[test]
    fn zero_cases_reason_is_descriptive() {
        assert_eq!(parse_cases("0"), Err(OverrideError::ZeroCases));
        assert_eq!(OverrideError::ZeroCases.to_string(), "cases must be > 0");
    }
}

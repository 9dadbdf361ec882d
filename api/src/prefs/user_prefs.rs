use super::cluster_preference::ClusterPreference;
use crate::account::RecoveryPolicy;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Represents all user prefs. Intended for saving to a file. editing in settings dialog, etc.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct UserPrefs {
    cluster_preference: ClusterPreference,
    recovery_policy: RecoveryPolicy,
    watch_address: Option<String>,
}

impl UserPrefs {
    /// Reads all prefs from the environment.
    ///
    /// # Environment Variables
    /// - see [`ClusterPreference::from_env`].
    /// - `REFRESH_POLICY`: "absorb" (default), "propagate" or "retry".
    /// - `REFRESH_RETRY_ATTEMPTS`: attempts for "retry", default 3.
    /// - `REFRESH_RETRY_BACKOFF_MS`: first retry delay, default 500.
    /// - `WATCH_ADDRESS`: wallet address to connect on startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let recovery_policy = match lookup("REFRESH_POLICY")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("propagate") => RecoveryPolicy::Propagate,
            Some("retry") => RecoveryPolicy::Retry {
                max_attempts: lookup("REFRESH_RETRY_ATTEMPTS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(DEFAULT_RETRY_ATTEMPTS),
                backoff: Duration::from_millis(
                    lookup("REFRESH_RETRY_BACKOFF_MS")
                        .and_then(|s| s.trim().parse().ok())
                        .unwrap_or(DEFAULT_RETRY_BACKOFF_MS),
                ),
            },
            _ => RecoveryPolicy::Absorb,
        };

        let watch_address = lookup("WATCH_ADDRESS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            cluster_preference: ClusterPreference::from_lookup(&lookup),
            recovery_policy,
            watch_address,
        }
    }

    pub fn cluster_preference(&self) -> &ClusterPreference {
        &self.cluster_preference
    }

    pub fn recovery_policy(&self) -> &RecoveryPolicy {
        &self.recovery_policy
    }

    pub fn watch_address(&self) -> Option<&str> {
        self.watch_address.as_deref()
    }
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(vars: &'static [(&'static str, &'static str)]) -> UserPrefs {
        UserPrefs::from_lookup(|key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn absorbs_failures_by_default() {
        let p = prefs(&[]);
        assert_eq!(p.recovery_policy(), &RecoveryPolicy::Absorb);
        assert_eq!(p.watch_address(), None);
    }

    #[test]
    fn retry_policy_reads_its_knobs() {
        let p = prefs(&[
            ("REFRESH_POLICY", "Retry"),
            ("REFRESH_RETRY_ATTEMPTS", "5"),
            ("REFRESH_RETRY_BACKOFF_MS", "250"),
        ]);
        assert_eq!(
            p.recovery_policy(),
            &RecoveryPolicy::Retry {
                max_attempts: 5,
                backoff: Duration::from_millis(250),
            }
        );
    }

    #[test]
    fn reads_watch_address_and_cluster() {
        let p = prefs(&[
            ("REFRESH_POLICY", "propagate"),
            ("WATCH_ADDRESS", " 9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin "),
            ("SOLANA_CLUSTER", "localnet"),
        ]);
        assert_eq!(p.recovery_policy(), &RecoveryPolicy::Propagate);
        assert_eq!(
            p.watch_address(),
            Some("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin")
        );
        assert_eq!(p.cluster_preference().rpc_url(), "http://127.0.0.1:8899");
    }
}

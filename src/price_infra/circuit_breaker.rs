use std::time::Duration;
use dashmap::DashMap;
use serde::Serialize;
use crate::types::timestamp::Timestamp;

/// Availability of one provider.
///
/// `disabled` implies `disabled_at.is_some()`; both fields only change
/// through [`ProviderCircuitBreaker`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CircuitState {
    disabled: bool,
    disabled_at: Option<Timestamp>,
}

impl CircuitState {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn disabled_at(&self) -> Option<Timestamp> {
        self.disabled_at
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub disabled: bool,
    pub disabled_at: Option<Timestamp>,
}

/// Per-provider breaker: any hard failure disables the provider for
/// `cooldown`; the first access after the cooldown re-enables it.
///
/// There is no timer. Expiry is only noticed by [`Self::is_available`].
pub struct ProviderCircuitBreaker {
    states: DashMap<String, CircuitState>,
    cooldown: Duration,
}

impl ProviderCircuitBreaker {
    pub fn new(cooldown: Duration) -> Self {
        ProviderCircuitBreaker {
            states: DashMap::new(),
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn is_available(&self, provider: &str, now: Timestamp) -> bool {
        let Some(mut state) = self.states.get_mut(provider) else {
            return true;
        };

        if !state.disabled {
            return true;
        }

        let disabled_at = state.disabled_at.unwrap_or(now);
        if now - disabled_at >= self.cooldown {
            state.disabled = false;
            state.disabled_at = None;
            tracing::info!("Provider {} re-enabled after cooldown", provider);
            true
        } else {
            false
        }
    }

    pub fn record_failure(&self, provider: &str, now: Timestamp) {
        self.states.insert(
            provider.to_string(),
            CircuitState {
                disabled: true,
                disabled_at: Some(now),
            },
        );
        tracing::warn!(
            "Provider {} disabled for {}s",
            provider,
            self.cooldown.as_secs()
        );
    }

    /// Success leaves the state alone; re-enabling only happens on cooldown
    /// expiry.
    pub fn record_success(&self, _provider: &str) {}

    pub fn state(&self, provider: &str) -> CircuitState {
        self.states.get(provider).map(|s| *s).unwrap_or_default()
    }

    /// Read-only view; does not re-enable expired providers.
    pub fn snapshot<'a>(&self, providers: impl IntoIterator<Item = &'a str>) -> Vec<ProviderStatus> {
        providers.into_iter()
            .map(|name| {
                let state = self.state(name);
                ProviderStatus {
                    name: name.to_string(),
                    disabled: state.disabled,
                    disabled_at: state.disabled_at,
                }
            })
            .collect()
    }
}

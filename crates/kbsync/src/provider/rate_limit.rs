use std::future::Future;
use std::num::NonZeroU32;
use std::sync::{Arc, OnceLock};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::{Deserialize, Serialize};

use crate::entity::provider_kind::ProviderKind;

/// Type alias for the governor rate limiter.
type GovernorRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Default rate limits per provider (requests per minute).
pub mod rate_limits {
    /// Zendesk Guide: 700 requests/minute on the Enterprise plan.
    pub const ZENDESK_DEFAULT_RPM: u32 = 700;
    /// Freshdesk: 100 requests/minute on the lowest paid plan.
    pub const FRESHDESK_DEFAULT_RPM: u32 = 100;
}

fn default_rpm(provider: ProviderKind) -> u32 {
    match provider {
        ProviderKind::Zendesk => rate_limits::ZENDESK_DEFAULT_RPM,
        ProviderKind::Freshdesk => rate_limits::FRESHDESK_DEFAULT_RPM,
    }
}

/// Requests-per-minute budget for each provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub zendesk_rpm: u32,
    pub freshdesk_rpm: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            zendesk_rpm: default_rpm(ProviderKind::Zendesk),
            freshdesk_rpm: default_rpm(ProviderKind::Freshdesk),
        }
    }
}

impl RateLimitSettings {
    pub fn rpm_for(&self, provider: ProviderKind) -> u32 {
        match provider {
            ProviderKind::Zendesk => self.zendesk_rpm,
            ProviderKind::Freshdesk => self.freshdesk_rpm,
        }
    }
}

static SHARED: OnceLock<ProviderRateLimiter> = OnceLock::new();

/// Per-provider minimum-interval gate for outbound calls.
///
/// Each provider gets its own governor limiter with a quota of
/// `requests_per_minute` and a burst of one, so consecutive calls for the same
/// provider are spaced at least `60s / rpm` apart while calls for different
/// providers never wait on each other. Clones share state.
///
/// # Example
///
/// ```ignore
/// use kbsync::provider::ProviderRateLimiter;
/// use kbsync::ProviderKind;
///
/// let limiter = ProviderRateLimiter::shared();
/// let body = limiter
///     .schedule(ProviderKind::Zendesk, || async { fetch().await })
///     .await?;
/// ```
#[derive(Clone)]
pub struct ProviderRateLimiter {
    zendesk: Arc<GovernorRateLimiter>,
    freshdesk: Arc<GovernorRateLimiter>,
    settings: RateLimitSettings,
}

impl ProviderRateLimiter {
    /// Create an independent limiter. Jobs that should share a budget must share
    /// this instance (or use [`shared`](Self::shared)).
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            zendesk: Arc::new(build_limiter(settings.zendesk_rpm)),
            freshdesk: Arc::new(build_limiter(settings.freshdesk_rpm)),
            settings,
        }
    }

    /// The process-wide limiter. Uses default rates unless
    /// [`init_shared`](Self::init_shared) ran first.
    pub fn shared() -> &'static ProviderRateLimiter {
        SHARED.get_or_init(|| ProviderRateLimiter::new(RateLimitSettings::default()))
    }

    /// Configure the process-wide limiter. Returns `false` if it was already
    /// initialized, in which case the existing rates stay in effect.
    pub fn init_shared(settings: RateLimitSettings) -> bool {
        SHARED.set(ProviderRateLimiter::new(settings)).is_ok()
    }

    pub fn settings(&self) -> RateLimitSettings {
        self.settings
    }

    fn limiter(&self, provider: ProviderKind) -> &GovernorRateLimiter {
        match provider {
            ProviderKind::Zendesk => &self.zendesk,
            ProviderKind::Freshdesk => &self.freshdesk,
        }
    }

    /// Wait for the provider's slot, then run `f`. The result of `f` is returned
    /// unchanged.
    pub async fn schedule<F, Fut, T>(&self, provider: ProviderKind, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.limiter(provider).until_ready().await;
        f().await
    }
}

impl std::fmt::Debug for ProviderRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRateLimiter")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn build_limiter(requests_per_minute: u32) -> GovernorRateLimiter {
    let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
    RateLimiter::direct(Quota::per_minute(rpm).allow_burst(NonZeroU32::MIN))
}

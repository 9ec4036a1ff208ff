//! Ad frequency control.
//!
//! Decides, after every assistant turn, whether the next step is an ad.
//! Two policies exist:
//!
//! - **Fixed**: an ad every `threshold` turns.
//! - **Adaptive**: the threshold starts at a seed and grows along the
//!   Fibonacci sequence after every ad, so ads get rarer the longer a user
//!   stays.
//!
//! All decisions are pure functions of [`ConversationState`].

use ads4gpts_core::AdError;
use std::env;
use tracing::debug;

use crate::error::FrequencyError;
use crate::state::{ConversationState, DEFAULT_AD_FREQUENCY};

/// Environment variable holding the fixed threshold.
pub const AD_FREQUENCY_ENV: &str = "AD_FREQUENCY";

/// What happens after an assistant turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Finish the turn.
    Continue,
    /// Insert an ad.
    InsertAd,
}

/// `InsertAd` iff `ad_counter >= threshold`.
#[must_use]
pub fn route(ad_counter: u64, threshold: u64) -> Route {
    if ad_counter < threshold {
        Route::Continue
    } else {
        Route::InsertAd
    }
}

/// Smallest Fibonacci number strictly greater than `n`.
///
/// ```rust
/// use ads4gpts_graph::next_fibonacci;
///
/// assert_eq!(next_fibonacci(0), Ok(1));
/// assert_eq!(next_fibonacci(1), Ok(2));
/// assert_eq!(next_fibonacci(5), Ok(8));
/// assert!(next_fibonacci(-1).is_err());
/// ```
///
/// # Errors
///
/// Returns [`FrequencyError::Negative`] for negative input.
pub fn next_fibonacci(n: i64) -> Result<u64, FrequencyError> {
    let target = u64::try_from(n).map_err(|_| FrequencyError::Negative(n))?;
    let (mut a, mut b) = (0u64, 1u64);
    while b <= target {
        let next = a.checked_add(b).ok_or(FrequencyError::Overflow(target))?;
        a = b;
        b = next;
    }
    Ok(b)
}

/// How the ad threshold evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyPolicy {
    /// Constant threshold.
    Fixed {
        /// Turns between ads.
        threshold: u64,
    },
    /// Fibonacci-growing threshold kept in `ConversationState::ad_frequency`.
    Adaptive {
        /// Initial threshold.
        seed: u64,
    },
}

impl Default for FrequencyPolicy {
    fn default() -> Self {
        Self::Fixed {
            threshold: DEFAULT_AD_FREQUENCY,
        }
    }
}

impl FrequencyPolicy {
    /// Fixed policy.
    #[must_use]
    pub fn fixed(threshold: u64) -> Self {
        Self::Fixed { threshold }
    }

    /// Adaptive policy.
    #[must_use]
    pub fn adaptive(seed: u64) -> Self {
        Self::Adaptive { seed }
    }

    /// Fixed policy with the threshold from `AD_FREQUENCY` (default 1).
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Config`] if the variable is set but not a
    /// non-negative integer.
    pub fn from_env() -> Result<Self, AdError> {
        Self::from_env_value(env::var(AD_FREQUENCY_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Result<Self, AdError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(Self::default()),
            Some(raw) => raw.parse::<u64>().map(Self::fixed).map_err(|e| {
                AdError::config(format!("{AD_FREQUENCY_ENV} must be a non-negative integer: {e}"))
            }),
        }
    }

    /// A fresh state seeded for this policy.
    #[must_use]
    pub fn initial_state(&self) -> ConversationState {
        match self {
            Self::Fixed { .. } => ConversationState::new(),
            Self::Adaptive { seed } => ConversationState::new().with_ad_frequency(*seed),
        }
    }

    /// Current threshold.
    #[must_use]
    pub fn threshold(&self, state: &ConversationState) -> u64 {
        match self {
            Self::Fixed { threshold } => *threshold,
            Self::Adaptive { seed } => state
                .ad_frequency
                .filter(|frequency| *frequency > 0)
                .unwrap_or(*seed),
        }
    }

    /// Route after an assistant turn.
    #[must_use]
    pub fn decide(&self, state: &ConversationState) -> Route {
        route(state.ad_counter, self.threshold(state))
    }

    /// Count one assistant turn.
    pub fn after_turn(&self, state: &mut ConversationState) {
        state.ad_counter = state.ad_counter.saturating_add(1);
    }

    /// Reset after an ad; the adaptive policy also advances its threshold.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::Overflow`] if the threshold cannot grow.
    /// The state is left untouched in that case.
    pub fn after_ad(&self, state: &mut ConversationState) -> Result<(), FrequencyError> {
        if let Self::Adaptive { .. } = self {
            let current = self.threshold(state);
            let signed = i64::try_from(current).map_err(|_| FrequencyError::Overflow(current))?;
            let next = next_fibonacci(signed)?;
            debug!(from = current, to = next, "Advancing ad frequency");
            state.ad_frequency = Some(next);
        }
        state.ad_counter = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 2)]
    #[case(2, 3)]
    #[case(3, 5)]
    #[case(5, 8)]
    #[case(8, 13)]
    #[case(144, 233)]
    fn test_next_fibonacci(#[case] n: i64, #[case] expected: u64) {
        assert_eq!(next_fibonacci(n), Ok(expected));
    }

    #[test]
    fn test_next_fibonacci_is_smallest_greater() {
        let fibs: Vec<u64> = {
            let (mut a, mut b) = (0u64, 1u64);
            let mut v = Vec::new();
            while a < 1_000_000 {
                v.push(a);
                let n = a + b;
                a = b;
                b = n;
            }
            v
        };
        for &f in &fibs {
            let next = next_fibonacci(f as i64).unwrap();
            assert!(next > f);
            assert!(fibs.iter().all(|&g| g <= f || g >= next));
        }
    }

    #[test]
    fn test_next_fibonacci_negative() {
        assert_eq!(next_fibonacci(-1), Err(FrequencyError::Negative(-1)));
    }

    #[test]
    fn test_next_fibonacci_large_input() {
        assert!(next_fibonacci(i64::MAX).unwrap() > i64::MAX as u64);
    }

    #[rstest]
    #[case(0, 1, Route::Continue)]
    #[case(1, 1, Route::InsertAd)]
    #[case(4, 5, Route::Continue)]
    #[case(5, 5, Route::InsertAd)]
    #[case(9, 5, Route::InsertAd)]
    #[case(0, 0, Route::InsertAd)]
    fn test_route(#[case] counter: u64, #[case] threshold: u64, #[case] expected: Route) {
        assert_eq!(route(counter, threshold), expected);
    }

    #[test]
    fn test_fixed_policy_only_resets_counter() {
        let policy = FrequencyPolicy::fixed(3);
        let mut state = policy.initial_state();
        for _ in 0..3 {
            policy.after_turn(&mut state);
        }
        assert_eq!(policy.decide(&state), Route::InsertAd);

        policy.after_ad(&mut state).unwrap();
        assert_eq!(state.ad_counter, 0);
        assert_eq!(state.ad_frequency, None);
        assert_eq!(policy.threshold(&state), 3);
    }

    #[test]
    fn test_adaptive_policy_grows_threshold() {
        let policy = FrequencyPolicy::adaptive(1);
        let mut state = policy.initial_state();
        let mut thresholds = Vec::new();
        for _ in 0..5 {
            thresholds.push(policy.threshold(&state));
            policy.after_turn(&mut state);
            policy.after_ad(&mut state).unwrap();
            assert_eq!(state.ad_counter, 0);
        }
        assert_eq!(thresholds, vec![1, 2, 3, 5, 8]);
    }

    #[test]
    fn test_adaptive_seed_applies_to_default_state() {
        let policy = FrequencyPolicy::adaptive(3);
        let mut state = ConversationState::new();
        assert_eq!(policy.threshold(&state), 3);

        policy.after_turn(&mut state);
        assert_eq!(policy.decide(&state), Route::Continue);
        policy.after_turn(&mut state);
        policy.after_turn(&mut state);
        assert_eq!(policy.decide(&state), Route::InsertAd);

        policy.after_ad(&mut state).unwrap();
        assert_eq!(state.ad_frequency, Some(5));
    }

    #[test]
    fn test_adaptive_seed_fills_zero_frequency() {
        let policy = FrequencyPolicy::adaptive(3);
        let state = ConversationState::new().with_ad_frequency(0);
        assert_eq!(policy.threshold(&state), 3);
    }

    #[test]
    fn test_adaptive_overflow_leaves_state() {
        let policy = FrequencyPolicy::adaptive(1);
        let mut state = ConversationState::new().with_ad_frequency(u64::MAX);
        state.ad_counter = 7;
        assert!(policy.after_ad(&mut state).is_err());
        assert_eq!(state.ad_counter, 7);
        assert_eq!(state.ad_frequency, Some(u64::MAX));
    }

    #[test]
    fn test_counter_saturates() {
        let policy = FrequencyPolicy::default();
        let mut state = ConversationState::default();
        state.ad_counter = u64::MAX;
        policy.after_turn(&mut state);
        assert_eq!(state.ad_counter, u64::MAX);
    }

    #[rstest]
    #[case(None, FrequencyPolicy::fixed(1))]
    #[case(Some(""), FrequencyPolicy::fixed(1))]
    #[case(Some("4"), FrequencyPolicy::fixed(4))]
    #[case(Some(" 2 "), FrequencyPolicy::fixed(2))]
    fn test_from_env_value(#[case] raw: Option<&str>, #[case] expected: FrequencyPolicy) {
        assert_eq!(FrequencyPolicy::from_env_value(raw).unwrap(), expected);
    }

    #[test]
    fn test_from_env_value_invalid() {
        let err = FrequencyPolicy::from_env_value(Some("often")).unwrap_err();
        assert!(err.to_string().contains(AD_FREQUENCY_ENV));
    }
}

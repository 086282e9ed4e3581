//! Soft-fork deployment table
//!
//! Each deployment is signalled through one bit of the block version during a
//! bounded time window. Tallying signalling blocks is done by the caller; this
//! module holds the per-network constants and the state machine that turns a
//! window tally into the next activation state:
//!
//! ```text
//! DEFINED -> STARTED -> LOCKED_IN -> ACTIVE
//!    |          |
//!    +----------+-----> FAILED
//! ```
//!
//! Transitions happen only at confirmation-window boundaries.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Number of defined deployments
pub const MAX_VERSION_BITS_DEPLOYMENTS: usize = 2;

/// What block version to use for new blocks (pre versionbits)
pub const VERSIONBITS_TOP_BITS: i32 = 0x2000_0000;

/// What bitmask determines whether versionbits is in use
pub const VERSIONBITS_TOP_MASK: i32 = 0xE000_0000u32 as i32;

/// Total bits available for versionbits
pub const VERSIONBITS_NUM_BITS: u8 = 29;

/// Closed set of rule-change identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentPos {
    TestDummy,
    /// BIP68, BIP112 and BIP113
    Csv,
}

impl DeploymentPos {
    pub const ALL: [DeploymentPos; MAX_VERSION_BITS_DEPLOYMENTS] =
        [DeploymentPos::TestDummy, DeploymentPos::Csv];

    pub const fn index(self) -> usize {
        match self {
            DeploymentPos::TestDummy => 0,
            DeploymentPos::Csv => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DeploymentPos::TestDummy => "testdummy",
            DeploymentPos::Csv => "csv",
        }
    }
}

impl std::fmt::Display for DeploymentPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Activation state of one deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdState {
    Defined,
    Started,
    LockedIn,
    Active,
    Failed,
}

impl ThresholdState {
    /// `Active` and `Failed` never change again
    pub fn is_terminal(self) -> bool {
        matches!(self, ThresholdState::Active | ThresholdState::Failed)
    }
}

/// Tally of one completed confirmation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSummary {
    /// Median time past of the last block in the window
    pub median_time_past: i64,
    /// Blocks in the window whose version signals the deployment bit
    pub signaling_blocks: u32,
}

/// Activation descriptor for one deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bip9Deployment {
    /// Bit position in the block version
    pub bit: u8,
    /// Start MedianTime for version bits miner confirmation
    pub start_time: i64,
    /// Timeout/expiry MedianTime for the deployment attempt
    pub timeout: i64,
}

impl Bip9Deployment {
    pub const fn new(bit: u8, start_time: i64, timeout: i64) -> Self {
        Self {
            bit,
            start_time,
            timeout,
        }
    }

    /// Sentinel descriptor that is active from the first block
    pub const fn always_active(bit: u8) -> Self {
        Self::new(bit, 0, 0)
    }

    pub fn is_always_active(&self) -> bool {
        self.start_time == 0 && self.timeout == 0
    }

    /// Version bit mask for this deployment; `None` when the bit is outside
    /// the version-bits range
    pub fn mask(&self) -> Option<i32> {
        (self.bit < VERSIONBITS_NUM_BITS).then(|| 1i32 << self.bit)
    }

    /// Whether a block version signals readiness for this deployment
    pub fn signals(&self, version: i32) -> bool {
        match self.mask() {
            Some(mask) => {
                (version & VERSIONBITS_TOP_MASK) == VERSIONBITS_TOP_BITS && (version & mask) != 0
            }
            None => false,
        }
    }

    /// Whether two descriptors could be signalling at the same time
    pub fn overlaps(&self, other: &Bip9Deployment) -> bool {
        let (a_start, a_end) = self.window();
        let (b_start, b_end) = other.window();
        a_start < b_end && b_start < a_end
    }

    fn window(&self) -> (i64, i64) {
        if self.is_always_active() {
            (0, i64::MAX)
        } else {
            (self.start_time, self.timeout)
        }
    }

    /// State for the window following `window`, given the state it ended in.
    ///
    /// Timeout is checked before the tally, so a window that reaches the
    /// threshold after the deadline still fails.
    pub fn next_state(
        &self,
        prev: ThresholdState,
        window: &WindowSummary,
        threshold: u32,
    ) -> ThresholdState {
        if self.is_always_active() {
            return ThresholdState::Active;
        }

        let mtp = window.median_time_past;
        match prev {
            ThresholdState::Defined => {
                if mtp >= self.timeout {
                    ThresholdState::Failed
                } else if mtp >= self.start_time {
                    ThresholdState::Started
                } else {
                    ThresholdState::Defined
                }
            }
            ThresholdState::Started => {
                if mtp >= self.timeout {
                    ThresholdState::Failed
                } else if window.signaling_blocks >= threshold {
                    ThresholdState::LockedIn
                } else {
                    ThresholdState::Started
                }
            }
            ThresholdState::LockedIn => ThresholdState::Active,
            ThresholdState::Active | ThresholdState::Failed => prev,
        }
    }

    /// Fold a chain's completed windows, oldest first, starting from `Defined`.
    pub fn state_after<I>(&self, windows: I, threshold: u32) -> ThresholdState
    where
        I: IntoIterator<Item = WindowSummary>,
    {
        if self.is_always_active() {
            return ThresholdState::Active;
        }

        let mut state = ThresholdState::Defined;
        for window in windows {
            state = self.next_state(state, &window, threshold);
            if state.is_terminal() {
                break;
            }
        }
        state
    }
}

/// Deployment table validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeploymentError {
    #[error("Deployment {deployment} uses bit {bit}, outside 0..{}", VERSIONBITS_NUM_BITS)]
    BitOutOfRange { deployment: DeploymentPos, bit: u8 },
    #[error("Deployment {deployment} starts at {start_time} but times out at {timeout}")]
    EmptyWindow {
        deployment: DeploymentPos,
        start_time: i64,
        timeout: i64,
    },
    #[error("Deployments {first} and {second} both signal on bit {bit} at the same time")]
    BitCollision {
        first: DeploymentPos,
        second: DeploymentPos,
        bit: u8,
    },
    #[error("Activation threshold {threshold} is not within a window of {window} blocks")]
    InvalidThreshold { threshold: u32, window: u32 },
}

/// Fixed table indexed by [`DeploymentPos`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentTable {
    deployments: [Bip9Deployment; MAX_VERSION_BITS_DEPLOYMENTS],
}

impl DeploymentTable {
    /// Entries in [`DeploymentPos::ALL`] order
    pub const fn new(deployments: [Bip9Deployment; MAX_VERSION_BITS_DEPLOYMENTS]) -> Self {
        Self { deployments }
    }

    pub fn get(&self, pos: DeploymentPos) -> &Bip9Deployment {
        &self.deployments[pos.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeploymentPos, &Bip9Deployment)> {
        DeploymentPos::ALL.into_iter().zip(self.deployments.iter())
    }

    /// Check bit ranges, time windows, bit reuse and the lock-in threshold
    pub fn validate(&self, threshold: u32, window: u32) -> Result<(), DeploymentError> {
        if window == 0 || threshold == 0 || threshold > window {
            return Err(DeploymentError::InvalidThreshold { threshold, window });
        }

        for (pos, deployment) in self.iter() {
            if deployment.bit >= VERSIONBITS_NUM_BITS {
                return Err(DeploymentError::BitOutOfRange {
                    deployment: pos,
                    bit: deployment.bit,
                });
            }
            if !deployment.is_always_active() && deployment.start_time >= deployment.timeout {
                return Err(DeploymentError::EmptyWindow {
                    deployment: pos,
                    start_time: deployment.start_time,
                    timeout: deployment.timeout,
                });
            }
        }

        for (i, (first, a)) in self.iter().enumerate() {
            for (second, b) in self.iter().skip(i + 1) {
                if a.bit == b.bit && a.overlaps(b) {
                    return Err(DeploymentError::BitCollision {
                        first,
                        second,
                        bit: a.bit,
                    });
                }
            }
        }

        Ok(())
    }

    /// Block version a miner should use given each deployment's current state
    pub fn compute_block_version<F>(&self, state_of: F) -> i32
    where
        F: Fn(DeploymentPos) -> ThresholdState,
    {
        self.iter()
            .filter(|(pos, _)| {
                matches!(
                    state_of(*pos),
                    ThresholdState::Started | ThresholdState::LockedIn
                )
            })
            .filter_map(|(_, d)| d.mask())
            .fold(VERSIONBITS_TOP_BITS, |version, mask| version | mask)
    }
}

impl Serialize for DeploymentTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(pos, d)| (pos.name(), d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u32 = 1916;
    const WINDOW: u32 = 2016;

    fn csv() -> Bip9Deployment {
        Bip9Deployment::new(0, 1_502_280_000, 1_533_816_000)
    }

    fn window(median_time_past: i64, signaling_blocks: u32) -> WindowSummary {
        WindowSummary {
            median_time_past,
            signaling_blocks,
        }
    }

    #[test]
    fn test_defined_until_start_time() {
        let d = csv();
        let state = d.next_state(ThresholdState::Defined, &window(1_502_279_999, WINDOW), THRESHOLD);
        assert_eq!(state, ThresholdState::Defined);

        let state = d.next_state(ThresholdState::Defined, &window(1_502_280_000, 0), THRESHOLD);
        assert_eq!(state, ThresholdState::Started);
    }

    #[test]
    fn test_full_activation_path() {
        let d = csv();
        let windows = [
            window(1_502_000_000, 0),
            window(1_502_300_000, 0),
            window(1_502_400_000, THRESHOLD),
            window(1_502_500_000, 0),
        ];

        assert_eq!(d.state_after(windows[..1].iter().copied(), THRESHOLD), ThresholdState::Defined);
        assert_eq!(d.state_after(windows[..2].iter().copied(), THRESHOLD), ThresholdState::Started);
        assert_eq!(d.state_after(windows[..3].iter().copied(), THRESHOLD), ThresholdState::LockedIn);
        assert_eq!(d.state_after(windows, THRESHOLD), ThresholdState::Active);
    }

    #[test]
    fn test_below_threshold_stays_started() {
        let d = csv();
        let state = d.next_state(
            ThresholdState::Started,
            &window(1_510_000_000, THRESHOLD - 1),
            THRESHOLD,
        );
        assert_eq!(state, ThresholdState::Started);
    }

    #[test]
    fn test_timeout_beats_late_signalling() {
        let d = csv();
        let state = d.next_state(ThresholdState::Started, &window(1_533_816_000, WINDOW), THRESHOLD);
        assert_eq!(state, ThresholdState::Failed);
    }

    #[test]
    fn test_defined_past_timeout_fails() {
        // The 2008 test deployment is already expired on a 2017 chain
        let dummy = Bip9Deployment::new(28, 1_199_145_601, 1_230_767_999);
        let state = dummy.state_after([window(1_510_444_800, 0)], THRESHOLD);
        assert_eq!(state, ThresholdState::Failed);
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let d = csv();
        for terminal in [ThresholdState::Active, ThresholdState::Failed] {
            assert!(terminal.is_terminal());
            let next = d.next_state(terminal, &window(1_502_400_000, WINDOW), THRESHOLD);
            assert_eq!(next, terminal);
        }
    }

    #[test]
    fn test_locked_in_activates_unconditionally() {
        let d = csv();
        let next = d.next_state(ThresholdState::LockedIn, &window(1_600_000_000, 0), THRESHOLD);
        assert_eq!(next, ThresholdState::Active);
    }

    #[test]
    fn test_always_active_sentinel() {
        let d = Bip9Deployment::always_active(5);
        assert!(d.is_always_active());
        assert_eq!(d.state_after(std::iter::empty(), THRESHOLD), ThresholdState::Active);
        assert_eq!(
            d.next_state(ThresholdState::Defined, &window(0, 0), THRESHOLD),
            ThresholdState::Active
        );
    }

    #[test]
    fn test_signalling_requires_top_bits() {
        let d = csv();
        assert!(d.signals(VERSIONBITS_TOP_BITS | 1));
        assert!(!d.signals(VERSIONBITS_TOP_BITS));
        assert!(!d.signals(1));
        assert!(!d.signals(4));
    }

    #[test]
    fn test_out_of_range_bit_never_signals() {
        for bit in [29, 31, 32, 200] {
            let d = Bip9Deployment::new(bit, 1, 2);
            assert_eq!(d.mask(), None);
            assert!(!d.signals(VERSIONBITS_TOP_BITS | 1));
            assert!(!d.signals(-1));
        }
        assert_eq!(Bip9Deployment::new(28, 1, 2).mask(), Some(1 << 28));
    }

    #[test]
    fn test_out_of_range_bit_left_out_of_block_version() {
        let table = DeploymentTable::new([Bip9Deployment::new(32, 1, 2), csv()]);
        let version = table.compute_block_version(|_| ThresholdState::Started);
        assert_eq!(version, VERSIONBITS_TOP_BITS | 1);
    }

    #[test]
    fn test_validate_accepts_distinct_bits() {
        let table = DeploymentTable::new([Bip9Deployment::new(28, 1, 2), csv()]);
        assert_eq!(table.validate(THRESHOLD, WINDOW), Ok(()));
    }

    #[test]
    fn test_validate_rejects_reused_bit_in_overlapping_windows() {
        let table = DeploymentTable::new([Bip9Deployment::new(0, 1_510_000_000, 1_600_000_000), csv()]);
        assert!(matches!(
            table.validate(THRESHOLD, WINDOW),
            Err(DeploymentError::BitCollision { bit: 0, .. })
        ));
    }

    #[test]
    fn test_validate_allows_reused_bit_in_disjoint_windows() {
        let table = DeploymentTable::new([Bip9Deployment::new(0, 1_000, 2_000), csv()]);
        assert_eq!(table.validate(THRESHOLD, WINDOW), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_window_and_bad_bit() {
        let table = DeploymentTable::new([Bip9Deployment::new(28, 5, 5), csv()]);
        assert!(matches!(
            table.validate(THRESHOLD, WINDOW),
            Err(DeploymentError::EmptyWindow { deployment: DeploymentPos::TestDummy, .. })
        ));

        let table = DeploymentTable::new([Bip9Deployment::new(29, 1, 2), csv()]);
        assert!(matches!(
            table.validate(THRESHOLD, WINDOW),
            Err(DeploymentError::BitOutOfRange { bit: 29, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_threshold_above_window() {
        let table = DeploymentTable::new([Bip9Deployment::new(28, 1, 2), csv()]);
        assert_eq!(
            table.validate(WINDOW + 1, WINDOW),
            Err(DeploymentError::InvalidThreshold { threshold: WINDOW + 1, window: WINDOW })
        );
    }

    #[test]
    fn test_compute_block_version() {
        let table = DeploymentTable::new([Bip9Deployment::new(28, 1, 2), csv()]);
        let version = table.compute_block_version(|pos| match pos {
            DeploymentPos::Csv => ThresholdState::Started,
            DeploymentPos::TestDummy => ThresholdState::Failed,
        });
        assert_eq!(version, VERSIONBITS_TOP_BITS | 1);

        let none = table.compute_block_version(|_| ThresholdState::Active);
        assert_eq!(none, VERSIONBITS_TOP_BITS);
    }

    #[test]
    fn test_serializes_by_name() {
        let table = DeploymentTable::new([Bip9Deployment::new(28, 1, 2), csv()]);
        let json = serde_json::to_value(table).unwrap();
        assert_eq!(json["csv"]["bit"], 0);
        assert_eq!(json["testdummy"]["timeout"], 2);
    }
}

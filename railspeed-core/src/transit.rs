//! Transit state machine
//!
//! The six states and their guards, as a pure function. The speedometer
//! feeds it the current detections and the time since its last timestamp
//! mark, then carries out the returned [`Action`]. Nothing here touches
//! hardware or a clock, so every path can be tested directly.
//!
//! ```text
//! Clear ──A only──► SenseA ──B──► Updated ──speed read──► Active
//!   │                 │                                   ▲   │
//!   ├──B only──► SenseB ──A──► Updated                    │   │ both quiet
//!   │                 │                                   │   ▼
//!   │                 └──timeout──────────────────────────┘ Clearing
//!   │                                          A or B ◄───────┤
//!   └──A and B──► Clearing                      quiet long enough ──► Clear
//! ```

use crate::config::SpeedometerConfig;

/// State of the transit timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitState {
    /// Idle, watching for a first detection on either channel
    #[default]
    Clear,
    /// Detected on A, timing until B detects
    SenseA,
    /// Detected on B, timing until A detects
    SenseB,
    /// Speed computed, waiting for a reader to take it
    Updated,
    /// Waiting for both channels to stop detecting
    Active,
    /// Both channels quiet, waiting out the clear timeout
    Clearing,
}

impl TransitState {
    /// One channel has fired and the other hasn't yet
    pub fn is_partial(self) -> bool {
        matches!(self, TransitState::SenseA | TransitState::SenseB)
    }
}

/// Detection booleans for one measurement cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Detections {
    /// Channel A sees an object in its window
    pub a: bool,
    /// Channel B sees an object in its window
    pub b: bool,
}

impl Detections {
    /// Detections from the two channel flags
    pub fn new(a: bool, b: bool) -> Self {
        Self { a, b }
    }

    /// Either channel detecting
    pub fn any(self) -> bool {
        self.a || self.b
    }

    /// Both channels detecting
    pub fn both(self) -> bool {
        self.a && self.b
    }
}

/// Side effect the speedometer must carry out for a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Nothing beyond the state change
    None,
    /// Mark now as the start of a timing interval
    StartInterval,
    /// Compute the speed for `elapsed_ms`, flag it for readers, mark now
    Measure {
        /// Transit time between the two detections
        elapsed_ms: u64,
    },
    /// Drop the open interval and zero the speed
    Abandon,
    /// Mark now as the start of the clear timeout
    StartSettle,
}

/// Result of one step of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State after this cycle
    pub next: TransitState,
    /// What the caller must do
    pub action: Action,
}

impl Transition {
    fn to(next: TransitState, action: Action) -> Self {
        Self { next, action }
    }

    fn stay(state: TransitState) -> Self {
        Self::to(state, Action::None)
    }
}

/// Compute the next state
///
/// - `elapsed_ms`: time since the last mark (interval start or settle start)
/// - `update_pending`: the last measured speed has not been read yet
///
/// A double detection in `Clear` starts the clear timeout at that cycle
/// (`StartSettle`) instead of measuring it from whatever mark was left over
/// from the previous train.
pub fn transition(
    state: TransitState,
    det: Detections,
    elapsed_ms: u64,
    update_pending: bool,
    config: &SpeedometerConfig,
) -> Transition {
    use TransitState::*;

    match state {
        Clear => match (det.a, det.b) {
            // Can't tell which came first
            (true, true) => Transition::to(Clearing, Action::StartSettle),
            (true, false) => Transition::to(SenseA, Action::StartInterval),
            (false, true) => Transition::to(SenseB, Action::StartInterval),
            (false, false) => Transition::stay(Clear),
        },

        SenseA => second_edge(state, det.b, elapsed_ms, config),
        SenseB => second_edge(state, det.a, elapsed_ms, config),

        Updated if !update_pending => Transition::to(Active, Action::None),
        Updated => Transition::stay(Updated),

        Active if !det.any() => Transition::to(Clearing, Action::StartSettle),
        Active => Transition::stay(Active),

        Clearing if det.any() => Transition::to(Active, Action::None),
        Clearing if elapsed_ms > config.clear_timeout_ms => Transition::to(Clear, Action::None),
        Clearing => Transition::stay(Clearing),
    }
}

fn second_edge(
    state: TransitState,
    other_detected: bool,
    elapsed_ms: u64,
    config: &SpeedometerConfig,
) -> Transition {
    if other_detected {
        if elapsed_ms == 0 {
            // Same instant on both sides is as ambiguous as a double detect
            Transition::to(TransitState::Active, Action::Abandon)
        } else {
            Transition::to(TransitState::Updated, Action::Measure { elapsed_ms })
        }
    } else if elapsed_ms > config.second_sensor_timeout_ms {
        Transition::to(TransitState::Active, Action::Abandon)
    } else {
        Transition::stay(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TransitState::*;

    const NONE: Detections = Detections { a: false, b: false };
    const A: Detections = Detections { a: true, b: false };
    const B: Detections = Detections { a: false, b: true };
    const BOTH: Detections = Detections { a: true, b: true };

    fn step(state: TransitState, det: Detections, elapsed_ms: u64, pending: bool) -> Transition {
        transition(state, det, elapsed_ms, pending, &SpeedometerConfig::default())
    }

    #[test]
    fn clear_waits_for_single_detection() {
        assert_eq!(step(Clear, NONE, 0, false), Transition::stay(Clear));
        assert_eq!(step(Clear, A, 0, false), Transition::to(SenseA, Action::StartInterval));
        assert_eq!(step(Clear, B, 0, false), Transition::to(SenseB, Action::StartInterval));
    }

    #[test]
    fn clear_rejects_double_detection() {
        assert_eq!(step(Clear, BOTH, 0, false), Transition::to(Clearing, Action::StartSettle));
    }

    #[test]
    fn second_edge_measures() {
        assert_eq!(
            step(SenseA, BOTH, 200, false),
            Transition::to(Updated, Action::Measure { elapsed_ms: 200 })
        );
        assert_eq!(
            step(SenseB, A, 350, false),
            Transition::to(Updated, Action::Measure { elapsed_ms: 350 })
        );
        // Own channel still detecting doesn't count
        assert_eq!(step(SenseA, A, 200, false), Transition::stay(SenseA));
        assert_eq!(step(SenseB, B, 200, false), Transition::stay(SenseB));
    }

    #[test]
    fn second_edge_times_out() {
        let limit = SpeedometerConfig::default().second_sensor_timeout_ms;
        assert_eq!(step(SenseA, A, limit, false), Transition::stay(SenseA));
        assert_eq!(step(SenseA, A, limit + 1, false), Transition::to(Active, Action::Abandon));
        assert_eq!(step(SenseB, NONE, limit + 1, false), Transition::to(Active, Action::Abandon));
    }

    #[test]
    fn zero_elapsed_abandoned() {
        assert_eq!(step(SenseA, BOTH, 0, false), Transition::to(Active, Action::Abandon));
    }

    #[test]
    fn updated_waits_for_reader() {
        assert_eq!(step(Updated, NONE, 10, true), Transition::stay(Updated));
        assert_eq!(step(Updated, BOTH, 10, false), Transition::to(Active, Action::None));
    }

    #[test]
    fn active_waits_for_both_clear() {
        assert_eq!(step(Active, A, 0, false), Transition::stay(Active));
        assert_eq!(step(Active, B, 0, false), Transition::stay(Active));
        assert_eq!(step(Active, NONE, 0, false), Transition::to(Clearing, Action::StartSettle));
    }

    #[test]
    fn clearing_debounces() {
        let limit = SpeedometerConfig::default().clear_timeout_ms;
        assert_eq!(step(Clearing, B, limit + 100, false), Transition::to(Active, Action::None));
        assert_eq!(step(Clearing, NONE, limit, false), Transition::stay(Clearing));
        assert_eq!(step(Clearing, NONE, limit + 1, false), Transition::to(Clear, Action::None));
    }

    #[test]
    fn only_sense_states_are_partial() {
        for state in [Clear, Updated, Active, Clearing] {
            assert!(!state.is_partial());
        }
        assert!(SenseA.is_partial());
        assert!(SenseB.is_partial());
    }
}

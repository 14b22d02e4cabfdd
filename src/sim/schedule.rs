//! Pursuer modes and the global scatter/chase schedule

use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;
use crate::seconds_to_ticks;

/// Behaviour mode of one pursuer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Scatter,
    Chase,
    Frightened,
    Eaten,
}

/// One entry of the schedule; `ticks == None` runs forever
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePhase {
    pub mode: Mode,
    pub ticks: Option<u32>,
}

/// Scatter/chase timetable shared by every pursuer.
///
/// The final phase never ends, whatever duration it was given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeSchedule {
    phases: Vec<ModePhase>,
    index: usize,
    elapsed: u32,
}

impl ModeSchedule {
    pub fn new(phases: Vec<ModePhase>) -> Self {
        let phases = if phases.is_empty() {
            vec![ModePhase {
                mode: Mode::Chase,
                ticks: None,
            }]
        } else {
            phases
        };
        Self {
            phases,
            index: 0,
            elapsed: 0,
        }
    }

    /// Build from a level's phase list (durations in seconds)
    pub fn for_level(level: &LevelConfig) -> Self {
        Self::new(
            level
                .mode_phases
                .iter()
                .map(|p| ModePhase {
                    mode: p.mode,
                    ticks: p.seconds.map(seconds_to_ticks),
                })
                .collect(),
        )
    }

    #[inline]
    pub fn current_mode(&self) -> Mode {
        self.phases[self.index].mode
    }

    #[inline]
    pub fn phase_index(&self) -> usize {
        self.index
    }

    /// Ticks spent in the current phase
    #[inline]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    fn on_last_phase(&self) -> bool {
        self.index + 1 >= self.phases.len()
    }

    /// Advance one tick. Returns the new mode when the active mode changed.
    pub fn advance(&mut self) -> Option<Mode> {
        let before = self.current_mode();
        self.elapsed = self.elapsed.saturating_add(1);

        while !self.on_last_phase() {
            match self.phases[self.index].ticks {
                Some(ticks) if self.elapsed >= ticks => {
                    self.index += 1;
                    self.elapsed = 0;
                }
                _ => break,
            }
        }

        let after = self.current_mode();
        (after != before).then_some(after)
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.elapsed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(mode: Mode, ticks: Option<u32>) -> ModePhase {
        ModePhase { mode, ticks }
    }

    #[test]
    fn test_cycles_and_final_phase_is_unbounded() {
        let mut schedule = ModeSchedule::new(vec![
            phase(Mode::Scatter, Some(3)),
            phase(Mode::Chase, Some(2)),
            phase(Mode::Scatter, Some(1)),
        ]);
        assert_eq!(schedule.current_mode(), Mode::Scatter);

        assert_eq!(schedule.advance(), None);
        assert_eq!(schedule.advance(), None);
        assert_eq!(schedule.advance(), Some(Mode::Chase));
        assert_eq!(schedule.advance(), None);
        assert_eq!(schedule.advance(), Some(Mode::Scatter));
        assert_eq!(schedule.phase_index(), 2);

        // Last phase ignores its own duration
        for _ in 0..1000 {
            assert_eq!(schedule.advance(), None);
        }
        assert_eq!(schedule.current_mode(), Mode::Scatter);
    }

    #[test]
    fn test_zero_length_phase_is_skipped() {
        let mut schedule = ModeSchedule::new(vec![
            phase(Mode::Scatter, Some(1)),
            phase(Mode::Chase, Some(0)),
            phase(Mode::Scatter, None),
        ]);
        // Chase lasts no time at all, so the mode never visibly changes
        assert_eq!(schedule.advance(), None);
        assert_eq!(schedule.phase_index(), 2);
    }

    #[test]
    fn test_empty_schedule_chases_forever() {
        let mut schedule = ModeSchedule::new(Vec::new());
        assert_eq!(schedule.current_mode(), Mode::Chase);
        assert_eq!(schedule.advance(), None);
    }

    #[test]
    fn test_reset() {
        let mut schedule = ModeSchedule::new(vec![
            phase(Mode::Scatter, Some(1)),
            phase(Mode::Chase, None),
        ]);
        schedule.advance();
        assert_eq!(schedule.current_mode(), Mode::Chase);
        schedule.reset();
        assert_eq!(schedule.current_mode(), Mode::Scatter);
        assert_eq!(schedule.elapsed(), 0);
    }

    #[test]
    fn test_for_level_converts_seconds() {
        let level = LevelConfig::default();
        let schedule = ModeSchedule::for_level(&level);
        assert_eq!(schedule.current_mode(), Mode::Scatter);
        assert_eq!(schedule.phases[0].ticks, Some(420));
        assert_eq!(schedule.phases.last().unwrap().ticks, None);
    }
}

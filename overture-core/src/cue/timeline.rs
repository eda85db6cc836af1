use super::{CueAction, CueSheet};
use crate::time::Ticks;

/// A cue placed at its absolute time.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedCue {
    pub at: Ticks,
    /// Index of the cut the cue came from.
    pub cut: usize,
    pub action: CueAction,
}

/// The cues of a sheet flattened into one list, ordered by time.
///
/// Cues with the same time keep the order they have in the sheet.
#[derive(Debug, Clone)]
pub struct Timeline {
    cues: Vec<TimedCue>,
}

impl Timeline {
    pub fn new(sheet: &CueSheet) -> Self {
        let mut cues = sheet
            .cuts
            .iter()
            .enumerate()
            .flat_map(|(index, cut)| {
                cut.cues.iter().map(move |cue| TimedCue {
                    at: Ticks::from_seconds_clamped(cut.start + cue.at),
                    cut: index,
                    action: cue.action.clone(),
                })
            })
            .collect::<Vec<_>>();
        // stable, so ties keep the sheet order
        cues.sort_by_key(|cue| cue.at);

        Self { cues }
    }

    pub fn cues(&self) -> &[TimedCue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Time of the last cue.
    pub fn end(&self) -> Ticks {
        self.cues.last().map_or(Ticks::ZERO, |cue| cue.at)
    }

    /// Number of cues due at or before `time`.
    pub fn due_count(&self, time: Ticks) -> usize {
        self.cues.partition_point(|cue| cue.at <= time)
    }
}

//! Rule-based mood lookup over the (tempo, energy) plane

use crate::models::Mood;

/// One cell of the partition: `tempo ∈ [tempo_lo, tempo_hi)` and
/// `energy ∈ [energy_lo, energy_hi)`, or `[energy_lo, energy_hi]` when
/// `energy_inclusive`
struct MoodCell {
    tempo_lo: f64,
    tempo_hi: f64,
    energy_lo: f64,
    energy_hi: f64,
    energy_inclusive: bool,
    mood: Mood,
}

const fn cell(
    tempo: (f64, f64),
    energy: (f64, f64),
    energy_inclusive: bool,
    mood: Mood,
) -> MoodCell {
    MoodCell {
        tempo_lo: tempo.0,
        tempo_hi: tempo.1,
        energy_lo: energy.0,
        energy_hi: energy.1,
        energy_inclusive,
        mood,
    }
}

const MOOD_TABLE: [MoodCell; 8] = [
    cell((0.0, 80.0), (0.0, 0.3), false, Mood::Calm),
    cell((0.0, 80.0), (0.3, 0.6), false, Mood::Melancholic),
    cell((0.0, 80.0), (0.6, 1.0), true, Mood::Sad),
    cell((80.0, 120.0), (0.0, 0.4), false, Mood::Peaceful),
    cell((80.0, 120.0), (0.4, 0.7), false, Mood::Happy),
    cell((80.0, 120.0), (0.7, 1.0), true, Mood::Uplifting),
    cell((120.0, 200.0), (0.0, 0.5), false, Mood::Energetic),
    cell((120.0, 200.0), (0.5, 1.0), true, Mood::Aggressive),
];

/// Mood for anything outside the table (including NaN)
pub const DEFAULT_MOOD: Mood = Mood::Energetic;

impl MoodCell {
    fn contains(&self, tempo: f64, energy: f64) -> bool {
        let tempo_ok = tempo >= self.tempo_lo && tempo < self.tempo_hi;
        let energy_ok = energy >= self.energy_lo
            && if self.energy_inclusive {
                energy <= self.energy_hi
            } else {
                energy < self.energy_hi
            };
        tempo_ok && energy_ok
    }
}

/// Classify a (tempo, energy) pair; total and deterministic
pub fn classify_mood(tempo: f64, energy: f64) -> Mood {
    MOOD_TABLE
        .iter()
        .find(|cell| cell.contains(tempo, energy))
        .map(|cell| cell.mood)
        .unwrap_or(DEFAULT_MOOD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_cells() {
        assert_eq!(classify_mood(70.0, 0.1), Mood::Calm);
        assert_eq!(classify_mood(70.0, 0.45), Mood::Melancholic);
        assert_eq!(classify_mood(70.0, 0.8), Mood::Sad);
        assert_eq!(classify_mood(100.0, 0.2), Mood::Peaceful);
        assert_eq!(classify_mood(100.0, 0.5), Mood::Happy);
        assert_eq!(classify_mood(100.0, 0.9), Mood::Uplifting);
        assert_eq!(classify_mood(150.0, 0.2), Mood::Energetic);
        assert_eq!(classify_mood(150.0, 0.9), Mood::Aggressive);
    }

    #[test]
    fn test_energy_boundaries_half_open() {
        assert_eq!(classify_mood(60.0, 0.3), Mood::Melancholic);
        assert_eq!(classify_mood(60.0, 0.6), Mood::Sad);
        assert_eq!(classify_mood(100.0, 0.4), Mood::Happy);
        assert_eq!(classify_mood(100.0, 0.7), Mood::Uplifting);
        assert_eq!(classify_mood(150.0, 0.5), Mood::Aggressive);
    }

    #[test]
    fn test_tempo_boundaries_half_open() {
        assert_eq!(classify_mood(80.0, 0.3), Mood::Melancholic);
        assert_eq!(classify_mood(80.0, 0.1), Mood::Peaceful);
        assert_eq!(classify_mood(120.0, 0.1), Mood::Energetic);
        assert_eq!(classify_mood(120.0, 0.6), Mood::Aggressive);
        assert_eq!(classify_mood(79.999, 0.1), Mood::Calm);
    }

    #[test]
    fn test_upper_energy_inclusive() {
        assert_eq!(classify_mood(70.0, 1.0), Mood::Sad);
        assert_eq!(classify_mood(100.0, 1.0), Mood::Uplifting);
        assert_eq!(classify_mood(180.0, 1.0), Mood::Aggressive);
    }

    #[test]
    fn test_outside_table_is_energetic() {
        assert_eq!(classify_mood(200.0, 0.5), Mood::Energetic);
        assert_eq!(classify_mood(-1.0, 0.5), Mood::Energetic);
        assert_eq!(classify_mood(100.0, 1.5), Mood::Energetic);
        assert_eq!(classify_mood(100.0, -0.1), Mood::Energetic);
        assert_eq!(classify_mood(f64::NAN, 0.5), Mood::Energetic);
    }

    #[test]
    fn test_deterministic() {
        for tempo in [60.0, 80.0, 119.9, 120.0, 180.0] {
            for energy in [0.0, 0.3, 0.4, 0.5, 0.6, 0.7, 1.0] {
                assert_eq!(classify_mood(tempo, energy), classify_mood(tempo, energy));
            }
        }
    }
}

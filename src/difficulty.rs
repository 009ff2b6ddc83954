use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Baby,
    Easy,
    #[default]
    Normal,
    Medium,
    Hard,
    Extreme,
    Insane,
    Stupid,
    Legend,
}

pub struct DifficultySpec {
    pub name: &'static str,
    pub tick_interval_ms: u32,
    pub label: &'static str,
}

// Same order as `Difficulty::ALL`.
const TABLE: [DifficultySpec; 9] = [
    DifficultySpec { name: "baby", tick_interval_ms: 150, label: "Baby" },
    DifficultySpec { name: "easy", tick_interval_ms: 120, label: "Easy" },
    DifficultySpec { name: "normal", tick_interval_ms: 100, label: "Normal" },
    DifficultySpec { name: "medium", tick_interval_ms: 75, label: "Medium" },
    DifficultySpec { name: "hard", tick_interval_ms: 50, label: "Hard" },
    DifficultySpec { name: "extreme", tick_interval_ms: 25, label: "Extreme" },
    DifficultySpec { name: "insane", tick_interval_ms: 20, label: "Insane" },
    DifficultySpec { name: "stupid", tick_interval_ms: 10, label: "Bro what is tis" },
    DifficultySpec { name: "legend", tick_interval_ms: 5, label: "I'M LEGENDARY BOI" },
];

impl Difficulty {
    pub const ALL: [Difficulty; 9] = [
        Difficulty::Baby,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
        Difficulty::Insane,
        Difficulty::Stupid,
        Difficulty::Legend,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static DifficultySpec {
        &TABLE[self.index()]
    }

    /// Stable key used for persisted scores.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn ms_per_update(self) -> f64 {
        self.spec().tick_interval_ms as f64
    }

    /// Next faster difficulty, saturating at the last one.
    pub fn harder(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    pub fn easier(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

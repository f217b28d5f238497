use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of affliction. An animal carries at most one disease per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiseaseKind {
    /// Fast, lethal, spreads by contact. Never cured.
    Rabies,
    /// Skin parasite; slow health drain, cured after a while.
    Mange,
    /// Gut worms that steal food.
    Parasites,
    /// Respiratory illness of flying species.
    AvianFlu,
}

impl DiseaseKind {
    pub const ALL: [DiseaseKind; 4] = [
        DiseaseKind::Rabies,
        DiseaseKind::Mange,
        DiseaseKind::Parasites,
        DiseaseKind::AvianFlu,
    ];
}

impl fmt::Display for DiseaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiseaseKind::Rabies => "rabies",
            DiseaseKind::Mange => "mange",
            DiseaseKind::Parasites => "parasites",
            DiseaseKind::AvianFlu => "avian flu",
        };
        f.write_str(name)
    }
}

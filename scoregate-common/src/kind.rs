//! Assessment kinds and their scoring profiles
//!
//! One profile per kind drives both validation and normalization; the three
//! ingest pipelines differ only by the data in these tables, never by code.

use serde::{Deserialize, Serialize};

/// The three assessment kinds accepted for ingest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    /// Generic domain-scored assessment, 0..500 overall score
    TechHealth,
    /// 21-question survey, answers 1..5, max total 105
    AiReadiness,
    /// 28-question survey, answers 1..5, max total 140
    DigitalReadiness,
}

/// One maturity band: inclusive lower bound on the total score
#[derive(Debug, Clone, Copy)]
pub struct TierBand {
    /// Lowest score (inclusive) that lands in this band
    pub floor: i64,
    /// Numeric level, 1 (lowest) .. 5 (highest)
    pub level: i64,
    /// Maturity label shown to clients
    pub label: &'static str,
}

/// Static scoring profile for one assessment kind
#[derive(Debug, Clone, Copy)]
pub struct KindProfile {
    /// Field names that must be present on every submission of this kind
    pub required_fields: &'static [&'static str],
    /// Exact `answers` length for survey kinds, None for domain-scored kinds
    pub answer_count: Option<usize>,
    /// Name of the total-score field
    pub score_field: &'static str,
    /// Declared maximum of the total-score field
    pub max_score: i64,
    /// Maturity bands, highest floor first
    pub bands: &'static [TierBand],
}

// 500-point scale: 401 Leading / 301 Advanced / 201 Developing / 101 Initial
const TECH_HEALTH_BANDS: &[TierBand] = &[
    TierBand { floor: 401, level: 5, label: "Leading" },
    TierBand { floor: 301, level: 4, label: "Advanced" },
    TierBand { floor: 201, level: 3, label: "Developing" },
    TierBand { floor: 101, level: 2, label: "Initial" },
    TierBand { floor: 0, level: 1, label: "Not Started" },
];

// 105-point scale (21 questions x 1..5)
const AI_READINESS_BANDS: &[TierBand] = &[
    TierBand { floor: 85, level: 5, label: "Leading" },
    TierBand { floor: 64, level: 4, label: "Advanced" },
    TierBand { floor: 43, level: 3, label: "Developing" },
    TierBand { floor: 22, level: 2, label: "Initial" },
    TierBand { floor: 0, level: 1, label: "Not Started" },
];

// 140-point scale (28 questions x 1..5), same per-question proportions
const DIGITAL_READINESS_BANDS: &[TierBand] = &[
    TierBand { floor: 113, level: 5, label: "Leading" },
    TierBand { floor: 85, level: 4, label: "Advanced" },
    TierBand { floor: 57, level: 3, label: "Developing" },
    TierBand { floor: 29, level: 2, label: "Initial" },
    TierBand { floor: 0, level: 1, label: "Not Started" },
];

const TECH_HEALTH_PROFILE: KindProfile = KindProfile {
    required_fields: &[
        "session_id",
        "assessment_type",
        "customer",
        "industry",
        "participant_name",
        "participant_role",
        "org",
        "domains",
        "overall_score_500",
        "notes",
    ],
    answer_count: None,
    score_field: "overall_score_500",
    max_score: 500,
    bands: TECH_HEALTH_BANDS,
};

const AI_READINESS_PROFILE: KindProfile = KindProfile {
    required_fields: &[
        "session_id",
        "customer",
        "industry",
        "participant_name",
        "participant_role",
        "org",
        "answers",
        "total_105",
        "percent",
        "notes",
    ],
    answer_count: Some(21),
    score_field: "total_105",
    max_score: 105,
    bands: AI_READINESS_BANDS,
};

const DIGITAL_READINESS_PROFILE: KindProfile = KindProfile {
    required_fields: &[
        "session_id",
        "customer",
        "industry",
        "participant_name",
        "participant_role",
        "org",
        "answers",
        "total_140",
        "percent",
        "notes",
    ],
    answer_count: Some(28),
    score_field: "total_140",
    max_score: 140,
    bands: DIGITAL_READINESS_BANDS,
};

impl AssessmentKind {
    /// Scoring profile for this kind
    pub fn profile(&self) -> &'static KindProfile {
        match self {
            AssessmentKind::TechHealth => &TECH_HEALTH_PROFILE,
            AssessmentKind::AiReadiness => &AI_READINESS_PROFILE,
            AssessmentKind::DigitalReadiness => &DIGITAL_READINESS_PROFILE,
        }
    }

    /// Stable short name used in logs and config keys
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentKind::TechHealth => "tech_health",
            AssessmentKind::AiReadiness => "ai_readiness",
            AssessmentKind::DigitalReadiness => "digital_readiness",
        }
    }

    /// Look up the maturity band for a total score on this kind's scale
    pub fn band_for_score(&self, score: i64) -> &'static TierBand {
        let bands = self.profile().bands;
        bands
            .iter()
            .find(|band| score >= band.floor)
            .unwrap_or_else(|| bands.last().expect("profile has at least one band"))
    }

    /// Maturity label for a total score (convenience over [`band_for_score`])
    ///
    /// [`band_for_score`]: AssessmentKind::band_for_score
    pub fn label_for_score(&self, score: i64) -> &'static str {
        self.band_for_score(score).label
    }
}

impl std::fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

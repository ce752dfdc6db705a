//! Exam-domain reference data.
//!
//! Static, mode-independent tables describing the supported C1 German exam
//! variants: scoring scales, word-count bounds and time limits.

use crate::UnknownExamTypeError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Supported exam variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    Testdaf,
    GoetheC1,
    TelcC1Hochschule,
    Dsh,
}

impl ExamType {
    pub const ALL: [ExamType; 4] = [
        ExamType::Testdaf,
        ExamType::GoetheC1,
        ExamType::TelcC1Hochschule,
        ExamType::Dsh,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ExamType::Testdaf => "testdaf",
            ExamType::GoetheC1 => "goethe_c1",
            ExamType::TelcC1Hochschule => "telc_c1_hochschule",
            ExamType::Dsh => "dsh",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact match only; no case folding or fuzzy matching.
impl FromStr for ExamType {
    type Err = UnknownExamTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|exam| exam.as_str() == s)
            .ok_or_else(|| UnknownExamTypeError(s.to_string()))
    }
}

/// One value per exam variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExamTable<T> {
    pub testdaf: T,
    pub goethe_c1: T,
    pub telc_c1_hochschule: T,
    pub dsh: T,
}

impl<T> ExamTable<T> {
    pub fn get(&self, exam: ExamType) -> &T {
        match exam {
            ExamType::Testdaf => &self.testdaf,
            ExamType::GoetheC1 => &self.goethe_c1,
            ExamType::TelcC1Hochschule => &self.telc_c1_hochschule,
            ExamType::Dsh => &self.dsh,
        }
    }

    /// Entries in `ExamType::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (ExamType, &T)> {
        ExamType::ALL.into_iter().map(move |exam| (exam, self.get(exam)))
    }
}

/// Scale a variant is graded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoringScale {
    #[serde(rename = "TDN")]
    Tdn,
    #[serde(rename = "points")]
    Points,
    #[serde(rename = "A-D")]
    LetterBands,
    #[serde(rename = "percentage")]
    Percentage,
}

impl ScoringScale {
    pub const fn as_str(self) -> &'static str {
        match self {
            ScoringScale::Tdn => "TDN",
            ScoringScale::Points => "points",
            ScoringScale::LetterBands => "A-D",
            ScoringScale::Percentage => "percentage",
        }
    }
}

/// What a candidate needs to pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PassingRule {
    /// Minimum level on the scale
    Level(&'static str),
    /// Minimum score, in points or percent depending on the scale
    Score(u32),
    /// Minimum share of total points
    Fraction(f64),
}

/// Scoring configuration for one exam variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub scale: ScoringScale,
    pub levels: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points: Option<u32>,
    pub passing: PassingRule,
    /// Number of assessment criteria
    pub criteria: u8,
    /// Per-criterion weights, summing to 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<&'static [f64]>,
}

impl ScoringConfig {
    /// Passing level, for level-based scales.
    pub fn passing_level(&self) -> Option<&'static str> {
        match self.passing {
            PassingRule::Level(level) => Some(level),
            _ => None,
        }
    }
}

/// Word-count bounds for a writing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordRange {
    pub min: u32,
    pub max: u32,
    pub target: u32,
}

impl WordRange {
    pub fn contains(&self, words: u32) -> bool {
        (self.min..=self.max).contains(&words)
    }

    /// `min <= target <= max`.
    pub fn is_consistent(&self) -> bool {
        self.min <= self.target && self.target <= self.max
    }
}

/// Word-count requirement of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WordCount {
    Single(WordRange),
    Split { task1: WordRange, task2: WordRange },
}

impl WordCount {
    /// Every range with its task label.
    pub fn ranges(&self) -> Vec<(&'static str, WordRange)> {
        match *self {
            WordCount::Single(range) => vec![("essay", range)],
            WordCount::Split { task1, task2 } => vec![("task1", task1), ("task2", task2)],
        }
    }
}

/// Product quality targets for the evaluation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationTargets {
    /// Required grading consistency
    pub consistency: f64,
    /// Upper bound on evaluation time
    pub processing_time_ms: u64,
    /// Targeted user pass rate
    pub pass_rate: f64,
    /// Targeted satisfaction out of 5
    pub satisfaction: f64,
}

/// All exam-domain reference data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDomainConfig {
    pub supported_exams: [ExamType; 4],
    pub targets: EvaluationTargets,
    pub scoring: ExamTable<ScoringConfig>,
    pub word_count: ExamTable<WordCount>,
    /// Minutes per variant
    pub time_limit: ExamTable<u32>,
}

impl ExamDomainConfig {
    pub fn scoring(&self, exam: ExamType) -> &ScoringConfig {
        self.scoring.get(exam)
    }

    pub fn word_count(&self, exam: ExamType) -> &WordCount {
        self.word_count.get(exam)
    }

    pub fn time_limit(&self, exam: ExamType) -> Duration {
        Duration::from_secs(u64::from(*self.time_limit.get(exam)) * 60)
    }
}

pub static EXAM_CONFIG: ExamDomainConfig = ExamDomainConfig {
    supported_exams: ExamType::ALL,
    targets: EvaluationTargets {
        consistency: 0.95,
        processing_time_ms: 30_000,
        pass_rate: 0.85,
        satisfaction: 4.5,
    },
    scoring: ExamTable {
        testdaf: ScoringConfig {
            scale: ScoringScale::Tdn,
            levels: &["TDN_3", "TDN_4", "TDN_5"],
            max_points: None,
            passing: PassingRule::Level("TDN_4"),
            criteria: 3,
            weights: None,
        },
        goethe_c1: ScoringConfig {
            scale: ScoringScale::Points,
            levels: &[],
            max_points: Some(100),
            passing: PassingRule::Score(60),
            criteria: 4,
            weights: None,
        },
        telc_c1_hochschule: ScoringConfig {
            scale: ScoringScale::LetterBands,
            levels: &[
                "A1", "A2", "A3", "A4", "B1", "B2", "B3", "B4", "C1", "C2", "C3", "C4", "D1",
                "D2", "D3", "D4",
            ],
            max_points: None,
            passing: PassingRule::Fraction(0.6),
            criteria: 4,
            weights: None,
        },
        dsh: ScoringConfig {
            scale: ScoringScale::Percentage,
            levels: &["DSH-1", "DSH-2", "DSH-3"],
            max_points: None,
            // DSH-2
            passing: PassingRule::Score(67),
            criteria: 3,
            // Content, structure, language
            weights: Some(&[0.40, 0.30, 0.30]),
        },
    },
    word_count: ExamTable {
        testdaf: WordCount::Single(WordRange {
            min: 200,
            max: 350,
            target: 250,
        }),
        goethe_c1: WordCount::Split {
            task1: WordRange {
                min: 300,
                max: 400,
                target: 350,
            },
            task2: WordRange {
                min: 150,
                max: 250,
                target: 200,
            },
        },
        telc_c1_hochschule: WordCount::Single(WordRange {
            min: 200,
            max: 300,
            target: 250,
        }),
        dsh: WordCount::Single(WordRange {
            min: 200,
            max: 300,
            target: 250,
        }),
    },
    time_limit: ExamTable {
        testdaf: 60,
        goethe_c1: 80,
        telc_c1_hochschule: 70,
        dsh: 70,
    },
};

/// Scoring configuration for an exam variant given by name.
pub fn get_exam_scoring_config(
    exam_type: &str,
) -> Result<&'static ScoringConfig, UnknownExamTypeError> {
    let exam: ExamType = exam_type.parse()?;
    Ok(EXAM_CONFIG.scoring(exam))
}

/// Word-count requirement for an exam variant given by name.
pub fn get_word_count(exam_type: &str) -> Result<&'static WordCount, UnknownExamTypeError> {
    let exam: ExamType = exam_type.parse()?;
    Ok(EXAM_CONFIG.word_count(exam))
}

/// Time limit for an exam variant given by name.
pub fn get_time_limit(exam_type: &str) -> Result<Duration, UnknownExamTypeError> {
    let exam: ExamType = exam_type.parse()?;
    Ok(EXAM_CONFIG.time_limit(exam))
}

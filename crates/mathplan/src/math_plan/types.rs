//! Core value types for math plan computation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Matches course ids as they appear in student records: `M 117`, `MATH 117`, `MATH117`.
static COURSE_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:MATH|M)\s*(\d{3})\s*$").unwrap());

/// A mathematics course the planner knows about.
///
/// Declaration order is catalog order (MATH 120 sits after MATH 124 because it covers the
/// 117/118/124 sequence), and every "lowest course" tie-break uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "M_101")]
    M101,
    #[serde(rename = "M_117")]
    M117,
    #[serde(rename = "M_118")]
    M118,
    #[serde(rename = "M_124")]
    M124,
    #[serde(rename = "M_120")]
    M120,
    #[serde(rename = "M_125")]
    M125,
    #[serde(rename = "M_126")]
    M126,
    #[serde(rename = "M_127")]
    M127,
    #[serde(rename = "M_141")]
    M141,
    #[serde(rename = "M_155")]
    M155,
    #[serde(rename = "M_156")]
    M156,
    #[serde(rename = "M_157")]
    M157,
    #[serde(rename = "M_159")]
    M159,
    #[serde(rename = "M_160")]
    M160,
    #[serde(rename = "M_161")]
    M161,
    #[serde(rename = "M_229")]
    M229,
    #[serde(rename = "M_269")]
    M269,
}

impl Course {
    pub const ALL: [Course; 17] = [
        Course::M101,
        Course::M117,
        Course::M118,
        Course::M124,
        Course::M120,
        Course::M125,
        Course::M126,
        Course::M127,
        Course::M141,
        Course::M155,
        Course::M156,
        Course::M157,
        Course::M159,
        Course::M160,
        Course::M161,
        Course::M229,
        Course::M269,
    ];

    /// Courses whose status is tracked on a trajectory.
    pub const TRACKED: [Course; 6] = [
        Course::M101,
        Course::M117,
        Course::M118,
        Course::M124,
        Course::M125,
        Course::M126,
    ];

    /// The catalog number (117 for MATH 117).
    pub fn number(self) -> u16 {
        match self {
            Course::M101 => 101,
            Course::M117 => 117,
            Course::M118 => 118,
            Course::M124 => 124,
            Course::M120 => 120,
            Course::M125 => 125,
            Course::M126 => 126,
            Course::M127 => 127,
            Course::M141 => 141,
            Course::M155 => 155,
            Course::M156 => 156,
            Course::M157 => 157,
            Course::M159 => 159,
            Course::M160 => 160,
            Course::M161 => 161,
            Course::M229 => 229,
            Course::M269 => 269,
        }
    }

    /// Display label, e.g. `MATH 117`.
    pub fn label(self) -> &'static str {
        match self {
            Course::M101 => "MATH 101",
            Course::M117 => "MATH 117",
            Course::M118 => "MATH 118",
            Course::M124 => "MATH 124",
            Course::M120 => "MATH 120",
            Course::M125 => "MATH 125",
            Course::M126 => "MATH 126",
            Course::M127 => "MATH 127",
            Course::M141 => "MATH 141",
            Course::M155 => "MATH 155",
            Course::M156 => "MATH 156",
            Course::M157 => "MATH 157",
            Course::M159 => "MATH 159",
            Course::M160 => "MATH 160",
            Course::M161 => "MATH 161",
            Course::M229 => "MATH 229",
            Course::M269 => "MATH 269",
        }
    }

    /// Credit weight used when a course is removed from a pick list.
    pub fn credits(self) -> u32 {
        match self {
            Course::M117 | Course::M118 | Course::M124 | Course::M125 | Course::M126 => 1,
            Course::M229 | Course::M269 => 2,
            Course::M101 | Course::M120 | Course::M141 => 3,
            Course::M127
            | Course::M155
            | Course::M156
            | Course::M157
            | Course::M159
            | Course::M160
            | Course::M161 => 4,
        }
    }

    /// Precalculus prerequisites, immediate prerequisite first.
    ///
    /// MATH 126 builds on 125 only; it does not require 124.
    pub fn prerequisites(self) -> &'static [Course] {
        match self {
            Course::M118 => &[Course::M117],
            Course::M124 | Course::M125 => &[Course::M118, Course::M117],
            Course::M126 => &[Course::M125, Course::M118, Course::M117],
            Course::M101
            | Course::M117
            | Course::M120
            | Course::M127
            | Course::M141
            | Course::M155
            | Course::M156
            | Course::M157
            | Course::M159
            | Course::M160
            | Course::M161
            | Course::M229
            | Course::M269 => &[],
        }
    }

    pub fn is_tracked(self) -> bool {
        Self::TRACKED.contains(&self)
    }

    pub fn from_number(number: u16) -> Option<Course> {
        Self::ALL.into_iter().find(|c| c.number() == number)
    }

    /// Parses a course id from a student record (`M 117`, `MATH 117`, `MATH117`).
    ///
    /// Returns `None` for anything that is not one of the known courses.
    pub fn from_course_id(course_id: &str) -> Option<Course> {
        let caps = COURSE_ID_REGEX.captures(course_id)?;
        let number = caps.get(1)?.as_str().parse::<u16>().ok()?;
        Self::from_number(number)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Minimum grade a completion must carry to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimumGrade {
    /// Any completion counts.
    Passing,
    /// B- or higher. Records without a grade count.
    BMinus,
}

impl MinimumGrade {
    pub fn is_met_by(self, grade: Option<&str>) -> bool {
        match self {
            MinimumGrade::Passing => true,
            MinimumGrade::BMinus => match grade {
                None => true,
                Some(g) => {
                    let g = g.trim();
                    g.starts_with('A') || g.starts_with('B') || g.starts_with("TA") || g.starts_with("TB")
                }
            },
        }
    }
}

impl fmt::Display for MinimumGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinimumGrade::Passing => f.write_str("a passing grade"),
            MinimumGrade::BMinus => f.write_str("B- or higher"),
        }
    }
}

/// Courses that must be completed (or placed out of) with a minimum grade.
pub type GradeGates = BTreeMap<Course, MinimumGrade>;

/// How far up the calculus ladder a requirement reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculusTier {
    /// MATH 141 family.
    Low,
    /// MATH 155 family.
    Mid,
    /// MATH 156/160 family.
    Top,
}

impl CalculusTier {
    /// Precalculus courses a requirement in this tier implies.
    pub fn implied_courses(self) -> &'static [Course] {
        match self {
            CalculusTier::Low => &[Course::M117, Course::M118],
            CalculusTier::Mid => &[Course::M117, Course::M118, Course::M124, Course::M125],
            CalculusTier::Top => &[
                Course::M117,
                Course::M118,
                Course::M124,
                Course::M125,
                Course::M126,
            ],
        }
    }

    pub fn grade_gates(self) -> GradeGates {
        match self {
            CalculusTier::Low | CalculusTier::Mid => GradeGates::new(),
            CalculusTier::Top => GradeGates::from([
                (Course::M124, MinimumGrade::BMinus),
                (Course::M126, MinimumGrade::BMinus),
            ]),
        }
    }
}

/// A named calculus requirement, possibly a choice between courses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculusRequirement {
    #[default]
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "M_141")]
    M141,
    #[serde(rename = "M_141_OR_155")]
    M141Or155,
    #[serde(rename = "M_141_OR_155_OR_160")]
    M141Or155Or160,
    #[serde(rename = "M_155")]
    M155,
    #[serde(rename = "M_155_OR_160")]
    M155Or160,
    #[serde(rename = "M_156")]
    M156,
    #[serde(rename = "M_156_OR_160")]
    M156Or160,
    #[serde(rename = "M_160")]
    M160,
}

impl CalculusRequirement {
    /// Resolution priority; higher wins. Choices rank below the pure course they name.
    pub fn rank(self) -> u8 {
        match self {
            CalculusRequirement::None => 0,
            CalculusRequirement::M141Or155Or160 => 1,
            CalculusRequirement::M141Or155 => 2,
            CalculusRequirement::M141 => 3,
            CalculusRequirement::M155Or160 => 4,
            CalculusRequirement::M155 => 5,
            CalculusRequirement::M156Or160 => 6,
            CalculusRequirement::M156 => 7,
            CalculusRequirement::M160 => 8,
        }
    }

    /// Picks the single requirement that wins across all candidates.
    pub fn resolve<I>(candidates: I) -> CalculusRequirement
    where
        I: IntoIterator<Item = CalculusRequirement>,
    {
        candidates
            .into_iter()
            .max_by_key(|c| c.rank())
            .unwrap_or_default()
    }

    pub fn is_none(self) -> bool {
        self == CalculusRequirement::None
    }

    pub fn tier(self) -> Option<CalculusTier> {
        match self {
            CalculusRequirement::None => None,
            CalculusRequirement::M141
            | CalculusRequirement::M141Or155
            | CalculusRequirement::M141Or155Or160 => Some(CalculusTier::Low),
            CalculusRequirement::M155 | CalculusRequirement::M155Or160 => Some(CalculusTier::Mid),
            CalculusRequirement::M156 | CalculusRequirement::M156Or160 | CalculusRequirement::M160 => {
                Some(CalculusTier::Top)
            }
        }
    }

    /// The courses that satisfy this requirement.
    pub fn options(self) -> &'static [Course] {
        match self {
            CalculusRequirement::None => &[],
            CalculusRequirement::M141 => &[Course::M141],
            CalculusRequirement::M141Or155 => &[Course::M141, Course::M155],
            CalculusRequirement::M141Or155Or160 => &[Course::M141, Course::M155, Course::M160],
            CalculusRequirement::M155 => &[Course::M155],
            CalculusRequirement::M155Or160 => &[Course::M155, Course::M160],
            CalculusRequirement::M156 => &[Course::M156],
            CalculusRequirement::M156Or160 => &[Course::M156, Course::M160],
            CalculusRequirement::M160 => &[Course::M160],
        }
    }

    /// Precalculus courses implied by this requirement.
    pub fn implied_courses(self) -> &'static [Course] {
        self.tier().map(CalculusTier::implied_courses).unwrap_or(&[])
    }

    pub fn grade_gates(self) -> GradeGates {
        self.tier().map(CalculusTier::grade_gates).unwrap_or_default()
    }

    pub fn label(self) -> String {
        if self.is_none() {
            return "none".to_string();
        }
        let labels: Vec<&str> = self.options().iter().map(|c| c.label()).collect();
        join_labels(&labels, "or")
    }
}

/// A "pick K credits" requirement attached to a major, plus the conditions under which the
/// pick is already covered by something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickRule {
    /// Precalculus courses that count toward the pick.
    pub allowed: &'static [Course],
    /// Completing any of these means the pick no longer applies.
    pub subsumed_by_completion: &'static [Course],
    /// A resolved calculus requirement in this set covers the pick.
    pub subsumed_by_calculus: &'static [CalculusRequirement],
    /// Any calculus requirement at all covers the pick.
    pub subsumed_by_any_calculus: bool,
}

impl PickRule {
    pub fn is_subsumed(
        &self,
        calculus: CalculusRequirement,
        has_completed: impl Fn(Course) -> bool,
    ) -> bool {
        (self.subsumed_by_any_calculus && !calculus.is_none())
            || self.subsumed_by_calculus.contains(&calculus)
            || self.subsumed_by_completion.iter().any(|&c| has_completed(c))
    }
}

const PICK_117_118_124_120: &[Course] = &[Course::M117, Course::M118, Course::M124, Course::M120];
const PICK_117_118_125: &[Course] = &[Course::M117, Course::M118, Course::M125];
const PICK_SIX: &[Course] = &[
    Course::M117,
    Course::M118,
    Course::M124,
    Course::M120,
    Course::M125,
    Course::M126,
];
const PICK_118_124_125_126: &[Course] = &[Course::M118, Course::M124, Course::M125, Course::M126];
const CALC_141_FAMILY: &[CalculusRequirement] = &[
    CalculusRequirement::M141,
    CalculusRequirement::M141Or155,
    CalculusRequirement::M141Or155Or160,
];

/// The math requirement a major lists in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MajorRequirement {
    #[serde(rename = "CORE_ONLY")]
    CoreOnly,
    #[serde(rename = "M_117_101")]
    M117M101,
    #[serde(rename = "M_117_118_124")]
    M117M118M124,
    #[serde(rename = "M_117_118_125")]
    M117M118M125,
    #[serde(rename = "M_117_118_124_125")]
    M117M118M124M125,
    #[serde(rename = "M_117_118_124_141")]
    M117M118M124M141,
    #[serde(rename = "M_118_124_125")]
    M118M124M125,
    #[serde(rename = "M_118_124_125_141")]
    M118M124M125M141,
    #[serde(rename = "M_124_125_126_155")]
    M124M125M126M155,
    #[serde(rename = "M_126")]
    M126,
    #[serde(rename = "M_117_118_124_125_141_OR_155")]
    M117M118M124M125M141Or155,
    #[serde(rename = "M_141")]
    M141,
    #[serde(rename = "M_141_OR_155_OR_160")]
    M141Or155Or160,
    #[serde(rename = "M_155")]
    M155,
    #[serde(rename = "M_155_OR_160")]
    M155Or160,
    #[serde(rename = "M_156")]
    M156,
    #[serde(rename = "M_156_OR_160")]
    M156Or160,
    #[serde(rename = "M_160")]
    M160,
    #[serde(rename = "PICK_3CR_117_118_124_120")]
    Pick117_118_124_120,
    #[serde(rename = "PICK_3CR_117_118_124_120_155")]
    Pick117_118_124_120_155,
    #[serde(rename = "PICK_3CR_117_118_125_141")]
    Pick117_118_125_141,
    #[serde(rename = "PICK_3CR_117_118_124_120_125_126")]
    Pick117_118_124_120_125_126,
    #[serde(rename = "PICK_3CR_117_118_124_120_125_126_141")]
    Pick117_118_124_120_125_126_141,
    #[serde(rename = "PICK_3CR_117_118_124_120_125_126_141_155")]
    Pick117_118_124_120_125_126_141_155,
    #[serde(rename = "PICK_3CR_117_118_124_120_125_126_141_155_156_160")]
    Pick117_118_124_120_125_126_141_155_156_160,
    #[serde(rename = "PICK_3CR_118_124_125_126_155_160")]
    Pick118_124_125_126_155_160,
}

impl MajorRequirement {
    pub fn is_core_only(self) -> bool {
        self == MajorRequirement::CoreOnly
    }

    /// Precalculus courses the major names outright.
    pub fn named_precalculus(self) -> &'static [Course] {
        use Course::*;

        match self {
            MajorRequirement::M117M101 => &[M101, M117],
            MajorRequirement::M117M118M124 | MajorRequirement::M117M118M124M141 => &[M117, M118, M124],
            MajorRequirement::M117M118M125 => &[M117, M118, M125],
            MajorRequirement::M117M118M124M125 | MajorRequirement::M117M118M124M125M141Or155 => {
                &[M117, M118, M124, M125]
            }
            MajorRequirement::M118M124M125 | MajorRequirement::M118M124M125M141 => &[M118, M124, M125],
            MajorRequirement::M124M125M126M155 => &[M124, M125, M126],
            MajorRequirement::M126 => &[M126],
            MajorRequirement::CoreOnly
            | MajorRequirement::M141
            | MajorRequirement::M141Or155Or160
            | MajorRequirement::M155
            | MajorRequirement::M155Or160
            | MajorRequirement::M156
            | MajorRequirement::M156Or160
            | MajorRequirement::M160
            | MajorRequirement::Pick117_118_124_120
            | MajorRequirement::Pick117_118_124_120_155
            | MajorRequirement::Pick117_118_125_141
            | MajorRequirement::Pick117_118_124_120_125_126
            | MajorRequirement::Pick117_118_124_120_125_126_141
            | MajorRequirement::Pick117_118_124_120_125_126_141_155
            | MajorRequirement::Pick117_118_124_120_125_126_141_155_156_160
            | MajorRequirement::Pick118_124_125_126_155_160 => &[],
        }
    }

    /// The calculus requirement the major names, if any.
    pub fn named_calculus(self) -> CalculusRequirement {
        match self {
            MajorRequirement::M117M118M124M141
            | MajorRequirement::M118M124M125M141
            | MajorRequirement::M141 => CalculusRequirement::M141,
            MajorRequirement::M117M118M124M125M141Or155 => CalculusRequirement::M141Or155,
            MajorRequirement::M141Or155Or160 => CalculusRequirement::M141Or155Or160,
            MajorRequirement::M124M125M126M155 | MajorRequirement::M155 => CalculusRequirement::M155,
            MajorRequirement::M155Or160 => CalculusRequirement::M155Or160,
            MajorRequirement::M156 => CalculusRequirement::M156,
            MajorRequirement::M156Or160 => CalculusRequirement::M156Or160,
            MajorRequirement::M160 => CalculusRequirement::M160,
            MajorRequirement::CoreOnly
            | MajorRequirement::M117M101
            | MajorRequirement::M117M118M124
            | MajorRequirement::M117M118M125
            | MajorRequirement::M117M118M124M125
            | MajorRequirement::M118M124M125
            | MajorRequirement::M126
            | MajorRequirement::Pick117_118_124_120
            | MajorRequirement::Pick117_118_124_120_155
            | MajorRequirement::Pick117_118_125_141
            | MajorRequirement::Pick117_118_124_120_125_126
            | MajorRequirement::Pick117_118_124_120_125_126_141
            | MajorRequirement::Pick117_118_124_120_125_126_141_155
            | MajorRequirement::Pick117_118_124_120_125_126_141_155_156_160
            | MajorRequirement::Pick118_124_125_126_155_160 => CalculusRequirement::None,
        }
    }

    /// The pick-list rule for "pick 3 credits" majors.
    ///
    /// Calculus courses in a pick code are alternatives that take the pick off the table; only
    /// the precalculus courses are ever offered.
    pub fn pick_rule(self) -> Option<PickRule> {
        let rule = match self {
            MajorRequirement::Pick117_118_124_120 => PickRule {
                allowed: PICK_117_118_124_120,
                subsumed_by_completion: &[],
                subsumed_by_calculus: &[],
                subsumed_by_any_calculus: false,
            },
            MajorRequirement::Pick117_118_124_120_155 => PickRule {
                allowed: PICK_117_118_124_120,
                subsumed_by_completion: &[Course::M155],
                subsumed_by_calculus: &[CalculusRequirement::M155, CalculusRequirement::M155Or160],
                subsumed_by_any_calculus: false,
            },
            MajorRequirement::Pick117_118_125_141 => PickRule {
                allowed: PICK_117_118_125,
                subsumed_by_completion: &[Course::M141],
                subsumed_by_calculus: CALC_141_FAMILY,
                subsumed_by_any_calculus: false,
            },
            MajorRequirement::Pick117_118_124_120_125_126 => PickRule {
                allowed: PICK_SIX,
                subsumed_by_completion: &[],
                subsumed_by_calculus: &[],
                subsumed_by_any_calculus: false,
            },
            MajorRequirement::Pick117_118_124_120_125_126_141 => PickRule {
                allowed: PICK_SIX,
                subsumed_by_completion: &[Course::M141],
                subsumed_by_calculus: CALC_141_FAMILY,
                subsumed_by_any_calculus: false,
            },
            MajorRequirement::Pick117_118_124_120_125_126_141_155 => PickRule {
                allowed: PICK_SIX,
                subsumed_by_completion: &[Course::M141, Course::M155],
                subsumed_by_calculus: &[
                    CalculusRequirement::M141,
                    CalculusRequirement::M155,
                    CalculusRequirement::M141Or155,
                    CalculusRequirement::M155Or160,
                    CalculusRequirement::M141Or155Or160,
                ],
                subsumed_by_any_calculus: false,
            },
            MajorRequirement::Pick117_118_124_120_125_126_141_155_156_160 => PickRule {
                allowed: PICK_SIX,
                subsumed_by_completion: &[Course::M141, Course::M155, Course::M156, Course::M160],
                subsumed_by_calculus: &[],
                subsumed_by_any_calculus: true,
            },
            MajorRequirement::Pick118_124_125_126_155_160 => PickRule {
                allowed: PICK_118_124_125_126,
                subsumed_by_completion: &[Course::M155, Course::M160],
                subsumed_by_calculus: &[
                    CalculusRequirement::M155,
                    CalculusRequirement::M155Or160,
                    CalculusRequirement::M160,
                ],
                subsumed_by_any_calculus: false,
            },
            MajorRequirement::CoreOnly
            | MajorRequirement::M117M101
            | MajorRequirement::M117M118M124
            | MajorRequirement::M117M118M125
            | MajorRequirement::M117M118M124M125
            | MajorRequirement::M117M118M124M141
            | MajorRequirement::M118M124M125
            | MajorRequirement::M118M124M125M141
            | MajorRequirement::M124M125M126M155
            | MajorRequirement::M126
            | MajorRequirement::M117M118M124M125M141Or155
            | MajorRequirement::M141
            | MajorRequirement::M141Or155Or160
            | MajorRequirement::M155
            | MajorRequirement::M155Or160
            | MajorRequirement::M156
            | MajorRequirement::M156Or160
            | MajorRequirement::M160 => return None,
        };

        Some(rule)
    }
}

/// The kind of first-term recommendation a major makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdealFirstTermKind {
    CoreOnly,
    NamedList,
    PickList,
    /// "MATH 117 or higher": any course from the named one upward.
    CourseOrHigher,
}

/// What a major would ideally have a student eligible for in their first term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdealFirstTerm {
    pub kind: IdealFirstTermKind,
    #[serde(default)]
    pub courses: Vec<Course>,
    /// A calculus choice named as one entry (e.g. MATH 155 or MATH 160). It never matches a
    /// pick-list course.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculus: Option<CalculusRequirement>,
}

impl IdealFirstTerm {
    pub fn core_only() -> Self {
        Self {
            kind: IdealFirstTermKind::CoreOnly,
            courses: Vec::new(),
            calculus: None,
        }
    }
}

/// Where a student stands with respect to one course on their trajectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrajectoryStatus {
    #[default]
    NotNeeded,
    CompletedSufficient,
    CompletedNeedsBetterGrade,
    Eligible,
    Ineligible,
}

impl TrajectoryStatus {
    /// True once the course is part of the trajectory.
    pub fn is_needed(self) -> bool {
        self != TrajectoryStatus::NotNeeded
    }

    /// True when the student can take the course now or already has it.
    pub fn is_ready(self) -> bool {
        matches!(
            self,
            TrajectoryStatus::Eligible | TrajectoryStatus::CompletedSufficient
        )
    }
}

/// The single recommended next action for a student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NextStep {
    #[default]
    #[serde(rename = "PLACEMENT_NOT_NEEDED")]
    PlacementNotNeeded,
    #[serde(rename = "ALREADY_ELIGIBLE")]
    AlreadyEligible,
    #[serde(rename = "PLACE_INTO_117")]
    PlaceInto117,
    #[serde(rename = "PLACE_OUT_117")]
    PlaceOut117,
    #[serde(rename = "PLACE_OUT_118")]
    PlaceOut118,
    #[serde(rename = "PLACE_OUT_117_118")]
    PlaceOut117_118,
    #[serde(rename = "PLACE_OUT_124")]
    PlaceOut124,
    #[serde(rename = "PLACE_OUT_118_124")]
    PlaceOut118_124,
    #[serde(rename = "PLACE_OUT_117_118_124")]
    PlaceOut117_118_124,
    #[serde(rename = "PLACE_OUT_125")]
    PlaceOut125,
    #[serde(rename = "PLACE_OUT_118_125")]
    PlaceOut118_125,
    #[serde(rename = "PLACE_OUT_117_118_125")]
    PlaceOut117_118_125,
    #[serde(rename = "PLACE_OUT_124_125")]
    PlaceOut124_125,
    #[serde(rename = "PLACE_OUT_118_124_125")]
    PlaceOut118_124_125,
    #[serde(rename = "PLACE_OUT_117_118_124_125")]
    PlaceOut117_118_124_125,
    #[serde(rename = "PLACE_OUT_126")]
    PlaceOut126,
    #[serde(rename = "PLACE_OUT_125_126")]
    PlaceOut125_126,
    #[serde(rename = "PLACE_OUT_118_125_126")]
    PlaceOut118_125_126,
    #[serde(rename = "PLACE_OUT_117_118_125_126")]
    PlaceOut117_118_125_126,
    #[serde(rename = "PLACE_OUT_124_126")]
    PlaceOut124_126,
    #[serde(rename = "PLACE_OUT_124_125_126")]
    PlaceOut124_125_126,
    #[serde(rename = "PLACE_OUT_118_124_125_126")]
    PlaceOut118_124_125_126,
    #[serde(rename = "PLACE_OUT_117_118_124_125_126")]
    PlaceOut117_118_124_125_126,
}

impl NextStep {
    const PLACE_OUT: [NextStep; 20] = [
        NextStep::PlaceOut117,
        NextStep::PlaceOut118,
        NextStep::PlaceOut117_118,
        NextStep::PlaceOut124,
        NextStep::PlaceOut118_124,
        NextStep::PlaceOut117_118_124,
        NextStep::PlaceOut125,
        NextStep::PlaceOut118_125,
        NextStep::PlaceOut117_118_125,
        NextStep::PlaceOut124_125,
        NextStep::PlaceOut118_124_125,
        NextStep::PlaceOut117_118_124_125,
        NextStep::PlaceOut126,
        NextStep::PlaceOut125_126,
        NextStep::PlaceOut118_125_126,
        NextStep::PlaceOut117_118_125_126,
        NextStep::PlaceOut124_126,
        NextStep::PlaceOut124_125_126,
        NextStep::PlaceOut118_124_125_126,
        NextStep::PlaceOut117_118_124_125_126,
    ];

    /// Courses the student should place out of, in catalog order.
    pub fn courses_to_place_out_of(self) -> &'static [Course] {
        use Course::*;

        match self {
            NextStep::PlacementNotNeeded | NextStep::AlreadyEligible | NextStep::PlaceInto117 => &[],
            NextStep::PlaceOut117 => &[M117],
            NextStep::PlaceOut118 => &[M118],
            NextStep::PlaceOut117_118 => &[M117, M118],
            NextStep::PlaceOut124 => &[M124],
            NextStep::PlaceOut118_124 => &[M118, M124],
            NextStep::PlaceOut117_118_124 => &[M117, M118, M124],
            NextStep::PlaceOut125 => &[M125],
            NextStep::PlaceOut118_125 => &[M118, M125],
            NextStep::PlaceOut117_118_125 => &[M117, M118, M125],
            NextStep::PlaceOut124_125 => &[M124, M125],
            NextStep::PlaceOut118_124_125 => &[M118, M124, M125],
            NextStep::PlaceOut117_118_124_125 => &[M117, M118, M124, M125],
            NextStep::PlaceOut126 => &[M126],
            NextStep::PlaceOut125_126 => &[M125, M126],
            NextStep::PlaceOut118_125_126 => &[M118, M125, M126],
            NextStep::PlaceOut117_118_125_126 => &[M117, M118, M125, M126],
            NextStep::PlaceOut124_126 => &[M124, M126],
            NextStep::PlaceOut124_125_126 => &[M124, M125, M126],
            NextStep::PlaceOut118_124_125_126 => &[M118, M124, M125, M126],
            NextStep::PlaceOut117_118_124_125_126 => &[M117, M118, M124, M125, M126],
        }
    }

    /// Finds the place-out step for a set of courses, if one exists.
    pub fn place_out_of<I>(courses: I) -> Option<NextStep>
    where
        I: IntoIterator<Item = Course>,
    {
        let mut wanted: Vec<Course> = courses.into_iter().collect();
        wanted.sort();
        wanted.dedup();

        Self::PLACE_OUT
            .into_iter()
            .find(|step| step.courses_to_place_out_of() == wanted.as_slice())
    }

    /// True when the student should take a placement exam.
    pub fn placement_needed(self) -> bool {
        !matches!(
            self,
            NextStep::PlacementNotNeeded | NextStep::AlreadyEligible
        )
    }

    /// Stable code for the step, matching its serialized form.
    pub fn code(self) -> String {
        match self {
            NextStep::PlacementNotNeeded => "PLACEMENT_NOT_NEEDED".to_string(),
            NextStep::AlreadyEligible => "ALREADY_ELIGIBLE".to_string(),
            NextStep::PlaceInto117 => "PLACE_INTO_117".to_string(),
            _ => {
                let numbers: Vec<String> = self
                    .courses_to_place_out_of()
                    .iter()
                    .map(|c| c.number().to_string())
                    .collect();
                format!("PLACE_OUT_{}", numbers.join("_"))
            }
        }
    }

    pub fn message(self) -> String {
        match self {
            NextStep::PlacementNotNeeded => {
                "The Math Placement Exam is not needed for your selected majors.".to_string()
            }
            NextStep::AlreadyEligible => {
                "You are already eligible for the first math course in your plan.".to_string()
            }
            NextStep::PlaceInto117 => {
                "Take the Math Placement Exam to become eligible for MATH 117.".to_string()
            }
            NextStep::PlaceOut117
            | NextStep::PlaceOut118
            | NextStep::PlaceOut117_118
            | NextStep::PlaceOut124
            | NextStep::PlaceOut118_124
            | NextStep::PlaceOut117_118_124
            | NextStep::PlaceOut125
            | NextStep::PlaceOut118_125
            | NextStep::PlaceOut117_118_125
            | NextStep::PlaceOut124_125
            | NextStep::PlaceOut118_124_125
            | NextStep::PlaceOut117_118_124_125
            | NextStep::PlaceOut126
            | NextStep::PlaceOut125_126
            | NextStep::PlaceOut118_125_126
            | NextStep::PlaceOut117_118_125_126
            | NextStep::PlaceOut124_126
            | NextStep::PlaceOut124_125_126
            | NextStep::PlaceOut118_124_125_126
            | NextStep::PlaceOut117_118_124_125_126 => {
                let labels: Vec<&str> = self
                    .courses_to_place_out_of()
                    .iter()
                    .map(|c| c.label())
                    .collect();
                format!("Try to place out of {}.", join_labels(&labels, "and"))
            }
        }
    }
}

/// Joins labels as English prose: `A`, `A and B`, `A, B, and C`.
pub(crate) fn join_labels(labels: &[&str], conjunction: &str) -> String {
    match labels {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} {conjunction} {second}"),
        [rest @ .., last] => format!("{}, {conjunction} {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_order_matches_catalog() {
        assert!(Course::M124 < Course::M120);
        assert!(Course::M120 < Course::M125);
        assert!(Course::M101 < Course::M117);
        let mut sorted = Course::ALL;
        sorted.sort();
        assert_eq!(sorted, Course::ALL);
    }

    #[test]
    fn test_course_id_parsing() {
        assert_eq!(Course::from_course_id("M 117"), Some(Course::M117));
        assert_eq!(Course::from_course_id("MATH 160"), Some(Course::M160));
        assert_eq!(Course::from_course_id("MATH126"), Some(Course::M126));
        assert_eq!(Course::from_course_id("math 124"), Some(Course::M124));
        assert_eq!(Course::from_course_id("M 100C"), None);
        assert_eq!(Course::from_course_id("M 002"), None);
        assert_eq!(Course::from_course_id("CS 160"), None);
    }

    #[test]
    fn test_b_minus_grades() {
        assert!(MinimumGrade::BMinus.is_met_by(None));
        assert!(MinimumGrade::BMinus.is_met_by(Some("A-")));
        assert!(MinimumGrade::BMinus.is_met_by(Some("B-")));
        assert!(MinimumGrade::BMinus.is_met_by(Some("TB")));
        assert!(!MinimumGrade::BMinus.is_met_by(Some("C+")));
        assert!(!MinimumGrade::BMinus.is_met_by(Some("TC")));
        assert!(MinimumGrade::Passing.is_met_by(Some("D")));
    }

    #[test]
    fn test_calculus_priority_golden() {
        use CalculusRequirement as C;

        assert_eq!(C::resolve(std::iter::empty::<C>()), C::None);
        assert_eq!(C::resolve([C::None, C::M155]), C::M155);
        assert_eq!(C::resolve([C::M155, C::None]), C::M155);
        assert_eq!(C::resolve([C::M155Or160, C::M155]), C::M155);
        assert_eq!(C::resolve([C::M155, C::M155Or160]), C::M155);
        assert_eq!(C::resolve([C::M156Or160, C::M155]), C::M156Or160);
        assert_eq!(C::resolve([C::M156, C::M156Or160]), C::M156);
        assert_eq!(C::resolve([C::M156, C::M160]), C::M160);
        assert_eq!(C::resolve([C::M141Or155, C::M141]), C::M141);
        assert_eq!(C::resolve([C::M141Or155Or160, C::M141Or155]), C::M141Or155);
        assert_eq!(C::resolve([C::M141, C::M155Or160]), C::M155Or160);
        assert_eq!(
            C::resolve([C::M141Or155Or160, C::M141, C::M160, C::M155]),
            C::M160
        );
    }

    #[test]
    fn test_calculus_tiers() {
        assert_eq!(CalculusRequirement::M141Or155.tier(), Some(CalculusTier::Low));
        assert_eq!(CalculusRequirement::M155Or160.tier(), Some(CalculusTier::Mid));
        assert_eq!(CalculusRequirement::M156Or160.tier(), Some(CalculusTier::Top));
        assert!(CalculusRequirement::None.implied_courses().is_empty());
        assert_eq!(CalculusRequirement::M160.grade_gates().len(), 2);
        assert!(CalculusRequirement::M155.grade_gates().is_empty());
        assert_eq!(CalculusRequirement::M155Or160.label(), "MATH 155 or MATH 160");
        assert_eq!(
            CalculusRequirement::M141Or155Or160.label(),
            "MATH 141, MATH 155, or MATH 160"
        );
    }

    #[test]
    fn test_major_requirement_codes() {
        let req: MajorRequirement = serde_json::from_str("\"M_117_118_124_141\"").unwrap();
        assert_eq!(req, MajorRequirement::M117M118M124M141);
        assert_eq!(
            req.named_precalculus(),
            &[Course::M117, Course::M118, Course::M124]
        );
        assert_eq!(req.named_calculus(), CalculusRequirement::M141);
        assert!(req.pick_rule().is_none());

        let pick: MajorRequirement =
            serde_json::from_str("\"PICK_3CR_118_124_125_126_155_160\"").unwrap();
        let rule = pick.pick_rule().unwrap();
        assert_eq!(rule.allowed.len(), 4);
        assert!(rule.is_subsumed(CalculusRequirement::M160, |_| false));
        assert!(!rule.is_subsumed(CalculusRequirement::M156, |_| false));
        assert!(rule.is_subsumed(CalculusRequirement::None, |c| c == Course::M155));
    }

    #[test]
    fn test_next_step_lookup() {
        assert_eq!(
            NextStep::place_out_of([Course::M126, Course::M124, Course::M125]),
            Some(NextStep::PlaceOut124_125_126)
        );
        assert_eq!(
            NextStep::place_out_of([Course::M117]),
            Some(NextStep::PlaceOut117)
        );
        assert_eq!(NextStep::place_out_of([Course::M117, Course::M126]), None);
        assert!(!NextStep::AlreadyEligible.placement_needed());
        assert!(NextStep::PlaceInto117.placement_needed());
        assert_eq!(
            NextStep::PlaceOut124_125_126.message(),
            "Try to place out of MATH 124, MATH 125, and MATH 126."
        );
    }

    #[test]
    fn test_next_step_serializes_as_code() {
        let json = serde_json::to_string(&NextStep::PlaceOut118_124_125_126).unwrap();
        assert_eq!(json, "\"PLACE_OUT_118_124_125_126\"");

        let steps = [NextStep::PlacementNotNeeded, NextStep::AlreadyEligible, NextStep::PlaceInto117]
            .into_iter()
            .chain(NextStep::PLACE_OUT);
        for step in steps {
            assert_eq!(serde_json::to_string(&step).unwrap(), format!("\"{}\"", step.code()));
        }
    }
}

//! The major catalog: which math requirement each major carries.
//!
//! Loaded once at startup from a directory of per-college JSON files and read-only afterwards.

use super::error::MathPlanError;
use super::types::{IdealFirstTerm, MajorRequirement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Catalog files bundled with the crate, used when no catalog directory is configured.
const EMBEDDED_FILES: [(&str, &str); 9] = [
    (
        "agricultural_sciences.json",
        include_str!("../../catalog/agricultural_sciences.json"),
    ),
    ("business.json", include_str!("../../catalog/business.json")),
    (
        "engineering.json",
        include_str!("../../catalog/engineering.json"),
    ),
    (
        "exploratory_studies.json",
        include_str!("../../catalog/exploratory_studies.json"),
    ),
    (
        "health_human_sciences.json",
        include_str!("../../catalog/health_human_sciences.json"),
    ),
    (
        "liberal_arts.json",
        include_str!("../../catalog/liberal_arts.json"),
    ),
    (
        "natural_resources.json",
        include_str!("../../catalog/natural_resources.json"),
    ),
    (
        "natural_sciences.json",
        include_str!("../../catalog/natural_sciences.json"),
    ),
    (
        "veterinary_medicine_biomedical_sciences.json",
        include_str!("../../catalog/veterinary_medicine_biomedical_sciences.json"),
    ),
];

/// One catalog file: the majors offered by a college.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollegeCatalog {
    pub college: String,
    pub majors: Vec<MajorEntry>,
}

/// A major as written in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorEntry {
    /// Numbers the major is listed under on the majors questionnaire
    pub question_numbers: Vec<u32>,
    /// Program codes (e.g. `MATH-BS`) that map to this major
    #[serde(default)]
    pub program_codes: Vec<String>,
    pub name: String,
    pub requirement: MajorRequirement,
    pub ideal_first_term: IdealFirstTerm,
}

/// A major with the college it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Major {
    /// Primary identifier: the first question number
    pub id: u32,
    pub question_numbers: Vec<u32>,
    pub program_codes: Vec<String>,
    pub name: String,
    pub college: String,
    pub requirement: MajorRequirement,
    pub ideal_first_term: IdealFirstTerm,
}

/// Read-only lookup from major identifiers to majors.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    majors: Vec<Major>,
    by_question: HashMap<u32, usize>,
    by_program_code: HashMap<String, usize>,
}

impl Catalog {
    /// Loads every `*.json` file in a catalog directory.
    ///
    /// # Arguments
    /// * `catalog_dir` - Directory holding one JSON file per college
    ///
    /// # Returns
    /// * `Ok(Catalog)` - All majors from all files
    /// * `Err(MathPlanError)` - If the directory can't be read, a file doesn't parse, or two
    ///   majors share an identifier
    pub fn load_from_directory(catalog_dir: &Path) -> Result<Self, MathPlanError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(catalog_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        // read_dir order is platform dependent
        paths.sort();

        let mut colleges = Vec::with_capacity(paths.len());
        for path in paths {
            let content = fs::read_to_string(&path)?;
            let college = parse_college(&path.display().to_string(), &content)?;
            debug!(file = %path.display(), majors = college.majors.len(), "Loaded catalog file");
            colleges.push(college);
        }

        let catalog = Self::from_colleges(colleges)?;
        info!(
            dir = %catalog_dir.display(),
            majors = catalog.len(),
            "Loaded major catalog"
        );
        Ok(catalog)
    }

    /// Parses the catalog bundled with the crate.
    pub fn embedded() -> Result<Self, MathPlanError> {
        let colleges = EMBEDDED_FILES
            .iter()
            .map(|(name, content)| parse_college(name, content))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_colleges(colleges)
    }

    /// Builds a catalog from parsed college files, rejecting duplicate identifiers.
    pub fn from_colleges(colleges: Vec<CollegeCatalog>) -> Result<Self, MathPlanError> {
        let mut catalog = Catalog::default();

        for college in colleges {
            for entry in college.majors {
                let Some(&id) = entry.question_numbers.first() else {
                    return Err(MathPlanError::CatalogParse {
                        file: college.college.clone(),
                        message: format!("major '{}' has no question numbers", entry.name),
                    });
                };

                let index = catalog.majors.len();
                for &number in &entry.question_numbers {
                    if catalog.by_question.insert(number, index).is_some() {
                        return Err(MathPlanError::DuplicateMajor {
                            id: number.to_string(),
                        });
                    }
                }
                for code in &entry.program_codes {
                    if catalog
                        .by_program_code
                        .insert(code.to_ascii_uppercase(), index)
                        .is_some()
                    {
                        return Err(MathPlanError::DuplicateMajor { id: code.clone() });
                    }
                }

                catalog.majors.push(Major {
                    id,
                    question_numbers: entry.question_numbers,
                    program_codes: entry.program_codes,
                    name: entry.name,
                    college: college.college.clone(),
                    requirement: entry.requirement,
                    ideal_first_term: entry.ideal_first_term,
                });
            }
        }

        if catalog.majors.is_empty() {
            return Err(MathPlanError::EmptyCatalog);
        }

        Ok(catalog)
    }

    /// All majors in load order.
    pub fn majors(&self) -> &[Major] {
        &self.majors
    }

    pub fn len(&self) -> usize {
        self.majors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.majors.is_empty()
    }

    /// Gets a major by any of its question numbers.
    pub fn get_by_question(&self, number: u32) -> Option<&Major> {
        self.by_question.get(&number).map(|&i| &self.majors[i])
    }

    /// Gets a major by program code (case-insensitive).
    pub fn get_by_program_code(&self, code: &str) -> Option<&Major> {
        self.by_program_code
            .get(&code.trim().to_ascii_uppercase())
            .map(|&i| &self.majors[i])
    }

    /// Finds a major by question number or program code.
    pub fn find(&self, major_id: &str) -> Option<&Major> {
        match major_id.trim().parse::<u32>() {
            Ok(number) => self.get_by_question(number),
            Err(_) => self.get_by_program_code(major_id),
        }
    }

    /// The requirement attached to a major, if the major exists.
    pub fn lookup_major_requirement(&self, major_id: &str) -> Option<MajorRequirement> {
        self.find(major_id).map(|m| m.requirement)
    }
}

fn parse_college(file: &str, content: &str) -> Result<CollegeCatalog, MathPlanError> {
    serde_json::from_str(content).map_err(|e| MathPlanError::CatalogParse {
        file: file.to_string(),
        message: e.to_string(),
    })
}

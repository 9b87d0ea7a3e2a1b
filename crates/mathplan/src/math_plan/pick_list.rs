//! "Pick K credits from this set" requirements, and merging several of them into one.

use super::types::Course;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A requirement to earn some number of credits from a set of allowed courses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickList {
    /// Credits still needed
    pub credits: u32,
    /// Courses that count toward the credits
    pub courses: BTreeSet<Course>,
}

impl PickList {
    /// Credits a catalog pick requirement asks for.
    pub const DEFAULT_CREDITS: u32 = 3;

    pub fn new<I>(credits: u32, courses: I) -> Self
    where
        I: IntoIterator<Item = Course>,
    {
        Self {
            credits,
            courses: courses.into_iter().collect(),
        }
    }

    /// True when nothing more can be asked of this list.
    pub fn is_satisfied(&self) -> bool {
        self.credits == 0 || self.courses.is_empty()
    }

    pub fn contains(&self, course: Course) -> bool {
        self.courses.contains(&course)
    }

    /// Removes a course and counts its credits toward the list.
    ///
    /// Removing a course the list does not allow changes nothing.
    ///
    /// # Returns
    /// The credits still needed after the removal.
    pub fn remove(&mut self, course: Course) -> u32 {
        if self.courses.remove(&course) {
            self.credits = self.credits.saturating_sub(course.credits());
        }
        self.credits
    }

    /// Drops a course from the allowed set without counting its credits.
    pub fn discard(&mut self, course: Course) -> bool {
        self.courses.remove(&course)
    }

    /// The lowest course in catalog order.
    pub fn lowest(&self) -> Option<Course> {
        self.courses.first().copied()
    }
}

impl fmt::Display for PickList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pick {} credits from ", self.credits)?;
        let labels: Vec<&str> = self.courses.iter().map(|c| c.label()).collect();
        write!(f, "{{{}}}", labels.join(", "))
    }
}

/// The result of merging pick lists: courses that became required outright, and one remaining
/// pick list that satisfies every input list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedPickList {
    pub named: BTreeSet<Course>,
    pub pick: PickList,
}

impl MergedPickList {
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.pick.courses.is_empty()
    }
}

/// Combines pick lists from several majors into a minimal equivalent requirement.
pub struct PickListMerger;

impl PickListMerger {
    /// Merges pick lists.
    ///
    /// Courses common to every list are tried first. If taking them satisfies every list, the
    /// result is a single pick list over the common courses sized to the largest credit need.
    /// Otherwise the common courses become named, and the lowest remaining course of each
    /// unsatisfied list is pulled into an additional pick set until every list is covered.
    ///
    /// Input order does not matter; lists are processed in a canonical order.
    ///
    /// # Arguments
    /// * `lists` - Pick lists to merge. Already-satisfied lists are ignored.
    ///
    /// # Returns
    /// * `MergedPickList` - Named courses plus one pick list covering what remains
    pub fn merge(lists: &[PickList]) -> MergedPickList {
        let mut lists: Vec<PickList> = lists.iter().filter(|l| !l.is_satisfied()).cloned().collect();
        lists.sort();
        lists.dedup();

        match lists.len() {
            0 => MergedPickList::default(),
            1 => MergedPickList {
                named: BTreeSet::new(),
                pick: lists.remove(0),
            },
            _ => Self::merge_many(lists),
        }
    }

    fn merge_many(lists: Vec<PickList>) -> MergedPickList {
        let mut iter = lists.iter();
        let mut in_all = iter.next().map(|l| l.courses.clone()).unwrap_or_default();
        for list in iter {
            in_all = in_all.intersection(&list.courses).copied().collect();
        }

        let max_credits = lists.iter().map(|l| l.credits).max().unwrap_or(0);

        let mut unsatisfied = Vec::new();
        for mut list in lists {
            let mut done = false;
            for &course in &in_all {
                if list.remove(course) == 0 {
                    done = true;
                    break;
                }
            }
            if !done {
                unsatisfied.push(list);
            }
        }

        if unsatisfied.is_empty() {
            return MergedPickList {
                named: BTreeSet::new(),
                pick: PickList {
                    credits: max_credits,
                    courses: in_all,
                },
            };
        }

        // Common courses did not cover everything; they become named and the rest is picked.
        let still_needed = unsatisfied.iter().map(|l| l.credits).max().unwrap_or(0);
        let mut additional = BTreeSet::new();

        for mut list in unsatisfied {
            for &added in &additional {
                list.remove(added);
            }
            while list.credits > 0 {
                let Some(lowest) = list.lowest() else {
                    break;
                };
                list.remove(lowest);
                additional.insert(lowest);
            }
        }

        MergedPickList {
            named: in_all,
            pick: PickList {
                credits: still_needed,
                courses: additional,
            },
        }
    }
}

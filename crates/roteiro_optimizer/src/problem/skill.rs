use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Skill(String);

impl Skill {
    pub fn new(skill: String) -> Self {
        Skill(skill)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub type SkillSet = FxHashSet<Skill>;

pub fn skill_set<I, S>(skills: I) -> SkillSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    skills.into_iter().map(|s| Skill::new(s.into())).collect()
}

/// Sorted skill names, for reports and reason messages.
pub fn sorted_names(skills: &SkillSet) -> Vec<String> {
    let mut names: Vec<String> = skills.iter().map(|s| s.as_str().to_string()).collect();
    names.sort();
    names
}

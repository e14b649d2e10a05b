//! The résumé record as stored on disk.
//!
//! Field declaration order is the serialization order, so saving an unedited
//! record reproduces its file. Optional sections are `Option`s resolved here,
//! once, and are skipped on output when absent. Keys the model does not name
//! are kept in each struct's `extra` map, in file order, and written after
//! the named ones.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub basics: Basics,
    pub work: Vec<WorkEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Skills,
    pub languages: Vec<LanguageEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_skills: Option<Vec<DigitalSkill>>,
    pub other: Other,
    /// Keys not modelled above, written back after the known ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResumeRecord {
    /// Digital skills, empty when the list is absent.
    pub fn digital_skills(&self) -> &[DigitalSkill] {
        self.digital_skills.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basics {
    pub name: String,
    pub tagline: String,
    pub email: String,
    pub phone: Phone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Profiles>,
    pub location: String,
    pub birth: Birth,
    pub nationality: String,
    /// Path relative to the static asset directory, e.g. `img/<uuid>.png`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Basics {
    pub fn github(&self) -> Option<&str> {
        self.profiles
            .as_ref()
            .and_then(|p| p.github.as_deref())
            .filter(|handle| !handle.is_empty())
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref().filter(|path| !path.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    pub mobile: String,
    pub fixed: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profiles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Birth {
    pub date: String,
    pub place: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub achievements: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skills {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programming: Option<ProgrammingSkills>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industrial_automation: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systems: Option<SystemSkills>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_ops: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgrammingSkills {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSkills {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
    pub level: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigitalSkill {
    pub skill: String,
    pub level: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Other {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving_license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualities: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

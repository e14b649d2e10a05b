//! Editor — in-place mutations of a `ResumeRecord`.
//!
//! Handlers wrap these in a load-modify-save cycle on the primary record.
//! Index policy is lenient: an out-of-range update or delete is
//! a no-op reported through the return value, never an error.

pub mod handlers;
pub mod photo;

use serde::Deserialize;

use crate::models::resume::{
    DigitalSkill, EducationEntry, LanguageEntry, ResumeRecord, WorkEntry,
};

// ────────────────────────────────────────────────────────────────────────────
// Form payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct BasicsForm {
    pub name: String,
    pub tagline: String,
    pub email: String,
    pub mobile: String,
    pub fixed: String,
    pub github: String,
    pub telegram: String,
    pub location: String,
    pub birth_date: String,
    pub birth_place: String,
    pub nationality: String,
}

/// `achievements` holds one achievement per line.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkForm {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub achievements: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EducationForm {
    pub degree: String,
    pub institution: String,
}

/// List fields are comma separated; the two systems fields are free text.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillsForm {
    pub ai_skills: String,
    pub prog_advanced: String,
    pub prog_intermediate: String,
    pub prog_basic: String,
    pub industrial_automation: String,
    pub systems_windows: String,
    pub systems_linux: String,
    pub software_skills: String,
    pub devops_skills: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageForm {
    pub language: String,
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DigitalSkillForm {
    pub skill: String,
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtherForm {
    pub driving_license: String,
    pub hobbies: String,
    pub qualities: String,
}

impl From<WorkForm> for WorkEntry {
    fn from(form: WorkForm) -> Self {
        WorkEntry {
            achievements: split_lines(&form.achievements),
            company: form.company,
            position: form.position,
            duration: form.duration,
            ..Default::default()
        }
    }
}

impl From<EducationForm> for EducationEntry {
    fn from(form: EducationForm) -> Self {
        EducationEntry {
            degree: form.degree,
            institution: form.institution,
            ..Default::default()
        }
    }
}

impl From<LanguageForm> for LanguageEntry {
    fn from(form: LanguageForm) -> Self {
        LanguageEntry {
            language: form.language,
            level: form.level,
            ..Default::default()
        }
    }
}

impl From<DigitalSkillForm> for DigitalSkill {
    fn from(form: DigitalSkillForm) -> Self {
        DigitalSkill {
            skill: form.skill,
            level: form.level,
            ..Default::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

/// `"Python, Go ,  Rust"` -> `["Python", "Go", "Rust"]`. Entries are trimmed
/// and empty ones dropped; order is kept.
pub fn split_comma_list(raw: &str) -> Vec<String> {
    split_trimmed(raw, ',')
}

/// One entry per non-blank line, trimmed.
pub fn split_lines(raw: &str) -> Vec<String> {
    split_trimmed(raw, '\n')
}

fn split_trimmed(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// List primitives
// ────────────────────────────────────────────────────────────────────────────

/// Replaces `items[index]`. Returns false, leaving the list untouched, when
/// the index is out of range.
pub fn replace_at<T>(items: &mut [T], index: usize, value: T) -> bool {
    match items.get_mut(index) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// Removes `items[index]`, shifting later entries down. `None` when the
/// index is out of range.
pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Option<T> {
    (index < items.len()).then(|| items.remove(index))
}

// ────────────────────────────────────────────────────────────────────────────
// Section operations
// ────────────────────────────────────────────────────────────────────────────

/// Overwrites every basics field except the photo.
pub fn update_basics(record: &mut ResumeRecord, form: BasicsForm) {
    let basics = &mut record.basics;
    basics.name = form.name;
    basics.tagline = form.tagline;
    basics.email = form.email;
    basics.phone.mobile = form.mobile;
    basics.phone.fixed = form.fixed;
    let profiles = basics.profiles.get_or_insert_with(Default::default);
    profiles.github = Some(form.github);
    profiles.telegram = Some(form.telegram);
    basics.location = form.location;
    basics.birth.date = form.birth_date;
    basics.birth.place = form.birth_place;
    basics.nationality = form.nationality;
}

pub fn update_work(record: &mut ResumeRecord, index: usize, form: WorkForm) -> bool {
    replace_at(&mut record.work, index, form.into())
}

pub fn add_work(record: &mut ResumeRecord, form: WorkForm) {
    record.work.push(form.into());
}

pub fn delete_work(record: &mut ResumeRecord, index: usize) -> Option<WorkEntry> {
    remove_at(&mut record.work, index)
}

pub fn update_education(record: &mut ResumeRecord, index: usize, form: EducationForm) -> bool {
    replace_at(&mut record.education, index, form.into())
}

pub fn add_education(record: &mut ResumeRecord, form: EducationForm) {
    record.education.push(form.into());
}

pub fn delete_education(record: &mut ResumeRecord, index: usize) -> Option<EducationEntry> {
    remove_at(&mut record.education, index)
}

/// Overwrites every skills field, creating the nested groups when absent.
pub fn update_skills(record: &mut ResumeRecord, form: SkillsForm) {
    let skills = &mut record.skills;
    skills.ai = Some(split_comma_list(&form.ai_skills));

    let programming = skills.programming.get_or_insert_with(Default::default);
    programming.advanced = Some(split_comma_list(&form.prog_advanced));
    programming.intermediate = Some(split_comma_list(&form.prog_intermediate));
    programming.basic = Some(split_comma_list(&form.prog_basic));

    skills.industrial_automation = Some(split_comma_list(&form.industrial_automation));

    let systems = skills.systems.get_or_insert_with(Default::default);
    systems.windows = Some(form.systems_windows);
    systems.linux = Some(form.systems_linux);

    skills.software = Some(split_comma_list(&form.software_skills));
    skills.dev_ops = Some(split_comma_list(&form.devops_skills));
}

pub fn update_language(record: &mut ResumeRecord, index: usize, form: LanguageForm) -> bool {
    replace_at(&mut record.languages, index, form.into())
}

pub fn add_language(record: &mut ResumeRecord, form: LanguageForm) {
    record.languages.push(form.into());
}

pub fn delete_language(record: &mut ResumeRecord, index: usize) -> Option<LanguageEntry> {
    remove_at(&mut record.languages, index)
}

/// An absent digital skills list behaves as empty.
pub fn update_digital_skill(
    record: &mut ResumeRecord,
    index: usize,
    form: DigitalSkillForm,
) -> bool {
    match record.digital_skills.as_mut() {
        Some(skills) => replace_at(skills, index, form.into()),
        None => false,
    }
}

pub fn add_digital_skill(record: &mut ResumeRecord, form: DigitalSkillForm) {
    record
        .digital_skills
        .get_or_insert_with(Vec::new)
        .push(form.into());
}

pub fn delete_digital_skill(record: &mut ResumeRecord, index: usize) -> Option<DigitalSkill> {
    record
        .digital_skills
        .as_mut()
        .and_then(|skills| remove_at(skills, index))
}

pub fn update_other(record: &mut ResumeRecord, form: OtherForm) {
    let other = &mut record.other;
    other.driving_license = Some(form.driving_license);
    other.hobbies = Some(split_comma_list(&form.hobbies));
    other.qualities = Some(split_comma_list(&form.qualities));
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::tests::sample_record;
    use crate::models::resume::Skills;

    fn work_form(company: &str) -> WorkForm {
        WorkForm {
            company: company.to_string(),
            position: "Engineer".to_string(),
            duration: "2024".to_string(),
            achievements: "  first  \n\n second\r\n".to_string(),
        }
    }

    #[test]
    fn test_split_comma_list_trims_and_drops_empties() {
        assert_eq!(
            split_comma_list("Python, Go ,  Rust"),
            vec!["Python", "Go", "Rust"]
        );
        assert_eq!(split_comma_list(" , ,a,,"), vec!["a"]);
        assert!(split_comma_list("   ").is_empty());
    }

    #[test]
    fn test_split_lines_handles_blank_and_crlf_lines() {
        assert_eq!(split_lines("  first  \n\n second\r\n"), vec!["first", "second"]);
    }

    #[test]
    fn test_update_work_changes_only_target_entry() {
        let mut record = sample_record();
        let before = record.work.clone();

        assert!(update_work(&mut record, 1, work_form("Hooli")));

        assert_eq!(record.work.len(), before.len());
        assert_eq!(record.work[0], before[0]);
        assert_eq!(record.work[2], before[2]);
        assert_eq!(record.work[1].company, "Hooli");
        assert_eq!(record.work[1].achievements, vec!["first", "second"]);
    }

    #[test]
    fn test_update_work_out_of_range_is_noop() {
        let mut record = sample_record();
        let before = record.clone();
        assert!(!update_work(&mut record, 3, work_form("Hooli")));
        assert_eq!(record, before);
    }

    #[test]
    fn test_delete_shifts_following_entries() {
        let mut record = sample_record();
        let before = record.work.clone();

        let deleted = delete_work(&mut record, 0).unwrap();

        assert_eq!(deleted, before[0]);
        assert_eq!(record.work, before[1..].to_vec());
    }

    #[test]
    fn test_delete_out_of_range_leaves_list_unchanged() {
        let mut record = sample_record();
        let before = record.clone();
        assert!(delete_work(&mut record, 99).is_none());
        assert!(delete_education(&mut record, 1).is_none());
        assert!(delete_language(&mut record, 2).is_none());
        assert!(delete_digital_skill(&mut record, 1).is_none());
        assert_eq!(record, before);
    }

    #[test]
    fn test_add_appends_at_end() {
        let mut record = sample_record();
        add_work(&mut record, work_form("Hooli"));
        add_education(
            &mut record,
            EducationForm {
                degree: "PhD".to_string(),
                institution: "MIT".to_string(),
            },
        );
        add_language(
            &mut record,
            LanguageForm {
                language: "Tedesco".to_string(),
                level: "A2".to_string(),
            },
        );

        assert_eq!(record.work.last().unwrap().company, "Hooli");
        assert_eq!(record.education.last().unwrap().degree, "PhD");
        assert_eq!(record.languages.last().unwrap().language, "Tedesco");
    }

    #[test]
    fn test_digital_skills_created_on_first_add() {
        let mut record = sample_record();
        record.digital_skills = None;
        let form = DigitalSkillForm {
            skill: "Figma".to_string(),
            level: "Base".to_string(),
        };

        assert!(!update_digital_skill(&mut record, 0, form.clone()));
        add_digital_skill(&mut record, form);

        assert_eq!(record.digital_skills().len(), 1);
        assert_eq!(record.digital_skills()[0].skill, "Figma");
    }

    #[test]
    fn test_update_education_and_language() {
        let mut record = sample_record();
        assert!(update_education(
            &mut record,
            0,
            EducationForm {
                degree: "Laurea".to_string(),
                institution: "Sapienza".to_string(),
            },
        ));
        assert!(update_language(
            &mut record,
            1,
            LanguageForm {
                language: "Inglese".to_string(),
                level: "C2".to_string(),
            },
        ));
        assert_eq!(record.education[0].institution, "Sapienza");
        assert_eq!(record.languages[1].level, "C2");
        assert_eq!(record.languages[0].level, "Madrelingua");
    }

    #[test]
    fn test_update_basics_keeps_photo() {
        let mut record = sample_record();
        record.basics.photo = Some("img/me.png".to_string());
        record.basics.profiles = None;

        update_basics(
            &mut record,
            BasicsForm {
                name: "Luca Verdi".to_string(),
                tagline: "DevOps".to_string(),
                email: "luca@example.com".to_string(),
                mobile: "1".to_string(),
                fixed: "2".to_string(),
                github: "lverdi".to_string(),
                telegram: "@lverdi".to_string(),
                location: "Milano".to_string(),
                birth_date: "02/02/1985".to_string(),
                birth_place: "Bergamo".to_string(),
                nationality: "Italiana".to_string(),
            },
        );

        assert_eq!(record.basics.name, "Luca Verdi");
        assert_eq!(record.basics.github(), Some("lverdi"));
        assert_eq!(record.basics.birth.place, "Bergamo");
        assert_eq!(record.basics.photo(), Some("img/me.png"));
    }

    #[test]
    fn test_update_skills_creates_missing_groups() {
        let mut record = sample_record();
        record.skills = Skills::default();

        update_skills(
            &mut record,
            SkillsForm {
                ai_skills: "LLM, RAG".to_string(),
                prog_advanced: "Rust".to_string(),
                prog_intermediate: "".to_string(),
                prog_basic: "C, ".to_string(),
                industrial_automation: "".to_string(),
                systems_windows: "11".to_string(),
                systems_linux: "Arch".to_string(),
                software_skills: "Blender".to_string(),
                devops_skills: "Docker,K8s".to_string(),
            },
        );

        let skills = &record.skills;
        assert_eq!(skills.ai.as_deref(), Some(&["LLM".to_string(), "RAG".to_string()][..]));
        let programming = skills.programming.as_ref().unwrap();
        assert_eq!(programming.advanced.as_deref(), Some(&["Rust".to_string()][..]));
        assert_eq!(programming.intermediate.as_deref(), Some(&[][..]));
        assert_eq!(programming.basic.as_deref(), Some(&["C".to_string()][..]));
        assert_eq!(skills.systems.as_ref().unwrap().linux.as_deref(), Some("Arch"));
        assert_eq!(skills.dev_ops.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_update_other_parses_lists() {
        let mut record = sample_record();
        update_other(
            &mut record,
            OtherForm {
                driving_license: "A, B".to_string(),
                hobbies: "Chess ,Running".to_string(),
                qualities: "Curious".to_string(),
            },
        );
        assert_eq!(record.other.driving_license.as_deref(), Some("A, B"));
        assert_eq!(
            record.other.hobbies.as_deref(),
            Some(&["Chess".to_string(), "Running".to_string()][..])
        );
        assert_eq!(record.other.qualities.as_ref().unwrap().len(), 1);
    }
}

//! Static wording for each language variant of the exported document.

use crate::store::Language;

#[derive(Debug)]
pub struct Labels {
    pub work: &'static str,
    pub education: &'static str,
    pub skills: &'static str,
    pub languages: &'static str,
    pub other: &'static str,
    pub digital_skills: &'static str,
    /// Joins position and company: "Developer at Acme".
    pub at: &'static str,
    pub nationality: &'static str,
    pub born: &'static str,
    /// Joins birth date and place.
    pub born_in: &'static str,
    pub ai: &'static str,
    pub programming: &'static str,
    pub advanced: &'static str,
    pub intermediate: &'static str,
    pub basic: &'static str,
    pub industrial_automation: &'static str,
    pub operating_systems: &'static str,
    pub software: &'static str,
    pub dev_ops: &'static str,
    pub driving_license: &'static str,
    pub hobbies: &'static str,
    pub qualities: &'static str,
    pub footer: &'static str,
}

static ITALIAN: Labels = Labels {
    work: "ESPERIENZA LAVORATIVA",
    education: "ISTRUZIONE E FORMAZIONE",
    skills: "COMPETENZE",
    languages: "LINGUE",
    other: "ALTRE INFORMAZIONI",
    digital_skills: "COMPETENZE DIGITALI",
    at: "presso",
    nationality: "Nazionalità",
    born: "Nato il",
    born_in: "a",
    ai: "AI & Machine Learning",
    programming: "Programmazione",
    advanced: "Avanzato",
    intermediate: "Intermedio",
    basic: "Base",
    industrial_automation: "Automazione Industriale",
    operating_systems: "Sistemi Operativi",
    software: "Software",
    dev_ops: "DevOps & Database",
    driving_license: "Patente",
    hobbies: "Hobby",
    qualities: "Qualità personali",
    footer: "CV generato automaticamente",
};

static ENGLISH: Labels = Labels {
    work: "WORK EXPERIENCE",
    education: "EDUCATION AND TRAINING",
    skills: "SKILLS",
    languages: "LANGUAGES",
    other: "OTHER INFORMATION",
    digital_skills: "DIGITAL SKILLS",
    at: "at",
    nationality: "Nationality",
    born: "Born",
    born_in: "in",
    ai: "AI & Machine Learning",
    programming: "Programming",
    advanced: "Advanced",
    intermediate: "Intermediate",
    basic: "Basic",
    industrial_automation: "Industrial Automation",
    operating_systems: "Operating Systems",
    software: "Software",
    dev_ops: "DevOps & Database",
    driving_license: "Driving licence",
    hobbies: "Hobbies",
    qualities: "Personal qualities",
    footer: "CV automatically generated",
};

pub fn labels_for(lang: Language) -> &'static Labels {
    match lang {
        Language::It => &ITALIAN,
        Language::En => &ENGLISH,
    }
}

//! Maps a `ResumeRecord` onto a styled `Document`.
//!
//! Section order is fixed: header, rule, contact block, location and birth
//! lines, then work, education, skills, languages, other, the optional
//! digital skills section and a centered footer. Every optional field is
//! skipped silently when absent.

use crate::models::resume::{Basics, Other, ResumeRecord, Skills};
use crate::render::document::{
    Alignment, Cell, Color, Document, Paragraph, ParagraphStyle, Picture, Run, Table,
    TWIPS_PER_INCH,
};
use crate::render::labels::Labels;

const NAME_PT: u32 = 24;
const TAGLINE_PT: u32 = 12;
const SECTION_PT: u32 = 16;
const ENTRY_PT: u32 = 12;
const LABEL_PT: u32 = 11;
const BODY_PT: u32 = 10;
const FOOTER_PT: u32 = 8;

/// Half an inch on every side.
pub const PAGE_MARGIN_TWIPS: u32 = TWIPS_PER_INCH / 2;
const NAME_COLUMN_TWIPS: u32 = TWIPS_PER_INCH * 11 / 2;
const PHOTO_COLUMN_TWIPS: u32 = TWIPS_PER_INCH * 3 / 2;

/// Builds the document. `photo` is embedded in a right-hand header column
/// when present; the caller has already verified it decodes.
pub fn build_document(record: &ResumeRecord, labels: &Labels, photo: Option<Picture>) -> Document {
    let mut doc = Document::new(PAGE_MARGIN_TWIPS);

    push_header(&mut doc, &record.basics, photo);
    doc.push(Paragraph::rule());
    push_contact(&mut doc, &record.basics, labels);
    doc.push(Paragraph::new());

    push_section_title(&mut doc, labels.work);
    for job in &record.work {
        doc.push(Paragraph::new().run(
            Run::new(format!("{} {} {}", job.position, labels.at, job.company))
                .bold()
                .size(ENTRY_PT)
                .color(Color::ACCENT),
        ));
        if !job.duration.is_empty() {
            doc.push(
                Paragraph::new().run(Run::new(format!("⏱️ {}", job.duration)).italic().size(BODY_PT)),
            );
        }
        for achievement in &job.achievements {
            doc.push(
                Paragraph::new()
                    .style(ParagraphStyle::ListBullet)
                    .run(Run::new(achievement.as_str()).size(BODY_PT)),
            );
        }
        doc.push(Paragraph::new());
    }

    push_section_title(&mut doc, labels.education);
    for edu in &record.education {
        doc.push(
            Paragraph::new().run(
                Run::new(edu.degree.as_str())
                    .bold()
                    .size(ENTRY_PT)
                    .color(Color::ACCENT),
            ),
        );
        doc.push(Paragraph::new().run(Run::new(format!("📚 {}", edu.institution)).size(BODY_PT)));
        doc.push(Paragraph::new());
    }

    push_section_title(&mut doc, labels.skills);
    push_skills(&mut doc, &record.skills, labels);
    doc.push(Paragraph::new());

    push_section_title(&mut doc, labels.languages);
    for lang in &record.languages {
        doc.push(leveled_line(&lang.language, &lang.level));
    }
    doc.push(Paragraph::new());

    push_section_title(&mut doc, labels.other);
    push_other(&mut doc, &record.other, labels);

    let digital = record.digital_skills();
    if !digital.is_empty() {
        doc.push(Paragraph::new());
        push_section_title(&mut doc, labels.digital_skills);
        for skill in digital {
            doc.push(leveled_line(&skill.skill, &skill.level));
        }
    }

    doc.push(
        Paragraph::new().align(Alignment::Center).run(
            Run::new(format!("{} - {}", labels.footer, record.basics.name))
                .size(FOOTER_PT)
                .color(Color::MUTED),
        ),
    );

    doc
}

/// Comma-joins a list in its stored order.
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

fn name_paragraph(basics: &Basics) -> Paragraph {
    Paragraph::new().run(
        Run::new(basics.name.as_str())
            .bold()
            .size(NAME_PT)
            .color(Color::ACCENT),
    )
}

fn tagline_paragraph(basics: &Basics) -> Paragraph {
    Paragraph::new().run(Run::new(basics.tagline.as_str()).italic().size(TAGLINE_PT))
}

fn push_header(doc: &mut Document, basics: &Basics, photo: Option<Picture>) {
    match photo {
        Some(picture) => doc.push_table(Table {
            cells: vec![
                Cell {
                    width_twips: NAME_COLUMN_TWIPS,
                    paragraphs: vec![name_paragraph(basics), tagline_paragraph(basics)],
                },
                Cell {
                    width_twips: PHOTO_COLUMN_TWIPS,
                    paragraphs: vec![Paragraph::new().align(Alignment::Right).picture(picture)],
                },
            ],
        }),
        None => {
            doc.push(name_paragraph(basics));
            doc.push(tagline_paragraph(basics));
        }
    }
}

fn push_contact(doc: &mut Document, basics: &Basics, labels: &Labels) {
    let mut contact = Paragraph::new()
        .run(Run::new(format!("📧 {}  ", basics.email)).size(BODY_PT))
        .run(Run::new(format!("📱 {}  ", basics.phone.mobile)).size(BODY_PT));
    if let Some(github) = basics.github() {
        contact = contact.run(Run::new(format!("GitHub: {github}")).size(BODY_PT));
    }
    doc.push(contact);

    doc.push(Paragraph::new().run(
        Run::new(format!(
            "🏠 {}  •  🌍 {}: {}",
            basics.location, labels.nationality, basics.nationality
        ))
        .size(BODY_PT),
    ));

    doc.push(Paragraph::new().run(
        Run::new(format!(
            "📅 {}: {} {} {}",
            labels.born, basics.birth.date, labels.born_in, basics.birth.place
        ))
        .size(BODY_PT),
    ));
}

fn push_section_title(doc: &mut Document, title: &str) {
    doc.push(
        Paragraph::new()
            .align(Alignment::Left)
            .run(Run::new(title).bold().size(SECTION_PT).color(Color::ACCENT)),
    );
    doc.push(Paragraph::rule());
}

fn titled(title: String) -> Paragraph {
    Paragraph::new().run(Run::new(title).bold().size(LABEL_PT))
}

fn list_line(title: String, items: &[String]) -> Paragraph {
    titled(title).run(Run::new(join_list(items)).size(BODY_PT))
}

fn leveled_line(name: &str, level: &str) -> Paragraph {
    titled(format!("{name}: ")).run(Run::new(level).size(BODY_PT))
}

fn push_skills(doc: &mut Document, skills: &Skills, labels: &Labels) {
    if let Some(ai) = &skills.ai {
        doc.push(list_line(format!("🤖 {}: ", labels.ai), ai));
    }

    if let Some(programming) = &skills.programming {
        let mut para = titled(format!("💻 {}: ", labels.programming));
        let levels = [
            (labels.advanced, &programming.advanced),
            (labels.intermediate, &programming.intermediate),
            (labels.basic, &programming.basic),
        ];
        for (label, items) in levels {
            if let Some(items) = items {
                para = para
                    .run(Run::new(format!("\n{label}: ")).bold().size(BODY_PT))
                    .run(Run::new(join_list(items)).size(BODY_PT));
            }
        }
        doc.push(para);
    }

    if let Some(industrial) = &skills.industrial_automation {
        doc.push(list_line(
            format!("🏭 {}: ", labels.industrial_automation),
            industrial,
        ));
    }

    if let Some(systems) = &skills.systems {
        let mut para = titled(format!("💽 {}: ", labels.operating_systems));
        if let Some(windows) = &systems.windows {
            para = para.run(Run::new(format!("\nWindows: {windows}")).size(BODY_PT));
        }
        if let Some(linux) = &systems.linux {
            para = para.run(Run::new(format!("\nLinux: {linux}")).size(BODY_PT));
        }
        doc.push(para);
    }

    if let Some(software) = &skills.software {
        doc.push(list_line(format!("🖥️ {}: ", labels.software), software));
    }

    if let Some(dev_ops) = &skills.dev_ops {
        doc.push(list_line(format!("🔄 {}: ", labels.dev_ops), dev_ops));
    }
}

fn push_other(doc: &mut Document, other: &Other, labels: &Labels) {
    if let Some(license) = &other.driving_license {
        doc.push(
            titled(format!("🚗 {}: ", labels.driving_license))
                .run(Run::new(license.as_str()).size(BODY_PT)),
        );
    }
    if let Some(hobbies) = &other.hobbies {
        doc.push(list_line(format!("🎮 {}: ", labels.hobbies), hobbies));
    }
    if let Some(qualities) = &other.qualities {
        doc.push(list_line(format!("✨ {}: ", labels.qualities), qualities));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

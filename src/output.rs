//! Text and JSON rendering for command results

use serde::Serialize;
use serde_json::json;
use traincore::utils::dates::{display_stored_date, format_display_date};
use traincore::{
    CatalogEntry, Course, Dashboard, Enrollment, EnrollmentOptions, EnrollmentRow, Participant,
    SelfCheckReport, Tabular,
};

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }

    pub fn message(&self, text: &str, id: i64) -> anyhow::Result<()> {
        self.emit(&json!({ "id": id, "message": text }), || format!("{text}\n"))
    }

    pub fn check(&self, report: &SelfCheckReport) -> anyhow::Result<()> {
        self.emit(report, || format!("{}\n", report.summary()))
    }

    pub fn dashboard(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        self.emit(dashboard, || {
            let mut out = format!(
                "Courses: {}\nParticipants: {}\n\nCourses by type:\n",
                dashboard.total_courses, dashboard.total_participants
            );
            for row in &dashboard.by_duration_type {
                out.push_str(&format!("  {:<12} {}\n", row.duration_type, row.count));
            }
            out.push_str("\nUpcoming:\n");
            if dashboard.upcoming.is_empty() {
                out.push_str("  (none)\n");
            }
            for item in &dashboard.upcoming {
                out.push_str(&format!(
                    "  {} ({}, {})\n",
                    item.course.title,
                    item.course.duration_type,
                    date_range(&item.course)
                ));
                if item.enrolled.is_empty() {
                    out.push_str("    no participants\n");
                } else {
                    out.push_str(&format!("    {}\n", item.enrolled.join(", ")));
                }
            }
            out
        })
    }

    pub fn catalog(&self, entries: &[CatalogEntry]) -> anyhow::Result<()> {
        self.emit(&entries, || {
            let mut out = String::new();
            for entry in entries {
                out.push_str(&course_block(&entry.course));
                if entry.enrolled.is_empty() {
                    out.push_str("  Participants: none\n");
                } else {
                    out.push_str("  Participants:\n");
                    for p in &entry.enrolled {
                        out.push_str(&format!("    {} <{}>\n", p.name, p.email));
                    }
                }
                out.push('\n');
            }
            if entries.is_empty() {
                out.push_str("No courses\n");
            }
            out
        })
    }

    pub fn courses(&self, courses: &[Course]) -> anyhow::Result<()> {
        self.emit(&courses, || {
            let rows = courses
                .iter()
                .map(|c| {
                    vec![
                        c.id.to_string(),
                        c.title.clone(),
                        c.duration_type.to_string(),
                        date_range(c),
                    ]
                })
                .collect();
            table(&["id", "title", "type", "dates"], rows)
        })
    }

    pub fn course(&self, course: &Course) -> anyhow::Result<()> {
        self.emit(course, || course_block(course))
    }

    pub fn participants(&self, participants: &[Participant]) -> anyhow::Result<()> {
        self.emit(&participants, || {
            let rows = participants
                .iter()
                .map(|p| {
                    vec![
                        p.id.to_string(),
                        p.name.clone(),
                        p.email.clone(),
                        p.phone.clone().unwrap_or_default(),
                        p.dob.as_ref().map(format_display_date).unwrap_or_default(),
                    ]
                })
                .collect();
            table(&["id", "name", "email", "phone", "dob"], rows)
        })
    }

    pub fn participant(&self, p: &Participant) -> anyhow::Result<()> {
        self.emit(p, || {
            format!(
                "#{} {}\n  Email: {}\n  Phone: {}\n  Date of birth: {}\n  Created: {}\n",
                p.id,
                p.name,
                p.email,
                p.phone.as_deref().unwrap_or("-"),
                p.dob.as_ref().map(format_display_date).unwrap_or_else(|| "-".to_string()),
                p.date_created
            )
        })
    }

    pub fn enrollment_options(&self, options: &EnrollmentOptions) -> anyhow::Result<()> {
        if self.json {
            return self.emit(options, String::new);
        }
        println!("Courses:");
        self.courses(&options.courses)?;
        println!("\nParticipants:");
        self.participants(&options.participants)
    }

    pub fn enrollments(&self, rows: &[EnrollmentRow]) -> anyhow::Result<()> {
        self.emit(&rows, || {
            let rows = rows
                .iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.participant_name.clone(),
                        r.course_title.clone(),
                        display_stored_date(&r.date_enrolled),
                    ]
                })
                .collect();
            table(&["id", "participant", "course", "enrolled"], rows)
        })
    }

    pub fn orphans(&self, rows: &[Enrollment]) -> anyhow::Result<()> {
        self.emit(&rows, || {
            let rows = rows
                .iter()
                .map(|e| {
                    vec![
                        e.id.to_string(),
                        e.course_id.to_string(),
                        e.participant_id.to_string(),
                        display_stored_date(&e.date_enrolled),
                    ]
                })
                .collect();
            table(&["id", "course_id", "participant_id", "enrolled"], rows)
        })
    }

    pub fn tabular(&self, result: &Tabular) -> anyhow::Result<()> {
        self.emit(result, || {
            let columns: Vec<&str> = result.columns.iter().map(String::as_str).collect();
            let rows = result
                .rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect();
            table(&columns, rows)
        })
    }
}

fn date_range(course: &Course) -> String {
    let show = |d: Option<&chrono::NaiveDate>| d.map(format_display_date).unwrap_or_else(|| "?".to_string());
    format!("{} - {}", show(course.start_date.as_ref()), show(course.end_date.as_ref()))
}

fn course_block(course: &Course) -> String {
    let mut out = format!(
        "#{} {}\n  Type: {}\n  Dates: {}\n",
        course.id,
        course.title,
        course.duration_type,
        date_range(course)
    );
    if let Some(description) = &course.description {
        out.push_str(&format!("  {description}\n"));
    }
    if let Some(image) = &course.image_url {
        out.push_str(&format!("  Image: {image}\n"));
    }
    if let Some(link) = &course.ref_url {
        out.push_str(&format!("  Reference: {link}\n"));
    }
    out
}

/// Left-aligned plain text table
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = table_line(headers, &widths);
    out.push_str(&table_line(&rule.iter().map(String::as_str).collect::<Vec<_>>(), &widths));
    for row in &rows {
        out.push_str(&table_line(&row.iter().map(String::as_str).collect::<Vec<_>>(), &widths));
    }
    if rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

fn table_line(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

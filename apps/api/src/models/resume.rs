use serde::{Deserialize, Serialize};

/// Resume content as held by the editor. Every field defaults when absent
/// so partially-filled drafts deserialize cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub summary: Option<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>, // None means current
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub graduation_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

impl ResumeData {
    /// Non-blank experience bullets across every entry, in document order.
    pub fn bullets(&self) -> impl Iterator<Item = &str> {
        self.experience
            .iter()
            .flat_map(|e| e.descriptions.iter())
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
    }

    pub fn has_summary(&self, min_chars: usize) -> bool {
        self.summary
            .as_deref()
            .map(|s| s.trim().chars().count() >= min_chars)
            .unwrap_or(false)
    }

    pub fn has_contact(&self) -> bool {
        !self.personal_info.full_name.trim().is_empty() && self.personal_info.email.contains('@')
    }

    pub fn has_described_experience(&self) -> bool {
        self.bullets().next().is_some()
    }

    pub fn has_skills(&self) -> bool {
        self.skills.iter().any(|s| !s.trim().is_empty())
    }

    /// Every textual field joined into one lowercase haystack for keyword matching.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();

        parts.push(&self.personal_info.full_name);
        if let Some(summary) = &self.summary {
            parts.push(summary);
        }
        for entry in &self.experience {
            parts.push(&entry.title);
            parts.push(&entry.company);
            parts.extend(entry.descriptions.iter().map(String::as_str));
        }
        for entry in &self.education {
            parts.push(&entry.degree);
            parts.push(&entry.institution);
            if let Some(field) = &entry.field {
                parts.push(field);
            }
        }
        parts.extend(self.skills.iter().map(String::as_str));
        for project in &self.projects {
            parts.push(&project.name);
            parts.push(&project.description);
            parts.extend(project.technologies.iter().map(String::as_str));
        }
        parts.extend(self.certifications.iter().map(String::as_str));

        parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase()
    }
}

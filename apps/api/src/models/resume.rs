use serde::{Deserialize, Serialize};

/// The resume fields collected by the builder form.
///
/// This is the single input to both the generation prompt and the PDF renderer.
/// Every field is plain text and defaults to empty when the client omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub full_name: String,
    pub professional_title: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub professional_summary: String,
    /// Newline-delimited entries, usually "Title at Company".
    pub work_experience: String,
    pub education_10th: String,
    pub education_12th: String,
    #[serde(alias = "ug_degree")]
    pub education_ug: String,
    #[serde(alias = "pg_degree")]
    pub education_pg: String,
    /// Comma-delimited.
    pub key_skills: String,
    /// Newline-delimited "Title: description" entries.
    pub projects: String,
    /// Newline-delimited "Name by Provider" entries.
    pub certifications: String,
    pub languages_known: String,
}

impl ResumeDocument {
    /// Field name / value pairs in form order. Used to build the prompt context.
    pub fn fields(&self) -> [(&str, &str); 14] {
        [
            ("full_name", self.full_name.as_str()),
            ("professional_title", self.professional_title.as_str()),
            ("contact_email", self.contact_email.as_str()),
            ("contact_phone", self.contact_phone.as_str()),
            ("professional_summary", self.professional_summary.as_str()),
            ("work_experience", self.work_experience.as_str()),
            ("education_10th", self.education_10th.as_str()),
            ("education_12th", self.education_12th.as_str()),
            ("education_ug", self.education_ug.as_str()),
            ("education_pg", self.education_pg.as_str()),
            ("key_skills", self.key_skills.as_str()),
            ("projects", self.projects.as_str()),
            ("certifications", self.certifications.as_str()),
            ("languages_known", self.languages_known.as_str()),
        ]
    }

    /// Returns a copy with carriage returns and control characters (other than
    /// newline and tab) removed from every field.
    pub fn normalized(&self) -> Self {
        Self {
            full_name: clean(&self.full_name),
            professional_title: clean(&self.professional_title),
            contact_email: clean(&self.contact_email),
            contact_phone: clean(&self.contact_phone),
            professional_summary: clean(&self.professional_summary),
            work_experience: clean(&self.work_experience),
            education_10th: clean(&self.education_10th),
            education_12th: clean(&self.education_12th),
            education_ug: clean(&self.education_ug),
            education_pg: clean(&self.education_pg),
            key_skills: clean(&self.key_skills),
            projects: clean(&self.projects),
            certifications: clean(&self.certifications),
            languages_known: clean(&self.languages_known),
        }
    }

    /// Name and title are the minimum needed to generate anything useful.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.full_name.trim().is_empty() {
            missing.push("full_name");
        }
        if self.professional_title.trim().is_empty() {
            missing.push("professional_title");
        }
        missing
    }
}

fn clean(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let doc: ResumeDocument =
            serde_json::from_value(serde_json::json!({ "full_name": "Ada Lovelace" })).unwrap();
        assert_eq!(doc.full_name, "Ada Lovelace");
        assert!(doc.key_skills.is_empty());
        assert!(doc.education_pg.is_empty());
    }

    #[test]
    fn test_degree_aliases_accepted() {
        let doc: ResumeDocument = serde_json::from_value(serde_json::json!({
            "ug_degree": "B.Sc. Mathematics",
            "pg_degree": "M.Sc. Computing"
        }))
        .unwrap();
        assert_eq!(doc.education_ug, "B.Sc. Mathematics");
        assert_eq!(doc.education_pg, "M.Sc. Computing");
    }

    #[test]
    fn test_fields_keep_form_order() {
        let doc = ResumeDocument::default();
        let keys: Vec<&str> = doc.fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.first(), Some(&"full_name"));
        assert_eq!(keys.last(), Some(&"languages_known"));
        assert_eq!(keys.len(), 14);
    }

    #[test]
    fn test_normalized_strips_carriage_returns_and_controls() {
        let doc = ResumeDocument {
            work_experience: "Engineer at Acme\r\nFreelancer\u{7}".to_string(),
            ..Default::default()
        };
        assert_eq!(doc.normalized().work_experience, "Engineer at Acme\nFreelancer");
    }

    #[test]
    fn test_missing_required_reports_name_and_title() {
        let doc = ResumeDocument {
            full_name: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            doc.missing_required(),
            vec!["full_name", "professional_title"]
        );
    }
}

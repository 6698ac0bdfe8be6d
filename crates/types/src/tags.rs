//! Tag taxonomy used to filter projects.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Top-level tag categories. The serialized form matches the category names
/// stored by the project backend.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagCategory {
    #[serde(rename = "Issue(s) Addressed")]
    Issues,
    #[serde(rename = "Technologies Used")]
    TechnologiesUsed,
    #[serde(rename = "Role")]
    Role,
    #[serde(rename = "Organization")]
    Organization,
    #[serde(rename = "Project Stage")]
    ProjectStage,
}

impl TagCategory {
    pub const ALL: [TagCategory; 5] = [
        TagCategory::Issues,
        TagCategory::TechnologiesUsed,
        TagCategory::Role,
        TagCategory::Organization,
        TagCategory::ProjectStage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issues => "Issue(s) Addressed",
            Self::TechnologiesUsed => "Technologies Used",
            Self::Role => "Role",
            Self::Organization => "Organization",
            Self::ProjectStage => "Project Stage",
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagCategory {
    type Err = ParseTagCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(ParseTagCategoryError)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseTagCategoryError;

impl fmt::Display for ParseTagCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown tag category")
    }
}

impl Error for ParseTagCategoryError {}

/// A single tag a project can be filtered by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagDefinition {
    /// Stable machine name (e.g. `civic-infrastructure`).
    pub tag_name: String,
    /// Human readable label.
    pub display_name: String,
    pub category: TagCategory,
    /// Optional grouping inside a category (e.g. "Development" for roles).
    #[serde(default)]
    pub subcategory: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("technologies used".parse::<TagCategory>(), Ok(TagCategory::TechnologiesUsed));
        assert_eq!(" Role ".parse::<TagCategory>(), Ok(TagCategory::Role));
        assert_eq!("Colour".parse::<TagCategory>(), Err(ParseTagCategoryError));
    }

    #[test]
    fn tag_definition_reads_backend_category_names() {
        let json = r#"{
            "tag_name": "ux-designer",
            "display_name": "UX Designer",
            "category": "Role",
            "subcategory": "Design"
        }"#;
        let tag: TagDefinition = serde_json::from_str(json).expect("deserialize tag");
        assert_eq!(tag.category, TagCategory::Role);
        assert_eq!(tag.subcategory.as_deref(), Some("Design"));

        let issue: TagDefinition = serde_json::from_str(
            r#"{"tag_name":"housing","display_name":"Housing","category":"Issue(s) Addressed"}"#,
        )
        .expect("deserialize issue tag");
        assert_eq!(issue.category, TagCategory::Issues);
        assert!(issue.subcategory.is_none());
    }
}

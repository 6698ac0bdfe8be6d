//! Navigation targets for buttons that leave the current view.

use civiclab_types::Section;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid site base URL '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("site base URL '{0}' cannot carry a path")]
    NotABase(String),
}

/// URL builder rooted at the site's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLinks {
    index: Url,
    login: Url,
}

impl SiteLinks {
    pub fn new(base: &str) -> Result<Self, UrlError> {
        let trimmed = base.trim();
        let mut root = Url::parse(trimmed).map_err(|source| UrlError::Parse {
            input: trimmed.to_string(),
            source,
        })?;
        if root.cannot_be_a_base() {
            return Err(UrlError::NotABase(trimmed.to_string()));
        }
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        root.set_query(None);
        root.set_fragment(None);

        let join = |relative: &str| {
            root.join(relative).map_err(|source| UrlError::Parse {
                input: trimmed.to_string(),
                source,
            })
        };
        Ok(Self {
            index: join("index/")?,
            login: join("login")?,
        })
    }

    /// `<base>/index/?section=<Section>&<key>=<value>...`
    pub fn section(&self, section: Section, params: &[(&str, &str)]) -> String {
        let mut url = self.index.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("section", section.as_str());
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        url.into()
    }

    /// Sign-in page.
    pub fn login(&self) -> String {
        self.login.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_url_carries_section_and_params() {
        let links = SiteLinks::new("https://civic.example.org").expect("valid base");
        assert_eq!(
            links.section(Section::EditProject, &[("id", "7")]),
            "https://civic.example.org/index/?section=EditProject&id=7"
        );
        assert_eq!(
            links.section(Section::FindProjects, &[]),
            "https://civic.example.org/index/?section=FindProjects"
        );
    }

    #[test]
    fn base_path_prefix_is_preserved() {
        let links = SiteLinks::new("https://civic.example.org/app?x=1").expect("valid base");
        assert_eq!(links.login(), "https://civic.example.org/app/login");
        assert_eq!(
            links.section(Section::AboutProject, &[("id", "3")]),
            "https://civic.example.org/app/index/?section=AboutProject&id=3"
        );
    }

    #[test]
    fn query_values_are_encoded() {
        let links = SiteLinks::new("https://civic.example.org/").expect("valid base");
        let url = links.section(Section::FindProjects, &[("keyword", "food & shelter")]);
        assert_eq!(url, "https://civic.example.org/index/?section=FindProjects&keyword=food+%26+shelter");
    }

    #[test]
    fn rejects_unusable_bases() {
        assert!(matches!(SiteLinks::new("not a url"), Err(UrlError::Parse { .. })));
        assert!(matches!(SiteLinks::new("mailto:team@example.org"), Err(UrlError::NotABase(_))));
    }
}

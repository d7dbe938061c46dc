//! Fragment References
//!
//! `template :: fragment` names a fragment inside another template; a bare
//! `template` names the whole document.

use std::fmt;
use std::str::FromStr;

/// Separator between template and fragment names
const SEPARATOR: &str = "::";

/// A reference to a template, optionally narrowed to one fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentReference {
    pub template: String,
    pub fragment: Option<String>,
}

impl FragmentReference {
    /// Reference to a whole template
    pub fn template(name: &str) -> Self {
        Self {
            template: name.to_string(),
            fragment: None,
        }
    }

    /// Reference to one fragment of a template
    pub fn fragment(template: &str, fragment: &str) -> Self {
        Self {
            template: template.to_string(),
            fragment: Some(fragment.to_string()),
        }
    }
}

/// Reference syntax error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    #[error("Empty template reference")]
    EmptyTemplate,

    #[error("Empty fragment name in reference '{0}'")]
    EmptyFragment(String),
}

impl FromStr for FragmentReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (template, fragment) = match s.split_once(SEPARATOR) {
            Some((template, fragment)) => {
                let fragment = fragment.trim();
                if fragment.is_empty() {
                    return Err(ReferenceError::EmptyFragment(s.trim().to_string()));
                }
                (template.trim(), Some(fragment.to_string()))
            }
            None => (s.trim(), None),
        };
        if template.is_empty() {
            return Err(ReferenceError::EmptyTemplate);
        }
        Ok(Self {
            template: template.to_string(),
            fragment,
        })
    }
}

impl fmt::Display for FragmentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fragment {
            Some(fragment) => write!(f, "{} {} {}", self.template, SEPARATOR, fragment),
            None => f.write_str(&self.template),
        }
    }
}

//! Versioned default templates shipped with the application

/// A built-in quote template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultTemplate {
    pub version: u32,
    pub source: &'static str,
}

const DEFAULT_TEMPLATES: &[DefaultTemplate] = &[
    DefaultTemplate {
        version: 1,
        source: include_str!("../templates/quote_v1.html"),
    },
    DefaultTemplate {
        version: 2,
        source: include_str!("../templates/quote_v2.html"),
    },
];

impl DefaultTemplate {
    /// Newest shipped template
    pub fn latest() -> DefaultTemplate {
        // DEFAULT_TEMPLATES is ordered by version
        DEFAULT_TEMPLATES[DEFAULT_TEMPLATES.len() - 1]
    }

    /// Shipped template with the given version
    pub fn by_version(version: u32) -> Option<DefaultTemplate> {
        DEFAULT_TEMPLATES.iter().copied().find(|t| t.version == version)
    }

    /// All shipped versions, oldest first
    pub fn versions() -> Vec<u32> {
        DEFAULT_TEMPLATES.iter().map(|t| t.version).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use template_engine::Template;

    #[test]
    fn test_latest_is_highest_version() {
        let latest = DefaultTemplate::latest();
        assert_eq!(Some(&latest.version), DefaultTemplate::versions().iter().max());
    }

    #[test]
    fn test_lookup_by_version() {
        assert_eq!(DefaultTemplate::by_version(1).map(|t| t.version), Some(1));
        assert!(DefaultTemplate::by_version(99).is_none());
    }

    #[test]
    fn test_shipped_templates_are_well_formed() {
        for version in DefaultTemplate::versions() {
            let template = DefaultTemplate::by_version(version).unwrap();
            let parsed = Template::parse(template.source);
            assert!(
                parsed.is_well_formed(),
                "v{} diagnostics: {:?}",
                version,
                parsed.diagnostics()
            );
            assert_eq!(parsed.sections(), vec!["items"]);
        }
    }
}

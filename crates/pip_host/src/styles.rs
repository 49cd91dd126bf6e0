use crate::platform::Surface;

/// What the platform reports about one style sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheetSnapshot {
    /// MIME type, usually `text/css`
    pub kind: String,
    pub href: Option<String>,
    /// Rule texts, or `None` when the rules cannot be read (cross-origin sheets)
    pub rules: Option<Vec<String>>,
}

impl StyleSheetSnapshot {
    pub fn inline(rules: Vec<String>) -> Self {
        Self {
            kind: "text/css".to_string(),
            href: None,
            rules: Some(rules),
        }
    }

    pub fn blocked(href: impl Into<String>) -> Self {
        Self {
            kind: "text/css".to_string(),
            href: Some(href.into()),
            rules: None,
        }
    }
}

/// Copy every sheet into `surface`. Returns how many became links.
pub fn mirror_stylesheets(sheets: &[StyleSheetSnapshot], surface: &dyn Surface) -> usize {
    let mut linked = 0;
    for sheet in sheets {
        match &sheet.rules {
            Some(rules) => surface.append_style(&rules.concat()),
            None => {
                let href = sheet.href.as_deref().unwrap_or_default();
                tracing::debug!(href, "Style rules not readable, linking sheet");
                surface.append_stylesheet_link(&sheet.kind, href);
                linked += 1;
            }
        }
    }
    linked
}

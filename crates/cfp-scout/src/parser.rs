use scraper::ElementRef;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing expected structure: {0}")]
    MissingStructure(String),
    #[error("Invalid link '{href}': {reason}")]
    InvalidLink { href: String, reason: String },
}

pub(crate) fn elem_text(element: ElementRef) -> String {
    crate::normalize_whitespace(&element.text().collect::<String>())
}

/// Absolute hrefs are kept as-is, anything else is joined onto `base`.
pub(crate) fn resolve_href(base: &str, href: &str) -> Result<String, ParseError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(ParseError::InvalidLink {
            href: href.to_string(),
            reason: "empty".to_string(),
        });
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return Ok(href.to_string());
    }
    if href.starts_with("//") {
        return Ok(format!("https:{href}"));
    }

    let base = base.trim_end_matches('/');
    if href.starts_with('/') {
        Ok(format!("{base}{href}"))
    } else {
        Ok(format!("{base}/{href}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_href() {
        assert_eq!(
            resolve_href("https://wikicfp.com", "/cfp/servlet/event.showcfp?eventid=1").unwrap(),
            "https://wikicfp.com/cfp/servlet/event.showcfp?eventid=1"
        );
        assert_eq!(
            resolve_href("https://wikicfp.com/", "cfp/x").unwrap(),
            "https://wikicfp.com/cfp/x"
        );
    }

    #[test]
    fn test_resolve_absolute_href_is_kept() {
        assert_eq!(
            resolve_href("https://wikicfp.com", "https://example.org/cfp").unwrap(),
            "https://example.org/cfp"
        );
        assert_eq!(
            resolve_href("https://wikicfp.com", "//example.org/cfp").unwrap(),
            "https://example.org/cfp"
        );
    }

    #[test]
    fn test_resolve_empty_href_fails() {
        assert!(matches!(
            resolve_href("https://wikicfp.com", "  "),
            Err(ParseError::InvalidLink { .. })
        ));
    }
}

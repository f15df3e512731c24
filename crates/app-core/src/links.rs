//! Outbound links
//!
//! Contact, scheduling, résumé and social links are static strings. The
//! only logic here is building `mailto:` URIs and tagging which links open
//! in a new tab.

use serde::{Deserialize, Serialize};

/// What a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Email address
    Email,
    /// Booking page
    Schedule,
    /// Downloadable document
    Document,
    /// Social profile
    Social,
}

/// An outbound link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// What the link points at
    pub kind: LinkKind,
    /// Accessible label
    pub label: String,
    /// Target URI
    pub href: String,
}

impl Link {
    /// Whether the link opens in a new tab
    pub fn opens_new_tab(&self) -> bool {
        matches!(self.kind, LinkKind::Schedule | LinkKind::Social)
    }

    /// `rel` attribute for the anchor
    pub fn rel(&self) -> Option<&'static str> {
        self.opens_new_tab().then_some("noopener noreferrer")
    }

    /// File name offered when downloading a document
    pub fn download_name(&self) -> Option<&str> {
        match self.kind {
            LinkKind::Document => self.href.rsplit('/').next().filter(|name| !name.is_empty()),
            _ => None,
        }
    }
}

/// Build a `mailto:` URI
pub fn mailto(address: &str, subject: Option<&str>) -> String {
    match subject.filter(|s| !s.is_empty()) {
        Some(subject) => format!("mailto:{}?subject={}", address, urlencoding::encode(subject)),
        None => format!("mailto:{}", address),
    }
}

/// Every outbound link on the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    email: Option<Link>,
    schedule: Option<Link>,
    document: Option<Link>,
    social: Vec<Link>,
}

impl Links {
    /// No links
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the contact email
    pub fn email(mut self, address: &str) -> Self {
        self.email = Some(Link {
            kind: LinkKind::Email,
            label: "Email".to_string(),
            href: mailto(address, None),
        });
        self
    }

    /// Set the booking page
    pub fn schedule(mut self, url: &str) -> Self {
        self.schedule = Some(Link {
            kind: LinkKind::Schedule,
            label: "Book a call".to_string(),
            href: url.to_string(),
        });
        self
    }

    /// Set the résumé document
    pub fn document(mut self, label: &str, path: &str) -> Self {
        self.document = Some(Link {
            kind: LinkKind::Document,
            label: label.to_string(),
            href: path.to_string(),
        });
        self
    }

    /// Add a social profile
    pub fn social(mut self, label: &str, url: &str) -> Self {
        self.social.push(Link {
            kind: LinkKind::Social,
            label: label.to_string(),
            href: url.to_string(),
        });
        self
    }

    /// Contact email link
    pub fn email_link(&self) -> Option<&Link> {
        self.email.as_ref()
    }

    /// Quick menu entries: document, booking page, email
    pub fn quick_menu(&self) -> Vec<&Link> {
        [&self.document, &self.schedule, &self.email].into_iter().flatten().collect()
    }

    /// Social profiles in display order
    pub fn social_links(&self) -> &[Link] {
        &self.social
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> Links {
        Links::new()
            .email("hello@example.com")
            .schedule("https://cal.example.com/me")
            .document("Résumé", "/files/resume.pdf")
            .social("X", "https://x.example.com/me")
            .social("LinkedIn", "https://linkedin.example.com/in/me")
    }

    #[test]
    fn test_mailto() {
        assert_eq!(mailto("a@example.com", None), "mailto:a@example.com");
        assert_eq!(mailto("a@example.com", Some("")), "mailto:a@example.com");
        assert_eq!(
            mailto("a@example.com", Some("Project inquiry & more")),
            "mailto:a@example.com?subject=Project%20inquiry%20%26%20more"
        );
    }

    #[test]
    fn test_quick_menu_order() {
        let links = links();
        let kinds: Vec<LinkKind> = links.quick_menu().iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LinkKind::Document, LinkKind::Schedule, LinkKind::Email]);
        assert_eq!(links.email_link().unwrap().href, "mailto:hello@example.com");
    }

    #[test]
    fn test_new_tab_and_rel() {
        let links = links();
        let social = &links.social_links()[0];
        assert!(social.opens_new_tab());
        assert_eq!(social.rel(), Some("noopener noreferrer"));

        let email = links.email_link().unwrap();
        assert!(!email.opens_new_tab());
        assert_eq!(email.rel(), None);
    }

    #[test]
    fn test_download_name() {
        let links = links();
        let document = links.quick_menu()[0];
        assert_eq!(document.download_name(), Some("resume.pdf"));
        assert_eq!(links.social_links()[0].download_name(), None);
    }

    #[test]
    fn test_empty() {
        let links = Links::new();
        assert!(links.quick_menu().is_empty());
        assert!(links.social_links().is_empty());
    }
}

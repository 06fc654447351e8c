/// Capabilities on the storefront admin surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCapability {
    /// Edit site copy (content blocks, the singleton section)
    ManageContent,

    /// Approve, reject and delete product reviews
    ModerateReviews,

    /// Work the returns and replacements queues
    ManageRequests,
}

impl AdminCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminCapability::ManageContent => "manage_content",
            AdminCapability::ModerateReviews => "moderate_reviews",
            AdminCapability::ManageRequests => "manage_requests",
        }
    }
}

impl std::fmt::Display for AdminCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

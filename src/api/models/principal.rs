use std::collections::HashSet;

/// The authenticated caller of a request.
///
/// Built from a validated access token; carries no transport or storage detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    permissions: HashSet<String>,
}

impl Principal {
    pub fn new<I, P>(subject: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            subject: subject.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Granted permissions, sorted for stable logging.
    pub fn permissions(&self) -> Vec<&str> {
        let mut perms: Vec<&str> = self.permissions.iter().map(String::as_str).collect();
        perms.sort_unstable();
        perms
    }
}

use thiserror::Error;

pub type Result<T = (), E = RegistryError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("failed to RegCreateKeyEx: {path}: {reason}")]
    CreateKey { path: String, reason: String },

    #[error("failed to RegSetValueEx: {path}\\{name}: {reason}")]
    SetValue {
        path: String,
        name: String,
        reason: String,
    },

    #[error("failed to RegDeleteKey: {path}: {reason}")]
    DeleteKey { path: String, reason: String },

    #[error("failed to RegOpenKeyEx: {path}: {reason}")]
    OpenKey { path: String, reason: String },

    #[error("failed to RegDeleteValue: {path}\\{name}: {reason}")]
    DeleteValue {
        path: String,
        name: String,
        reason: String,
    },

    #[error("failed to RegQueryValueEx: {path}\\{name}: {reason}")]
    QueryValue {
        path: String,
        name: String,
        reason: String,
    },

    #[error("Unrecognized registry root in path: {0}")]
    UnknownRoot(String),
}

impl RegistryError {
    /// Name of the registry call that failed, or `None` when no call was made.
    #[must_use]
    pub const fn api(&self) -> Option<&'static str> {
        match self {
            Self::CreateKey { .. } => Some("RegCreateKeyEx"),
            Self::SetValue { .. } => Some("RegSetValueEx"),
            Self::DeleteKey { .. } => Some("RegDeleteKey"),
            Self::OpenKey { .. } => Some("RegOpenKeyEx"),
            Self::DeleteValue { .. } => Some("RegDeleteValue"),
            Self::QueryValue { .. } => Some("RegQueryValueEx"),
            Self::UnknownRoot(_) => None,
        }
    }

    /// Short text for dialogs, without path or OS detail.
    pub fn summary(&self) -> String {
        match self.api() {
            Some(api) => format!("failed to {api}"),
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_bare_api_text() {
        let err = RegistryError::SetValue {
            path: r"HKCU\Software\Test".into(),
            name: "Sample".into(),
            reason: "Access is denied.".into(),
        };
        assert_eq!(err.summary(), "failed to RegSetValueEx");
        assert_eq!(
            err.to_string(),
            r"failed to RegSetValueEx: HKCU\Software\Test\Sample: Access is denied."
        );
    }

    #[test]
    fn test_summary_for_each_call() {
        let path = String::from(r"HKCU\X");
        let reason = String::from("boom");
        let name = String::from("V");
        let cases = [
            (
                RegistryError::CreateKey {
                    path: path.clone(),
                    reason: reason.clone(),
                },
                "failed to RegCreateKeyEx",
            ),
            (
                RegistryError::DeleteKey {
                    path: path.clone(),
                    reason: reason.clone(),
                },
                "failed to RegDeleteKey",
            ),
            (
                RegistryError::OpenKey {
                    path: path.clone(),
                    reason: reason.clone(),
                },
                "failed to RegOpenKeyEx",
            ),
            (
                RegistryError::DeleteValue {
                    path,
                    name,
                    reason,
                },
                "failed to RegDeleteValue",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.summary(), expected);
        }
    }

    #[test]
    fn test_unknown_root_has_no_api() {
        let err = RegistryError::UnknownRoot(r"HKU\.DEFAULT".into());
        assert_eq!(err.api(), None);
        assert_eq!(
            err.summary(),
            r"Unrecognized registry root in path: HKU\.DEFAULT"
        );
    }
}

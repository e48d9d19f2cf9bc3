//! Registry path parsing - root prefix selection and stripping.

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level registry namespace a path is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Root {
    /// HKEY_CURRENT_USER
    CurrentUser,
    /// HKEY_LOCAL_MACHINE
    LocalMachine,
    /// HKEY_CLASSES_ROOT
    ClassesRoot,
}

impl Root {
    /// Roots in prefix match order.
    pub const ALL: [Root; 3] = [Root::CurrentUser, Root::LocalMachine, Root::ClassesRoot];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Root::CurrentUser => "HKCU",
            Root::LocalMachine => "HKLM",
            Root::ClassesRoot => "HKCR",
        }
    }

    /// Literal five character prefix, separator included.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Root::CurrentUser => "HKCU\\",
            Root::LocalMachine => "HKLM\\",
            Root::ClassesRoot => "HKCR\\",
        }
    }

    /// Match the head of `path` against the known prefixes.
    ///
    /// Comparison is case-sensitive. Returns the root and the remainder of
    /// the path with the prefix removed.
    #[must_use]
    pub fn split_prefix(path: &str) -> Option<(Root, &str)> {
        Self::ALL
            .iter()
            .find_map(|root| path.strip_prefix(root.prefix()).map(|rest| (*root, rest)))
    }

    /// Predefined handle for this root. Never closed.
    #[cfg(windows)]
    #[must_use]
    pub fn predef(&self) -> winreg::RegKey {
        use winreg::enums::{HKEY_CLASSES_ROOT, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

        winreg::RegKey::predef(match self {
            Root::CurrentUser => HKEY_CURRENT_USER,
            Root::LocalMachine => HKEY_LOCAL_MACHINE,
            Root::ClassesRoot => HKEY_CLASSES_ROOT,
        })
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path split into its root and the subkey below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegPath<'a> {
    pub root: Root,
    pub subkey: &'a str,
}

impl fmt::Display for RegPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}", self.root, self.subkey)
    }
}

/// What to do with a path that carries no recognized root prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootPolicy {
    /// Resolve to HKCU and keep the whole path as the subkey.
    #[default]
    DefaultToCurrentUser,
    /// Reject the path with [`RegistryError::UnknownRoot`].
    RequirePrefix,
}

impl RootPolicy {
    /// Resolve `path` into a root and subkey.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownRoot`] under [`RootPolicy::RequirePrefix`]
    /// when the path does not start with a known prefix.
    pub fn resolve(self, path: &str) -> Result<RegPath<'_>> {
        match (Root::split_prefix(path), self) {
            (Some((root, subkey)), _) => Ok(RegPath { root, subkey }),
            (None, RootPolicy::DefaultToCurrentUser) => Ok(RegPath {
                root: Root::CurrentUser,
                subkey: path,
            }),
            (None, RootPolicy::RequirePrefix) => Err(RegistryError::UnknownRoot(path.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r"HKCU\Software\Test", Root::CurrentUser, r"Software\Test")]
    #[case(r"HKLM\System\Test", Root::LocalMachine, r"System\Test")]
    #[case(r"HKCR\.txt", Root::ClassesRoot, ".txt")]
    #[case("HKLM\\", Root::LocalMachine, "")]
    fn test_prefix_selects_root_and_is_stripped(
        #[case] input: &str,
        #[case] root: Root,
        #[case] subkey: &str,
    ) {
        for policy in [RootPolicy::DefaultToCurrentUser, RootPolicy::RequirePrefix] {
            assert_eq!(policy.resolve(input), Ok(RegPath { root, subkey }));
        }
    }

    #[rstest]
    #[case(r"Software\Test")]
    #[case("")]
    #[case("HKL")]
    #[case("HKLM")]
    #[case(r"hklm\System")]
    #[case("HKLM/System")]
    #[case(r"HKU\.DEFAULT")]
    #[case(r"HKEY_LOCAL_MACHINE\System")]
    fn test_unmatched_path_falls_back_to_current_user(#[case] input: &str) {
        let resolved = RootPolicy::DefaultToCurrentUser.resolve(input).unwrap();
        assert_eq!(resolved.root, Root::CurrentUser);
        assert_eq!(resolved.subkey, input);
    }

    #[rstest]
    #[case(r"Software\Test")]
    #[case("HK")]
    #[case(r"hkcu\Software")]
    fn test_unmatched_path_rejected_when_prefix_required(#[case] input: &str) {
        assert_eq!(
            RootPolicy::RequirePrefix.resolve(input),
            Err(RegistryError::UnknownRoot(input.to_string()))
        );
    }

    #[test]
    fn test_only_first_prefix_is_stripped() {
        let resolved = RootPolicy::default().resolve(r"HKCU\HKLM\Nested").unwrap();
        assert_eq!(resolved.root, Root::CurrentUser);
        assert_eq!(resolved.subkey, r"HKLM\Nested");
    }

    #[test]
    fn test_display_restores_prefix() {
        let resolved = RootPolicy::default().resolve(r"Software\Test").unwrap();
        assert_eq!(resolved.to_string(), r"HKCU\Software\Test");
    }

    #[test]
    fn test_prefixes_are_five_chars() {
        for root in Root::ALL {
            assert_eq!(root.prefix().len(), 5);
            assert!(root.prefix().starts_with(root.as_str()));
        }
    }
}

//! Registry operations - create/open keys, write, query and delete values.
//!
//! Key lifetimes are handled by `winreg::RegKey`, which closes its handle on
//! drop. Value data goes through `RegSetValueExW`/`RegQueryValueExW` directly
//! so any type tag can be written and read back unchanged.

use crate::error::{RegistryError, Result};
use crate::path::{RegPath, RootPolicy};
use crate::value::{Payload, RawValue, ValueType};
use tracing::{debug, instrument};
use windows::core::PCWSTR;
use windows::Win32::System::Registry::{RegQueryValueExW, RegSetValueExW, HKEY, REG_VALUE_TYPE};
use winreg::enums::{RegDisposition, KEY_ALL_ACCESS, KEY_READ, KEY_WRITE};
use winreg::RegKey;

/// Entry point for registry operations. Holds only configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registry {
    policy: RootPolicy,
}

impl Registry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policy: RootPolicy::DefaultToCurrentUser,
        }
    }

    #[must_use]
    pub const fn with_policy(policy: RootPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> RootPolicy {
        self.policy
    }

    /// Create the key chain under `path` if needed and write one value.
    ///
    /// The key is opened non-volatile with write access. `vtype` is written
    /// as given, without checking it against the payload.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CreateKey`] if the key cannot be created or
    /// opened, [`RegistryError::SetValue`] if the value cannot be written or
    /// `name` contains a NUL character.
    #[instrument(skip(self, value))]
    pub fn write_value<P>(&self, path: &str, name: &str, value: &P, vtype: ValueType) -> Result
    where
        P: Payload + ?Sized,
    {
        let target = self.policy.resolve(path)?;
        let name_wide = value_name(name).map_err(|reason| RegistryError::SetValue {
            path: target.to_string(),
            name: name.to_string(),
            reason,
        })?;
        let (key, disposition) = target
            .root
            .predef()
            .create_subkey_with_flags(target.subkey, KEY_WRITE)
            .map_err(|e| RegistryError::CreateKey {
                path: target.to_string(),
                reason: e.to_string(),
            })?;

        let bytes = value.to_reg_bytes();

        // SAFETY: `key` stays open for the call and `name_wide` is NUL-terminated.
        unsafe {
            RegSetValueExW(
                raw_handle(&key),
                PCWSTR(name_wide.as_ptr()),
                Some(0),
                REG_VALUE_TYPE(vtype.as_raw()),
                Some(&bytes),
            )
        }
        .ok()
        .map_err(|e| RegistryError::SetValue {
            path: target.to_string(),
            name: name.to_string(),
            reason: e.message(),
        })?;

        debug!(
            created = matches!(disposition, RegDisposition::REG_CREATED_NEW_KEY),
            len = bytes.len(),
            "Value written"
        );
        Ok(())
    }

    /// Write a string value. The stored bytes include the terminator.
    ///
    /// # Errors
    ///
    /// See [`Registry::write_value`].
    pub fn write_text(&self, path: &str, name: &str, text: &str, vtype: ValueType) -> Result {
        self.write_value(path, name, text, vtype)
    }

    /// Write a 32-bit integer value.
    ///
    /// # Errors
    ///
    /// See [`Registry::write_value`].
    pub fn write_dword(&self, path: &str, name: &str, value: u32, vtype: ValueType) -> Result {
        self.write_value(path, name, &value, vtype)
    }

    /// Delete the leaf key at `path`. Keys with subkeys are not deleted.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DeleteKey`] if the key is missing, has
    /// subkeys, or access is denied.
    #[instrument(skip(self))]
    pub fn delete_key(&self, path: &str) -> Result {
        let target = self.policy.resolve(path)?;
        target
            .root
            .predef()
            .delete_subkey(target.subkey)
            .map_err(|e| RegistryError::DeleteKey {
                path: target.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Key deleted");
        Ok(())
    }

    /// Delete one named value, leaving the key and its other values in place.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OpenKey`] if the key cannot be opened with
    /// full access, [`RegistryError::DeleteValue`] if the value is missing,
    /// cannot be removed, or `name` contains a NUL character.
    #[instrument(skip(self))]
    pub fn delete_value(&self, path: &str, name: &str) -> Result {
        let target = self.policy.resolve(path)?;
        let delete_failed = |reason: String| RegistryError::DeleteValue {
            path: target.to_string(),
            name: name.to_string(),
            reason,
        };
        value_name(name).map_err(delete_failed)?;
        let key = open(&target, KEY_ALL_ACCESS)?;

        key.delete_value(name)
            .map_err(|e| delete_failed(e.to_string()))?;

        debug!("Value deleted");
        Ok(())
    }

    /// Read a value's type tag and raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OpenKey`] if the key cannot be opened,
    /// [`RegistryError::QueryValue`] if the value is missing or `name`
    /// contains a NUL character.
    #[instrument(skip(self))]
    pub fn query_value(&self, path: &str, name: &str) -> Result<RawValue> {
        let target = self.policy.resolve(path)?;
        let query_failed = |reason: String| RegistryError::QueryValue {
            path: target.to_string(),
            name: name.to_string(),
            reason,
        };
        let name_wide = value_name(name).map_err(query_failed)?;
        let key = open(&target, KEY_READ)?;
        let hkey = raw_handle(&key);

        let mut vtype = REG_VALUE_TYPE::default();
        let mut size = 0u32;

        // SAFETY: size probe, no data buffer. `name_wide` is NUL-terminated.
        unsafe {
            RegQueryValueExW(
                hkey,
                PCWSTR(name_wide.as_ptr()),
                None,
                Some(&raw mut vtype),
                None,
                Some(&raw mut size),
            )
        }
        .ok()
        .map_err(|e| query_failed(e.message()))?;

        let mut bytes = vec![0u8; size as usize];

        // SAFETY: `bytes` holds `size` bytes, the length reported by the probe.
        unsafe {
            RegQueryValueExW(
                hkey,
                PCWSTR(name_wide.as_ptr()),
                None,
                Some(&raw mut vtype),
                Some(bytes.as_mut_ptr()),
                Some(&raw mut size),
            )
        }
        .ok()
        .map_err(|e| query_failed(e.message()))?;

        bytes.truncate(size as usize);
        Ok(RawValue {
            vtype: ValueType::from_raw(vtype.0),
            bytes,
        })
    }
}

fn open(target: &RegPath<'_>, access: u32) -> Result<RegKey> {
    target
        .root
        .predef()
        .open_subkey_with_flags(target.subkey, access)
        .map_err(|e| RegistryError::OpenKey {
            path: target.to_string(),
            reason: e.to_string(),
        })
}

fn raw_handle(key: &RegKey) -> HKEY {
    HKEY(key.raw_handle() as _)
}

/// NUL-terminated UTF-16 value name. Interior NULs would silently cut
/// the name short, so they are rejected.
fn value_name(name: &str) -> std::result::Result<Vec<u16>, String> {
    if name.contains('\0') {
        return Err(format!("value name contains a NUL character: {name:?}"));
    }
    Ok(name.encode_utf16().chain(Some(0)).collect())
}

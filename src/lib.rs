pub mod error;
pub mod path;
pub mod report;
pub mod value;

#[cfg(windows)]
pub mod registry;
#[cfg(windows)]
pub mod wrapper;

// Public API surface for consumers

pub use crate::error::{RegistryError, Result};
pub use crate::path::{RegPath, Root, RootPolicy};
pub use crate::report::Reporter;
pub use crate::value::{Payload, RawValue, ValueType};

#[cfg(windows)]
pub use crate::registry::Registry;
#[cfg(windows)]
pub use crate::wrapper::Wrapper;

pub mod prelude {
    pub use crate::error::{RegistryError, Result};
    pub use crate::path::{Root, RootPolicy};
    pub use crate::report::Reporter;
    pub use crate::value::{Payload, RawValue, ValueType};

    #[cfg(windows)]
    pub use crate::registry::Registry;
    #[cfg(windows)]
    pub use crate::wrapper::Wrapper;
}

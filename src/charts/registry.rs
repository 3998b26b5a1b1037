//! Process-wide chart defaults.
//!
//! Registered once while the application boots; every view created
//! afterwards starts from these options.

use crate::charts::options::ChartOptions;
use once_cell::sync::OnceCell;
use thiserror::Error;

static DEFAULTS: OnceCell<ChartOptions> = OnceCell::new();

#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("Chart defaults were already registered")]
    AlreadyRegistered,
}

/// Install the chart defaults. Fails if they were already set, or if
/// [`options`] was read before registration.
pub fn register(options: ChartOptions) -> Result<(), RegistryError> {
    DEFAULTS
        .set(options)
        .map_err(|_| RegistryError::AlreadyRegistered)
}

/// The registered defaults, or the built-in ones if nothing was registered.
pub fn options() -> &'static ChartOptions {
    DEFAULTS.get_or_init(ChartOptions::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_at_most_once() {
        let mut custom = ChartOptions::default();
        custom.legend_display = true;

        // Whatever happened first in this process, the registry is now fixed
        let _ = register(custom.clone());
        let current = options().clone();
        assert_eq!(register(custom), Err(RegistryError::AlreadyRegistered));
        assert_eq!(options(), &current);
    }
}

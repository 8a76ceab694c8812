//! [`Config`] of a [`DataTable`].
//!
//! [`DataTable`]: super::DataTable

use std::time;

use smart_default::SmartDefault;

/// [`DataTable`] configuration.
///
/// [`DataTable`]: super::DataTable
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Pause in search input after which the search is performed.
    #[default(time::Duration::from_millis(300))]
    pub debounce: time::Duration,

    /// Initial number of records per page.
    #[default(10)]
    pub page_size: u32,
}

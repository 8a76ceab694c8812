//! [`Entity`] catalogue of the back-office.

use clap::ValueEnum;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

/// Kind of records browsable in the back-office.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    PartialEq,
    ValueEnum,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Entity {
    /// Metered products.
    Products,

    /// Criticality levels of installations.
    CriticalityTypes,

    /// Types of metering equipment.
    EquipmentTypes,

    /// Sites where equipment is installed.
    Locations,

    /// Back-office users.
    Users,

    /// Equipment installed at locations.
    Installations,
}

impl Entity {
    /// Returns path of the list endpoint of this [`Entity`], relative to the
    /// API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Products => "api/products/",
            Self::CriticalityTypes => "api/criticality-types/",
            Self::EquipmentTypes => "api/equipment-types/",
            Self::Locations => "api/locations/",
            Self::Users => "api/users/",
            Self::Installations => "api/installations/",
        }
    }

    /// Returns path of the single record with the provided `id`.
    #[must_use]
    pub fn record_path(self, id: &str) -> String {
        format!("{}{id}/", self.path())
    }

    /// Returns [`Column`]s displayed for this [`Entity`].
    #[must_use]
    pub const fn columns(self) -> &'static [Column] {
        match self {
            Self::Products => &[
                Column {
                    key: "id",
                    title: "ID",
                },
                Column {
                    key: "name",
                    title: "Name",
                },
                Column {
                    key: "code",
                    title: "Code",
                },
                Column {
                    key: "description",
                    title: "Description",
                },
                Column {
                    key: "created_at",
                    title: "Created",
                },
            ],
            Self::CriticalityTypes => &[
                Column {
                    key: "id",
                    title: "ID",
                },
                Column {
                    key: "name",
                    title: "Name",
                },
                Column {
                    key: "level",
                    title: "Level",
                },
                Column {
                    key: "description",
                    title: "Description",
                },
            ],
            Self::EquipmentTypes => &[
                Column {
                    key: "id",
                    title: "ID",
                },
                Column {
                    key: "name",
                    title: "Name",
                },
                Column {
                    key: "manufacturer",
                    title: "Manufacturer",
                },
                Column {
                    key: "model",
                    title: "Model",
                },
            ],
            Self::Locations => &[
                Column {
                    key: "id",
                    title: "ID",
                },
                Column {
                    key: "name",
                    title: "Name",
                },
                Column {
                    key: "address",
                    title: "Address",
                },
                Column {
                    key: "is_active",
                    title: "Active",
                },
            ],
            Self::Users => &[
                Column {
                    key: "id",
                    title: "ID",
                },
                Column {
                    key: "username",
                    title: "Username",
                },
                Column {
                    key: "email",
                    title: "Email",
                },
                Column {
                    key: "role",
                    title: "Role",
                },
                Column {
                    key: "last_login",
                    title: "Last login",
                },
            ],
            Self::Installations => &[
                Column {
                    key: "id",
                    title: "ID",
                },
                Column {
                    key: "serial_number",
                    title: "Serial number",
                },
                Column {
                    key: "location.name",
                    title: "Location",
                },
                Column {
                    key: "equipment_type.name",
                    title: "Equipment type",
                },
                Column {
                    key: "criticality.name",
                    title: "Criticality",
                },
                Column {
                    key: "installed_at",
                    title: "Installed",
                },
            ],
        }
    }

    /// Returns pairs of filters where changing the first one invalidates
    /// the second one.
    #[must_use]
    pub const fn filter_chain(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Installations => &[("location", "equipment_type")],
            Self::Products
            | Self::CriticalityTypes
            | Self::EquipmentTypes
            | Self::Locations
            | Self::Users => &[],
        }
    }
}

/// Displayed column of a record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Column {
    /// Dot-separated path of the displayed field.
    pub key: &'static str,

    /// Human-readable title of the column.
    pub title: &'static str,
}

impl Column {
    /// Creates a new [`Column`].
    #[must_use]
    pub const fn new(key: &'static str, title: &'static str) -> Self {
        Self { key, title }
    }

    /// Looks up the value of this [`Column`] in the provided `record`.
    #[must_use]
    pub fn lookup<'v>(&self, record: &'v Value) -> Option<&'v Value> {
        self.key
            .split('.')
            .try_fold(record, |value, field| value.get(field))
    }
}

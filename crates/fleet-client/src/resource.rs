//! REST resources exposed by the fleet backend

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Drivers,
    Vehicles,
    Devices,
    FareSchemes,
    PromoCodes,
    CorporateAccounts,
    Users,
    Roles,
    Sms,
    Bookings,
    BookingsReport,
    DriverActivityReport,
    VehicleListingReport,
    VehicleMakesReport,
    VehicleModelsReport,
    VehicleOwnersReport,
}

impl Resource {
    pub const ALL: [Resource; 16] = [
        Resource::Drivers,
        Resource::Vehicles,
        Resource::Devices,
        Resource::FareSchemes,
        Resource::PromoCodes,
        Resource::CorporateAccounts,
        Resource::Users,
        Resource::Roles,
        Resource::Sms,
        Resource::Bookings,
        Resource::BookingsReport,
        Resource::DriverActivityReport,
        Resource::VehicleListingReport,
        Resource::VehicleMakesReport,
        Resource::VehicleModelsReport,
        Resource::VehicleOwnersReport,
    ];

    /// Collection endpoint, relative to the API base URL.
    pub fn api_path(self) -> &'static str {
        match self {
            Resource::Drivers => "/api/drivers",
            Resource::Vehicles => "/api/vehicles",
            Resource::Devices => "/api/devices",
            Resource::FareSchemes => "/api/fare-schemes",
            Resource::PromoCodes => "/api/promo-codes",
            Resource::CorporateAccounts => "/api/corporate-accounts",
            Resource::Users => "/api/users",
            Resource::Roles => "/api/roles",
            Resource::Sms => "/api/sms",
            Resource::Bookings => "/api/bookings",
            Resource::BookingsReport => "/api/reports/bookings",
            Resource::DriverActivityReport => "/api/reports/driver-activity",
            Resource::VehicleListingReport => "/api/reports/vehicles",
            Resource::VehicleMakesReport => "/api/reports/vehicle-makes",
            Resource::VehicleModelsReport => "/api/reports/vehicle-models",
            Resource::VehicleOwnersReport => "/api/reports/vehicle-owners",
        }
    }

    /// Console route showing this resource; access checks run against it.
    pub fn page_path(self) -> &'static str {
        match self {
            Resource::Drivers => "/admin/drivers",
            Resource::Vehicles => "/admin/vehicles",
            Resource::Devices => "/admin/devices",
            Resource::FareSchemes => "/admin/fare-schemes",
            Resource::PromoCodes => "/admin/promo-codes",
            Resource::CorporateAccounts => "/admin/corporate-accounts",
            Resource::Users => "/admin/users",
            Resource::Roles => "/admin/roles",
            Resource::Sms => "/admin/sms",
            Resource::Bookings | Resource::BookingsReport => "/admin/reports/bookings",
            Resource::DriverActivityReport => "/admin/reports/driver-activity",
            Resource::VehicleListingReport => "/admin/reports/vehicles",
            Resource::VehicleMakesReport => "/admin/reports/vehicle-makes",
            Resource::VehicleModelsReport => "/admin/reports/vehicle-models",
            Resource::VehicleOwnersReport => "/admin/reports/vehicle-owners",
        }
    }

    pub fn item_path(self, id: impl fmt::Display) -> String {
        format!("{}/{}", self.api_path(), id)
    }

    /// Short name used on the command line, e.g. `fare-schemes`.
    pub fn name(self) -> &'static str {
        self.api_path()
            .trim_start_matches("/api/")
            .trim_start_matches("reports/")
    }

    fn is_report(self) -> bool {
        self.api_path().starts_with("/api/reports/")
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_report() {
            write!(f, "reports/{}", self.name())
        } else {
            f.write_str(self.name())
        }
    }
}

impl FromStr for Resource {
    type Err = ClientError;

    /// Accepts `drivers` or `reports/driver-activity`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_matches('/').to_ascii_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| r.to_string() == wanted)
            .ok_or_else(|| ClientError::UnknownResource(s.to_string()))
    }
}

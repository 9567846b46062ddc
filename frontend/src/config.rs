//! Build-time configuration (`IDENTITY_API_URL=… trunk build` overrides a default).

use log::Level;

use crate::api::Service;

const IDENTITY_URL: &str = "https://user-service-car-management-production.up.railway.app/api";
const BILLING_URL: &str = "https://reservations-and-bills-services-production.up.railway.app/api";
const INVENTORY_URL: &str = "https://cloud-computing-uaic-production.up.railway.app";

/// Base URL of each remote service, without trailing slash.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceUrls {
    identity: String,
    billing: String,
    inventory: String,
}

impl ServiceUrls {
    pub fn new(identity: &str, billing: &str, inventory: &str) -> Self {
        let clean = |url: &str| url.trim().trim_end_matches('/').to_string();
        Self {
            identity: clean(identity),
            billing: clean(billing),
            inventory: clean(inventory),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            option_env!("IDENTITY_API_URL").unwrap_or(IDENTITY_URL),
            option_env!("BILLING_API_URL").unwrap_or(BILLING_URL),
            option_env!("INVENTORY_API_URL").unwrap_or(INVENTORY_URL),
        )
    }

    pub fn base(&self, service: Service) -> &str {
        match service {
            Service::Identity => &self.identity,
            Service::Billing => &self.billing,
            Service::Inventory => &self.inventory,
        }
    }
}

impl Default for ServiceUrls {
    fn default() -> Self {
        Self::from_env()
    }
}

pub fn log_level() -> Level {
    option_env!("LOG_LEVEL")
        .and_then(|level| level.parse().ok())
        .unwrap_or(Level::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let urls = ServiceUrls::new("https://id.test/api/", " https://bill.test/api", "https://cars.test//");

        assert_eq!(urls.base(Service::Identity), "https://id.test/api");
        assert_eq!(urls.base(Service::Billing), "https://bill.test/api");
        assert_eq!(urls.base(Service::Inventory), "https://cars.test");
    }
}

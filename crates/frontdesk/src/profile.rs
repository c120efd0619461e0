//! Hotel identity shown on statements and notifications.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelProfile {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub stars: u8,
}

impl Default for HotelProfile {
    fn default() -> Self {
        Self {
            name: "Hotel Premium".to_owned(),
            address: "Calle Principal 123".to_owned(),
            phone: "+57 300 123 4567".to_owned(),
            email: "contacto@hotelpremium.com".to_owned(),
            stars: 5,
        }
    }
}

//! Deterministic room catalog.
//!
//! The catalog is regenerated identically at every process start; there
//! is no durable storage behind it.

use serde::{Deserialize, Serialize};

use posada_core::{Money, ProductId, RoomId, SequenceGenerator};

use crate::minibar::{Minibar, MinibarProduct, ProductCategory};
use crate::room::{BedType, Room, RoomKind};

/// Catalog configuration. The default carries the fixed hotel layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSpec {
    pub first_single_floor: u8,
    pub last_single_floor: u8,
    pub singles_per_floor: u8,
    pub executive_rooms: u8,
    pub suite_rooms: u8,
    pub single_price: Money,
    pub executive_price: Money,
    pub suite_price: Money,
}

impl Default for CatalogSpec {
    fn default() -> Self {
        Self {
            first_single_floor: 2,
            last_single_floor: 4,
            singles_per_floor: 10,
            executive_rooms: 10,
            suite_rooms: 5,
            single_price: Money::new(200_000),
            executive_price: Money::new(350_000),
            suite_price: Money::new(500_000),
        }
    }
}

/// Build every room of the configured catalog, in order, drawing ids from the
/// inventory's sequence.
pub(crate) fn build_rooms(catalog: &CatalogSpec, seq: &SequenceGenerator) -> Vec<Room> {
    let mut rooms = Vec::new();

    for floor in catalog.first_single_floor..=catalog.last_single_floor {
        for index in 1..=catalog.singles_per_floor {
            let (bed_type, bed_count) = if index % 2 == 0 {
                (BedType::Double, 1)
            } else {
                (BedType::Single, 2)
            };
            rooms.push(Room::new(
                RoomId::new(seq.next_id()),
                format!("{floor}{index:02}"),
                RoomKind::Single,
                catalog.single_price,
                bed_type,
                bed_count,
                format!("Standard single room on floor {floor}"),
                None,
            ));
        }
    }

    for index in 1..=catalog.executive_rooms {
        let (bed_type, bed_count) = if index % 2 == 0 {
            (BedType::Queen, 1)
        } else {
            (BedType::SemiDouble, 2)
        };
        rooms.push(Room::new(
            RoomId::new(seq.next_id()),
            format!("5{index:02}"),
            RoomKind::Executive,
            catalog.executive_price,
            bed_type,
            bed_count,
            "Executive room with minibar".to_owned(),
            Some(Minibar::stocked(standard_products())),
        ));
    }

    for index in 1..=catalog.suite_rooms {
        let (bed_type, bed_count) = if index % 2 == 0 {
            (BedType::King, 1)
        } else {
            (BedType::Queen, 2)
        };
        let mut products = standard_products();
        products.extend(premium_products());
        rooms.push(Room::new(
            RoomId::new(seq.next_id()),
            format!("6{index:02}"),
            RoomKind::Suite,
            catalog.suite_price,
            bed_type,
            bed_count,
            "Luxury suite with a fully stocked minibar".to_owned(),
            Some(Minibar::stocked(products)),
        ));
    }

    rooms
}

/// Base stock seeded into every minibar-capable room.
fn standard_products() -> Vec<MinibarProduct> {
    vec![
        MinibarProduct::new(
            ProductId::new(1),
            "Still water",
            ProductCategory::Water,
            Money::new(3_000),
            4,
        ),
        MinibarProduct::new(
            ProductId::new(2),
            "Sparkling water",
            ProductCategory::Water,
            Money::new(3_500),
            2,
        ),
        MinibarProduct::new(
            ProductId::new(3),
            "Cola",
            ProductCategory::Soda,
            Money::new(4_000),
            3,
        ),
        MinibarProduct::new(
            ProductId::new(4),
            "Lemon soda",
            ProductCategory::Soda,
            Money::new(4_000),
            3,
        ),
        MinibarProduct::new(
            ProductId::new(5),
            "Orange juice",
            ProductCategory::Juice,
            Money::new(5_000),
            2,
        ),
        MinibarProduct::new(
            ProductId::new(6),
            "Apple juice",
            ProductCategory::Juice,
            Money::new(5_000),
            2,
        ),
        MinibarProduct::new(
            ProductId::new(7),
            "Potato chips",
            ProductCategory::Snack,
            Money::new(6_000),
            3,
        ),
        MinibarProduct::new(
            ProductId::new(8),
            "Peanuts",
            ProductCategory::Snack,
            Money::new(5_000),
            3,
        ),
        MinibarProduct::new(
            ProductId::new(9),
            "Chocolate bar",
            ProductCategory::Snack,
            Money::new(7_000),
            2,
        ),
    ]
}

/// Premium additions for suite minibars.
fn premium_products() -> Vec<MinibarProduct> {
    vec![
        MinibarProduct::new(
            ProductId::new(10),
            "Red wine",
            ProductCategory::Wine,
            Money::new(45_000),
            2,
        ),
        MinibarProduct::new(
            ProductId::new(11),
            "White wine",
            ProductCategory::Wine,
            Money::new(45_000),
            2,
        ),
        MinibarProduct::new(
            ProductId::new(12),
            "Whisky",
            ProductCategory::Liquor,
            Money::new(80_000),
            1,
        ),
        MinibarProduct::new(
            ProductId::new(13),
            "Vodka",
            ProductCategory::Liquor,
            Money::new(70_000),
            1,
        ),
        MinibarProduct::new(
            ProductId::new(14),
            "Champagne",
            ProductCategory::Sparkling,
            Money::new(120_000),
            1,
        ),
    ]
}

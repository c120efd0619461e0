//! Room model: a tagged variant with capability flags per kind.

use serde::{Deserialize, Serialize};

use posada_core::{AggregateRoot, DomainError, DomainResult, Entity, Money, RoomId};

use crate::minibar::Minibar;

/// Room kind. Capabilities are functions of the kind, never of runtime
/// inspection of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Single,
    Executive,
    Suite,
}

impl RoomKind {
    /// Whether rooms of this kind carry an in-room minibar.
    pub fn has_minibar(&self) -> bool {
        matches!(self, RoomKind::Executive | RoomKind::Suite)
    }

    /// Whether rooms of this kind sell bathrobes.
    pub fn sells_robes(&self) -> bool {
        matches!(self, RoomKind::Executive | RoomKind::Suite)
    }

    /// Whether the minibar is stocked with the premium set as well.
    pub fn premium_minibar(&self) -> bool {
        matches!(self, RoomKind::Suite)
    }
}

impl core::fmt::Display for RoomKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            RoomKind::Single => "single",
            RoomKind::Executive => "executive",
            RoomKind::Suite => "suite",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BedType {
    Single,
    SemiDouble,
    Double,
    Queen,
    King,
}

impl core::fmt::Display for BedType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            BedType::Single => "single",
            BedType::SemiDouble => "semi-double",
            BedType::Double => "double",
            BedType::Queen => "queen",
            BedType::King => "king",
        })
    }
}

/// Availability state of one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    Available,
    Reserved,
}

/// Aggregate root: Room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    number: String,
    kind: RoomKind,
    price_per_night: Money,
    bed_type: BedType,
    bed_count: u8,
    description: String,
    state: RoomState,
    minibar: Option<Minibar>,
    version: u64,
}

impl Room {
    pub(crate) fn new(
        id: RoomId,
        number: String,
        kind: RoomKind,
        price_per_night: Money,
        bed_type: BedType,
        bed_count: u8,
        description: String,
        minibar: Option<Minibar>,
    ) -> Self {
        // The minibar slot exists only for capable kinds.
        let minibar = if kind.has_minibar() { minibar } else { None };
        Self {
            id,
            number,
            kind,
            price_per_night,
            bed_type,
            bed_count,
            description,
            state: RoomState::Available,
            minibar,
            version: 1,
        }
    }

    pub fn id_typed(&self) -> RoomId {
        self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn kind(&self) -> RoomKind {
        self.kind
    }

    pub fn price_per_night(&self) -> Money {
        self.price_per_night
    }

    pub fn bed_type(&self) -> BedType {
        self.bed_type
    }

    pub fn bed_count(&self) -> u8 {
        self.bed_count
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn is_available(&self) -> bool {
        self.state == RoomState::Available
    }

    pub fn minibar(&self) -> Option<&Minibar> {
        self.minibar.as_ref()
    }

    pub(crate) fn minibar_mut(&mut self) -> Option<&mut Minibar> {
        self.minibar.as_mut()
    }

    pub fn set_price_per_night(&mut self, price: Money) {
        self.price_per_night = price;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub(crate) fn reserve(&mut self) -> DomainResult<()> {
        if self.state != RoomState::Available {
            return Err(DomainError::conflict(format!(
                "room {} is not available",
                self.number
            )));
        }
        self.state = RoomState::Reserved;
        self.touch();
        Ok(())
    }

    pub(crate) fn release(&mut self) {
        self.state = RoomState::Available;
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.version += 1;
    }
}

impl Entity for Room {
    type Id = RoomId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Room {
    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(id: u64) -> Room {
        Room::new(
            RoomId::new(id),
            "201".to_owned(),
            RoomKind::Single,
            Money::new(200_000),
            BedType::Double,
            1,
            "Standard single room on floor 2".to_owned(),
            None,
        )
    }

    #[test]
    fn capabilities_follow_the_kind() {
        assert!(!RoomKind::Single.has_minibar());
        assert!(!RoomKind::Single.sells_robes());
        assert!(RoomKind::Executive.has_minibar());
        assert!(RoomKind::Executive.sells_robes());
        assert!(!RoomKind::Executive.premium_minibar());
        assert!(RoomKind::Suite.has_minibar());
        assert!(RoomKind::Suite.premium_minibar());
    }

    #[test]
    fn a_single_room_never_gets_a_minibar_slot() {
        let room = Room::new(
            RoomId::new(1),
            "201".to_owned(),
            RoomKind::Single,
            Money::new(200_000),
            BedType::Double,
            1,
            String::new(),
            Some(Minibar::stocked(Vec::new())),
        );
        assert!(room.minibar().is_none());
    }

    #[test]
    fn reserve_moves_available_to_reserved_once() {
        let mut room = single(1);
        assert!(room.is_available());

        room.reserve().unwrap();
        assert_eq!(room.state(), RoomState::Reserved);

        let err = room.reserve().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn release_is_unconditional() {
        let mut room = single(1);
        room.release();
        assert!(room.is_available());

        room.reserve().unwrap();
        room.release();
        assert!(room.is_available());
    }

    #[test]
    fn mutations_bump_the_version() {
        let mut room = single(1);
        let initial = room.version();
        room.reserve().unwrap();
        room.release();
        assert_eq!(room.version(), initial + 2);
    }
}

//! Room inventory: the authoritative room map plus its lock.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use posada_core::{AggregateRoot, DomainError, DomainResult, RoomId, SequenceGenerator};
use posada_events::AuditSink;

use crate::catalog::{CatalogSpec, build_rooms};
use crate::room::{Room, RoomKind};

/// Owns the room catalog and per-room availability state.
///
/// All mutation happens under one write lock, so every operation is
/// atomic with respect to concurrent callers. Operations that also touch
/// a reservation acquire this lock **first** (see
/// [`RoomInventory::lock_exclusive`]).
pub struct RoomInventory {
    rooms: RwLock<BTreeMap<RoomId, Room>>,
    seq: SequenceGenerator,
    audit: Arc<dyn AuditSink>,
}

impl RoomInventory {
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self {
            rooms: RwLock::new(BTreeMap::new()),
            seq: SequenceGenerator::new(),
            audit,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<RoomId, Room>> {
        // Mutations are validated before applied; a guard recovered from
        // poisoning still holds a consistent map.
        self.rooms.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<RoomId, Room>> {
        self.rooms.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed the catalog. Rooms are created once per process and never
    /// destroyed; re-initialization is a conflict.
    pub fn initialize(&self, catalog: &CatalogSpec) -> DomainResult<usize> {
        let mut rooms = self.write();
        if !rooms.is_empty() {
            return Err(DomainError::conflict("room catalog is already initialized"));
        }
        for room in build_rooms(catalog, &self.seq) {
            rooms.insert(room.id_typed(), room);
        }
        let count = rooms.len();
        drop(rooms);

        self.audit
            .record("CATALOG initialized", "system", &format!("{count} rooms"));
        tracing::info!(rooms = count, "room catalog initialized");
        Ok(count)
    }

    pub fn find_by_id(&self, id: RoomId) -> Option<Room> {
        self.read().get(&id).cloned()
    }

    pub fn find_by_number(&self, number: &str) -> Option<Room> {
        self.read().values().find(|r| r.number() == number).cloned()
    }

    pub fn list_all(&self) -> Vec<Room> {
        self.read().values().cloned().collect()
    }

    pub fn list_available(&self) -> Vec<Room> {
        self.read()
            .values()
            .filter(|r| r.is_available())
            .cloned()
            .collect()
    }

    pub fn list_by_kind(&self, kind: RoomKind) -> Vec<Room> {
        self.read()
            .values()
            .filter(|r| r.kind() == kind)
            .cloned()
            .collect()
    }

    /// Mark one room reserved; conflicts unless it is available.
    pub fn reserve(&self, id: RoomId) -> DomainResult<()> {
        let mut rooms = self.write();
        let room = room_mut(&mut rooms, id)?;
        room.reserve()?;
        tracing::debug!(room = room.number(), "room reserved");
        Ok(())
    }

    /// Mark one room available, whatever its current state.
    pub fn release(&self, id: RoomId) -> DomainResult<()> {
        let mut rooms = self.write();
        let room = room_mut(&mut rooms, id)?;
        room.release();
        tracing::debug!(room = room.number(), "room released");
        Ok(())
    }

    /// Whole-record replacement with an optimistic version check: the
    /// incoming record must carry the version it was read at.
    pub fn update(&self, room: Room) -> DomainResult<()> {
        let mut rooms = self.write();
        let current = rooms.get(&room.id_typed()).ok_or_else(|| {
            DomainError::not_found(format!("room {} not found", room.id_typed()))
        })?;
        if current.version() != room.version() {
            return Err(DomainError::conflict(format!(
                "room {} was modified concurrently",
                room.number()
            )));
        }
        let mut room = room;
        room.touch();
        rooms.insert(room.id_typed(), room);
        Ok(())
    }

    /// Exclusive handle over the whole room map, for operations that must
    /// validate and mutate several rooms together with a reservation
    /// record. Callers holding both always take this guard before the
    /// reservation lock.
    pub fn lock_exclusive(&self) -> RoomInventoryGuard<'_> {
        RoomInventoryGuard {
            rooms: self.write(),
        }
    }

    /// Run a closure against one room under the write lock; bumps the
    /// room version when the closure succeeds.
    pub(crate) fn with_room_mut<R>(
        &self,
        id: RoomId,
        f: impl FnOnce(&mut Room) -> DomainResult<R>,
    ) -> DomainResult<R> {
        let mut rooms = self.write();
        let room = room_mut(&mut rooms, id)?;
        let result = f(&mut *room)?;
        room.touch();
        Ok(result)
    }
}

fn room_mut(rooms: &mut BTreeMap<RoomId, Room>, id: RoomId) -> DomainResult<&mut Room> {
    rooms
        .get_mut(&id)
        .ok_or_else(|| DomainError::not_found(format!("room {id} not found")))
}

/// Write guard over the room map. Held across multi-room critical
/// sections (reservation creation, cancellation).
pub struct RoomInventoryGuard<'a> {
    rooms: RwLockWriteGuard<'a, BTreeMap<RoomId, Room>>,
}

impl RoomInventoryGuard<'_> {
    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn reserve(&mut self, id: RoomId) -> DomainResult<()> {
        room_mut(&mut self.rooms, id)?.reserve()
    }

    pub fn release(&mut self, id: RoomId) -> DomainResult<()> {
        room_mut(&mut self.rooms, id)?.release();
        Ok(())
    }
}

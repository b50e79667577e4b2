use ahash::AHashMap;

/// Identity of a render resource created by the rebuild pipeline.
///
/// Ids are never reused, so two resources built from identical parameters
/// still compare unequal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    Handle,
    Label,
}

/// Bookkeeping of live render resources.
///
/// Frontends mirror allocations and releases into their own asset storage.
#[derive(Debug, Clone, Default)]
pub struct ResourceArena {
    next_id: u64,
    live: AHashMap<ResourceId, ResourceKind>,
}

impl ResourceArena {
    pub fn allocate(&mut self, kind: ResourceKind) -> ResourceId {
        self.next_id += 1;
        let id = ResourceId(self.next_id);
        self.live.insert(id, kind);
        id
    }

    /// Releases a resource. Releasing an id that is not live does nothing and
    /// returns `false`.
    pub fn release(&mut self, id: ResourceId) -> bool {
        self.live.remove(&id).is_some()
    }

    pub fn is_live(&self, id: ResourceId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn kind(&self, id: ResourceId) -> Option<ResourceKind> {
        self.live.get(&id).copied()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn live_count_of(&self, kind: ResourceKind) -> usize {
        self.live.values().filter(|live| **live == kind).count()
    }
}

//! Container configuration and other game-defined identifiers.
//!
//! Games describe their containers (hands, draw piles, boards) at setup
//! with a `ContainerConfig`:
//! - who owns it
//! - who may see its contents
//! - whether order matters
//! - which hidden pool it joins during redeterminization
//! - which container, if any, it sits inside
//!
//! The engine never hardcodes container kinds; these are opaque to it.

use serde::{Deserialize, Serialize};

use super::{ComponentId, PlayerId};

/// Who may see the contents of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Everyone sees the contents (boards, won piles, face-up objective).
    VisibleToAll,
    /// Only the owner sees the contents (hands).
    VisibleToOwner,
    /// No one sees the contents (face-down draw piles).
    HiddenToAll,
}

impl Visibility {
    /// Is something with this visibility and owner hidden from `player`?
    #[must_use]
    pub fn hidden_from(self, owner: Option<PlayerId>, player: PlayerId) -> bool {
        match self {
            Visibility::VisibleToAll => false,
            Visibility::VisibleToOwner => owner != Some(player),
            Visibility::HiddenToAll => true,
        }
    }
}

/// Redeterminization pool identifier.
///
/// Hidden containers sharing a pool are gathered together, shuffled and
/// redealt when a state is copied for an observer. A container without a
/// pool is only reshuffled in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolId(pub u16);

impl PoolId {
    /// Create a new pool ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

/// Phase identifier. Games assign meaning; the engine only stores it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseId(pub u16);

impl PhaseId {
    /// Create a new phase ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

/// Configuration for a single container.
///
/// ```
/// use tabletop_mcts::core::{ContainerConfig, PlayerId, PoolId, Visibility};
///
/// let hand = ContainerConfig::new("hand")
///     .with_owner(PlayerId::new(1))
///     .owner_only()
///     .with_pool(PoolId::new(0));
///
/// assert_eq!(hand.visibility, Visibility::VisibleToOwner);
/// assert_eq!(hand.pool, Some(PoolId::new(0)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Human-readable name (for debugging/display).
    pub name: String,

    /// Container owner. `None` for shared containers.
    pub owner: Option<PlayerId>,

    /// Visibility of the items held.
    pub visibility: Visibility,

    /// Is item order significant? (true for draw piles).
    pub ordered: bool,

    /// Hidden pool joined during redeterminization.
    pub pool: Option<PoolId>,

    /// Enclosing container. `None` for top-level containers.
    pub parent: Option<ComponentId>,
}

impl ContainerConfig {
    /// Create a visible, unowned, unordered container configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            visibility: Visibility::VisibleToAll,
            ordered: false,
            pool: None,
            parent: None,
        }
    }

    /// Set the container owner.
    #[must_use]
    pub fn with_owner(mut self, owner: PlayerId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set visibility to owner-only (like a hand).
    #[must_use]
    pub fn owner_only(mut self) -> Self {
        self.visibility = Visibility::VisibleToOwner;
        self
    }

    /// Set visibility to hidden (like a face-down draw pile).
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::HiddenToAll;
        self
    }

    /// Mark the container as ordered.
    #[must_use]
    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    /// Join a redeterminization pool.
    #[must_use]
    pub fn with_pool(mut self, pool: PoolId) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Place the container inside `parent` (a player area, a tableau).
    ///
    /// Whatever hides `parent`'s contents also hides this container's.
    #[must_use]
    pub fn within(mut self, parent: ComponentId) -> Self {
        self.parent = Some(parent);
        self
    }
}

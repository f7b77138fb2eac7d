//! Component model: identity-bearing game objects.
//!
//! Every card, token, board cell and container is a [`Component`] with a
//! stable [`ComponentId`]. Containers are components too, so everything is
//! reachable through one ID lookup in the registry.
//!
//! ## ID Allocation
//!
//! IDs are handed out by the registry in creation order and never reused.
//! Copies of a state keep every ID unchanged, which is what lets actions
//! built against one copy apply to another.
//!
//! ```
//! use tabletop_mcts::core::{Component, ComponentId, ContainerConfig, PlayerId};
//!
//! let card = Component::item(ComponentId(7), "number", &[("value", 4)]);
//! assert_eq!(card.prop("value"), Some(4));
//! assert!(card.as_container().is_none());
//!
//! let hand = Component::container(ComponentId(8), ContainerConfig::new("hand").owner_only());
//! assert!(hand.as_container().unwrap().hides_contents_from(PlayerId::new(0)));
//! ```
//!
//! ## Visibility
//!
//! Only containers carry an owner and a visibility. Whether an item is
//! hidden is decided by the chain of containers holding it at the moment
//! of the query (see `ComponentRegistry::hidden_from`), so a card moved
//! from a hand to a face-up pile becomes visible without any bookkeeping.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::config::{ContainerConfig, PoolId, Visibility};
use super::player::PlayerId;

/// Stable identifier for any component, unique within a game instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

impl ComponentId {
    /// Create a new component ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An ordered sequence of component IDs.
///
/// The back of `items` is the top (draws pop from the back).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Held components, bottom to top.
    pub items: Vector<ComponentId>,

    /// Is item order significant?
    pub ordered: bool,

    /// Hidden pool joined during redeterminization.
    pub pool: Option<PoolId>,

    /// Owning player, if any.
    pub owner: Option<PlayerId>,

    /// Who may see the held components.
    pub visibility: Visibility,
}

impl Container {
    /// Does this container alone hide what it holds from `player`?
    ///
    /// Enclosing containers are not consulted here.
    #[must_use]
    pub fn hides_contents_from(&self, player: PlayerId) -> bool {
        self.visibility.hidden_from(self.owner, player)
    }
}

/// What a component is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    /// A leaf object with integer properties (card value, cell mark).
    Item {
        /// Game-defined properties.
        props: FxHashMap<String, i64>,
    },
    /// A grouping of other components, possibly other containers.
    Container(Container),
}

/// A game object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Stable identity.
    pub id: ComponentId,

    /// Human-readable name (for debugging/display).
    pub name: String,

    /// Item or container payload.
    pub kind: ComponentKind,
}

impl Component {
    /// Create an item.
    pub fn item(id: ComponentId, name: impl Into<String>, props: &[(&str, i64)]) -> Self {
        let props = props
            .iter()
            .map(|(key, value)| ((*key).to_string(), *value))
            .collect();
        Self {
            id,
            name: name.into(),
            kind: ComponentKind::Item { props },
        }
    }

    /// Create an empty container from its configuration.
    ///
    /// `config.parent` is ignored here; the registry places the container.
    pub fn container(id: ComponentId, config: ContainerConfig) -> Self {
        Self {
            id,
            name: config.name,
            kind: ComponentKind::Container(Container {
                items: Vector::new(),
                ordered: config.ordered,
                pool: config.pool,
                owner: config.owner,
                visibility: config.visibility,
            }),
        }
    }

    /// Read an item property. `None` for containers and missing keys.
    #[must_use]
    pub fn prop(&self, key: &str) -> Option<i64> {
        match &self.kind {
            ComponentKind::Item { props } => props.get(key).copied(),
            ComponentKind::Container(_) => None,
        }
    }

    /// Container payload, if this is a container.
    #[must_use]
    pub fn as_container(&self) -> Option<&Container> {
        match &self.kind {
            ComponentKind::Container(container) => Some(container),
            ComponentKind::Item { .. } => None,
        }
    }

    /// Mutable container payload, if this is a container.
    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.kind {
            ComponentKind::Container(container) => Some(container),
            ComponentKind::Item { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_id() {
        let id = ComponentId::new(12);
        assert_eq!(id.raw(), 12);
        assert_eq!(format!("{}", id), "#12");
    }

    #[test]
    fn test_item_props() {
        let item = Component::item(ComponentId(1), "operator", &[("op", 1), ("copy", 3)]);

        assert_eq!(item.prop("op"), Some(1));
        assert_eq!(item.prop("copy"), Some(3));
        assert_eq!(item.prop("missing"), None);
    }

    #[test]
    fn test_container_from_config() {
        let config = ContainerConfig::new("hand")
            .with_owner(PlayerId::new(1))
            .owner_only()
            .ordered();
        let container = Component::container(ComponentId(4), config);

        assert_eq!(container.name, "hand");
        assert_eq!(container.prop("value"), None);

        let payload = container.as_container().unwrap();
        assert_eq!(payload.owner, Some(PlayerId::new(1)));
        assert_eq!(payload.visibility, Visibility::VisibleToOwner);
        assert!(payload.ordered);
        assert!(payload.items.is_empty());

        assert!(payload.hides_contents_from(PlayerId::new(0)));
        assert!(!payload.hides_contents_from(PlayerId::new(1)));
    }

    #[test]
    fn test_serialization() {
        let item = Component::item(ComponentId(3), "cell", &[("mark", -1)]);
        let json = serde_json::to_string(&item).unwrap();
        let deserialized: Component = serde_json::from_str(&json).unwrap();

        assert_eq!(item, deserialized);
    }
}

//! ID-keyed component registry with container membership and movement.
//!
//! The `ComponentRegistry` is the authoritative store of every component in
//! a game. It supports:
//! - Lookup of any component (item or container) by ID
//! - Container contents in order (back = top)
//! - Moving items between containers, drawing from the top, picking by index
//! - Shuffling a container with a caller-supplied stream
//! - Nesting containers inside containers (player areas holding hands)
//! - Owner and visibility resolution through the chain of holders
//!
//! Storage is `im::OrdMap`, so cloning a registry is O(1) and copies share
//! structure until written. Iteration is in ID order, which keeps every
//! walk over the registry deterministic.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use crate::core::component::{Component, ComponentId, Container};
use crate::core::config::ContainerConfig;
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;

/// Authoritative mapping from component ID to component.
///
/// ## Usage
///
/// ```
/// use tabletop_mcts::components::ComponentRegistry;
/// use tabletop_mcts::core::ContainerConfig;
///
/// let mut registry = ComponentRegistry::new();
/// let deck = registry.add_container(ContainerConfig::new("deck").hidden().ordered());
/// let hand = registry.add_container(ContainerConfig::new("hand"));
///
/// let card = registry.add_item("card", &[("value", 3)], deck);
/// assert_eq!(registry.draw(deck, hand), Some(card));
/// assert_eq!(registry.location(card), Some(hand));
/// assert_eq!(registry.size(deck), 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRegistry {
    components: OrdMap<ComponentId, Component>,

    /// held component -> holding container
    locations: OrdMap<ComponentId, ComponentId>,

    next_id: u32,
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create an empty container, on top of `config.parent` if set.
    ///
    /// Panics if the parent is not a container.
    pub fn add_container(&mut self, config: ContainerConfig) -> ComponentId {
        let id = self.alloc_id();
        let parent = config.parent;
        self.components.insert(id, Component::container(id, config));
        if let Some(parent) = parent {
            self.container_mut(parent).items.push_back(id);
            self.locations.insert(id, parent);
        }
        id
    }

    /// Create an item on top of `container`.
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        props: &[(&str, i64)],
        container: ComponentId,
    ) -> ComponentId {
        let id = self.alloc_id();
        self.components.insert(id, Component::item(id, name, props));
        self.container_mut(container).items.push_back(id);
        self.locations.insert(id, container);
        id
    }

    // === Lookup ===

    /// Look up any component.
    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Read an item property.
    #[must_use]
    pub fn prop(&self, id: ComponentId, key: &str) -> Option<i64> {
        self.get(id).and_then(|component| component.prop(key))
    }

    /// Write an item property. Returns `false` if `id` is not an item.
    pub fn set_prop(&mut self, id: ComponentId, key: &str, value: i64) -> bool {
        match self.components.get_mut(&id).map(|c| &mut c.kind) {
            Some(crate::core::ComponentKind::Item { props }) => {
                props.insert(key.to_string(), value);
                true
            }
            _ => false,
        }
    }

    /// Container payload.
    ///
    /// Panics if `id` is not a container.
    #[must_use]
    pub fn container(&self, id: ComponentId) -> &Container {
        match self.components.get(&id).and_then(Component::as_container) {
            Some(container) => container,
            None => panic!("Component {:?} is not a container", id),
        }
    }

    fn container_mut(&mut self, id: ComponentId) -> &mut Container {
        match self.components.get_mut(&id).and_then(Component::as_container_mut) {
            Some(container) => container,
            None => panic!("Component {:?} is not a container", id),
        }
    }

    /// Items held by a container, bottom to top.
    #[must_use]
    pub fn contents(&self, container: ComponentId) -> &Vector<ComponentId> {
        &self.container(container).items
    }

    /// Number of items in a container.
    #[must_use]
    pub fn size(&self, container: ComponentId) -> usize {
        self.container(container).items.len()
    }

    /// Top item of a container (last in order).
    #[must_use]
    pub fn top(&self, container: ComponentId) -> Option<ComponentId> {
        self.container(container).items.back().copied()
    }

    /// Container currently holding `component`.
    #[must_use]
    pub fn location(&self, component: ComponentId) -> Option<ComponentId> {
        self.locations.get(&component).copied()
    }

    /// Is `id` equal to `ancestor` or held somewhere beneath it?
    #[must_use]
    pub fn encloses(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.location(c);
        }
        false
    }

    // === Ownership and Visibility ===

    /// Owner of a component as it stands now.
    ///
    /// A container with its own owner answers for itself; anything else
    /// takes the owner of the nearest owned container holding it.
    #[must_use]
    pub fn owner(&self, id: ComponentId) -> Option<PlayerId> {
        let mut current = Some(id);
        while let Some(c) = current {
            let owner = self.get(c).and_then(Component::as_container).and_then(|k| k.owner);
            if owner.is_some() {
                return owner;
            }
            current = self.location(c);
        }
        None
    }

    /// Are the contents of `container` hidden from `player`?
    ///
    /// True if the container or any container enclosing it hides what it
    /// holds from `player`.
    #[must_use]
    pub fn contents_hidden_from(&self, container: ComponentId, player: PlayerId) -> bool {
        let mut current = Some(container);
        while let Some(c) = current {
            if self.container(c).hides_contents_from(player) {
                return true;
            }
            current = self.location(c);
        }
        false
    }

    /// Is the identity of `id` hidden from `player` where it sits now?
    ///
    /// Unheld components (top-level containers) are always visible.
    #[must_use]
    pub fn hidden_from(&self, id: ComponentId, player: PlayerId) -> bool {
        self.location(id)
            .map_or(false, |holder| self.contents_hidden_from(holder, player))
    }

    /// All component IDs in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.keys().copied()
    }

    /// All container IDs in ascending order.
    pub fn containers(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components
            .values()
            .filter(|c| c.as_container().is_some())
            .map(|c| c.id)
    }

    /// Total number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Is the registry empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    // === Movement ===

    /// Move an item or a whole container to the top of `to`.
    ///
    /// Returns the previous holder, or `None` if the component was not held
    /// (unknown IDs are left alone). Panics if `to` is the component itself
    /// or lies beneath it.
    pub fn move_item(&mut self, component: ComponentId, to: ComponentId) -> Option<ComponentId> {
        self.get(component)?;
        assert!(
            !self.encloses(component, to),
            "Cannot move {:?} into itself or its own contents",
            component
        );

        let from = self.location(component);
        if let Some(from) = from {
            let items = &mut self.container_mut(from).items;
            if let Some(index) = items.index_of(&component) {
                items.remove(index);
            }
        }
        self.container_mut(to).items.push_back(component);
        self.locations.insert(component, to);
        from
    }

    /// Move the top item of `from` onto `to`.
    ///
    /// Returns `None` when `from` is empty; drawing from an empty source is
    /// a rule-level condition, not a fault.
    pub fn draw(&mut self, from: ComponentId, to: ComponentId) -> Option<ComponentId> {
        let item = self.container_mut(from).items.pop_back()?;
        self.container_mut(to).items.push_back(item);
        self.locations.insert(item, to);
        Some(item)
    }

    /// Move the item at `index` of `from` onto `to`.
    pub fn pick(&mut self, from: ComponentId, index: usize, to: ComponentId) -> Option<ComponentId> {
        let items = &mut self.container_mut(from).items;
        if index >= items.len() {
            return None;
        }
        let item = items.remove(index);
        self.container_mut(to).items.push_back(item);
        self.locations.insert(item, to);
        Some(item)
    }

    /// Move every item of `from` onto `to`, preserving order.
    pub fn move_all(&mut self, from: ComponentId, to: ComponentId) -> usize {
        let items = std::mem::take(&mut self.container_mut(from).items);
        let moved = items.len();
        for item in items.iter() {
            self.locations.insert(*item, to);
        }
        self.container_mut(to).items.append(items);
        moved
    }

    /// Shuffle a container in place.
    pub fn shuffle(&mut self, container: ComponentId, rng: &mut GameRng) {
        let mut items: Vec<ComponentId> = self.contents(container).iter().copied().collect();
        rng.shuffle(&mut items);
        self.container_mut(container).items = items.into_iter().collect();
    }

    /// Replace a container's contents wholesale, updating locations.
    ///
    /// Used by redeterminization, which redeals pooled items.
    pub fn replace_contents(&mut self, container: ComponentId, items: Vector<ComponentId>) {
        for item in items.iter() {
            self.locations.insert(*item, container);
        }
        self.container_mut(container).items = items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    fn deck_with(registry: &mut ComponentRegistry, n: i64) -> ComponentId {
        let deck = registry.add_container(ContainerConfig::new("deck").hidden().ordered());
        for value in 0..n {
            registry.add_item("card", &[("value", value)], deck);
        }
        deck
    }

    #[test]
    fn test_ids_are_sequential_and_unique() {
        let mut registry = ComponentRegistry::new();
        let deck = deck_with(&mut registry, 3);

        assert_eq!(deck, ComponentId(0));
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, vec![ComponentId(0), ComponentId(1), ComponentId(2), ComponentId(3)]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_item_visibility_follows_its_holder() {
        let mut registry = ComponentRegistry::new();
        let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
        let hand = registry.add_container(ContainerConfig::new("hand").with_owner(p1).owner_only());
        let pile = registry.add_container(ContainerConfig::new("pile"));
        let card = registry.add_item("card", &[], hand);

        assert_eq!(registry.owner(card), Some(p1));
        assert!(registry.hidden_from(card, p0));
        assert!(!registry.hidden_from(card, p1));

        registry.move_item(card, pile);

        assert_eq!(registry.owner(card), None);
        assert!(!registry.hidden_from(card, p0));

        registry.draw(pile, hand);

        assert_eq!(registry.owner(card), Some(p1));
        assert!(registry.hidden_from(card, p0));
    }

    #[test]
    fn test_nested_containers() {
        let mut registry = ComponentRegistry::new();
        let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
        let area = registry.add_container(ContainerConfig::new("area").with_owner(p1).owner_only());
        let hand = registry.add_container(ContainerConfig::new("hand").within(area));
        let card = registry.add_item("card", &[("value", 2)], hand);

        assert_eq!(registry.location(hand), Some(area));
        assert_eq!(registry.contents(area).iter().copied().collect::<Vec<_>>(), vec![hand]);
        assert!(registry.encloses(area, card));
        assert!(!registry.encloses(hand, area));

        // The inner hand has no owner or restriction of its own
        assert_eq!(registry.owner(hand), Some(p1));
        assert_eq!(registry.owner(card), Some(p1));
        assert!(registry.contents_hidden_from(hand, p0));
        assert!(!registry.contents_hidden_from(hand, p1));
        assert!(registry.hidden_from(card, p0));

        // Lifting the hand out of the area reveals it
        let table = registry.add_container(ContainerConfig::new("table"));
        assert_eq!(registry.move_item(hand, table), Some(area));
        assert_eq!(registry.size(area), 0);
        assert_eq!(registry.owner(card), None);
        assert!(!registry.hidden_from(card, p0));
        assert_eq!(registry.location(card), Some(hand));
    }

    #[test]
    #[should_panic(expected = "into itself")]
    fn test_container_cannot_move_into_its_contents() {
        let mut registry = ComponentRegistry::new();
        let area = registry.add_container(ContainerConfig::new("area"));
        let hand = registry.add_container(ContainerConfig::new("hand").within(area));
        registry.move_item(area, hand);
    }

    #[test]
    fn test_draw_takes_top() {
        let mut registry = ComponentRegistry::new();
        let deck = deck_with(&mut registry, 3);
        let hand = registry.add_container(ContainerConfig::new("hand"));

        let top = registry.top(deck).unwrap();
        assert_eq!(registry.draw(deck, hand), Some(top));
        assert_eq!(registry.prop(top, "value"), Some(2));
        assert_eq!(registry.size(deck), 2);
        assert_eq!(registry.size(hand), 1);
    }

    #[test]
    fn test_draw_from_empty_is_none() {
        let mut registry = ComponentRegistry::new();
        let deck = deck_with(&mut registry, 0);
        let hand = registry.add_container(ContainerConfig::new("hand"));

        assert_eq!(registry.draw(deck, hand), None);
        assert_eq!(registry.size(hand), 0);
    }

    #[test]
    fn test_move_item_and_location() {
        let mut registry = ComponentRegistry::new();
        let deck = deck_with(&mut registry, 3);
        let pile = registry.add_container(ContainerConfig::new("pile"));
        let middle = registry.contents(deck)[1];

        assert_eq!(registry.move_item(middle, pile), Some(deck));
        assert_eq!(registry.location(middle), Some(pile));
        assert!(!registry.contents(deck).contains(&middle));
        assert_eq!(registry.contents(pile).len(), 1);
    }

    #[test]
    fn test_pick_and_move_all() {
        let mut registry = ComponentRegistry::new();
        let deck = deck_with(&mut registry, 4);
        let pile = registry.add_container(ContainerConfig::new("pile"));

        let first = registry.contents(deck)[0];
        assert_eq!(registry.pick(deck, 0, pile), Some(first));
        assert_eq!(registry.pick(deck, 10, pile), None);

        assert_eq!(registry.move_all(deck, pile), 3);
        assert_eq!(registry.size(deck), 0);
        assert_eq!(registry.size(pile), 4);
        assert!(registry.contents(pile).iter().all(|id| registry.location(*id) == Some(pile)));
    }

    #[test]
    fn test_set_prop() {
        let mut registry = ComponentRegistry::new();
        let board = registry.add_container(ContainerConfig::new("board"));
        let cell = registry.add_item("cell", &[("mark", -1)], board);

        assert!(registry.set_prop(cell, "mark", 0));
        assert_eq!(registry.prop(cell, "mark"), Some(0));
        assert!(!registry.set_prop(board, "mark", 0));
    }

    #[test]
    fn test_shuffle_keeps_members() {
        let mut registry = ComponentRegistry::new();
        let deck = deck_with(&mut registry, 20);
        let before: Vec<_> = registry.contents(deck).iter().copied().collect();

        registry.shuffle(deck, &mut GameRng::new(42));
        let mut after: Vec<_> = registry.contents(deck).iter().copied().collect();

        assert_ne!(before, after);
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut registry = ComponentRegistry::new();
        let deck = deck_with(&mut registry, 3);
        let hand = registry.add_container(ContainerConfig::new("hand"));

        let snapshot = registry.clone();
        registry.draw(deck, hand);

        assert_eq!(snapshot.size(deck), 3);
        assert_ne!(snapshot, registry);
    }

    #[test]
    #[should_panic(expected = "not a container")]
    fn test_item_is_not_a_container() {
        let mut registry = ComponentRegistry::new();
        let deck = deck_with(&mut registry, 1);
        let card = registry.top(deck).unwrap();
        let _ = registry.size(card);
    }
}

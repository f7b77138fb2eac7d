//! Resampling of hidden information for an observer.
//!
//! Containers whose contents are hidden from the observer (by their own
//! visibility or by any container enclosing them) are grouped by
//! redeterminization pool. Each group's items are gathered, shuffled with
//! the dedicated stream and dealt back into the slots they came from, so
//! every container keeps its size. A container without a pool forms a
//! group of its own and is only reshuffled.
//!
//! Nested containers are never pooled: a hand inside a hidden player area
//! stays at its slot, and its own items are resampled with its own group.
//!
//! Visible containers are never touched, so redeterminizing an already
//! redeterminized state for the same observer leaves everything that
//! observer can see unchanged.

use std::collections::BTreeMap;

use im::Vector;
use log::trace;

use super::registry::ComponentRegistry;
use crate::core::component::ComponentId;
use crate::core::config::PoolId;
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;

/// Grouping key for hidden containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PoolKey {
    Shared(PoolId),
    Own(ComponentId),
}

/// Containers hidden from `observer`, grouped by pool in a stable order.
fn hidden_groups(
    registry: &ComponentRegistry,
    observer: PlayerId,
) -> BTreeMap<PoolKey, Vec<ComponentId>> {
    let mut groups: BTreeMap<PoolKey, Vec<ComponentId>> = BTreeMap::new();
    for id in registry.containers() {
        if !registry.contents_hidden_from(id, observer) {
            continue;
        }
        let key = match registry.container(id).pool {
            Some(pool) => PoolKey::Shared(pool),
            None => PoolKey::Own(id),
        };
        groups.entry(key).or_default().push(id);
    }
    groups
}

/// Resample everything hidden from `observer` in place.
///
/// Consumes only `rng`.
pub fn redeterminize(registry: &mut ComponentRegistry, observer: PlayerId, rng: &mut GameRng) {
    for (key, containers) in hidden_groups(registry, observer) {
        let is_nested = |registry: &ComponentRegistry, id: ComponentId| {
            registry.get(id).map_or(false, |c| c.as_container().is_some())
        };
        let mut pool: Vec<ComponentId> = containers
            .iter()
            .flat_map(|&c| registry.contents(c).iter().copied().collect::<Vec<_>>())
            .filter(|&id| !is_nested(registry, id))
            .collect();

        trace!(
            "redeterminize {:?} for {}: {} items over {} containers",
            key,
            observer,
            pool.len(),
            containers.len()
        );

        rng.shuffle(&mut pool);

        let mut remaining = pool.into_iter();
        for &container in &containers {
            let dealt: Vector<ComponentId> = registry
                .contents(container)
                .iter()
                .filter_map(|&slot| {
                    if is_nested(registry, slot) {
                        Some(slot)
                    } else {
                        remaining.next()
                    }
                })
                .collect();
            registry.replace_contents(container, dealt);
        }
    }
}

//! Core engine types: components, players, state, actions, RNG, configuration.
//!
//! This module contains the fundamental building blocks that are game-agnostic.
//! Games describe their containers via `ContainerConfig` rather than modifying
//! the core.

pub mod component;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use component::{Component, ComponentId, ComponentKind, Container};
pub use player::{Observer, PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{ContainerConfig, PhaseId, PoolId, Visibility};
pub use action::{Action, ActionRecord};
pub use state::GameState;

//! Trait for entities that occupy a circular hitbox in the arena.
//!
//! Implemented by agents and food so collision tests and driver-side drawing
//! can treat both uniformly.

use ndarray::Array1;

use super::geometric_utils::distance_between;
use super::params::Params;

/// Trait for entities with a position and a collision radius.
pub trait Locatable {
    /// Returns a reference to the entity's position `[x, y]`.
    fn pos(&self) -> &Array1<f32>;

    /// Returns a mutable reference to the entity's position.
    fn pos_mut(&mut self) -> &mut Array1<f32>;

    /// Collision radius of this kind of entity.
    fn hitbox_radius(&self, params: &Params) -> f32;

    /// Euclidean distance between the two centers.
    fn distance_to(&self, other: &dyn Locatable) -> f32 {
        let (a, b) = (self.pos(), other.pos());
        distance_between(a[0], a[1], b[0], b[1])
    }

    /// Whether the two hitboxes touch or overlap.
    fn touches(&self, other: &dyn Locatable, params: &Params) -> bool {
        self.distance_to(other) <= self.hitbox_radius(params) + other.hitbox_radius(params)
    }
}

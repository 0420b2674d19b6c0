//! Collision layer system for filtering collision detection
//!
//! Every object sits on one or more layers and carries a mask of the layers
//! it is willing to touch. A pair is only tested when each side accepts the
//! other.

bitflags::bitflags! {
    /// Collision layer bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player controlled bodies
        const PLAYER = 1 << 0;
        /// AI controlled characters
        const AI = 1 << 1;
        /// Floors, walls and other level geometry
        const ENVIRONMENT = 1 << 2;
        /// Regions that only report contact (lake, home pad)
        const TRIGGER = 1 << 3;
        /// Items that can be picked up
        const PICKUP = 1 << 4;
        /// Loose props pushed around by everything else
        const DEBRIS = 1 << 5;

        /// Every layer
        const ALL = u32::MAX;
    }
}

impl CollisionLayers {
    /// No collision layer
    pub const NONE: Self = Self::empty();

    /// Check if two objects should collide based on their layers and masks
    ///
    /// # Example
    /// ```
    /// use rust_physics::physics::CollisionLayers;
    ///
    /// // Player collides with pickups and level geometry
    /// let player_mask = CollisionLayers::PICKUP | CollisionLayers::ENVIRONMENT;
    ///
    /// assert!(CollisionLayers::should_collide(
    ///     CollisionLayers::PLAYER, player_mask,
    ///     CollisionLayers::PICKUP, CollisionLayers::ALL,
    /// ));
    /// ```
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        // A's layer must be in B's mask AND B's layer must be in A's mask
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER, CollisionLayers::AI,
            CollisionLayers::AI, CollisionLayers::PLAYER,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // Player wants the AI, but the AI ignores players
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER, CollisionLayers::AI,
            CollisionLayers::AI, CollisionLayers::ENVIRONMENT,
        ));
    }

    #[test]
    fn test_none_never_collides() {
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::NONE, CollisionLayers::ALL,
            CollisionLayers::ALL, CollisionLayers::ALL,
        ));
        assert_eq!(CollisionLayers::default(), CollisionLayers::ALL);
    }
}

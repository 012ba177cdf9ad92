//! Entity collections.
//!
//! Passes never remove while scanning: they clear the `active` flag and
//! `sweep` compacts every collection afterwards.

use crate::entities::{Bullet, Enemy, PowerUp};

pub trait Active {
    fn is_active(&self) -> bool;
}

impl Active for Bullet {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Active for Enemy {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Active for PowerUp {
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Drop inactive entries. Relative order of the survivors is kept.
pub fn sweep<T: Active>(items: &mut Vec<T>) {
    items.retain(T::is_active);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityStore {
    /// Player-fired.
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sweep(&mut self) {
        sweep(&mut self.bullets);
        sweep(&mut self.enemy_bullets);
        sweep(&mut self.enemies);
        sweep(&mut self.power_ups);
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
            && self.enemy_bullets.is_empty()
            && self.enemies.is_empty()
            && self.power_ups.is_empty()
    }

    pub fn active_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EnemyVariant, Rect};

    fn enemy(x: f32, active: bool) -> Enemy {
        Enemy {
            rect: Rect::new(x, 0.0, 30.0, 20.0),
            variant: EnemyVariant::FreeFall,
            active,
        }
    }

    #[test]
    fn sweep_keeps_only_active_in_order() {
        let mut store = EntityStore::new();
        store.enemies = vec![enemy(1.0, true), enemy(2.0, false), enemy(3.0, true)];
        assert_eq!(store.active_enemies(), 2);
        store.sweep();
        let xs: Vec<f32> = store.enemies.iter().map(|e| e.rect.x).collect();
        assert_eq!(xs, vec![1.0, 3.0]);
    }

    #[test]
    fn sweeping_dead_entities_empties_the_store() {
        let mut store = EntityStore::new();
        store.enemies.push(enemy(0.0, false));
        assert!(!store.is_empty());
        store.sweep();
        assert!(store.is_empty());
    }
}

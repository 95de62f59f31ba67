//! The level: owns every simulated entity and advances them one frame at a time.
//!
//! Within a frame the order is fixed: player, camera, enemies, platforms, bubbles and boss
//! shots, cross-entity collisions, then pickups. The camera must see the player's settled
//! position, and collisions must see everything after it moved.

use bevy::log::{debug, info};
use bevy::math::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::boss::{BossProjectile, DamageOutcome};
use crate::bubble::{Bubble, BubbleState, PopOutcome};
use crate::camera::Camera;
use crate::config::GameConfig;
use crate::content::LevelContent;
use crate::enemy::{Enemy, EnemyFrame, EnemyId, EnemyType};
use crate::geometry::Aabb;
use crate::pickup::{Item, ItemKind};
use crate::platform::{BreakablePlatform, Platform, PlatformTransition};
use crate::player::{Player, PlayerIntent};

/// Something noteworthy that happened during `advance`. Drained by the shell for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelEvent {
    BubbleFired,
    EnemyCaptured(EnemyId),
    EnemyDefeated { id: EnemyId, awarded: bool },
    ItemCollected(ItemKind),
    ExtraLife,
    PlayerHurt { lives_left: u32 },
    PlayerStunned,
    BossHit { health_left: i32 },
    BossDefeated,
    Platform {
        index: usize,
        transition: PlatformTransition,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelOutcome {
    #[default]
    Running,
    PlayerDefeated,
    BossDefeated,
}

/// What the renderer should draw. Placeholder art is picked per kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Player,
    Enemy(EnemyType),
    Bubble { state: BubbleState, loaded: bool },
    Platform { breakable: bool, crack_blend: f32 },
    BossProjectile,
    Item(ItemKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub sprite: SpriteKind,
    pub screen_rect: Aabb,
    pub alpha: f32,
}

pub struct Level {
    config: GameConfig,
    name: String,
    size: Vec2,
    player: Player,
    camera: Camera,
    enemies: Vec<Enemy>,
    platforms: Vec<Platform>,
    bubbles: Vec<Bubble>,
    boss_projectiles: Vec<BossProjectile>,
    items: Vec<Item>,
    rng: SmallRng,
    next_enemy_id: u32,
    frame: u64,
    events: Vec<LevelEvent>,
    outcome: LevelOutcome,
}

impl Level {
    pub fn new(content: &LevelContent, config: GameConfig) -> Self {
        let size = content.size();
        let player = Player::new(content.player_spawn.position(), size, config.player);
        let mut camera = Camera::new(config.screen.viewport(), size, &config.camera);
        camera.snap_to(&player.body.rect);

        let platforms = content
            .platforms
            .iter()
            .map(|spawn| {
                if spawn.breakable {
                    Platform::Breakable(BreakablePlatform::new(spawn.rect, config.platform))
                } else {
                    Platform::Static(spawn.rect)
                }
            })
            .collect();

        let items = content
            .items
            .iter()
            .map(|spawn| Item::new(spawn.kind, spawn.at.position(), &config.items))
            .collect();

        let mut level = Self {
            rng: SmallRng::seed_from_u64(config.rng_seed),
            name: content.name.clone(),
            size,
            player,
            camera,
            enemies: Vec::with_capacity(content.enemies.len()),
            platforms,
            bubbles: Vec::new(),
            boss_projectiles: Vec::new(),
            items,
            next_enemy_id: 0,
            frame: 0,
            events: Vec::new(),
            outcome: LevelOutcome::Running,
            config,
        };

        for spawn in &content.enemies {
            let patrol = spawn.patrol.map(|[left, right]| (left, right));
            let id = level.spawn_enemy(spawn.kind, spawn.at.position(), patrol);
            if let Some(movement) = &spawn.movement {
                if let Some(enemy) = level.enemies.iter_mut().find(|enemy| enemy.id == id) {
                    enemy.strategy = movement.clone();
                }
            }
        }

        info!(
            "Level '{}' ready: {}x{}, {} platforms, {} enemies, {} items",
            level.name,
            size.x,
            size.y,
            level.platforms.len(),
            level.enemies.len(),
            level.items.len()
        );
        level
    }

    pub fn spawn_enemy(
        &mut self,
        enemy_type: EnemyType,
        position: Vec2,
        patrol_bounds: Option<(f32, f32)>,
    ) -> EnemyId {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        self.enemies.push(Enemy::spawn(
            id,
            enemy_type,
            position,
            self.size,
            patrol_bounds,
            &self.config,
        ));
        id
    }

    pub fn spawn_item(&mut self, kind: ItemKind, position: Vec2) {
        self.items.push(Item::new(kind, position, &self.config.items));
    }

    /// Run one simulation frame. Does nothing once the level has an outcome.
    pub fn advance(&mut self, intent: &PlayerIntent) {
        if self.outcome != LevelOutcome::Running {
            return;
        }
        self.frame += 1;

        self.advance_player(intent);
        self.camera.update(&self.player.body.rect, self.player.body.velocity);
        self.advance_enemies();
        self.advance_platforms();

        let mut pops = self.advance_projectiles();
        self.resolve_bubble_hits(&mut pops);
        self.resolve_bubble_pairs(&mut pops);
        self.resolve_player_pops(&mut pops);
        for pop in pops {
            self.settle_pop(pop);
        }

        self.resolve_player_contacts();
        self.collect_items();

        if self.outcome == LevelOutcome::Running && self.player.is_defeated() {
            info!("Player defeated on frame {}", self.frame);
            self.outcome = LevelOutcome::PlayerDefeated;
        }
    }

    fn advance_player(&mut self, intent: &PlayerIntent) {
        if let Some(bubble) = self.player.apply_intent(intent, &self.config.bubble) {
            self.bubbles.push(bubble);
            self.events.push(LevelEvent::BubbleFired);
        }
        self.player.advance(&self.config.physics, &self.platforms);
    }

    fn advance_enemies(&mut self) {
        let frame = EnemyFrame {
            physics: &self.config.physics,
            solids: self.platforms.as_slice(),
            player_center: Some(self.player.body.center()),
            frozen: self.player.enemies_frozen(),
        };

        let mut scream = false;
        for enemy in &mut self.enemies {
            let actions = enemy.advance(&frame, &mut self.rng);
            self.boss_projectiles.extend(actions.shots);
            scream |= actions.scream;
        }

        if scream {
            self.player.apply_stun(self.config.boss.stun_frames);
            self.events.push(LevelEvent::PlayerStunned);
        }
    }

    fn advance_platforms(&mut self) {
        for (index, platform) in self.platforms.iter_mut().enumerate() {
            if let Some(transition) = platform.advance(&self.player.body) {
                self.events.push(LevelEvent::Platform { index, transition });
            }
        }
    }

    fn advance_projectiles(&mut self) -> Vec<PopOutcome> {
        let mut pops = Vec::new();
        for bubble in &mut self.bubbles {
            if let Some(pop) = bubble.advance(&self.camera, self.size.y) {
                pops.push(pop);
            }
        }
        self.bubbles.retain(|bubble| !bubble.is_finished());

        let size = self.size;
        self.boss_projectiles.retain_mut(|shot| shot.advance(size));
        pops
    }

    /// Traveling empty bubbles capture the first enemy they overlap. The boss cannot be held;
    /// it takes damage and the bubble bursts.
    fn resolve_bubble_hits(&mut self, pops: &mut Vec<PopOutcome>) {
        for bubble_index in 0..self.bubbles.len() {
            if !self.bubbles[bubble_index].can_capture() {
                continue;
            }
            let rect = self.bubbles[bubble_index].rect();
            let Some(enemy_index) = self
                .enemies
                .iter()
                .position(|enemy| enemy.body.rect.overlaps(&rect))
            else {
                continue;
            };

            if self.enemies[enemy_index].is_boss() {
                self.hit_boss(enemy_index);
                if let Some(pop) = self.bubbles[bubble_index].pop(false) {
                    pops.push(pop);
                }
                continue;
            }

            let enemy = self.enemies.remove(enemy_index);
            let id = enemy.id;
            let center = enemy.body.center();
            match self.bubbles[bubble_index].capture(enemy) {
                Ok(()) => {
                    self.items
                        .push(Item::centered(ItemKind::CreditPoint, center, &self.config.items));
                    self.events.push(LevelEvent::EnemyCaptured(id));
                }
                Err(enemy) => self.enemies.push(enemy),
            }
        }
    }

    fn hit_boss(&mut self, enemy_index: usize) {
        let damage = self.config.boss.bubble_damage;
        let Some(boss) = self.enemies[enemy_index].boss_mut() else {
            return;
        };

        match boss.take_damage(damage) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hurt { health_left } => {
                debug!("Boss hit, {health_left} health left");
                self.events.push(LevelEvent::BossHit { health_left });
            }
            DamageOutcome::Defeated => {
                self.enemies.remove(enemy_index);
                self.player.add_score(self.config.boss.defeat_points);
                self.camera.shake(
                    self.config.camera.shake_on_boss_defeat,
                    self.config.camera.shake_frames,
                );
                info!("Boss defeated on frame {}", self.frame);
                self.events.push(LevelEvent::BossDefeated);
                self.outcome = LevelOutcome::BossDefeated;
            }
        }
    }

    /// Each unordered pair of live bubbles is compared once; overlapping pairs both burst.
    fn resolve_bubble_pairs(&mut self, pops: &mut Vec<PopOutcome>) {
        for j in 1..self.bubbles.len() {
            let (head, tail) = self.bubbles.split_at_mut(j);
            let second = &mut tail[0];
            for first in head.iter_mut() {
                if !(first.can_be_popped() && second.can_be_popped()) {
                    continue;
                }
                if first.rect().overlaps(&second.rect()) {
                    pops.extend(first.pop(true));
                    pops.extend(second.pop(true));
                }
            }
        }
    }

    /// Touching a bubble that holds an enemy bursts it.
    fn resolve_player_pops(&mut self, pops: &mut Vec<PopOutcome>) {
        let player = self.player.body.rect;
        for bubble in &mut self.bubbles {
            if bubble.captured().is_some()
                && bubble.can_be_popped()
                && bubble.rect().overlaps(&player)
            {
                pops.extend(bubble.pop(true));
            }
        }
    }

    fn settle_pop(&mut self, pop: PopOutcome) {
        let Some(enemy) = pop.defeated else {
            return;
        };

        if pop.award_points {
            self.player.add_score(self.config.bubble.defeat_points);
        }
        debug!("Enemy {:?} defeated", enemy.id);
        self.events.push(LevelEvent::EnemyDefeated {
            id: enemy.id,
            awarded: pop.award_points,
        });
    }

    /// Enemy bodies and boss shots hurt on contact unless the player is protected. A shot is
    /// spent when it lands; one that meets a protected player flies on.
    fn resolve_player_contacts(&mut self) {
        let player_rect = self.player.body.rect;

        for enemy in &self.enemies {
            if enemy.body.rect.overlaps(&player_rect) && self.player.take_damage() {
                self.events.push(LevelEvent::PlayerHurt {
                    lives_left: self.player.lives(),
                });
            }
        }

        let player = &mut self.player;
        let events = &mut self.events;
        self.boss_projectiles.retain(|shot| {
            if !shot.rect.overlaps(&player_rect) || player.is_invulnerable() {
                return true;
            }
            if player.take_damage() {
                events.push(LevelEvent::PlayerHurt {
                    lives_left: player.lives(),
                });
            }
            false
        });
    }

    fn collect_items(&mut self) {
        let player_rect = self.player.body.rect;
        let player = &mut self.player;
        let events = &mut self.events;
        let settings = &self.config.items;

        self.items.retain(|item| {
            if !item.rect.overlaps(&player_rect) {
                return true;
            }
            let extra_life = item.apply(player, settings);
            events.push(LevelEvent::ItemCollected(item.kind));
            if extra_life {
                events.push(LevelEvent::ExtraLife);
            }
            false
        });
    }

    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Everything visible this frame, back to front, in screen coordinates.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut list = Vec::new();
        let mut push = |sprite: SpriteKind, rect: &Aabb, alpha: f32| {
            if alpha > 0.0 && self.camera.is_visible(rect) {
                list.push(DrawItem {
                    sprite,
                    screen_rect: self.camera.project(rect),
                    alpha,
                });
            }
        };

        for platform in &self.platforms {
            let appearance = platform.appearance();
            let sprite = SpriteKind::Platform {
                breakable: matches!(platform, Platform::Breakable(_)),
                crack_blend: appearance.crack_blend,
            };
            push(sprite, &platform.rect(), appearance.alpha);
        }

        for item in &self.items {
            push(SpriteKind::Item(item.kind), &item.rect, 1.0);
        }

        for enemy in &self.enemies {
            let alpha = match enemy.boss() {
                Some(boss) if boss.is_invincible() => 0.5,
                _ => 1.0,
            };
            push(SpriteKind::Enemy(enemy.enemy_type()), &enemy.body.rect, alpha);
        }

        for bubble in &self.bubbles {
            if let Some(captive) = bubble.captured() {
                push(
                    SpriteKind::Enemy(captive.enemy_type()),
                    &captive.body.rect,
                    1.0,
                );
            }
            let sprite = SpriteKind::Bubble {
                state: bubble.state(),
                loaded: bubble.captured().is_some(),
            };
            push(sprite, &bubble.rect(), 0.7);
        }

        for shot in &self.boss_projectiles {
            push(SpriteKind::BossProjectile, &shot.rect, 1.0);
        }

        let blink_off =
            self.player.is_invincible() && (self.player.invincibility_frames() / 6) % 2 == 1;
        let alpha = if blink_off { 0.3 } else { 1.0 };
        push(SpriteKind::Player, &self.player.body.rect, alpha);

        list
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.is_boss())
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn boss_projectiles(&self) -> &[BossProjectile] {
        &self.boss_projectiles
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

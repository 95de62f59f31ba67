//! Power-ups and collectibles. Every item is consumed on first touch.

use bevy::math::Vec2;
use serde::Deserialize;

use crate::config::ItemSettings;
use crate::geometry::Aabb;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Doubles movement speed for a while.
    DoubleEspresso,
    /// Freezes every enemy in place.
    CheatsheetScroll,
    /// Temporary damage immunity.
    SemesterbreakAura,
    /// One extra life.
    MotivationFishBread,
    CreditPoint,
    Grade,
}

impl ItemKind {
    pub fn is_power_up(self) -> bool {
        !matches!(self, Self::CreditPoint | Self::Grade)
    }

    pub fn points(self) -> u32 {
        match self {
            Self::DoubleEspresso => 20,
            Self::CheatsheetScroll => 30,
            Self::SemesterbreakAura => 25,
            Self::MotivationFishBread => 50,
            Self::CreditPoint => 10,
            Self::Grade => 100,
        }
    }

    pub fn size(self, settings: &ItemSettings) -> Vec2 {
        if self.is_power_up() {
            Vec2::splat(settings.powerup_size)
        } else {
            Vec2::splat(settings.collectible_size)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub rect: Aabb,
}

impl Item {
    pub fn new(kind: ItemKind, position: Vec2, settings: &ItemSettings) -> Self {
        Self {
            kind,
            rect: Aabb::from_position(position, kind.size(settings)),
        }
    }

    pub fn centered(kind: ItemKind, center: Vec2, settings: &ItemSettings) -> Self {
        Self {
            kind,
            rect: Aabb::from_center(center, kind.size(settings)),
        }
    }

    /// Apply the effect and score to `player`. Returns true if the item also granted a life.
    pub fn apply(&self, player: &mut Player, settings: &ItemSettings) -> bool {
        player.add_score(self.kind.points());

        match self.kind {
            ItemKind::DoubleEspresso => player.boost_speed(settings.espresso_frames),
            ItemKind::CheatsheetScroll => player.freeze_enemies(settings.cheatsheet_frames),
            ItemKind::SemesterbreakAura => player.grant_aura(settings.aura_frames),
            ItemKind::MotivationFishBread => {
                player.add_life();
                return true;
            }
            ItemKind::CreditPoint => {
                return player.add_credit_point(settings.credit_points_per_life);
            }
            ItemKind::Grade => player.add_grade(),
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerSettings;
    use rstest::rstest;

    fn player() -> Player {
        Player::new(
            Vec2::new(100.0, 100.0),
            Vec2::new(800.0, 600.0),
            PlayerSettings::default(),
        )
    }

    #[rstest]
    #[case(ItemKind::DoubleEspresso, 20)]
    #[case(ItemKind::CheatsheetScroll, 30)]
    #[case(ItemKind::SemesterbreakAura, 25)]
    #[case(ItemKind::MotivationFishBread, 50)]
    #[case(ItemKind::CreditPoint, 10)]
    #[case(ItemKind::Grade, 100)]
    fn items_award_points(#[case] kind: ItemKind, #[case] points: u32) {
        let settings = ItemSettings::default();
        let mut player = player();
        Item::new(kind, Vec2::ZERO, &settings).apply(&mut player, &settings);
        assert_eq!(player.score(), points);
    }

    #[test]
    fn power_up_effects_land_on_the_player() {
        let settings = ItemSettings::default();
        let mut player = player();

        for kind in [
            ItemKind::DoubleEspresso,
            ItemKind::CheatsheetScroll,
            ItemKind::SemesterbreakAura,
        ] {
            Item::new(kind, Vec2::ZERO, &settings).apply(&mut player, &settings);
        }

        assert!(player.is_speed_boosted());
        assert!(player.enemies_frozen());
        assert!(player.has_aura());

        let extra = Item::new(ItemKind::MotivationFishBread, Vec2::ZERO, &settings)
            .apply(&mut player, &settings);
        assert!(extra);
        assert_eq!(player.lives(), 4);
    }

    #[test]
    fn sizes_follow_item_family() {
        let settings = ItemSettings::default();
        let grade = Item::centered(ItemKind::Grade, Vec2::new(50.0, 50.0), &settings);
        assert_eq!(grade.rect.size(), Vec2::splat(20.0));
        assert_eq!(grade.rect.center(), Vec2::new(50.0, 50.0));
        assert_eq!(
            ItemKind::CheatsheetScroll.size(&settings),
            Vec2::splat(30.0)
        );
    }
}

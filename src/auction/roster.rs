// Roster store: the fixed player catalog and its ownership state.
//
// Pure data holder. Existence checks only; all business validation (budget,
// auction lifecycle) lives in the engine, which is the sole mutator of
// `price` and `owner`.

use serde::{Deserialize, Serialize};

use super::{AuctionError, PlayerId, TeamId};

/// One player in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: String,
    pub tier: String,
    pub profile: String,
    pub image: String,
    /// Winning price. Zero while unassigned.
    pub price: u32,
    /// Owning team once sold.
    pub owner: Option<TeamId>,
}

/// Seed data for one catalog entry.
#[derive(Debug, Clone, Default)]
pub struct CatalogEntry {
    pub name: String,
    pub position: String,
    pub tier: String,
    pub profile: String,
    pub image: String,
}

/// A profile edit. `None` fields are left unchanged; `price` and `owner`
/// are not reachable through this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub position: Option<String>,
    pub tier: Option<String>,
    pub profile: Option<String>,
    pub image: Option<String>,
}

/// The player catalog.
#[derive(Debug, Clone)]
pub struct Roster {
    players: Vec<Player>,
    /// As-constructed snapshot, restored by `reset`.
    initial: Vec<Player>,
}

impl Roster {
    /// Build the catalog from seed entries, assigning ids in order.
    pub fn new(catalog: Vec<CatalogEntry>) -> Self {
        let players: Vec<Player> = catalog
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Player {
                id: PlayerId(i as u32 + 1),
                name: entry.name,
                position: entry.position,
                tier: entry.tier,
                profile: entry.profile,
                image: entry.image,
                price: 0,
                owner: None,
            })
            .collect();
        let initial = players.clone();
        Roster { players, initial }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player by id.
    pub fn get(&self, id: PlayerId) -> Result<&Player, AuctionError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(AuctionError::UnknownPlayer(id))
    }

    fn get_mut(&mut self, id: PlayerId) -> Result<&mut Player, AuctionError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AuctionError::UnknownPlayer(id))
    }

    /// Players with no owner, in catalog order.
    pub fn unassigned(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.owner.is_none())
    }

    /// Ids of all unassigned players, in catalog order.
    pub fn unassigned_ids(&self) -> Vec<PlayerId> {
        self.unassigned().map(|p| p.id).collect()
    }

    /// Number of players currently owned by a team.
    pub fn assigned_count(&self) -> usize {
        self.players.iter().filter(|p| p.owner.is_some()).count()
    }

    /// Record a sale: set the player's owner and winning price.
    pub fn apply_assignment(
        &mut self,
        id: PlayerId,
        owner: TeamId,
        price: u32,
    ) -> Result<(), AuctionError> {
        let player = self.get_mut(id)?;
        player.owner = Some(owner);
        player.price = price;
        Ok(())
    }

    /// Reverse a sale: clear the player's owner and price.
    pub fn clear_assignment(&mut self, id: PlayerId) -> Result<(), AuctionError> {
        let player = self.get_mut(id)?;
        player.owner = None;
        player.price = 0;
        Ok(())
    }

    /// Merge a profile edit into a player's metadata.
    pub fn update_profile(
        &mut self,
        id: PlayerId,
        update: ProfileUpdate,
    ) -> Result<(), AuctionError> {
        let player = self.get_mut(id)?;
        if let Some(position) = update.position {
            player.position = position;
        }
        if let Some(tier) = update.tier {
            player.tier = tier;
        }
        if let Some(profile) = update.profile {
            player.profile = profile;
        }
        if let Some(image) = update.image {
            player.image = image;
        }
        Ok(())
    }

    /// Restore the catalog to its as-constructed state, discarding
    /// assignments and profile edits alike.
    pub fn reset(&mut self) {
        self.players = self.initial.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, position: &str, tier: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            position: position.to_string(),
            tier: tier.to_string(),
            ..CatalogEntry::default()
        }
    }

    fn test_roster() -> Roster {
        Roster::new(vec![
            entry("Haru", "Top", "S"),
            entry("Juno", "Jungle", "A"),
            entry("Eun", "Mid", "B"),
        ])
    }

    #[test]
    fn ids_assigned_in_catalog_order() {
        let roster = test_roster();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.players()[0].id, PlayerId(1));
        assert_eq!(roster.players()[1].id, PlayerId(2));
        assert_eq!(roster.players()[2].id, PlayerId(3));
    }

    #[test]
    fn new_players_start_unowned_at_price_zero() {
        let roster = test_roster();
        for player in roster.players() {
            assert_eq!(player.price, 0);
            assert!(player.owner.is_none());
        }
        assert_eq!(roster.unassigned_ids().len(), 3);
        assert_eq!(roster.assigned_count(), 0);
    }

    #[test]
    fn get_unknown_player_fails() {
        let roster = test_roster();
        assert_eq!(
            roster.get(PlayerId(99)),
            Err(AuctionError::UnknownPlayer(PlayerId(99)))
        );
    }

    #[test]
    fn apply_and_clear_assignment() {
        let mut roster = test_roster();
        roster
            .apply_assignment(PlayerId(2), TeamId(0), 500)
            .unwrap();

        let player = roster.get(PlayerId(2)).unwrap();
        assert_eq!(player.owner, Some(TeamId(0)));
        assert_eq!(player.price, 500);
        assert_eq!(roster.assigned_count(), 1);
        assert_eq!(roster.unassigned_ids(), vec![PlayerId(1), PlayerId(3)]);

        roster.clear_assignment(PlayerId(2)).unwrap();
        let player = roster.get(PlayerId(2)).unwrap();
        assert!(player.owner.is_none());
        assert_eq!(player.price, 0);
        assert_eq!(roster.assigned_count(), 0);
    }

    #[test]
    fn assignment_on_unknown_player_fails() {
        let mut roster = test_roster();
        assert!(roster
            .apply_assignment(PlayerId(42), TeamId(0), 100)
            .is_err());
        assert!(roster.clear_assignment(PlayerId(42)).is_err());
    }

    #[test]
    fn update_profile_merges_set_fields_only() {
        let mut roster = test_roster();
        roster
            .update_profile(
                PlayerId(1),
                ProfileUpdate {
                    tier: Some("A".into()),
                    profile: Some("Split pusher.".into()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();

        let player = roster.get(PlayerId(1)).unwrap();
        assert_eq!(player.tier, "A");
        assert_eq!(player.profile, "Split pusher.");
        // Untouched fields keep their catalog values.
        assert_eq!(player.position, "Top");
        assert_eq!(player.name, "Haru");
    }

    #[test]
    fn reset_restores_assignments_and_profiles() {
        let mut roster = test_roster();
        roster
            .apply_assignment(PlayerId(1), TeamId(1), 750)
            .unwrap();
        roster
            .update_profile(
                PlayerId(3),
                ProfileUpdate {
                    tier: Some("S".into()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();

        roster.reset();

        let first = roster.get(PlayerId(1)).unwrap();
        assert!(first.owner.is_none());
        assert_eq!(first.price, 0);
        let third = roster.get(PlayerId(3)).unwrap();
        assert_eq!(third.tier, "B");
    }
}

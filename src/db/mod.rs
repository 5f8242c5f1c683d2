use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Club, ClubCreate, ClubUpdate, Member, MemberCreate};

/// Storage abstraction for the club and membership registries.
///
/// Handlers only see this trait, so the in-memory store can be swapped for
/// a real persistence backend without touching route logic. Every method is
/// a single logical operation: cascade deletes and counter updates happen
/// atomically inside the implementation.
#[async_trait]
pub trait ClubStore: Send + Sync {
    /// All clubs in insertion order (ids are monotonic, so id order).
    async fn list_clubs(&self) -> Vec<Club>;

    async fn get_club(&self, id: i64) -> Option<Club>;

    /// Assigns a fresh id and today's date, stores and returns the record.
    async fn create_club(&self, payload: ClubCreate) -> Club;

    /// Merges only the supplied fields; `None` when the club is absent.
    async fn update_club(&self, id: i64, payload: ClubUpdate) -> Option<Club>;

    /// Removes the club and its member list. `false` when absent.
    async fn delete_club(&self, id: i64) -> bool;

    /// Members of a club in join order. Empty when the club is unknown or
    /// has no recorded members - never an error.
    async fn list_members(&self, club_id: i64) -> Vec<Member>;

    /// Appends a member with a globally unique id and bumps the club's
    /// member counter. `None` when the club does not exist.
    async fn add_member(&self, club_id: i64, payload: MemberCreate) -> Option<Member>;

    /// Removes the member from the club's list and drops the counter.
    /// `false` when the club or the member within it is absent.
    async fn remove_member(&self, club_id: i64, member_id: i64) -> bool;
}

#[derive(Debug, Default)]
struct Registries {
    clubs: BTreeMap<i64, Club>,
    // Keyed by club id; a club with no members simply has no entry here
    members: HashMap<i64, Vec<Member>>,
    next_club_id: i64,
    next_member_id: i64,
}

/// In-memory implementation of [`ClubStore`].
///
/// A single `RwLock` guards both registries and the id counters, so each
/// logical operation takes the lock once: one writer at a time, concurrent
/// readers.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Registries>,
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Registries {
                next_club_id: 1,
                next_member_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Store preloaded with the well-known demo data: three clubs, two
    /// members in club 1, one in club 2, club 3 empty.
    pub fn seeded() -> Self {
        let mut clubs = BTreeMap::new();
        clubs.insert(1, Club {
            id: 1,
            name: "Lectores Nocturnos".to_string(),
            description: "Club para amantes de la lectura nocturna".to_string(),
            created_date: "2024-01-15".to_string(),
            favorite_genre: "Misterio".to_string(),
            members: 25,
        });
        clubs.insert(2, Club {
            id: 2,
            name: "Fantasía y Más".to_string(),
            description: "Dedicado a la literatura fantástica".to_string(),
            created_date: "2024-02-20".to_string(),
            favorite_genre: "Fantasía".to_string(),
            members: 40,
        });
        clubs.insert(3, Club {
            id: 3,
            name: "Clásicos Eternos".to_string(),
            description: "Explorando la literatura clásica".to_string(),
            created_date: "2024-03-10".to_string(),
            favorite_genre: "Clásicos".to_string(),
            members: 15,
        });

        let mut members = HashMap::new();
        members.insert(1, vec![
            Member {
                id: 101,
                name: "Ana García".to_string(),
                email: "ana@correo.com".to_string(),
                joined_date: "2024-01-20".to_string(),
            },
            Member {
                id: 102,
                name: "Carlos Ruiz".to_string(),
                email: "carlos@correo.com".to_string(),
                joined_date: "2024-02-15".to_string(),
            },
        ]);
        members.insert(2, vec![
            Member {
                id: 201,
                name: "Elena Torres".to_string(),
                email: "elena@correo.com".to_string(),
                joined_date: "2024-03-01".to_string(),
            },
        ]);

        Self {
            inner: RwLock::new(Registries {
                clubs,
                members,
                next_club_id: 4,
                next_member_id: 202,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClubStore for MemoryStore {
    async fn list_clubs(&self) -> Vec<Club> {
        let inner = self.inner.read().await;
        inner.clubs.values().cloned().collect()
    }

    async fn get_club(&self, id: i64) -> Option<Club> {
        let inner = self.inner.read().await;
        inner.clubs.get(&id).cloned()
    }

    async fn create_club(&self, payload: ClubCreate) -> Club {
        let mut inner = self.inner.write().await;
        let id = inner.next_club_id;
        inner.next_club_id += 1;

        let club = Club {
            id,
            name: payload.name,
            description: payload.description,
            created_date: today(),
            favorite_genre: payload.favorite_genre,
            members: payload.members,
        };
        inner.clubs.insert(id, club.clone());
        club
    }

    async fn update_club(&self, id: i64, payload: ClubUpdate) -> Option<Club> {
        let mut inner = self.inner.write().await;
        let club = inner.clubs.get_mut(&id)?;

        if let Some(name) = payload.name {
            club.name = name;
        }
        if let Some(description) = payload.description {
            club.description = description;
        }
        if let Some(favorite_genre) = payload.favorite_genre {
            club.favorite_genre = favorite_genre;
        }
        if let Some(members) = payload.members {
            club.members = members;
        }

        Some(club.clone())
    }

    async fn delete_club(&self, id: i64) -> bool {
        let mut inner = self.inner.write().await;
        if inner.clubs.remove(&id).is_none() {
            return false;
        }
        // Cascade: no membership entry may outlive its club
        inner.members.remove(&id);
        true
    }

    async fn list_members(&self, club_id: i64) -> Vec<Member> {
        let inner = self.inner.read().await;
        inner.members.get(&club_id).cloned().unwrap_or_default()
    }

    async fn add_member(&self, club_id: i64, payload: MemberCreate) -> Option<Member> {
        let mut inner = self.inner.write().await;
        if !inner.clubs.contains_key(&club_id) {
            return None;
        }

        let id = inner.next_member_id;
        inner.next_member_id += 1;

        let member = Member {
            id,
            name: payload.name,
            email: payload.email,
            joined_date: today(),
        };
        inner.members.entry(club_id).or_default().push(member.clone());

        if let Some(club) = inner.clubs.get_mut(&club_id) {
            club.members += 1;
        }

        Some(member)
    }

    async fn remove_member(&self, club_id: i64, member_id: i64) -> bool {
        let mut inner = self.inner.write().await;
        let Some(list) = inner.members.get_mut(&club_id) else {
            return false;
        };
        let Some(pos) = list.iter().position(|m| m.id == member_id) else {
            return false;
        };
        list.remove(pos);

        if let Some(club) = inner.clubs.get_mut(&club_id) {
            club.members = (club.members - 1).max(0);
        }

        true
    }
}

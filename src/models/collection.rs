use serde::{Deserialize, Serialize};

use super::de;

// ---------------------------------------------------------------------------
// Finish / Quantities
// ---------------------------------------------------------------------------

/// The two ownership variants tracked per card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    Normal,
    Foil,
}

/// Owned copies of one card. Also the body of `POST /me/{id}/update-owned`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantities {
    pub normal: u32,
    pub foil: u32,
}

impl Quantities {
    pub fn new(normal: u32, foil: u32) -> Self {
        Self { normal, foil }
    }

    pub fn get(&self, finish: Finish) -> u32 {
        match finish {
            Finish::Normal => self.normal,
            Finish::Foil => self.foil,
        }
    }

    /// One more copy of `finish`.
    pub fn incremented(self, finish: Finish) -> Self {
        self.stepped(finish, |n| n.saturating_add(1))
    }

    /// One fewer copy of `finish`, never below zero.
    pub fn decremented(self, finish: Finish) -> Self {
        self.stepped(finish, |n| n.saturating_sub(1))
    }

    pub fn total(&self) -> u32 {
        self.normal.saturating_add(self.foil)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn stepped(mut self, finish: Finish, step: impl Fn(u32) -> u32) -> Self {
        match finish {
            Finish::Normal => self.normal = step(self.normal),
            Finish::Foil => self.foil = step(self.foil),
        }
        self
    }
}

// ---------------------------------------------------------------------------
// OwnedCardCount
// ---------------------------------------------------------------------------

/// Server copy of how many copies of a card the user owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOwnedCard", into = "FlatOwnedCard")]
pub struct OwnedCardCount {
    pub card_id: String,
    pub quantities: Quantities,
}

// Written in the flat `card_id`/`normal`/`foil` shape the decoder reads.
#[derive(Serialize)]
struct FlatOwnedCard {
    card_id: String,
    normal: u32,
    foil: u32,
}

impl From<OwnedCardCount> for FlatOwnedCard {
    fn from(owned: OwnedCardCount) -> Self {
        FlatOwnedCard {
            card_id: owned.card_id,
            normal: owned.quantities.normal,
            foil: owned.quantities.foil,
        }
    }
}

// Pivot rows carry `card_id`, card objects only `id`. Counts come as
// `normal`/`foil` or `normal_quantity`/`foil_quantity` depending on endpoint.
#[derive(Deserialize)]
struct RawOwnedCard {
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    card_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_quantity")]
    normal: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_quantity")]
    foil: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_quantity")]
    normal_quantity: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_quantity")]
    foil_quantity: Option<u32>,
}

impl TryFrom<RawOwnedCard> for OwnedCardCount {
    type Error = String;

    fn try_from(raw: RawOwnedCard) -> Result<Self, Self::Error> {
        let card_id = raw
            .card_id
            .or(raw.id)
            .ok_or_else(|| "owned card entry has no card id".to_string())?;
        Ok(OwnedCardCount {
            card_id,
            quantities: Quantities {
                normal: raw.normal.or(raw.normal_quantity).unwrap_or(0),
                foil: raw.foil.or(raw.foil_quantity).unwrap_or(0),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// WishlistEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWishlistEntry")]
pub struct WishlistEntry {
    pub card_id: String,
}

// Entries are either card objects (`id`) or pivot rows (`card_id`).
#[derive(Deserialize)]
struct RawWishlistEntry {
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    card_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    id: Option<String>,
}

impl TryFrom<RawWishlistEntry> for WishlistEntry {
    type Error = String;

    fn try_from(raw: RawWishlistEntry) -> Result<Self, Self::Error> {
        raw.card_id
            .or(raw.id)
            .map(|card_id| WishlistEntry { card_id })
            .ok_or_else(|| "wishlist entry has no card id".to_string())
    }
}

// ---------------------------------------------------------------------------
// CollectionSummary
// ---------------------------------------------------------------------------

/// Profile statistics over the owned cards and wishlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub distinct_cards: usize,
    pub total_copies: u64,
    pub foil_copies: u64,
    pub wishlist_size: usize,
}

//! Read-only catalog queries: sets ("chapters") and their cards.

use std::collections::HashSet;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Card, CardSet, Envelope, OwnedCardCount, SetCard, WishlistEntry};

// ---------------------------------------------------------------------------
// CardFilter
// ---------------------------------------------------------------------------

/// Which cards of a set to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CardFilter {
    #[default]
    All,
    /// At least one copy owned, either finish.
    Owned,
    /// No copy owned.
    Missing,
    Wishlist,
}

impl CardFilter {
    /// Keep the cards matching this filter, preserving order.
    pub fn apply(
        self,
        cards: Vec<Card>,
        owned: &[OwnedCardCount],
        wishlist: &[WishlistEntry],
    ) -> Vec<Card> {
        match self {
            CardFilter::All => cards,
            CardFilter::Owned | CardFilter::Missing => {
                let owned_ids: HashSet<&str> = owned
                    .iter()
                    .filter(|o| !o.quantities.is_empty())
                    .map(|o| o.card_id.as_str())
                    .collect();
                let want_owned = self == CardFilter::Owned;
                cards
                    .into_iter()
                    .filter(|c| owned_ids.contains(c.id.as_str()) == want_owned)
                    .collect()
            }
            CardFilter::Wishlist => {
                let wished: HashSet<&str> = wishlist.iter().map(|w| w.card_id.as_str()).collect();
                cards
                    .into_iter()
                    .filter(|c| wished.contains(c.id.as_str()))
                    .collect()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogQuery
// ---------------------------------------------------------------------------

/// Typed catalog access for one authenticated token.
pub struct CatalogQuery<'a> {
    client: &'a ApiClient,
    token: &'a str,
}

impl<'a> CatalogQuery<'a> {
    pub fn new(client: &'a ApiClient, token: &'a str) -> Self {
        Self { client, token }
    }

    pub fn sets(&self) -> Result<Vec<CardSet>> {
        Envelope::from_value(self.client.sets(Some(self.token))?)
    }

    /// Sets whose name or description contains `query` (case-insensitive).
    /// A blank query returns every set.
    pub fn search_sets(&self, query: &str) -> Result<Vec<CardSet>> {
        Ok(self
            .sets()?
            .into_iter()
            .filter(|s| s.matches(query))
            .collect())
    }

    pub fn set(&self, set_id: &str) -> Result<CardSet> {
        Envelope::from_value(self.client.set(set_id, self.token)?)
    }

    pub fn set_cards(&self, set_id: &str) -> Result<Vec<Card>> {
        Envelope::from_value(self.client.set_cards(set_id, self.token)?)
    }

    pub fn card(&self, card_id: &str) -> Result<Card> {
        Envelope::from_value(self.client.card(card_id, self.token)?)
    }

    /// Cards of a set narrowed by ownership or wishlist membership.
    ///
    /// Only fetches the ownership or wishlist data the filter needs.
    pub fn filtered_set_cards(&self, set_id: &str, filter: CardFilter) -> Result<Vec<Card>> {
        let cards = self.set_cards(set_id)?;
        let (owned, wishlist) = match filter {
            CardFilter::All => return Ok(cards),
            CardFilter::Owned | CardFilter::Missing => (
                Envelope::<Vec<OwnedCardCount>>::from_value(self.client.owned_cards(self.token)?)?,
                Vec::new(),
            ),
            CardFilter::Wishlist => (
                Vec::new(),
                Envelope::<Vec<WishlistEntry>>::from_value(self.client.wishlist(self.token)?)?,
            ),
        };
        Ok(filter.apply(cards, &owned, &wishlist))
    }

    /// Every card of every set, tagged with its set and sorted by set name
    /// then card name.
    pub fn all_cards(&self) -> Result<Vec<SetCard>> {
        let mut all = Vec::new();
        for set in self.sets()? {
            for card in self.set_cards(&set.id)? {
                all.push(SetCard {
                    card,
                    set_id: set.id.clone(),
                    set_name: set.name.clone(),
                });
            }
        }
        all.sort_by(|a, b| {
            a.set_name
                .cmp(&b.set_name)
                .then_with(|| a.card.name.cmp(&b.card.name))
        });
        Ok(all)
    }
}

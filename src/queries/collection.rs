//! Ownership counts and wishlist membership.
//!
//! Every mutation re-reads the server copy afterwards and returns that,
//! never the locally computed value.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    CollectionSummary, Envelope, Finish, OwnedCardCount, Quantities, WishlistEntry,
};

pub struct CollectionQuery<'a> {
    client: &'a ApiClient,
    token: &'a str,
}

impl<'a> CollectionQuery<'a> {
    pub fn new(client: &'a ApiClient, token: &'a str) -> Self {
        Self { client, token }
    }

    // -- Owned cards -----------------------------------------------------------

    pub fn owned(&self) -> Result<Vec<OwnedCardCount>> {
        Envelope::from_value(self.client.owned_cards(self.token)?)
    }

    /// Owned counts of one card; zero for both finishes when not owned.
    pub fn quantities(&self, card_id: &str) -> Result<Quantities> {
        Ok(self
            .owned()?
            .into_iter()
            .find(|o| o.card_id == card_id)
            .map(|o| o.quantities)
            .unwrap_or_default())
    }

    /// Overwrite the counts of a card and return the re-fetched server copy.
    pub fn set_quantities(&self, card_id: &str, quantities: Quantities) -> Result<Quantities> {
        self.client.update_owned_card(card_id, quantities, self.token)?;
        self.quantities(card_id)
    }

    /// Record one more copy of `finish`.
    pub fn add_copy(&self, card_id: &str, finish: Finish) -> Result<Quantities> {
        let current = self.quantities(card_id)?;
        self.set_quantities(card_id, current.incremented(finish))
    }

    /// Record one fewer copy of `finish`. A count already at zero stays at zero.
    pub fn remove_copy(&self, card_id: &str, finish: Finish) -> Result<Quantities> {
        let current = self.quantities(card_id)?;
        self.set_quantities(card_id, current.decremented(finish))
    }

    // -- Wishlist --------------------------------------------------------------

    pub fn wishlist(&self) -> Result<Vec<WishlistEntry>> {
        Envelope::from_value(self.client.wishlist(self.token)?)
    }

    pub fn in_wishlist(&self, card_id: &str) -> Result<bool> {
        Ok(self.wishlist()?.iter().any(|w| w.card_id == card_id))
    }

    /// Flip wishlist membership of a card and return the re-fetched membership.
    pub fn toggle_wishlist(&self, card_id: &str) -> Result<bool> {
        if self.in_wishlist(card_id)? {
            self.client.remove_from_wishlist(card_id, self.token)?;
        } else {
            self.client.add_to_wishlist(card_id, self.token)?;
        }
        self.in_wishlist(card_id)
    }

    // -- Profile ---------------------------------------------------------------

    pub fn summary(&self) -> Result<CollectionSummary> {
        let owned = self.owned()?;
        let wishlist = self.wishlist()?;

        let held: Vec<&OwnedCardCount> = owned
            .iter()
            .filter(|o| !o.quantities.is_empty())
            .collect();
        Ok(CollectionSummary {
            distinct_cards: held.len(),
            total_copies: held.iter().map(|o| u64::from(o.quantities.total())).sum(),
            foil_copies: held.iter().map(|o| u64::from(o.quantities.foil)).sum(),
            wishlist_size: wishlist.len(),
        })
    }
}

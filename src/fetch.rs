//! Fetch a card from the provider, normalize it, and upsert it.

use crate::error::Result;
use crate::freshness::Clock;
use crate::mana::FACE_SEPARATOR;
use crate::models::{CardDefinition, CardUpdate, ScryfallCard};
use crate::provider::CardProvider;
use crate::store::CardStore;

/// Flatten a provider card into the stored shape.
///
/// Top-level values win. Missing (or empty) front image, mana cost and type
/// line are derived from the faces: the image from the first face, cost and
/// type by joining every face's non-empty value with `" // "`. The second
/// face's image becomes the back image.
pub fn normalize(card: &ScryfallCard, currency: &str) -> CardUpdate {
    let faces = card.faces();

    let mut image_front = card.image_url().map(str::to_string);
    let mut mana_cost = non_empty(card.mana_cost.as_deref());
    let mut type_line = non_empty(card.type_line.as_deref());
    let mut image_back = None;

    if let Some(front) = faces.first() {
        if image_front.is_none() {
            image_front = front.image_url().map(str::to_string);
        }
        if mana_cost.is_none() {
            mana_cost = join_faces(faces.iter().map(|f| f.mana_cost.as_deref()));
        }
        if type_line.is_none() {
            type_line = join_faces(faces.iter().map(|f| f.type_line.as_deref()));
        }
    }
    if let Some(back) = faces.get(1) {
        image_back = back.image_url().map(str::to_string);
    }

    CardUpdate {
        external_id: card.id.clone(),
        name: card.name.clone(),
        image_front,
        image_back,
        mana_cost,
        type_line,
        price: card.price(currency),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn join_faces<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Option<String> {
    let parts: Vec<&str> = values.flatten().filter(|v| !v.is_empty()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(FACE_SEPARATOR))
    }
}

/// Ask the provider for `name` and store whatever it returns.
///
/// Returns `Ok(None)` when the provider has no match (nothing is written),
/// and `Err` when the provider could not be consulted or the write failed.
/// Rows are keyed by the provider's identifier, never by `name`.
pub fn fetch_and_upsert(
    provider: &dyn CardProvider,
    store: &CardStore<'_>,
    clock: &dyn Clock,
    currency: &str,
    name: &str,
) -> Result<Option<CardDefinition>> {
    let Some(card) = provider.fetch_named(name)? else {
        return Ok(None);
    };
    let update = normalize(&card, currency);
    store.upsert(&update, clock.now()).map(Some)
}

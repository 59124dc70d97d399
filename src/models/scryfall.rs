use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// ScryfallCard — The subset of a Scryfall card object this crate consumes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScryfallCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    /// Currency code to price string, e.g. `"eur" -> "1.50"`. Values may be null.
    #[serde(default)]
    pub prices: Option<HashMap<String, Option<String>>>,
    /// Present on split, transform and other multi-faced layouts.
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
}

impl ScryfallCard {
    /// Price in the given currency, if listed and parseable.
    pub fn price(&self, currency: &str) -> Option<f64> {
        let raw = self.prices.as_ref()?.get(currency)?.as_deref()?;
        match raw.trim().parse::<f64>() {
            Ok(p) => Some(p),
            Err(_) => {
                log::warn!("Ignoring unparseable {} price {:?} for {}", currency, raw, self.name);
                None
            }
        }
    }

    /// The `normal` image of the card itself (not of a face).
    pub fn image_url(&self) -> Option<&str> {
        self.image_uris.as_ref()?.normal.as_deref().filter(|u| !u.is_empty())
    }

    pub fn faces(&self) -> &[CardFace] {
        self.card_faces.as_deref().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// CardFace — One face of a multi-faced card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardFace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
}

impl CardFace {
    pub fn image_url(&self) -> Option<&str> {
        self.image_uris.as_ref()?.normal.as_deref().filter(|u| !u.is_empty())
    }
}

// ---------------------------------------------------------------------------
// ImageUris
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
}

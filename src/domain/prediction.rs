use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

pub const FLAVOR_PLACEHOLDER: &str = "{beer}";

const SUCCESS_TEMPLATES: &[&str] = &[
    "2026 will open new doors. Enjoy the rise, like a cold {beer}.",
    "Your hard work finally pays off in 2026. Celebrate every milestone with a {beer}.",
    "A bold idea takes shape this year. Toast it early with a {beer}.",
    "Steady progress wins the year. Pace yourself like a slow pint of {beer}.",
    "Luck finds you in unexpected places in 2026, maybe at the bottom of a {beer}.",
    "Leaders will notice you this year. Raise your {beer} with confidence.",
];

const LOVE_TEMPLATES: &[&str] = &[
    "Love will feel warm in 2026, soft like bubbles in a {beer}.",
    "Someone special is closer than you think. Share a {beer} and find out.",
    "An old spark returns this year, as familiar as your favourite {beer}.",
    "Patience brings romance in 2026. Good things pour slowly, like a {beer}.",
    "A chance meeting turns into something more over a round of {beer}.",
    "Your heart stays light all year, crisp like a chilled {beer}.",
];

const FLAVORS: &[&str] = &[
    "Asahi Super Dry",
    "Sapporo Classic",
    "Guinness",
    "Heineken",
    "Corona",
];

/// Candidate lists the engine picks from. Every list is non-empty and every
/// template holds exactly one `{beer}` placeholder once `validate` passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionCatalog {
    pub success_templates: Vec<String>,
    pub love_templates: Vec<String>,
    pub flavors: Vec<String>,
}

impl Default for PredictionCatalog {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            success_templates: owned(SUCCESS_TEMPLATES),
            love_templates: owned(LOVE_TEMPLATES),
            flavors: owned(FLAVORS),
        }
    }
}

impl PredictionCatalog {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading prediction catalog {}", path.display()))?;
        let catalog: PredictionCatalog = serde_json::from_str(&raw)
            .with_context(|| format!("parsing prediction catalog {}", path.display()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        if self.flavors.is_empty() {
            bail!("catalog has no flavors");
        }
        for (name, templates) in [
            ("success", &self.success_templates),
            ("love", &self.love_templates),
        ] {
            if templates.is_empty() {
                bail!("catalog has no {name} templates");
            }
            for template in templates {
                let holes = template.matches(FLAVOR_PLACEHOLDER).count();
                if holes != 1 {
                    bail!("{name} template must contain exactly one {FLAVOR_PLACEHOLDER}, found {holes}: {template:?}");
                }
            }
        }
        Ok(())
    }

    pub fn build_predictions(&self, dob_str: &str, beer_score: u8) -> Predictions {
        let key_base = format!("{}_{}", dob_str, beer_score);

        let success_flavor = stable_index(&format!("{key_base}_beer_success"), self.flavors.len());
        // Love always gets the next flavor in the list, not an independent pick.
        let love_flavor = (success_flavor + 1) % self.flavors.len();

        let success_template = stable_index(&format!("{key_base}_success"), self.success_templates.len());
        let love_template = stable_index(&format!("{key_base}_love"), self.love_templates.len());

        let picks = PredictionPicks {
            success_flavor,
            love_flavor,
            success_template,
            love_template,
        };

        Predictions {
            success: render(&self.success_templates[success_template], &self.flavors[success_flavor]),
            love: render(&self.love_templates[love_template], &self.flavors[love_flavor]),
            picks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionPicks {
    pub success_flavor: usize,
    pub love_flavor: usize,
    pub success_template: usize,
    pub love_template: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predictions {
    pub success: String,
    pub love: String,
    pub picks: PredictionPicks,
}

fn render(template: &str, flavor: &str) -> String {
    template.replacen(FLAVOR_PLACEHOLDER, flavor, 1)
}

/// SHA-256 of `key`, read as a big-endian 256-bit integer, modulo `n`.
///
/// The whole digest takes part in the reduction, so the result matches a
/// big-integer `digest mod n` computed anywhere else.
pub fn stable_index(key: &str, n: usize) -> usize {
    assert!(n > 0, "stable_index called with an empty candidate list");

    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let hash = hasher.finalize();

    let n = n as u128;
    let rem = hash
        .iter()
        .fold(0u128, |acc, &byte| ((acc << 8) | byte as u128) % n);
    rem as usize
}

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ExpenseError;

/// Color stored as normalized RGB components, independent of any UI toolkit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColorRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ColorRgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// Second level of the fixed two-level taxonomy classifying transactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub category_id: Uuid,
    /// Incremented every time a transaction is recorded against this
    /// subcategory; ranks the "frequently used" list.
    #[serde(default)]
    pub usage_count: u32,
}

impl Subcategory {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, category_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: icon.into(),
            category_id,
            usage_count: 0,
        }
    }

    pub fn record_usage(&mut self) {
        self.usage_count = self.usage_count.saturating_add(1);
    }
}

/// Top level of the taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: ColorRgb,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, color: ColorRgb) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: icon.into(),
            color,
            subcategories: Vec::new(),
        }
    }

    /// Adds a subcategory, rejecting duplicate identifiers within the category.
    pub fn add_subcategory(&mut self, mut subcategory: Subcategory) -> Result<Uuid, ExpenseError> {
        if self.subcategories.iter().any(|s| s.id == subcategory.id) {
            return Err(ExpenseError::InvalidInput(format!(
                "duplicate subcategory id {} in category {}",
                subcategory.id, self.name
            )));
        }
        subcategory.category_id = self.id;
        let id = subcategory.id;
        self.subcategories.push(subcategory);
        Ok(id)
    }

    pub fn subcategory(&self, id: Uuid) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == id)
    }
}

/// The complete category/subcategory tree. Seeded once at first launch and
/// treated as immutable apart from usage counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Taxonomy {
    pub categories: Vec<Category>,
}

impl Taxonomy {
    /// Returns a fresh copy of the fixed first-launch taxonomy.
    pub fn seed() -> Self {
        SEED_TAXONOMY.clone()
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn subcategory(&self, id: Uuid) -> Option<&Subcategory> {
        self.categories
            .iter()
            .find_map(|c| c.subcategories.iter().find(|s| s.id == id))
    }

    /// Checks the cross-reference invariant: the subcategory exists and is
    /// owned by the given category.
    pub fn subcategory_belongs_to(&self, subcategory_id: Uuid, category_id: Uuid) -> bool {
        self.category(category_id)
            .map(|c| c.subcategories.iter().any(|s| s.id == subcategory_id))
            .unwrap_or(false)
    }

    pub fn record_usage(&mut self, subcategory_id: Uuid) {
        for category in &mut self.categories {
            if let Some(sub) = category
                .subcategories
                .iter_mut()
                .find(|s| s.id == subcategory_id)
            {
                sub.record_usage();
                return;
            }
        }
        tracing::warn!(%subcategory_id, "usage recorded for unknown subcategory");
    }

    /// Subcategories ranked by usage count descending, name ascending on ties.
    pub fn frequently_used(&self, limit: usize) -> Vec<&Subcategory> {
        let mut all: Vec<&Subcategory> = self
            .categories
            .iter()
            .flat_map(|c| c.subcategories.iter())
            .collect();
        all.sort_by(|a, b| {
            b.usage_count
                .cmp(&a.usage_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        all.truncate(limit);
        all
    }

    /// Convenience lookup by display names, mostly for seeding and tests.
    pub fn find_pair(&self, category_name: &str, subcategory_name: &str) -> Option<(Uuid, Uuid)> {
        let category = self.categories.iter().find(|c| c.name == category_name)?;
        let sub = category
            .subcategories
            .iter()
            .find(|s| s.name == subcategory_name)?;
        Some((category.id, sub.id))
    }
}

static SEED_TAXONOMY: Lazy<Taxonomy> = Lazy::new(build_seed_taxonomy);

fn build_seed_taxonomy() -> Taxonomy {
    let entries: [(&str, &str, ColorRgb, &[(&str, &str)]); 6] = [
        (
            "Food",
            "fork.knife",
            ColorRgb::new(0.91, 0.45, 0.32),
            &[
                ("Groceries", "cart"),
                ("Restaurants", "takeoutbag.and.cup.and.straw"),
                ("Coffee", "cup.and.saucer"),
            ],
        ),
        (
            "Transport",
            "car",
            ColorRgb::new(0.26, 0.52, 0.96),
            &[
                ("Fuel", "fuelpump"),
                ("Public Transit", "bus"),
                ("Parking", "parkingsign"),
            ],
        ),
        (
            "Home",
            "house",
            ColorRgb::new(0.42, 0.72, 0.35),
            &[("Rent", "key"), ("Utilities", "bolt"), ("Internet", "wifi")],
        ),
        (
            "Leisure",
            "gamecontroller",
            ColorRgb::new(0.68, 0.38, 0.85),
            &[
                ("Streaming", "play.tv"),
                ("Travel", "airplane"),
                ("Events", "ticket"),
            ],
        ),
        (
            "Health",
            "heart",
            ColorRgb::new(0.93, 0.29, 0.45),
            &[
                ("Pharmacy", "pills"),
                ("Gym", "dumbbell"),
                ("Doctor", "stethoscope"),
            ],
        ),
        (
            "Income",
            "banknote",
            ColorRgb::new(0.20, 0.65, 0.55),
            &[("Salary", "briefcase"), ("Other Income", "plus.circle")],
        ),
    ];

    let mut taxonomy = Taxonomy::default();
    for (name, icon, color, subs) in entries {
        let mut category = Category::new(name, icon, color);
        for (sub_name, sub_icon) in subs {
            let sub = Subcategory::new(*sub_name, *sub_icon, category.id);
            // Freshly generated ids cannot collide.
            let _ = category.add_subcategory(sub);
        }
        taxonomy.categories.push(category);
    }
    taxonomy
}

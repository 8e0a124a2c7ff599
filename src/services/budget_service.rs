use serde::{Deserialize, Serialize};

/// Travel style keyed from the free-text label the planner form sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelStyle {
    Relaxed,
    Adventure,
    Sightseeing,
    FoodCulture,
    Shopping,
    Balanced,
}

/// Fraction of the daily budget per category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetShares {
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
    pub transport: f64,
}

impl BudgetShares {
    pub fn sum(&self) -> f64 {
        self.accommodation + self.food + self.activities + self.transport
    }
}

impl TravelStyle {
    pub const ALL: [TravelStyle; 6] = [
        TravelStyle::Relaxed,
        TravelStyle::Adventure,
        TravelStyle::Sightseeing,
        TravelStyle::FoodCulture,
        TravelStyle::Shopping,
        TravelStyle::Balanced,
    ];

    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| label.contains(w));

        if has(&["relax", "chill"]) {
            TravelStyle::Relaxed
        } else if has(&["adventure", "activit"]) {
            TravelStyle::Adventure
        } else if has(&["tourist", "hotspot", "sightseeing"]) {
            TravelStyle::Sightseeing
        } else if has(&["food", "culture"]) {
            TravelStyle::FoodCulture
        } else if has(&["shopping", "entertainment"]) {
            TravelStyle::Shopping
        } else {
            TravelStyle::Balanced
        }
    }

    pub fn shares(&self) -> BudgetShares {
        let (accommodation, food, activities, transport) = match self {
            TravelStyle::Relaxed => (0.45, 0.25, 0.15, 0.15),
            TravelStyle::Adventure => (0.30, 0.20, 0.35, 0.15),
            TravelStyle::Sightseeing => (0.35, 0.20, 0.30, 0.15),
            TravelStyle::FoodCulture => (0.30, 0.40, 0.15, 0.15),
            TravelStyle::Shopping => (0.30, 0.25, 0.30, 0.15),
            TravelStyle::Balanced => (0.40, 0.25, 0.20, 0.15),
        };
        BudgetShares {
            accommodation,
            food,
            activities,
            transport,
        }
    }

    /// Phrase used in generated text, e.g. "food and culture".
    pub fn describe(&self) -> &'static str {
        match self {
            TravelStyle::Relaxed => "relaxed",
            TravelStyle::Adventure => "adventure",
            TravelStyle::Sightseeing => "sightseeing",
            TravelStyle::FoodCulture => "food and culture",
            TravelStyle::Shopping => "shopping and entertainment",
            TravelStyle::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Slow,
    Standard,
    Fast,
}

impl Pace {
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("slow") || label.contains("relax") {
            Pace::Slow
        } else if label.contains("fast") || label.contains("packed") {
            Pace::Fast
        } else {
            Pace::Standard
        }
    }

    pub fn activities_per_day(&self) -> usize {
        match self {
            Pace::Slow => 2,
            Pace::Standard => 3,
            Pace::Fast => 4,
        }
    }
}

/// Per-day spend by category. All amounts are whole rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub style: TravelStyle,
    pub total: i64,
    pub daily_budget: i64,
    pub accommodation: i64,
    pub food: i64,
    pub activities: i64,
    pub transport: i64,
}

impl BudgetBreakdown {
    /// Sum of the category amounts. May differ from `daily_budget` by rounding.
    pub fn daily_spend(&self) -> i64 {
        self.accommodation
            .saturating_add(self.food)
            .saturating_add(self.activities)
            .saturating_add(self.transport)
    }
}

/// Splits `budget` over `days` and then across categories for `style`.
/// `days` below one is treated as one.
pub fn allocate(budget: i64, days: i64, style: TravelStyle) -> BudgetBreakdown {
    let daily_budget = budget / days.max(1);
    let shares = style.shares();
    let part = |share: f64| (daily_budget as f64 * share).round() as i64;

    BudgetBreakdown {
        style,
        total: budget,
        daily_budget,
        accommodation: part(shares.accommodation),
        food: part(shares.food),
        activities: part(shares.activities),
        transport: part(shares.transport),
    }
}

//! Template itinerary generator.
//!
//! Used whenever the AI planner is not configured or its answer cannot be used.
//! Output depends only on the request, so the same request always produces
//! the same plan.

use crate::models::itinerary::{ItineraryRequest, PlanDay};
use crate::services::budget_service::{BudgetBreakdown, Pace};

struct StaticGuide {
    names: &'static [&'static str],
    attractions: &'static [&'static str],
    restaurants: &'static [&'static str],
}

const GUIDES: &[StaticGuide] = &[
    StaticGuide {
        names: &["delhi", "new delhi"],
        attractions: &[
            "Red Fort",
            "Jama Masjid",
            "Chandni Chowk",
            "Humayun's Tomb",
            "Qutub Minar",
            "India Gate",
            "Lotus Temple",
            "Akshardham Temple",
        ],
        restaurants: &["Karim's", "Paranthe Wali Gali", "Indian Accent", "Bukhara"],
    },
    StaticGuide {
        names: &["mumbai", "bombay"],
        attractions: &[
            "Gateway of India",
            "Elephanta Caves",
            "Marine Drive",
            "Chhatrapati Shivaji Terminus",
            "Colaba Causeway",
            "Bandra-Worli Sea Link",
            "Sanjay Gandhi National Park",
        ],
        restaurants: &["Leopold Cafe", "Britannia & Co.", "Trishna", "Juhu Beach food stalls"],
    },
    StaticGuide {
        names: &["jaipur"],
        attractions: &[
            "Amber Fort",
            "Hawa Mahal",
            "City Palace",
            "Jantar Mantar",
            "Nahargarh Fort",
            "Jal Mahal",
            "Johari Bazaar",
        ],
        restaurants: &[
            "Laxmi Misthan Bhandar",
            "Chokhi Dhani",
            "Rawat Mishtan Bhandar",
            "Suvarna Mahal",
        ],
    },
    StaticGuide {
        names: &["goa", "panaji", "panjim"],
        attractions: &[
            "Baga Beach",
            "Fort Aguada",
            "Basilica of Bom Jesus",
            "Dudhsagar Falls",
            "Anjuna Flea Market",
            "Fontainhas Latin Quarter",
            "Palolem Beach",
        ],
        restaurants: &["Britto's", "Fisherman's Wharf", "Gunpowder", "Vinayak Family Restaurant"],
    },
    StaticGuide {
        names: &["bengaluru", "bangalore"],
        attractions: &[
            "Lalbagh Botanical Garden",
            "Bangalore Palace",
            "Cubbon Park",
            "Tipu Sultan's Summer Palace",
            "ISKCON Temple",
            "Commercial Street",
            "Nandi Hills",
        ],
        restaurants: &["MTR", "Vidyarthi Bhavan", "Toit", "CTR Malleshwaram"],
    },
    StaticGuide {
        names: &["kolkata", "calcutta"],
        attractions: &[
            "Victoria Memorial",
            "Howrah Bridge",
            "Dakshineswar Kali Temple",
            "Indian Museum",
            "Kumartuli",
            "Park Street",
            "Prinsep Ghat",
        ],
        restaurants: &["Peter Cat", "Flurys", "6 Ballygunge Place", "Arsalan"],
    },
    StaticGuide {
        names: &["chennai", "madras"],
        attractions: &[
            "Marina Beach",
            "Kapaleeshwarar Temple",
            "Fort St. George",
            "San Thome Basilica",
            "Government Museum",
            "DakshinaChitra",
        ],
        restaurants: &["Murugan Idli Shop", "Saravana Bhavan", "Dakshin", "Ratna Cafe"],
    },
    StaticGuide {
        names: &["agra"],
        attractions: &[
            "Taj Mahal",
            "Agra Fort",
            "Mehtab Bagh",
            "Itmad-ud-Daulah's Tomb",
            "Fatehpur Sikri",
            "Kinari Bazaar",
        ],
        restaurants: &["Pinch of Spice", "Peshawri", "Deviram Sweets", "Joney's Place"],
    },
    StaticGuide {
        names: &["varanasi", "banaras", "benares"],
        attractions: &[
            "Dashashwamedh Ghat",
            "Kashi Vishwanath Temple",
            "Sarnath",
            "Assi Ghat",
            "Ramnagar Fort",
            "Manikarnika Ghat",
        ],
        restaurants: &[
            "Kashi Chat Bhandar",
            "Blue Lassi",
            "Brown Bread Bakery",
            "Deena Chat Bhandar",
        ],
    },
    StaticGuide {
        names: &["udaipur"],
        attractions: &[
            "City Palace",
            "Lake Pichola",
            "Jag Mandir",
            "Saheliyon-ki-Bari",
            "Sajjangarh Monsoon Palace",
            "Bagore Ki Haveli",
        ],
        restaurants: &["Ambrai", "Upre", "Natraj Dining Hall", "Jheel's Ginger Coffee Bar"],
    },
    StaticGuide {
        names: &["hyderabad"],
        attractions: &[
            "Charminar",
            "Golconda Fort",
            "Chowmahalla Palace",
            "Salar Jung Museum",
            "Hussain Sagar Lake",
            "Ramoji Film City",
        ],
        restaurants: &["Paradise Biryani", "Shah Ghouse", "Nimrah Cafe", "Chutneys"],
    },
];

/// Attractions and restaurants used to fill a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct CityGuide {
    pub attractions: Vec<String>,
    pub restaurants: Vec<String>,
}

impl CityGuide {
    /// Guide for a known city, or a generic one built from the name.
    pub fn for_city(city: &str) -> Self {
        let key = city.trim().to_lowercase();
        if let Some(guide) = GUIDES.iter().find(|g| g.names.contains(&key.as_str())) {
            return Self {
                attractions: guide.attractions.iter().map(|s| s.to_string()).collect(),
                restaurants: guide.restaurants.iter().map(|s| s.to_string()).collect(),
            };
        }

        let city = city.trim();
        Self {
            attractions: vec![
                format!("{} City Center", city),
                format!("the old town of {}", city),
                format!("the main market in {}", city),
                format!("the local museum in {}", city),
                format!("a heritage walk through {}", city),
                format!("a viewpoint over {}", city),
            ],
            restaurants: vec![
                "a popular local thali restaurant".to_string(),
                format!("a street food lane in {}", city),
                "a rooftop cafe".to_string(),
                "a family-run dhaba".to_string(),
            ],
        }
    }
}

/// Builds a plan with exactly `request.days` entries (none for `days <= 0`).
pub fn generate_fallback_plan(
    request: &ItineraryRequest,
    breakdown: &BudgetBreakdown,
) -> Vec<PlanDay> {
    let days = request.days.max(0) as usize;
    let city = request.city.trim();
    let guide = CityGuide::for_city(city);
    let per_day = Pace::from_label(&request.pace).activities_per_day();
    let stay = if request.accommodation.trim().is_empty() {
        "hotel".to_string()
    } else {
        request.accommodation.trim().to_string()
    };

    let attractions = &guide.attractions;
    let restaurants = &guide.restaurants;

    (0..days)
        .map(|i| {
            let start = (i * per_day) % attractions.len();
            let activities: Vec<String> = (0..per_day)
                .map(|k| attractions[(start + k) % attractions.len()].clone())
                .collect();

            let afternoon_spot = &attractions[(start + 1) % attractions.len()];
            let afternoon = match request.interests.get(i % request.interests.len().max(1)) {
                Some(interest) => format!(
                    "Explore {} with a focus on {}",
                    afternoon_spot,
                    interest.to_lowercase()
                ),
                None => format!(
                    "Explore {} at a {} pace of sightseeing",
                    afternoon_spot,
                    breakdown.style.describe()
                ),
            };

            let title = if i == 0 {
                format!("Arrival in {}", city)
            } else if i + 1 == days {
                format!("Farewell to {}", city)
            } else {
                format!("Exploring {}", city)
            };

            PlanDay {
                day: (i + 1) as u32,
                title,
                morning: format!("Breakfast and a visit to {}", attractions[start]),
                afternoon,
                evening: format!(
                    "Dinner at {}, then unwind at your {}",
                    restaurants[i % restaurants.len()],
                    stay
                ),
                activities,
                approx_cost: Some(breakdown.daily_spend()),
            }
        })
        .collect()
}

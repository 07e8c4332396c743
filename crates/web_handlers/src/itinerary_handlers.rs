use actix_web::{HttpResponse, Result};
use serde::Serialize;

use crate::experience_types::Category;

/// A curated multi-day itinerary suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct Itinerary {
    /// Stable identifier for the suggestion.
    pub id: &'static str,
    /// Itinerary title.
    pub title: String,
    /// Short pitch shown in the list.
    pub summary: String,
    /// Suggested trip length in days.
    pub days: u8,
    /// Ordered stops making up the itinerary.
    pub stops: Vec<ItineraryStop>,
}

/// One stop within an itinerary suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryStop {
    /// Stop name.
    pub name: String,
    /// Which experience category the stop belongs to.
    pub category: Category,
    /// One-line note for the traveler.
    pub note: String,
}

/// The curated suggestions returned to every traveler. Static content:
/// the itinerary planner is editorial, not user-generated.
pub fn itinerary_catalog() -> Vec<Itinerary> {
    vec![
        Itinerary {
            id: "heritage-weekend",
            title: "Heritage Weekend".to_string(),
            summary: "Two days of palaces, old quarters, and craft workshops".to_string(),
            days: 2,
            stops: vec![
                ItineraryStop {
                    name: "Old Quarter Walking Tour".to_string(),
                    category: Category::Heritage,
                    note: "Start early to beat the crowds".to_string(),
                },
                ItineraryStop {
                    name: "Royal Palace AR Reconstruction".to_string(),
                    category: Category::ArSite,
                    note: "The overlay shows the palace as it stood in 1750".to_string(),
                },
                ItineraryStop {
                    name: "Ceramics Workshop Visit".to_string(),
                    category: Category::Heritage,
                    note: "Book the afternoon slot for the firing demo".to_string(),
                },
            ],
        },
        Itinerary {
            id: "green-escape",
            title: "Green Escape".to_string(),
            summary: "Three days among rainforest trails and river valleys".to_string(),
            days: 3,
            stops: vec![
                ItineraryStop {
                    name: "Canopy Walk Eco Tour".to_string(),
                    category: Category::EcoTour,
                    note: "Guides provide binoculars".to_string(),
                },
                ItineraryStop {
                    name: "River Valley Kayaking".to_string(),
                    category: Category::EcoTour,
                    note: "Calm waters, suitable for beginners".to_string(),
                },
                ItineraryStop {
                    name: "Night Wildlife Watch".to_string(),
                    category: Category::EcoTour,
                    note: "Dress warm, the valley cools off fast".to_string(),
                },
            ],
        },
        Itinerary {
            id: "city-in-layers",
            title: "City in Layers".to_string(),
            summary: "One day seeing the city's past through AR lenses".to_string(),
            days: 1,
            stops: vec![
                ItineraryStop {
                    name: "Harbor AR Time Walk".to_string(),
                    category: Category::ArSite,
                    note: "Overlays work best before noon glare".to_string(),
                },
                ItineraryStop {
                    name: "Cathedral Square Reconstruction".to_string(),
                    category: Category::ArSite,
                    note: "Audio narration available in four languages".to_string(),
                },
                ItineraryStop {
                    name: "Merchant House Museum".to_string(),
                    category: Category::Heritage,
                    note: "Closes at 17:00".to_string(),
                },
            ],
        },
    ]
}

/// Returns the curated itinerary suggestions. Public.
pub async fn list_itineraries() -> Result<HttpResponse> {
    let itineraries = itinerary_catalog();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "total": itineraries.len(),
        "itineraries": itineraries
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_nonempty_and_days_match_content() {
        let catalog = itinerary_catalog();
        assert!(!catalog.is_empty());

        for itinerary in &catalog {
            assert!(!itinerary.stops.is_empty());
            assert!(itinerary.days >= 1);
        }
    }

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = itinerary_catalog();
        let mut ids: Vec<_> = catalog.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }
}

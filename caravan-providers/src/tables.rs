use std::collections::HashMap;

// Hotel codes shared by the Emirates city entries below.
const EMIRATES_HOTELS: [&str; 10] = [
    "1402689", "1405349", "1405355", "1407362", "1413911", "1414353", "1415021", "1415135",
    "1415356", "1415518",
];

const ABBOTTABAD_HOTELS: [&str; 10] = [
    "1545134", "1673692", "1673703", "1673856", "1796999", "1545134", "1673692", "1673703",
    "1673856", "1796999",
];

const FALLBACK_HOTELS: [&str; 20] = [
    "1402689", "1405349", "1405355", "1407362", "1413911", "1414353", "1415021", "1415135",
    "1415356", "1415518", "1415792", "1416419", "1416455", "1416461", "1416726", "1440549",
    "1440646", "1440710", "1440886", "1440924",
];

// TBO city codes covered by the curated hotel lists.
const EMIRATES_CITIES: [&str; 10] = [
    "100765", // Abu Dhabi
    "100687", // Ajman
    "100812", // Al Aqah
    "100692", // Al Ain
    "266001", // Al Madam
    "100381", // Al Marjan Islands
    "100492", // Al Mirfa
    "368181", // Al Ruwais
    "364445", // Corniche Beach
    "116319", // Deira
];

const REGION_TO_CITY: [(&str, &str); 13] = [
    ("965847972", "130443"),
    ("966183009", "130444"),
    ("100765", "100765"),
    ("100687", "100687"),
    ("100812", "100812"),
    ("100692", "100692"),
    ("266001", "266001"),
    ("100381", "100381"),
    ("100492", "100492"),
    ("368181", "368181"),
    ("364445", "364445"),
    ("116319", "116319"),
    ("149287", "149287"), // Abbottabad
];

/// Static lookup data for the TBO path: foreign region id to TBO city code,
/// city code to a curated hotel-code list, and the fallback list used when
/// resolution comes up empty. Built once at startup and handed to the TBO
/// client.
#[derive(Debug, Clone)]
pub struct ResolutionTables {
    region_to_city: HashMap<String, String>,
    city_hotels: HashMap<String, Vec<String>>,
    fallback: Vec<String>,
}

impl ResolutionTables {
    pub fn new(
        region_to_city: HashMap<String, String>,
        city_hotels: HashMap<String, Vec<String>>,
        fallback: Vec<String>,
    ) -> Self {
        Self {
            region_to_city,
            city_hotels,
            fallback,
        }
    }

    pub fn builtin() -> Self {
        let region_to_city = REGION_TO_CITY
            .iter()
            .map(|(region, city)| (region.to_string(), city.to_string()))
            .collect();

        let mut city_hotels: HashMap<String, Vec<String>> = HashMap::new();
        for city in EMIRATES_CITIES {
            city_hotels.insert(
                city.to_string(),
                EMIRATES_HOTELS.iter().map(|c| c.to_string()).collect(),
            );
        }
        city_hotels.insert(
            "149287".to_string(),
            ABBOTTABAD_HOTELS.iter().map(|c| c.to_string()).collect(),
        );

        Self {
            region_to_city,
            city_hotels,
            fallback: FALLBACK_HOTELS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn city_code_for(&self, region_id: &str) -> Option<&str> {
        self.region_to_city.get(region_id).map(String::as_str)
    }

    pub fn hotel_codes_for(&self, city_code: &str) -> Option<&[String]> {
        self.city_hotels.get(city_code).map(Vec::as_slice)
    }

    pub fn fallback_codes(&self) -> &[String] {
        &self.fallback
    }
}

impl Default for ResolutionTables {
    fn default() -> Self {
        Self::builtin()
    }
}

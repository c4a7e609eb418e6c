//! Doctor recommendation from static city and specialty tables.
//!
//! Lookups never fail: a missing specialty or unknown city yields an
//! advisory string instead.

use std::collections::{BTreeMap, HashMap};

/// Specialty used for any disease absent from the specialty map.
pub const GENERAL_SPECIALTY: &str = "General";

pub const NO_SPECIALIST_MESSAGE: &str = "No specialist available in your city.";

const DIRECTORY: &[(&str, &[(&str, &str)])] = &[
    (
        "Lahore",
        &[
            ("Cardiology", "Dr. Usman Tariq - Punjab Institute of Cardiology"),
            ("Dermatology", "Dr. Sarah Malik - Cosmo Clinic"),
            ("Neurology", "Dr. Ahsan Raza - Hameed Latif Hospital"),
            ("General", "Dr. Huma Khan - Lahore General Hospital"),
        ],
    ),
    (
        "Gujranwala",
        &[
            ("Cardiology", "Dr. Shabbir Ahmed - City Hospital"),
            ("Dermatology", "Dr. Neelam Bashir - Skin Clinic Gujranwala"),
            ("Neurology", "Dr. Haris Javed - DHQ Gujranwala"),
            ("General", "Dr. Faiza Anwar - Civil Hospital Gujranwala"),
        ],
    ),
    (
        "Islamabad",
        &[
            ("Cardiology", "Dr. Imran Nisar - PIMS"),
            ("Dermatology", "Dr. Nadia Anwar - SkinTech Islamabad"),
            ("Neurology", "Dr. Talha Malik - Shifa International Hospital"),
            ("General", "Dr. Saima Zubair - Polyclinic Islamabad"),
        ],
    ),
    (
        "Rawalpindi",
        &[
            ("Cardiology", "Dr. Rizwan Aziz - Rawalpindi Institute of Cardiology"),
            ("Dermatology", "Dr. Mahnoor Khan - Skin Wellness Center"),
            ("Neurology", "Dr. Muneeb Khan - Benazir Bhutto Hospital"),
            ("General", "Dr. Maria Qureshi - Holy Family Hospital"),
        ],
    ),
    (
        "Karachi",
        &[
            ("Cardiology", "Dr. Sameer Ansari - NICVD"),
            ("Dermatology", "Dr. Hina Khan - Agha Khan Dermatology"),
            ("Neurology", "Dr. Sohail Yousuf - Liaquat National Hospital"),
            ("General", "Dr. Farah Hussain - Jinnah Hospital"),
        ],
    ),
];

const SPECIALTIES: &[(&str, &str)] = &[
    ("heart attack", "Cardiology"),
    ("hypertension", "Cardiology"),
    ("skin infection", "Dermatology"),
    ("acne", "Dermatology"),
    ("migraine", "Neurology"),
    ("epilepsy", "Neurology"),
    ("flu", "General"),
    ("fever", "General"),
    ("cold", "General"),
];

/// City → specialty → doctor description.
pub type DoctorDirectory = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone)]
pub struct DoctorRecommender {
    directory: DoctorDirectory,
    /// Keyed by lowercased disease name.
    specialties: HashMap<String, String>,
}

impl DoctorRecommender {
    pub fn new(directory: DoctorDirectory, specialties: HashMap<String, String>) -> Self {
        let specialties = specialties
            .into_iter()
            .map(|(disease, specialty)| (disease.to_lowercase(), specialty))
            .collect();
        Self {
            directory,
            specialties,
        }
    }

    /// Tables shipped with the application.
    pub fn builtin() -> Self {
        let directory = DIRECTORY
            .iter()
            .map(|(city, doctors)| {
                let by_specialty = doctors
                    .iter()
                    .map(|(specialty, doctor)| (specialty.to_string(), doctor.to_string()))
                    .collect();
                (city.to_string(), by_specialty)
            })
            .collect();
        let specialties = SPECIALTIES
            .iter()
            .map(|(disease, specialty)| (disease.to_string(), specialty.to_string()))
            .collect();
        Self::new(directory, specialties)
    }

    /// Known cities, alphabetically.
    pub fn cities(&self) -> Vec<String> {
        self.directory.keys().cloned().collect()
    }

    pub fn specialty_for(&self, disease: &str) -> &str {
        self.specialties
            .get(&disease.trim().to_lowercase())
            .map(String::as_str)
            .unwrap_or(GENERAL_SPECIALTY)
    }

    pub fn recommend(&self, disease: &str, city: &str) -> String {
        let city = normalize_city(city);
        let specialty = self.specialty_for(disease);

        match self.directory.get(&city) {
            Some(doctors) => doctors
                .get(specialty)
                .cloned()
                .unwrap_or_else(|| NO_SPECIALIST_MESSAGE.to_string()),
            None => format!(
                "No doctor found for {specialty} in {city}. Try selecting a nearby city."
            ),
        }
    }
}

/// Trim and title-case: the first letter after any non-letter is upper-cased,
/// every other letter lower-cased.
pub fn normalize_city(city: &str) -> String {
    let mut out = String::with_capacity(city.len());
    let mut start_of_word = true;
    for c in city.trim().chars() {
        if c.is_alphabetic() {
            if start_of_word {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(c);
            start_of_word = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommends_specialist_in_known_city() {
        let r = DoctorRecommender::builtin();
        assert_eq!(r.recommend("Acne", "lahore "), "Dr. Sarah Malik - Cosmo Clinic");
        assert_eq!(r.recommend("Migraine", "KARACHI"), "Dr. Sohail Yousuf - Liaquat National Hospital");
    }

    #[test]
    fn unmapped_disease_defaults_to_general() {
        let r = DoctorRecommender::builtin();
        assert_eq!(r.specialty_for("Malaria"), GENERAL_SPECIALTY);
        assert_eq!(
            r.recommend("Malaria", "Islamabad"),
            "Dr. Saima Zubair - Polyclinic Islamabad"
        );
    }

    #[test]
    fn unknown_city_falls_back_with_specialty_and_city() {
        let r = DoctorRecommender::builtin();
        let message = r.recommend("flu", "Multan");
        assert!(message.contains("General"));
        assert!(message.contains("Multan"));
        assert_eq!(
            message,
            "No doctor found for General in Multan. Try selecting a nearby city."
        );
    }

    #[test]
    fn unknown_city_message_uses_normalized_city() {
        let r = DoctorRecommender::builtin();
        let message = r.recommend("hypertension", "  new york ");
        assert_eq!(
            message,
            "No doctor found for Cardiology in New York. Try selecting a nearby city."
        );
    }

    #[test]
    fn missing_specialty_in_known_city() {
        let mut directory = DoctorDirectory::new();
        directory.insert(
            "Lahore".into(),
            BTreeMap::from([("General".to_string(), "Dr. A".to_string())]),
        );
        let specialties = HashMap::from([("Acne".to_string(), "Dermatology".to_string())]);
        let r = DoctorRecommender::new(directory, specialties);

        assert_eq!(r.recommend("acne", "Lahore"), NO_SPECIALIST_MESSAGE);
        assert_eq!(r.recommend("flu", "Lahore"), "Dr. A");
    }

    #[test]
    fn cities_listed_alphabetically() {
        assert_eq!(
            DoctorRecommender::builtin().cities(),
            vec!["Gujranwala", "Islamabad", "Karachi", "Lahore", "Rawalpindi"]
        );
    }

    #[test]
    fn normalize_city_title_cases_words() {
        assert_eq!(normalize_city(" rawalPINDI "), "Rawalpindi");
        assert_eq!(normalize_city("dera ghazi-khan"), "Dera Ghazi-Khan");
        assert_eq!(normalize_city(""), "");
    }
}

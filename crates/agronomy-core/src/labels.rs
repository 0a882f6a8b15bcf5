//! Static mapping from classifier output to crop names.

/// Crop names indexed by `class_id - 1`.
pub const CROP_NAMES: [&str; 22] = [
    "Rice",
    "Maize",
    "Jute",
    "Cotton",
    "Coconut",
    "Papaya",
    "Orange",
    "Apple",
    "Muskmelon",
    "Watermelon",
    "Grapes",
    "Mango",
    "Banana",
    "Pomegranate",
    "Lentil",
    "Blackgram",
    "Mungbean",
    "Mothbeans",
    "Pigeonpeas",
    "Kidneybeans",
    "Chickpea",
    "Coffee",
];

pub const FIRST_CLASS_ID: i64 = 1;
pub const LAST_CLASS_ID: i64 = CROP_NAMES.len() as i64;

pub const FALLBACK_MESSAGE: &str =
    "Sorry, we could not determine the best crop to be cultivated with the provided data.";

pub fn crop_name(class_id: i64) -> Option<&'static str> {
    if (FIRST_CLASS_ID..=LAST_CLASS_ID).contains(&class_id) {
        Some(CROP_NAMES[(class_id - FIRST_CLASS_ID) as usize])
    } else {
        None
    }
}

pub fn success_message(crop: &str) -> String {
    format!("{crop} is the best crop to be cultivated right there")
}

/// User-visible text for a class id; ids outside the table get the fallback.
pub fn recommendation_message(class_id: i64) -> String {
    match crop_name(class_id) {
        Some(crop) => success_message(crop),
        None => FALLBACK_MESSAGE.to_string(),
    }
}

/// Class ids a classifier declares that have no crop name.
pub fn unmapped_classes(classes: &[i64]) -> Vec<i64> {
    classes
        .iter()
        .copied()
        .filter(|class_id| crop_name(*class_id).is_none())
        .collect()
}

/// Crop ids the classifier can never emit.
pub fn unreachable_crops(classes: &[i64]) -> Vec<i64> {
    (FIRST_CLASS_ID..=LAST_CLASS_ID)
        .filter(|class_id| !classes.contains(class_id))
        .collect()
}

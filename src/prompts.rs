/// Instruction sent with every image. Bump [`DIAGNOSIS_VERSION`] on edits.
pub const DIAGNOSIS: &str = include_str!("../data/prompts/diagnosis.txt");
pub const DIAGNOSIS_VERSION: &str = "2";

/// Keys the prompt asks the model to return.
pub const DIAGNOSIS_FIELDS: [&str; 9] = [
    "pest_name",
    "disease_name",
    "severity",
    "symptoms",
    "cause",
    "organic_solution",
    "chemical_solution",
    "prevention",
    "image_quality",
];
